use crate::math::backend::MatrixFactory;
use crate::math::matrix::{Matrix, MatrixError};
use crate::network::neurons::Neurons;

/// The neuron groups a set of axons connects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxonsConfig {
    pub left: Neurons,
    pub right: Neurons,
}

impl AxonsConfig {
    pub fn new(left: Neurons, right: Neurons) -> AxonsConfig {
        AxonsConfig { left, right }
    }
}

/// Dense connections from every left neuron to every right neuron.
///
/// `weights` has shape `(right.count, left.count + bias)`; when the left
/// group carries a bias unit its weights live in the last column.
#[derive(Debug, Clone)]
pub struct FullyConnectedAxons {
    pub config: AxonsConfig,
    pub weights: Matrix,
}

impl FullyConnectedAxons {
    /// Xavier-initialised weights with a zeroed bias column.
    pub fn new(factory: &MatrixFactory, config: AxonsConfig) -> FullyConnectedAxons {
        let mut weights = factory.xavier(config.right.count, config.left.count);
        if config.left.has_bias {
            let mut data = Vec::with_capacity(weights.rows * (weights.cols + 1));
            for r in 0..weights.rows {
                data.extend_from_slice(weights.row(r));
                data.push(0.0);
            }
            weights = Matrix::from_vec(config.right.count, config.left.count + 1, data)
                .unwrap_or_default();
        }
        FullyConnectedAxons { config, weights }
    }

    pub fn has_bias(&self) -> bool {
        self.config.left.has_bias
    }

    /// Weights of the feature connections, bias column excluded.
    pub fn connection_weights(&self) -> Result<Matrix, MatrixError> {
        if self.has_bias() {
            let feature_columns: Vec<usize> = (0..self.config.left.count).collect();
            self.weights.columns(&feature_columns)
        } else {
            Ok(self.weights.clone())
        }
    }

    /// `weights * input`, where `input` already holds a bias row if one is needed.
    pub fn push_left_to_right(&self, factory: &MatrixFactory, input: &Matrix) -> Result<Matrix, MatrixError> {
        factory.multiply(&self.weights, input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::backend::BackendRegistry;

    #[test]
    fn bias_column_is_appended_and_zeroed() {
        let factory = BackendRegistry::with_defaults().resolve("blocked").unwrap();
        let axons = FullyConnectedAxons::new(
            &factory,
            AxonsConfig::new(Neurons::new(4, true), Neurons::new(3, false)),
        );
        assert_eq!(axons.weights.shape(), (3, 5));
        assert!((0..3).all(|r| axons.weights.get(r, 4) == 0.0));
        assert_eq!(axons.connection_weights().unwrap().shape(), (3, 4));
    }

    #[test]
    fn unbiased_axons_keep_square_weights() {
        let factory = BackendRegistry::with_defaults().resolve("blocked").unwrap();
        let axons = FullyConnectedAxons::new(
            &factory,
            AxonsConfig::new(Neurons::new(4, false), Neurons::new(2, false)),
        );
        assert_eq!(axons.weights.shape(), (2, 4));
        let out = axons.push_left_to_right(&factory, &Matrix::zeros(4, 7)).unwrap();
        assert_eq!(out.shape(), (2, 7));
    }
}
