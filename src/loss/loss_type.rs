use serde::{Serialize, Deserialize};

use crate::loss::bce::BceLoss;
use crate::loss::mse::MseLoss;
use crate::math::matrix::{Matrix, MatrixError};

/// Selects the reconstruction loss the autoencoder minimises.
///
/// - `Mse`                — Mean-squared error between input and reconstruction.
/// - `BinaryCrossEntropy` — Binary cross-entropy; pixels are treated as
///   Bernoulli targets, pair with a Sigmoid decoding layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossType {
    #[default]
    Mse,
    BinaryCrossEntropy,
}

impl LossType {
    pub fn loss(&self, predicted: &Matrix, expected: &Matrix) -> Result<f32, MatrixError> {
        match self {
            LossType::Mse => MseLoss::loss(predicted, expected),
            LossType::BinaryCrossEntropy => BceLoss::loss(predicted, expected),
        }
    }

    pub fn derivative(&self, predicted: &Matrix, expected: &Matrix) -> Result<Matrix, MatrixError> {
        match self {
            LossType::Mse => MseLoss::derivative(predicted, expected),
            LossType::BinaryCrossEntropy => BceLoss::derivative(predicted, expected),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn perfect_reconstruction_has_zero_mse() {
        let m = Matrix::from_column(vec![0.2, 0.8]);
        assert_eq!(LossType::Mse.loss(&m, &m).unwrap(), 0.0);
        assert_eq!(LossType::Mse.derivative(&m, &m).unwrap().sum(), 0.0);
    }

    #[test]
    fn mse_averages_over_elements() {
        let p = Matrix::from_column(vec![1.0, 0.0]);
        let y = Matrix::from_column(vec![0.0, 0.0]);
        assert_relative_eq!(LossType::Mse.loss(&p, &y).unwrap(), 0.5);
    }

    #[test]
    fn bce_gradient_points_towards_target() {
        let p = Matrix::from_column(vec![0.9, 0.1]);
        let y = Matrix::from_column(vec![0.0, 1.0]);
        let g = LossType::BinaryCrossEntropy.derivative(&p, &y).unwrap();
        assert!(g.get(0, 0) > 0.0);
        assert!(g.get(1, 0) < 0.0);
        assert!(LossType::BinaryCrossEntropy.loss(&p, &y).unwrap() > 2.0);
    }

    #[test]
    fn losses_reject_mismatched_shapes() {
        let p = Matrix::from_column(vec![0.5, 0.5]);
        let y = Matrix::from_column(vec![0.5]);
        assert!(LossType::Mse.loss(&p, &y).is_err());
        assert!(LossType::BinaryCrossEntropy.loss(&p, &y).is_err());
    }
}
