use crate::activation::activation::ActivationFunction;
use crate::layers::axons::{AxonsConfig, FullyConnectedAxons};
use crate::math::backend::MatrixFactory;
use crate::math::matrix::Matrix;
use crate::network::context::AutoEncoderContext;
use crate::network::error::NetworkError;
use crate::network::neurons::NeuronsActivation;

/// Intermediate values from one forward pass, kept for backprop.
#[derive(Debug, Clone)]
pub struct LayerActivation {
    /// Input as fed to the axons, bias row included when the layer has one.
    pub input: Matrix,
    /// Pre-activation values (z = Wx + b).
    pub pre_activation: Matrix,
    pub output: NeuronsActivation,
}

/// Fully connected feed-forward layer: axons followed by an activation.
#[derive(Debug, Clone)]
pub struct FeedForwardLayer {
    pub name: String,
    pub axons: FullyConnectedAxons,
    pub activation: ActivationFunction,
}

impl FeedForwardLayer {
    pub fn new(
        name: &str,
        factory: &MatrixFactory,
        config: AxonsConfig,
        activation: ActivationFunction,
    ) -> FeedForwardLayer {
        FeedForwardLayer {
            name: name.to_owned(),
            axons: FullyConnectedAxons::new(factory, config),
            activation,
        }
    }

    pub fn input_neuron_count(&self) -> usize {
        self.axons.config.left.count
    }

    pub fn output_neuron_count(&self) -> usize {
        self.axons.config.right.count
    }

    pub fn forward(
        &self,
        input: &NeuronsActivation,
        ctx: &AutoEncoderContext,
    ) -> Result<LayerActivation, NetworkError> {
        if input.feature_count() != self.input_neuron_count() {
            return Err(NetworkError::ShapeMismatch {
                layer: self.name.clone(),
                expected: self.input_neuron_count(),
                found: input.feature_count(),
            });
        }
        let x = if self.axons.has_bias() {
            input.features_with_bias().into_owned()
        } else {
            input.features().into_owned()
        };
        let z = self.axons.push_left_to_right(ctx.factory(), &x)?;
        let a = z.map(|v| self.activation.function(v));
        let mut output = NeuronsActivation::from_features(a);
        if self.axons.config.right.has_bias {
            output = output.with_bias();
        }
        Ok(LayerActivation {
            input: x,
            pre_activation: z,
            output,
        })
    }

    /// Returns `(weights_grad, input_grad)` given ∂L/∂a for this layer's output.
    ///
    /// `input_grad` is ∂L/∂x for the feature rows (bias row excluded) and is
    /// only computed when `propagate` is set.
    pub fn backward(
        &self,
        cache: &LayerActivation,
        output_grad: &Matrix,
        factory: &MatrixFactory,
        propagate: bool,
    ) -> Result<(Matrix, Option<Matrix>), NetworkError> {
        // δ = error ⊙ σ'(z)
        let act_derivative = cache.pre_activation.map(|x| self.activation.derivative(x));
        let delta = output_grad.hadamard(&act_derivative)?;

        let weights_grad = factory.multiply(&delta, &cache.input.transpose())?;
        let input_grad = if propagate {
            let connections = self.axons.connection_weights()?;
            Some(factory.multiply(&connections.transpose(), &delta)?)
        } else {
            None
        };
        Ok((weights_grad, input_grad))
    }

    /// The unit-norm input pattern that maximally activates output neuron `neuron`.
    ///
    /// For a monotone activation this is the neuron's incoming weight vector
    /// scaled to unit length: `x_i = w_i / sqrt(Σ w_i²)`. Bias weights are excluded.
    pub fn optimal_input_for_output_neuron(
        &self,
        neuron: usize,
        ctx: &AutoEncoderContext,
    ) -> Result<NeuronsActivation, NetworkError> {
        if ctx.is_training() {
            return Err(NetworkError::InvalidContext(format!(
                "{}: optimal inputs are only available in inference mode",
                self.name
            )));
        }
        if neuron >= self.output_neuron_count() {
            return Err(NetworkError::NeuronOutOfRange {
                neuron,
                count: self.output_neuron_count(),
            });
        }
        let connections = self.axons.connection_weights()?;
        let row = connections.row(neuron);
        let norm = row.iter().map(|w| w * w).sum::<f32>().sqrt();
        let pattern = if norm > 0.0 {
            row.iter().map(|w| w / norm).collect()
        } else {
            vec![0.0; row.len()]
        };
        Ok(NeuronsActivation::from_features(Matrix::from_column(pattern)))
    }
}
