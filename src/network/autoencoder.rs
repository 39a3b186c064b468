use crate::layers::dense::FeedForwardLayer;
use crate::network::context::AutoEncoderContext;
use crate::network::error::NetworkError;
use crate::network::neurons::NeuronsActivation;
use crate::network::unsupervised::{AutoEncoderNetwork, UnsupervisedNeuralNetwork};
use crate::train::epoch_stats::TrainingSummary;
use crate::train::loop_fn::train_loop;

const ENCODING_LAYER: usize = 0;
const DECODING_LAYER: usize = 1;

/// Two-layer autoencoder: an encoding layer followed by a decoding layer
/// with independent weights.
#[derive(Debug, Clone)]
pub struct AutoEncoder {
    pub name: String,
    layers: Vec<FeedForwardLayer>,
}

impl AutoEncoder {
    /// Fails with `ShapeMismatch` unless the decoding layer takes the
    /// encoding layer's output and reproduces its input width.
    pub fn new(
        name: &str,
        encoding_layer: FeedForwardLayer,
        decoding_layer: FeedForwardLayer,
    ) -> Result<AutoEncoder, NetworkError> {
        if decoding_layer.input_neuron_count() != encoding_layer.output_neuron_count() {
            return Err(NetworkError::ShapeMismatch {
                layer: decoding_layer.name.clone(),
                expected: decoding_layer.input_neuron_count(),
                found: encoding_layer.output_neuron_count(),
            });
        }
        if decoding_layer.output_neuron_count() != encoding_layer.input_neuron_count() {
            return Err(NetworkError::ShapeMismatch {
                layer: name.to_owned(),
                expected: encoding_layer.input_neuron_count(),
                found: decoding_layer.output_neuron_count(),
            });
        }
        Ok(AutoEncoder {
            name: name.to_owned(),
            layers: vec![encoding_layer, decoding_layer],
        })
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layer(&self, index: usize) -> Result<&FeedForwardLayer, NetworkError> {
        self.layers.get(index).ok_or(NetworkError::LayerOutOfRange {
            index,
            layers: self.layers.len(),
        })
    }

    pub fn encoding_layer(&self) -> &FeedForwardLayer {
        &self.layers[ENCODING_LAYER]
    }

    pub fn decoding_layer(&self) -> &FeedForwardLayer {
        &self.layers[DECODING_LAYER]
    }

    /// Forward-propagates through the layers selected by the context's
    /// `start_layer..=end_layer` range.
    pub fn forward_layers(
        &self,
        input: &NeuronsActivation,
        ctx: &AutoEncoderContext,
    ) -> Result<NeuronsActivation, NetworkError> {
        let start = ctx.start_layer();
        let end = ctx.end_layer().unwrap_or(self.layers.len() - 1);
        if end >= self.layers.len() {
            return Err(NetworkError::LayerOutOfRange {
                index: end,
                layers: self.layers.len(),
            });
        }
        if start > end {
            return Err(NetworkError::InvalidContext(format!(
                "start layer {} is after end layer {}",
                start, end
            )));
        }
        let mut current = self.layers[start].forward(input, ctx)?.output;
        for layer in &self.layers[start + 1..=end] {
            current = layer.forward(&current, ctx)?.output;
        }
        Ok(current)
    }
}

impl UnsupervisedNeuralNetwork<AutoEncoderContext> for AutoEncoder {
    fn train(
        &mut self,
        data: &NeuronsActivation,
        ctx: &AutoEncoderContext,
    ) -> Result<TrainingSummary, NetworkError> {
        train_loop(&mut self.layers, data, ctx)
    }
}

impl AutoEncoderNetwork<AutoEncoderContext> for AutoEncoder {
    fn hidden_neuron_count(&self) -> usize {
        self.encoding_layer().output_neuron_count()
    }

    fn optimal_input_for_hidden_neuron(
        &self,
        neuron: usize,
        ctx: &AutoEncoderContext,
    ) -> Result<NeuronsActivation, NetworkError> {
        self.encoding_layer().optimal_input_for_output_neuron(neuron, ctx)
    }

    fn encode(
        &self,
        input: &NeuronsActivation,
        ctx: &AutoEncoderContext,
    ) -> Result<NeuronsActivation, NetworkError> {
        self.forward_layers(input, &ctx.for_layers(ENCODING_LAYER, ENCODING_LAYER))
    }

    fn decode(
        &self,
        encoded: &NeuronsActivation,
        ctx: &AutoEncoderContext,
    ) -> Result<NeuronsActivation, NetworkError> {
        self.forward_layers(encoded, &ctx.for_layers(DECODING_LAYER, DECODING_LAYER))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::ActivationFunction;
    use crate::layers::axons::AxonsConfig;
    use crate::math::backend::BackendRegistry;
    use crate::math::matrix::Matrix;
    use crate::network::neurons::Neurons;

    fn context() -> AutoEncoderContext {
        AutoEncoderContext::new(BackendRegistry::with_defaults().resolve("blocked").unwrap())
    }

    fn autoencoder(ctx: &AutoEncoderContext, visible: usize, hidden: usize) -> AutoEncoder {
        let encoding = FeedForwardLayer::new(
            "EncodingLayer",
            ctx.factory(),
            AxonsConfig::new(Neurons::new(visible, true), Neurons::new(hidden, false)),
            ActivationFunction::Sigmoid,
        );
        let decoding = FeedForwardLayer::new(
            "DecodingLayer",
            ctx.factory(),
            AxonsConfig::new(Neurons::new(hidden, true), Neurons::new(visible, false)),
            ActivationFunction::Sigmoid,
        );
        AutoEncoder::new("AutoEncoder", encoding, decoding).unwrap()
    }

    #[test]
    fn rejects_layers_that_do_not_chain() {
        let ctx = context();
        let encoding = FeedForwardLayer::new(
            "EncodingLayer",
            ctx.factory(),
            AxonsConfig::new(Neurons::new(6, true), Neurons::new(3, false)),
            ActivationFunction::Sigmoid,
        );
        let decoding = FeedForwardLayer::new(
            "DecodingLayer",
            ctx.factory(),
            AxonsConfig::new(Neurons::new(4, true), Neurons::new(6, false)),
            ActivationFunction::Sigmoid,
        );
        assert!(matches!(
            AutoEncoder::new("AutoEncoder", encoding, decoding),
            Err(NetworkError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn encode_and_decode_use_one_layer_each() {
        let ctx = context();
        let ae = autoencoder(&ctx, 6, 3);
        let input = NeuronsActivation::from_features(Matrix::zeros(6, 2));
        let encoded = ae.encode(&input, &ctx).unwrap();
        assert_eq!(encoded.feature_count(), 3);
        assert_eq!(encoded.example_count(), 2);
        let decoded = ae.decode(&encoded, &ctx).unwrap();
        assert_eq!(decoded.feature_count(), 6);

        // feeding a visible-sized activation to the decoder is a shape error
        assert!(ae.decode(&input, &ctx).is_err());
    }

    #[test]
    fn forward_layers_checks_the_range() {
        let ctx = context();
        let ae = autoencoder(&ctx, 6, 3);
        let input = NeuronsActivation::from_features(Matrix::zeros(6, 1));
        assert_eq!(ae.forward_layers(&input, &ctx).unwrap().feature_count(), 6);
        assert!(matches!(
            ae.forward_layers(&input, &ctx.for_layers(0, 2)),
            Err(NetworkError::LayerOutOfRange { index: 2, layers: 2 })
        ));
        assert!(ae.forward_layers(&input, &ctx.for_layers(1, 0)).is_err());
        assert!(ae.layer(2).is_err());
    }

    #[test]
    fn training_requires_training_context() {
        let ctx = context();
        let mut ae = autoencoder(&ctx, 4, 2);
        let data = NeuronsActivation::from_features(Matrix::zeros(4, 3));
        assert!(matches!(
            ae.train(&data, &ctx),
            Err(NetworkError::InvalidContext(_))
        ));
        let empty = NeuronsActivation::from_features(Matrix::zeros(4, 0));
        assert_eq!(
            ae.train(&empty, &ctx.as_training(1, 0.1)),
            Err(NetworkError::EmptyTrainingSet)
        );
    }

    #[test]
    fn hidden_unit_patterns_cover_every_visible_feature() {
        let ctx = context();
        let ae = autoencoder(&ctx, 6, 3);
        assert_eq!(ae.hidden_neuron_count(), 3);
        let pattern = ae.optimal_input_for_hidden_neuron(2, &ctx).unwrap();
        assert_eq!(pattern.feature_count(), 6);
    }
}
