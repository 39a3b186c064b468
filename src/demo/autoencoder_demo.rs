//! Trains a 784→200→784 autoencoder on MNIST rows and shows what it learned.
//!
//! Each phase is a free function over `DemoConfig` so it can be exercised on
//! its own; `AutoEncoderDemo` wires them into `DemoPhases`.

use log::{info, trace};

use crate::data::csv::{load_rows_from_csv, to_f32_rows, PixelFeaturesExtractor};
use crate::demo::config::{DemoConfig, RowRange};
use crate::demo::lifecycle::{run_demo, DemoOutcome, DemoPhases};
use crate::demo::showcase::{showcase, ShowcaseReport};
use crate::display::ImageDisplay;
use crate::error::DemoError;
use crate::layers::axons::AxonsConfig;
use crate::layers::dense::FeedForwardLayer;
use crate::math::backend::{BackendRegistry, MatrixFactory};
use crate::network::autoencoder::AutoEncoder;
use crate::network::context::AutoEncoderContext;
use crate::network::neurons::{ActivationFormat, Neurons, NeuronsActivation};

pub struct AutoEncoderDemo<D: ImageDisplay> {
    config: DemoConfig,
    registry: BackendRegistry,
    display: D,
}

impl<D: ImageDisplay> AutoEncoderDemo<D> {
    pub fn new(config: DemoConfig, display: D) -> AutoEncoderDemo<D> {
        AutoEncoderDemo::with_registry(config, BackendRegistry::with_defaults(), display)
    }

    /// Uses `registry` to resolve the configured backend name.
    pub fn with_registry(config: DemoConfig, registry: BackendRegistry, display: D) -> AutoEncoderDemo<D> {
        AutoEncoderDemo { config, registry, display }
    }

    pub fn config(&self) -> &DemoConfig {
        &self.config
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn phases(&mut self) -> DemoPhases<'_, AutoEncoder, AutoEncoderContext, ShowcaseReport> {
        let config = &self.config;
        let registry = &self.registry;
        let display = &mut self.display;
        DemoPhases {
            create_matrix_factory: Box::new(move || create_matrix_factory(config, registry)),
            load_training_data: Box::new(move |factory: &MatrixFactory| load_training_data(config, factory)),
            create_network_creation_context: Box::new(move |factory: &MatrixFactory| {
                Ok::<_, DemoError>(create_network_creation_context(config, factory))
            }),
            create_network: Box::new(move |feature_count: usize, ctx: &AutoEncoderContext| create_network(config, feature_count, ctx)),
            create_training_context: Box::new(move |ctx: &AutoEncoderContext| create_training_context(config, ctx)),
            create_test_context: Box::new(create_test_context),
            load_test_data: Box::new(move |ctx: &AutoEncoderContext| load_test_data(config, ctx)),
            showcase: Box::new(move |network: &AutoEncoder, test_data: &NeuronsActivation, ctx: &AutoEncoderContext| {
                showcase(network, test_data, ctx, config.showcase_samples, config.pacing(), display)
            }),
        }
    }

    pub fn run(&mut self) -> Result<DemoOutcome<ShowcaseReport>, DemoError> {
        run_demo(self.phases())
    }
}

pub fn create_matrix_factory(config: &DemoConfig, registry: &BackendRegistry) -> Result<MatrixFactory, DemoError> {
    trace!("Creating MatrixFactory");
    let factory = registry.resolve(&config.backend_name())?;
    info!("Using the '{}' matrix backend", factory.backend_name());
    Ok(factory)
}

pub fn load_training_data(config: &DemoConfig, factory: &MatrixFactory) -> Result<NeuronsActivation, DemoError> {
    trace!("Creating training data NeuronsActivation");
    load_sample_rows(config, config.training_rows, factory)
}

pub fn load_test_data(config: &DemoConfig, ctx: &AutoEncoderContext) -> Result<NeuronsActivation, DemoError> {
    trace!("Creating test data NeuronsActivation");
    load_sample_rows(config, config.test_rows, ctx.factory())
}

fn load_sample_rows(
    config: &DemoConfig,
    range: RowRange,
    factory: &MatrixFactory,
) -> Result<NeuronsActivation, DemoError> {
    let rows = load_rows_from_csv(&config.data_path, &PixelFeaturesExtractor, range.start, range.end)?;
    sample_activation(factory, &rows)
}

/// Wraps samples-major rows (one row per image) as a features-major
/// activation with a bias row.
pub fn sample_activation(factory: &MatrixFactory, rows: &[Vec<f64>]) -> Result<NeuronsActivation, DemoError> {
    let samples = factory.create_matrix_from_rows(&to_f32_rows(rows))?;
    Ok(NeuronsActivation::new(
        samples.transpose(),
        ActivationFormat::RowsSpanFeatureSet,
        true,
    ))
}

pub fn create_network_creation_context(config: &DemoConfig, factory: &MatrixFactory) -> AutoEncoderContext {
    AutoEncoderContext::new(factory.clone())
        .with_mini_batch_size(config.mini_batch_size)
        .with_loss(config.loss)
}

/// Encoding layer `feature_count → hidden`, decoding layer `hidden → feature_count`.
/// Both take a bias unit on their input side only.
pub fn create_network(
    config: &DemoConfig,
    feature_count: usize,
    ctx: &AutoEncoderContext,
) -> Result<AutoEncoder, DemoError> {
    let encoding_layer = FeedForwardLayer::new(
        "EncodingLayer",
        ctx.factory(),
        AxonsConfig::new(
            Neurons::new(feature_count, true),
            Neurons::new(config.hidden_neurons, false),
        ),
        config.activation,
    );
    let decoding_layer = FeedForwardLayer::new(
        "DecodingLayer",
        ctx.factory(),
        AxonsConfig::new(
            Neurons::new(config.hidden_neurons, true),
            Neurons::new(feature_count, false),
        ),
        config.activation,
    );
    Ok(AutoEncoder::new("AutoEncoder", encoding_layer, decoding_layer)?)
}

pub fn create_training_context(config: &DemoConfig, creation: &AutoEncoderContext) -> AutoEncoderContext {
    creation.as_training(config.epochs, config.learning_rate)
}

pub fn create_test_context(training: &AutoEncoderContext) -> AutoEncoderContext {
    training.as_inference()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::unsupervised::AutoEncoderNetwork;

    fn factory() -> MatrixFactory {
        BackendRegistry::with_defaults().resolve("blocked").unwrap()
    }

    #[test]
    fn contexts_follow_the_phase_modes() {
        let config = DemoConfig::default();
        let creation = create_network_creation_context(&config, &factory());
        let training = create_training_context(&config, &creation);
        assert!(training.is_training());
        assert_eq!(training.epochs(), 400);
        assert_eq!(training.learning_rate(), 0.1);

        let test = create_test_context(&training);
        assert!(!test.is_training());
        assert!(training.is_training());
    }

    #[test]
    fn network_is_sized_from_the_feature_count() {
        let config = DemoConfig::default();
        let ctx = create_network_creation_context(&config, &factory());
        let network = create_network(&config, 784, &ctx).unwrap();
        assert_eq!(network.encoding_layer().input_neuron_count(), 784);
        assert_eq!(network.hidden_neuron_count(), 200);
        assert_eq!(network.decoding_layer().output_neuron_count(), 784);
        assert!(network.encoding_layer().axons.has_bias());
        assert!(network.decoding_layer().axons.has_bias());
        assert!(!network.encoding_layer().axons.config.right.has_bias);
    }

    #[test]
    fn samples_are_transposed_to_features_major() {
        let rows = vec![vec![0.0, 0.25, 0.5], vec![1.0, 0.75, 0.5]];
        let activation = sample_activation(&factory(), &rows).unwrap();
        assert_eq!(activation.feature_count(), 3);
        assert_eq!(activation.example_count(), 2);
        assert!(activation.bias_appended());
        assert_eq!(activation.features().row(1), &[0.25, 0.75]);
    }

    #[test]
    fn unknown_backend_fails_the_first_phase() {
        let config = DemoConfig {
            backend: Some("quantum".into()),
            ..DemoConfig::default()
        };
        assert!(matches!(
            create_matrix_factory(&config, &BackendRegistry::with_defaults()),
            Err(DemoError::Backend(_))
        ));
    }

    #[test]
    fn missing_data_file_is_reported() {
        let config = DemoConfig {
            data_path: "missing/mnist.csv".into(),
            ..DemoConfig::default()
        };
        assert!(matches!(
            load_training_data(&config, &factory()),
            Err(DemoError::Data(_))
        ));
    }
}
