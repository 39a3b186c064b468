use crate::loss::loss_type::LossType;
use crate::math::backend::MatrixFactory;

/// Runtime settings for building, training and driving an autoencoder.
///
/// Contexts are values: each phase derives its own copy (`as_training`,
/// `as_inference`, `for_layers`) and earlier snapshots are never changed.
#[derive(Debug, Clone)]
pub struct AutoEncoderContext {
    factory: MatrixFactory,
    training: bool,
    epochs: usize,
    learning_rate: f32,
    mini_batch_size: Option<usize>,
    loss: LossType,
    start_layer: usize,
    end_layer: Option<usize>,
}

impl AutoEncoderContext {
    /// An inference-mode context spanning every layer, with no training budget.
    pub fn new(factory: MatrixFactory) -> AutoEncoderContext {
        AutoEncoderContext {
            factory,
            training: false,
            epochs: 0,
            learning_rate: 0.0,
            mini_batch_size: None,
            loss: LossType::default(),
            start_layer: 0,
            end_layer: None,
        }
    }

    pub fn as_training(&self, epochs: usize, learning_rate: f32) -> AutoEncoderContext {
        AutoEncoderContext {
            training: true,
            epochs,
            learning_rate,
            ..self.clone()
        }
    }

    pub fn as_inference(&self) -> AutoEncoderContext {
        AutoEncoderContext {
            training: false,
            ..self.clone()
        }
    }

    /// Restricts forward propagation to layers `start..=end`.
    pub fn for_layers(&self, start: usize, end: usize) -> AutoEncoderContext {
        AutoEncoderContext {
            start_layer: start,
            end_layer: Some(end),
            ..self.clone()
        }
    }

    /// `None` trains on the whole set at once.
    pub fn with_mini_batch_size(&self, size: Option<usize>) -> AutoEncoderContext {
        AutoEncoderContext {
            mini_batch_size: size,
            ..self.clone()
        }
    }

    pub fn with_loss(&self, loss: LossType) -> AutoEncoderContext {
        AutoEncoderContext { loss, ..self.clone() }
    }

    pub fn factory(&self) -> &MatrixFactory {
        &self.factory
    }

    pub fn is_training(&self) -> bool {
        self.training
    }

    pub fn epochs(&self) -> usize {
        self.epochs
    }

    pub fn learning_rate(&self) -> f32 {
        self.learning_rate
    }

    pub fn mini_batch_size(&self) -> Option<usize> {
        self.mini_batch_size
    }

    pub fn loss(&self) -> LossType {
        self.loss
    }

    pub fn start_layer(&self) -> usize {
        self.start_layer
    }

    pub fn end_layer(&self) -> Option<usize> {
        self.end_layer
    }
}
