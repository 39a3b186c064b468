pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;
pub mod data;
pub mod display;
pub mod render;
pub mod demo;
pub mod error;

// Convenience re-exports
pub use math::{Matrix, MatrixFactory, BackendRegistry};
pub use activation::activation::ActivationFunction;
pub use layers::{AxonsConfig, FeedForwardLayer};
pub use network::{AutoEncoder, AutoEncoderContext, AutoEncoderNetwork, Neurons, NeuronsActivation, UnsupervisedNeuralNetwork};
pub use loss::LossType;
pub use train::{EpochStats, TrainingSummary};
pub use display::ImageDisplay;
pub use demo::{AutoEncoderDemo, DemoConfig};
pub use error::DemoError;
