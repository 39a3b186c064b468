pub mod autoencoder;
pub mod context;
pub mod error;
pub mod neurons;
pub mod unsupervised;

pub use autoencoder::AutoEncoder;
pub use context::AutoEncoderContext;
pub use error::NetworkError;
pub use neurons::{ActivationFormat, Neurons, NeuronsActivation};
pub use unsupervised::{AutoEncoderNetwork, UnsupervisedNeuralNetwork};
