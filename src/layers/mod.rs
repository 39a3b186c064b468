pub mod axons;
pub mod dense;

pub use axons::{AxonsConfig, FullyConnectedAxons};
pub use dense::{FeedForwardLayer, LayerActivation};
