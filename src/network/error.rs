use std::fmt;

use crate::math::matrix::MatrixError;

#[derive(Debug, Clone, PartialEq)]
pub enum NetworkError {
    Matrix(MatrixError),
    /// An activation reached a layer with the wrong number of features.
    ShapeMismatch { layer: String, expected: usize, found: usize },
    /// The context is in the wrong mode for the requested operation.
    InvalidContext(String),
    NeuronOutOfRange { neuron: usize, count: usize },
    LayerOutOfRange { index: usize, layers: usize },
    EmptyTrainingSet,
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::Matrix(e) => write!(f, "matrix error: {}", e),
            NetworkError::ShapeMismatch { layer, expected, found } => write!(
                f,
                "{} expects {} input features but received {}",
                layer, expected, found
            ),
            NetworkError::InvalidContext(msg) => write!(f, "invalid context: {}", msg),
            NetworkError::NeuronOutOfRange { neuron, count } => write!(
                f,
                "output neuron {} out of range (layer has {})",
                neuron, count
            ),
            NetworkError::LayerOutOfRange { index, layers } => write!(
                f,
                "layer {} out of range (network has {})",
                index, layers
            ),
            NetworkError::EmptyTrainingSet => write!(f, "training data contains no examples"),
        }
    }
}

impl std::error::Error for NetworkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NetworkError::Matrix(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MatrixError> for NetworkError {
    fn from(e: MatrixError) -> Self {
        NetworkError::Matrix(e)
    }
}
