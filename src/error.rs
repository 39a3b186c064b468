use std::fmt;

use crate::data::csv::DataError;
use crate::demo::config::ConfigError;
use crate::display::DisplayError;
use crate::math::backend::BackendError;
use crate::math::matrix::MatrixError;
use crate::network::error::NetworkError;
use crate::render::mnist::RenderError;

/// Any failure that ends a demo run.
#[derive(Debug)]
pub enum DemoError {
    Config(ConfigError),
    Backend(BackendError),
    Data(DataError),
    Matrix(MatrixError),
    Network(NetworkError),
    Render(RenderError),
    Display(DisplayError),
}

impl fmt::Display for DemoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DemoError::Config(e) => write!(f, "configuration: {}", e),
            DemoError::Backend(e) => write!(f, "backend: {}", e),
            DemoError::Data(e) => write!(f, "data: {}", e),
            DemoError::Matrix(e) => write!(f, "matrix: {}", e),
            DemoError::Network(e) => write!(f, "network: {}", e),
            DemoError::Render(e) => write!(f, "render: {}", e),
            DemoError::Display(e) => write!(f, "display: {}", e),
        }
    }
}

impl std::error::Error for DemoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DemoError::Config(e) => Some(e),
            DemoError::Backend(e) => Some(e),
            DemoError::Data(e) => Some(e),
            DemoError::Matrix(e) => Some(e),
            DemoError::Network(e) => Some(e),
            DemoError::Render(e) => Some(e),
            DemoError::Display(e) => Some(e),
        }
    }
}

macro_rules! impl_from {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for DemoError {
                fn from(e: $ty) -> Self {
                    DemoError::$variant(e)
                }
            }
        )*
    };
}

impl_from! {
    Config => ConfigError,
    Backend => BackendError,
    Data => DataError,
    Matrix => MatrixError,
    Network => NetworkError,
    Render => RenderError,
    Display => DisplayError,
}
