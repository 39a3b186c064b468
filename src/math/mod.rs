pub mod backend;
pub mod matrix;

pub use backend::{default_backend_name, BackendError, BackendRegistry, MatrixBackend, MatrixFactory};
pub use matrix::{Matrix, MatrixError};
