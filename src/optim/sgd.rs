use crate::layers::axons::FullyConnectedAxons;
use crate::math::matrix::{Matrix, MatrixError};

pub struct Sgd {
    pub learning_rate: f32,
}

impl Sgd {
    pub fn new(learning_rate: f32) -> Sgd {
        Sgd { learning_rate }
    }

    /// Applies one SGD update: `W -= lr * grad`.
    pub fn step(&self, axons: &mut FullyConnectedAxons, weights_grad: &Matrix) -> Result<(), MatrixError> {
        axons.weights = axons.weights.sub(&weights_grad.scale(self.learning_rate))?;
        Ok(())
    }
}
