use crate::math::matrix::{Matrix, MatrixError};

pub struct MseLoss;

impl MseLoss {
    /// Scalar MSE: mean((predicted - expected)²) over every element.
    pub fn loss(predicted: &Matrix, expected: &Matrix) -> Result<f32, MatrixError> {
        let diff = predicted.sub(expected)?;
        let n = diff.as_slice().len().max(1) as f32;
        Ok(diff.as_slice().iter().map(|d| d * d).sum::<f32>() / n)
    }

    /// Per-element gradient: predicted - expected
    pub fn derivative(predicted: &Matrix, expected: &Matrix) -> Result<Matrix, MatrixError> {
        predicted.sub(expected)
    }
}
