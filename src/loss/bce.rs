use crate::math::matrix::{Matrix, MatrixError};

pub struct BceLoss;

const EPS: f32 = 1e-7;

impl BceLoss {
    /// Scalar BCE: -mean(y·log(p+ε) + (1-y)·log(1-p+ε))
    pub fn loss(predicted: &Matrix, expected: &Matrix) -> Result<f32, MatrixError> {
        if predicted.shape() != expected.shape() {
            return Err(MatrixError::ShapeMismatch {
                op: "compare",
                left: predicted.shape(),
                right: expected.shape(),
            });
        }
        let n = predicted.as_slice().len().max(1) as f32;
        let total: f32 = predicted.as_slice().iter().zip(expected.as_slice())
            .map(|(p, y)| -(y * (p + EPS).ln() + (1.0 - y) * (1.0 - p + EPS).ln()))
            .sum();
        Ok(total / n)
    }

    /// Per-element gradient: (p - y) / ((p + ε) · (1 - p + ε))
    pub fn derivative(predicted: &Matrix, expected: &Matrix) -> Result<Matrix, MatrixError> {
        let diff = predicted.sub(expected)?;
        let data = diff.as_slice().iter().zip(predicted.as_slice())
            .map(|(d, p)| d / ((p + EPS) * (1.0 - p + EPS)))
            .collect();
        Matrix::from_vec(diff.rows, diff.cols, data)
    }
}
