use std::borrow::Cow;

use crate::math::matrix::{Matrix, MatrixError};

/// A group of neurons on one side of a set of axons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neurons {
    pub count: usize,
    /// Whether the group carries an extra always-on bias unit.
    pub has_bias: bool,
}

impl Neurons {
    pub fn new(count: usize, has_bias: bool) -> Neurons {
        Neurons { count, has_bias }
    }

    /// A `width x height x depth` image volume, flattened.
    pub fn image(width: usize, height: usize, depth: usize, has_bias: bool) -> Neurons {
        Neurons::new(width * height * depth, has_bias)
    }
}

/// Orientation of a matrix handed to `NeuronsActivation::new`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationFormat {
    /// One row per feature, one column per example.
    RowsSpanFeatureSet,
    /// One row per example, one column per feature.
    ColumnsSpanFeatureSet,
}

/// Activations of a group of neurons for a batch of examples.
///
/// Stored features-major: one row per feature, one column per example. When
/// `bias_appended` is set the last row is a row of ones feeding the bias
/// weights of the next layer and is not counted as a feature.
#[derive(Debug, Clone, PartialEq)]
pub struct NeuronsActivation {
    activations: Matrix,
    bias_appended: bool,
}

impl NeuronsActivation {
    /// Wraps `matrix`, normalising it to features-major order and appending a
    /// unit bias row when `append_bias` is set.
    pub fn new(matrix: Matrix, format: ActivationFormat, append_bias: bool) -> NeuronsActivation {
        let features = match format {
            ActivationFormat::RowsSpanFeatureSet => matrix,
            ActivationFormat::ColumnsSpanFeatureSet => matrix.transpose(),
        };
        let activation = NeuronsActivation::from_features(features);
        if append_bias {
            activation.with_bias()
        } else {
            activation
        }
    }

    /// Features-major matrix without a bias row.
    pub fn from_features(features: Matrix) -> NeuronsActivation {
        NeuronsActivation {
            activations: features,
            bias_appended: false,
        }
    }

    pub fn bias_appended(&self) -> bool {
        self.bias_appended
    }

    pub fn feature_count(&self) -> usize {
        self.activations.rows - usize::from(self.bias_appended)
    }

    pub fn example_count(&self) -> usize {
        self.activations.cols
    }

    /// The raw matrix, including the bias row if present.
    pub fn activations(&self) -> &Matrix {
        &self.activations
    }

    /// Feature rows only.
    pub fn features(&self) -> Cow<'_, Matrix> {
        if self.bias_appended {
            Cow::Owned(drop_last_row(&self.activations))
        } else {
            Cow::Borrowed(&self.activations)
        }
    }

    /// Feature rows followed by a unit bias row.
    pub fn features_with_bias(&self) -> Cow<'_, Matrix> {
        if self.bias_appended {
            Cow::Borrowed(&self.activations)
        } else {
            Cow::Owned(append_ones_row(&self.activations))
        }
    }

    pub fn with_bias(self) -> NeuronsActivation {
        if self.bias_appended {
            return self;
        }
        NeuronsActivation {
            activations: append_ones_row(&self.activations),
            bias_appended: true,
        }
    }

    /// A single-example activation holding column `index`.
    pub fn example(&self, index: usize) -> Result<NeuronsActivation, MatrixError> {
        self.examples(&[index])
    }

    pub fn examples(&self, indices: &[usize]) -> Result<NeuronsActivation, MatrixError> {
        Ok(NeuronsActivation {
            activations: self.activations.columns(indices)?,
            bias_appended: self.bias_appended,
        })
    }
}

fn append_ones_row(m: &Matrix) -> Matrix {
    let mut data = m.row_by_row_array();
    data.extend(std::iter::repeat(1.0).take(m.cols));
    Matrix::from_vec(m.rows + 1, m.cols, data).unwrap_or_default()
}

fn drop_last_row(m: &Matrix) -> Matrix {
    let rows = m.rows.saturating_sub(1);
    let data = m.as_slice()[..rows * m.cols].to_vec();
    Matrix::from_vec(rows, m.cols, data).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> Matrix {
        // 2 examples x 3 features
        Matrix::from_rows(&[vec![0.1, 0.2, 0.3], vec![0.4, 0.5, 0.6]]).unwrap()
    }

    #[test]
    fn columns_span_input_is_stored_features_major() {
        let a = NeuronsActivation::new(samples(), ActivationFormat::ColumnsSpanFeatureSet, false);
        assert_eq!(a.feature_count(), 3);
        assert_eq!(a.example_count(), 2);
        assert_eq!(a.activations().row(0), &[0.1, 0.4]);
    }

    #[test]
    fn bias_row_is_not_a_feature() {
        let a = NeuronsActivation::new(samples().transpose(), ActivationFormat::RowsSpanFeatureSet, true);
        assert!(a.bias_appended());
        assert_eq!(a.feature_count(), 3);
        assert_eq!(a.activations().rows, 4);
        assert_eq!(a.activations().row(3), &[1.0, 1.0]);
        assert_eq!(a.features().shape(), (3, 2));
        assert_eq!(a.features_with_bias().shape(), (4, 2));
    }

    #[test]
    fn example_extraction_keeps_bias_flag() {
        let a = NeuronsActivation::new(samples().transpose(), ActivationFormat::RowsSpanFeatureSet, true);
        let one = a.example(1).unwrap();
        assert_eq!(one.example_count(), 1);
        assert_eq!(one.features().row_by_row_array(), vec![0.4, 0.5, 0.6]);
        assert!(one.bias_appended());
        assert!(a.example(2).is_err());
    }
}
