use std::fmt;

/// Dense row-major `f32` matrix.
///
/// Activations flowing through the autoencoder are stored "rows span the
/// feature set": each row is one feature (pixel or hidden unit) and each
/// column is one example.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    data: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MatrixError {
    ShapeMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },
    RaggedRows { row: usize, expected: usize, found: usize },
    BufferLength { expected: usize, found: usize },
    ColumnOutOfBounds { index: usize, cols: usize },
    Empty,
}

impl fmt::Display for MatrixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixError::ShapeMismatch { op, left, right } => write!(
                f,
                "cannot {} a {}x{} matrix with a {}x{} matrix",
                op, left.0, left.1, right.0, right.1
            ),
            MatrixError::RaggedRows { row, expected, found } => write!(
                f,
                "row {} has {} columns, expected {}",
                row, found, expected
            ),
            MatrixError::BufferLength { expected, found } => write!(
                f,
                "buffer holds {} values, expected {}",
                found, expected
            ),
            MatrixError::ColumnOutOfBounds { index, cols } => write!(
                f,
                "column {} out of bounds for a matrix with {} columns",
                index, cols
            ),
            MatrixError::Empty => write!(f, "cannot build a matrix from zero rows"),
        }
    }
}

impl std::error::Error for MatrixError {}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn from_vec(rows: usize, cols: usize, data: Vec<f32>) -> Result<Matrix, MatrixError> {
        if data.len() != rows * cols {
            return Err(MatrixError::BufferLength {
                expected: rows * cols,
                found: data.len(),
            });
        }
        Ok(Matrix { rows, cols, data })
    }

    /// Builds a matrix whose i-th row is `rows[i]`. All rows must share a width.
    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Matrix, MatrixError> {
        let first = rows.first().ok_or(MatrixError::Empty)?;
        let cols = first.len();
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(MatrixError::RaggedRows {
                    row: i,
                    expected: cols,
                    found: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Matrix {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// An `n x 1` column vector.
    pub fn from_column(values: Vec<f32>) -> Matrix {
        Matrix {
            rows: values.len(),
            cols: 1,
            data: values,
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.data[row * self.cols + col] = value;
    }

    pub fn row(&self, row: usize) -> &[f32] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Flat copy of the values, row after row.
    pub fn row_by_row_array(&self) -> Vec<f32> {
        self.data.clone()
    }

    pub fn column(&self, index: usize) -> Result<Matrix, MatrixError> {
        self.columns(&[index])
    }

    /// Gathers the given columns, in order, into a new `rows x indices.len()` matrix.
    pub fn columns(&self, indices: &[usize]) -> Result<Matrix, MatrixError> {
        if let Some(&bad) = indices.iter().find(|&&c| c >= self.cols) {
            return Err(MatrixError::ColumnOutOfBounds {
                index: bad,
                cols: self.cols,
            });
        }
        let mut res = Matrix::zeros(self.rows, indices.len());
        for r in 0..self.rows {
            let src = self.row(r);
            for (j, &c) in indices.iter().enumerate() {
                res.data[r * res.cols + j] = src[c];
            }
        }
        Ok(res)
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                res.data[j * res.cols + i] = self.data[i * self.cols + j];
            }
        }
        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f32) -> f32,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&x| functor(x)).collect(),
        }
    }

    pub fn scale(&self, factor: f32) -> Matrix {
        self.map(|x| x * factor)
    }

    pub fn add(&self, rhs: &Matrix) -> Result<Matrix, MatrixError> {
        self.zip_with(rhs, "add", |a, b| a + b)
    }

    pub fn sub(&self, rhs: &Matrix) -> Result<Matrix, MatrixError> {
        self.zip_with(rhs, "subtract", |a, b| a - b)
    }

    /// Element-wise (Hadamard) product.
    pub fn hadamard(&self, rhs: &Matrix) -> Result<Matrix, MatrixError> {
        self.zip_with(rhs, "multiply element-wise", |a, b| a * b)
    }

    /// Adds an `rows x 1` column to every column of `self`.
    pub fn add_column_broadcast(&self, column: &Matrix) -> Result<Matrix, MatrixError> {
        if column.cols != 1 || column.rows != self.rows {
            return Err(MatrixError::ShapeMismatch {
                op: "broadcast-add",
                left: self.shape(),
                right: column.shape(),
            });
        }
        let mut res = self.clone();
        for r in 0..self.rows {
            let b = column.data[r];
            for v in &mut res.data[r * self.cols..(r + 1) * self.cols] {
                *v += b;
            }
        }
        Ok(res)
    }

    /// Sums across columns, producing a `rows x 1` column.
    pub fn sum_rows(&self) -> Matrix {
        Matrix::from_column((0..self.rows).map(|r| self.row(r).iter().sum()).collect())
    }

    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }

    fn zip_with<F>(&self, rhs: &Matrix, op: &'static str, f: F) -> Result<Matrix, MatrixError>
    where
        F: Fn(f32, f32) -> f32,
    {
        if self.shape() != rhs.shape() {
            return Err(MatrixError::ShapeMismatch {
                op,
                left: self.shape(),
                right: rhs.shape(),
            });
        }
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .zip(rhs.data.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
        })
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Matrix {
        Matrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap()
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let err = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert_eq!(err, MatrixError::RaggedRows { row: 1, expected: 2, found: 1 });
        assert_eq!(Matrix::from_rows(&[]).unwrap_err(), MatrixError::Empty);
    }

    #[test]
    fn transpose_swaps_rows_and_columns() {
        let t = sample().transpose();
        assert_eq!(t.shape(), (3, 2));
        assert_eq!(t.row(0), &[1.0, 4.0]);
        assert_eq!(t.row(2), &[3.0, 6.0]);
    }

    #[test]
    fn column_extraction_and_bounds() {
        let m = sample();
        let c = m.column(1).unwrap();
        assert_eq!(c.shape(), (2, 1));
        assert_eq!(c.as_slice(), &[2.0, 5.0]);
        assert!(matches!(
            m.column(3),
            Err(MatrixError::ColumnOutOfBounds { index: 3, cols: 3 })
        ));
        assert_eq!(m.columns(&[2, 0]).unwrap().row_by_row_array(), vec![3.0, 1.0, 6.0, 4.0]);
    }

    #[test]
    fn broadcast_and_row_sums() {
        let m = sample();
        let bias = Matrix::from_column(vec![10.0, 20.0]);
        let shifted = m.add_column_broadcast(&bias).unwrap();
        assert_eq!(shifted.row(1), &[24.0, 25.0, 26.0]);
        assert_eq!(m.sum_rows().as_slice(), &[6.0, 15.0]);
        assert!(m.add_column_broadcast(&Matrix::from_column(vec![1.0])).is_err());
    }

    #[test]
    fn elementwise_ops_check_shapes() {
        let m = sample();
        assert_eq!(m.sub(&m).unwrap().sum(), 0.0);
        assert_eq!(m.hadamard(&m).unwrap().row(0), &[1.0, 4.0, 9.0]);
        assert!(m.add(&m.transpose()).is_err());
    }
}
