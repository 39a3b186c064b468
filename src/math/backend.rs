use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

use rand::prelude::*;

use crate::math::matrix::{Matrix, MatrixError};

/// Numeric kernel used by a `MatrixFactory`.
pub trait MatrixBackend: Send + Sync {
    fn name(&self) -> &str;

    /// Matrix product `a * b`.
    fn multiply(&self, a: &Matrix, b: &Matrix) -> Result<Matrix, MatrixError>;
}

fn check_product_shapes(a: &Matrix, b: &Matrix) -> Result<(), MatrixError> {
    if a.cols != b.rows {
        return Err(MatrixError::ShapeMismatch {
            op: "multiply",
            left: a.shape(),
            right: b.shape(),
        });
    }
    Ok(())
}

/// Textbook i-j-k product. Slow, but has no layout assumptions.
pub struct NaiveBackend;

impl MatrixBackend for NaiveBackend {
    fn name(&self) -> &str {
        "naive"
    }

    fn multiply(&self, a: &Matrix, b: &Matrix) -> Result<Matrix, MatrixError> {
        check_product_shapes(a, b)?;
        let mut res = Matrix::zeros(a.rows, b.cols);
        for i in 0..a.rows {
            for j in 0..b.cols {
                let mut sum = 0.0;
                for k in 0..a.cols {
                    sum += a.get(i, k) * b.get(k, j);
                }
                res.set(i, j, sum);
            }
        }
        Ok(res)
    }
}

/// i-k-j product that walks both operands along contiguous rows.
pub struct BlockedBackend;

impl MatrixBackend for BlockedBackend {
    fn name(&self) -> &str {
        "blocked"
    }

    fn multiply(&self, a: &Matrix, b: &Matrix) -> Result<Matrix, MatrixError> {
        check_product_shapes(a, b)?;
        let (n, inner, m) = (a.rows, a.cols, b.cols);
        let mut res = Matrix::zeros(n, m);
        let lhs = a.as_slice();
        let rhs = b.as_slice();
        let out = res.as_mut_slice();
        for i in 0..n {
            let out_row = &mut out[i * m..(i + 1) * m];
            for k in 0..inner {
                let aik = lhs[i * inner + k];
                if aik == 0.0 {
                    continue;
                }
                let rhs_row = &rhs[k * m..(k + 1) * m];
                for (o, &bkj) in out_row.iter_mut().zip(rhs_row) {
                    *o += aik * bkj;
                }
            }
        }
        Ok(res)
    }
}

/// Cloneable handle to the backend selected for this run; creates and
/// multiplies matrices.
#[derive(Clone)]
pub struct MatrixFactory {
    backend: Arc<dyn MatrixBackend>,
}

impl fmt::Debug for MatrixFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatrixFactory")
            .field("backend", &self.backend.name())
            .finish()
    }
}

impl MatrixFactory {
    pub fn new(backend: Arc<dyn MatrixBackend>) -> MatrixFactory {
        MatrixFactory { backend }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub fn create_matrix_from_rows(&self, rows: &[Vec<f32>]) -> Result<Matrix, MatrixError> {
        Matrix::from_rows(rows)
    }

    pub fn zeros(&self, rows: usize, cols: usize) -> Matrix {
        Matrix::zeros(rows, cols)
    }

    /// Xavier (Glorot) initialization: samples from N(0, sqrt(1 / cols)).
    ///
    /// `cols` is the fan-in, matching the `(outputs, inputs)` weight layout.
    pub fn xavier(&self, rows: usize, cols: usize) -> Matrix {
        let mut rng = rand::thread_rng();
        let std_dev = (1.0 / cols.max(1) as f64).sqrt();
        let mut res = Matrix::zeros(rows, cols);
        for v in res.as_mut_slice() {
            *v = (sample_standard_normal(&mut rng) * std_dev) as f32;
        }
        res
    }

    pub fn multiply(&self, a: &Matrix, b: &Matrix) -> Result<Matrix, MatrixError> {
        self.backend.multiply(a, b)
    }
}

/// Samples a single value from N(0, 1) using the Box-Muller transform.
fn sample_standard_normal(rng: &mut ThreadRng) -> f64 {
    // Uniform on (0, 1] to avoid log(0).
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = 1.0 - rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    UnknownBackend { name: String, available: Vec<String> },
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::UnknownBackend { name, available } => write!(
                f,
                "unknown matrix backend '{}' (available: {})",
                name,
                available.join(", ")
            ),
        }
    }
}

impl std::error::Error for BackendError {}

type BackendConstructor = Box<dyn Fn() -> Arc<dyn MatrixBackend> + Send + Sync>;

/// Name -> backend constructor table, resolved once at startup.
pub struct BackendRegistry {
    constructors: BTreeMap<String, BackendConstructor>,
}

impl BackendRegistry {
    pub fn empty() -> BackendRegistry {
        BackendRegistry {
            constructors: BTreeMap::new(),
        }
    }

    /// Registry holding the built-in `naive` and `blocked` backends.
    pub fn with_defaults() -> BackendRegistry {
        let mut registry = BackendRegistry::empty();
        registry.register("naive", || Arc::new(NaiveBackend));
        registry.register("blocked", || Arc::new(BlockedBackend));
        registry
    }

    pub fn register<F>(&mut self, name: &str, constructor: F)
    where
        F: Fn() -> Arc<dyn MatrixBackend> + Send + Sync + 'static,
    {
        self.constructors.insert(name.to_owned(), Box::new(constructor));
    }

    pub fn names(&self) -> Vec<String> {
        self.constructors.keys().cloned().collect()
    }

    pub fn resolve(&self, name: &str) -> Result<MatrixFactory, BackendError> {
        match self.constructors.get(name) {
            Some(constructor) => Ok(MatrixFactory::new(constructor())),
            None => Err(BackendError::UnknownBackend {
                name: name.to_owned(),
                available: self.names(),
            }),
        }
    }
}

/// Backend used when the configuration does not name one.
///
/// Apple silicon builds fall back to the plain kernel.
pub fn default_backend_name() -> &'static str {
    if cfg!(all(target_os = "macos", target_arch = "aarch64")) {
        "naive"
    } else {
        "blocked"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operands() -> (Matrix, Matrix) {
        let a = Matrix::from_rows(&[vec![1.0, 2.0, 0.0], vec![0.5, -1.0, 3.0]]).unwrap();
        let b = Matrix::from_rows(&[vec![2.0, 1.0], vec![0.0, -1.0], vec![4.0, 0.5]]).unwrap();
        (a, b)
    }

    #[test]
    fn backends_agree_on_products() {
        let (a, b) = operands();
        let naive = NaiveBackend.multiply(&a, &b).unwrap();
        let blocked = BlockedBackend.multiply(&a, &b).unwrap();
        assert_eq!(naive, blocked);
        assert_eq!(naive.row(0), &[2.0, -1.0]);
        assert_eq!(naive.row(1), &[13.0, 3.0]);
    }

    #[test]
    fn product_rejects_mismatched_shapes() {
        let (a, _) = operands();
        assert!(matches!(
            BlockedBackend.multiply(&a, &a),
            Err(MatrixError::ShapeMismatch { op: "multiply", .. })
        ));
    }

    #[test]
    fn registry_resolves_known_names_and_reports_unknown_ones() {
        let registry = BackendRegistry::with_defaults();
        assert_eq!(registry.resolve("naive").unwrap().backend_name(), "naive");
        assert_eq!(registry.resolve(default_backend_name()).unwrap().backend_name(), default_backend_name());
        let err = registry.resolve("gpu").unwrap_err();
        assert_eq!(
            err,
            BackendError::UnknownBackend {
                name: "gpu".into(),
                available: vec!["blocked".into(), "naive".into()],
            }
        );
    }

    #[test]
    fn registry_accepts_injected_backends() {
        struct Doubling;
        impl MatrixBackend for Doubling {
            fn name(&self) -> &str {
                "doubling"
            }
            fn multiply(&self, a: &Matrix, b: &Matrix) -> Result<Matrix, MatrixError> {
                Ok(NaiveBackend.multiply(a, b)?.scale(2.0))
            }
        }
        let mut registry = BackendRegistry::empty();
        registry.register("doubling", || Arc::new(Doubling));
        let factory = registry.resolve("doubling").unwrap();
        let (a, b) = operands();
        assert_eq!(factory.multiply(&a, &b).unwrap().row(0), &[4.0, -2.0]);
    }

    #[test]
    fn xavier_has_requested_shape() {
        let factory = BackendRegistry::with_defaults().resolve("blocked").unwrap();
        let w = factory.xavier(20, 784);
        assert_eq!(w.shape(), (20, 784));
        assert!(w.as_slice().iter().all(|v| v.is_finite()));
    }
}
