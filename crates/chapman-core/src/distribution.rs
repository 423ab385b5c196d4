use std::fmt;

use approx::{AbsDiffEq, RelativeEq};
use nalgebra::{Cholesky, DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::linalg::{ensure_square, format_matrix, format_vector};

/// A multivariate Gaussian, the value that distributional propagation
/// produces and consumes.
///
/// Equality is structural on `(mean, cov)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Gaussian {
    mean: DVector<f64>,
    cov: DMatrix<f64>,
}

impl Gaussian {
    /// A Gaussian with the given mean vector and covariance matrix.
    pub fn new(mean: DVector<f64>, cov: DMatrix<f64>) -> Result<Self> {
        ensure_square(&cov, "covariance")?;
        if cov.nrows() != mean.len() {
            return Err(Error::DimensionMismatch {
                what: "covariance",
                expected: mean.len(),
                actual: cov.nrows(),
            });
        }
        Ok(Gaussian { mean, cov })
    }

    /// A 1-dimensional Gaussian.
    pub fn scalar(mean: f64, var: f64) -> Self {
        Gaussian {
            mean: DVector::from_element(1, mean),
            cov: DMatrix::from_element(1, 1, var),
        }
    }

    /// The degenerate zero-covariance distribution concentrated at `mean`.
    pub fn dirac(mean: DVector<f64>) -> Self {
        let dim = mean.len();
        Gaussian {
            mean,
            cov: DMatrix::zeros(dim, dim),
        }
    }

    /// Zero mean, identity covariance.
    pub fn standard(dim: usize) -> Self {
        Gaussian {
            mean: DVector::zeros(dim),
            cov: DMatrix::identity(dim, dim),
        }
    }

    pub fn mean(&self) -> &DVector<f64> {
        &self.mean
    }

    pub fn cov(&self) -> &DMatrix<f64> {
        &self.cov
    }

    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    /// Lower-triangular 2x2 volatility loading with per-component standard
    /// deviations `sd1`, `sd2` and correlation `cor`.
    pub fn vol_2d(sd1: f64, sd2: f64, cor: f64) -> Result<DMatrix<f64>> {
        if !(-1.0..=1.0).contains(&cor) {
            return Err(Error::InvalidCorrelation(cor));
        }
        Ok(DMatrix::from_row_slice(
            2,
            2,
            &[sd1, 0.0, cor * sd2, (1.0 - cor * cor).sqrt() * sd2],
        ))
    }

    /// Lower Cholesky factor of `cov`, the volatility loading that
    /// reproduces it.
    pub fn vol_from_cov(cov: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        ensure_square(cov, "covariance")?;
        Cholesky::new(cov.clone())
            .map(|chol| chol.l())
            .ok_or(Error::NotPositiveDefinite)
    }
}

impl fmt::Display for Gaussian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Gaussian(mean={}, cov={})",
            format_vector(&self.mean),
            format_matrix(&self.cov)
        )
    }
}

impl AbsDiffEq for Gaussian {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.mean.abs_diff_eq(&other.mean, epsilon) && self.cov.abs_diff_eq(&other.cov, epsilon)
    }
}

impl RelativeEq for Gaussian {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.mean.relative_eq(&other.mean, epsilon, max_relative)
            && self.cov.relative_eq(&other.cov, epsilon, max_relative)
    }
}
