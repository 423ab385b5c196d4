use thiserror::Error;

/// Errors surfaced by process construction and propagation.
#[derive(Debug, Error)]
pub enum Error {
    /// Row or length disagreement between supplied parameters, or between a
    /// propagation argument and the process's fixed dimensions.
    #[error("dimension mismatch for {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A matrix that must be square is not.
    #[error("{what} must be square, got {rows}x{cols}")]
    NotSquare {
        what: &'static str,
        rows: usize,
        cols: usize,
    },

    /// Distribution-based sampling needs as many noise sources as state
    /// dimensions; processes with rectangular diffusion must use their own
    /// closed form.
    #[error(
        "distribution-based sampling requires noise_dim == process_dim \
         (process_dim={process_dim}, noise_dim={noise_dim})"
    )]
    UnsupportedConfiguration {
        process_dim: usize,
        noise_dim: usize,
    },

    /// Cholesky factorisation failed: the covariance is singular or
    /// indefinite.
    #[error("covariance is not positive definite")]
    NotPositiveDefinite,

    /// A construction-time inverse does not exist.
    #[error("{what} is singular")]
    SingularMatrix { what: &'static str },

    /// Correlation coefficients live in [-1, 1].
    #[error("correlation must lie in [-1, 1], got {0}")]
    InvalidCorrelation(f64),

    /// Propagation target precedes the start time.
    #[error("cannot propagate backwards in time (elapsed = {0})")]
    BackwardPropagation(f64),
}

/// Result alias used across the workspace.
pub type Result<T> = std::result::Result<T, Error>;
