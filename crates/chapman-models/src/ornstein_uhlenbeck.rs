use std::fmt;

use nalgebra::{Cholesky, DMatrix, DVector};
use tracing::trace;

use chapman_core::cache::{DistributionCache, FactorCache};
use chapman_core::linalg::{
    ensure_len, ensure_rows, ensure_square, format_matrix, format_vector, kron_sum, unvectorize,
    vectorize,
};
use chapman_core::{
    Error, Gaussian, ItoProcess, MarkovProcess, Process, Result, SolvedItoProcess, Time,
    TimePoint, TimeUnit,
};

/// Ornstein-Uhlenbeck process: dX_t = -M (X_t - mu) dt + V dW_t.
///
/// The transition matrix `M` pulls the state towards the long-run mean `mu`.
/// The solution over a finite interval is Gaussian with moments that depend
/// on elapsed time only:
///
/// ```text
/// mean(dt) = exp(-dt M) x0 + (I - exp(-dt M)) mu
/// cov(dt)  = unvec( (M (+) M)^-1 (I - exp(-dt (M (+) M))) vec(V V^T) )
/// ```
///
/// where `(+)` is the Kronecker sum. The Kronecker-sum machinery and its
/// inverse are fixed at construction; the two time-dependent exponentials
/// sit behind single-slot caches keyed on elapsed time.
#[derive(Clone, Debug)]
pub struct OrnsteinUhlenbeckProcess<T: TimePoint = f64> {
    transition: DMatrix<f64>,
    mean: DVector<f64>,
    vol: DMatrix<f64>,
    cov: DMatrix<f64>,
    cov_vec: DVector<f64>,
    transition_kron_sum: DMatrix<f64>,
    transition_kron_sum_inv: DMatrix<f64>,
    time_unit: TimeUnit,
    reversion_factor: FactorCache,
    reversion_factor_squared: FactorCache,
    memo: DistributionCache<T>,
}

impl<T: TimePoint> OrnsteinUhlenbeckProcess<T> {
    /// Standard 1-dimensional process: unit reversion rate, zero mean, unit
    /// volatility.
    pub fn standard() -> Self {
        // The 1x1 unit transition has Kronecker sum [[2]].
        OrnsteinUhlenbeckProcess {
            transition: DMatrix::identity(1, 1),
            mean: DVector::zeros(1),
            vol: DMatrix::identity(1, 1),
            cov: DMatrix::identity(1, 1),
            cov_vec: DVector::from_element(1, 1.0),
            transition_kron_sum: DMatrix::from_element(1, 1, 2.0),
            transition_kron_sum_inv: DMatrix::from_element(1, 1, 0.5),
            time_unit: TimeUnit::default(),
            reversion_factor: FactorCache::new(),
            reversion_factor_squared: FactorCache::new(),
            memo: DistributionCache::new(),
        }
    }

    /// 1-dimensional process with reversion rate `theta`, long-run mean `mu`
    /// and volatility `sigma`.
    pub fn scalar(theta: f64, mu: f64, sigma: f64) -> Result<Self> {
        Self::new(
            DMatrix::from_element(1, 1, theta),
            DVector::from_element(1, mu),
            DMatrix::from_element(1, 1, sigma),
        )
    }

    /// Full multivariate process.
    ///
    /// `transition` must be square with one row per state dimension, and its
    /// Kronecker sum with itself must be invertible; a zero transition fails
    /// with [`Error::SingularMatrix`].
    pub fn new(transition: DMatrix<f64>, mean: DVector<f64>, vol: DMatrix<f64>) -> Result<Self> {
        ensure_square(&transition, "transition")?;
        ensure_rows(&transition, mean.len(), "transition")?;
        ensure_rows(&vol, mean.len(), "vol")?;

        let cov = &vol * vol.transpose();
        let cov_vec = vectorize(&cov);
        let transition_kron_sum = kron_sum(&transition, &transition)?;
        let transition_kron_sum_inv = transition_kron_sum
            .clone()
            .try_inverse()
            .ok_or(Error::SingularMatrix {
                what: "transition Kronecker sum",
            })?;

        Ok(OrnsteinUhlenbeckProcess {
            transition,
            mean,
            vol,
            cov,
            cov_vec,
            transition_kron_sum,
            transition_kron_sum_inv,
            time_unit: TimeUnit::default(),
            reversion_factor: FactorCache::new(),
            reversion_factor_squared: FactorCache::new(),
            memo: DistributionCache::new(),
        })
    }

    /// Mean-reverting towards zero with identity volatility.
    pub fn from_transition(transition: DMatrix<f64>) -> Result<Self> {
        let dim = transition.nrows();
        Self::new(transition, DVector::zeros(dim), DMatrix::identity(dim, dim))
    }

    /// Replace the default one-day time unit. Clears the distribution memo:
    /// its raw time-point keys are only comparable under a fixed unit. The
    /// factor caches stay, keyed on already-normalised elapsed time.
    pub fn with_time_unit(mut self, unit: TimeUnit) -> Self {
        self.time_unit = unit;
        self.memo = DistributionCache::new();
        self
    }

    /// Transition matrix M.
    pub fn transition(&self) -> &DMatrix<f64> {
        &self.transition
    }

    /// Long-run mean mu.
    pub fn mean(&self) -> &DVector<f64> {
        &self.mean
    }

    /// Volatility loading V.
    pub fn vol(&self) -> &DMatrix<f64> {
        &self.vol
    }

    /// `exp(-dt M)`: decay of deviations from the long-run mean over
    /// `timedelta`. Cached for the most recent `timedelta`.
    pub fn mean_reversion_factor(&self, timedelta: f64) -> DMatrix<f64> {
        self.reversion_factor.fetch_or(timedelta, || {
            trace!(timedelta, "computing mean-reversion factor");
            (&self.transition * -timedelta).exp()
        })
    }

    /// `exp(-dt (M (+) M))`: the factor governing covariance decay, cached
    /// independently of [`mean_reversion_factor`](Self::mean_reversion_factor).
    pub fn mean_reversion_factor_squared(&self, timedelta: f64) -> DMatrix<f64> {
        self.reversion_factor_squared.fetch_or(timedelta, || {
            trace!(timedelta, "computing squared mean-reversion factor");
            (&self.transition_kron_sum * -timedelta).exp()
        })
    }

    /// Process-noise covariance accumulated over an interval of length
    /// `timedelta`, the finite-horizon Lyapunov solution in vectorised form.
    pub fn noise_covariance(&self, timedelta: f64) -> Result<DMatrix<f64>> {
        let dim = self.process_dim();
        let decay = DMatrix::identity(dim * dim, dim * dim)
            - self.mean_reversion_factor_squared(timedelta);
        unvectorize(&(&self.transition_kron_sum_inv * decay * &self.cov_vec), dim)
    }
}

impl<T: TimePoint> Process for OrnsteinUhlenbeckProcess<T> {
    fn process_dim(&self) -> usize {
        self.mean.len()
    }
}

impl<T: TimePoint> ItoProcess for OrnsteinUhlenbeckProcess<T> {
    fn noise_dim(&self) -> usize {
        self.vol.ncols()
    }

    fn drift(&self, _t: Time, x: &DVector<f64>) -> DVector<f64> {
        -(&self.transition * (x - &self.mean))
    }

    fn diffusion(&self, _t: Time, _x: &DVector<f64>) -> DMatrix<f64> {
        self.vol.clone()
    }
}

impl<T: TimePoint> SolvedItoProcess<T> for OrnsteinUhlenbeckProcess<T> {
    /// Exact one-step sample: the conditional mean plus the Cholesky factor
    /// of the accumulated noise covariance applied to `variate`.
    ///
    /// The sampling factor is `process_dim` wide, so `variate` must have
    /// `process_dim` entries even when the diffusion is rectangular.
    fn propagate(
        &self,
        time: T,
        variate: &DVector<f64>,
        time0: T,
        value0: &DVector<f64>,
    ) -> Result<DVector<f64>> {
        if time == time0 {
            return Ok(value0.clone());
        }
        let dim = self.process_dim();
        ensure_len(value0, dim, "value0")?;
        ensure_len(variate, dim, "variate")?;
        let timedelta = time.elapsed(time0, self.time_unit);
        if timedelta < 0.0 {
            return Err(Error::BackwardPropagation(timedelta));
        }
        let mrf = self.mean_reversion_factor(timedelta);
        let mean = &mrf * value0 + (DMatrix::identity(dim, dim) - &mrf) * &self.mean;
        let chol = Cholesky::new(self.noise_covariance(timedelta)?)
            .ok_or(Error::NotPositiveDefinite)?;
        Ok(mean + chol.l() * variate)
    }
}

impl<T: TimePoint> MarkovProcess<T> for OrnsteinUhlenbeckProcess<T> {
    fn time_unit(&self) -> TimeUnit {
        self.time_unit
    }

    fn distribution_cache(&self) -> &DistributionCache<T> {
        &self.memo
    }

    fn transition_distribution(&self, timedelta: f64, distr0: &Gaussian) -> Result<Gaussian> {
        let dim = self.process_dim();
        let mrf = self.mean_reversion_factor(timedelta);
        let mean = &mrf * distr0.mean() + (DMatrix::identity(dim, dim) - &mrf) * &self.mean;
        let cov = &mrf * distr0.cov() * mrf.transpose() + self.noise_covariance(timedelta)?;
        Gaussian::new(mean, cov)
    }
}

impl<T: TimePoint> PartialEq for OrnsteinUhlenbeckProcess<T> {
    // TODO: decide whether `transition` belongs in the comparison; processes
    // with different reversion speeds but equal mean and vol compare equal.
    fn eq(&self, other: &Self) -> bool {
        self.mean == other.mean && self.vol == other.vol
    }
}

impl<T: TimePoint> fmt::Display for OrnsteinUhlenbeckProcess<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OrnsteinUhlenbeckProcess(process_dim={}, noise_dim={}, transition={}, mean={}, vol={})",
            self.process_dim(),
            self.noise_dim(),
            format_matrix(&self.transition),
            format_vector(&self.mean),
            format_matrix(&self.vol)
        )
    }
}
