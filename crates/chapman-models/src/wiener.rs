use std::fmt;

use nalgebra::{DMatrix, DVector};

use chapman_core::cache::DistributionCache;
use chapman_core::linalg::{ensure_len, ensure_rows, format_matrix, format_vector};
use chapman_core::{
    Error, Gaussian, ItoProcess, MarkovProcess, Process, Result, SolvedItoProcess, Time,
    TimePoint, TimeUnit,
};

/// Wiener process (arithmetic Brownian motion): dX_t = mu dt + V dW_t.
///
/// The increment over any interval is Gaussian with mean `mu * dt` and
/// covariance `dt * V V^T`, so propagation over a finite interval is exact.
#[derive(Clone, Debug)]
pub struct WienerProcess<T: TimePoint = f64> {
    mean: DVector<f64>,
    vol: DMatrix<f64>,
    cov: DMatrix<f64>,
    time_unit: TimeUnit,
    memo: DistributionCache<T>,
}

impl<T: TimePoint> WienerProcess<T> {
    /// Standard 1-dimensional Wiener process: zero drift, unit volatility.
    pub fn standard() -> Self {
        Self::scalar(0.0, 1.0)
    }

    /// 1-dimensional process with the given drift rate and volatility.
    pub fn scalar(mean: f64, vol: f64) -> Self {
        Self::build(
            DVector::from_element(1, mean),
            DMatrix::from_element(1, 1, vol),
        )
    }

    /// Multivariate process; `vol` must have one row per state dimension.
    pub fn new(mean: DVector<f64>, vol: DMatrix<f64>) -> Result<Self> {
        ensure_rows(&vol, mean.len(), "vol")?;
        Ok(Self::build(mean, vol))
    }

    /// Driftless process with the given volatility loading.
    pub fn from_vol(vol: DMatrix<f64>) -> Self {
        let dim = vol.nrows();
        Self::build(DVector::zeros(dim), vol)
    }

    /// Process with the given drift and an identity volatility.
    pub fn from_drift(mean: DVector<f64>) -> Self {
        let dim = mean.len();
        Self::build(mean, DMatrix::identity(dim, dim))
    }

    /// Two correlated components from drifts, standard deviations and a
    /// correlation coefficient.
    pub fn correlated_2d(mean1: f64, mean2: f64, sd1: f64, sd2: f64, cor: f64) -> Result<Self> {
        let vol = Gaussian::vol_2d(sd1, sd2, cor)?;
        Self::new(DVector::from_vec(vec![mean1, mean2]), vol)
    }

    /// Process whose instantaneous noise covariance is `cov`; the volatility
    /// loading is its lower Cholesky factor.
    pub fn from_cov(mean: DVector<f64>, cov: &DMatrix<f64>) -> Result<Self> {
        let vol = Gaussian::vol_from_cov(cov)?;
        Self::new(mean, vol)
    }

    /// Replace the default one-day time unit. Clears the distribution memo:
    /// its raw time-point keys are only comparable under a fixed unit.
    pub fn with_time_unit(mut self, unit: TimeUnit) -> Self {
        self.time_unit = unit;
        self.memo = DistributionCache::new();
        self
    }

    fn build(mean: DVector<f64>, vol: DMatrix<f64>) -> Self {
        let cov = &vol * vol.transpose();
        WienerProcess {
            mean,
            vol,
            cov,
            time_unit: TimeUnit::default(),
            memo: DistributionCache::new(),
        }
    }

    /// Drift rate mu.
    pub fn mean(&self) -> &DVector<f64> {
        &self.mean
    }

    /// Volatility loading V.
    pub fn vol(&self) -> &DMatrix<f64> {
        &self.vol
    }

    /// Instantaneous noise covariance V V^T.
    pub fn cov(&self) -> &DMatrix<f64> {
        &self.cov
    }
}

impl<T: TimePoint> Process for WienerProcess<T> {
    fn process_dim(&self) -> usize {
        self.mean.len()
    }
}

impl<T: TimePoint> ItoProcess for WienerProcess<T> {
    fn noise_dim(&self) -> usize {
        self.vol.ncols()
    }

    fn drift(&self, _t: Time, _x: &DVector<f64>) -> DVector<f64> {
        self.mean.clone()
    }

    fn diffusion(&self, _t: Time, _x: &DVector<f64>) -> DMatrix<f64> {
        self.vol.clone()
    }
}

impl<T: TimePoint> SolvedItoProcess<T> for WienerProcess<T> {
    /// `value0 + mu * dt + V * sqrt(dt) * variate`, exact for any interval.
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
        ensure_len(value0, self.process_dim(), "value0")?;
        ensure_len(variate, self.noise_dim(), "variate")?;
        let timedelta = time.elapsed(time0, self.time_unit);
        if timedelta < 0.0 {
            return Err(Error::BackwardPropagation(timedelta));
        }
        Ok(value0 + &self.mean * timedelta + &self.vol * (variate * timedelta.sqrt()))
    }
}

impl<T: TimePoint> MarkovProcess<T> for WienerProcess<T> {
    fn time_unit(&self) -> TimeUnit {
        self.time_unit
    }

    fn distribution_cache(&self) -> &DistributionCache<T> {
        &self.memo
    }

    fn transition_distribution(&self, timedelta: f64, distr0: &Gaussian) -> Result<Gaussian> {
        let mean = distr0.mean() + &self.mean * timedelta;
        let cov = distr0.cov() + &self.cov * timedelta;
        Gaussian::new(mean, cov)
    }
}

impl<T: TimePoint> PartialEq for WienerProcess<T> {
    // cov is derived from vol; the time unit and memo carry no identity.
    fn eq(&self, other: &Self) -> bool {
        self.mean == other.mean && self.vol == other.vol
    }
}

impl<T: TimePoint> fmt::Display for WienerProcess<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WienerProcess(process_dim={}, noise_dim={}, mean={}, vol={})",
            self.process_dim(),
            self.noise_dim(),
            format_vector(&self.mean),
            format_matrix(&self.vol)
        )
    }
}
