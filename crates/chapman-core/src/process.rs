use std::fmt;

use nalgebra::{Cholesky, DMatrix, DVector};

use crate::cache::DistributionCache;
use crate::distribution::Gaussian;
use crate::error::{Error, Result};
use crate::linalg::ensure_len;
use crate::time::{Time, TimePoint, TimeUnit};

/// Root of the capability hierarchy: anything with a fixed state dimension
/// and a printable description.
pub trait Process: fmt::Display {
    /// Dimensionality of the state vector, fixed at construction.
    fn process_dim(&self) -> usize;
}

/// A process defined by drift and diffusion functions of `(time, state)`.
///
/// The closed-form processes in this workspace never evaluate these
/// themselves; the methods are the seam through which numerical SDE
/// integrators can consume any process.
pub trait ItoProcess: Process {
    /// Dimensionality of the driving noise (columns of the diffusion).
    fn noise_dim(&self) -> usize {
        self.process_dim()
    }

    /// Instantaneous deterministic rate of change mu(t, x).
    fn drift(&self, t: Time, x: &DVector<f64>) -> DVector<f64>;

    /// Loading sigma(t, x) mapping noise increments into state space,
    /// `process_dim x noise_dim`.
    fn diffusion(&self, t: Time, x: &DVector<f64>) -> DMatrix<f64>;
}

/// Sample-propagation capability: advance a concrete state over a finite
/// interval in one exact step.
pub trait SolvedItoProcess<T: TimePoint>: ItoProcess {
    /// The state at `time`, given state `value0` at `time0` and the
    /// standard-normal draw `variate`.
    ///
    /// When `time == time0` this returns `value0` unchanged, whatever the
    /// variate.
    fn propagate(
        &self,
        time: T,
        variate: &DVector<f64>,
        time0: T,
        value0: &DVector<f64>,
    ) -> Result<DVector<f64>>;
}

/// Distribution-propagation capability: advance the state's full law.
pub trait MarkovProcess<T: TimePoint>: Process {
    /// Duration of one unit of model time.
    fn time_unit(&self) -> TimeUnit;

    /// The single-slot memo refreshed by
    /// [`propagate_distribution`](MarkovProcess::propagate_distribution).
    fn distribution_cache(&self) -> &DistributionCache<T>;

    /// Distribution after `timedelta` units of model time, starting from
    /// `distr0`. Receives the already-normalised, non-negative elapsed time;
    /// implementations need not re-check it.
    fn transition_distribution(&self, timedelta: f64, distr0: &Gaussian) -> Result<Gaussian>;

    /// The distribution of the state at `time`, given that it is `distr0`
    /// at `time0`.
    ///
    /// Equal times return `distr0` unchanged. Otherwise the one-slot memo is
    /// consulted under the `(time, time0, distr0)` key and refreshed on a
    /// miss.
    fn propagate_distribution(&self, time: T, time0: T, distr0: &Gaussian) -> Result<Gaussian> {
        if time == time0 {
            return Ok(distr0.clone());
        }
        if distr0.dim() != self.process_dim() {
            return Err(Error::DimensionMismatch {
                what: "initial distribution",
                expected: self.process_dim(),
                actual: distr0.dim(),
            });
        }
        let timedelta = time.elapsed(time0, self.time_unit());
        if timedelta < 0.0 {
            return Err(Error::BackwardPropagation(timedelta));
        }
        self.distribution_cache()
            .fetch_or(time, time0, distr0, || {
                self.transition_distribution(timedelta, distr0)
            })
    }
}

/// Both capabilities at once. Blanket-implemented; useful as a bound.
pub trait SolvedItoMarkovProcess<T: TimePoint>: SolvedItoProcess<T> + MarkovProcess<T> {}

impl<T: TimePoint, P: SolvedItoProcess<T> + MarkovProcess<T>> SolvedItoMarkovProcess<T> for P {}

/// Advance a concrete state by sampling from the propagated distribution:
/// `value(t) = mean(t) + chol(cov(t)) * variate`, where the distribution is
/// `value0` treated as a Dirac delta and pushed forward to `time`.
///
/// Requires as many noise sources as state dimensions; processes with
/// rectangular diffusion must use their own closed form. The Cholesky factor
/// is recomputed on every call; only the distribution behind it is memoised.
pub fn propagate_via_distribution<T, P>(
    process: &P,
    time: T,
    variate: &DVector<f64>,
    time0: T,
    value0: &DVector<f64>,
) -> Result<DVector<f64>>
where
    T: TimePoint,
    P: ItoProcess + MarkovProcess<T> + ?Sized,
{
    if process.noise_dim() != process.process_dim() {
        return Err(Error::UnsupportedConfiguration {
            process_dim: process.process_dim(),
            noise_dim: process.noise_dim(),
        });
    }
    if time == time0 {
        return Ok(value0.clone());
    }
    ensure_len(value0, process.process_dim(), "value0")?;
    ensure_len(variate, process.noise_dim(), "variate")?;
    let distr = process.propagate_distribution(time, time0, &Gaussian::dirac(value0.clone()))?;
    let chol = Cholesky::new(distr.cov().clone()).ok_or(Error::NotPositiveDefinite)?;
    Ok(distr.mean() + chol.l() * variate)
}
