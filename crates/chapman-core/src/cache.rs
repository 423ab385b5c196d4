use std::cell::RefCell;

use nalgebra::DMatrix;

use crate::distribution::Gaussian;
use crate::error::Result;
use crate::time::TimePoint;

/// Last-value memo for a matrix factor that depends on elapsed time only.
///
/// Holds exactly one `(timedelta, factor)` pair; a different `timedelta`
/// evicts it unconditionally. Simulation loops repeat the same elapsed time
/// call after call, which is the access pattern this serves.
///
/// Interior-mutable so callers keep `&self` while the slot refreshes. The
/// owning process is consequently `!Sync`: confine an instance to one thread
/// at a time and clone it per worker instead.
#[derive(Clone, Debug, Default)]
pub struct FactorCache {
    slot: RefCell<Option<(f64, DMatrix<f64>)>>,
}

impl FactorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached factor for `timedelta`, or `compute()`, stored and
    /// returned.
    pub fn fetch_or<F>(&self, timedelta: f64, compute: F) -> DMatrix<f64>
    where
        F: FnOnce() -> DMatrix<f64>,
    {
        {
            let slot = self.slot.borrow();
            if let Some((cached, factor)) = slot.as_ref() {
                if *cached == timedelta {
                    return factor.clone();
                }
            }
        }
        let factor = compute();
        *self.slot.borrow_mut() = Some((timedelta, factor.clone()));
        factor
    }
}

/// Last-value memo for distributional propagation, keyed on the full
/// `(time, time0, distr0)` call triple.
///
/// `distr0` is compared by value, never by identity: callers routinely
/// rebuild equal distributions between calls.
#[derive(Clone, Debug)]
pub struct DistributionCache<T> {
    slot: RefCell<Option<Entry<T>>>,
}

#[derive(Clone, Debug)]
struct Entry<T> {
    time: T,
    time0: T,
    distr0: Gaussian,
    distr: Gaussian,
}

impl<T> Default for DistributionCache<T> {
    fn default() -> Self {
        DistributionCache {
            slot: RefCell::new(None),
        }
    }
}

impl<T: TimePoint> DistributionCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached propagated distribution for the key triple, or
    /// `compute()`. Only successful computations refresh the slot.
    pub fn fetch_or<F>(&self, time: T, time0: T, distr0: &Gaussian, compute: F) -> Result<Gaussian>
    where
        F: FnOnce() -> Result<Gaussian>,
    {
        {
            let slot = self.slot.borrow();
            if let Some(entry) = slot.as_ref() {
                if entry.time == time && entry.time0 == time0 && entry.distr0 == *distr0 {
                    return Ok(entry.distr.clone());
                }
            }
        }
        let distr = compute()?;
        *self.slot.borrow_mut() = Some(Entry {
            time,
            time0,
            distr0: distr0.clone(),
            distr: distr.clone(),
        });
        Ok(distr)
    }
}
