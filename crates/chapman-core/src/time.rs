use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};

/// Dimensionless model time, measured in multiples of a process's
/// [`TimeUnit`].
pub type Time = f64;

/// The duration one unit of model time corresponds to.
///
/// Calendar clocks convert elapsed durations to model time by dividing by
/// this unit; plain `f64` clocks are already in model time and ignore it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeUnit(TimeDelta);

impl TimeUnit {
    pub fn days(n: i64) -> Self {
        TimeUnit(TimeDelta::days(n))
    }

    pub fn hours(n: i64) -> Self {
        TimeUnit(TimeDelta::hours(n))
    }

    pub fn minutes(n: i64) -> Self {
        TimeUnit(TimeDelta::minutes(n))
    }

    pub fn seconds(n: i64) -> Self {
        TimeUnit(TimeDelta::seconds(n))
    }

    /// The underlying duration.
    pub fn delta(&self) -> TimeDelta {
        self.0
    }

    /// Length of the unit in seconds.
    pub fn seconds_f64(&self) -> f64 {
        delta_seconds(self.0)
    }
}

impl Default for TimeUnit {
    /// One calendar day.
    fn default() -> Self {
        TimeUnit::days(1)
    }
}

fn delta_seconds(delta: TimeDelta) -> f64 {
    delta.num_seconds() as f64 + f64::from(delta.subsec_nanos()) * 1e-9
}

/// A point on a propagation clock.
///
/// `f64` instants are interpreted as model time directly. Calendar instants
/// normalise elapsed durations by the owning process's [`TimeUnit`].
pub trait TimePoint: Copy + PartialEq {
    /// Elapsed model time from `earlier` to `self`. Negative when `self`
    /// precedes `earlier`.
    fn elapsed(self, earlier: Self, unit: TimeUnit) -> f64;
}

impl TimePoint for f64 {
    fn elapsed(self, earlier: Self, _unit: TimeUnit) -> f64 {
        self - earlier
    }
}

impl TimePoint for DateTime<Utc> {
    fn elapsed(self, earlier: Self, unit: TimeUnit) -> f64 {
        delta_seconds(self - earlier) / unit.seconds_f64()
    }
}

impl TimePoint for NaiveDateTime {
    fn elapsed(self, earlier: Self, unit: TimeUnit) -> f64 {
        delta_seconds(self - earlier) / unit.seconds_f64()
    }
}
