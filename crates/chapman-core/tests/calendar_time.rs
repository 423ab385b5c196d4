use approx::assert_relative_eq;
use chapman_core::{Gaussian, MarkovProcess, SolvedItoProcess, TimeUnit};
use chapman_models::{OrnsteinUhlenbeckProcess, WienerProcess};
use chrono::{DateTime, NaiveDate, TimeDelta, TimeZone, Utc};
use nalgebra::DVector;

#[test]
fn calendar_elapsed_time_is_normalised_by_the_unit() {
    let w: WienerProcess<DateTime<Utc>> = WienerProcess::scalar(2.0, 1.0);
    let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let t1 = Utc.with_ymd_and_hms(2026, 1, 2, 12, 0, 0).unwrap();

    // 36 hours at one day per unit: 1.5 units of model time.
    let d = w
        .propagate_distribution(t1, t0, &Gaussian::dirac(DVector::zeros(1)))
        .unwrap();
    assert_relative_eq!(d.mean()[0], 3.0, epsilon = 1e-12);
    assert_relative_eq!(d.cov()[(0, 0)], 1.5, epsilon = 1e-12);
}

#[test]
fn changing_the_unit_rescales_elapsed_time() {
    let w: WienerProcess<DateTime<Utc>> =
        WienerProcess::scalar(1.0, 1.0).with_time_unit(TimeUnit::hours(1));
    let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let t1 = Utc.with_ymd_and_hms(2026, 1, 2, 12, 0, 0).unwrap();

    let d = w
        .propagate_distribution(t1, t0, &Gaussian::dirac(DVector::zeros(1)))
        .unwrap();
    assert_relative_eq!(d.mean()[0], 36.0, epsilon = 1e-12);
    assert_relative_eq!(d.cov()[(0, 0)], 36.0, epsilon = 1e-12);
}

#[test]
fn changing_the_unit_discards_memoised_distributions() {
    let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let t1 = t0 + TimeDelta::days(1);
    let d0 = Gaussian::dirac(DVector::zeros(1));

    // Fill the memo under the default day unit.
    let w: WienerProcess<DateTime<Utc>> = WienerProcess::standard();
    let before = w.propagate_distribution(t1, t0, &d0).unwrap();
    assert_relative_eq!(before.cov()[(0, 0)], 1.0, epsilon = 1e-12);

    // The identical query must be re-derived under the new unit, not served
    // from the slot filled above.
    let w = w.with_time_unit(TimeUnit::hours(1));
    let after = w.propagate_distribution(t1, t0, &d0).unwrap();
    assert_relative_eq!(after.cov()[(0, 0)], 24.0, epsilon = 1e-12);

    let fresh: WienerProcess<DateTime<Utc>> =
        WienerProcess::standard().with_time_unit(TimeUnit::hours(1));
    assert_eq!(after, fresh.propagate_distribution(t1, t0, &d0).unwrap());
}

#[test]
fn ou_unit_change_discards_memoised_distributions() {
    let t0 = Utc.with_ymd_and_hms(2026, 2, 10, 0, 0, 0).unwrap();
    let t1 = t0 + TimeDelta::hours(12);
    let d0 = Gaussian::dirac(DVector::from_element(1, 2.0));

    let ou: OrnsteinUhlenbeckProcess<DateTime<Utc>> =
        OrnsteinUhlenbeckProcess::scalar(1.0, 0.0, 1.0).unwrap();
    let seeded = ou.propagate_distribution(t1, t0, &d0).unwrap();

    let ou = ou.with_time_unit(TimeUnit::hours(1));
    let rescaled = ou.propagate_distribution(t1, t0, &d0).unwrap();
    assert_ne!(rescaled, seeded);

    let fresh: OrnsteinUhlenbeckProcess<DateTime<Utc>> =
        OrnsteinUhlenbeckProcess::scalar(1.0, 0.0, 1.0)
            .unwrap()
            .with_time_unit(TimeUnit::hours(1));
    assert_eq!(rescaled, fresh.propagate_distribution(t1, t0, &d0).unwrap());
}

#[test]
fn naive_datetimes_are_supported() {
    let day = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
    let t0 = day.and_hms_opt(9, 0, 0).unwrap();
    let t1 = day.and_hms_opt(21, 0, 0).unwrap();

    let w: WienerProcess<chrono::NaiveDateTime> = WienerProcess::standard();
    let d = w
        .propagate_distribution(t1, t0, &Gaussian::dirac(DVector::zeros(1)))
        .unwrap();
    // 12 hours is half a day.
    assert_relative_eq!(d.cov()[(0, 0)], 0.5, epsilon = 1e-12);
}

#[test]
fn reversed_calendar_instants_are_rejected() {
    let w: WienerProcess<DateTime<Utc>> = WienerProcess::standard();
    let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let t1 = t0 + TimeDelta::hours(1);

    assert!(w
        .propagate_distribution(t0, t1, &Gaussian::standard(1))
        .is_err());
}

#[test]
fn calendar_clock_agrees_with_the_model_clock() {
    let calendar: WienerProcess<DateTime<Utc>> = WienerProcess::scalar(0.5, 2.0);
    let model: WienerProcess = WienerProcess::scalar(0.5, 2.0);

    let t0 = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
    let t1 = t0 + TimeDelta::days(3);
    let d0 = Gaussian::standard(1);

    assert_eq!(
        calendar.propagate_distribution(t1, t0, &d0).unwrap(),
        model.propagate_distribution(3.0, 0.0, &d0).unwrap()
    );
}

#[test]
fn ou_runs_on_a_calendar_clock() {
    let ou: OrnsteinUhlenbeckProcess<DateTime<Utc>> =
        OrnsteinUhlenbeckProcess::scalar(1.0, 0.0, 1.0).unwrap();
    let t0 = Utc.with_ymd_and_hms(2026, 2, 10, 0, 0, 0).unwrap();
    let t1 = t0 + TimeDelta::hours(12);

    let d = ou
        .propagate_distribution(t1, t0, &Gaussian::dirac(DVector::from_element(1, 2.0)))
        .unwrap();
    assert_relative_eq!(d.mean()[0], 2.0 * (-0.5_f64).exp(), epsilon = 1e-10);

    let z = DVector::from_element(1, 0.0);
    let x = ou
        .propagate(t1, &z, t0, &DVector::from_element(1, 2.0))
        .unwrap();
    // A zero variate lands exactly on the conditional mean.
    assert_relative_eq!(x[0], d.mean()[0], epsilon = 1e-12);
}
