use chapman_core::Process;
use chapman_models::{OrnsteinUhlenbeckProcess, WienerProcess};
use nalgebra::{DMatrix, DVector};

#[test]
fn wiener_equality_across_construction_paths() {
    let direct: WienerProcess = WienerProcess::correlated_2d(0.1, -0.2, 2.0, 1.0, 0.5).unwrap();

    // The same instantaneous covariance, handed in explicitly: the Cholesky
    // route must recover the identical loading.
    let cov = DMatrix::from_row_slice(2, 2, &[4.0, 1.0, 1.0, 1.0]);
    let from_cov =
        WienerProcess::from_cov(DVector::from_vec(vec![0.1, -0.2]), &cov).unwrap();

    assert_eq!(direct, from_cov);
}

#[test]
fn scalar_and_standard_constructors_agree() {
    let a: WienerProcess = WienerProcess::scalar(0.0, 1.0);
    assert_eq!(a, WienerProcess::standard());
    assert_ne!(a, WienerProcess::scalar(0.0, 2.0));
    assert_ne!(a, WienerProcess::scalar(0.1, 1.0));
}

#[test]
fn from_drift_defaults_to_identity_vol() {
    let mean = DVector::from_vec(vec![0.3, -0.1]);
    let a: WienerProcess = WienerProcess::from_drift(mean.clone());
    assert_eq!(a.vol(), &DMatrix::identity(2, 2));
    assert_eq!(a, WienerProcess::new(mean, DMatrix::identity(2, 2)).unwrap());
}

#[test]
fn ou_equality_tracks_mean_and_vol_only() {
    let fast: OrnsteinUhlenbeckProcess = OrnsteinUhlenbeckProcess::scalar(5.0, 0.0, 1.0).unwrap();
    let slow = OrnsteinUhlenbeckProcess::scalar(0.5, 0.0, 1.0).unwrap();
    assert_eq!(fast, slow);

    let other_vol = OrnsteinUhlenbeckProcess::scalar(5.0, 0.0, 2.0).unwrap();
    assert_ne!(fast, other_vol);
    let other_mean = OrnsteinUhlenbeckProcess::scalar(5.0, 1.0, 1.0).unwrap();
    assert_ne!(fast, other_mean);
}

#[test]
fn display_reports_dimensions_and_parameters() {
    let w: WienerProcess = WienerProcess::standard();
    assert_eq!(
        w.to_string(),
        "WienerProcess(process_dim=1, noise_dim=1, mean=[0], vol=[[1]])"
    );

    let ou: OrnsteinUhlenbeckProcess = OrnsteinUhlenbeckProcess::scalar(2.0, 5.0, 1.5).unwrap();
    assert_eq!(
        ou.to_string(),
        "OrnsteinUhlenbeckProcess(process_dim=1, noise_dim=1, transition=[[2]], mean=[5], vol=[[1.5]])"
    );
}

#[test]
fn dimensions_come_from_the_parameters() {
    let w: WienerProcess =
        WienerProcess::from_vol(DMatrix::from_column_slice(3, 2, &[1.0; 6]));
    assert_eq!(w.process_dim(), 3);

    let ou: OrnsteinUhlenbeckProcess =
        OrnsteinUhlenbeckProcess::from_transition(DMatrix::identity(2, 2)).unwrap();
    assert_eq!(ou.process_dim(), 2);
    assert_eq!(ou.mean(), &DVector::zeros(2));
}
