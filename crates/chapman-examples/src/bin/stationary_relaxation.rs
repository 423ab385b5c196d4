use chapman_core::{Gaussian, MarkovProcess, SolvedItoProcess, VariateGenerator};
use chapman_models::OrnsteinUhlenbeckProcess;
use nalgebra::DVector;

fn main() {
    // OU parameters
    let theta = 2.0; // Mean reversion rate
    let mu = 5.0; // Long-run mean
    let sigma = 1.5; // Volatility
    let ou: OrnsteinUhlenbeckProcess =
        OrnsteinUhlenbeckProcess::scalar(theta, mu, sigma).expect("positive reversion rate");

    let x0 = 10.0; // Start away from the mean
    let start = Gaussian::dirac(DVector::from_element(1, x0));
    let stationary_var = sigma * sigma / (2.0 * theta);

    println!("Relaxation of {ou}");
    println!(
        "Initial value: {}, stationary mean: {}, stationary var: {:.4}",
        x0, mu, stationary_var
    );
    println!();

    // Exact distribution at a ladder of horizons, one propagation each.
    for horizon in [0.1, 0.25, 0.5, 1.0, 2.0, 4.0, 8.0] {
        let d = ou
            .propagate_distribution(horizon, 0.0, &start)
            .expect("forward propagation");
        println!(
            "t = {:>5}: mean = {:.4}, var = {:.4}",
            horizon,
            d.mean()[0],
            d.cov()[(0, 0)]
        );
    }

    // A few exact sampled paths on a coarse grid. No discretisation error:
    // each step draws from the true transition law.
    let dt = 0.25;
    let n_steps = 16;
    println!();
    println!("Sampled paths ({} steps of dt = {}):", n_steps, dt);

    for path_id in 0..5 {
        let mut gen = VariateGenerator::from_path_id(42, path_id);
        let mut x = DVector::from_element(1, x0);
        let mut t = 0.0;

        for _ in 0..n_steps {
            let z = gen.standard_normal(1);
            x = ou
                .propagate(t + dt, &z, t, &x)
                .expect("forward propagation");
            t += dt;
        }

        println!("Path {}: X({:.2}) = {:.4}", path_id, t, x[0]);
    }

    println!();
    println!(
        "95% band at t = {}: [{:.4}, {:.4}]",
        dt * n_steps as f64,
        mu - 1.96 * stationary_var.sqrt(),
        mu + 1.96 * stationary_var.sqrt()
    );
}
