use nalgebra::DVector;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use rand_distr::{Distribution, StandardNormal};

/// Deterministic standard-normal variate source.
///
/// Propagation never draws randomness itself; callers pass variates in, and
/// this is the supplier the tests and demos use. ChaCha20 keeps streams
/// reproducible across platforms for a given seed.
pub struct VariateGenerator {
    rng: ChaCha20Rng,
}

impl VariateGenerator {
    pub fn new(seed: u64) -> Self {
        VariateGenerator {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Independent stream for one path of an ensemble.
    pub fn from_path_id(global_seed: u64, path_id: u64) -> Self {
        // Combine seeds deterministically
        let seed = global_seed.wrapping_add(path_id.wrapping_mul(0x9e3779b97f4a7c15));
        Self::new(seed)
    }

    /// An `n`-dimensional standard-normal column vector.
    pub fn standard_normal(&mut self, n: usize) -> DVector<f64> {
        let values: Vec<f64> = (0..n)
            .map(|_| {
                let sample: f64 = StandardNormal.sample(&mut self.rng);
                sample
            })
            .collect();
        DVector::from_vec(values)
    }

    /// A variate and its mirror image, for antithetic variance reduction.
    pub fn antithetic_pair(&mut self, n: usize) -> (DVector<f64>, DVector<f64>) {
        let z = self.standard_normal(n);
        let mirrored = z.map(|x| -x);
        (z, mirrored)
    }
}
