use crate::encoding::{Candidate, Encoding};
use ndarray::{Array1, Array2};
use rand::Rng;

pub(crate) fn init_population<R: Rng + ?Sized>(
    encoding: &Encoding,
    npop: usize,
    rng: &mut R,
) -> Vec<Candidate> {
    (0..npop).map(|_| encoding.random_candidate(rng)).collect()
}

/// Integer positions drawn uniformly from `[0, upper[j]]` in each dimension.
pub(crate) fn init_positions<R: Rng + ?Sized>(
    npop: usize,
    upper: &Array1<f64>,
    rng: &mut R,
) -> Array2<f64> {
    let n = upper.len();
    let mut pop = Array2::<f64>::zeros((npop, n));
    for i in 0..npop {
        for j in 0..n {
            pop[(i, j)] = rng.random_range(0..=upper[j] as u64) as f64;
        }
    }
    pop
}

/// Velocities drawn uniformly from `[-1, 1]` in each dimension.
pub(crate) fn init_velocities<R: Rng + ?Sized>(npop: usize, n: usize, rng: &mut R) -> Array2<f64> {
    let mut vel = Array2::<f64>::zeros((npop, n));
    for v in vel.iter_mut() {
        *v = rng.random_range(-1.0..=1.0);
    }
    vel
}
