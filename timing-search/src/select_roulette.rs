use ndarray::Array1;
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;

/// Draw `count` indices with replacement, each with probability proportional
/// to its weight.
///
/// When the weights cannot form a distribution (all zero, negative, NaN or
/// infinite) the draw falls back to uniform choice.
pub(crate) fn select_roulette<R: Rng + ?Sized>(
    weights: &Array1<f64>,
    count: usize,
    rng: &mut R,
) -> Vec<usize> {
    let n = weights.len();
    if n == 0 {
        return Vec::new();
    }
    if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
        log::debug!("roulette weight {} unusable, selecting uniformly", bad);
        return (0..count).map(|_| rng.random_range(0..n)).collect();
    }
    match WeightedIndex::new(weights.iter().copied()) {
        Ok(dist) => (0..count).map(|_| dist.sample(rng)).collect(),
        Err(e) => {
            log::debug!("roulette weights unusable ({}), selecting uniformly", e);
            (0..count).map(|_| rng.random_range(0..n)).collect()
        }
    }
}
