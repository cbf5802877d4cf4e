use crate::encoding::Candidate;
use rand::Rng;

/// Single-point crossover: `parent1[..cut] + parent2[cut..]`.
///
/// `cut` counts symbols and is clamped to the candidate length.
pub fn do_crossover(parent1: &Candidate, parent2: &Candidate, cut: usize) -> Candidate {
    let lhs = parent1.symbols();
    let rhs = parent2.symbols();
    let cut = cut.min(lhs.len());
    let mut child = Vec::with_capacity(lhs.len());
    child.extend_from_slice(&lhs[..cut]);
    child.extend_from_slice(&rhs[cut..]);
    Candidate::from_symbols(&child)
}

/// Cross two parents at one cut drawn uniformly from `1..=length-1`, returning
/// both complementary children.
///
/// Candidates shorter than two symbols have no interior cut; the parents are
/// returned unchanged.
pub(crate) fn crossover_pair<R: Rng + ?Sized>(
    parent1: &Candidate,
    parent2: &Candidate,
    length: usize,
    rng: &mut R,
) -> (Candidate, Candidate) {
    if length < 2 {
        return (parent1.clone(), parent2.clone());
    }
    let cut = rng.random_range(1..length);
    (
        do_crossover(parent1, parent2, cut),
        do_crossover(parent2, parent1, cut),
    )
}
