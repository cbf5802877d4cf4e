use crate::encoding::{Candidate, Encoding};
use rand::Rng;

/// With probability `pct`, replace one uniformly chosen position with a
/// uniformly drawn alphabet symbol. The new symbol may equal the old one.
///
/// `pct` must lie in `[0, 1]`; configurations are validated before a run.
pub(crate) fn mutate_point<R: Rng + ?Sized>(
    candidate: Candidate,
    encoding: &Encoding,
    pct: f64,
    rng: &mut R,
) -> Candidate {
    if !rng.random_bool(pct) {
        return candidate;
    }
    let mut indices = encoding.own_indices(&candidate);
    let position = rng.random_range(0..indices.len());
    indices[position] = rng.random_range(0..encoding.alphabet().size());
    encoding.candidate_from_indices(&indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn differing_positions(a: &Candidate, b: &Candidate) -> usize {
        a.as_str()
            .chars()
            .zip(b.as_str().chars())
            .filter(|(x, y)| x != y)
            .count()
    }

    #[test]
    fn test_zero_probability_never_mutates() {
        let enc = Encoding::digits(10).unwrap();
        let mut rng = StdRng::seed_from_u64(21);
        let parent = enc.parse("0123456789").unwrap();
        for _ in 0..1_000 {
            let child = mutate_point(parent.clone(), &enc, 0.0, &mut rng);
            assert_eq!(child, parent);
        }
    }

    #[test]
    fn test_full_probability_touches_at_most_one_position() {
        let enc = Encoding::digits(10).unwrap();
        let mut rng = StdRng::seed_from_u64(22);
        let parent = enc.parse("0123456789").unwrap();
        let mut changed = 0;
        for _ in 0..1_000 {
            let child = mutate_point(parent.clone(), &enc, 1.0, &mut rng);
            let diff = differing_positions(&parent, &child);
            assert!(diff <= 1);
            changed += diff;
        }
        // a redrawn symbol matches the old one 1 time in 10
        assert!((850..=950).contains(&changed), "changed {changed} of 1000");
    }

    #[test]
    fn test_mutation_stays_in_alphabet() {
        let enc = Encoding::new(crate::Alphabet::new("xyz".chars()).unwrap(), 6).unwrap();
        let mut rng = StdRng::seed_from_u64(23);
        let mut c = enc.random_candidate(&mut rng);
        for _ in 0..500 {
            c = mutate_point(c, &enc, 1.0, &mut rng);
            assert!(enc.parse(c.as_str()).is_ok());
        }
    }
}
