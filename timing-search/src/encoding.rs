//! Candidate encoding.
//!
//! A candidate has two forms:
//! - symbolic: a fixed-length string over the alphabet, passed to the oracle
//! - numeric: an integer in `[0, alphabet_size^length - 1]`, used as a swarm
//!   position. Symbol `i` of the alphabet is digit `i` in base
//!   `alphabet_size`, most significant digit first.
//!
//! The numeric → symbolic conversion pads on the left with the first symbol of
//! the alphabet, which for [`Alphabet::digits`] is zero-padding.

use crate::error::{Result, SearchError};
use rand::Rng;
use serde::Serialize;
use std::fmt;

/// Ordered set of symbols a candidate is drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
}

impl Alphabet {
    /// Alphabet from `symbols`, in order.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::EmptyAlphabet` if there are no symbols and
    /// `SearchError::DuplicateSymbol` if a symbol repeats.
    pub fn new<I: IntoIterator<Item = char>>(symbols: I) -> Result<Self> {
        let symbols: Vec<char> = symbols.into_iter().collect();
        if symbols.is_empty() {
            return Err(SearchError::EmptyAlphabet);
        }
        for (i, s) in symbols.iter().enumerate() {
            if symbols[..i].contains(s) {
                return Err(SearchError::DuplicateSymbol { symbol: *s });
            }
        }
        Ok(Self { symbols })
    }

    /// Decimal digits `0..=9`.
    pub fn digits() -> Self {
        Self {
            symbols: ('0'..='9').collect(),
        }
    }

    /// Number of symbols.
    pub fn size(&self) -> usize {
        self.symbols.len()
    }

    /// Symbol at `index`.
    pub fn symbol(&self, index: usize) -> Option<char> {
        self.symbols.get(index).copied()
    }

    /// Index of `symbol`, if it belongs to the alphabet.
    pub fn index_of(&self, symbol: char) -> Option<usize> {
        self.symbols.iter().position(|&s| s == symbol)
    }

    /// Whether `symbol` belongs to the alphabet.
    pub fn contains(&self, symbol: char) -> bool {
        self.symbols.contains(&symbol)
    }

    /// All symbols, in order.
    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::digits()
    }
}

/// One guess at the secret, in symbolic form.
///
/// Only an [`Encoding`] creates candidates, so the length and symbols are
/// always valid for the encoding that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Candidate(String);

impl Candidate {
    pub(crate) fn from_symbols(symbols: &[char]) -> Self {
        Self(symbols.iter().collect())
    }

    /// The candidate as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The candidate's symbols.
    pub fn symbols(&self) -> Vec<char> {
        self.0.chars().collect()
    }

    /// Consume into the underlying string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Candidate {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Bidirectional mapping between symbolic and numeric candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoding {
    alphabet: Alphabet,
    length: usize,
    max_position: u64,
}

impl Encoding {
    /// Encoding of `length`-symbol candidates over `alphabet`.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::ZeroLength` if `length == 0` and
    /// `SearchError::PositionSpaceOverflow` if `alphabet_size^length` does not
    /// fit in a `u64`.
    pub fn new(alphabet: Alphabet, length: usize) -> Result<Self> {
        if length == 0 {
            return Err(SearchError::ZeroLength);
        }
        let overflow = || SearchError::PositionSpaceOverflow {
            alphabet_size: alphabet.size(),
            length,
        };
        let exponent = u32::try_from(length).map_err(|_| overflow())?;
        let space = (alphabet.size() as u64)
            .checked_pow(exponent)
            .ok_or_else(overflow)?;
        Ok(Self {
            alphabet,
            length,
            max_position: space - 1,
        })
    }

    /// Decimal digit strings of `length` symbols.
    pub fn digits(length: usize) -> Result<Self> {
        Self::new(Alphabet::digits(), length)
    }

    /// The alphabet.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Candidate length in symbols.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Largest numeric position, `alphabet_size^length - 1`.
    pub fn max_position(&self) -> u64 {
        self.max_position
    }

    /// Validate `s` as a candidate.
    pub fn parse(&self, s: &str) -> Result<Candidate> {
        let symbols: Vec<char> = s.chars().collect();
        if symbols.len() != self.length {
            return Err(SearchError::InvalidCandidate {
                candidate: s.to_string(),
                reason: format!("expected {} symbols, got {}", self.length, symbols.len()),
            });
        }
        if let Some(bad) = symbols.iter().find(|&&c| !self.alphabet.contains(c)) {
            return Err(SearchError::InvalidCandidate {
                candidate: s.to_string(),
                reason: format!("symbol {:?} is not in the alphabet", bad),
            });
        }
        Ok(Candidate(s.to_string()))
    }

    /// Numeric position → candidate, left-padded to the full length.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::PositionOutOfRange` if `position > max_position`.
    pub fn to_symbolic(&self, position: u64) -> Result<Candidate> {
        if position > self.max_position {
            return Err(SearchError::PositionOutOfRange {
                position,
                max_position: self.max_position,
            });
        }
        let base = self.alphabet.size() as u64;
        let mut indices = vec![0usize; self.length];
        let mut rest = position;
        for slot in indices.iter_mut().rev() {
            *slot = (rest % base) as usize;
            rest /= base;
        }
        Ok(self.candidate_from_indices(&indices))
    }

    /// Candidate → numeric position. Exact inverse of [`to_symbolic`](Self::to_symbolic).
    ///
    /// # Errors
    ///
    /// Returns `SearchError::InvalidCandidate` if `candidate` was not built
    /// for this encoding.
    pub fn to_numeric(&self, candidate: &Candidate) -> Result<u64> {
        let base = self.alphabet.size() as u64;
        Ok(self
            .indices(candidate)?
            .into_iter()
            .fold(0u64, |acc, i| acc * base + i as u64))
    }

    /// Candidate from per-position symbol indices.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::InvalidCandidate` if the length is wrong or an
    /// index is outside the alphabet.
    pub fn from_indices(&self, indices: &[usize]) -> Result<Candidate> {
        if indices.len() != self.length {
            return Err(SearchError::InvalidCandidate {
                candidate: format!("{:?}", indices),
                reason: format!("expected {} symbols, got {}", self.length, indices.len()),
            });
        }
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.alphabet.size()) {
            return Err(SearchError::InvalidCandidate {
                candidate: format!("{:?}", indices),
                reason: format!("symbol index {} outside alphabet of {}", bad, self.alphabet.size()),
            });
        }
        Ok(self.candidate_from_indices(indices))
    }

    /// Per-position symbol indices of `candidate`.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::InvalidCandidate` if the length differs or a
    /// symbol is not in this alphabet.
    pub fn indices(&self, candidate: &Candidate) -> Result<Vec<usize>> {
        let invalid = |reason: String| SearchError::InvalidCandidate {
            candidate: candidate.as_str().to_string(),
            reason,
        };
        let indices = candidate
            .as_str()
            .chars()
            .map(|c| {
                self.alphabet
                    .index_of(c)
                    .ok_or_else(|| invalid(format!("symbol {:?} is not in the alphabet", c)))
            })
            .collect::<Result<Vec<usize>>>()?;
        if indices.len() != self.length {
            return Err(invalid(format!(
                "expected {} symbols, got {}",
                self.length,
                indices.len()
            )));
        }
        Ok(indices)
    }

    /// Indices of a candidate this encoding produced itself.
    pub(crate) fn own_indices(&self, candidate: &Candidate) -> Vec<usize> {
        candidate
            .as_str()
            .chars()
            .map(|c| {
                let index = self.alphabet.index_of(c);
                debug_assert!(index.is_some(), "symbol {c:?} from a foreign encoding");
                index.unwrap_or(0)
            })
            .collect()
    }

    /// Uniformly random candidate.
    pub fn random_candidate<R: Rng + ?Sized>(&self, rng: &mut R) -> Candidate {
        let indices: Vec<usize> = (0..self.length)
            .map(|_| rng.random_range(0..self.alphabet.size()))
            .collect();
        self.candidate_from_indices(&indices)
    }

    pub(crate) fn candidate_from_indices(&self, indices: &[usize]) -> Candidate {
        let symbols: Vec<char> = indices
            .iter()
            .map(|&i| self.alphabet.symbols[i])
            .collect();
        Candidate::from_symbols(&symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_digits_max_position() {
        let enc = Encoding::digits(10).unwrap();
        assert_eq!(enc.max_position(), 9_999_999_999);
        assert_eq!(enc.length(), 10);
    }

    #[test]
    fn test_to_symbolic_zero_pads() {
        let enc = Encoding::digits(10).unwrap();
        assert_eq!(enc.to_symbolic(0).unwrap().as_str(), "0000000000");
        assert_eq!(enc.to_symbolic(42).unwrap().as_str(), "0000000042");
        assert_eq!(enc.to_symbolic(9_999_999_999).unwrap().as_str(), "9999999999");
    }

    #[test]
    fn test_to_symbolic_rejects_out_of_range() {
        let enc = Encoding::digits(3).unwrap();
        let err = enc.to_symbolic(1000).unwrap_err();
        assert!(matches!(
            err,
            SearchError::PositionOutOfRange {
                position: 1000,
                max_position: 999
            }
        ));
    }

    #[test]
    fn test_numeric_is_inverse_of_symbolic() {
        let enc = Encoding::new(Alphabet::new("abc".chars()).unwrap(), 4).unwrap();
        assert_eq!(enc.max_position(), 80);
        for position in [0u64, 1, 2, 3, 26, 80] {
            let c = enc.to_symbolic(position).unwrap();
            assert_eq!(enc.to_numeric(&c).unwrap(), position);
        }
        assert_eq!(enc.to_symbolic(5).unwrap().as_str(), "aabc");
    }

    #[test]
    fn test_parse_validates_length_and_symbols() {
        let enc = Encoding::digits(4).unwrap();
        assert!(enc.parse("0123").is_ok());
        assert!(enc.parse("012").unwrap_err().is_encoding_error());
        assert!(enc.parse("01a3").unwrap_err().is_encoding_error());
    }

    #[test]
    fn test_alphabet_errors() {
        assert!(matches!(
            Alphabet::new(std::iter::empty()),
            Err(SearchError::EmptyAlphabet)
        ));
        assert!(matches!(
            Alphabet::new("abca".chars()),
            Err(SearchError::DuplicateSymbol { symbol: 'a' })
        ));
    }

    #[test]
    fn test_encoding_errors() {
        assert!(matches!(Encoding::digits(0), Err(SearchError::ZeroLength)));
        assert!(matches!(
            Encoding::digits(20),
            Err(SearchError::PositionSpaceOverflow { .. })
        ));
        // 10^19 still fits in u64
        assert!(Encoding::digits(19).is_ok());
    }

    #[test]
    fn test_single_symbol_alphabet() {
        let enc = Encoding::new(Alphabet::new(['x']).unwrap(), 3).unwrap();
        assert_eq!(enc.max_position(), 0);
        assert_eq!(enc.to_symbolic(0).unwrap().as_str(), "xxx");
    }

    #[test]
    fn test_indices_round_trip() {
        let enc = Encoding::digits(5).unwrap();
        let c = enc.parse("90210").unwrap();
        let idx = enc.indices(&c).unwrap();
        assert_eq!(idx, vec![9, 0, 2, 1, 0]);
        assert_eq!(enc.from_indices(&idx).unwrap(), c);
        assert!(enc.from_indices(&[1, 2, 3]).is_err());
        assert!(enc.from_indices(&[1, 2, 3, 4, 10]).is_err());
    }

    #[test]
    fn test_foreign_candidate_is_rejected() {
        let letters = Encoding::new(Alphabet::new("abc".chars()).unwrap(), 4).unwrap();
        let digits = Encoding::digits(4).unwrap();
        let foreign = digits.parse("0120").unwrap();

        let err = letters.to_numeric(&foreign).unwrap_err();
        assert!(err.is_encoding_error());
        match err {
            SearchError::InvalidCandidate { candidate, reason } => {
                assert_eq!(candidate, "0120");
                assert!(reason.contains("'0'"), "reason: {reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(letters.indices(&foreign).is_err());

        let longer = Encoding::digits(5).unwrap();
        assert!(longer.to_numeric(&foreign).unwrap_err().is_encoding_error());
        assert_eq!(digits.to_numeric(&foreign).unwrap(), 120);
    }

    #[test]
    fn test_random_candidate_is_valid() {
        let enc = Encoding::digits(10).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let c = enc.random_candidate(&mut rng);
            assert!(enc.parse(c.as_str()).is_ok());
        }
    }
}
