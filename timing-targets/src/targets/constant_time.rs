//! Constant-time comparator

/// Compares every symbol regardless of earlier mismatches.
///
/// Serves as a control: its timing carries no information about the secret.
#[derive(Debug, Clone)]
pub struct ConstantTime {
    secret: Vec<char>,
}

impl ConstantTime {
    /// Comparator for `secret`.
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.chars().collect(),
        }
    }

    /// Secret length in symbols.
    pub fn secret_len(&self) -> usize {
        self.secret.len()
    }

    /// Returns `true` if `candidate` equals the secret.
    pub fn validate(&self, candidate: &str) -> bool {
        let mut diff = (candidate.chars().count() != self.secret.len()) as u32;
        let mut chars = candidate.chars();
        for expected in &self.secret {
            let got = chars.next().unwrap_or('\0');
            diff |= std::hint::black_box(*expected as u32 ^ got as u32);
        }
        diff == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_equality() {
        let target = ConstantTime::new("0123456789");
        assert!(target.validate("0123456789"));
        assert!(!target.validate("1123456789"));
        assert!(!target.validate("012345678"));
        assert!(!target.validate("01234567890"));
    }
}
