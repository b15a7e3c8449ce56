//! Random short identifier generation.
//!
//! Candidates are drawn uniformly from the 52-letter ASCII alphabet. The
//! generator is pure: it never consults storage, so a candidate is not
//! guaranteed to be unused. The registry resolves duplicate URLs; duplicate
//! identifiers for distinct URLs are accepted as a (vanishingly unlikely)
//! possibility at this code-space size.

use rand::Rng;

/// Upper- and lowercase ASCII letters, 52 symbols.
const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Source of candidate short identifiers.
#[cfg_attr(test, mockall::automock)]
pub trait IdGenerator: Send + Sync {
    /// Produces a random string of `length` alphabet symbols.
    fn generate(&self, length: usize) -> String;
}

/// Thread-local RNG backed generator.
#[derive(Debug, Default)]
pub struct RandomIdGenerator;

impl RandomIdGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl IdGenerator for RandomIdGenerator {
    fn generate(&self, length: usize) -> String {
        let mut rng = rand::rng();
        (0..length)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_has_requested_length() {
        let generator = RandomIdGenerator::new();
        assert_eq!(generator.generate(8).len(), 8);
        assert_eq!(generator.generate(1).len(), 1);
        assert_eq!(generator.generate(32).len(), 32);
    }

    #[test]
    fn test_generate_zero_length_is_empty() {
        let generator = RandomIdGenerator::new();
        assert!(generator.generate(0).is_empty());
    }

    #[test]
    fn test_generate_uses_letters_only() {
        let generator = RandomIdGenerator::new();
        let id = generator.generate(256);
        assert!(id.chars().all(|c| c.is_ascii_alphabetic()));
    }

    #[test]
    fn test_generate_produces_unique_ids() {
        let generator = RandomIdGenerator::new();
        let mut ids = HashSet::new();

        for _ in 0..1000 {
            ids.insert(generator.generate(8));
        }

        assert_eq!(ids.len(), 1000);
    }
}
