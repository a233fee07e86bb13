/*!
Random number generation.

[`Random`] owns a deterministic generator seeded once from OS entropy mixed
with caller-supplied personalisation data. Instances are independent; there
is no process-wide generator state.
*/

use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};
use sha2::{Digest, Sha256};

use crate::core::error::Result;

/// Personalised random generator
pub struct Random {
    rng: StdRng,
}

impl Random {
    /// Create a generator personalised with `personal_info`
    pub fn new(personal_info: &[u8]) -> Self {
        let entropy: [u8; 32] = rand::rng().random();
        let mut hasher = Sha256::new();
        hasher.update(entropy);
        hasher.update(personal_info);
        Self {
            rng: StdRng::from_seed(hasher.finalize().into()),
        }
    }

    /// `bytes_num` random bytes
    pub fn randomize(&mut self, bytes_num: usize) -> Vec<u8> {
        let mut out = vec![0u8; bytes_num];
        self.rng.fill_bytes(&mut out);
        out
    }

    /// A uniformly random 32-bit value
    pub fn randomize_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    /// A uniformly random value in `[min, max]`.
    ///
    /// Fails with `ArgumentRange` when `min > max`.
    pub fn randomize_range(&mut self, min: u32, max: u32) -> Result<u32> {
        if min > max {
            return crate::argument_range_err!("minimum {} is greater than maximum {}", min, max);
        }
        Ok(self.rng.random_range(min..=max))
    }
}

impl std::fmt::Debug for Random {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Random { .. }")
    }
}

/// Fresh bytes from the thread-local generator, for nonces and salts
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut out = vec![0u8; len];
    rand::rng().fill_bytes(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Error;

    #[test]
    fn test_randomize_length() {
        let mut random = Random::new(b"tests");
        assert_eq!(random.randomize(0).len(), 0);
        assert_eq!(random.randomize(33).len(), 33);
        assert_ne!(random.randomize(32), random.randomize(32));
    }

    #[test]
    fn test_range() {
        let mut random = Random::new(b"range");
        for _ in 0..100 {
            let v = random.randomize_range(5, 9).unwrap();
            assert!((5..=9).contains(&v));
        }
        assert_eq!(random.randomize_range(4, 4).unwrap(), 4);
    }

    #[test]
    fn test_inverted_range_is_error() {
        let mut random = Random::new(b"range");
        assert!(matches!(random.randomize_range(10, 1), Err(Error::ArgumentRange(_))));
    }
}
