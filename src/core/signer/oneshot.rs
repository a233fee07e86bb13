/*!
Signing of payloads that fit in memory.

The payload is hashed in one call; verification follows the hash algorithm
named in the envelope.
*/

use crate::core::engine::HashAlgorithm;
use crate::core::error::Result;
use super::base::SignerBase;

/// Signs and verifies payloads held entirely in memory.
#[derive(Debug, Clone, Copy, Default)]
pub struct Signer {
    base: SignerBase,
}

impl Signer {
    pub fn new(hash_algorithm: HashAlgorithm) -> Self {
        Self { base: SignerBase::new(hash_algorithm) }
    }

    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.base.hash_algorithm()
    }

    pub fn sign(&self, data: &[u8], private_key: &[u8], password: Option<&[u8]>) -> Result<Vec<u8>> {
        let digest = self.base.hash_algorithm().hash(data);
        self.base.sign_hash(&digest, private_key, password)
    }

    /// Hashes with the algorithm named in `signature`, not this signer's own
    pub fn verify(&self, data: &[u8], signature: &[u8], public_key: &[u8]) -> Result<bool> {
        let envelope = self.base.unpack_signature(signature)?;
        let digest = envelope.hash_algorithm.hash(data);
        self.base.verify_hash(&digest, &envelope.signature, public_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::SignatureAlgorithm;
    use crate::core::key_pair::KeyPair;

    #[test]
    fn test_sign_verify() -> Result<()> {
        let keys = KeyPair::generate(SignatureAlgorithm::Dilithium2);
        let signer = Signer::default();
        let signature = signer.sign(b"message", keys.private_key(), None)?;
        assert!(signer.verify(b"message", &signature, keys.public_key())?);
        assert!(!signer.verify(b"messagE", &signature, keys.public_key())?);
        Ok(())
    }

    #[test]
    fn test_password_protected_key() -> Result<()> {
        let keys = KeyPair::generate_with_password(SignatureAlgorithm::Dilithium2, b"secret")?;
        let signer = Signer::new(HashAlgorithm::Sha512);
        let signature = signer.sign(b"message", keys.private_key(), Some(b"secret".as_slice()))?;
        assert!(signer.verify(b"message", &signature, keys.public_key())?);

        let err = signer.sign(b"message", keys.private_key(), Some(b"guess".as_slice())).unwrap_err();
        assert_eq!(err.engine_code(), Some(crate::core::engine::ERR_PASSWORD_MISMATCH));
        Ok(())
    }
}
