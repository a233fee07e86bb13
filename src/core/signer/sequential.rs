/*!
Chunk-at-a-time signer.

A session starts with [`start_signing`](SequentialSigner::start_signing) or
[`start_verifying`](SequentialSigner::start_verifying), accepts any number of
[`update`](SequentialSigner::update) calls in stream order, and ends with
exactly one [`sign`](SequentialSigner::sign) or
[`verify`](SequentialSigner::verify). Memory use is bounded by the hash state
regardless of payload size.
*/

use std::fmt;

use tracing::debug;

use crate::core::engine::{Hash, HashAlgorithm};
use crate::core::error::Result;
use super::base::SignerBase;

/// Lifecycle of a [`SequentialSigner`] session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignerState {
    Idle,
    Signing,
    Verifying,
}

impl fmt::Display for SignerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignerState::Idle => write!(f, "Idle"),
            SignerState::Signing => write!(f, "Signing"),
            SignerState::Verifying => write!(f, "Verifying"),
        }
    }
}

/// Incremental signer and verifier.
#[derive(Debug, Default)]
pub struct SequentialSigner {
    base: SignerBase,
    state: SignerState,
    hash: Option<Hash>,
    signature: Option<Vec<u8>>,
}

impl Default for SignerState {
    fn default() -> Self {
        SignerState::Idle
    }
}

impl SequentialSigner {
    /// Signer that hashes with `hash_algorithm` unless an envelope says otherwise
    pub fn new(hash_algorithm: HashAlgorithm) -> Self {
        Self {
            base: SignerBase::new(hash_algorithm),
            ..Self::default()
        }
    }

    pub fn state(&self) -> SignerState {
        self.state
    }

    /// Algorithm the current (or next) session hashes with
    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.base.hash_algorithm()
    }

    fn reset(&mut self) {
        self.state = SignerState::Idle;
        self.hash = None;
        self.signature = None;
    }

    /// Begin a signing session, discarding any previous one
    pub fn start_signing(&mut self) {
        self.reset();
        self.hash = Some(Hash::start(self.base.hash_algorithm()));
        self.state = SignerState::Signing;
        debug!(hash = self.base.hash_algorithm().name(), "signing session started");
    }

    /// Begin verifying `signature`, discarding any previous session.
    ///
    /// Switches this signer to the envelope's hash algorithm if it differs.
    pub fn start_verifying(&mut self, signature: &[u8]) -> Result<()> {
        self.reset();
        let envelope = self.base.unpack_signature(signature)?;
        if envelope.hash_algorithm != self.base.hash_algorithm() {
            debug!(
                from = self.base.hash_algorithm().name(),
                to = envelope.hash_algorithm.name(),
                "switching hash algorithm to match signature"
            );
            self.base.set_hash_algorithm(envelope.hash_algorithm);
        }
        self.hash = Some(Hash::start(envelope.hash_algorithm));
        self.signature = Some(envelope.signature);
        self.state = SignerState::Verifying;
        debug!(hash = envelope.hash_algorithm.name(), "verifying session started");
        Ok(())
    }

    /// Feed the next chunk of the payload
    pub fn update(&mut self, data: &[u8]) -> Result<()> {
        match self.hash.as_mut() {
            Some(hash) => {
                hash.update(data);
                Ok(())
            }
            None => crate::invalid_state_err!("Signing or Verifying", self.state),
        }
    }

    /// Finish the signing session and return the packed envelope
    pub fn sign(&mut self, private_key: &[u8], password: Option<&[u8]>) -> Result<Vec<u8>> {
        if self.state != SignerState::Signing {
            return crate::invalid_state_err!(SignerState::Signing, self.state);
        }
        let hash = self.hash.take();
        self.reset();
        let digest = match hash {
            Some(hash) => hash.finish(),
            None => return crate::invalid_state_err!(SignerState::Signing, SignerState::Idle),
        };
        let envelope = self.base.sign_hash(&digest, private_key, password)?;
        debug!(signature_len = envelope.len(), "signing session finished");
        Ok(envelope)
    }

    /// Finish the verifying session.
    ///
    /// A signature that does not match is `Ok(false)`, not an error.
    pub fn verify(&mut self, public_key: &[u8]) -> Result<bool> {
        if self.state != SignerState::Verifying {
            return crate::invalid_state_err!(SignerState::Verifying, self.state);
        }
        let hash = self.hash.take();
        let signature = self.signature.take();
        self.reset();
        let (digest, signature) = match (hash, signature) {
            (Some(hash), Some(signature)) => (hash.finish(), signature),
            _ => return crate::invalid_state_err!(SignerState::Verifying, SignerState::Idle),
        };
        let valid = self.base.verify_hash(&digest, &signature, public_key)?;
        debug!(valid, "verifying session finished");
        Ok(valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::SignatureAlgorithm;
    use crate::core::error::Error;
    use crate::core::key_pair::KeyPair;

    #[test]
    fn test_update_requires_session() {
        let mut signer = SequentialSigner::default();
        assert!(matches!(signer.update(b"data"), Err(Error::InvalidState { .. })));
        assert!(matches!(signer.verify(b"key"), Err(Error::InvalidState { .. })));
    }

    #[test]
    fn test_session_ends_after_sign() -> Result<()> {
        let keys = KeyPair::generate(SignatureAlgorithm::Dilithium2);
        let mut signer = SequentialSigner::new(HashAlgorithm::Sha256);
        signer.start_signing();
        signer.update(b"chunk one")?;
        signer.update(b"")?;
        let envelope = signer.sign(keys.private_key(), None)?;
        assert_eq!(signer.state(), SignerState::Idle);
        assert!(matches!(signer.update(b"late"), Err(Error::InvalidState { .. })));

        signer.start_verifying(&envelope)?;
        assert_eq!(signer.state(), SignerState::Verifying);
        signer.update(b"chunk ")?;
        signer.update(b"one")?;
        assert!(signer.verify(keys.public_key())?);
        Ok(())
    }

    #[test]
    fn test_restart_discards_state() -> Result<()> {
        let keys = KeyPair::generate(SignatureAlgorithm::Dilithium2);
        let mut signer = SequentialSigner::default();
        signer.start_signing();
        signer.update(b"garbage that is thrown away")?;
        signer.start_signing();
        signer.update(b"payload")?;
        let envelope = signer.sign(keys.private_key(), None)?;

        signer.start_verifying(&envelope)?;
        signer.update(b"payload")?;
        assert!(signer.verify(keys.public_key())?);
        Ok(())
    }

    #[test]
    fn test_bad_envelope_leaves_signer_idle() {
        let mut signer = SequentialSigner::default();
        signer.start_signing();
        assert!(matches!(signer.start_verifying(&[0x30, 0x00]), Err(Error::Encoding(_))));
        assert_eq!(signer.state(), SignerState::Idle);
    }
}
