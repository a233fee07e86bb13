/*!
Shared signer plumbing: envelope packing and digest sign/verify.
*/

use crate::core::asn1::{Asn1Compatible, Asn1Reader, Asn1Writer};
use crate::core::engine::{sign, HashAlgorithm};
use crate::core::error::Result;
use crate::core::key_pair::resolve_private_key;

/// Self-describing signature.
///
/// ```text
/// Signature ::= SEQUENCE {
///     digestAlgorithm  AlgorithmIdentifier,
///     signature        OCTET STRING }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureEnvelope {
    pub hash_algorithm: HashAlgorithm,
    pub signature: Vec<u8>,
}

impl Asn1Compatible for SignatureEnvelope {
    fn asn1_write(&self, writer: &mut Asn1Writer) -> Result<usize> {
        let mut len = writer.write_octet_string(&self.signature);
        len += self.hash_algorithm.asn1_write(writer)?;
        Ok(len + writer.write_sequence(len))
    }

    fn asn1_read(reader: &mut Asn1Reader<'_>) -> Result<Self> {
        let mut seq = reader.read_sequence()?;
        let hash_algorithm = HashAlgorithm::asn1_read(&mut seq)?;
        let signature = seq.read_octet_string()?;
        seq.finish()?;
        Ok(Self { hash_algorithm, signature })
    }
}

/// Hash algorithm selection plus envelope handling.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignerBase {
    hash_algorithm: HashAlgorithm,
}

impl SignerBase {
    pub fn new(hash_algorithm: HashAlgorithm) -> Self {
        Self { hash_algorithm }
    }

    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.hash_algorithm
    }

    pub fn set_hash_algorithm(&mut self, hash_algorithm: HashAlgorithm) {
        self.hash_algorithm = hash_algorithm;
    }

    /// Wrap a raw signature made over a digest of the current algorithm
    pub fn pack_signature(&self, signature: Vec<u8>) -> Result<Vec<u8>> {
        SignatureEnvelope {
            hash_algorithm: self.hash_algorithm,
            signature,
        }
        .to_asn1()
    }

    /// Parse an envelope; a missing or unknown algorithm is an encoding error
    pub fn unpack_signature(&self, signature: &[u8]) -> Result<SignatureEnvelope> {
        SignatureEnvelope::from_asn1(signature)
    }

    /// Sign `digest` and pack the result
    pub fn sign_hash(&self, digest: &[u8], private_key: &[u8], password: Option<&[u8]>) -> Result<Vec<u8>> {
        let private_key = resolve_private_key(private_key, password)?;
        let signature = sign::sign_digest(digest, &private_key)?;
        self.pack_signature(signature)
    }

    /// Check a raw signature over `digest`
    pub fn verify_hash(&self, digest: &[u8], signature: &[u8], public_key: &[u8]) -> Result<bool> {
        Ok(sign::verify_digest(digest, signature, public_key)?)
    }
}
