/*!
Message digests.

[`HashAlgorithm`] names the supported SHA-2 variants and knows how to
describe itself as a DER AlgorithmIdentifier. [`Hash`] is the incremental
accumulator used by the sequential signers.
*/

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};

use crate::core::asn1::{Asn1Compatible, Asn1Reader, Asn1Writer};
use crate::core::error::{Error, Result};

const OID_SHA224: &[u8] = &[0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x04];
const OID_SHA256: &[u8] = &[0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x01];
const OID_SHA384: &[u8] = &[0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x02];
const OID_SHA512: &[u8] = &[0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x03];

/// Supported digest algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithm {
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl Default for HashAlgorithm {
    fn default() -> Self {
        HashAlgorithm::Sha384
    }
}

impl HashAlgorithm {
    /// Canonical algorithm name
    pub const fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha224 => "SHA224",
            HashAlgorithm::Sha256 => "SHA256",
            HashAlgorithm::Sha384 => "SHA384",
            HashAlgorithm::Sha512 => "SHA512",
        }
    }

    /// Look up an algorithm by name (case-insensitive)
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_ascii_uppercase().as_str() {
            "SHA224" => Ok(HashAlgorithm::Sha224),
            "SHA256" => Ok(HashAlgorithm::Sha256),
            "SHA384" => Ok(HashAlgorithm::Sha384),
            "SHA512" => Ok(HashAlgorithm::Sha512),
            _ => Err(Error::UnsupportedAlgorithm(name.to_string())),
        }
    }

    /// DER-encoded object identifier content
    pub const fn oid(&self) -> &'static [u8] {
        match self {
            HashAlgorithm::Sha224 => OID_SHA224,
            HashAlgorithm::Sha256 => OID_SHA256,
            HashAlgorithm::Sha384 => OID_SHA384,
            HashAlgorithm::Sha512 => OID_SHA512,
        }
    }

    pub fn from_oid(oid: &[u8]) -> Option<Self> {
        [
            HashAlgorithm::Sha224,
            HashAlgorithm::Sha256,
            HashAlgorithm::Sha384,
            HashAlgorithm::Sha512,
        ]
        .into_iter()
        .find(|alg| alg.oid() == oid)
    }

    /// Digest length in bytes
    pub const fn digest_size(&self) -> usize {
        match self {
            HashAlgorithm::Sha224 => 28,
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha384 => 48,
            HashAlgorithm::Sha512 => 64,
        }
    }

    /// One-shot digest of `data`
    pub fn hash(&self, data: &[u8]) -> Vec<u8> {
        let mut hash = Hash::start(*self);
        hash.update(data);
        hash.finish()
    }
}

/// AlgorithmIdentifier ::= SEQUENCE { algorithm OID, parameters NULL }
impl Asn1Compatible for HashAlgorithm {
    fn asn1_write(&self, writer: &mut Asn1Writer) -> Result<usize> {
        let mut len = writer.write_null();
        len += writer.write_oid(self.oid());
        Ok(len + writer.write_sequence(len))
    }

    fn asn1_read(reader: &mut Asn1Reader<'_>) -> Result<Self> {
        let mut seq = reader.read_sequence()?;
        let oid = seq.read_oid()?;
        let algorithm = HashAlgorithm::from_oid(&oid).ok_or_else(|| {
            Error::Encoding(format!("unrecognized hash algorithm identifier {}", hex::encode(&oid)))
        })?;
        if seq.has_data() {
            seq.read_null()?;
        }
        seq.finish()?;
        Ok(algorithm)
    }
}

enum HashState {
    Sha224(Sha224),
    Sha256(Sha256),
    Sha384(Sha384),
    Sha512(Sha512),
}

/// Incremental digest accumulator.
pub struct Hash {
    algorithm: HashAlgorithm,
    state: HashState,
}

impl Hash {
    /// Begin a fresh digest computation
    pub fn start(algorithm: HashAlgorithm) -> Self {
        let state = match algorithm {
            HashAlgorithm::Sha224 => HashState::Sha224(Sha224::new()),
            HashAlgorithm::Sha256 => HashState::Sha256(Sha256::new()),
            HashAlgorithm::Sha384 => HashState::Sha384(Sha384::new()),
            HashAlgorithm::Sha512 => HashState::Sha512(Sha512::new()),
        };
        Self { algorithm, state }
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn update(&mut self, data: &[u8]) {
        match &mut self.state {
            HashState::Sha224(h) => h.update(data),
            HashState::Sha256(h) => h.update(data),
            HashState::Sha384(h) => h.update(data),
            HashState::Sha512(h) => h.update(data),
        }
    }

    /// Consume the accumulator and return the digest
    pub fn finish(self) -> Vec<u8> {
        match self.state {
            HashState::Sha224(h) => h.finalize().to_vec(),
            HashState::Sha256(h) => h.finalize().to_vec(),
            HashState::Sha384(h) => h.finalize().to_vec(),
            HashState::Sha512(h) => h.finalize().to_vec(),
        }
    }
}

impl std::fmt::Debug for Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hash").field("algorithm", &self.algorithm).finish_non_exhaustive()
    }
}
