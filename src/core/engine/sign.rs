/*!
CRYSTALS-Dilithium digest signing.

Keys are opaque byte strings; the parameter set is recognised from the key
length, so callers never have to carry the algorithm alongside a key.
*/

use pqcrypto_traits::sign::{DetachedSignature as _, PublicKey as _, SecretKey as _};
use serde::{Deserialize, Serialize};

use crate::core::error::{EngineCode, Error, Result};
use super::{ERR_INVALID_PRIVATE_KEY, ERR_INVALID_PUBLIC_KEY};

/// Supported signature parameter sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureAlgorithm {
    Dilithium2,
    Dilithium3,
    Dilithium5,
}

impl Default for SignatureAlgorithm {
    fn default() -> Self {
        SignatureAlgorithm::Dilithium3
    }
}

/// Run `$body` with `$m` bound to the pqcrypto module for `$alg`.
macro_rules! with_scheme {
    ($alg:expr, $m:ident => $body:expr) => {
        match $alg {
            SignatureAlgorithm::Dilithium2 => {
                use pqcrypto_dilithium::dilithium2 as $m;
                $body
            }
            SignatureAlgorithm::Dilithium3 => {
                use pqcrypto_dilithium::dilithium3 as $m;
                $body
            }
            SignatureAlgorithm::Dilithium5 => {
                use pqcrypto_dilithium::dilithium5 as $m;
                $body
            }
        }
    };
}

const ALL: [SignatureAlgorithm; 3] = [
    SignatureAlgorithm::Dilithium2,
    SignatureAlgorithm::Dilithium3,
    SignatureAlgorithm::Dilithium5,
];

impl SignatureAlgorithm {
    pub const fn name(&self) -> &'static str {
        match self {
            SignatureAlgorithm::Dilithium2 => "Dilithium2",
            SignatureAlgorithm::Dilithium3 => "Dilithium3",
            SignatureAlgorithm::Dilithium5 => "Dilithium5",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        ALL.into_iter()
            .find(|alg| alg.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::UnsupportedAlgorithm(name.to_string()))
    }

    pub fn public_key_bytes(&self) -> usize {
        with_scheme!(self, m => m::public_key_bytes())
    }

    pub fn secret_key_bytes(&self) -> usize {
        with_scheme!(self, m => m::secret_key_bytes())
    }

    pub fn signature_bytes(&self) -> usize {
        with_scheme!(self, m => m::signature_bytes())
    }

    /// Recognise the parameter set of a public key
    pub fn from_public_key(public_key: &[u8]) -> std::result::Result<Self, EngineCode> {
        ALL.into_iter()
            .find(|alg| alg.public_key_bytes() == public_key.len())
            .ok_or(EngineCode(ERR_INVALID_PUBLIC_KEY))
    }

    /// Recognise the parameter set of a private key
    pub fn from_private_key(private_key: &[u8]) -> std::result::Result<Self, EngineCode> {
        ALL.into_iter()
            .find(|alg| alg.secret_key_bytes() == private_key.len())
            .ok_or(EngineCode(ERR_INVALID_PRIVATE_KEY))
    }
}

/// Generate a fresh key pair, returned as (public, private)
pub fn generate_keypair(algorithm: SignatureAlgorithm) -> (Vec<u8>, Vec<u8>) {
    with_scheme!(algorithm, m => {
        let (pk, sk) = m::keypair();
        (pk.as_bytes().to_vec(), sk.as_bytes().to_vec())
    })
}

/// Sign a digest with a plain (unprotected) private key
pub fn sign_digest(digest: &[u8], private_key: &[u8]) -> std::result::Result<Vec<u8>, EngineCode> {
    let algorithm = SignatureAlgorithm::from_private_key(private_key)?;
    with_scheme!(algorithm, m => {
        let sk = m::SecretKey::from_bytes(private_key)
            .map_err(|_| EngineCode(ERR_INVALID_PRIVATE_KEY))?;
        Ok(m::detached_sign(digest, &sk).as_bytes().to_vec())
    })
}

/// Check a raw signature over a digest.
///
/// A malformed public key is an error; a signature that does not match,
/// including one of the wrong length, is `Ok(false)`.
pub fn verify_digest(
    digest: &[u8],
    signature: &[u8],
    public_key: &[u8],
) -> std::result::Result<bool, EngineCode> {
    let algorithm = SignatureAlgorithm::from_public_key(public_key)?;
    with_scheme!(algorithm, m => {
        let pk = m::PublicKey::from_bytes(public_key)
            .map_err(|_| EngineCode(ERR_INVALID_PUBLIC_KEY))?;
        let sig = match m::DetachedSignature::from_bytes(signature) {
            Ok(sig) => sig,
            Err(_) => return Ok(false),
        };
        Ok(m::verify_detached_signature(&sig, digest, &pk).is_ok())
    })
}
