/*!
Key derivation and key wrapping.

HKDF-SHA256 turns shared secrets and passwords into 256-bit keys;
ChaCha20-Poly1305 seals small secrets (content keys, private keys) under
them.
*/

use chacha20poly1305::{
    aead::{Aead, KeyInit, Payload},
    ChaCha20Poly1305, Key, Nonce,
};
use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::core::constants::sizes::chacha::{KEY_BYTES, NONCE_BYTES};
use crate::core::error::EngineCode;
use super::{ERR_AUTH_FAILED, ERR_BAD_INPUT_DATA, ERR_ENCRYPTION_FAILED, ERR_KEY_DERIVATION_FAILED};

/// Derive a 256-bit key from input keying material
pub fn derive_key(
    ikm: &[u8],
    salt: &[u8],
    info: &[u8],
) -> Result<Zeroizing<[u8; KEY_BYTES]>, EngineCode> {
    let hk = Hkdf::<Sha256>::new(Some(salt), ikm);
    let mut okm = Zeroizing::new([0u8; KEY_BYTES]);
    hk.expand(info, &mut okm[..])
        .map_err(|_| EngineCode(ERR_KEY_DERIVATION_FAILED))?;
    Ok(okm)
}

/// Encrypt and authenticate `plaintext`
pub fn seal(
    key: &[u8; KEY_BYTES],
    nonce: &[u8],
    aad: &[u8],
    plaintext: &[u8],
) -> Result<Vec<u8>, EngineCode> {
    if nonce.len() != NONCE_BYTES {
        return Err(EngineCode(ERR_BAD_INPUT_DATA));
    }
    let cipher = ChaCha20Poly1305::new(Key::from_slice(key));
    cipher
        .encrypt(Nonce::from_slice(nonce), Payload { msg: plaintext, aad })
        .map_err(|_| EngineCode(ERR_ENCRYPTION_FAILED))
}

/// Authenticate and decrypt `ciphertext`; tampering yields `ERR_AUTH_FAILED`
pub fn open(
    key: &[u8; KEY_BYTES],
    nonce: &[u8],
    aad: &[u8],
    ciphertext: &[u8],
) -> Result<Zeroizing<Vec<u8>>, EngineCode> {
    if nonce.len() != NONCE_BYTES {
        return Err(EngineCode(ERR_BAD_INPUT_DATA));
    }
    let cipher = ChaCha20Poly1305::new(Key::from_slice(key));
    cipher
        .decrypt(Nonce::from_slice(nonce), Payload { msg: ciphertext, aad })
        .map(Zeroizing::new)
        .map_err(|_| EngineCode(ERR_AUTH_FAILED))
}
