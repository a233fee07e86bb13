/*!
CRYSTALS-Kyber768 key encapsulation for key recipients.
*/

use pqcrypto_kyber::kyber768;
use pqcrypto_traits::kem::{Ciphertext as _, PublicKey as _, SecretKey as _, SharedSecret as _};
use zeroize::Zeroizing;

use crate::core::error::EngineCode;
use super::{ERR_DECRYPTION_FAILED, ERR_INVALID_PRIVATE_KEY, ERR_INVALID_PUBLIC_KEY};

/// Generate a recipient key pair, returned as (public, private)
pub fn generate_keypair() -> (Vec<u8>, Vec<u8>) {
    let (pk, sk) = kyber768::keypair();
    (pk.as_bytes().to_vec(), sk.as_bytes().to_vec())
}

/// Encapsulate a fresh shared secret to `public_key`.
///
/// Returns the shared secret and the ciphertext to ship to the recipient.
pub fn encapsulate(
    public_key: &[u8],
) -> Result<(Zeroizing<Vec<u8>>, Vec<u8>), EngineCode> {
    let pk = kyber768::PublicKey::from_bytes(public_key)
        .map_err(|_| EngineCode(ERR_INVALID_PUBLIC_KEY))?;
    let (ss, ct) = kyber768::encapsulate(&pk);
    Ok((Zeroizing::new(ss.as_bytes().to_vec()), ct.as_bytes().to_vec()))
}

/// Recover the shared secret from an encapsulation ciphertext
pub fn decapsulate(
    ciphertext: &[u8],
    private_key: &[u8],
) -> Result<Zeroizing<Vec<u8>>, EngineCode> {
    let sk = kyber768::SecretKey::from_bytes(private_key)
        .map_err(|_| EngineCode(ERR_INVALID_PRIVATE_KEY))?;
    let ct = kyber768::Ciphertext::from_bytes(ciphertext)
        .map_err(|_| EngineCode(ERR_DECRYPTION_FAILED))?;
    let ss = kyber768::decapsulate(&ct, &sk);
    Ok(Zeroizing::new(ss.as_bytes().to_vec()))
}
