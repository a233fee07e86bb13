/*!
In-memory encryption.

The whole payload is sealed with ChaCha20-Poly1305 under a key derived from
the content key, with the DER content info as associated data. The content
info either travels in front of the ciphertext or is handed over separately
through [`content_info`](Cipher::content_info) and
[`set_content_info`](Cipher::set_content_info).
*/

use tracing::debug;
use zeroize::Zeroizing;

use crate::core::asn1::{element_size, Asn1Compatible};
use crate::core::engine::aead;
use crate::core::error::{Error, Result};
use super::base::{delegate_recipients, CipherBase};
use super::content_info::ContentInfo;

const PAYLOAD_KEY_INFO: &[u8] = b"pqc-toolkit payload encryption";

/// Encrypts and decrypts byte arrays for key and password recipients.
#[derive(Default)]
pub struct Cipher {
    base: CipherBase,
    content_info: Vec<u8>,
}

impl Cipher {
    pub fn new() -> Self {
        Self::default()
    }

    delegate_recipients!();

    /// DER content info of the last encryption, or the one set for decryption
    pub fn content_info(&self) -> &[u8] {
        &self.content_info
    }

    /// Supply the content info of ciphertext that was produced without it
    pub fn set_content_info(&mut self, content_info: &[u8]) -> Result<()> {
        ContentInfo::from_asn1(content_info)?;
        self.content_info = content_info.to_vec();
        Ok(())
    }

    /// Encrypt `data` for every registered recipient.
    ///
    /// With `embed_content_info` the header is prepended to the result;
    /// otherwise fetch it from [`content_info`](Cipher::content_info).
    pub fn encrypt(&mut self, data: &[u8], embed_content_info: bool) -> Result<Vec<u8>> {
        let (content_key, info) = self.base.seal_content_key(None)?;
        let header = info.to_asn1()?;
        let key = aead::derive_key(&content_key, &info.nonce, PAYLOAD_KEY_INFO)?;
        let body = aead::seal(&key, &info.nonce, &header, data)?;
        debug!(
            recipients = info.recipients.len(),
            bytes = data.len(),
            embedded = embed_content_info,
            "payload encrypted"
        );

        let mut out = Vec::with_capacity(header.len() + body.len());
        if embed_content_info {
            out.extend_from_slice(&header);
        }
        out.extend_from_slice(&body);
        self.content_info = header;
        Ok(out)
    }

    /// Decrypt as the holder of the Kyber768 private key registered under `id`
    pub fn decrypt_with_key(&mut self, data: &[u8], id: &[u8], private_key: &[u8]) -> Result<Vec<u8>> {
        self.decrypt_with(data, |info| CipherBase::open_with_key(info, id, private_key))
    }

    pub fn decrypt_with_password(&mut self, data: &[u8], password: &[u8]) -> Result<Vec<u8>> {
        self.decrypt_with(data, |info| CipherBase::open_with_password(info, password))
    }

    fn decrypt_with<F>(&mut self, data: &[u8], unwrap: F) -> Result<Vec<u8>>
    where
        F: FnOnce(&ContentInfo) -> Result<Zeroizing<Vec<u8>>>,
    {
        let body = match embedded_header(data) {
            Some(size) => {
                self.content_info = data[..size].to_vec();
                &data[size..]
            }
            None => data,
        };
        if self.content_info.is_empty() {
            return Err(Error::Encoding("content info is neither embedded nor set".into()));
        }
        let info = ContentInfo::from_asn1(&self.content_info)?;
        let content_key = unwrap(&info)?;
        let key = aead::derive_key(&content_key, &info.nonce, PAYLOAD_KEY_INFO)?;
        let plain = aead::open(&key, &info.nonce, &self.content_info, body)?;
        debug!(bytes = plain.len(), "payload decrypted");
        Ok(plain.to_vec())
    }
}

/// Length of a well-formed content info at the front of `data`
fn embedded_header(data: &[u8]) -> Option<usize> {
    match element_size(data) {
        Ok(Some(size)) if size <= data.len() && ContentInfo::from_asn1(&data[..size]).is_ok() => Some(size),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine;
    use crate::core::key_pair::KeyPair;

    #[test]
    fn test_embedded_roundtrip() -> Result<()> {
        let keys = KeyPair::generate_recipient();
        let mut cipher = Cipher::new();
        cipher.add_key_recipient(b"alice", keys.public_key())?;
        cipher.add_password_recipient(b"pwd")?;
        let encrypted = cipher.encrypt(b"attack at dawn", true)?;
        assert!(encrypted.starts_with(cipher.content_info()));

        let mut decryptor = Cipher::new();
        assert_eq!(decryptor.decrypt_with_key(&encrypted, b"alice", keys.private_key())?, b"attack at dawn");
        assert_eq!(Cipher::new().decrypt_with_password(&encrypted, b"pwd")?, b"attack at dawn");
        Ok(())
    }

    #[test]
    fn test_detached_content_info() -> Result<()> {
        let mut cipher = Cipher::new();
        cipher.add_password_recipient(b"pwd")?;
        let encrypted = cipher.encrypt(b"payload", false)?;
        let content_info = cipher.content_info().to_vec();
        assert_eq!(encrypted.len(), b"payload".len() + 16);

        let mut decryptor = Cipher::new();
        assert!(matches!(decryptor.decrypt_with_password(&encrypted, b"pwd"), Err(Error::Encoding(_))));
        decryptor.set_content_info(&content_info)?;
        assert_eq!(decryptor.decrypt_with_password(&encrypted, b"pwd")?, b"payload");
        Ok(())
    }

    #[test]
    fn test_content_info_is_authenticated() -> Result<()> {
        let mut cipher = Cipher::new();
        cipher.add_password_recipient(b"pwd")?;
        let first = cipher.encrypt(b"payload", false)?;
        cipher.encrypt(b"payload", false)?;
        let second_info = cipher.content_info().to_vec();

        let mut decryptor = Cipher::new();
        decryptor.set_content_info(&second_info)?;
        let err = decryptor.decrypt_with_password(&first, b"pwd").unwrap_err();
        assert_eq!(err.engine_code(), Some(engine::ERR_AUTH_FAILED));
        Ok(())
    }

    #[test]
    fn test_tampered_and_misaddressed() -> Result<()> {
        let mut cipher = Cipher::new();
        cipher.add_password_recipient(b"pwd")?;
        let mut encrypted = cipher.encrypt(&[7u8; 100], true)?;
        let last = encrypted.len() - 1;
        encrypted[last] ^= 0x80;

        let err = Cipher::new().decrypt_with_password(&encrypted, b"pwd").unwrap_err();
        assert_eq!(err.engine_code(), Some(engine::ERR_AUTH_FAILED));
        let err = Cipher::new().decrypt_with_password(&encrypted, b"other").unwrap_err();
        assert_eq!(err.engine_code(), Some(engine::ERR_PASSWORD_RECIPIENT_NOT_FOUND));
        Ok(())
    }

    #[test]
    fn test_requires_recipient() {
        let mut cipher = Cipher::new();
        assert!(matches!(cipher.encrypt(b"x", true), Err(Error::InvalidState { .. })));
        assert!(matches!(cipher.set_content_info(&[0x30, 0x00]), Err(Error::Encoding(_))));
    }
}
