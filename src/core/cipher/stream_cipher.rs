/*!
Streaming encryption over a [`DataSource`].

Output is the DER content info, the ChaCha20 body, then an HMAC-SHA256 tag
over header and body. Body keys are derived from the content key and the
header nonce, so the header alone never reveals anything usable.
*/

use chacha20::ChaCha20;
use chacha20::cipher::{KeyIvInit, StreamCipher as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::core::asn1::{element_size, Asn1Compatible};
use crate::core::constants::MAX_CONTENT_INFO_BYTES;
use crate::core::constants::sizes::{chacha, mac};
use crate::core::engine::{self, aead};
use crate::core::error::{EngineCode, Error, Result};
use crate::core::stream::{DataSink, DataSource, TagFilter};
use super::base::{delegate_recipients, CipherBase};
use super::content_info::ContentInfo;

type HmacSha256 = Hmac<Sha256>;

const ENCRYPTION_KEY_INFO: &[u8] = b"pqc-toolkit stream encryption";
const AUTHENTICATION_KEY_INFO: &[u8] = b"pqc-toolkit stream authentication";

/// Body keys derived from the content key.
struct BodyKeys {
    cipher: ChaCha20,
    mac: HmacSha256,
}

impl BodyKeys {
    fn derive(content_key: &[u8], nonce: &[u8]) -> Result<Self> {
        if nonce.len() != chacha::NONCE_BYTES {
            return crate::encoding_err!("content nonce must be {} bytes", chacha::NONCE_BYTES);
        }
        let enc_key = aead::derive_key(content_key, nonce, ENCRYPTION_KEY_INFO)?;
        let mac_key = aead::derive_key(content_key, nonce, AUTHENTICATION_KEY_INFO)?;
        let cipher = ChaCha20::new(
            chacha20::Key::from_slice(&enc_key[..]),
            chacha20::Nonce::from_slice(nonce),
        );
        let mac = <HmacSha256 as Mac>::new_from_slice(&mac_key[..])
            .map_err(|_| EngineCode(engine::ERR_KEY_DERIVATION_FAILED))?;
        Ok(Self { cipher, mac })
    }
}

/// Encrypts a [`DataSource`] for any number of key and password recipients.
#[derive(Default)]
pub struct StreamCipher {
    base: CipherBase,
}

impl StreamCipher {
    pub fn new() -> Self {
        Self::default()
    }

    delegate_recipients!();

    /// Encrypt everything `source` produces into `sink`
    pub fn encrypt(&self, source: &mut dyn DataSource, sink: &mut dyn DataSink) -> Result<()> {
        let (content_key, info) = self.base.seal_content_key(None)?;
        let header = info.to_asn1()?;
        debug!(recipients = self.base.recipient_count(), header_len = header.len(), "encryption started");

        let mut keys = BodyKeys::derive(&content_key, &info.nonce)?;
        keys.mac.update(&header);
        sink.write(&header)?;

        let mut total = 0u64;
        while source.has_data() {
            let mut chunk = source.read()?;
            keys.cipher.apply_keystream(&mut chunk);
            keys.mac.update(&chunk);
            sink.write(&chunk)?;
            total += chunk.len() as u64;
        }
        let tag = keys.mac.finalize().into_bytes();
        sink.write(&tag)?;
        debug!(bytes = total, "encryption finished");
        Ok(())
    }

    /// Decrypt as the holder of the Kyber768 private key registered under `id`
    pub fn decrypt_with_key(
        &self,
        source: &mut dyn DataSource,
        sink: &mut dyn DataSink,
        id: &[u8],
        private_key: &[u8],
    ) -> Result<()> {
        self.decrypt_with(source, sink, |info| CipherBase::open_with_key(info, id, private_key))
    }

    /// Decrypt using any password recipient that `password` unlocks
    pub fn decrypt_with_password(
        &self,
        source: &mut dyn DataSource,
        sink: &mut dyn DataSink,
        password: &[u8],
    ) -> Result<()> {
        self.decrypt_with(source, sink, |info| CipherBase::open_with_password(info, password))
    }

    fn decrypt_with<F>(&self, source: &mut dyn DataSource, sink: &mut dyn DataSink, unwrap: F) -> Result<()>
    where
        F: FnOnce(&ContentInfo) -> Result<Zeroizing<Vec<u8>>>,
    {
        let (header, rest) = read_header(source)?;
        let info = ContentInfo::from_asn1(&header)?;
        debug!(recipients = info.recipients.len(), header_len = header.len(), "decryption started");
        let content_key = unwrap(&info)?;

        let mut keys = BodyKeys::derive(&content_key, &info.nonce)?;
        keys.mac.update(&header);

        let mut filter = TagFilter::new(mac::TAG_BYTES);
        filter.process(&rest);
        let mut total = 0u64;
        loop {
            if filter.has_data() {
                let mut body = filter.pop_data().to_vec();
                keys.mac.update(&body);
                keys.cipher.apply_keystream(&mut body);
                sink.write(&body)?;
                total += body.len() as u64;
            }
            if !source.has_data() {
                break;
            }
            filter.process(&source.read()?);
        }

        let tag = filter.tag();
        if tag.len() != mac::TAG_BYTES || keys.mac.verify_slice(tag).is_err() {
            warn!(bytes = total, "stream authentication failed");
            return Err(EngineCode(engine::ERR_AUTH_FAILED).into());
        }
        debug!(bytes = total, "decryption finished");
        Ok(())
    }
}

/// Pull chunks until the complete DER header is buffered.
///
/// Returns the header and whatever body bytes were read past it. A header
/// declaring more than [`MAX_CONTENT_INFO_BYTES`] is rejected before any
/// of it is buffered.
fn read_header(source: &mut dyn DataSource) -> Result<(Vec<u8>, Vec<u8>)> {
    let mut buffer = Vec::new();
    loop {
        if let Some(size) = element_size(&buffer)? {
            if size > MAX_CONTENT_INFO_BYTES {
                return crate::encoding_err!(
                    "content info of {} bytes exceeds the {} byte limit",
                    size,
                    MAX_CONTENT_INFO_BYTES
                );
            }
            if buffer.len() >= size {
                let rest = buffer.split_off(size);
                return Ok((buffer, rest));
            }
        }
        if !source.has_data() {
            return Err(Error::Encoding("stream ended inside content info".into()));
        }
        buffer.extend_from_slice(&source.read()?);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::key_pair::KeyPair;
    use crate::core::stream::{BytesDataSink, BytesDataSource};

    fn encrypt(cipher: &StreamCipher, data: &[u8]) -> Result<Vec<u8>> {
        let mut source = BytesDataSource::new(data.to_vec(), 64);
        let mut sink = BytesDataSink::new();
        cipher.encrypt(&mut source, &mut sink)?;
        Ok(sink.into_bytes())
    }

    #[test]
    fn test_password_roundtrip() -> Result<()> {
        let mut cipher = StreamCipher::new();
        cipher.add_password_recipient(b"hunter2")?;
        let data: Vec<u8> = (0..1000u32).map(|i| i as u8).collect();
        let encrypted = encrypt(&cipher, &data)?;

        let mut source = BytesDataSource::new(encrypted, 50);
        let mut sink = BytesDataSink::new();
        cipher.decrypt_with_password(&mut source, &mut sink, b"hunter2")?;
        assert_eq!(sink.bytes(), data.as_slice());
        Ok(())
    }

    #[test]
    fn test_key_recipient_roundtrip() -> Result<()> {
        let keys = KeyPair::generate_recipient();
        let mut cipher = StreamCipher::new();
        cipher.add_key_recipient(b"alice", keys.public_key())?;
        assert!(cipher.key_recipient_exists(b"alice"));
        let encrypted = encrypt(&cipher, b"short message")?;

        let decryptor = StreamCipher::new();
        let mut source = BytesDataSource::new(encrypted.clone(), 10);
        let mut sink = BytesDataSink::new();
        decryptor.decrypt_with_key(&mut source, &mut sink, b"alice", keys.private_key())?;
        assert_eq!(sink.bytes(), b"short message");

        let mut source = BytesDataSource::new(encrypted, 10);
        let err = decryptor
            .decrypt_with_key(&mut source, &mut BytesDataSink::new(), b"bob", keys.private_key())
            .unwrap_err();
        assert_eq!(err.engine_code(), Some(engine::ERR_RECIPIENT_NOT_FOUND));
        Ok(())
    }

    #[test]
    fn test_tampered_body_fails_authentication() -> Result<()> {
        let mut cipher = StreamCipher::new();
        cipher.add_password_recipient(b"pwd")?;
        let mut encrypted = encrypt(&cipher, &[0x11; 300])?;
        let at = encrypted.len() - 40;
        encrypted[at] ^= 0x01;

        let mut source = BytesDataSource::new(encrypted, 64);
        let err = cipher
            .decrypt_with_password(&mut source, &mut BytesDataSink::new(), b"pwd")
            .unwrap_err();
        assert_eq!(err.engine_code(), Some(engine::ERR_AUTH_FAILED));
        Ok(())
    }

    #[test]
    fn test_wrong_password() -> Result<()> {
        let mut cipher = StreamCipher::new();
        cipher.add_password_recipient(b"pwd")?;
        let encrypted = encrypt(&cipher, b"data")?;
        let mut source = BytesDataSource::new(encrypted, 64);
        let err = cipher
            .decrypt_with_password(&mut source, &mut BytesDataSink::new(), b"nope")
            .unwrap_err();
        assert_eq!(err.engine_code(), Some(engine::ERR_PASSWORD_RECIPIENT_NOT_FOUND));
        Ok(())
    }

    #[test]
    fn test_requires_recipient() {
        let cipher = StreamCipher::new();
        assert!(matches!(encrypt(&cipher, b"x"), Err(Error::InvalidState { .. })));
    }

    #[test]
    fn test_truncated_header() -> Result<()> {
        let mut cipher = StreamCipher::new();
        cipher.add_password_recipient(b"pwd")?;
        let encrypted = encrypt(&cipher, b"data")?;
        let mut source = BytesDataSource::new(encrypted[..20].to_vec(), 64);
        let result = cipher.decrypt_with_password(&mut source, &mut BytesDataSink::new(), b"pwd");
        assert!(matches!(result, Err(Error::Encoding(_))));
        Ok(())
    }

    /// Source that never runs dry.
    struct EndlessSource {
        first: Vec<u8>,
        reads: usize,
    }

    impl DataSource for EndlessSource {
        fn has_data(&mut self) -> bool {
            true
        }

        fn read(&mut self) -> Result<Vec<u8>> {
            self.reads += 1;
            if self.reads == 1 {
                Ok(self.first.clone())
            } else {
                Ok(vec![0; 4096])
            }
        }
    }

    #[test]
    fn test_oversized_header_rejected_early() -> Result<()> {
        let mut cipher = StreamCipher::new();
        cipher.add_password_recipient(b"pwd")?;
        let mut source = EndlessSource {
            first: vec![0x30, 0x84, 0x7F, 0xFF, 0xFF, 0xFF],
            reads: 0,
        };
        let result = cipher.decrypt_with_password(&mut source, &mut BytesDataSink::new(), b"pwd");
        assert!(matches!(result, Err(Error::Encoding(_))));
        assert_eq!(source.reads, 1);
        Ok(())
    }

    #[test]
    fn test_header_at_limit_is_still_read() -> Result<()> {
        let cipher = StreamCipher::new();
        let content_len = MAX_CONTENT_INFO_BYTES - 5;
        let mut first = vec![0x30, 0x83];
        first.extend_from_slice(&(content_len as u32).to_be_bytes()[1..]);
        assert_eq!(element_size(&first)?, Some(MAX_CONTENT_INFO_BYTES));
        let mut source = EndlessSource { first, reads: 0 };
        // Zero padding is not a valid content info, but it has to be buffered first.
        let result = cipher.decrypt_with_password(&mut source, &mut BytesDataSink::new(), b"pwd");
        assert!(matches!(result, Err(Error::Encoding(_))));
        assert!(source.reads > 1);
        Ok(())
    }
}
