/*!
Chunked encryption with per-chunk authentication.

Each chunk is sealed on its own with ChaCha20-Poly1305 under a key derived
from the content key, so neither side ever holds more than one chunk. The
nonce of chunk `n` is the content nonce with `n` XORed into its last eight
bytes, and the associated data carries `n` plus a closing flag. Encryption
ends with an empty closing chunk; decryption refuses to finalize until it
has seen one, so dropping or reordering chunks is detected.

```text
encrypt:  start_encryption -> process* -> finalize
decrypt:  start_decryption_with_{key,password} -> process* -> finalize
```

The plaintext chunk size is stored in the content info, which the caller
transfers alongside the chunks.
*/

use std::fmt;

use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::core::asn1::Asn1Compatible;
use crate::core::constants::sizes::chacha;
use crate::core::constants::{DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE};
use crate::core::engine::{self, aead};
use crate::core::error::{EngineCode, Error, Result};
use super::base::{delegate_recipients, CipherBase};
use super::content_info::ContentInfo;

const CHUNK_KEY_INFO: &[u8] = b"pqc-toolkit chunk encryption";

/// Lifecycle of a [`ChunkCipher`] session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChunkCipherState {
    #[default]
    Idle,
    Encrypting,
    Decrypting,
}

impl fmt::Display for ChunkCipherState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkCipherState::Idle => write!(f, "Idle"),
            ChunkCipherState::Encrypting => write!(f, "Encrypting"),
            ChunkCipherState::Decrypting => write!(f, "Decrypting"),
        }
    }
}

struct ChunkSession {
    key: Zeroizing<[u8; chacha::KEY_BYTES]>,
    nonce: [u8; chacha::NONCE_BYTES],
    chunk_size: usize,
    index: u64,
    encrypting: bool,
    closed: bool,
}

impl ChunkSession {
    fn new(content_key: &[u8], nonce: &[u8], chunk_size: usize, encrypting: bool) -> Result<Self> {
        let nonce: [u8; chacha::NONCE_BYTES] = nonce
            .try_into()
            .map_err(|_| Error::Encoding(format!("content nonce must be {} bytes", chacha::NONCE_BYTES)))?;
        let key = aead::derive_key(content_key, &nonce, CHUNK_KEY_INFO)?;
        Ok(Self {
            key,
            nonce,
            chunk_size,
            index: 0,
            encrypting,
            closed: false,
        })
    }

    fn chunk_nonce(&self) -> [u8; chacha::NONCE_BYTES] {
        let mut nonce = self.nonce;
        for (byte, counter) in nonce[4..].iter_mut().zip(self.index.to_be_bytes()) {
            *byte ^= counter;
        }
        nonce
    }

    fn associated_data(&self, closing: bool) -> [u8; 9] {
        let mut aad = [0u8; 9];
        aad[..8].copy_from_slice(&self.index.to_be_bytes());
        aad[8] = u8::from(closing);
        aad
    }

    fn seal(&mut self, chunk: &[u8], closing: bool) -> Result<Vec<u8>> {
        let sealed = aead::seal(&self.key, &self.chunk_nonce(), &self.associated_data(closing), chunk)?;
        self.index += 1;
        Ok(sealed)
    }

    fn open(&mut self, chunk: &[u8]) -> Result<Vec<u8>> {
        if self.closed {
            return crate::encoding_err!("data after the closing chunk");
        }
        let closing = chunk.len() == chacha::TAG_BYTES;
        let plain = aead::open(&self.key, &self.chunk_nonce(), &self.associated_data(closing), chunk)
            .inspect_err(|_| warn!(index = self.index, "chunk authentication failed"))?;
        self.index += 1;
        self.closed = closing;
        Ok(plain.to_vec())
    }
}

/// Round `preferred` up to whole ChaCha20 blocks; zero selects the default
fn adjust_chunk_size(preferred: usize) -> usize {
    let size = if preferred == 0 { DEFAULT_CHUNK_SIZE } else { preferred.min(MAX_CHUNK_SIZE) };
    size.div_ceil(chacha::BLOCK_BYTES) * chacha::BLOCK_BYTES
}

/// Encrypts and decrypts data one chunk at a time.
#[derive(Default)]
pub struct ChunkCipher {
    base: CipherBase,
    session: Option<ChunkSession>,
    content_info: Vec<u8>,
}

impl ChunkCipher {
    pub fn new() -> Self {
        Self::default()
    }

    delegate_recipients!();

    pub fn state(&self) -> ChunkCipherState {
        match &self.session {
            None => ChunkCipherState::Idle,
            Some(session) if session.encrypting => ChunkCipherState::Encrypting,
            Some(_) => ChunkCipherState::Decrypting,
        }
    }

    /// DER content info of the current or last session
    pub fn content_info(&self) -> &[u8] {
        &self.content_info
    }

    /// Begin encrypting; returns the plaintext chunk size `process` accepts
    pub fn start_encryption(&mut self, preferred_chunk_size: usize) -> Result<usize> {
        self.session = None;
        let chunk_size = adjust_chunk_size(preferred_chunk_size);
        let (content_key, info) = self.base.seal_content_key(Some(chunk_size as u64))?;
        self.content_info = info.to_asn1()?;
        self.session = Some(ChunkSession::new(&content_key, &info.nonce, chunk_size, true)?);
        debug!(chunk_size, recipients = info.recipients.len(), "chunk encryption started");
        Ok(chunk_size)
    }

    /// Begin decrypting as the holder of the private key registered under `id`.
    ///
    /// Returns the ciphertext chunk size `process` expects.
    pub fn start_decryption_with_key(&mut self, content_info: &[u8], id: &[u8], private_key: &[u8]) -> Result<usize> {
        self.start_decryption(content_info, |info| CipherBase::open_with_key(info, id, private_key))
    }

    /// Begin decrypting with a password; returns the ciphertext chunk size
    pub fn start_decryption_with_password(&mut self, content_info: &[u8], password: &[u8]) -> Result<usize> {
        self.start_decryption(content_info, |info| CipherBase::open_with_password(info, password))
    }

    fn start_decryption<F>(&mut self, content_info: &[u8], unwrap: F) -> Result<usize>
    where
        F: FnOnce(&ContentInfo) -> Result<Zeroizing<Vec<u8>>>,
    {
        self.session = None;
        let info = ContentInfo::from_asn1(content_info)?;
        let declared = info
            .chunk_size
            .ok_or_else(|| Error::Encoding("content info carries no chunk size".into()))?;
        let chunk_size = usize::try_from(declared)
            .ok()
            .filter(|size| (1..=MAX_CHUNK_SIZE).contains(size))
            .ok_or_else(|| Error::Encoding(format!("chunk size {} is out of range", declared)))?;
        let content_key = unwrap(&info)?;
        self.content_info = content_info.to_vec();
        self.session = Some(ChunkSession::new(&content_key, &info.nonce, chunk_size, false)?);
        debug!(chunk_size, "chunk decryption started");
        Ok(chunk_size + chacha::TAG_BYTES)
    }

    /// Encrypt or decrypt one chunk.
    ///
    /// Plaintext chunks must hold between one byte and the chunk size;
    /// ciphertext chunks must be exactly what encryption produced.
    pub fn process(&mut self, chunk: &[u8]) -> Result<Vec<u8>> {
        let Some(session) = self.session.as_mut() else {
            return crate::invalid_state_err!("Encrypting or Decrypting", ChunkCipherState::Idle);
        };
        if session.encrypting {
            if chunk.is_empty() || chunk.len() > session.chunk_size {
                return crate::argument_range_err!(
                    "plaintext chunk must hold 1..={} bytes, got {}",
                    session.chunk_size,
                    chunk.len()
                );
            }
            session.seal(chunk, false)
        } else {
            let max = session.chunk_size + chacha::TAG_BYTES;
            if chunk.len() < chacha::TAG_BYTES || chunk.len() > max {
                return crate::argument_range_err!(
                    "ciphertext chunk must hold {}..={} bytes, got {}",
                    chacha::TAG_BYTES,
                    max,
                    chunk.len()
                );
            }
            session.open(chunk)
        }
    }

    /// End the session.
    ///
    /// While encrypting this returns the closing chunk, which must follow the
    /// others. While decrypting it returns nothing and fails with
    /// `ERR_AUTH_FAILED` if the closing chunk never arrived.
    pub fn finalize(&mut self) -> Result<Vec<u8>> {
        let Some(mut session) = self.session.take() else {
            return crate::invalid_state_err!("Encrypting or Decrypting", ChunkCipherState::Idle);
        };
        if session.encrypting {
            let closing = session.seal(&[], true)?;
            debug!(chunks = session.index - 1, "chunk encryption finished");
            return Ok(closing);
        }
        if !session.closed {
            warn!(chunks = session.index, "ciphertext ended without its closing chunk");
            return Err(EngineCode(engine::ERR_AUTH_FAILED).into());
        }
        debug!(chunks = session.index - 1, "chunk decryption finished");
        Ok(Vec::new())
    }
}
