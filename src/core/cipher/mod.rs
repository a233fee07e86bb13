/*!
Recipient-based encryption.

All ciphers share one header, the DER [`ContentInfo`], which lists a
wrapped copy of the content key for every recipient.

- [`Cipher`] seals a byte array in one call.
- [`ChunkCipher`] seals independently authenticated chunks.
- [`StreamCipher`] encrypts a [`DataSource`](crate::core::stream::DataSource)
  into a ChaCha20 body followed by a 32-byte HMAC-SHA256 tag. The decryptor
  cannot know where the body ends, so it routes everything after the header
  through a [`TagFilter`](crate::core::stream::TagFilter) and checks the tag
  once the source is drained.
*/

mod base;
mod chunk;
mod content_info;
mod oneshot;
mod stream_cipher;

pub use self::base::CipherBase;
pub use self::chunk::{ChunkCipher, ChunkCipherState};
pub use self::content_info::{ContentInfo, Recipient};
pub use self::oneshot::Cipher;
pub use self::stream_cipher::StreamCipher;
