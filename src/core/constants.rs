/*!
Constants for the toolkit.

This module contains chunking policy, envelope versions and the sizes of
the primitives used by the engine.
*/

/// Envelope format version written into every content info
pub const VERSION: u8 = 0x01;

/// Default chunk size for streaming data (16KB)
pub const DEFAULT_CHUNK_SIZE: usize = 16384;

/// Smallest chunk a buffer-backed source will hand out
pub const BYTES_CHUNK_SIZE_MIN: usize = 10;

/// Smallest chunk a stream-backed source will hand out
pub const STREAM_CHUNK_SIZE_MIN: usize = 32;

/// Largest content info a decryptor will buffer (1MB)
pub const MAX_CONTENT_INFO_BYTES: usize = 1 << 20;

/// Largest plaintext chunk the chunk cipher accepts (64MB)
pub const MAX_CHUNK_SIZE: usize = 1 << 26;

/// Size constants for the primitives
pub mod sizes {
    /// CRYSTALS-Kyber768 constants
    pub mod kyber {
        /// Size of Kyber768 public key in bytes
        pub const PUBLIC_KEY_BYTES: usize = 1184;

        /// Size of Kyber768 secret key in bytes
        pub const SECRET_KEY_BYTES: usize = 2400;

        /// Size of Kyber768 ciphertext in bytes
        pub const CIPHERTEXT_BYTES: usize = 1088;

        /// Size of Kyber shared secret in bytes
        pub const SHARED_SECRET_BYTES: usize = 32;
    }

    /// ChaCha20-Poly1305 constants
    pub mod chacha {
        /// Size of ChaCha20-Poly1305 authentication tag in bytes
        pub const TAG_BYTES: usize = 16;

        /// Size of ChaCha20 key in bytes
        pub const KEY_BYTES: usize = 32;

        /// Size of ChaCha20-Poly1305 nonce in bytes
        pub const NONCE_BYTES: usize = 12;

        /// ChaCha20 keystream block; chunk sizes are rounded up to it
        pub const BLOCK_BYTES: usize = 64;
    }

    /// Stream cipher body authentication
    pub mod mac {
        /// HMAC-SHA256 tag appended to the ciphertext body
        pub const TAG_BYTES: usize = 32;
    }

    /// Password-based key derivation salt length
    pub const SALT_BYTES: usize = 32;
}
