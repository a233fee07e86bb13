//! Core components of the toolkit.
//!
//! This module contains the engine adapter, the DER codec, the streaming
//! primitives, signers, the stream cipher, identity artifacts and error
//! handling.

// Low-level primitives
pub mod engine;

// Binary envelope codec
pub mod asn1;

// Chunked sources, sinks and tag filtering
pub mod stream;

// Signing and verification
pub mod signer;

// Recipient-based stream encryption
pub mod cipher;

// Identity artifacts and marshalling
pub mod data;

// Key pairs and protected private keys
pub mod key_pair;

// Runtime configuration
pub mod config;

// Byte helpers
pub mod utils;

// Constants
pub mod constants;

// Error handling
pub mod error;

// Re-exports for convenience
pub use self::constants::VERSION;
pub use self::error::{Error, Result};
