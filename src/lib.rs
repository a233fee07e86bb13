/*!
# PQC Toolkit

Streaming post-quantum signing, encryption and identity artifacts.

## Overview

This library lets callers sign, verify and encrypt payloads of any size in
bounded memory, and persist the resulting artifacts in a canonical DER
encoding with a parallel JSON projection:

- CRYSTALS-Dilithium for digital signatures over SHA-2 digests
- CRYSTALS-Kyber and passwords for cipher recipients
- One-shot, chunked and streaming ciphers sharing one DER content info
- ChaCha20 with an HMAC-SHA256 trailing tag for stream bodies
- Chunked data sources and sinks over buffers, files and sockets
- Tickets, certificates and sign records with DER and JSON marshalling

Failures from the underlying primitives surface as
[`LowLevelCryptoError`]s carrying the engine code and its description.
*/

// Core components
pub mod core;

// Re-export commonly used types for convenience
pub use crate::core::error::{EngineCode, Error, LowLevelCryptoError, Result};
pub use crate::core::constants::{VERSION, DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE, MAX_CONTENT_INFO_BYTES, sizes};
pub use crate::core::config::CryptoConfig;
pub use crate::core::engine::{HashAlgorithm, Random, SignatureAlgorithm};
pub use crate::core::key_pair::KeyPair;
pub use crate::core::asn1::{Asn1Compatible, Asn1Reader, Asn1Writer};
pub use crate::core::stream::{
    BytesDataSink, BytesDataSource, DataSink, DataSource, StreamDataSink, StreamDataSource, TagFilter,
};
pub use crate::core::signer::{SequentialSigner, SignatureEnvelope, Signer, SignerState, StreamSigner};
pub use crate::core::cipher::{ChunkCipher, ChunkCipherState, Cipher, ContentInfo, Recipient, StreamCipher};
pub use crate::core::data::{
    ArtifactSigner, Asn1DataMarshaller, Certificate, DataMarshaller, JsonDataMarshaller, Sign, Ticket,
    TicketData, UserIdTicket, UserIdType, UserInfoTicket,
};
