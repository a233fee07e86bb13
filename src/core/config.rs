/*!
Toolkit configuration.

Selects the digest and signature algorithms and the streaming chunk size.
Configurations can be persisted as JSON.
*/

use serde::{Deserialize, Serialize};

use crate::core::constants::{BYTES_CHUNK_SIZE_MIN, DEFAULT_CHUNK_SIZE};
use crate::core::engine::{HashAlgorithm, SignatureAlgorithm};
use crate::core::error::Result;

/// Algorithm and chunking choices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CryptoConfig {
    /// Digest used when signing
    pub hash: HashAlgorithm,
    /// Parameter set for newly generated signing keys
    pub signature: SignatureAlgorithm,
    /// Requested chunk size for data sources
    pub chunk_size: usize,
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self {
            hash: HashAlgorithm::default(),
            signature: SignatureAlgorithm::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl CryptoConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration optimized for resource-constrained environments
    pub fn lightweight() -> Self {
        Self {
            hash: HashAlgorithm::Sha256,
            signature: SignatureAlgorithm::Dilithium2,
            chunk_size: 4096,
        }
    }

    /// Create a configuration optimized for highest security
    pub fn high_security() -> Self {
        Self {
            hash: HashAlgorithm::Sha512,
            signature: SignatureAlgorithm::Dilithium5,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size < BYTES_CHUNK_SIZE_MIN {
            return crate::argument_range_err!(
                "chunk size {} is below the minimum of {}",
                self.chunk_size,
                BYTES_CHUNK_SIZE_MIN
            );
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
