/*!
Error handling for the toolkit.

Every fallible operation returns [`Result`]. Failures reported by the
low-level engine arrive as an [`EngineCode`] and are translated into a
[`LowLevelCryptoError`] carrying the code and the engine's own description,
so raw codes never reach callers.
*/

use std::io;
use thiserror::Error;

use crate::core::engine;

/// Result type for the toolkit
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the toolkit
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Failure reported by the low-level crypto engine
    #[error(transparent)]
    Crypto(#[from] LowLevelCryptoError),

    /// A required field is absent or malformed
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// A polymorphic value was viewed as a kind it is not
    #[error("Dynamic type error: expected {expected}, but was {actual}")]
    DynamicTypeKind {
        expected: String,
        actual: String,
    },

    /// A caller supplied a parameter outside its valid range
    #[error("Argument out of range: {0}")]
    ArgumentRange(String),

    /// Operation invoked in the wrong lifecycle state
    #[error("Not in correct state: expected {expected}, but was {actual}")]
    InvalidState {
        expected: String,
        actual: String,
    },

    /// Unknown or unsupported algorithm name
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// JSON projection failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Translated engine failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Module: {module}. Error code: {code}. {message}")]
pub struct LowLevelCryptoError {
    /// Module that reported the failure
    pub module: &'static str,
    /// Original engine code (always negative)
    pub code: i32,
    /// Description taken from the engine's error-string table
    pub message: String,
}

impl LowLevelCryptoError {
    /// Translate an engine code using the engine's error-string table.
    pub fn from_code(code: i32) -> Self {
        Self {
            module: engine::MODULE_NAME,
            code,
            message: engine::error_string(code).to_string(),
        }
    }
}

/// Raw failure code returned by an engine primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineCode(pub i32);

impl From<EngineCode> for LowLevelCryptoError {
    fn from(code: EngineCode) -> Self {
        LowLevelCryptoError::from_code(code.0)
    }
}

impl From<EngineCode> for Error {
    fn from(code: EngineCode) -> Self {
        Error::Crypto(code.into())
    }
}

impl Error {
    /// Engine code carried by this error, if it came from the engine.
    pub fn engine_code(&self) -> Option<i32> {
        match self {
            Error::Crypto(e) => Some(e.code),
            _ => None,
        }
    }
}

/// Create an encoding error
#[macro_export]
macro_rules! encoding_err {
    ($msg:expr) => {
        Err($crate::core::error::Error::Encoding($msg.to_string()))
    };
    ($fmt:expr, $($arg:tt)*) => {
        Err($crate::core::error::Error::Encoding(format!($fmt, $($arg)*)))
    };
}

/// Create an argument range error
#[macro_export]
macro_rules! argument_range_err {
    ($msg:expr) => {
        Err($crate::core::error::Error::ArgumentRange($msg.to_string()))
    };
    ($fmt:expr, $($arg:tt)*) => {
        Err($crate::core::error::Error::ArgumentRange(format!($fmt, $($arg)*)))
    };
}

/// Create an invalid state error
#[macro_export]
macro_rules! invalid_state_err {
    ($expected:expr, $actual:expr) => {
        Err($crate::core::error::Error::InvalidState {
            expected: $expected.to_string(),
            actual: $actual.to_string(),
        })
    };
}

/// Convert to std::io::Error for compatibility with Read/Write callers
impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Io(e) => e,
            Error::Encoding(_) => io::Error::new(io::ErrorKind::InvalidData, err.to_string()),
            Error::ArgumentRange(_) => io::Error::new(io::ErrorKind::InvalidInput, err.to_string()),
            _ => io::Error::new(io::ErrorKind::Other, err.to_string()),
        }
    }
}
