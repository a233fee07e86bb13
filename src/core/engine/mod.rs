/*!
Low-level crypto engine adapter.

Thin wrappers over the primitive crates (sha2, pqcrypto, chacha20poly1305,
hkdf, rand). Primitives report failures as negative [`EngineCode`] values
which callers turn into typed errors with `?`; the code to text mapping
lives in [`error_string`].

[`EngineCode`]: crate::core::error::EngineCode
*/

pub mod aead;
pub mod hash;
pub mod kem;
pub mod random;
pub mod sign;

pub use self::hash::{Hash, HashAlgorithm};
pub use self::random::Random;
pub use self::sign::SignatureAlgorithm;

/// Module name reported in translated engine errors
pub const MODULE_NAME: &str = "engine";

pub const ERR_BAD_INPUT_DATA: i32 = -0x4080;
pub const ERR_INVALID_FORMAT: i32 = -0x4100;
pub const ERR_INVALID_PRIVATE_KEY: i32 = -0x3D00;
pub const ERR_PASSWORD_MISMATCH: i32 = -0x3B80;
pub const ERR_INVALID_PUBLIC_KEY: i32 = -0x3C00;
pub const ERR_INVALID_SIGNATURE: i32 = -0x4300;
pub const ERR_VERIFY_FAILED: i32 = -0x4380;
pub const ERR_AUTH_FAILED: i32 = -0x0012;
pub const ERR_RECIPIENT_NOT_FOUND: i32 = -0x6100;
pub const ERR_PASSWORD_RECIPIENT_NOT_FOUND: i32 = -0x6180;
pub const ERR_KEY_DERIVATION_FAILED: i32 = -0x5F00;
pub const ERR_ENCRYPTION_FAILED: i32 = -0x6280;
pub const ERR_DECRYPTION_FAILED: i32 = -0x6300;
pub const ERR_UNSUPPORTED_ALGORITHM: i32 = -0x6380;

/// Human readable text for an engine code.
pub const fn error_string(code: i32) -> &'static str {
    match code {
        ERR_BAD_INPUT_DATA => "Argument given to a function is invalid. See function documentation.",
        ERR_INVALID_FORMAT => "Data format is invalid. Given data may be malformed.",
        ERR_INVALID_PRIVATE_KEY => "Invalid format of the Private Key.",
        ERR_PASSWORD_MISMATCH => "Private Key password mismatch.",
        ERR_INVALID_PUBLIC_KEY => "Invalid format of the Public Key.",
        ERR_INVALID_SIGNATURE => "Invalid format of the Signature.",
        ERR_VERIFY_FAILED => "Signature validation failed.",
        ERR_AUTH_FAILED => "Invalid authentication. Data can be malformed.",
        ERR_RECIPIENT_NOT_FOUND => "Data was not encrypted for this recipient.",
        ERR_PASSWORD_RECIPIENT_NOT_FOUND => "Recipient with given password is not found.",
        ERR_KEY_DERIVATION_FAILED => "Key derivation failed.",
        ERR_ENCRYPTION_FAILED => "Encryption failed.",
        ERR_DECRYPTION_FAILED => "Decryption failed.",
        ERR_UNSUPPORTED_ALGORITHM => "Algorithm is not supported in the current build.",
        _ => "Undefined error.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_strings() {
        assert_eq!(error_string(ERR_INVALID_PRIVATE_KEY), "Invalid format of the Private Key.");
        assert_eq!(error_string(ERR_PASSWORD_MISMATCH), "Private Key password mismatch.");
        assert_eq!(error_string(0), "Undefined error.");
    }
}
