/*!
Byte conversion helpers.
*/

use crate::core::error::{Error, Result};

/// Lowercase hex encoding
pub fn bytes_to_hex(data: &[u8]) -> String {
    hex::encode(data)
}

pub fn hex_to_bytes(text: &str) -> Result<Vec<u8>> {
    hex::decode(text).map_err(|e| Error::Encoding(format!("invalid hex: {}", e)))
}

pub fn str_to_bytes(text: &str) -> Vec<u8> {
    text.as_bytes().to_vec()
}

pub fn bytes_to_str(data: &[u8]) -> Result<String> {
    String::from_utf8(data.to_vec()).map_err(|_| Error::Encoding("bytes are not valid UTF-8".into()))
}

/// Serde adapter storing byte fields as standard base64 strings.
pub mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        STANDARD.decode(text.as_bytes()).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex() -> Result<()> {
        assert_eq!(bytes_to_hex(&[0x00, 0xAB, 0xFF]), "00abff");
        assert_eq!(hex_to_bytes("00ABff")?, vec![0x00, 0xAB, 0xFF]);
        assert!(matches!(hex_to_bytes("abc"), Err(Error::Encoding(_))));
        Ok(())
    }

    #[test]
    fn test_str() {
        assert_eq!(bytes_to_str(&str_to_bytes("héllo")).unwrap(), "héllo");
        assert!(bytes_to_str(&[0xFF, 0xFE]).is_err());
    }

    #[test]
    fn test_base64_field() {
        #[derive(serde::Serialize, serde::Deserialize, PartialEq, Debug)]
        struct Holder {
            #[serde(with = "base64_bytes")]
            data: Vec<u8>,
        }
        let json = serde_json::to_string(&Holder { data: b"hi!".to_vec() }).unwrap();
        assert_eq!(json, r#"{"data":"aGkh"}"#);
        assert_eq!(serde_json::from_str::<Holder>(&json).unwrap().data, b"hi!");
        assert!(serde_json::from_str::<Holder>(r#"{"data":"***"}"#).is_err());
    }
}
