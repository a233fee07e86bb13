/*!
Persistence formats for identity artifacts.

[`Asn1DataMarshaller`] produces the canonical DER encoding; the
[`JsonDataMarshaller`] produces the parallel JSON projection, with binary
fields as base64.
*/

use serde::{de::DeserializeOwned, Serialize};

use crate::core::asn1::Asn1Compatible;
use crate::core::error::Result;

/// Anything that can be persisted in both formats
pub trait Artifact: Asn1Compatible + Serialize + DeserializeOwned {}

impl<T: Asn1Compatible + Serialize + DeserializeOwned> Artifact for T {}

/// Converts artifacts to and from bytes.
pub trait DataMarshaller {
    fn marshal<T: Artifact>(&self, artifact: &T) -> Result<Vec<u8>>;

    fn demarshal<T: Artifact>(&self, data: &[u8]) -> Result<T>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Asn1DataMarshaller;

impl DataMarshaller for Asn1DataMarshaller {
    fn marshal<T: Artifact>(&self, artifact: &T) -> Result<Vec<u8>> {
        artifact.to_asn1()
    }

    fn demarshal<T: Artifact>(&self, data: &[u8]) -> Result<T> {
        T::from_asn1(data)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDataMarshaller {
    pretty: bool,
}

impl JsonDataMarshaller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marshaller emitting indented JSON
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl DataMarshaller for JsonDataMarshaller {
    fn marshal<T: Artifact>(&self, artifact: &T) -> Result<Vec<u8>> {
        if self.pretty {
            Ok(serde_json::to_vec_pretty(artifact)?)
        } else {
            Ok(serde_json::to_vec(artifact)?)
        }
    }

    fn demarshal<T: Artifact>(&self, data: &[u8]) -> Result<T> {
        Ok(serde_json::from_slice(data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::data::{Certificate, CertificateId, Sign};
    use crate::core::error::Error;

    fn certificate() -> Certificate {
        Certificate::new(
            CertificateId {
                account_id: "account".into(),
                certificate_id: "certificate".into(),
            },
            vec![0xDE, 0xAD, 0xBE, 0xEF],
        )
    }

    #[test]
    fn test_both_formats_agree() -> Result<()> {
        let cert = certificate();
        let der = Asn1DataMarshaller.marshal(&cert)?;
        let json = JsonDataMarshaller::pretty().marshal(&cert)?;
        assert_eq!(der[0], 0x30);
        assert!(String::from_utf8_lossy(&json).contains("\"public_key\": \"3q2+7w==\""));

        let from_der: Certificate = Asn1DataMarshaller.demarshal(&der)?;
        let from_json: Certificate = JsonDataMarshaller::new().demarshal(&json)?;
        assert_eq!(from_der, from_json);
        Ok(())
    }

    #[test]
    fn test_json_missing_field() {
        let result: Result<Sign> = JsonDataMarshaller::new().demarshal(br#"{"hash_name": "SHA256"}"#);
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_der_wrong_artifact() -> Result<()> {
        let der = Asn1DataMarshaller.marshal(&certificate())?;
        let result: Result<Sign> = Asn1DataMarshaller.demarshal(&der);
        assert!(matches!(result, Err(Error::Encoding(_))));
        Ok(())
    }
}
