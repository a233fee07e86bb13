use serde::{Deserialize, Serialize};

use crate::core::asn1::{Asn1Compatible, Asn1Reader, Asn1Writer};
use crate::core::error::Result;
use crate::core::utils::base64_bytes;
use super::ids::{AccountId, CertificateId};

/// Account ::= SEQUENCE { id AccountId }
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
}

impl Asn1Compatible for Account {
    fn asn1_write(&self, writer: &mut Asn1Writer) -> Result<usize> {
        let len = self.id.asn1_write(writer)?;
        Ok(len + writer.write_sequence(len))
    }

    fn asn1_read(reader: &mut Asn1Reader<'_>) -> Result<Self> {
        let mut seq = reader.read_sequence()?;
        let id = AccountId::asn1_read(&mut seq)?;
        seq.finish()?;
        Ok(Self { id })
    }
}

/// Certificate ::= SEQUENCE { id CertificateId, publicKey OCTET STRING }
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    pub id: CertificateId,
    #[serde(with = "base64_bytes")]
    pub public_key: Vec<u8>,
}

impl Certificate {
    pub fn new(id: CertificateId, public_key: Vec<u8>) -> Self {
        Self { id, public_key }
    }
}

impl Asn1Compatible for Certificate {
    fn asn1_write(&self, writer: &mut Asn1Writer) -> Result<usize> {
        let mut len = writer.write_octet_string(&self.public_key);
        len += self.id.asn1_write(writer)?;
        Ok(len + writer.write_sequence(len))
    }

    fn asn1_read(reader: &mut Asn1Reader<'_>) -> Result<Self> {
        let mut seq = reader.read_sequence()?;
        let id = CertificateId::asn1_read(&mut seq)?;
        let public_key = seq.read_octet_string()?;
        seq.finish()?;
        Ok(Self { id, public_key })
    }
}
