/*!
Identifiers of accounts, certificates, tickets and signs.

Each identifier extends the previous one by a single field and encodes as
a flat SEQUENCE of UTF8Strings in declaration order.
*/

use serde::{Deserialize, Serialize};

use crate::core::asn1::{Asn1Compatible, Asn1Reader, Asn1Writer};
use crate::core::error::Result;

fn write_strings(writer: &mut Asn1Writer, fields: &[&str]) -> usize {
    let mut len = 0;
    for field in fields.iter().rev() {
        len += writer.write_utf8_string(field);
    }
    len + writer.write_sequence(len)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId {
    pub account_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CertificateId {
    pub account_id: String,
    pub certificate_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TicketId {
    pub account_id: String,
    pub certificate_id: String,
    pub ticket_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignId {
    pub account_id: String,
    pub certificate_id: String,
    pub ticket_id: String,
    pub sign_id: String,
}

impl SignId {
    /// True when every component is empty
    pub fn is_empty(&self) -> bool {
        self.account_id.is_empty()
            && self.certificate_id.is_empty()
            && self.ticket_id.is_empty()
            && self.sign_id.is_empty()
    }
}

impl Asn1Compatible for AccountId {
    fn asn1_write(&self, writer: &mut Asn1Writer) -> Result<usize> {
        Ok(write_strings(writer, &[self.account_id.as_str()]))
    }

    fn asn1_read(reader: &mut Asn1Reader<'_>) -> Result<Self> {
        let mut seq = reader.read_sequence()?;
        let id = Self { account_id: seq.read_utf8_string()? };
        seq.finish()?;
        Ok(id)
    }
}

impl Asn1Compatible for CertificateId {
    fn asn1_write(&self, writer: &mut Asn1Writer) -> Result<usize> {
        Ok(write_strings(writer, &[self.account_id.as_str(), self.certificate_id.as_str()]))
    }

    fn asn1_read(reader: &mut Asn1Reader<'_>) -> Result<Self> {
        let mut seq = reader.read_sequence()?;
        let id = Self {
            account_id: seq.read_utf8_string()?,
            certificate_id: seq.read_utf8_string()?,
        };
        seq.finish()?;
        Ok(id)
    }
}

impl Asn1Compatible for TicketId {
    fn asn1_write(&self, writer: &mut Asn1Writer) -> Result<usize> {
        Ok(write_strings(writer, &[self.account_id.as_str(), self.certificate_id.as_str(), self.ticket_id.as_str()]))
    }

    fn asn1_read(reader: &mut Asn1Reader<'_>) -> Result<Self> {
        let mut seq = reader.read_sequence()?;
        let id = Self {
            account_id: seq.read_utf8_string()?,
            certificate_id: seq.read_utf8_string()?,
            ticket_id: seq.read_utf8_string()?,
        };
        seq.finish()?;
        Ok(id)
    }
}

impl Asn1Compatible for SignId {
    fn asn1_write(&self, writer: &mut Asn1Writer) -> Result<usize> {
        Ok(write_strings(
            writer,
            &[self.account_id.as_str(), self.certificate_id.as_str(), self.ticket_id.as_str(), self.sign_id.as_str()],
        ))
    }

    fn asn1_read(reader: &mut Asn1Reader<'_>) -> Result<Self> {
        let mut seq = reader.read_sequence()?;
        let id = Self {
            account_id: seq.read_utf8_string()?,
            certificate_id: seq.read_utf8_string()?,
            ticket_id: seq.read_utf8_string()?,
            sign_id: seq.read_utf8_string()?,
        };
        seq.finish()?;
        Ok(id)
    }
}
