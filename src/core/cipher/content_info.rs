/*!
Cipher header shared by every cipher in this module.

```text
ContentInfo ::= SEQUENCE {
    version     INTEGER,
    nonce       OCTET STRING,
    recipients  SEQUENCE OF Recipient,
    chunkSize   [0] INTEGER OPTIONAL }

Recipient ::= CHOICE {
    key       [0] SEQUENCE { id, kemCiphertext, wrapNonce, wrappedKey },
    password  [1] SEQUENCE { salt, wrapNonce, wrappedKey } }
```

Every field of a recipient is an OCTET STRING.
*/

use crate::core::asn1::{Asn1Compatible, Asn1Reader, Asn1Writer};
use crate::core::constants::VERSION;
use crate::core::error::{Error, Result};

const KEY_RECIPIENT_TAG: u8 = 0;
const PASSWORD_RECIPIENT_TAG: u8 = 1;
const CHUNK_SIZE_TAG: u8 = 0;

/// One way of recovering the content key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    Key {
        id: Vec<u8>,
        kem_ciphertext: Vec<u8>,
        wrap_nonce: Vec<u8>,
        wrapped_key: Vec<u8>,
    },
    Password {
        salt: Vec<u8>,
        wrap_nonce: Vec<u8>,
        wrapped_key: Vec<u8>,
    },
}

impl Asn1Compatible for Recipient {
    fn asn1_write(&self, writer: &mut Asn1Writer) -> Result<usize> {
        let (tag, mut len) = match self {
            Recipient::Key { id, kem_ciphertext, wrap_nonce, wrapped_key } => {
                let mut len = writer.write_octet_string(wrapped_key);
                len += writer.write_octet_string(wrap_nonce);
                len += writer.write_octet_string(kem_ciphertext);
                len += writer.write_octet_string(id);
                (KEY_RECIPIENT_TAG, len)
            }
            Recipient::Password { salt, wrap_nonce, wrapped_key } => {
                let mut len = writer.write_octet_string(wrapped_key);
                len += writer.write_octet_string(wrap_nonce);
                len += writer.write_octet_string(salt);
                (PASSWORD_RECIPIENT_TAG, len)
            }
        };
        len += writer.write_sequence(len);
        Ok(len + writer.write_context_tag(tag, len))
    }

    fn asn1_read(reader: &mut Asn1Reader<'_>) -> Result<Self> {
        if let Some(mut choice) = reader.read_context_tag(KEY_RECIPIENT_TAG)? {
            let mut seq = choice.read_sequence()?;
            let recipient = Recipient::Key {
                id: seq.read_octet_string()?,
                kem_ciphertext: seq.read_octet_string()?,
                wrap_nonce: seq.read_octet_string()?,
                wrapped_key: seq.read_octet_string()?,
            };
            seq.finish()?;
            choice.finish()?;
            return Ok(recipient);
        }
        if let Some(mut choice) = reader.read_context_tag(PASSWORD_RECIPIENT_TAG)? {
            let mut seq = choice.read_sequence()?;
            let recipient = Recipient::Password {
                salt: seq.read_octet_string()?,
                wrap_nonce: seq.read_octet_string()?,
                wrapped_key: seq.read_octet_string()?,
            };
            seq.finish()?;
            choice.finish()?;
            return Ok(recipient);
        }
        match reader.peek_tag() {
            Some(tag) => crate::encoding_err!("unknown recipient choice 0x{:02x}", tag),
            None => crate::encoding_err!("expected recipient, found end of data"),
        }
    }
}

/// Parsed cipher header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentInfo {
    pub nonce: Vec<u8>,
    pub recipients: Vec<Recipient>,
    /// Plaintext chunk size, present only for chunked ciphertext
    pub chunk_size: Option<u64>,
}

impl ContentInfo {
    pub fn key_recipient(&self, id: &[u8]) -> Option<&Recipient> {
        self.recipients
            .iter()
            .find(|r| matches!(r, Recipient::Key { id: rid, .. } if rid.as_slice() == id))
    }

    pub fn password_recipients(&self) -> impl Iterator<Item = &Recipient> {
        self.recipients.iter().filter(|r| matches!(r, Recipient::Password { .. }))
    }
}

impl Asn1Compatible for ContentInfo {
    fn asn1_write(&self, writer: &mut Asn1Writer) -> Result<usize> {
        let mut len = 0;
        if let Some(chunk_size) = self.chunk_size {
            let param_len = writer.write_integer(chunk_size);
            len += param_len + writer.write_context_tag(CHUNK_SIZE_TAG, param_len);
        }
        let mut recipients_len = 0;
        for recipient in self.recipients.iter().rev() {
            recipients_len += recipient.asn1_write(writer)?;
        }
        len += recipients_len + writer.write_sequence(recipients_len);
        len += writer.write_octet_string(&self.nonce);
        len += writer.write_integer(u64::from(VERSION));
        Ok(len + writer.write_sequence(len))
    }

    fn asn1_read(reader: &mut Asn1Reader<'_>) -> Result<Self> {
        let mut seq = reader.read_sequence()?;
        let version = seq.read_integer()?;
        if version != u64::from(VERSION) {
            return Err(Error::Encoding(format!("unsupported content info version {}", version)));
        }
        let nonce = seq.read_octet_string()?;
        let mut list = seq.read_sequence()?;
        let mut recipients = Vec::new();
        while list.has_data() {
            recipients.push(Recipient::asn1_read(&mut list)?);
        }
        let chunk_size = match seq.read_context_tag(CHUNK_SIZE_TAG)? {
            Some(mut param) => {
                let chunk_size = param.read_integer()?;
                param.finish()?;
                Some(chunk_size)
            }
            None => None,
        };
        seq.finish()?;
        Ok(Self { nonce, recipients, chunk_size })
    }
}
