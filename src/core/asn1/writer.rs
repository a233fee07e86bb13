/*!
Reverse DER writer.
*/

use byteorder::{BigEndian, ByteOrder};

use super::{TAG_CONTEXT, TAG_INTEGER, TAG_NULL, TAG_OCTET_STRING, TAG_OID, TAG_SEQUENCE, TAG_UTF8_STRING};

/// DER writer that grows towards the front.
///
/// Bytes are kept in reverse order internally so that prepending is a push.
/// Every `write_*` returns the number of bytes it added.
#[derive(Debug, Default)]
pub struct Asn1Writer {
    rev: Vec<u8>,
}

impl Asn1Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { rev: Vec::with_capacity(capacity) }
    }

    /// Total bytes written so far
    pub fn len(&self) -> usize {
        self.rev.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rev.is_empty()
    }

    /// Take the encoding
    pub fn finish(mut self) -> Vec<u8> {
        self.rev.reverse();
        self.rev
    }

    fn prepend(&mut self, bytes: &[u8]) -> usize {
        self.rev.extend(bytes.iter().rev());
        bytes.len()
    }

    fn prepend_header(&mut self, tag: u8, len: usize) -> usize {
        let mut header = [0u8; 10];
        header[0] = tag;
        let used = if len < 0x80 {
            header[1] = len as u8;
            2
        } else {
            let mut be = [0u8; 8];
            BigEndian::write_u64(&mut be, len as u64);
            let skip = be.iter().take_while(|b| **b == 0).count();
            let n = 8 - skip;
            header[1] = 0x80 | n as u8;
            header[2..2 + n].copy_from_slice(&be[skip..]);
            2 + n
        };
        self.prepend(&header[..used])
    }

    fn write_primitive(&mut self, tag: u8, content: &[u8]) -> usize {
        let len = self.prepend(content);
        len + self.prepend_header(tag, content.len())
    }

    /// Non-negative INTEGER
    pub fn write_integer(&mut self, value: u64) -> usize {
        let mut be = [0u8; 9];
        BigEndian::write_u64(&mut be[1..], value);
        let skip = be[1..].iter().take_while(|b| **b == 0).count().min(7);
        let start = if be[1 + skip] & 0x80 != 0 { skip } else { skip + 1 };
        self.write_primitive(TAG_INTEGER, &be[start..])
    }

    pub fn write_octet_string(&mut self, data: &[u8]) -> usize {
        self.write_primitive(TAG_OCTET_STRING, data)
    }

    pub fn write_utf8_string(&mut self, value: &str) -> usize {
        self.write_primitive(TAG_UTF8_STRING, value.as_bytes())
    }

    /// OBJECT IDENTIFIER from already-encoded arc bytes
    pub fn write_oid(&mut self, oid: &[u8]) -> usize {
        self.write_primitive(TAG_OID, oid)
    }

    pub fn write_null(&mut self) -> usize {
        self.prepend(&[TAG_NULL, 0x00])
    }

    /// Pre-encoded DER element(s)
    pub fn write_data(&mut self, der: &[u8]) -> usize {
        self.prepend(der)
    }

    /// Wrap the last `len` bytes written in a SEQUENCE header
    pub fn write_sequence(&mut self, len: usize) -> usize {
        self.prepend_header(TAG_SEQUENCE, len)
    }

    /// Wrap the last `len` bytes written in an explicit `[tag]` header
    pub fn write_context_tag(&mut self, tag: u8, len: usize) -> usize {
        self.prepend_header(TAG_CONTEXT | (tag & 0x1F), len)
    }
}
