/*!
Cursor-based DER reader.
*/

use byteorder::{BigEndian, ByteOrder};

use crate::core::error::{Error, Result};
use super::{TAG_CONTEXT, TAG_INTEGER, TAG_NULL, TAG_OCTET_STRING, TAG_OID, TAG_SEQUENCE, TAG_UTF8_STRING};

/// Parse a tag/length header at the start of `data`.
///
/// Returns `(header_len, content_len)`, or `None` when `data` is too short
/// to hold the full header. Lengths must use the minimal DER form.
fn parse_header(data: &[u8]) -> Result<Option<(usize, usize)>> {
    if data.len() < 2 {
        return Ok(None);
    }
    let first = data[1];
    if first & 0x80 == 0 {
        return Ok(Some((2, first as usize)));
    }
    let n = (first & 0x7F) as usize;
    if n == 0 || n > 8 {
        return crate::encoding_err!("unsupported length form 0x{:02x}", first);
    }
    if data.len() < 2 + n {
        return Ok(None);
    }
    let digits = &data[2..2 + n];
    if digits[0] == 0 {
        return crate::encoding_err!("length has a leading zero byte");
    }
    let len = BigEndian::read_uint(digits, n);
    if len < 0x80 {
        return crate::encoding_err!("length {} must use the short form", len);
    }
    let len = usize::try_from(len)
        .map_err(|_| Error::Encoding(format!("length {} does not fit in memory", len)))?;
    Ok(Some((2 + n, len)))
}

/// Full size (header plus content) of the DER element starting `prefix`,
/// or `None` if `prefix` does not yet contain the complete header.
pub fn element_size(prefix: &[u8]) -> Result<Option<usize>> {
    match parse_header(prefix)? {
        Some((header, content)) => header
            .checked_add(content)
            .map(Some)
            .ok_or_else(|| Error::Encoding("element size overflows".into())),
        None => Ok(None),
    }
}

/// DER reader over a borrowed buffer.
///
/// Constructed elements are entered through [`read_sequence`] and
/// [`read_context_tag`], which hand back a reader bounded to the element's
/// declared content. Call [`finish`] on it once every field is read so that
/// content left over inside the element is rejected.
///
/// [`read_sequence`]: Asn1Reader::read_sequence
/// [`read_context_tag`]: Asn1Reader::read_context_tag
/// [`finish`]: Asn1Reader::finish
#[derive(Debug, Clone)]
pub struct Asn1Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Asn1Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current cursor offset
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn has_data(&self) -> bool {
        self.pos < self.data.len()
    }

    /// Tag of the next element without consuming it
    pub fn peek_tag(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    /// Require that every byte has been consumed
    pub fn finish(self) -> Result<()> {
        if self.has_data() {
            return crate::encoding_err!("{} unexpected bytes after the last field", self.remaining());
        }
        Ok(())
    }

    /// Consume a header with `tag` and return the content length
    fn read_header(&mut self, tag: u8) -> Result<usize> {
        let rest = &self.data[self.pos..];
        match rest.first() {
            None => return crate::encoding_err!("expected tag 0x{:02x}, found end of data", tag),
            Some(&actual) if actual != tag => {
                return crate::encoding_err!("expected tag 0x{:02x}, found 0x{:02x}", tag, actual);
            }
            Some(_) => {}
        }
        let (header, len) = parse_header(rest)?
            .ok_or_else(|| Error::Encoding("truncated element header".into()))?;
        if rest.len() - header < len {
            return crate::encoding_err!(
                "element length {} exceeds remaining {} bytes",
                len,
                rest.len() - header
            );
        }
        self.pos += header;
        Ok(len)
    }

    fn read_content(&mut self, tag: u8) -> Result<&'a [u8]> {
        let len = self.read_header(tag)?;
        let content = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(content)
    }

    /// Consume a SEQUENCE and return a reader over exactly its content
    pub fn read_sequence(&mut self) -> Result<Asn1Reader<'a>> {
        Ok(Asn1Reader::new(self.read_content(TAG_SEQUENCE)?))
    }

    /// Consume an explicit `[tag]` if it is next.
    ///
    /// Returns a reader over its content, or `None` without advancing when
    /// the next element carries a different tag.
    pub fn read_context_tag(&mut self, tag: u8) -> Result<Option<Asn1Reader<'a>>> {
        let wanted = TAG_CONTEXT | (tag & 0x1F);
        if self.peek_tag() != Some(wanted) {
            return Ok(None);
        }
        Ok(Some(Asn1Reader::new(self.read_content(wanted)?)))
    }

    /// Non-negative INTEGER that fits in 64 bits
    pub fn read_integer(&mut self) -> Result<u64> {
        let content = self.read_content(TAG_INTEGER)?;
        if content.is_empty() {
            return crate::encoding_err!("empty INTEGER");
        }
        if content[0] & 0x80 != 0 {
            return crate::encoding_err!("negative INTEGER is not supported");
        }
        let digits = if content[0] == 0 { &content[1..] } else { content };
        if digits.len() > 8 {
            return crate::encoding_err!("INTEGER wider than 64 bits");
        }
        if digits.is_empty() {
            return Ok(0);
        }
        Ok(BigEndian::read_uint(digits, digits.len()))
    }

    pub fn read_octet_string(&mut self) -> Result<Vec<u8>> {
        Ok(self.read_content(TAG_OCTET_STRING)?.to_vec())
    }

    pub fn read_utf8_string(&mut self) -> Result<String> {
        let content = self.read_content(TAG_UTF8_STRING)?;
        String::from_utf8(content.to_vec())
            .map_err(|_| Error::Encoding("UTF8String holds invalid UTF-8".into()))
    }

    /// OBJECT IDENTIFIER arc bytes
    pub fn read_oid(&mut self) -> Result<Vec<u8>> {
        Ok(self.read_content(TAG_OID)?.to_vec())
    }

    pub fn read_null(&mut self) -> Result<()> {
        if self.read_header(TAG_NULL)? != 0 {
            return crate::encoding_err!("NULL with content");
        }
        Ok(())
    }

    /// Next complete element, header included
    pub fn read_data(&mut self) -> Result<Vec<u8>> {
        let start = self.pos;
        let tag = self
            .peek_tag()
            .ok_or_else(|| Error::Encoding("expected element, found end of data".into()))?;
        let len = self.read_header(tag)?;
        self.pos += len;
        Ok(self.data[start..self.pos].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::asn1::Asn1Writer;

    fn sample() -> Vec<u8> {
        let mut w = Asn1Writer::new();
        let mut len = w.write_octet_string(&[1, 2, 3]);
        len += w.write_utf8_string("name");
        len += w.write_integer(300);
        w.write_sequence(len);
        w.finish()
    }

    #[test]
    fn test_read_fields_in_order() {
        let der = sample();
        let mut r = Asn1Reader::new(&der);
        let mut seq = r.read_sequence().unwrap();
        assert_eq!(r.position(), der.len());
        assert_eq!(seq.read_integer().unwrap(), 300);
        assert_eq!(seq.read_utf8_string().unwrap(), "name");
        assert_eq!(seq.read_octet_string().unwrap(), vec![1, 2, 3]);
        seq.finish().unwrap();
        r.finish().unwrap();
    }

    #[test]
    fn test_truncated_is_encoding_error() {
        let der = sample();
        for cut in 0..der.len() {
            let mut r = Asn1Reader::new(&der[..cut]);
            let result = r.read_sequence().and_then(|mut seq| {
                seq.read_integer()?;
                seq.read_utf8_string()?;
                seq.read_octet_string()
            });
            assert!(matches!(result, Err(Error::Encoding(_))), "cut at {}", cut);
        }
    }

    #[test]
    fn test_tag_mismatch() {
        let der = sample();
        let mut r = Asn1Reader::new(&der);
        assert!(matches!(r.read_octet_string(), Err(Error::Encoding(_))));
        assert_eq!(r.position(), 0);
    }

    #[test]
    fn test_optional_context_tag() {
        let mut w = Asn1Writer::new();
        let len = w.write_integer(5);
        w.write_context_tag(0, len);
        let der = w.finish();

        let mut r = Asn1Reader::new(&der);
        assert!(r.read_context_tag(1).unwrap().is_none());
        assert_eq!(r.position(), 0);
        let mut inner = r.read_context_tag(0).unwrap().unwrap();
        assert_eq!(inner.remaining(), 3);
        assert_eq!(inner.read_integer().unwrap(), 5);
        inner.finish().unwrap();
    }

    #[test]
    fn test_fields_beyond_declared_length_are_rejected() {
        let mut der = sample();
        // Declare an empty SEQUENCE while the fields still follow it.
        der[1] = 0x00;
        let mut r = Asn1Reader::new(&der);
        let mut seq = r.read_sequence().unwrap();
        assert!(matches!(seq.read_integer(), Err(Error::Encoding(_))));
        assert!(matches!(r.finish(), Err(Error::Encoding(_))));
    }

    #[test]
    fn test_unread_content_is_rejected() {
        let der = sample();
        let mut r = Asn1Reader::new(&der);
        let mut seq = r.read_sequence().unwrap();
        seq.read_integer().unwrap();
        assert!(matches!(seq.finish(), Err(Error::Encoding(_))));
    }

    #[test]
    fn test_non_minimal_length_is_rejected() {
        let der = sample();
        // Same content, length re-encoded as 0x81 0x0f.
        let mut long = vec![0x30, 0x81, der[1]];
        long.extend_from_slice(&der[2..]);
        assert!(matches!(Asn1Reader::new(&long).read_sequence(), Err(Error::Encoding(_))));
        assert!(matches!(element_size(&long), Err(Error::Encoding(_))));

        // Leading zero in a long-form length.
        let padded = [0x04, 0x82, 0x00, 0x80];
        assert!(matches!(element_size(&padded), Err(Error::Encoding(_))));
    }

    #[test]
    fn test_element_size() {
        let der = sample();
        assert_eq!(element_size(&der[..1]).unwrap(), None);
        assert_eq!(element_size(&der[..2]).unwrap(), Some(der.len()));

        let big = {
            let mut w = Asn1Writer::new();
            w.write_octet_string(&[0u8; 1000]);
            w.finish()
        };
        assert_eq!(element_size(&big[..2]).unwrap(), None);
        assert_eq!(element_size(&big[..4]).unwrap(), Some(1004));
    }

    #[test]
    fn test_read_data_returns_raw_element() {
        let der = sample();
        let mut r = Asn1Reader::new(&der);
        assert_eq!(r.read_data().unwrap(), der);
    }
}
