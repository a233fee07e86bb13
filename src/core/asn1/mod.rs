/*!
Binary envelope codec.

A small DER subset used by every persisted artifact. [`Asn1Writer`] emits
fields last-to-first so that each enclosing SEQUENCE can be sized from the
bytes already written; [`Asn1Reader`] walks an encoding front-to-back with a
cursor. Any truncated or mismatched element is an `Encoding` error.
*/

mod reader;
mod writer;

pub use self::reader::{element_size, Asn1Reader};
pub use self::writer::Asn1Writer;

use crate::core::error::Result;

pub(crate) const TAG_INTEGER: u8 = 0x02;
pub(crate) const TAG_OCTET_STRING: u8 = 0x04;
pub(crate) const TAG_NULL: u8 = 0x05;
pub(crate) const TAG_OID: u8 = 0x06;
pub(crate) const TAG_UTF8_STRING: u8 = 0x0C;
pub(crate) const TAG_SEQUENCE: u8 = 0x30;
pub(crate) const TAG_CONTEXT: u8 = 0xA0;

/// Types with a canonical DER representation.
pub trait Asn1Compatible {
    /// Prepend the encoding of `self` to `writer`, returning bytes written
    fn asn1_write(&self, writer: &mut Asn1Writer) -> Result<usize>;

    /// Read one value from the cursor
    fn asn1_read(reader: &mut Asn1Reader<'_>) -> Result<Self>
    where
        Self: Sized;

    fn to_asn1(&self) -> Result<Vec<u8>> {
        let mut writer = Asn1Writer::new();
        self.asn1_write(&mut writer)?;
        Ok(writer.finish())
    }

    /// Decode a complete encoding; trailing bytes are rejected
    fn from_asn1(data: &[u8]) -> Result<Self>
    where
        Self: Sized,
    {
        let mut reader = Asn1Reader::new(data);
        let value = Self::asn1_read(&mut reader)?;
        if reader.has_data() {
            return crate::encoding_err!("{} trailing bytes after element", reader.remaining());
        }
        Ok(value)
    }
}
