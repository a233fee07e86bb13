/*!
Chunk consumers.
*/

use std::io::{self, Write};

use tracing::debug;

use crate::core::error::Result;

/// Push-based consumer of chunks.
pub trait DataSink {
    /// False once the destination has failed.
    fn is_good(&self) -> bool;

    /// Forward `data` to the destination.
    fn write(&mut self, data: &[u8]) -> Result<()>;
}

/// Sink collecting into memory.
#[derive(Debug, Default, Clone)]
pub struct BytesDataSink {
    data: Vec<u8>,
}

impl BytesDataSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

impl DataSink for BytesDataSink {
    fn is_good(&self) -> bool {
        true
    }

    fn write(&mut self, data: &[u8]) -> Result<()> {
        self.data.extend_from_slice(data);
        Ok(())
    }
}

/// Sink over any [`Write`] implementation.
///
/// The first write failure is returned to the caller and also latches
/// [`is_good`](DataSink::is_good) to false; later writes are refused.
pub struct StreamDataSink<W: Write> {
    writer: W,
    good: bool,
}

impl<W: Write> StreamDataSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, good: true }
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().map_err(|e| {
            self.good = false;
            e.into()
        })
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DataSink for StreamDataSink<W> {
    fn is_good(&self) -> bool {
        self.good
    }

    fn write(&mut self, data: &[u8]) -> Result<()> {
        if !self.good {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink is no longer writable").into());
        }
        if let Err(e) = self.writer.write_all(data) {
            debug!(error = %e, "stream sink failed");
            self.good = false;
            return Err(e.into());
        }
        Ok(())
    }
}
