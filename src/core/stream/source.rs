/*!
Chunk producers.
*/

use std::io::{self, BufRead, BufReader, Read};

use tracing::trace;

use crate::core::constants::{BYTES_CHUNK_SIZE_MIN, STREAM_CHUNK_SIZE_MIN};
use crate::core::error::Result;

/// Pull-based producer of chunks.
pub trait DataSource {
    /// True if the next `read` would return a non-empty chunk.
    fn has_data(&mut self) -> bool;

    /// Next chunk, at most the configured chunk size.
    ///
    /// A chunk shorter than the chunk size does not by itself mean the
    /// source is exhausted; use [`has_data`](DataSource::has_data) for that.
    fn read(&mut self) -> Result<Vec<u8>>;
}

/// Source over an in-memory buffer.
#[derive(Debug, Clone)]
pub struct BytesDataSource {
    data: Vec<u8>,
    pos: usize,
    chunk_size: usize,
}

impl BytesDataSource {
    /// Chunk sizes below [`BYTES_CHUNK_SIZE_MIN`] are raised to it.
    pub fn new(data: impl Into<Vec<u8>>, chunk_size: usize) -> Self {
        Self {
            data: data.into(),
            pos: 0,
            chunk_size: chunk_size.max(BYTES_CHUNK_SIZE_MIN),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Bytes not yet returned by `read`
    pub fn left_bytes(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Rewind to the start of the buffer
    pub fn reset(&mut self) {
        self.pos = 0;
    }
}

impl DataSource for BytesDataSource {
    fn has_data(&mut self) -> bool {
        self.pos < self.data.len()
    }

    fn read(&mut self) -> Result<Vec<u8>> {
        let end = (self.pos + self.chunk_size).min(self.data.len());
        let chunk = self.data[self.pos..end].to_vec();
        self.pos = end;
        Ok(chunk)
    }
}

/// Source over any [`Read`] implementation (file, socket, pipe).
pub struct StreamDataSource<R: Read> {
    reader: BufReader<R>,
    chunk_size: usize,
}

impl<R: Read> StreamDataSource<R> {
    /// Chunk sizes below [`STREAM_CHUNK_SIZE_MIN`] are raised to it.
    pub fn new(reader: R, chunk_size: usize) -> Self {
        let chunk_size = chunk_size.max(STREAM_CHUNK_SIZE_MIN);
        Self {
            reader: BufReader::with_capacity(chunk_size, reader),
            chunk_size,
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }
}

impl<R: Read> DataSource for StreamDataSource<R> {
    fn has_data(&mut self) -> bool {
        loop {
            match self.reader.fill_buf() {
                Ok(buf) => return !buf.is_empty(),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                // Let the following read() surface the failure.
                Err(_) => return true,
            }
        }
    }

    fn read(&mut self) -> Result<Vec<u8>> {
        let mut chunk = vec![0u8; self.chunk_size];
        let mut filled = 0;
        while filled < chunk.len() {
            match self.reader.read(&mut chunk[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        if filled < chunk.len() {
            trace!(requested = chunk.len(), read = filled, "short read from stream source");
            chunk.truncate(filled);
        }
        Ok(chunk)
    }
}
