/*!
Streaming primitives.

Chunked producers ([`DataSource`]), consumers ([`DataSink`]) and the
[`TagFilter`] demultiplexer that separates a trailing authentication tag
from a ciphertext body of unknown length. Every pipeline in the crate moves
data through these types in bounded chunks.
*/

mod sink;
mod source;
mod tag_filter;

pub use self::sink::{BytesDataSink, DataSink, StreamDataSink};
pub use self::source::{BytesDataSource, DataSource, StreamDataSource};
pub use self::tag_filter::TagFilter;
