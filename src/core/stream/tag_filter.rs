/*!
Trailing tag separation.

A cipher that appends an authentication tag of known length to an
unbounded body cannot tell, while bytes are still arriving, which suffix
will turn out to be the tag. [`TagFilter`] always holds back the most
recent `tag_len` bytes and releases everything older as body data.
*/

use bytes::{Bytes, BytesMut};

/// Splits a stream into body bytes and a trailing tag.
#[derive(Debug, Default, Clone)]
pub struct TagFilter {
    tag_len: usize,
    released: BytesMut,
    tail: BytesMut,
}

impl TagFilter {
    /// Filter ready for a stream whose tag is `tag_len` bytes
    pub fn new(tag_len: usize) -> Self {
        let mut filter = Self::default();
        filter.reset(tag_len);
        filter
    }

    /// Discard all buffered state and start over with a new tag length
    pub fn reset(&mut self, tag_len: usize) {
        self.tag_len = tag_len;
        self.released.clear();
        self.tail.clear();
        self.tail.reserve(tag_len);
    }

    pub fn tag_len(&self) -> usize {
        self.tag_len
    }

    /// Feed the next chunk of the stream.
    ///
    /// Afterwards `tail` holds at most `tag_len` bytes; the oldest surplus
    /// moves, in order, to the released body.
    pub fn process(&mut self, chunk: &[u8]) {
        self.tail.extend_from_slice(chunk);
        if self.tail.len() > self.tag_len {
            let surplus = self.tail.len() - self.tag_len;
            let body = self.tail.split_to(surplus);
            self.released.extend_from_slice(&body);
        }
    }

    /// True if body bytes are waiting to be popped
    pub fn has_data(&self) -> bool {
        !self.released.is_empty()
    }

    /// Take all released body bytes
    pub fn pop_data(&mut self) -> Bytes {
        self.released.split().freeze()
    }

    /// Current tag candidate.
    ///
    /// Once the whole stream has been processed this is the tag. If fewer
    /// than `tag_len` bytes were ever seen it is shorter; callers check.
    pub fn tag(&self) -> &[u8] {
        &self.tail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(tag_len: usize, input: &[u8], chunk: usize) -> (Vec<u8>, Vec<u8>) {
        let mut filter = TagFilter::new(tag_len);
        let mut body = Vec::new();
        for piece in input.chunks(chunk.max(1)) {
            filter.process(piece);
            if filter.has_data() {
                body.extend_from_slice(&filter.pop_data());
            }
        }
        (body, filter.tag().to_vec())
    }

    #[test]
    fn test_tag_from_single_chunk() {
        let input = hex::decode("5eb9ee8ee83801858815e0fc301204102ccda65f87808b4dcdfebd970b881e95").unwrap();
        let mut filter = TagFilter::new(16);
        filter.process(&input);
        assert_eq!(hex::encode(filter.tag()), "2ccda65f87808b4dcdfebd970b881e95");
        assert_eq!(filter.tag().len(), 16);
        assert_eq!(&filter.pop_data()[..], &input[..input.len() - 16]);
        assert!(!filter.has_data());
    }

    #[test]
    fn test_tag_across_chunks() {
        let input = hex::decode("11111111111111301204102ccda65f87808b4dcdfebd970b881e95").unwrap();
        for chunk in 1..=input.len() {
            let (body, tag) = run(16, &input, chunk);
            assert_eq!(hex::encode(&tag), "2ccda65f87808b4dcdfebd970b881e95");
            assert_eq!(body, &input[..input.len() - 16]);
        }
    }

    #[test]
    fn test_short_input_returns_short_tag() {
        let mut filter = TagFilter::new(16);
        for b in [1u8, 2, 3, 4, 5] {
            filter.process(&[b]);
            assert!(!filter.has_data());
        }
        assert_eq!(filter.tag(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_empty_state() {
        let mut filter = TagFilter::new(16);
        filter.process(&[]);
        assert!(filter.tag().is_empty());
        assert!(filter.pop_data().is_empty());
    }

    #[test]
    fn test_reset_discards_state() {
        let mut filter = TagFilter::new(4);
        filter.process(b"0123456789");
        assert!(filter.has_data());

        filter.reset(4);
        assert!(!filter.has_data());
        assert!(filter.tag().is_empty());

        filter.process(b"abcdef");
        assert_eq!(&filter.pop_data()[..], b"ab");
        assert_eq!(filter.tag(), b"cdef");
    }

    #[test]
    fn test_zero_length_tag_releases_everything() {
        let (body, tag) = run(0, b"payload", 3);
        assert_eq!(body, b"payload");
        assert!(tag.is_empty());
    }
}
