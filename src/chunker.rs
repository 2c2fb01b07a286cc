//! Content-defined chunking driven by the rolling fingerprint.

use crate::fingerprint::RollingFingerprint;

/// A contiguous slice of a buffer, identified by offset and length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub start: usize,
    pub len: usize,
}

impl Chunk {
    /// Borrow this chunk's bytes out of the buffer it was cut from.
    pub fn bytes<'a>(&self, buf: &'a [u8]) -> &'a [u8] {
        &buf[self.start..self.start + self.len]
    }
}

/// Splits a byte buffer into variable-length, content-defined chunks.
pub struct ContentDefinedChunker {
    min_chunk: usize,
    max_chunk: usize,
}

impl ContentDefinedChunker {
    pub fn new(min_chunk: usize, max_chunk: usize) -> Self {
        Self { min_chunk, max_chunk }
    }

    /// Partition `data` into an ordered, non-overlapping, gapless sequence
    /// of chunks covering it exactly.
    pub fn chunk(&self, data: &[u8]) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut fingerprint = RollingFingerprint::new();
        let mut start = 0usize;
        let len = data.len();

        for i in 0..len {
            fingerprint.update(data[i]);
            let chunk_len = i - start + 1;

            if chunk_len >= self.min_chunk
                && (fingerprint.is_boundary() || chunk_len >= self.max_chunk)
            {
                chunks.push(Chunk { start, len: chunk_len });
                start = i + 1;
            }
        }

        if start < len {
            chunks.push(Chunk { start, len: len - start });
        }

        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pseudo_random(len: usize, seed: u64) -> Vec<u8> {
        let mut state = seed;
        (0..len)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                (state & 0xff) as u8
            })
            .collect()
    }

    #[test]
    fn coverage_is_exact_and_non_overlapping() {
        let data = pseudo_random(200_000, 42);
        let chunker = ContentDefinedChunker::new(2048, 65536);
        let chunks = chunker.chunk(&data);

        let mut expected_start = 0usize;
        let mut total = 0usize;
        for c in &chunks {
            assert_eq!(c.start, expected_start);
            expected_start += c.len;
            total += c.len;
        }
        assert_eq!(total, data.len());
    }

    #[test]
    fn chunk_sizes_respect_bounds_except_last() {
        let data = pseudo_random(500_000, 7);
        let chunker = ContentDefinedChunker::new(2048, 65536);
        let chunks = chunker.chunk(&data);

        for (idx, c) in chunks.iter().enumerate() {
            if idx + 1 == chunks.len() {
                assert!(c.len <= 65536);
            } else {
                assert!(c.len >= 2048 && c.len <= 65536);
            }
        }
    }

    #[test]
    fn empty_buffer_yields_no_chunks() {
        let chunker = ContentDefinedChunker::new(2048, 65536);
        assert!(chunker.chunk(&[]).is_empty());
    }

    #[test]
    fn single_byte_edit_shifts_only_local_chunks() {
        let mut data = pseudo_random(200_000, 99);
        let chunker = ContentDefinedChunker::new(2048, 65536);
        let original = chunker.chunk(&data);

        data[100_000] ^= 0xff;
        let edited = chunker.chunk(&data);

        // Chunks before the edit must be untouched.
        let boundary_before: Vec<_> = original
            .iter()
            .take_while(|c| c.start + c.len <= 100_000)
            .collect();
        let boundary_before_edited: Vec<_> = edited
            .iter()
            .take_while(|c| c.start + c.len <= 100_000)
            .collect();
        assert_eq!(boundary_before.len(), boundary_before_edited.len());
        for (a, b) in boundary_before.iter().zip(boundary_before_edited.iter()) {
            assert_eq!(a.start, b.start);
            assert_eq!(a.len, b.len);
        }
    }
}
