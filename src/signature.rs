//! Builds a file signature: normalize, chunk, hash each chunk, concatenate.

use std::fs;
use std::path::Path;

use rayon::prelude::*;

use crate::chunker::ContentDefinedChunker;
use crate::chunkhash::chunk_digest_hex;
use crate::config::Config;
use crate::error::SignatureError;
use crate::normalize::normalize;

/// Compute the signature of an in-memory byte buffer.
///
/// Returns `None` for empty input (spec: empty files yield no
/// signature). A buffer smaller than `min_chunk` after normalization
/// yields a single-chunk signature.
pub fn signature_for_bytes(data: &[u8], config: &Config) -> Option<String> {
    if data.is_empty() {
        return None;
    }

    let normalized = normalize(data);

    if normalized.len() < config.min_chunk {
        return Some(chunk_digest_hex(&normalized));
    }

    let chunker = ContentDefinedChunker::new(config.min_chunk, config.max_chunk);
    let chunks = chunker.chunk(&normalized);

    let digests: Vec<String> = chunks
        .par_iter()
        .map(|chunk| chunk_digest_hex(chunk.bytes(&normalized)))
        .collect();

    Some(digests.concat())
}

/// Compute the signature of a file on disk.
///
/// Returns `Ok(None)` for an empty file (spec "input absent"); I/O
/// failures are surfaced as `SignatureError` so the caller can log and
/// count them without interrupting sibling work (spec §7).
pub fn signature_for_path(path: &Path, config: &Config) -> Result<Option<String>, SignatureError> {
    let metadata = fs::metadata(path).map_err(|source| SignatureError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if metadata.len() == 0 {
        return Ok(None);
    }

    let data = fs::read(path).map_err(|source| SignatureError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(signature_for_bytes(&data, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_file_yields_single_chunk_signature() {
        let config = Config::default();
        let sig = signature_for_bytes(b"hello world", &config).unwrap();
        assert_eq!(sig.len(), 8);
        assert_eq!(sig, chunk_digest_hex(b"hello world"));
    }

    #[test]
    fn empty_buffer_yields_no_signature() {
        let config = Config::default();
        assert!(signature_for_bytes(b"", &config).is_none());
    }

    #[test]
    fn normalization_makes_equivalent_text_identical() {
        let config = Config::default();
        let sig_a = signature_for_bytes(b"a\r\nb  c\n", &config).unwrap();
        let sig_b = signature_for_bytes(b"a b c", &config).unwrap();
        assert_eq!(sig_a, sig_b);
    }

    #[test]
    fn signature_length_is_multiple_of_eight() {
        let config = Config::default();
        let data: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        let sig = signature_for_bytes(&data, &config).unwrap();
        assert_eq!(sig.len() % 8, 0);
    }

    #[test]
    fn deterministic_regardless_of_repeated_runs() {
        let config = Config::default();
        let data: Vec<u8> = (0..300_000u32).map(|i| ((i * 7 + 3) % 256) as u8).collect();
        let sig1 = signature_for_bytes(&data, &config).unwrap();
        let sig2 = signature_for_bytes(&data, &config).unwrap();
        assert_eq!(sig1, sig2);
    }
}
