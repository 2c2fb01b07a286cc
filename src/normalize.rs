//! Byte-level normalization applied before chunking (spec §6).
//!
//! If the input decodes as UTF-8, CRLF becomes LF and then any run of
//! Unicode whitespace collapses to a single ASCII space; otherwise the
//! bytes pass through unchanged. This is semantically significant: two
//! text files differing only in whitespace or line endings must
//! produce identical signatures, so this behavior must never change.

/// Normalize a byte buffer per the rule above.
pub fn normalize(data: &[u8]) -> Vec<u8> {
    match std::str::from_utf8(data) {
        Ok(text) => {
            let unix_newlines = text.replace("\r\n", "\n");
            unix_newlines.split_whitespace().collect::<Vec<_>>().join(" ").into_bytes()
        }
        Err(_) => data.to_vec(),
    }
}
