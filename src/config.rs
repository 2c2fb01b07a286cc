//! Tunable parameters for chunking, hashing and consolidation.
//!
//! Mirrors the teacher's `HashConfig`: a small, cloneable struct with
//! a `Default` impl holding the values the specification fixes as
//! canonical, threaded through the library API rather than read from
//! global state.

/// Width, in bytes, of the rolling fingerprint's sliding window.
pub const WINDOW_SIZE: usize = 64;

/// Low bits of the fingerprint that must be zero to mark a boundary.
pub const BOUNDARY_MASK: u64 = (1 << 13) - 1;

/// Configuration for content-defined chunking and signature similarity.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Minimum chunk length before a boundary may be cut.
    pub min_chunk: usize,

    /// Maximum chunk length; a cut is forced at this length.
    pub max_chunk: usize,

    /// Similarity threshold used by the consolidator (`T` in spec §4.5).
    pub consolidate_threshold: f64,

    /// Similarity threshold used by scan queries.
    pub scan_threshold: f64,

    /// Target number of rows per catalog write batch.
    pub batch_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_chunk: 2048,
            max_chunk: 65536,
            consolidate_threshold: 0.8,
            scan_threshold: 0.5,
            batch_size: 10_000,
        }
    }
}
