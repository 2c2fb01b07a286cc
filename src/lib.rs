//! driftprint — content-defined fuzzy file signatures and clustering.
//!
//! Four building blocks, leaves first: a rolling fingerprint over a
//! sliding byte window, a content-defined chunker driven by it, a weak
//! fast per-chunk digest, and a longest-common-subsequence similarity
//! metric over the concatenated digests. A consolidator clusters a
//! corpus of signatures by pairwise similarity and maintains a master
//! catalog of one representative per cluster.

pub mod batch;
pub mod chunker;
pub mod chunkhash;
pub mod config;
pub mod consolidate;
pub mod error;
pub mod fingerprint;
pub mod normalize;
pub mod signature;
pub mod similarity;
pub mod storage;

pub use config::Config;
pub use consolidate::{consolidate, ConsolidationReport};
pub use error::{CatalogError, ConsolidateError, SignatureError};
pub use signature::{signature_for_bytes, signature_for_path};
pub use similarity::similarity;
