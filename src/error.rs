//! Error types for the signature engine.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while computing a file signature.
///
/// An empty or unreadable file is not represented here: per spec §7
/// it is "input absent", so callers see `Ok(None)`, not an error.
#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors surfaced by the catalog storage backend.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("storage backend error: {0}")]
    Backend(#[from] rusqlite::Error),

    #[error("failed to open catalog at {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
}

/// Errors surfaced by the consolidation pass.
#[derive(Debug, Error)]
pub enum ConsolidateError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
