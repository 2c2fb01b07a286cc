//! Abstract catalog storage (spec §6).
//!
//! The core signature/consolidation logic depends only on these
//! traits, never on `rusqlite` directly, so the backend stays an
//! interchangeable implementation detail (spec §9 "Dynamic catalog
//! abstraction").

pub mod sqlite;

use crate::error::CatalogError;

/// A working catalog: one `(filepath, signature)` row per hashed file.
/// Mutable until consolidation drains it.
pub trait WorkingCatalog {
    /// Insert or replace a single entry.
    fn insert(&mut self, filepath: &str, signature: &str) -> Result<(), CatalogError>;

    /// Insert a batch of entries in one transaction.
    fn insert_batch(&mut self, rows: &[(String, String)]) -> Result<(), CatalogError>;

    /// Return every entry, in the catalog's stable insertion order.
    fn scan(&self) -> Result<Vec<(String, String)>, CatalogError>;

    /// Remove a single entry.
    fn delete(&mut self, filepath: &str) -> Result<(), CatalogError>;

    /// Remove several entries in one transaction.
    fn delete_many(&mut self, filepaths: &[String]) -> Result<(), CatalogError>;

    /// Reclaim space after mass deletion.
    fn compact(&mut self) -> Result<(), CatalogError>;
}

/// A master catalog: one `(name, signature)` row per consolidated
/// cluster. Append/upsert-only.
pub trait MasterCatalog {
    /// Insert or replace an entry keyed by `name`.
    fn upsert(&mut self, name: &str, signature: &str) -> Result<(), CatalogError>;

    /// Return every stored signature (used to filter new clusters
    /// against a pre-existing master, spec §4.5 step 2).
    fn scan_signatures(&self) -> Result<Vec<String>, CatalogError>;
}
