//! Parallel, batched signature computation over a directory tree, and
//! scan queries against a working catalog (spec §5, §7).

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::CatalogError;
use crate::signature::signature_for_path;
use crate::similarity::similarity;
use crate::storage::WorkingCatalog;

/// Summary of a directory-wide signature build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildReport {
    pub total_files: usize,
    pub inserted: usize,
    pub skipped: usize,
}

/// Recursively list every regular file under `root`.
fn walk_files(root: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let Ok(entries) = std::fs::read_dir(&dir) else {
            warn!(path = %dir.display(), "failed to read directory");
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else {
                out.push(path);
            }
        }
    }
    out
}

/// Compute signatures for every file under `root` and insert them into
/// `catalog` in batches, one worker task per file (spec §5).
///
/// A per-file failure is logged and skipped; it never aborts the
/// batch. Aggregation happens purely via each worker's return value,
/// never a shared mutable counter (spec §9 open question 4).
pub fn build_catalog<W: WorkingCatalog>(
    root: &Path,
    catalog: &mut W,
    config: &Config,
) -> Result<BuildReport, CatalogError> {
    let files = walk_files(root);
    info!(count = files.len(), "discovered files to hash");

    let results: Vec<Option<(String, String)>> = files
        .par_iter()
        .map(|path| {
            debug!(path = %path.display(), "hashing file");
            match signature_for_path(path, config) {
                Ok(Some(signature)) => {
                    let filepath = path.to_string_lossy().into_owned();
                    Some((filepath, signature))
                }
                Ok(None) => {
                    debug!(path = %path.display(), "empty file, skipping");
                    None
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "failed to hash file");
                    None
                }
            }
        })
        .collect();

    let mut report = BuildReport {
        total_files: files.len(),
        ..Default::default()
    };

    let mut batch = Vec::with_capacity(config.batch_size);
    for result in results.into_iter() {
        match result {
            Some(row) => batch.push(row),
            None => report.skipped += 1,
        }

        if batch.len() >= config.batch_size {
            report.inserted += batch.len();
            catalog.insert_batch(&batch)?;
            info!(inserted = report.inserted, total = report.total_files, "batch committed");
            batch.clear();
        }
    }

    if !batch.is_empty() {
        report.inserted += batch.len();
        catalog.insert_batch(&batch)?;
    }

    Ok(report)
}

/// A signature in the catalog that matched a scan query above threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanMatch {
    pub key: String,
    pub similarity: f64,
}

/// Compare one signature against every entry of a scanned catalog,
/// returning matches above `threshold`, most similar first.
pub fn scan_signature<W: WorkingCatalog>(
    query: &str,
    catalog: &W,
    threshold: f64,
) -> Result<Vec<ScanMatch>, CatalogError> {
    let entries = catalog.scan()?;
    let mut matches: Vec<ScanMatch> = entries
        .into_iter()
        .filter_map(|(key, signature)| {
            let score = similarity(query, &signature);
            (score > threshold).then_some(ScanMatch { key, similarity: score })
        })
        .collect();
    matches.sort_by(|a, b| b.similarity.partial_cmp(&a.similarity).unwrap());
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sqlite::SqliteWorkingCatalog;
    use std::io::Write;

    #[test]
    fn builds_catalog_skipping_empty_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"hello world").unwrap();
        std::fs::write(dir.path().join("empty.txt"), b"").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let mut f = std::fs::File::create(dir.path().join("sub/b.txt")).unwrap();
        f.write_all(b"nested file content here").unwrap();

        let mut catalog = SqliteWorkingCatalog::open_in_memory().unwrap();
        let config = Config::default();
        let report = build_catalog(dir.path(), &mut catalog, &config).unwrap();

        assert_eq!(report.total_files, 3);
        assert_eq!(report.inserted, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(catalog.scan().unwrap().len(), 2);
    }

    #[test]
    fn scan_returns_matches_sorted_descending() {
        let mut catalog = SqliteWorkingCatalog::open_in_memory().unwrap();
        catalog.insert("a", "11112222333344445555666677778888").unwrap();
        catalog.insert("b", "1111222233334444aaaabbbbccccdddd").unwrap();
        catalog.insert("c", "ffffeeeeddddccccbbbbaaaa99998888").unwrap();

        let matches = scan_signature("11112222333344445555666677778888", &catalog, 0.3).unwrap();
        assert!(!matches.is_empty());
        for pair in matches.windows(2) {
            assert!(pair[0].similarity >= pair[1].similarity);
        }
    }
}
