//! Clusters a working catalog's signatures by similarity, elects one
//! representative per cluster, and writes a master catalog (spec §4.5).

use std::collections::{HashSet, HashMap};
use std::path::Path;

use rand::Rng;
use tracing::info;

use crate::error::ConsolidateError;
use crate::similarity::similarity;
use crate::storage::{MasterCatalog, WorkingCatalog};

/// Counts returned by a consolidation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConsolidationReport {
    /// Number of clusters formed (each with more than one member).
    pub clusters: usize,
    /// Total entries removed from the working catalog.
    pub removed: usize,
    /// Entries skipped because they matched the pre-existing master.
    pub ignored: usize,
}

/// Run the single-pass greedy agglomeration described in spec §4.5.
///
/// This is *not* transitive closure: membership in a cluster requires
/// similarity to the cluster's pivot (the first unprocessed entry),
/// not to any other member. That is intentional and must not change.
pub fn consolidate<W, M>(
    working: &mut W,
    master: &mut M,
    existing_master_signatures: &[String],
    threshold: f64,
) -> Result<ConsolidationReport, ConsolidateError>
where
    W: WorkingCatalog,
    M: MasterCatalog,
{
    let entries = working.scan()?;
    let mut processed: HashSet<String> = HashSet::new();
    let mut report = ConsolidationReport::default();
    let mut to_delete: Vec<String> = Vec::new();

    for i in 0..entries.len() {
        let (ref filepath_i, ref sig_i) = entries[i];
        if processed.contains(filepath_i) {
            continue;
        }

        if existing_master_signatures
            .iter()
            .any(|existing| similarity(sig_i, existing) > threshold)
        {
            processed.insert(filepath_i.clone());
            report.ignored += 1;
            continue;
        }

        let mut group: Vec<&(String, String)> = vec![&entries[i]];
        for entry in entries.iter().skip(i + 1) {
            if !processed.contains(&entry.0) && similarity(sig_i, &entry.1) > threshold {
                group.push(entry);
            }
        }

        if group.len() > 1 {
            let filepaths: Vec<&str> = group.iter().map(|(p, _)| p.as_str()).collect();
            let name = auto_name(&filepaths);
            master.upsert(&name, sig_i)?;

            for (filepath, _) in group.iter().skip(1) {
                to_delete.push(filepath.clone());
            }

            report.clusters += 1;
            report.removed += group.len() - 1;
            info!(name = %name, members = group.len(), "consolidated cluster");
        }

        for (filepath, _) in &group {
            processed.insert((*filepath).clone());
        }
    }

    if !to_delete.is_empty() {
        working.delete_many(&to_delete)?;
    }
    working.compact()?;

    Ok(report)
}

/// Derive a representative name for a cluster from its member filepaths
/// (spec §4.5 `auto_name`).
pub fn auto_name(filepaths: &[&str]) -> String {
    if filepaths.is_empty() {
        return append_random_suffix("Consolidated.Signature");
    }

    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut first_seen: HashMap<String, usize> = HashMap::new();
    for (order, filepath) in filepaths.iter().enumerate() {
        let processed = process_name(basename(filepath));
        let count = counts.entry(processed.clone()).or_insert(0);
        *count += 1;
        first_seen.entry(processed).or_insert(order);
    }

    let base_name = counts
        .into_iter()
        .max_by(|(name_a, count_a), (name_b, count_b)| {
            count_a
                .cmp(count_b)
                .then_with(|| first_seen[name_b].cmp(&first_seen[name_a]))
        })
        .map(|(name, _)| name)
        .unwrap_or_else(|| "Consolidated.Signature".to_string());

    append_random_suffix(&base_name)
}

fn basename(filepath: &str) -> &str {
    Path::new(filepath)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filepath)
}

/// Split on `.`; keep the first 4 dot-segments if there are more than
/// 4, otherwise strip the final extension.
fn process_name(name: &str) -> String {
    let parts: Vec<&str> = name.split('.').collect();
    if parts.len() > 4 {
        parts[..4].join(".")
    } else if parts.len() > 1 {
        parts[..parts.len() - 1].join(".")
    } else {
        name.to_string()
    }
}

fn append_random_suffix(base: &str) -> String {
    const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..5)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("{base}.{suffix}")
}
