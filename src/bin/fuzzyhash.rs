//! `fuzzyhash` — compute and compare fuzzy file signatures, or build
//! and scan a catalog over a directory tree (spec §6, informative CLI
//! surface).

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use driftprint::batch::{build_catalog, scan_signature};
use driftprint::config::Config;
use driftprint::signature::signature_for_path;
use driftprint::similarity::similarity;
use driftprint::storage::sqlite::SqliteWorkingCatalog;
use tracing::error;

#[derive(Parser)]
#[command(name = "fuzzyhash")]
#[command(about = "Compute, compare, and scan fuzzy file signatures")]
struct Cli {
    /// One file to hash, or two files to hash and compare.
    files: Vec<PathBuf>,

    /// Recursively hash FOLDER into `<basename(FOLDER)>.db`.
    #[arg(long = "db", value_name = "FOLDER")]
    db: Option<PathBuf>,

    /// Scan a file or folder against the default catalog.
    #[arg(long = "scan", value_name = "PATH")]
    scan: Option<PathBuf>,

    /// Worker thread count (default: available hardware parallelism).
    #[arg(long)]
    threads: Option<usize>,

    /// Similarity threshold for scan queries.
    #[arg(long, default_value_t = 0.5)]
    threshold: f64,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::default();

    if let Some(threads) = cli.threads {
        if rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .is_err()
        {
            error!("failed to configure worker pool; continuing with default");
        }
    }

    if let Some(folder) = &cli.db {
        return run_build(folder, &config);
    }

    if let Some(target) = &cli.scan {
        return run_scan(target, &config, cli.threshold);
    }

    match cli.files.as_slice() {
        [single] => run_hash_one(single, &config),
        [a, b] => run_hash_two(a, b, &config),
        _ => {
            eprintln!("usage: fuzzyhash FILE | FILE1 FILE2 | --db FOLDER | --scan PATH");
            ExitCode::FAILURE
        }
    }
}

fn run_hash_one(path: &Path, config: &Config) -> ExitCode {
    match signature_for_path(path, config) {
        Ok(Some(sig)) => {
            print_signature(&sig, &format!("Signature for {}", path.display()));
            ExitCode::SUCCESS
        }
        Ok(None) => {
            println!("Failed to generate signature for {}", path.display());
            ExitCode::FAILURE
        }
        Err(err) => {
            error!(%err, "hashing failed");
            ExitCode::FAILURE
        }
    }
}

fn run_hash_two(a: &Path, b: &Path, config: &Config) -> ExitCode {
    let sig_a = signature_for_path(a, config);
    let sig_b = signature_for_path(b, config);

    match (sig_a, sig_b) {
        (Ok(Some(sig_a)), Ok(Some(sig_b))) => {
            print_signature(&sig_a, &format!("Signature for {}", a.display()));
            print_signature(&sig_b, &format!("Signature for {}", b.display()));
            let score = similarity(&sig_a, &sig_b);
            println!("\nSimilarity: {:.2}%", score * 100.0);
            ExitCode::SUCCESS
        }
        _ => {
            println!("Failed to generate signatures for both files.");
            ExitCode::FAILURE
        }
    }
}

fn run_build(folder: &Path, config: &Config) -> ExitCode {
    if !folder.is_dir() {
        eprintln!("Error: '{}' is not a valid directory.", folder.display());
        return ExitCode::FAILURE;
    }
    let db_name = format!(
        "{}.db",
        folder
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("signatures")
    );

    let mut catalog = match SqliteWorkingCatalog::open(Path::new(&db_name)) {
        Ok(c) => c,
        Err(err) => {
            error!(%err, "failed to open catalog");
            return ExitCode::FAILURE;
        }
    };

    match build_catalog(folder, &mut catalog, config) {
        Ok(report) => {
            println!(
                "Database '{}' created with {} signatures ({} files skipped).",
                db_name, report.inserted, report.skipped
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(%err, "failed to build catalog");
            ExitCode::FAILURE
        }
    }
}

fn run_scan(target: &Path, config: &Config, threshold: f64) -> ExitCode {
    let db_name = "Sigs.db";
    if !Path::new(db_name).is_file() {
        eprintln!(
            "Error: Database '{}' does not exist. Please create it using --db first.",
            db_name
        );
        return ExitCode::FAILURE;
    }

    let catalog = match SqliteWorkingCatalog::open(Path::new(db_name)) {
        Ok(c) => c,
        Err(err) => {
            error!(%err, "failed to open catalog");
            return ExitCode::FAILURE;
        }
    };

    if target.is_file() {
        let signature = match signature_for_path(target, config) {
            Ok(Some(sig)) => sig,
            _ => {
                println!("Failed to generate signature for {}", target.display());
                return ExitCode::FAILURE;
            }
        };
        match scan_signature(&signature, &catalog, threshold) {
            Ok(matches) if !matches.is_empty() => {
                println!("Matches found for {}:", target.display());
                for m in matches {
                    println!("  {} — similarity: {:.2}%", m.key, m.similarity * 100.0);
                }
                ExitCode::SUCCESS
            }
            Ok(_) => {
                println!(
                    "No matches found for {} above {:.2}% similarity threshold.",
                    target.display(),
                    threshold * 100.0
                );
                ExitCode::SUCCESS
            }
            Err(err) => {
                error!(%err, "scan failed");
                ExitCode::FAILURE
            }
        }
    } else if target.is_dir() {
        let files = walk_files_for_scan(target);
        let mut matched_files = 0usize;
        for file in &files {
            if let Ok(Some(signature)) = signature_for_path(file, config) {
                if let Ok(matches) = scan_signature(&signature, &catalog, threshold) {
                    if !matches.is_empty() {
                        matched_files += 1;
                        println!("Match found: {}", file.display());
                        for m in matches {
                            println!("  similarity: {:.2}%", m.similarity * 100.0);
                        }
                    }
                }
            }
        }
        println!("\nScan Summary:");
        println!("Total files scanned: {}", files.len());
        println!("Files with matches: {}", matched_files);
        ExitCode::SUCCESS
    } else {
        eprintln!("Error: {} is not a valid file or directory.", target.display());
        ExitCode::FAILURE
    }
}

fn walk_files_for_scan(root: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let Ok(entries) = std::fs::read_dir(&dir) else { continue };
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

fn print_signature(sig: &str, label: &str) {
    println!("\n{label}:");
    for row_start in (0..sig.len()).step_by(32) {
        let row_end = (row_start + 32).min(sig.len());
        let row = &sig[row_start..row_end];
        let mut grouped = Vec::new();
        let mut i = 0;
        while i < row.len() {
            let end = (i + 8).min(row.len());
            grouped.push(&row[i..end]);
            i = end;
        }
        println!("{}", grouped.join(" "));
    }
}
