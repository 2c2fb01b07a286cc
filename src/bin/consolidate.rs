//! `consolidate` — cluster a working catalog by similarity into a
//! master catalog (spec §6, informative CLI surface).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use driftprint::consolidate::consolidate;
use driftprint::storage::sqlite::{SqliteMasterCatalog, SqliteWorkingCatalog};
use driftprint::storage::MasterCatalog;
use tracing::error;

#[derive(Parser)]
#[command(name = "consolidate")]
#[command(about = "Cluster a working signature catalog into a master catalog")]
struct Cli {
    /// Path to the working catalog.
    db_path: PathBuf,

    /// Path to the master catalog to write.
    master_db_path: PathBuf,

    /// Similarity threshold for consolidation.
    #[arg(long, default_value_t = 0.8)]
    threshold: f64,

    /// Run without interactive confirmation.
    #[arg(short = 'a', long = "auto")]
    auto: bool,

    /// Path to a pre-existing master catalog to filter against.
    #[arg(short = 'e', long = "exist", value_name = "EXISTING_MASTER_DB")]
    exist: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut working = match SqliteWorkingCatalog::open(&cli.db_path) {
        Ok(c) => c,
        Err(err) => {
            error!(%err, "failed to open working catalog");
            return ExitCode::FAILURE;
        }
    };

    let mut master = match SqliteMasterCatalog::open(&cli.master_db_path) {
        Ok(c) => c,
        Err(err) => {
            error!(%err, "failed to open master catalog");
            return ExitCode::FAILURE;
        }
    };

    let existing_signatures = match &cli.exist {
        Some(path) => match SqliteMasterCatalog::open_readonly(path) {
            Ok(existing) => match existing.scan_signatures() {
                Ok(sigs) => sigs,
                Err(err) => {
                    error!(%err, "failed to read existing master catalog");
                    return ExitCode::FAILURE;
                }
            },
            Err(err) => {
                error!(%err, "failed to open existing master catalog");
                return ExitCode::FAILURE;
            }
        },
        None => Vec::new(),
    };

    match consolidate(&mut working, &mut master, &existing_signatures, cli.threshold) {
        Ok(report) => {
            if cli.auto {
                println!(
                    "Consolidated {} groups, {} signatures removed, {} ignored (matched existing master).",
                    report.clusters, report.removed, report.ignored
                );
            } else {
                println!("\nConsolidation complete.");
                println!("Consolidated groups: {}", report.clusters);
                println!("Total signatures consolidated: {}", report.removed);
                println!("Signatures ignored (matched existing master): {}", report.ignored);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(%err, "consolidation failed");
            ExitCode::FAILURE
        }
    }
}
