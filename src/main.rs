mod analytics;
mod database;
mod error;
mod ingest;
mod sources;
mod utils;

use std::path::PathBuf;
use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::analytics::{aggregate, report};
use crate::database::repo::Store;
use crate::ingest::runner;
use crate::sources::SourceKind;
use crate::utils::config::{self, Settings};

#[derive(Parser, Debug)]
#[command(author, version, about = "Collects museum artwork metadata into SQLite and summarizes it", long_about = None)]
struct Args {
    /// SQLite database file (overrides MUSEUM_DB_PATH)
    #[arg(short, long)]
    db_path: Option<String>,

    /// Museums to ingest; all of them when omitted
    #[arg(short, long = "source", value_enum)]
    sources: Vec<SourceKind>,

    /// Insertion cap applied to every selected museum
    #[arg(short, long)]
    cap: Option<usize>,

    /// Ranked entries kept per aggregate
    #[arg(long)]
    top_n: Option<usize>,

    /// Only run analytics on what is already stored
    #[arg(long)]
    skip_ingest: bool,

    #[arg(long, default_value = ".env")]
    env_file: PathBuf,

    /// Save the effective settings to the env file
    #[arg(long)]
    write_env: bool,

    #[arg(short, long, default_value = "art_metrics.txt")]
    report: PathBuf,

    /// Also export the aggregates as JSON
    #[arg(long)]
    json: Option<PathBuf>,
}

impl Args {
    fn apply(&self, settings: &mut Settings) {
        if let Some(path) = &self.db_path {
            settings.db_path = path.clone();
        }
        if let Some(cap) = self.cap {
            settings.caps.set_all(cap);
        }
        if let Some(top_n) = self.top_n {
            settings.top_n = top_n;
        }
    }

    fn selected_sources(&self) -> Vec<SourceKind> {
        if self.sources.is_empty() {
            SourceKind::ALL.to_vec()
        } else {
            self.sources.clone()
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    let mut settings = Settings::load(&args.env_file)?;
    args.apply(&mut settings);
    if args.write_env {
        config::save_to_env(&args.env_file, &settings)?;
        info!("Saved settings to {:?}", args.env_file);
    }

    info!("Museum ledger starting...");
    info!("DB: {}", settings.db_path);
    let store = Store::open(&settings.db_path)?;

    if args.skip_ingest {
        info!("Skipping ingestion");
    } else {
        let reports = runner::run(&store, &settings, &args.selected_sources())?;
        for report in &reports {
            println!("{}: inserted {} artworks", report.museum, report.inserted);
            if report.inserted == 0 && report.skipped_existing == 0 {
                warn!("{} delivered no usable records", report.museum);
            }
        }
    }

    let rows = store.load_joined_rows()?;
    info!("Aggregating {} stored artworks", rows.len());
    let aggregates = aggregate::aggregate(&rows, settings.top_n);

    report::write_metrics(&args.report, &aggregates)?;
    info!("Metrics written to {:?}", args.report);

    if let Some(path) = &args.json {
        report::export_json(path, &aggregates)?;
        info!("Aggregates exported to {:?}", path);
    }

    info!("Run completed.");
    Ok(())
}
