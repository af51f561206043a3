use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::analytics::aggregate::{Aggregates, MuseumBreakdown, Ranked};

/// Plain-text summary of the aggregates.
pub fn render_metrics(aggregates: &Aggregates) -> String {
    let mut out = String::new();

    out.push_str("=== Top Cultures per Museum ===\n");
    write_breakdowns(&mut out, &aggregates.culture_by_museum);

    out.push_str("\n=== Top Artists ===\n");
    write_ranked(&mut out, &aggregates.top_artists, "");

    out.push_str("\n=== Top Classifications ===\n");
    write_ranked(&mut out, &aggregates.top_classifications, "");

    out.push_str("\n=== Artworks by Century per Museum ===\n");
    write_breakdowns(&mut out, &aggregates.century_by_museum);

    out
}

fn write_breakdowns(out: &mut String, breakdowns: &[MuseumBreakdown]) {
    for breakdown in breakdowns {
        let _ = writeln!(out, "{}:", breakdown.museum);
        write_ranked(out, &breakdown.counts, "  ");
    }
}

fn write_ranked(out: &mut String, ranked: &[Ranked], indent: &str) {
    for entry in ranked {
        let _ = writeln!(out, "{indent}{}: {}", entry.label, entry.count);
    }
}

pub fn write_metrics(path: &Path, aggregates: &Aggregates) -> Result<()> {
    fs::write(path, render_metrics(aggregates))
        .with_context(|| format!("Failed to write metrics to {:?}", path))
}

/// Writes the aggregates as JSON for the chart renderer.
pub fn export_json(path: &Path, aggregates: &Aggregates) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, aggregates)
        .with_context(|| format!("Failed to serialize aggregates to {:?}", path))?;
    writer.flush()?;
    Ok(())
}
