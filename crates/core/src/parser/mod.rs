mod vehicle_csv;

use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::types::VehicleRecord;

pub use vehicle_csv::{parse_vehicle_csv, ParsedVehicleCsv, SkippedRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    Strict,
    BestEffort,
}

#[derive(Debug, Clone)]
pub struct ParsedFleet {
    pub mode: ParseMode,
    pub records: Vec<VehicleRecord>,
    pub skipped: Vec<SkippedRow>,
    pub sources: Vec<String>,
    /// Files left unread because the scan limit was reached.
    pub truncated_sources: Vec<String>,
}

/// Reads vehicle records from a CSV file or every `*.csv` under a directory.
///
/// Files are visited in file-name order and their records concatenated.
/// Once the next file would push the total past `max_total_bytes_scanned`,
/// it and every later file are listed in `truncated_sources` instead.
pub fn parse_fleet_input(
    input: &Path,
    mode: ParseMode,
    max_total_bytes_scanned: u64,
) -> anyhow::Result<ParsedFleet> {
    if !input.exists() {
        anyhow::bail!("input not found: {}", input.display());
    }

    let mut records: Vec<VehicleRecord> = Vec::new();
    let mut skipped: Vec<SkippedRow> = Vec::new();
    let mut sources: Vec<String> = Vec::new();
    let mut truncated_sources: Vec<String> = Vec::new();

    let mut scanned: u64 = 0;

    for entry in WalkDir::new(input).follow_links(false).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if ext != "csv" {
            continue;
        }

        let source = path.display().to_string();

        let len = std::fs::metadata(path)?.len();
        let over_limit = scanned.saturating_add(len) > max_total_bytes_scanned;
        if over_limit || !truncated_sources.is_empty() {
            truncated_sources.push(source);
            continue;
        }
        scanned += len;

        let f = File::open(path).with_context(|| format!("open {}", source))?;
        let parsed = parse_vehicle_csv(BufReader::new(f), &source, mode)
            .with_context(|| format!("parse {}", source))?;

        debug!(
            path = %source,
            records = parsed.records.len(),
            skipped = parsed.skipped.len(),
            "parsed vehicle file"
        );

        records.extend(parsed.records);
        skipped.extend(parsed.skipped);
        sources.push(source);
    }

    if !truncated_sources.is_empty() {
        warn!(
            limit = max_total_bytes_scanned,
            unread = truncated_sources.len(),
            first = %truncated_sources[0],
            "scan limit reached, remaining files not read"
        );
    }

    if sources.is_empty() {
        if !truncated_sources.is_empty() {
            anyhow::bail!(
                "scan limit {} bytes exceeded at {}",
                max_total_bytes_scanned,
                input.display()
            );
        }
        anyhow::bail!("no CSV files found at {}", input.display());
    }

    if records.is_empty() {
        anyhow::bail!(
            "insufficient input: no valid vehicle records in {}",
            input.display()
        );
    }

    Ok(ParsedFleet {
        mode,
        records,
        skipped,
        sources,
        truncated_sources,
    })
}
