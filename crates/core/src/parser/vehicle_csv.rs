use std::{collections::HashMap, io::Read};

use anyhow::Context;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::{Behavior, VehicleRecord};

use super::ParseMode;

/// A row rejected in best-effort mode. `row` is 1-based, excluding the header.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkippedRow {
    pub source: String,
    pub row: usize,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct ParsedVehicleCsv {
    pub records: Vec<VehicleRecord>,
    pub skipped: Vec<SkippedRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Column {
    Index,
    VehicleId,
    Distance,
    EventTotal,
    Count(Behavior),
}

static RE_UNIT_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*[\(\[][^\)\]]*[\)\]]\s*$").expect("valid regex"));

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim_start_matches('\u{feff}').trim();
    RE_UNIT_SUFFIX
        .replace(trimmed, "")
        .trim()
        .to_lowercase()
        .replace([' ', '-'], "_")
}

fn column_for(header: &str) -> Option<Column> {
    let col = match header {
        "인덱스" | "index" => Column::Index,
        "차량번호" | "vehicle_id" | "vehicle" | "plate" => Column::VehicleId,
        "총운행거리" | "total_distance_km" | "total_distance" | "distance_km" => Column::Distance,
        "합계" | "event_total" | "total" => Column::EventTotal,
        "과속" | "speeding" => Column::Count(Behavior::Speeding),
        "장기과속" | "prolonged_speeding" => Column::Count(Behavior::ProlongedSpeeding),
        "급가속" | "hard_acceleration" => Column::Count(Behavior::HardAcceleration),
        "급출발" | "hard_launch" => Column::Count(Behavior::HardLaunch),
        "급감속" | "hard_deceleration" => Column::Count(Behavior::HardDeceleration),
        "급정지" | "hard_braking" => Column::Count(Behavior::HardBraking),
        "급좌회전" | "hard_left_turn" => Column::Count(Behavior::HardLeftTurn),
        "급우회전" | "hard_right_turn" => Column::Count(Behavior::HardRightTurn),
        "급유턴" | "hard_u_turn" | "hard_uturn" => Column::Count(Behavior::HardUTurn),
        "급앞지르기" | "hard_overtake" => Column::Count(Behavior::HardOvertake),
        "급진로변경" | "hard_lane_change" => Column::Count(Behavior::HardLaneChange),
        _ => return None,
    };
    Some(col)
}

fn parse_number(raw: &str) -> Option<f64> {
    let v: f64 = raw.trim().replace(',', "").parse().ok()?;
    v.is_finite().then_some(v)
}

/// Spreadsheet exports often write integral indices as `1.0`.
fn parse_index(raw: &str) -> Option<u64> {
    let v = parse_number(raw)?;
    (v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64).then_some(v as u64)
}

fn cell<'a>(row: &'a csv::StringRecord, columns: &HashMap<Column, usize>, col: Column) -> &'a str {
    columns
        .get(&col)
        .and_then(|&i| row.get(i))
        .map(str::trim)
        .unwrap_or("")
}

fn read_row(
    row: &csv::StringRecord,
    columns: &HashMap<Column, usize>,
) -> Result<VehicleRecord, String> {
    let vehicle_id = cell(row, columns, Column::VehicleId);
    if vehicle_id.is_empty() {
        return Err("missing vehicle id".to_string());
    }

    let distance_raw = cell(row, columns, Column::Distance);
    let total_distance_km = parse_number(distance_raw)
        .ok_or_else(|| format!("non-numeric total distance {:?}", distance_raw))?;
    if total_distance_km < 0.0 {
        return Err(format!("negative total distance {}", total_distance_km));
    }

    let total_raw = cell(row, columns, Column::EventTotal);
    let event_total = parse_number(total_raw)
        .ok_or_else(|| format!("non-numeric event total {:?}", total_raw))?;

    let index_raw = cell(row, columns, Column::Index);
    let index = if index_raw.is_empty() {
        None
    } else {
        Some(parse_index(index_raw).ok_or_else(|| format!("invalid index {:?}", index_raw))?)
    };

    let mut record = VehicleRecord {
        index,
        vehicle_id: vehicle_id.to_string(),
        total_distance_km,
        event_total,
        ..VehicleRecord::default()
    };

    for b in Behavior::ALL {
        let raw = cell(row, columns, Column::Count(b));
        if raw.is_empty() {
            continue;
        }
        let count =
            parse_number(raw).ok_or_else(|| format!("non-numeric {} {:?}", b.key(), raw))?;
        if count < 0.0 {
            return Err(format!("negative {} {}", b.key(), count));
        }
        *record.count_mut(b) = count;
    }

    Ok(record)
}

/// Reads validated vehicle records from CSV with a header row.
pub fn parse_vehicle_csv<R: Read>(
    r: R,
    source: &str,
    mode: ParseMode,
) -> anyhow::Result<ParsedVehicleCsv> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(r);

    let headers = reader.headers().context("read header row")?.clone();
    let mut columns: HashMap<Column, usize> = HashMap::new();
    for (i, h) in headers.iter().enumerate() {
        if let Some(col) = column_for(&normalize_header(h)) {
            columns.entry(col).or_insert(i);
        }
    }

    for (col, name) in [
        (Column::VehicleId, "vehicle id"),
        (Column::Distance, "total distance"),
        (Column::EventTotal, "event total"),
    ] {
        if !columns.contains_key(&col) {
            anyhow::bail!("missing required column: {}", name);
        }
    }

    let mut records = Vec::new();
    let mut skipped = Vec::new();

    for (i, row) in reader.records().enumerate() {
        let row_no = i + 1;
        let row = row.with_context(|| format!("read row {}", row_no))?;
        if row.iter().all(|c| c.trim().is_empty()) {
            continue;
        }

        match read_row(&row, &columns) {
            Ok(record) => records.push(record),
            Err(reason) => {
                if mode == ParseMode::Strict {
                    anyhow::bail!("invalid row {}: {}", row_no, reason);
                }
                warn!(source, row = row_no, %reason, "skipping invalid row");
                skipped.push(SkippedRow {
                    source: source.to_string(),
                    row: row_no,
                    reason,
                });
            }
        }
    }

    Ok(ParsedVehicleCsv { records, skipped })
}
