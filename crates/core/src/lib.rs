pub mod analyzer;
pub mod config;
pub mod economics;
pub mod grade;
pub mod insights;
pub mod model;
pub mod parser;
pub mod report;
pub mod rules;
pub mod scoring;
pub mod types;

use std::path::Path;

use anyhow::Context;
use tracing::{debug, info};

pub use crate::{
    analyzer::{analyze, analyze_vehicle, vehicle_detail, VehicleDetail},
    economics::{co2_reduction, fuel_savings},
    grade::{classify, SafetyGrade},
    insights::summarize,
    model::ModelConfig,
    scoring::{risk_score, weighted_risk_score},
};

use crate::{
    parser::ParseMode,
    report::{evaluate_gate, Report},
    rules::run_rules,
};

#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    pub strict: bool,
    pub max_danger: Option<usize>,
    pub max_total_bytes_scanned: u64,
    pub model: ModelConfig,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            strict: false,
            max_danger: None,
            max_total_bytes_scanned: 50 * 1024 * 1024,
            model: ModelConfig::default(),
        }
    }
}

/// Ingests a CSV file or directory and builds the full fleet report.
pub fn analyze_path(input: &Path, opts: AnalyzeOptions) -> anyhow::Result<Report> {
    let parse_mode = if opts.strict {
        ParseMode::Strict
    } else {
        ParseMode::BestEffort
    };

    let parsed = parser::parse_fleet_input(input, parse_mode, opts.max_total_bytes_scanned)
        .with_context(|| format!("failed to read vehicle records at {}", input.display()))?;

    debug!(
        records = parsed.records.len(),
        skipped = parsed.skipped.len(),
        "analyzing fleet"
    );

    let vehicles = analyze(&parsed.records, &opts.model);
    let insights = summarize(&vehicles, &opts.model);
    let findings = run_rules(&insights, &vehicles);
    let gate = opts.max_danger.map(|m| evaluate_gate(m, &insights));

    info!(
        vehicles = insights.total_count,
        danger = insights.danger_count,
        warning = insights.warning_count,
        total_saving = insights.total_saving,
        "fleet analyzed"
    );

    let mut report = Report::new(
        input,
        parse_mode,
        opts.model,
        insights,
        findings,
        vehicles,
        gate,
    );
    report.inputs.sources = parsed.sources;
    report.inputs.skipped_rows = parsed.skipped;
    report.inputs.truncated_sources = parsed.truncated_sources;

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VehicleRecord;

    #[test]
    fn zero_counts_grade_safe_with_ideal_efficiency() {
        let record = VehicleRecord {
            vehicle_id: "Z".to_string(),
            total_distance_km: 3200.0,
            event_total: 0.0,
            ..VehicleRecord::default()
        };
        let a = analyze_vehicle(&record, &ModelConfig::default());
        assert_eq!(a.risk_score, 0);
        assert_eq!(a.safety_grade, SafetyGrade::Safe);
        assert_eq!(a.estimated_saving_amount, 0);
        assert_eq!(a.current_fuel_efficiency_km_per_l, 6.0);
        assert_eq!(a.co2_reduction_kg, 0);
        assert_eq!(a.tree_equivalent, 0);
    }
}
