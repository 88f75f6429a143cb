use std::{io::Write, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    grade::SafetyGrade,
    insights::count_grade,
    model::ModelConfig,
    parser::{ParseMode, SkippedRow},
    types::{Finding, FleetInsights, VehicleAnalysis},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub report_version: String,
    pub inputs: Inputs,
    pub model: ModelConfig,
    pub fleet_grade: SafetyGrade,
    pub insights: FleetInsights,
    pub distribution: Distribution,
    pub monthly_saving: u64,
    pub top5_monthly_saving: u64,
    pub findings: Vec<Finding>,
    pub vehicles: Vec<VehicleAnalysis>,
    pub gate: Option<GateResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inputs {
    pub input_path: String,
    pub parse_mode: String,
    pub sources: Vec<String>,
    pub skipped_rows: Vec<SkippedRow>,
    #[serde(default)]
    pub truncated_sources: Vec<String>,
}

/// Vehicle counts per grade and per improvement-potential band.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Distribution {
    pub danger: usize,
    pub warning: usize,
    pub safe: usize,
    /// improvement >= 20%
    pub high_improvement: usize,
    /// 10% <= improvement < 20%
    pub medium_improvement: usize,
    pub low_improvement: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateResult {
    pub max_danger: usize,
    pub danger_count: usize,
    pub pass: bool,
    pub reason: String,
}

impl Distribution {
    pub fn from_vehicles(vehicles: &[VehicleAnalysis]) -> Self {
        let band = |pred: fn(f64) -> bool| {
            vehicles
                .iter()
                .filter(|v| pred(v.fuel_efficiency_improvement_pct))
                .count()
        };
        Self {
            danger: count_grade(vehicles, SafetyGrade::Danger),
            warning: count_grade(vehicles, SafetyGrade::Warning),
            safe: count_grade(vehicles, SafetyGrade::Safe),
            high_improvement: band(|p| p >= 20.0),
            medium_improvement: band(|p| (10.0..20.0).contains(&p)),
            low_improvement: band(|p| p < 10.0),
        }
    }
}

/// Grade of the fleet's mean risk score. An empty fleet grades as safe.
pub fn fleet_grade(vehicles: &[VehicleAnalysis]) -> SafetyGrade {
    if vehicles.is_empty() {
        return SafetyGrade::Safe;
    }
    let mean = vehicles.iter().map(|v| v.risk_score as f64).sum::<f64>() / vehicles.len() as f64;
    SafetyGrade::from_score(mean)
}

pub fn evaluate_gate(max_danger: usize, insights: &FleetInsights) -> GateResult {
    let pass = insights.danger_count <= max_danger;
    GateResult {
        max_danger,
        danger_count: insights.danger_count,
        pass,
        reason: if pass {
            "within danger budget".to_string()
        } else {
            format!(
                "danger_count {} exceeds max_danger {}",
                insights.danger_count, max_danger
            )
        },
    }
}

fn per_month(annual: u64) -> u64 {
    (annual as f64 / 12.0).round() as u64
}

impl Report {
    pub fn new(
        input: &Path,
        mode: ParseMode,
        model: ModelConfig,
        insights: FleetInsights,
        findings: Vec<Finding>,
        vehicles: Vec<VehicleAnalysis>,
        gate: Option<GateResult>,
    ) -> Self {
        let monthly_saving = per_month(insights.total_saving);
        let top5_monthly_saving = per_month(insights.top5_saving_total);
        Self {
            report_version: "0.1.0".to_string(),
            inputs: Inputs {
                input_path: input.display().to_string(),
                parse_mode: match mode {
                    ParseMode::Strict => "STRICT".to_string(),
                    ParseMode::BestEffort => "BEST_EFFORT".to_string(),
                },
                sources: vec![],
                skipped_rows: vec![],
                truncated_sources: vec![],
            },
            model,
            fleet_grade: fleet_grade(&vehicles),
            distribution: Distribution::from_vehicles(&vehicles),
            insights,
            monthly_saving,
            top5_monthly_saving,
            findings,
            vehicles,
            gate,
        }
    }

    pub fn to_markdown(&self) -> String {
        let ins = &self.insights;
        let mut s = String::new();
        s.push_str("# drivescore report\n\n");
        s.push_str(&format!("- report_version: `{}`\n", self.report_version));
        s.push_str(&format!("- input_path: `{}`\n", self.inputs.input_path));
        s.push_str(&format!("- parse_mode: `{}`\n", self.inputs.parse_mode));
        if !self.inputs.skipped_rows.is_empty() {
            s.push_str(&format!(
                "- skipped_rows: `{}`\n",
                self.inputs.skipped_rows.len()
            ));
        }
        if !self.inputs.truncated_sources.is_empty() {
            s.push_str(&format!(
                "- truncated_sources: `{}` (scan limit reached)\n",
                self.inputs.truncated_sources.len()
            ));
        }
        s.push('\n');

        s.push_str("## Fleet summary\n\n");
        s.push_str(&format!(
            "- fleet_grade: {} ({}) `{}`\n",
            self.fleet_grade.label(),
            self.fleet_grade.message(),
            self.fleet_grade.color()
        ));
        s.push_str(&format!("- vehicles: `{}`\n", ins.total_count));
        s.push_str(&format!("- danger: `{}`\n", ins.danger_count));
        s.push_str(&format!("- warning: `{}`\n", ins.warning_count));
        s.push_str(&format!("- total_saving: `{}`\n", ins.total_saving));
        s.push_str(&format!("- monthly_saving: `{}`\n", self.monthly_saving));
        s.push_str(&format!("- top5_saving_total: `{}`\n", ins.top5_saving_total));
        s.push_str(&format!(
            "- top5_monthly_saving: `{}`\n",
            self.top5_monthly_saving
        ));
        s.push_str(&format!("- total_co2_kg: `{}`\n", ins.total_co2_kg));
        s.push_str(&format!(
            "- average_improvement_pct: `{:.1}`\n",
            ins.average_improvement_pct
        ));
        s.push_str(&format!(
            "- average_current_efficiency: `{:.1}` km/L (ideal `{:.1}`)\n",
            ins.average_current_efficiency, self.model.economics.ideal_efficiency_km_per_l
        ));
        s.push('\n');

        s.push_str("## Improvement priority\n\n");
        if ins.top3.is_empty() {
            s.push_str("- (none)\n");
        }
        for (i, v) in ins.top3.iter().enumerate() {
            s.push_str(&format!(
                "{}. `{}` risk_score `{}`, saving `{}`\n",
                i + 1,
                v.record.vehicle_id,
                v.risk_score,
                v.estimated_saving_amount
            ));
        }
        s.push('\n');

        s.push_str("## Behavior totals\n\n");
        for t in &ins.most_frequent_behaviors {
            s.push_str(&format!("- {}: `{:.1}`\n", t.behavior.key(), t.total));
        }
        s.push('\n');

        s.push_str("## Distribution\n\n");
        let d = &self.distribution;
        s.push_str(&format!(
            "- grades: danger `{}`, warning `{}`, safe `{}`\n",
            d.danger, d.warning, d.safe
        ));
        s.push_str(&format!(
            "- improvement: high `{}`, medium `{}`, low `{}`\n",
            d.high_improvement, d.medium_improvement, d.low_improvement
        ));
        s.push('\n');

        if let Some(g) = &self.gate {
            s.push_str("## Danger gate\n\n");
            s.push_str(&format!("- max_danger: `{}`\n", g.max_danger));
            s.push_str(&format!("- pass: `{}`\n", g.pass));
            s.push_str(&format!("- reason: `{}`\n", g.reason));
            s.push('\n');
        }

        s.push_str("## Findings\n\n");
        if self.findings.is_empty() {
            s.push_str("- (none)\n");
        } else {
            for f in &self.findings {
                s.push_str(&format!("### {}\n", f.id));
                s.push_str(&format!("- severity: `{:?}`\n", f.severity));
                s.push_str(&format!("- likely_cause: {}\n", f.likely_cause));
                if !f.evidence.is_empty() {
                    s.push_str("- evidence:\n");
                    for e in &f.evidence {
                        s.push_str(&format!("  - {}\n", e));
                    }
                }
                if !f.suggested_actions.is_empty() {
                    s.push_str("- suggested_actions:\n");
                    for a in &f.suggested_actions {
                        s.push_str(&format!("  - {}\n", a));
                    }
                }
                s.push('\n');
            }
        }

        s.push_str("## Vehicles\n\n");
        s.push_str("| vehicle | grade | risk | saving | co2 kg | trees | improvement % | km/L |\n");
        s.push_str("|---|---|---|---|---|---|---|---|\n");
        for v in &self.vehicles {
            s.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} | {:.1} | {:.1} |\n",
                v.record.vehicle_id,
                v.safety_grade.label(),
                v.risk_score,
                v.estimated_saving_amount,
                v.co2_reduction_kg,
                v.tree_equivalent,
                v.fuel_efficiency_improvement_pct,
                v.current_fuel_efficiency_km_per_l
            ));
        }

        s
    }
}

#[derive(Serialize)]
struct VehicleRow<'a> {
    vehicle_id: &'a str,
    total_distance_km: f64,
    safety_grade: SafetyGrade,
    risk_score: u32,
    estimated_saving_amount: u64,
    co2_reduction_kg: u64,
    tree_equivalent: u64,
    fuel_efficiency_improvement_pct: f64,
    current_fuel_efficiency_km_per_l: f64,
}

/// Writes one flat CSV row per analysed vehicle.
pub fn write_vehicle_csv<W: Write>(w: W, vehicles: &[VehicleAnalysis]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(w);
    for v in vehicles {
        writer.serialize(VehicleRow {
            vehicle_id: &v.record.vehicle_id,
            total_distance_km: v.record.total_distance_km,
            safety_grade: v.safety_grade,
            risk_score: v.risk_score,
            estimated_saving_amount: v.estimated_saving_amount,
            co2_reduction_kg: v.co2_reduction_kg,
            tree_equivalent: v.tree_equivalent,
            fuel_efficiency_improvement_pct: v.fuel_efficiency_improvement_pct,
            current_fuel_efficiency_km_per_l: v.current_fuel_efficiency_km_per_l,
        })?;
    }
    writer.flush()?;
    Ok(())
}
