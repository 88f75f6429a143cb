use std::cmp::Ordering;

use crate::{
    economics::round1,
    grade::SafetyGrade,
    model::ModelConfig,
    types::{BehaviorTotal, FleetInsights, VehicleAnalysis, FLEET_SUMMARY_BEHAVIORS},
};

/// Reduces an analysed fleet to rankings and summary statistics.
///
/// An empty fleet yields zeroed insights with the ideal efficiency as the
/// average. All rankings use stable sorts, so ties keep input order.
pub fn summarize(vehicles: &[VehicleAnalysis], model: &ModelConfig) -> FleetInsights {
    if vehicles.is_empty() {
        return FleetInsights {
            top3: vec![],
            most_frequent_behaviors: vec![],
            top5_saving_total: 0,
            total_saving: 0,
            total_co2_kg: 0,
            danger_count: 0,
            warning_count: 0,
            total_count: 0,
            average_improvement_pct: 0.0,
            average_current_efficiency: model.economics.ideal_efficiency_km_per_l,
        };
    }

    let mut by_risk: Vec<&VehicleAnalysis> = vehicles.iter().collect();
    by_risk.sort_by(|a, b| b.risk_score.cmp(&a.risk_score));
    let top3 = by_risk.into_iter().take(3).cloned().collect();

    let mut most_frequent_behaviors: Vec<BehaviorTotal> = FLEET_SUMMARY_BEHAVIORS
        .iter()
        .map(|&behavior| BehaviorTotal {
            behavior,
            total: vehicles
                .iter()
                .map(|v| v.record.count(behavior))
                .fold(0.0, |acc, c| acc + c),
        })
        .collect();
    most_frequent_behaviors.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(Ordering::Equal)
    });

    let mut savings: Vec<u64> = vehicles.iter().map(|v| v.estimated_saving_amount).collect();
    savings.sort_by(|a, b| b.cmp(a));
    let top5_saving_total = savings.iter().take(5).sum();

    let total_saving = vehicles.iter().map(|v| v.estimated_saving_amount).sum();
    let total_co2_kg = vehicles.iter().map(|v| v.co2_reduction_kg).sum();
    let danger_count = count_grade(vehicles, SafetyGrade::Danger);
    let warning_count = count_grade(vehicles, SafetyGrade::Warning);

    let n = vehicles.len() as f64;
    let average_improvement_pct = vehicles
        .iter()
        .map(|v| v.fuel_efficiency_improvement_pct)
        .sum::<f64>()
        / n;
    let average_current_efficiency = vehicles
        .iter()
        .map(|v| v.current_fuel_efficiency_km_per_l)
        .sum::<f64>()
        / n;

    FleetInsights {
        top3,
        most_frequent_behaviors,
        top5_saving_total,
        total_saving,
        total_co2_kg,
        danger_count,
        warning_count,
        total_count: vehicles.len(),
        average_improvement_pct: round1(average_improvement_pct),
        average_current_efficiency: round1(average_current_efficiency),
    }
}

pub(crate) fn count_grade(vehicles: &[VehicleAnalysis], grade: SafetyGrade) -> usize {
    vehicles.iter().filter(|v| v.safety_grade == grade).count()
}
