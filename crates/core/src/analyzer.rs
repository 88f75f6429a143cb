use serde::{Deserialize, Serialize};

use crate::{
    economics::{co2_reduction, fuel_savings},
    grade::classify,
    model::ModelConfig,
    scoring::risk_score,
    types::{Behavior, VehicleAnalysis, VehicleRecord},
};

pub fn analyze_vehicle(record: &VehicleRecord, model: &ModelConfig) -> VehicleAnalysis {
    let safety_grade = classify(record, &model.weights);
    let savings = fuel_savings(record, model);
    let co2 = co2_reduction(savings.saving_amount, model);

    VehicleAnalysis {
        record: record.clone(),
        safety_grade,
        grade_badge: safety_grade.into(),
        estimated_saving_amount: savings.saving_amount,
        co2_reduction_kg: co2.co2_kg,
        risk_score: risk_score(record, &model.weights),
        tree_equivalent: co2.tree_equivalent,
        fuel_efficiency_improvement_pct: savings.improvement_pct,
        current_fuel_efficiency_km_per_l: savings.current_efficiency,
    }
}

/// One analysis per record, in input order.
pub fn analyze(records: &[VehicleRecord], model: &ModelConfig) -> Vec<VehicleAnalysis> {
    records.iter().map(|r| analyze_vehicle(r, model)).collect()
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BehaviorContribution {
    pub behavior: Behavior,
    pub count: f64,
    pub weight: f64,
}

impl BehaviorContribution {
    pub fn weighted(&self) -> f64 {
        self.count * self.weight
    }
}

/// Drill-down view of a single analysed vehicle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VehicleDetail {
    pub vehicle_id: String,
    pub safety_grade: crate::grade::SafetyGrade,
    pub grade_badge: crate::grade::GradeBadge,
    pub risk_score: u32,
    pub estimated_saving_amount: u64,
    pub fuel_efficiency_improvement_pct: f64,
    pub current_fuel_efficiency_km_per_l: f64,
    pub ideal_fuel_efficiency_km_per_l: f64,
    pub co2_reduction_kg: u64,
    pub tree_equivalent: u64,
    pub total_distance_km: f64,
    pub top_behaviors: Vec<BehaviorContribution>,
}

/// Up to three behaviors that contribute most to the vehicle's score.
///
/// Unlike the fleet aggregate, all eleven categories are considered.
pub fn vehicle_detail(analysis: &VehicleAnalysis, model: &ModelConfig) -> VehicleDetail {
    let mut contributions: Vec<BehaviorContribution> = Behavior::ALL
        .iter()
        .map(|&b| BehaviorContribution {
            behavior: b,
            count: analysis.record.count(b),
            weight: model.weights.weight(b),
        })
        .filter(|c| c.count > 0.0)
        .collect();

    contributions.sort_by(|a, b| b.weighted().total_cmp(&a.weighted()));
    contributions.truncate(3);

    VehicleDetail {
        vehicle_id: analysis.record.vehicle_id.clone(),
        safety_grade: analysis.safety_grade,
        grade_badge: analysis.grade_badge.clone(),
        risk_score: analysis.risk_score,
        estimated_saving_amount: analysis.estimated_saving_amount,
        fuel_efficiency_improvement_pct: analysis.fuel_efficiency_improvement_pct,
        current_fuel_efficiency_km_per_l: analysis.current_fuel_efficiency_km_per_l,
        ideal_fuel_efficiency_km_per_l: model.economics.ideal_efficiency_km_per_l,
        co2_reduction_kg: analysis.co2_reduction_kg,
        tree_equivalent: analysis.tree_equivalent,
        total_distance_km: analysis.record.total_distance_km,
        top_behaviors: contributions,
    }
}
