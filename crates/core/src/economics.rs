//! Fuel-cost and CO2 estimates derived from risky-driving counts.
//!
//! Efficiency degrades nonlinearly with the weighted risk score: the score is
//! normalised against a saturation point, raised to an exponent above 1 so
//! small scores barely register, and scaled to a maximum degradation rate.
//! The estimate is statistical; vehicle type, load, road and weather are not
//! modelled.

use serde::{Deserialize, Serialize};

use crate::{
    model::ModelConfig,
    scoring::{weighted_risk_score, MIN_EXPOSURE_KM},
    types::VehicleRecord,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FuelSavings {
    pub saving_amount: u64,
    /// Percent, one decimal place.
    pub improvement_pct: f64,
    /// km/L, one decimal place.
    pub current_efficiency: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Co2Reduction {
    pub co2_kg: u64,
    pub tree_equivalent: u64,
}

pub(crate) fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

pub fn fuel_savings(record: &VehicleRecord, model: &ModelConfig) -> FuelSavings {
    let econ = &model.economics;
    let ideal = econ.ideal_efficiency_km_per_l;

    if record.total_distance_km < MIN_EXPOSURE_KM {
        return FuelSavings {
            saving_amount: 0,
            improvement_pct: 0.0,
            current_efficiency: ideal,
        };
    }

    let score = weighted_risk_score(record, &model.weights);
    let normalized = (score / econ.risk_saturation_score).min(1.0);
    let nonlinear_risk = normalized.powf(econ.degradation_exponent);
    let degradation_rate = econ.max_degradation_rate * nonlinear_risk;

    let current = ideal * (1.0 - degradation_rate);

    let current_fuel_used = record.total_distance_km / current;
    let ideal_fuel_used = record.total_distance_km / ideal;
    let recoverable_fuel = current_fuel_used - ideal_fuel_used;

    let improvement_pct = (ideal - current) / current * 100.0;

    FuelSavings {
        saving_amount: (recoverable_fuel * econ.fuel_price_per_l).round() as u64,
        improvement_pct: round1(improvement_pct),
        current_efficiency: round1(current),
    }
}

/// CO2 avoided by recovering the fuel behind `saving_amount`.
///
/// Fuel is re-derived from the rounded monetary amount so the CO2 figure stays
/// consistent with the reported saving.
pub fn co2_reduction(saving_amount: u64, model: &ModelConfig) -> Co2Reduction {
    let econ = &model.economics;
    let recovered_fuel = saving_amount as f64 / econ.fuel_price_per_l;
    let co2_kg = (recovered_fuel * econ.co2_kg_per_l).round();
    let trees = (co2_kg / econ.co2_absorbed_per_tree_kg).floor();

    Co2Reduction {
        co2_kg: co2_kg as u64,
        tree_equivalent: trees as u64,
    }
}
