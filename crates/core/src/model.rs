//! Calibration constants for scoring and the fuel model.
//!
//! Weights reflect each behavior's relative impact on fuel economy. They are
//! taken from published eco-driving studies, not fitted to the input data.

use serde::{Deserialize, Serialize};

use crate::types::Behavior;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BehaviorWeights {
    pub hard_acceleration: f64,
    pub hard_launch: f64,
    pub hard_deceleration: f64,
    pub hard_braking: f64,
    pub speeding: f64,
    pub prolonged_speeding: f64,
    pub hard_left_turn: f64,
    pub hard_right_turn: f64,
    pub hard_u_turn: f64,
    pub hard_overtake: f64,
    pub hard_lane_change: f64,
}

impl Default for BehaviorWeights {
    fn default() -> Self {
        Self {
            hard_acceleration: 1.5,
            hard_launch: 1.3,
            hard_deceleration: 1.0,
            hard_braking: 1.2,
            speeding: 1.4,
            prolonged_speeding: 2.0,
            hard_left_turn: 0.7,
            hard_right_turn: 0.7,
            hard_u_turn: 0.8,
            hard_overtake: 0.9,
            hard_lane_change: 0.8,
        }
    }
}

impl BehaviorWeights {
    pub fn weight(&self, behavior: Behavior) -> f64 {
        match behavior {
            Behavior::HardAcceleration => self.hard_acceleration,
            Behavior::HardLaunch => self.hard_launch,
            Behavior::HardDeceleration => self.hard_deceleration,
            Behavior::HardBraking => self.hard_braking,
            Behavior::Speeding => self.speeding,
            Behavior::ProlongedSpeeding => self.prolonged_speeding,
            Behavior::HardLeftTurn => self.hard_left_turn,
            Behavior::HardRightTurn => self.hard_right_turn,
            Behavior::HardUTurn => self.hard_u_turn,
            Behavior::HardOvertake => self.hard_overtake,
            Behavior::HardLaneChange => self.hard_lane_change,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EconomicConstants {
    /// km/L of a mid/heavy commercial vehicle driven economically.
    pub ideal_efficiency_km_per_l: f64,
    /// Currency units per litre of diesel.
    pub fuel_price_per_l: f64,
    pub co2_kg_per_l: f64,
    /// Annual CO2 absorption of one pine tree, in kg.
    pub co2_absorbed_per_tree_kg: f64,
    /// Weighted score at which degradation saturates.
    pub risk_saturation_score: f64,
    pub degradation_exponent: f64,
    pub max_degradation_rate: f64,
}

impl Default for EconomicConstants {
    fn default() -> Self {
        Self {
            ideal_efficiency_km_per_l: 6.0,
            fuel_price_per_l: 1600.0,
            co2_kg_per_l: 2.65,
            co2_absorbed_per_tree_kg: 6.6,
            risk_saturation_score: 50.0,
            degradation_exponent: 1.3,
            max_degradation_rate: 0.35,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
    pub weights: BehaviorWeights,
    pub economics: EconomicConstants,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_behavior_has_a_positive_default_weight() {
        let weights = BehaviorWeights::default();
        for b in Behavior::ALL {
            assert!(weights.weight(b) > 0.0, "{:?}", b);
        }
        assert_eq!(weights.weight(Behavior::ProlongedSpeeding), 2.0);
        assert_eq!(weights.weight(Behavior::HardLeftTurn), 0.7);
    }
}
