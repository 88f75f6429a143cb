use crate::{
    model::BehaviorWeights,
    types::{Behavior, VehicleRecord},
};

/// Records below this distance carry too little exposure to score.
pub const MIN_EXPOSURE_KM: f64 = 1.0;

/// Weighted sum of the per-100km behavior counts.
///
/// Counts are already normalised per 100km, so the sum is returned without
/// any further distance scaling. Returns 0 below [`MIN_EXPOSURE_KM`].
pub fn weighted_risk_score(record: &VehicleRecord, weights: &BehaviorWeights) -> f64 {
    if record.total_distance_km < MIN_EXPOSURE_KM {
        return 0.0;
    }

    Behavior::ALL
        .iter()
        .map(|&b| record.count(b) * weights.weight(b))
        .fold(0.0, |acc, v| acc + v)
}

pub fn risk_score(record: &VehicleRecord, weights: &BehaviorWeights) -> u32 {
    weighted_risk_score(record, weights).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(distance: f64) -> VehicleRecord {
        VehicleRecord {
            vehicle_id: "T-1".to_string(),
            total_distance_km: distance,
            ..VehicleRecord::default()
        }
    }

    #[test]
    fn short_distance_scores_zero() {
        let mut r = record(0.9);
        r.prolonged_speeding = 40.0;
        assert_eq!(weighted_risk_score(&r, &BehaviorWeights::default()), 0.0);
        assert_eq!(risk_score(&r, &BehaviorWeights::default()), 0);
    }

    #[test]
    fn sums_every_category_with_its_weight() {
        let mut r = record(100.0);
        for b in Behavior::ALL {
            *r.count_mut(b) = 1.0;
        }
        let score = weighted_risk_score(&r, &BehaviorWeights::default());
        assert!((score - 12.3).abs() < 1e-9, "score={score}");
        assert_eq!(risk_score(&r, &BehaviorWeights::default()), 12);
    }

    #[test]
    fn alternate_weights_are_honoured() {
        let mut r = record(10.0);
        r.hard_braking = 4.0;
        let weights = BehaviorWeights {
            hard_braking: 5.0,
            ..BehaviorWeights::default()
        };
        assert_eq!(weighted_risk_score(&r, &weights), 20.0);
    }

    #[test]
    fn risk_score_rounds_half_up() {
        let mut r = record(50.0);
        r.hard_deceleration = 12.5;
        assert_eq!(risk_score(&r, &BehaviorWeights::default()), 13);
    }
}
