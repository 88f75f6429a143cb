use proptest::prelude::*;

use drivescore_core::types::{Behavior, VehicleRecord};
use drivescore_core::{analyze, analyze_vehicle, summarize, ModelConfig};

fn arb_record() -> impl Strategy<Value = VehicleRecord> {
    (
        1.0f64..50_000.0,
        prop::collection::vec(0.0f64..80.0, Behavior::ALL.len()),
    )
        .prop_map(|(distance, counts)| {
            let mut r = VehicleRecord {
                vehicle_id: "P".to_string(),
                total_distance_km: distance,
                ..VehicleRecord::default()
            };
            for (b, c) in Behavior::ALL.iter().zip(counts) {
                *r.count_mut(*b) = c;
            }
            r
        })
}

proptest! {
    #[test]
    fn short_distance_is_always_zero_impact(
        distance in 0.0f64..1.0,
        counts in prop::collection::vec(0.0f64..500.0, Behavior::ALL.len()),
    ) {
        let mut r = VehicleRecord { total_distance_km: distance, ..VehicleRecord::default() };
        for (b, c) in Behavior::ALL.iter().zip(counts) {
            *r.count_mut(*b) = c;
        }
        let a = analyze_vehicle(&r, &ModelConfig::default());
        prop_assert_eq!(a.risk_score, 0);
        prop_assert_eq!(a.estimated_saving_amount, 0);
        prop_assert_eq!(a.fuel_efficiency_improvement_pct, 0.0);
        prop_assert_eq!(a.current_fuel_efficiency_km_per_l, 6.0);
        prop_assert_eq!(a.co2_reduction_kg, 0);
        prop_assert_eq!(a.tree_equivalent, 0);
    }

    #[test]
    fn efficiency_stays_within_model_bounds(r in arb_record()) {
        let a = analyze_vehicle(&r, &ModelConfig::default());
        // 6.0 * (1 - 0.35) = 3.9 at full saturation
        prop_assert!(a.current_fuel_efficiency_km_per_l >= 3.9);
        prop_assert!(a.current_fuel_efficiency_km_per_l <= 6.0);
    }

    #[test]
    fn increasing_a_behavior_never_helps(
        r in arb_record(),
        idx in 0usize..Behavior::ALL.len(),
        extra in 0.0f64..40.0,
    ) {
        let model = ModelConfig::default();
        let before = analyze_vehicle(&r, &model);

        let mut worse = r.clone();
        *worse.count_mut(Behavior::ALL[idx]) += extra;
        let after = analyze_vehicle(&worse, &model);

        prop_assert!(after.risk_score >= before.risk_score);
        prop_assert!(
            after.current_fuel_efficiency_km_per_l <= before.current_fuel_efficiency_km_per_l
        );
        prop_assert!(after.estimated_saving_amount >= before.estimated_saving_amount);
    }

    #[test]
    fn analysis_is_deterministic(r in arb_record()) {
        let model = ModelConfig::default();
        prop_assert_eq!(analyze_vehicle(&r, &model), analyze_vehicle(&r, &model));
    }

    #[test]
    fn fleet_totals_match_per_vehicle_sums(records in prop::collection::vec(arb_record(), 1..20)) {
        let model = ModelConfig::default();
        let fleet = analyze(&records, &model);
        let insights = summarize(&fleet, &model);

        prop_assert_eq!(insights.total_count, records.len());
        prop_assert_eq!(insights.top3.len(), records.len().min(3));
        prop_assert_eq!(
            insights.total_saving,
            fleet.iter().map(|v| v.estimated_saving_amount).sum::<u64>()
        );
        prop_assert!(insights.top5_saving_total <= insights.total_saving);
        prop_assert!(insights.danger_count + insights.warning_count <= insights.total_count);
        for pair in insights.top3.windows(2) {
            prop_assert!(pair[0].risk_score >= pair[1].risk_score);
        }
    }
}
