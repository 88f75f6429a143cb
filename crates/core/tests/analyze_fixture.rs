use std::path::Path;

use drivescore_core::{analyze_path, grade::SafetyGrade, types::Behavior, AnalyzeOptions};

#[test]
fn analyze_fixture_produces_expected_fleet_report() {
    let input = Path::new("../../fixtures/fleet_basic/vehicles.csv");
    let report = analyze_path(input, AnalyzeOptions::default()).expect("analyze_path ok");

    let ins = &report.insights;
    assert_eq!(ins.total_count, 5);
    assert_eq!(ins.danger_count, 1);
    assert_eq!(ins.warning_count, 2);
    assert_eq!(ins.total_saving, 205_963);
    assert_eq!(ins.top5_saving_total, 205_963);
    assert_eq!(ins.total_co2_kg, 342);
    assert_eq!(ins.average_improvement_pct, 13.8);
    assert_eq!(ins.average_current_efficiency, 5.4);

    let top3: Vec<_> = ins.top3.iter().map(|v| v.record.vehicle_id.as_str()).collect();
    assert_eq!(top3, vec!["34나5678", "12가3456", "90마5678"]);

    let behaviors: Vec<_> = ins.most_frequent_behaviors.iter().map(|t| t.behavior).collect();
    assert_eq!(
        behaviors,
        vec![
            Behavior::Speeding,
            Behavior::HardAcceleration,
            Behavior::HardBraking,
            Behavior::ProlongedSpeeding,
            Behavior::HardLaunch,
            Behavior::HardDeceleration,
        ]
    );

    let first = &report.vehicles[0];
    assert_eq!(first.record.index, Some(1));
    assert_eq!(first.record.total_distance_km, 1520.5);
    assert_eq!(first.risk_score, 19);
    assert_eq!(first.estimated_saving_amount, 43_916);
    assert_eq!(first.co2_reduction_kg, 73);
    assert_eq!(first.tree_equivalent, 11);
    assert_eq!(first.fuel_efficiency_improvement_pct, 10.8);
    assert_eq!(first.current_fuel_efficiency_km_per_l, 5.4);

    let short_trip = &report.vehicles[3];
    assert_eq!(short_trip.risk_score, 0);
    assert_eq!(short_trip.safety_grade, SafetyGrade::Safe);
    assert_eq!(short_trip.current_fuel_efficiency_km_per_l, 6.0);

    assert_eq!(report.fleet_grade, SafetyGrade::Warning);
    assert!(report.inputs.skipped_rows.is_empty());
    assert!(report
        .inputs
        .sources
        .iter()
        .any(|s| s.ends_with("vehicles.csv")));
}

#[test]
fn best_effort_skips_invalid_rows() {
    let input = Path::new("../../fixtures/fleet_dirty/vehicles.csv");
    let report = analyze_path(input, AnalyzeOptions::default()).expect("best effort ok");

    let ids: Vec<_> = report
        .vehicles
        .iter()
        .map(|v| v.record.vehicle_id.as_str())
        .collect();
    assert_eq!(ids, vec!["TRK-001", "TRK-004"]);

    let skipped: Vec<_> = report.inputs.skipped_rows.iter().map(|s| s.row).collect();
    assert_eq!(skipped, vec![2, 3]);
    assert_eq!(report.inputs.parse_mode, "BEST_EFFORT");

    // 29.6 rounds to a risk score of 30 but still grades as a warning.
    let trk4 = &report.vehicles[1];
    assert_eq!(trk4.risk_score, 30);
    assert_eq!(trk4.safety_grade, SafetyGrade::Warning);
    assert_eq!(report.insights.danger_count, 0);
}

#[test]
fn strict_mode_rejects_invalid_rows() {
    let input = Path::new("../../fixtures/fleet_dirty/vehicles.csv");
    let opts = AnalyzeOptions {
        strict: true,
        ..AnalyzeOptions::default()
    };

    let err = analyze_path(input, opts).unwrap_err();
    let msg = format!("{:#}", err);
    assert!(msg.contains("invalid row 2"), "{msg}");
    assert!(msg.contains("missing vehicle id"), "{msg}");
}

#[test]
fn directory_input_concatenates_files_in_name_order() {
    let input = Path::new("../../fixtures/fleet_split");
    let report = analyze_path(input, AnalyzeOptions::default()).expect("analyze dir");

    let ids: Vec<_> = report
        .vehicles
        .iter()
        .map(|v| v.record.vehicle_id.as_str())
        .collect();
    assert_eq!(ids, vec!["VAN-01", "VAN-02", "VAN-03"]);
    assert_eq!(report.inputs.sources.len(), 2);
    assert_eq!(report.insights.total_saving, 83_223);
    assert_eq!(report.insights.danger_count, 1);
}

#[test]
fn scan_limit_reports_unread_files() {
    let input = Path::new("../../fixtures/fleet_split");
    let a_len = std::fs::metadata(input.join("a.csv")).unwrap().len();
    let opts = AnalyzeOptions {
        max_total_bytes_scanned: a_len,
        ..AnalyzeOptions::default()
    };

    let report = analyze_path(input, opts).expect("analyze truncated dir");
    assert_eq!(report.inputs.sources.len(), 1);
    assert_eq!(report.inputs.truncated_sources.len(), 1);
    assert!(report.inputs.truncated_sources[0].ends_with("b.csv"));
    assert!(report
        .vehicles
        .iter()
        .all(|v| v.record.vehicle_id != "VAN-03"));
}

#[test]
fn danger_gate_is_evaluated() {
    let input = Path::new("../../fixtures/fleet_basic/vehicles.csv");
    let opts = AnalyzeOptions {
        max_danger: Some(0),
        ..AnalyzeOptions::default()
    };

    let report = analyze_path(input, opts).expect("analyze with gate");
    let gate = report.gate.as_ref().expect("gate present");
    assert!(!gate.pass);
    assert_eq!(gate.danger_count, 1);
}

#[test]
fn missing_input_is_an_error() {
    let err = analyze_path(Path::new("does-not-exist.csv"), AnalyzeOptions::default())
        .unwrap_err();
    assert!(format!("{:#}", err).contains("input not found"));
}

#[test]
fn fixture_findings_snapshot() {
    let input = Path::new("../../fixtures/fleet_basic/vehicles.csv");
    let report = analyze_path(input, AnalyzeOptions::default()).expect("analyze_path ok");

    insta::assert_json_snapshot!(report.findings, @r###"
    [
      {
        "id": "DANGER_VEHICLES",
        "severity": "HIGH",
        "evidence": [
          "34나5678 (risk_score=47)"
        ],
        "likely_cause": "1 of 5 vehicles score 30+ risk points per 100km",
        "suggested_actions": [
          "Schedule eco-driving coaching for these drivers first",
          "Review their most frequent behaviors in the vehicle detail view"
        ]
      },
      {
        "id": "DOMINANT_BEHAVIOR",
        "severity": "LOW",
        "evidence": [
          "speeding=19.0 events/100km across the fleet"
        ],
        "likely_cause": "Speeding is the most frequent risky behavior",
        "suggested_actions": [
          "Hold a steady 60-80 km/h where limits allow",
          "Keep engine speed under 2000 rpm"
        ]
      },
      {
        "id": "WARNING_VEHICLES",
        "severity": "MEDIUM",
        "evidence": [
          "warning_count=2 of 5"
        ],
        "likely_cause": "Risky events are frequent enough to cost fuel",
        "suggested_actions": [
          "Share the monthly report with drivers in the caution band"
        ]
      }
    ]
    "###);
}
