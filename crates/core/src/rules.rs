use crate::{
    grade::SafetyGrade,
    types::{Behavior, Finding, FleetInsights, Severity, VehicleAnalysis},
};

fn coaching_tips(behavior: Behavior) -> Vec<String> {
    let tips: &[&str] = match behavior {
        Behavior::HardAcceleration | Behavior::HardLaunch => &[
            "Accelerate gradually, taking about 5 seconds to reach speed",
            "Keep engine speed under 2000 rpm",
        ],
        Behavior::HardDeceleration | Behavior::HardBraking => &[
            "Anticipate signals and traffic to avoid hard braking",
            "Keep a longer following distance",
        ],
        Behavior::Speeding | Behavior::ProlongedSpeeding => &[
            "Hold a steady 60-80 km/h where limits allow",
            "Keep engine speed under 2000 rpm",
        ],
        _ => &["Plan turns and lane changes early and make them smoothly"],
    };
    tips.iter().map(|t| t.to_string()).collect()
}

pub fn run_rules(insights: &FleetInsights, vehicles: &[VehicleAnalysis]) -> Vec<Finding> {
    let mut findings: Vec<Finding> = Vec::new();

    if insights.danger_count > 0 {
        findings.push(Finding {
            id: "DANGER_VEHICLES".to_string(),
            severity: Severity::High,
            evidence: vehicles
                .iter()
                .filter(|v| v.safety_grade == SafetyGrade::Danger)
                .map(|v| format!("{} (risk_score={})", v.record.vehicle_id, v.risk_score))
                .collect(),
            likely_cause: format!(
                "{} of {} vehicles score 30+ risk points per 100km",
                insights.danger_count, insights.total_count
            ),
            suggested_actions: vec![
                "Schedule eco-driving coaching for these drivers first".to_string(),
                "Review their most frequent behaviors in the vehicle detail view".to_string(),
            ],
        });
    }

    if insights.warning_count > 0 {
        findings.push(Finding {
            id: "WARNING_VEHICLES".to_string(),
            severity: Severity::Medium,
            evidence: vec![format!(
                "warning_count={} of {}",
                insights.warning_count, insights.total_count
            )],
            likely_cause: "Risky events are frequent enough to cost fuel".to_string(),
            suggested_actions: vec![
                "Share the monthly report with drivers in the caution band".to_string(),
            ],
        });
    }

    if let Some(top) = insights.most_frequent_behaviors.first() {
        if top.total > 0.0 {
            findings.push(Finding {
                id: "DOMINANT_BEHAVIOR".to_string(),
                severity: Severity::Low,
                evidence: vec![format!(
                    "{}={:.1} events/100km across the fleet",
                    top.behavior.key(),
                    top.total
                )],
                likely_cause: format!(
                    "{} is the most frequent risky behavior",
                    top.behavior.label()
                ),
                suggested_actions: coaching_tips(top.behavior),
            });
        }
    }

    findings.sort_by(|a, b| a.id.cmp(&b.id));
    findings
}
