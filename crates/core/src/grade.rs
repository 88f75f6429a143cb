use serde::{Deserialize, Serialize};

use crate::{model::BehaviorWeights, scoring::weighted_risk_score, types::VehicleRecord};

/// Three-tier safety grade derived from the weighted risk score.
///
/// | Score (points/100km) | Grade   |
/// |----------------------|---------|
/// | >= 30                | danger  |
/// | >= 10                | warning |
/// | < 10                 | safe    |
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SafetyGrade {
    Danger,
    Warning,
    Safe,
}

pub const DANGER_THRESHOLD: f64 = 30.0;
pub const WARNING_THRESHOLD: f64 = 10.0;

impl SafetyGrade {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= DANGER_THRESHOLD => SafetyGrade::Danger,
            s if s >= WARNING_THRESHOLD => SafetyGrade::Warning,
            _ => SafetyGrade::Safe,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SafetyGrade::Danger => "Danger",
            SafetyGrade::Warning => "Caution",
            SafetyGrade::Safe => "Good",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            SafetyGrade::Danger => "#EF4444",
            SafetyGrade::Warning => "#FBBF24",
            SafetyGrade::Safe => "#10B981",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            SafetyGrade::Danger => "\u{1F534}",
            SafetyGrade::Warning => "\u{1F7E1}",
            SafetyGrade::Safe => "\u{1F7E2}",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            SafetyGrade::Danger => "immediate improvement needed",
            SafetyGrade::Warning => "improvement recommended",
            SafetyGrade::Safe => "driving safely",
        }
    }
}

/// Display fields of a grade, serialized beside the bare grade so report
/// consumers need no lookup table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GradeBadge {
    pub grade: SafetyGrade,
    pub label: String,
    pub emoji: String,
    pub color: String,
    pub message: String,
}

impl From<SafetyGrade> for GradeBadge {
    fn from(grade: SafetyGrade) -> Self {
        Self {
            grade,
            label: grade.label().to_string(),
            emoji: grade.emoji().to_string(),
            color: grade.color().to_string(),
            message: grade.message().to_string(),
        }
    }
}

pub fn classify(record: &VehicleRecord, weights: &BehaviorWeights) -> SafetyGrade {
    SafetyGrade::from_score(weighted_risk_score(record, weights))
}
