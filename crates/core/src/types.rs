use serde::{Deserialize, Serialize};

/// Risky-driving behavior categories, in weight-table order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Behavior {
    HardAcceleration,
    HardLaunch,
    HardDeceleration,
    HardBraking,
    Speeding,
    ProlongedSpeeding,
    HardLeftTurn,
    HardRightTurn,
    HardUTurn,
    HardOvertake,
    HardLaneChange,
}

impl Behavior {
    pub const ALL: [Behavior; 11] = [
        Behavior::HardAcceleration,
        Behavior::HardLaunch,
        Behavior::HardDeceleration,
        Behavior::HardBraking,
        Behavior::Speeding,
        Behavior::ProlongedSpeeding,
        Behavior::HardLeftTurn,
        Behavior::HardRightTurn,
        Behavior::HardUTurn,
        Behavior::HardOvertake,
        Behavior::HardLaneChange,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Behavior::HardAcceleration => "hard_acceleration",
            Behavior::HardLaunch => "hard_launch",
            Behavior::HardDeceleration => "hard_deceleration",
            Behavior::HardBraking => "hard_braking",
            Behavior::Speeding => "speeding",
            Behavior::ProlongedSpeeding => "prolonged_speeding",
            Behavior::HardLeftTurn => "hard_left_turn",
            Behavior::HardRightTurn => "hard_right_turn",
            Behavior::HardUTurn => "hard_u_turn",
            Behavior::HardOvertake => "hard_overtake",
            Behavior::HardLaneChange => "hard_lane_change",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Behavior::HardAcceleration => "Hard acceleration",
            Behavior::HardLaunch => "Hard launch",
            Behavior::HardDeceleration => "Hard deceleration",
            Behavior::HardBraking => "Hard braking",
            Behavior::Speeding => "Speeding",
            Behavior::ProlongedSpeeding => "Prolonged speeding",
            Behavior::HardLeftTurn => "Hard left turn",
            Behavior::HardRightTurn => "Hard right turn",
            Behavior::HardUTurn => "Hard U-turn",
            Behavior::HardOvertake => "Hard overtake",
            Behavior::HardLaneChange => "Hard lane change",
        }
    }
}

/// Categories summed in the fleet aggregate. Order is the tie-break priority.
pub const FLEET_SUMMARY_BEHAVIORS: [Behavior; 6] = [
    Behavior::HardAcceleration,
    Behavior::HardDeceleration,
    Behavior::Speeding,
    Behavior::HardBraking,
    Behavior::HardLaunch,
    Behavior::ProlongedSpeeding,
];

/// One validated input row. Behavior counts are occurrences per 100km.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VehicleRecord {
    pub index: Option<u64>,
    pub vehicle_id: String,
    pub total_distance_km: f64,
    pub event_total: f64,
    pub speeding: f64,
    pub prolonged_speeding: f64,
    pub hard_acceleration: f64,
    pub hard_launch: f64,
    pub hard_deceleration: f64,
    pub hard_braking: f64,
    pub hard_left_turn: f64,
    pub hard_right_turn: f64,
    pub hard_u_turn: f64,
    pub hard_overtake: f64,
    pub hard_lane_change: f64,
}

impl VehicleRecord {
    pub fn count(&self, behavior: Behavior) -> f64 {
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

    pub fn count_mut(&mut self, behavior: Behavior) -> &mut f64 {
        match behavior {
            Behavior::HardAcceleration => &mut self.hard_acceleration,
            Behavior::HardLaunch => &mut self.hard_launch,
            Behavior::HardDeceleration => &mut self.hard_deceleration,
            Behavior::HardBraking => &mut self.hard_braking,
            Behavior::Speeding => &mut self.speeding,
            Behavior::ProlongedSpeeding => &mut self.prolonged_speeding,
            Behavior::HardLeftTurn => &mut self.hard_left_turn,
            Behavior::HardRightTurn => &mut self.hard_right_turn,
            Behavior::HardUTurn => &mut self.hard_u_turn,
            Behavior::HardOvertake => &mut self.hard_overtake,
            Behavior::HardLaneChange => &mut self.hard_lane_change,
        }
    }
}

/// A record enriched with its score, grade and economic estimates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VehicleAnalysis {
    #[serde(flatten)]
    pub record: VehicleRecord,
    pub safety_grade: crate::grade::SafetyGrade,
    pub grade_badge: crate::grade::GradeBadge,
    pub estimated_saving_amount: u64,
    pub co2_reduction_kg: u64,
    pub risk_score: u32,
    pub tree_equivalent: u64,
    pub fuel_efficiency_improvement_pct: f64,
    pub current_fuel_efficiency_km_per_l: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BehaviorTotal {
    pub behavior: Behavior,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FleetInsights {
    pub top3: Vec<VehicleAnalysis>,
    pub most_frequent_behaviors: Vec<BehaviorTotal>,
    pub top5_saving_total: u64,
    pub total_saving: u64,
    pub total_co2_kg: u64,
    pub danger_count: usize,
    pub warning_count: usize,
    pub total_count: usize,
    pub average_improvement_pct: f64,
    pub average_current_efficiency: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub id: String,
    pub severity: Severity,
    pub evidence: Vec<String>,
    pub likely_cause: String,
    pub suggested_actions: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
}
