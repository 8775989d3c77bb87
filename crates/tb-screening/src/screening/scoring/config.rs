use serde::{Deserialize, Serialize};

/// The canonical scoring table: cap, classification thresholds, urgency
/// thresholds, and combination-bonus dials. All derived thresholds are
/// expressed against the single `score_cap`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub score_cap: u8,
    pub moderate_threshold: u8,
    pub high_threshold: u8,
    pub confirmed_threshold: u8,
    pub immediate_threshold: u8,
    pub test_soon_threshold: u8,
    pub prolonged_duration_bonus: u8,
    /// Minimum running score before the prolonged-duration bonus applies.
    pub prolonged_duration_floor: u8,
    pub hemoptysis_fever_bonus: u8,
    pub constitutional_bonus: u8,
    /// How many constitutional symptoms trigger the bonus.
    pub constitutional_minimum: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            score_cap: 20,
            moderate_threshold: 4,
            high_threshold: 8,
            confirmed_threshold: 12,
            immediate_threshold: 10,
            test_soon_threshold: 6,
            prolonged_duration_bonus: 2,
            prolonged_duration_floor: 4,
            hemoptysis_fever_bonus: 2,
            constitutional_bonus: 1,
            constitutional_minimum: 3,
        }
    }
}
