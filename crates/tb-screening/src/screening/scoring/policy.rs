use serde::{Deserialize, Serialize};

use super::config::ScoringConfig;
use super::rules::ScoreSignals;
use crate::screening::catalog::SymptomId;
use crate::screening::domain::SymptomSet;

/// Risk tier derived from the capped score. Ordered: Low < Moderate < High
/// < Confirmed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Confirmed,
}

impl RiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::Confirmed => "Confirmed",
        }
    }
}

/// Recommended action speed, derived from the score plus override flags.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Monitor,
    TestSoon,
    Immediate,
}

impl Urgency {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Monitor => "Monitor",
            Self::TestSoon => "Test soon",
            Self::Immediate => "Immediate",
        }
    }
}

pub(crate) fn classify(score: u8, config: &ScoringConfig) -> RiskLevel {
    if score >= config.confirmed_threshold {
        RiskLevel::Confirmed
    } else if score >= config.high_threshold {
        RiskLevel::High
    } else if score >= config.moderate_threshold {
        RiskLevel::Moderate
    } else {
        RiskLevel::Low
    }
}

pub(crate) fn urgency(score: u8, signals: &ScoreSignals, config: &ScoringConfig) -> Urgency {
    if score >= config.immediate_threshold
        || signals.hemoptysis
        || signals.incomplete_treatment
        || signals.immunocompromised
    {
        Urgency::Immediate
    } else if score >= config.test_soon_threshold {
        Urgency::TestSoon
    } else {
        Urgency::Monitor
    }
}

pub(crate) fn recommended_tests(level: RiskLevel, symptoms: &SymptomSet) -> Vec<String> {
    let mut tests = vec![
        "Chest X-ray".to_string(),
        "Sputum smear microscopy".to_string(),
    ];

    if level >= RiskLevel::High {
        tests.extend(
            ["CBNAAT (GeneXpert)", "Sputum culture", "Complete Blood Count"]
                .map(str::to_string),
        );
    } else if level == RiskLevel::Moderate {
        tests.push("CBNAAT (GeneXpert)".to_string());
        if symptoms.is_selected(SymptomId::CoughWithSputum)
            || symptoms.is_selected(SymptomId::CoughWithBlood)
        {
            tests.push("Sputum AFB staining".to_string());
        }
    }

    tests
}
