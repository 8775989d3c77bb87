mod config;
mod policy;
mod rules;

pub use config::ScoringConfig;
pub use policy::{RiskLevel, Urgency};

use serde::{Deserialize, Serialize};

use super::domain::{DeepAnswers, SymptomSet};

/// Stateless engine that turns the final answer set into a deterministic,
/// explainable assessment.
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn score(&self, symptoms: &SymptomSet, answers: &DeepAnswers) -> ScoringResult {
        if symptoms.none_of_the_above() {
            return ScoringResult {
                score: 0,
                classification: RiskLevel::Low,
                urgency: Urgency::Monitor,
                reasons: vec![ScoreReason {
                    detail: "No TB-related symptoms reported".to_string(),
                    points: 0,
                }],
                recommended_tests: Vec::new(),
            };
        }

        let (reasons, raw_score, signals) = rules::evaluate(symptoms, answers, &self.config);
        let score = raw_score.min(u16::from(self.config.score_cap)) as u8;
        let classification = policy::classify(score, &self.config);
        let urgency = policy::urgency(score, &signals, &self.config);
        let recommended_tests = policy::recommended_tests(classification, symptoms);

        tracing::debug!(
            score,
            cap = self.config.score_cap,
            classification = classification.label(),
            urgency = urgency.label(),
            reasons = reasons.len(),
            "screening score computed"
        );

        ScoringResult {
            score,
            classification,
            urgency,
            reasons,
            recommended_tests,
        }
    }
}

/// One contribution to the assessment, kept alongside the points it added
/// so the result stays auditable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreReason {
    pub detail: String,
    pub points: u8,
}

impl ScoreReason {
    pub fn summary(&self) -> String {
        if self.points == 0 {
            self.detail.clone()
        } else {
            format!("{} (+{} pts)", self.detail, self.points)
        }
    }
}

/// Deterministic assessment for a completed questionnaire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringResult {
    pub score: u8,
    pub classification: RiskLevel,
    pub urgency: Urgency,
    pub reasons: Vec<ScoreReason>,
    pub recommended_tests: Vec<String>,
}
