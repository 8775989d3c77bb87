use super::config::ScoringConfig;
use super::ScoreReason;
use crate::screening::catalog::{ExposureLevel, RiskFactor, SymptomId};
use crate::screening::domain::{AnswerValue, DeepAnswers, SymptomSet};
use crate::screening::questions::{
    DURATION_LONGEST, QUESTION_DURATION, QUESTION_EXPOSURE, QUESTION_PREVIOUS_CONDITIONS,
};

/// Boolean findings that feed the urgency override, independent of the
/// numeric score.
pub(crate) struct ScoreSignals {
    pub hemoptysis: bool,
    pub incomplete_treatment: bool,
    pub immunocompromised: bool,
}

/// Risk-profile answers gathered from the deep answers of currently
/// selected symptoms. Entries under deselected symptoms are never read.
pub(crate) struct RiskProfile {
    pub conditions: Vec<RiskFactor>,
    pub exposure: Option<ExposureLevel>,
    pub longest_duration: bool,
}

pub(crate) fn evaluate(
    symptoms: &SymptomSet,
    answers: &DeepAnswers,
    config: &ScoringConfig,
) -> (Vec<ScoreReason>, u16, ScoreSignals) {
    let mut reasons = Vec::new();
    let mut total: u16 = 0;

    for id in symptoms.selected_in_order() {
        let weight = id.weight();
        if weight == 0 {
            continue;
        }
        total += u16::from(weight);
        reasons.push(ScoreReason {
            detail: id.label().to_string(),
            points: weight,
        });
    }

    let profile = collect_risk_profile(symptoms, answers);

    for condition in &profile.conditions {
        let weight = condition.weight();
        total += u16::from(weight);
        reasons.push(ScoreReason {
            detail: condition.label().to_string(),
            points: weight,
        });
    }

    if let Some(exposure) = profile.exposure {
        let weight = exposure.weight();
        if weight > 0 {
            total += u16::from(weight);
            reasons.push(ScoreReason {
                detail: exposure.label().to_string(),
                points: weight,
            });
        }
    }

    let cough_related = symptoms.is_selected(SymptomId::CoughGt2Weeks)
        || symptoms.is_selected(SymptomId::CoughWithSputum);
    if profile.longest_duration && cough_related && total >= u16::from(config.prolonged_duration_floor)
    {
        total += u16::from(config.prolonged_duration_bonus);
        reasons.push(ScoreReason {
            detail: "Prolonged cough duration (>1 month) with other symptoms".to_string(),
            points: config.prolonged_duration_bonus,
        });
    }

    if symptoms.is_selected(SymptomId::CoughWithBlood)
        && symptoms.is_selected(SymptomId::FeverEvening)
    {
        total += u16::from(config.hemoptysis_fever_bonus);
        reasons.push(ScoreReason {
            detail: "Blood in sputum together with evening fever".to_string(),
            points: config.hemoptysis_fever_bonus,
        });
    }

    let constitutional = SymptomId::ordered()
        .into_iter()
        .filter(|id| id.is_constitutional() && symptoms.is_selected(*id))
        .count();
    if constitutional >= config.constitutional_minimum {
        total += u16::from(config.constitutional_bonus);
        reasons.push(ScoreReason {
            detail: "Multiple constitutional symptoms".to_string(),
            points: config.constitutional_bonus,
        });
    }

    let signals = ScoreSignals {
        hemoptysis: symptoms
            .selected_in_order()
            .any(|id| id.is_critical()),
        incomplete_treatment: profile
            .conditions
            .contains(&RiskFactor::PreviousTbNotCompleted),
        immunocompromised: profile.conditions.contains(&RiskFactor::Hiv),
    };

    (reasons, total, signals)
}

pub(crate) fn collect_risk_profile(symptoms: &SymptomSet, answers: &DeepAnswers) -> RiskProfile {
    let mut conditions: Vec<RiskFactor> = Vec::new();
    let mut exposure = None;
    let mut longest_duration = false;

    for id in symptoms.selected_in_order() {
        let Some(entry) = answers.for_symptom(id) else {
            continue;
        };

        if let Some(value) = entry.get(QUESTION_PREVIOUS_CONDITIONS) {
            for key in value.values() {
                // Unknown keys are tolerated, never an error.
                if let Some(factor) = RiskFactor::from_key(key) {
                    if !conditions.contains(&factor) {
                        conditions.push(factor);
                    }
                }
            }
        }

        if exposure.is_none() {
            if let Some(value) = entry.get(QUESTION_EXPOSURE).and_then(AnswerValue::as_single) {
                exposure = ExposureLevel::from_value(value);
            }
        }

        if let Some(value) = entry.get(QUESTION_DURATION).and_then(AnswerValue::as_single) {
            if value == DURATION_LONGEST {
                longest_duration = true;
            }
        }
    }

    // Stable reason ordering: report conditions in catalog order.
    conditions.sort_by_key(|condition| {
        RiskFactor::ordered()
            .iter()
            .position(|candidate| candidate == condition)
    });

    RiskProfile {
        conditions,
        exposure,
        longest_duration,
    }
}
