use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::catalog::{ExposureLevel, RiskFactor, SymptomId};

/// Question key carrying the cough-duration answer used by the
/// prolonged-duration escalation.
pub const QUESTION_DURATION: &str = "cough_duration_weeks";
/// Question key carrying the exposure-contact answer.
pub const QUESTION_EXPOSURE: &str = "exposure_contact";
/// Question key carrying the multi-select previous-conditions answer.
pub const QUESTION_PREVIOUS_CONDITIONS: &str = "previous_conditions";
/// Longest duration bucket; anything else never triggers the escalation.
pub const DURATION_LONGEST: &str = "gt_1_month";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionTemplate {
    pub key: String,
    pub title: String,
    pub options: Vec<QuestionOption>,
    /// Whether the respondent may pick several options.
    pub multi_select: bool,
}

/// Injected, read-only follow-up question table: symptom id to ordered
/// question list. Localized content providers construct their own table;
/// `standard()` is the built-in English one. A symptom without an entry
/// simply contributes zero questions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionCatalog {
    by_symptom: BTreeMap<SymptomId, Vec<QuestionTemplate>>,
}

impl QuestionCatalog {
    pub fn new(by_symptom: BTreeMap<SymptomId, Vec<QuestionTemplate>>) -> Self {
        Self { by_symptom }
    }

    pub fn questions_for(&self, symptom: SymptomId) -> &[QuestionTemplate] {
        self.by_symptom
            .get(&symptom)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn standard() -> Self {
        let mut by_symptom = BTreeMap::new();

        by_symptom.insert(
            SymptomId::CoughGt2Weeks,
            vec![QuestionTemplate {
                key: QUESTION_DURATION.to_string(),
                title: "How long has your cough lasted?".to_string(),
                options: vec![
                    option("lt_2_weeks", "Less than 2 weeks"),
                    option("2_4_weeks", "2-4 weeks"),
                    option(DURATION_LONGEST, "> 1 month"),
                ],
                multi_select: false,
            }],
        );

        by_symptom.insert(
            SymptomId::CoughWithSputum,
            vec![QuestionTemplate {
                key: "cough_type".to_string(),
                title: "What best describes your cough?".to_string(),
                options: vec![
                    option("dry", "Dry cough"),
                    option("with_sputum", "Cough with sputum"),
                    option("blood_stained", "Blood-stained sputum"),
                ],
                multi_select: false,
            }],
        );

        by_symptom.insert(
            SymptomId::FeverEvening,
            vec![QuestionTemplate {
                key: "fever_pattern".to_string(),
                title: "When does your fever usually appear?".to_string(),
                options: vec![
                    option("evening_only", "Mostly in the evening"),
                    option("all_day", "Throughout the day"),
                    option("intermittent", "Comes and goes"),
                ],
                multi_select: false,
            }],
        );

        by_symptom.insert(
            SymptomId::WeightLoss,
            vec![QuestionTemplate {
                key: "weight_appetite".to_string(),
                title: "How has your weight changed recently?".to_string(),
                options: vec![
                    option("lost_gt_3kg", "Lost more than 3 kg"),
                    option("lost_some", "Lost a little weight"),
                    option("no_change", "No noticeable change"),
                ],
                multi_select: false,
            }],
        );

        by_symptom.insert(
            SymptomId::NightSweats,
            vec![QuestionTemplate {
                key: "night_sweats_fatigue".to_string(),
                title: "How often do night sweats wake you?".to_string(),
                options: vec![
                    option("most_nights", "Most nights"),
                    option("occasionally", "Occasionally"),
                    option("rarely", "Rarely"),
                ],
                multi_select: false,
            }],
        );

        by_symptom.insert(
            SymptomId::LossOfAppetite,
            vec![QuestionTemplate {
                key: "weight_appetite".to_string(),
                title: "How is your appetite compared to a month ago?".to_string(),
                options: vec![
                    option("much_less", "Much less than before"),
                    option("somewhat_less", "Somewhat less"),
                    option("unchanged", "Unchanged"),
                ],
                multi_select: false,
            }],
        );

        by_symptom.insert(
            SymptomId::TbContact,
            vec![
                QuestionTemplate {
                    key: QUESTION_EXPOSURE.to_string(),
                    title: "Who around you has been diagnosed with TB?".to_string(),
                    options: ExposureLevel::ordered()
                        .into_iter()
                        .map(|level| option(level.value(), level.label()))
                        .collect(),
                    multi_select: false,
                },
                QuestionTemplate {
                    key: QUESTION_PREVIOUS_CONDITIONS.to_string(),
                    title: "Do any of these apply to your medical history?".to_string(),
                    options: RiskFactor::ordered()
                        .into_iter()
                        .map(|factor| option(factor.key(), factor.label()))
                        .collect(),
                    multi_select: true,
                },
            ],
        );

        // cough_with_blood and chest_pain intentionally have no entries.
        Self { by_symptom }
    }
}

fn option(value: &str, label: &str) -> QuestionOption {
    QuestionOption {
        value: value.to_string(),
        label: label.to_string(),
    }
}
