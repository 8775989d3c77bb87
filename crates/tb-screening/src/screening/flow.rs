use serde::Serialize;

use super::catalog::SymptomId;
use super::domain::SymptomSet;
use super::questions::{QuestionCatalog, QuestionOption, QuestionTemplate};

/// 1-based index of the basic-info step.
pub const STEP_BASIC_INFO: usize = 1;
/// 1-based index of the symptom-selection step.
pub const STEP_SYMPTOMS: usize = 2;
/// Fixed steps before the dynamic deep-question block.
pub const FIXED_LEADING_STEPS: usize = 2;
/// Fixed steps after the dynamic block: upload and review.
pub const FIXED_TRAILING_STEPS: usize = 2;

/// One deep-question wizard step produced by the planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionStep {
    pub symptom: SymptomId,
    pub question_key: String,
    pub title: String,
    pub options: Vec<QuestionOption>,
    pub multi_select: bool,
}

/// The ordered deep-question block for a symptom selection, and the step
/// geometry derived from it.
///
/// Planning is a pure function of the symptom set and the catalog: symptoms
/// are visited in catalog order and each symptom's questions in
/// catalog-declared order, so equal selections always yield identical plans
/// no matter how the selection was reached. The planner never consults the
/// current step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowPlan {
    steps: Vec<QuestionStep>,
}

impl FlowPlan {
    pub fn plan(symptoms: &SymptomSet, catalog: &QuestionCatalog) -> Self {
        if symptoms.none_of_the_above() {
            return Self { steps: Vec::new() };
        }

        let steps = symptoms
            .selected_in_order()
            .flat_map(|symptom| {
                catalog
                    .questions_for(symptom)
                    .iter()
                    .map(move |question| question_step(symptom, question))
            })
            .collect();

        Self { steps }
    }

    pub fn steps(&self) -> &[QuestionStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn total_steps(&self) -> usize {
        FIXED_LEADING_STEPS + self.steps.len() + FIXED_TRAILING_STEPS
    }

    pub const fn first_deep_step() -> usize {
        STEP_SYMPTOMS + 1
    }

    pub fn upload_step(&self) -> usize {
        STEP_SYMPTOMS + 1 + self.steps.len()
    }

    pub fn review_step(&self) -> usize {
        self.upload_step() + 1
    }

    /// The question shown at a wizard step, if that step falls inside the
    /// dynamic block.
    pub fn question_at(&self, step: usize) -> Option<&QuestionStep> {
        step.checked_sub(Self::first_deep_step())
            .and_then(|index| self.steps.get(index))
    }
}

fn question_step(symptom: SymptomId, question: &QuestionTemplate) -> QuestionStep {
    QuestionStep {
        symptom,
        question_key: question.key.clone(),
        title: question.title.clone(),
        options: question.options.clone(),
        multi_select: question.multi_select,
    }
}
