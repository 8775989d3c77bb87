use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::SymptomId;
use super::domain::{
    AnswerValue, BasicInfo, BasicInfoUpdate, DeepAnswers, SymptomSet, SymptomUpdate, UploadRecord,
    ValidationError,
};
use super::flow::{FlowPlan, FIXED_LEADING_STEPS, FIXED_TRAILING_STEPS, STEP_BASIC_INFO};
use super::nav;
use super::questions::QuestionCatalog;
use super::scoring::{ScoringConfig, ScoringEngine, ScoringResult};

/// The aggregate wizard state. Mutated exclusively through
/// `ScreeningWorkflow::apply`; `total_steps` is derived and never authored
/// directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningSession {
    pub basic_info: BasicInfo,
    pub symptoms: SymptomSet,
    pub deep_answers: DeepAnswers,
    pub uploads: Vec<UploadRecord>,
    pub current_step: usize,
    pub total_steps: usize,
    pub result: Option<ScoringResult>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ScreeningSession {
    pub fn new(created_at: DateTime<Utc>) -> Self {
        Self {
            basic_info: BasicInfo::default(),
            symptoms: SymptomSet::default(),
            deep_answers: DeepAnswers::default(),
            uploads: Vec::new(),
            current_step: STEP_BASIC_INFO,
            total_steps: FIXED_LEADING_STEPS + FIXED_TRAILING_STEPS,
            result: None,
            completed: false,
            created_at,
            updated_at: created_at,
        }
    }
}

/// The closed set of session transitions. Each application is a pure
/// computation from `(state, payload)` to the next state; persistence and
/// timestamps are the caller's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Transition {
    SetBasicInfo { update: BasicInfoUpdate },
    SetSymptoms { update: SymptomUpdate },
    SetDeepAnswer {
        symptom: SymptomId,
        question: String,
        value: AnswerValue,
    },
    AddUpload { record: UploadRecord },
    RemoveUpload { index: usize },
    SetStep { step: usize },
    RecomputeTotalSteps,
    ComputeScore,
    SetResult { result: ScoringResult },
    Reset,
    LoadSnapshot { snapshot: Box<ScreeningSession> },
}

/// Applies transitions against an injected question catalog and scoring
/// engine. Holds no session state of its own.
pub struct ScreeningWorkflow {
    catalog: QuestionCatalog,
    engine: ScoringEngine,
}

impl ScreeningWorkflow {
    pub fn new(catalog: QuestionCatalog, engine: ScoringEngine) -> Self {
        Self { catalog, engine }
    }

    /// Built-in English catalog with the canonical scoring table.
    pub fn standard() -> Self {
        Self::new(
            QuestionCatalog::standard(),
            ScoringEngine::new(ScoringConfig::default()),
        )
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    pub fn plan(&self, session: &ScreeningSession) -> FlowPlan {
        FlowPlan::plan(&session.symptoms, &self.catalog)
    }

    pub fn apply(&self, session: ScreeningSession, transition: Transition) -> ScreeningSession {
        match transition {
            Transition::SetBasicInfo { update } => ScreeningSession {
                basic_info: session.basic_info.merged(&update),
                ..session
            },
            Transition::SetSymptoms { update } => {
                // Mutual exclusion is enforced inside the merge, and the
                // derived step count is recomputed in the same application
                // so the session never carries a stale total.
                let symptoms = session.symptoms.merge(&update);
                let plan = FlowPlan::plan(&symptoms, &self.catalog);
                ScreeningSession {
                    symptoms,
                    current_step: nav::clamp_step(session.current_step, &plan),
                    total_steps: plan.total_steps(),
                    ..session
                }
            }
            Transition::SetDeepAnswer {
                symptom,
                question,
                value,
            } => ScreeningSession {
                deep_answers: session.deep_answers.set(symptom, question, value),
                ..session
            },
            Transition::AddUpload { record } => {
                let mut uploads = session.uploads;
                uploads.push(record);
                ScreeningSession { uploads, ..session }
            }
            Transition::RemoveUpload { index } => {
                let mut uploads = session.uploads;
                if index < uploads.len() {
                    uploads.remove(index);
                }
                ScreeningSession { uploads, ..session }
            }
            Transition::SetStep { step } => {
                let plan = FlowPlan::plan(&session.symptoms, &self.catalog);
                ScreeningSession {
                    current_step: nav::clamp_step(step, &plan),
                    ..session
                }
            }
            Transition::RecomputeTotalSteps => {
                let plan = FlowPlan::plan(&session.symptoms, &self.catalog);
                ScreeningSession {
                    current_step: nav::clamp_step(session.current_step, &plan),
                    total_steps: plan.total_steps(),
                    ..session
                }
            }
            Transition::ComputeScore => {
                let result = self.engine.score(&session.symptoms, &session.deep_answers);
                ScreeningSession {
                    result: Some(result),
                    completed: true,
                    ..session
                }
            }
            Transition::SetResult { result } => ScreeningSession {
                result: Some(result),
                completed: true,
                ..session
            },
            Transition::Reset => ScreeningSession::new(session.created_at),
            Transition::LoadSnapshot { snapshot } => *snapshot,
        }
    }

    /// Step forward. Leaving the basic-info step requires a valid age; this
    /// is the only hard validation in the wizard.
    pub fn advance(&self, session: ScreeningSession) -> Result<ScreeningSession, ValidationError> {
        if session.current_step == STEP_BASIC_INFO {
            session.basic_info.validate()?;
        }
        let plan = self.plan(&session);
        let step = nav::advance(session.current_step, &plan);
        Ok(self.apply(session, Transition::SetStep { step }))
    }

    pub fn retreat(&self, session: ScreeningSession) -> ScreeningSession {
        let plan = self.plan(&session);
        let step = nav::retreat(session.current_step, &plan);
        self.apply(session, Transition::SetStep { step })
    }
}
