use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use crate::screening::catalog::{ExposureLevel, SymptomId};
use crate::screening::domain::{AnswerValue, DeepAnswers, SymptomSet, SymptomUpdate};
use crate::screening::questions::{QuestionCatalog, QUESTION_EXPOSURE};
use crate::screening::scoring::{ScoringConfig, ScoringEngine};
use crate::screening::service::ScreeningService;
use crate::screening::session::ScreeningWorkflow;
use crate::screening::store::{SessionId, SessionRecord, SessionStore, StoreError};

pub(super) fn symptoms(ids: &[SymptomId]) -> SymptomSet {
    SymptomSet::default().merge(&SymptomUpdate::select(ids))
}

pub(super) fn none_reported() -> SymptomSet {
    SymptomSet::default().merge(&SymptomUpdate::none_of_the_above())
}

pub(super) fn catalog() -> QuestionCatalog {
    QuestionCatalog::standard()
}

pub(super) fn engine() -> ScoringEngine {
    ScoringEngine::new(ScoringConfig::default())
}

pub(super) fn workflow() -> ScreeningWorkflow {
    ScreeningWorkflow::standard()
}

pub(super) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn exposure_under(symptom: SymptomId, level: ExposureLevel) -> DeepAnswers {
    DeepAnswers::default().set(
        symptom,
        QUESTION_EXPOSURE,
        AnswerValue::single(level.value()),
    )
}

pub(super) fn build_service() -> (ScreeningService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let service = ScreeningService::new(store.clone(), ScreeningWorkflow::standard());
    (service, store)
}

#[derive(Default)]
pub(super) struct MemoryStore {
    records: Mutex<HashMap<SessionId, SessionRecord>>,
}

impl SessionStore for MemoryStore {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: SessionRecord) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        if guard.contains_key(&record.id) {
            guard.insert(record.id.clone(), record);
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, StoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}
