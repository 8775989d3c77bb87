use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::SymptomId;

/// Supported age range for a screening respondent.
pub const AGE_MIN: u32 = 0;
pub const AGE_MAX: u32 = 110;

/// Per-file ceiling enforced at the upload boundary.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Respondent details collected on the first wizard step. Only the age is
/// load-bearing; everything else is free text for the report header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicInfo {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub location: Option<String>,
    pub contact: Option<String>,
}

impl BasicInfo {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.age {
            None => Err(ValidationError::AgeMissing),
            Some(age) if age > AGE_MAX => Err(ValidationError::AgeOutOfRange(age)),
            Some(_) => Ok(()),
        }
    }

    /// Shallow merge: fields present in the update overwrite, absent fields
    /// keep their current value.
    pub fn merged(&self, update: &BasicInfoUpdate) -> BasicInfo {
        let mut next = self.clone();
        if let Some(name) = &update.name {
            next.name = Some(name.clone());
        }
        if let Some(age) = update.age {
            next.age = Some(age);
        }
        if let Some(gender) = &update.gender {
            next.gender = Some(gender.clone());
        }
        if let Some(location) = &update.location {
            next.location = Some(location.clone());
        }
        if let Some(contact) = &update.contact {
            next.contact = Some(contact.clone());
        }
        next
    }
}

/// Partial payload for the set-basic-info transition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicInfoUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
}

/// Per-field validation failures for the basic-info step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("age is required")]
    AgeMissing,
    #[error("age {0} is outside the supported range 0-110")]
    AgeOutOfRange(u32),
}

impl ValidationError {
    pub const fn field(self) -> &'static str {
        match self {
            Self::AgeMissing | Self::AgeOutOfRange(_) => "age",
        }
    }
}

/// The set of reported symptoms plus the reserved none-of-the-above flag.
///
/// Invariant: the flag and a non-empty selection are mutually exclusive.
/// `merge` restores the invariant at the point of mutation, so readers never
/// have to re-check it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomSet {
    selected: BTreeSet<SymptomId>,
    none_of_the_above: bool,
}

impl SymptomSet {
    pub fn is_selected(&self, id: SymptomId) -> bool {
        self.selected.contains(&id)
    }

    pub fn none_of_the_above(&self) -> bool {
        self.none_of_the_above
    }

    pub fn any_selected(&self) -> bool {
        !self.selected.is_empty()
    }

    /// Selected symptoms in fixed catalog order.
    pub fn selected_in_order(&self) -> impl Iterator<Item = SymptomId> + '_ {
        SymptomId::ordered()
            .into_iter()
            .filter(|id| self.selected.contains(id))
    }

    pub fn merge(&self, update: &SymptomUpdate) -> SymptomSet {
        let mut next = self.clone();
        if let Some(flag) = update.none_of_the_above {
            next.none_of_the_above = flag;
            if flag {
                next.selected.clear();
            }
        }
        for (&id, &on) in &update.changes {
            if on {
                next.selected.insert(id);
                next.none_of_the_above = false;
            } else {
                next.selected.remove(&id);
            }
        }
        next
    }
}

/// Partial payload for the set-symptoms transition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomUpdate {
    #[serde(default)]
    pub changes: BTreeMap<SymptomId, bool>,
    #[serde(default)]
    pub none_of_the_above: Option<bool>,
}

impl SymptomUpdate {
    pub fn select(ids: &[SymptomId]) -> Self {
        Self {
            changes: ids.iter().map(|&id| (id, true)).collect(),
            none_of_the_above: None,
        }
    }

    pub fn none_of_the_above() -> Self {
        Self {
            changes: BTreeMap::new(),
            none_of_the_above: Some(true),
        }
    }
}

/// A single deep-question answer: one option value, or a set of values for
/// multi-select questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Single(String),
    Multi(BTreeSet<String>),
}

impl AnswerValue {
    pub fn single(value: impl Into<String>) -> Self {
        Self::Single(value.into())
    }

    pub fn multi<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::Multi(values.into_iter().map(Into::into).collect())
    }

    pub fn as_single(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value),
            Self::Multi(_) => None,
        }
    }

    pub fn values(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match self {
            Self::Single(value) => Box::new(std::iter::once(value.as_str())),
            Self::Multi(values) => Box::new(values.iter().map(String::as_str)),
        }
    }
}

/// Answers to deep questions, keyed by the owning symptom and question key.
///
/// Entries under symptoms that were later deselected are allowed to linger;
/// the planner and the scoring engine only read entries for symptoms that
/// are currently selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeepAnswers {
    answers: BTreeMap<SymptomId, BTreeMap<String, AnswerValue>>,
}

impl DeepAnswers {
    pub fn set(&self, symptom: SymptomId, question: impl Into<String>, value: AnswerValue) -> Self {
        let mut next = self.clone();
        next.answers
            .entry(symptom)
            .or_default()
            .insert(question.into(), value);
        next
    }

    pub fn for_symptom(&self, symptom: SymptomId) -> Option<&BTreeMap<String, AnswerValue>> {
        self.answers.get(&symptom)
    }

    pub fn get(&self, symptom: SymptomId, question: &str) -> Option<&AnswerValue> {
        self.answers.get(&symptom).and_then(|entry| entry.get(question))
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

/// Classifier for uploaded medical documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadKind {
    ChestXray,
    SputumTest,
    BloodTest,
    General,
}

impl UploadKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ChestXray => "Chest X-ray",
            Self::SputumTest => "Sputum test report",
            Self::BloodTest => "Blood test report",
            Self::General => "Medical document",
        }
    }
}

/// Failures raised at the upload boundary, before a record is constructed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("file of {size} bytes exceeds the {max} byte upload limit")]
    TooLarge { size: u64, max: u64 },
    #[error("content type '{0}' is not accepted (images and PDF only)")]
    UnsupportedType(String),
    #[error("'{0}' is not a valid content type")]
    InvalidContentType(String),
}

/// Metadata and content handle for an accepted upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRecord {
    pub filename: String,
    pub kind: UploadKind,
    pub content_type: String,
    pub size: u64,
    pub content_base64: String,
    pub uploaded_at: DateTime<Utc>,
}

impl UploadRecord {
    /// The upload boundary: rejects oversized files and non-medical content
    /// types before any record exists.
    pub fn new(
        filename: impl Into<String>,
        kind: UploadKind,
        content_type: impl Into<String>,
        size: u64,
        content_base64: impl Into<String>,
        uploaded_at: DateTime<Utc>,
    ) -> Result<Self, UploadError> {
        let content_type = content_type.into();
        if size > MAX_UPLOAD_BYTES {
            return Err(UploadError::TooLarge {
                size,
                max: MAX_UPLOAD_BYTES,
            });
        }

        let parsed: mime::Mime = content_type
            .parse()
            .map_err(|_| UploadError::InvalidContentType(content_type.clone()))?;
        let accepted = parsed.type_() == mime::IMAGE
            || (parsed.type_() == mime::APPLICATION && parsed.subtype() == mime::PDF);
        if !accepted {
            return Err(UploadError::UnsupportedType(content_type));
        }

        Ok(Self {
            filename: filename.into(),
            kind,
            content_type,
            size,
            content_base64: content_base64.into(),
            uploaded_at,
        })
    }
}

/// Byte length of a base64 payload once decoded. Accepts bare base64 and
/// `data:` URLs (everything before the last comma is treated as the header).
pub fn base64_decoded_len(payload: &str) -> u64 {
    let data = payload.rsplit(',').next().unwrap_or(payload);
    let trimmed = data.trim_end_matches('=');
    trimmed.len() as u64 * 3 / 4
}
