use serde::{Deserialize, Serialize};

/// Fixed symptom catalog. Variant order is the canonical presentation and
/// scoring order; every iteration over symptoms goes through `ordered()`,
/// never through map insertion order, so replanning the questionnaire with
/// the same selection always produces the same sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymptomId {
    #[serde(rename = "cough_gt_2_weeks")]
    CoughGt2Weeks,
    CoughWithSputum,
    CoughWithBlood,
    FeverEvening,
    WeightLoss,
    NightSweats,
    ChestPain,
    LossOfAppetite,
    TbContact,
}

impl SymptomId {
    pub const fn ordered() -> [Self; 9] {
        [
            Self::CoughGt2Weeks,
            Self::CoughWithSputum,
            Self::CoughWithBlood,
            Self::FeverEvening,
            Self::WeightLoss,
            Self::NightSweats,
            Self::ChestPain,
            Self::LossOfAppetite,
            Self::TbContact,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::CoughGt2Weeks => "cough_gt_2_weeks",
            Self::CoughWithSputum => "cough_with_sputum",
            Self::CoughWithBlood => "cough_with_blood",
            Self::FeverEvening => "fever_evening",
            Self::WeightLoss => "weight_loss",
            Self::NightSweats => "night_sweats",
            Self::ChestPain => "chest_pain",
            Self::LossOfAppetite => "loss_of_appetite",
            Self::TbContact => "tb_contact",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ordered().into_iter().find(|id| id.key() == key)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::CoughGt2Weeks => "Persistent cough >2 weeks",
            Self::CoughWithSputum => "Productive cough",
            Self::CoughWithBlood => "Blood in sputum",
            Self::FeverEvening => "Evening fever",
            Self::WeightLoss => "Unexplained weight loss",
            Self::NightSweats => "Night sweats",
            Self::ChestPain => "Chest pain",
            Self::LossOfAppetite => "Loss of appetite",
            Self::TbContact => "Known TB contact",
        }
    }

    /// Scoring weight in points. `TbContact` carries no direct weight; its
    /// contribution comes through the exposure follow-up answer.
    pub const fn weight(self) -> u8 {
        match self {
            Self::CoughGt2Weeks => 3,
            Self::CoughWithSputum => 2,
            Self::CoughWithBlood => 4,
            Self::FeverEvening => 2,
            Self::WeightLoss => 3,
            Self::NightSweats => 2,
            Self::ChestPain => 1,
            Self::LossOfAppetite => 1,
            Self::TbContact => 0,
        }
    }

    /// Critical symptoms force `Urgency::Immediate` regardless of score.
    pub const fn is_critical(self) -> bool {
        matches!(self, Self::CoughWithBlood)
    }

    /// Systemic (non-localized) indicators counted for the
    /// multiple-constitutional-symptom bonus.
    pub const fn is_constitutional(self) -> bool {
        matches!(
            self,
            Self::FeverEvening | Self::WeightLoss | Self::NightSweats | Self::LossOfAppetite
        )
    }
}

/// Comorbidity and history flags reported through the previous-conditions
/// follow-up. Unknown keys parse to `None` and are skipped by scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    PreviousTbNotCompleted,
    PreviousTbCompleted,
    Diabetes,
    Hiv,
    KidneyDisease,
    Cancer,
    Smoker,
    AlcoholUse,
}

impl RiskFactor {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::PreviousTbNotCompleted,
            Self::PreviousTbCompleted,
            Self::Diabetes,
            Self::Hiv,
            Self::KidneyDisease,
            Self::Cancer,
            Self::Smoker,
            Self::AlcoholUse,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::PreviousTbNotCompleted => "previous_tb_not_completed",
            Self::PreviousTbCompleted => "previous_tb_completed",
            Self::Diabetes => "diabetes",
            Self::Hiv => "hiv",
            Self::KidneyDisease => "kidney_disease",
            Self::Cancer => "cancer",
            Self::Smoker => "smoker",
            Self::AlcoholUse => "alcohol_use",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ordered().into_iter().find(|factor| factor.key() == key)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::PreviousTbNotCompleted => "Incomplete previous TB treatment",
            Self::PreviousTbCompleted => "Previous TB treatment history",
            Self::Diabetes => "Diabetes mellitus",
            Self::Hiv => "HIV infection",
            Self::KidneyDisease => "Chronic kidney disease",
            Self::Cancer => "Cancer/malignancy",
            Self::Smoker => "Smoking history",
            Self::AlcoholUse => "Alcohol use",
        }
    }

    pub const fn weight(self) -> u8 {
        match self {
            Self::PreviousTbNotCompleted => 5,
            Self::PreviousTbCompleted => 2,
            Self::Diabetes => 2,
            Self::Hiv => 4,
            Self::KidneyDisease => 2,
            Self::Cancer => 3,
            Self::Smoker => 1,
            Self::AlcoholUse => 1,
        }
    }

    /// Flags that force `Urgency::Immediate` independent of the score:
    /// abandoned treatment and severe immunocompromise.
    pub const fn forces_immediate(self) -> bool {
        matches!(self, Self::PreviousTbNotCompleted | Self::Hiv)
    }
}

/// Degree of known proximity to a person with active TB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExposureLevel {
    FamilyMember,
    Workplace,
    Community,
    NoKnownContact,
}

impl ExposureLevel {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::FamilyMember,
            Self::Workplace,
            Self::Community,
            Self::NoKnownContact,
        ]
    }

    pub const fn value(self) -> &'static str {
        match self {
            Self::FamilyMember => "family_member_tb",
            Self::Workplace => "workplace_contact",
            Self::Community => "community_contact",
            Self::NoKnownContact => "no_known_contact",
        }
    }

    pub fn from_value(value: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|level| level.value() == value)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::FamilyMember => "Family member with TB",
            Self::Workplace => "Close workplace contact",
            Self::Community => "Neighbour / community contact",
            Self::NoKnownContact => "No known contact",
        }
    }

    pub const fn weight(self) -> u8 {
        match self {
            Self::FamilyMember => 4,
            Self::Workplace => 3,
            Self::Community => 2,
            Self::NoKnownContact => 0,
        }
    }
}
