use super::common::*;
use crate::screening::catalog::SymptomId;
use crate::screening::domain::{
    AnswerValue, BasicInfoUpdate, SymptomUpdate, UploadKind, UploadRecord, ValidationError,
};
use crate::screening::flow::{STEP_BASIC_INFO, STEP_SYMPTOMS};
use crate::screening::questions::QUESTION_DURATION;
use crate::screening::session::{ScreeningSession, Transition};

fn session_with_age(age: u32) -> ScreeningSession {
    let workflow = workflow();
    workflow.apply(
        ScreeningSession::new(fixed_now()),
        Transition::SetBasicInfo {
            update: BasicInfoUpdate {
                age: Some(age),
                ..BasicInfoUpdate::default()
            },
        },
    )
}

#[test]
fn new_session_starts_at_basic_info_with_fixed_steps() {
    let session = ScreeningSession::new(fixed_now());
    assert_eq!(session.current_step, STEP_BASIC_INFO);
    assert_eq!(session.total_steps, 4);
    assert!(!session.completed);
    assert!(session.result.is_none());
}

#[test]
fn selecting_none_of_the_above_clears_symptoms() {
    let workflow = workflow();
    let session = workflow.apply(
        ScreeningSession::new(fixed_now()),
        Transition::SetSymptoms {
            update: SymptomUpdate::select(&[SymptomId::CoughGt2Weeks, SymptomId::NightSweats]),
        },
    );
    assert!(session.symptoms.any_selected());

    let cleared = workflow.apply(
        session,
        Transition::SetSymptoms {
            update: SymptomUpdate::none_of_the_above(),
        },
    );
    assert!(cleared.symptoms.none_of_the_above());
    assert!(!cleared.symptoms.any_selected());
    assert_eq!(cleared.total_steps, 4);
}

#[test]
fn selecting_a_symptom_clears_the_none_flag() {
    let workflow = workflow();
    let session = workflow.apply(
        ScreeningSession::new(fixed_now()),
        Transition::SetSymptoms {
            update: SymptomUpdate::none_of_the_above(),
        },
    );

    let reselected = workflow.apply(
        session,
        Transition::SetSymptoms {
            update: SymptomUpdate::select(&[SymptomId::FeverEvening]),
        },
    );
    assert!(!reselected.symptoms.none_of_the_above());
    assert!(reselected.symptoms.is_selected(SymptomId::FeverEvening));
}

#[test]
fn symptom_changes_recompute_total_steps() {
    let workflow = workflow();
    let session = workflow.apply(
        ScreeningSession::new(fixed_now()),
        Transition::SetSymptoms {
            update: SymptomUpdate::select(&[SymptomId::CoughGt2Weeks, SymptomId::TbContact]),
        },
    );
    // basic info + symptoms + 3 deep questions + upload + review
    assert_eq!(session.total_steps, 7);

    let narrowed = workflow.apply(
        session,
        Transition::SetSymptoms {
            update: SymptomUpdate {
                changes: [(SymptomId::TbContact, false)].into_iter().collect(),
                none_of_the_above: None,
            },
        },
    );
    assert_eq!(narrowed.total_steps, 5);
}

#[test]
fn shrinking_plan_clamps_a_stranded_step() {
    let workflow = workflow();
    let mut session = workflow.apply(
        ScreeningSession::new(fixed_now()),
        Transition::SetSymptoms {
            update: SymptomUpdate::select(&[SymptomId::CoughGt2Weeks, SymptomId::TbContact]),
        },
    );
    session = workflow.apply(session, Transition::SetStep { step: 7 });
    assert_eq!(session.current_step, 7);

    let narrowed = workflow.apply(
        session,
        Transition::SetSymptoms {
            update: SymptomUpdate::none_of_the_above(),
        },
    );
    assert_eq!(narrowed.total_steps, 4);
    assert_eq!(narrowed.current_step, 4);
}

#[test]
fn advance_requires_a_valid_age_on_the_first_step() {
    let workflow = workflow();
    let session = ScreeningSession::new(fixed_now());
    match workflow.advance(session) {
        Err(ValidationError::AgeMissing) => {}
        other => panic!("expected missing-age validation error, got {other:?}"),
    }

    let overage = session_with_age(200);
    match workflow.advance(overage) {
        Err(ValidationError::AgeOutOfRange(200)) => {}
        other => panic!("expected out-of-range validation error, got {other:?}"),
    }

    let valid = session_with_age(34);
    let advanced = workflow.advance(valid).expect("valid age advances");
    assert_eq!(advanced.current_step, STEP_SYMPTOMS);
}

#[test]
fn advance_skips_an_empty_deep_block() {
    let workflow = workflow();
    let mut session = session_with_age(34);
    session = workflow.apply(
        session,
        Transition::SetSymptoms {
            update: SymptomUpdate::none_of_the_above(),
        },
    );
    session = workflow.apply(session, Transition::SetStep { step: STEP_SYMPTOMS });

    let at_upload = workflow.advance(session).expect("advance past symptoms");
    assert_eq!(at_upload.current_step, 3);

    let back = workflow.retreat(at_upload);
    assert_eq!(back.current_step, STEP_SYMPTOMS);
}

#[test]
fn deep_answers_merge_per_symptom() {
    let workflow = workflow();
    let session = workflow.apply(
        ScreeningSession::new(fixed_now()),
        Transition::SetDeepAnswer {
            symptom: SymptomId::CoughGt2Weeks,
            question: QUESTION_DURATION.to_string(),
            value: AnswerValue::single("2_4_weeks"),
        },
    );

    let overwritten = workflow.apply(
        session,
        Transition::SetDeepAnswer {
            symptom: SymptomId::CoughGt2Weeks,
            question: QUESTION_DURATION.to_string(),
            value: AnswerValue::single("gt_1_month"),
        },
    );

    let value = overwritten
        .deep_answers
        .get(SymptomId::CoughGt2Weeks, QUESTION_DURATION)
        .and_then(AnswerValue::as_single);
    assert_eq!(value, Some("gt_1_month"));
}

#[test]
fn remove_upload_out_of_range_is_a_no_op() {
    let workflow = workflow();
    let record = UploadRecord::new(
        "xray.png",
        UploadKind::ChestXray,
        "image/png",
        1024,
        "aGVsbG8=",
        fixed_now(),
    )
    .expect("small png accepted");

    let session = workflow.apply(
        ScreeningSession::new(fixed_now()),
        Transition::AddUpload { record },
    );
    assert_eq!(session.uploads.len(), 1);

    let unchanged = workflow.apply(session, Transition::RemoveUpload { index: 5 });
    assert_eq!(unchanged.uploads.len(), 1);

    let removed = workflow.apply(unchanged, Transition::RemoveUpload { index: 0 });
    assert!(removed.uploads.is_empty());
}

#[test]
fn reset_returns_to_the_empty_state() {
    let workflow = workflow();
    let mut session = session_with_age(40);
    session = workflow.apply(
        session,
        Transition::SetSymptoms {
            update: SymptomUpdate::select(&[SymptomId::WeightLoss]),
        },
    );

    let reset = workflow.apply(session, Transition::Reset);
    assert_eq!(reset, ScreeningSession::new(fixed_now()));
}

#[test]
fn load_snapshot_replaces_state_wholesale() {
    let workflow = workflow();
    let mut snapshot = session_with_age(52);
    snapshot = workflow.apply(
        snapshot,
        Transition::SetSymptoms {
            update: SymptomUpdate::select(&[SymptomId::NightSweats]),
        },
    );

    let restored = workflow.apply(
        ScreeningSession::new(fixed_now()),
        Transition::LoadSnapshot {
            snapshot: Box::new(snapshot.clone()),
        },
    );
    assert_eq!(restored, snapshot);
}

#[test]
fn compute_score_stores_result_and_completes() {
    let workflow = workflow();
    let mut session = session_with_age(45);
    session = workflow.apply(
        session,
        Transition::SetSymptoms {
            update: SymptomUpdate::select(&[SymptomId::CoughGt2Weeks]),
        },
    );

    let scored = workflow.apply(session, Transition::ComputeScore);
    assert!(scored.completed);
    let result = scored.result.expect("result stored");
    assert_eq!(result.score, 3);
}
