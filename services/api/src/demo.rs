use crate::infra::{standard_workflow, InMemorySessionStore};
use crate::referrals::{plain_explanation, recommended};
use chrono::Utc;
use clap::Args;
use std::sync::Arc;
use tb_screening::error::AppError;
use tb_screening::screening::{
    AnswerValue, BasicInfoUpdate, QuestionStep, ScoringResult, ScreeningService, SymptomId,
    SymptomUpdate, Transition, UploadKind, UploadRequest, DURATION_LONGEST, QUESTION_DURATION,
    QUESTION_EXPOSURE, QUESTION_PREVIOUS_CONDITIONS,
};

#[derive(Args, Debug, Default)]
pub(crate) struct ScoreArgs {
    /// Symptom key to mark present (e.g. cough_gt_2_weeks). Repeatable.
    #[arg(long = "symptom")]
    pub(crate) symptoms: Vec<String>,
    /// Previous-condition key (e.g. diabetes). Repeatable; implies tb_contact.
    #[arg(long = "condition")]
    pub(crate) conditions: Vec<String>,
    /// Exposure contact value (e.g. family_member_tb). Implies tb_contact.
    #[arg(long)]
    pub(crate) exposure: Option<String>,
    /// Cough duration bucket (e.g. gt_1_month).
    #[arg(long)]
    pub(crate) duration: Option<String>,
    /// Score the explicit no-symptoms shortcut instead.
    #[arg(long)]
    pub(crate) none_of_the_above: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Include the final session snapshot JSON in the output.
    #[arg(long)]
    pub(crate) include_snapshot: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let workflow = standard_workflow();

    let mut update = if args.none_of_the_above {
        SymptomUpdate::none_of_the_above()
    } else {
        let mut ids = Vec::new();
        for key in &args.symptoms {
            match SymptomId::from_key(key) {
                Some(id) => ids.push(id),
                None => println!("ignoring unknown symptom key '{key}'"),
            }
        }
        SymptomUpdate::select(&ids)
    };

    if args.exposure.is_some() || !args.conditions.is_empty() {
        update.changes.insert(SymptomId::TbContact, true);
    }
    let symptoms = tb_screening::screening::SymptomSet::default().merge(&update);

    let mut answers = tb_screening::screening::DeepAnswers::default();
    if let Some(duration) = &args.duration {
        answers = answers.set(
            SymptomId::CoughGt2Weeks,
            QUESTION_DURATION,
            AnswerValue::single(duration.clone()),
        );
    }
    if let Some(exposure) = &args.exposure {
        answers = answers.set(
            SymptomId::TbContact,
            QUESTION_EXPOSURE,
            AnswerValue::single(exposure.clone()),
        );
    }
    if !args.conditions.is_empty() {
        answers = answers.set(
            SymptomId::TbContact,
            QUESTION_PREVIOUS_CONDITIONS,
            AnswerValue::multi(args.conditions.iter().cloned()),
        );
    }

    let result = workflow.engine().score(&symptoms, &answers);
    render_result(&result, workflow.engine().config().score_cap);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let store = Arc::new(InMemorySessionStore::default());
    let service = ScreeningService::new(store, standard_workflow());

    println!("Screening wizard demo");
    let record = service.create(Utc::now())?;
    let id = record.id;
    println!("- Created session {}", id.0);

    service.apply(
        &id,
        Transition::SetBasicInfo {
            update: BasicInfoUpdate {
                name: Some("Demo Respondent".to_string()),
                age: Some(45),
                gender: Some("female".to_string()),
                location: Some("Mumbai".to_string()),
                ..BasicInfoUpdate::default()
            },
        },
        Utc::now(),
    )?;
    let session = service.advance(&id, Utc::now())?;
    println!(
        "- Basic info accepted, step {}/{}",
        session.current_step, session.total_steps
    );

    let session = service.apply(
        &id,
        Transition::SetSymptoms {
            update: SymptomUpdate::select(&[
                SymptomId::CoughGt2Weeks,
                SymptomId::FeverEvening,
                SymptomId::TbContact,
            ]),
        },
        Utc::now(),
    )?;
    println!(
        "- Symptoms selected, wizard grew to {} steps",
        session.total_steps
    );

    let plan = service.workflow().plan(&session);
    let steps: Vec<QuestionStep> = plan.steps().to_vec();
    let mut session = service.advance(&id, Utc::now())?;
    for step in &steps {
        println!(
            "  step {}/{}: {}",
            session.current_step, session.total_steps, step.title
        );
        service.apply(
            &id,
            Transition::SetDeepAnswer {
                symptom: step.symptom,
                question: step.question_key.clone(),
                value: scripted_answer(step),
            },
            Utc::now(),
        )?;
        session = service.advance(&id, Utc::now())?;
    }

    println!(
        "- Upload step {}/{}",
        session.current_step, session.total_steps
    );
    let filename = "chest_xray.png";
    let content_type = mime_guess::from_path(filename)
        .first_or_octet_stream()
        .to_string();
    service.add_upload(
        &id,
        UploadRequest {
            filename: filename.to_string(),
            kind: UploadKind::ChestXray,
            content_type,
            content_base64: "iVBORw0KGgoAAAANSUhEUg==".to_string(),
        },
        Utc::now(),
    )?;
    session = service.advance(&id, Utc::now())?;
    println!(
        "- Review step {}/{}",
        session.current_step, session.total_steps
    );

    let result = service.submit(&id, Utc::now())?;
    println!();
    render_result(&result, service.workflow().engine().config().score_cap);

    println!("\nNearby referrals");
    for referral in recommended(None, 50.0, 3, Some(result.urgency)) {
        println!(
            "- {} ({}) | {}",
            referral.center.name, referral.center.category, referral.center.phone
        );
    }

    if args.include_snapshot {
        let record = service.fetch(&id)?;
        match serde_json::to_string_pretty(&record.session) {
            Ok(json) => println!("\nSession snapshot:\n{json}"),
            Err(err) => println!("\nSession snapshot unavailable: {err}"),
        }
    }

    Ok(())
}

fn scripted_answer(step: &QuestionStep) -> AnswerValue {
    match step.question_key.as_str() {
        QUESTION_DURATION => AnswerValue::single(DURATION_LONGEST),
        QUESTION_EXPOSURE => AnswerValue::single("family_member_tb"),
        QUESTION_PREVIOUS_CONDITIONS => AnswerValue::multi(["diabetes"]),
        _ => step
            .options
            .first()
            .map(|option| AnswerValue::single(option.value.clone()))
            .unwrap_or_else(|| AnswerValue::single("")),
    }
}

fn render_result(result: &ScoringResult, cap: u8) {
    println!("TB screening assessment");
    println!("Score: {}/{}", result.score, cap);
    println!("Classification: {}", result.classification.label());
    println!("Urgency: {}", result.urgency.label());

    if result.reasons.is_empty() {
        println!("Contributing factors: none");
    } else {
        println!("Contributing factors:");
        for reason in &result.reasons {
            println!("  - {}", reason.summary());
        }
    }

    if result.recommended_tests.is_empty() {
        println!("Recommended tests: none");
    } else {
        println!("Recommended tests:");
        for test in &result.recommended_tests {
            println!("  - {test}");
        }
    }

    println!("Narrative: {}", plain_explanation(result, cap));
}
