use tb_screening::screening::{
    nav, FlowPlan, QuestionCatalog, SymptomId, SymptomSet, SymptomUpdate, STEP_BASIC_INFO,
};

fn select(ids: &[SymptomId]) -> SymptomSet {
    SymptomSet::default().merge(&SymptomUpdate::select(ids))
}

#[test]
fn planner_is_a_function_of_the_symptom_set_alone() {
    let catalog = QuestionCatalog::standard();

    // The same selection reached along two different edit paths.
    let direct = select(&[SymptomId::FeverEvening, SymptomId::TbContact]);
    let meandering = SymptomSet::default()
        .merge(&SymptomUpdate::select(&[
            SymptomId::CoughWithBlood,
            SymptomId::TbContact,
        ]))
        .merge(&SymptomUpdate {
            changes: [(SymptomId::CoughWithBlood, false)].into_iter().collect(),
            none_of_the_above: None,
        })
        .merge(&SymptomUpdate::select(&[SymptomId::FeverEvening]));

    assert_eq!(direct, meandering);
    assert_eq!(
        FlowPlan::plan(&direct, &catalog),
        FlowPlan::plan(&meandering, &catalog)
    );
}

#[test]
fn advance_then_retreat_returns_to_the_original_step() {
    let catalog = QuestionCatalog::standard();
    let selections = [
        SymptomSet::default(),
        SymptomSet::default().merge(&SymptomUpdate::none_of_the_above()),
        select(&[SymptomId::CoughGt2Weeks]),
        select(&[
            SymptomId::CoughGt2Weeks,
            SymptomId::NightSweats,
            SymptomId::TbContact,
        ]),
    ];

    for symptoms in &selections {
        let plan = FlowPlan::plan(symptoms, &catalog);
        for step in STEP_BASIC_INFO..plan.total_steps() {
            let there = nav::advance(step, &plan);
            let back = nav::retreat(there, &plan);
            assert_eq!(back, step, "round trip failed at step {step}");
        }
    }
}

#[test]
fn every_selected_symptom_contributes_its_catalog_questions() {
    let catalog = QuestionCatalog::standard();
    let symptoms = select(&[
        SymptomId::CoughGt2Weeks,
        SymptomId::WeightLoss,
        SymptomId::TbContact,
    ]);

    let plan = FlowPlan::plan(&symptoms, &catalog);
    let expected: usize = symptoms
        .selected_in_order()
        .map(|id| catalog.questions_for(id).len())
        .sum();
    assert_eq!(plan.len(), expected);

    // Steps appear grouped by symptom, in catalog order.
    let mut seen = Vec::new();
    for step in plan.steps() {
        if seen.last() != Some(&step.symptom) {
            seen.push(step.symptom);
        }
    }
    assert_eq!(
        seen,
        vec![
            SymptomId::CoughGt2Weeks,
            SymptomId::WeightLoss,
            SymptomId::TbContact
        ]
    );
}

#[test]
fn none_of_the_above_walks_the_short_wizard() {
    let catalog = QuestionCatalog::standard();
    let symptoms = SymptomSet::default().merge(&SymptomUpdate::none_of_the_above());
    let plan = FlowPlan::plan(&symptoms, &catalog);

    assert_eq!(plan.total_steps(), 4);

    // 1 -> 2 -> upload -> review, then clamped at review.
    let mut step = STEP_BASIC_INFO;
    let mut visited = vec![step];
    loop {
        let next = nav::advance(step, &plan);
        if next == step {
            break;
        }
        visited.push(next);
        step = next;
    }
    assert_eq!(visited, vec![1, 2, 3, 4]);
    assert_eq!(plan.upload_step(), 3);
    assert_eq!(plan.review_step(), 4);
}
