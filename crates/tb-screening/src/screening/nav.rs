use super::flow::{FlowPlan, STEP_BASIC_INFO, STEP_SYMPTOMS};

/// Move one step forward, jumping over the deep-question block when it is
/// empty. Step indices are dense (the total shrinks with the plan), so with
/// an empty block the upload step sits directly after the symptom step and
/// the jump degenerates to a plain increment; it is still written as the
/// block rule so both directions share one shape.
pub fn advance(current: usize, plan: &FlowPlan) -> usize {
    if current == STEP_SYMPTOMS && plan.is_empty() {
        return plan.upload_step();
    }
    (current + 1).min(plan.total_steps())
}

/// Mirror of `advance`: one step back, jumping over an empty block.
pub fn retreat(current: usize, plan: &FlowPlan) -> usize {
    if current == plan.upload_step() && plan.is_empty() {
        return STEP_SYMPTOMS;
    }
    current.saturating_sub(1).max(STEP_BASIC_INFO)
}

/// Re-fit a step index after the plan was recomputed, so a shrinking plan
/// never leaves the session pointing past the review step.
pub fn clamp_step(current: usize, plan: &FlowPlan) -> usize {
    current.clamp(STEP_BASIC_INFO, plan.total_steps())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::catalog::SymptomId;
    use crate::screening::domain::{SymptomSet, SymptomUpdate};
    use crate::screening::questions::QuestionCatalog;

    fn plan_for(ids: &[SymptomId]) -> FlowPlan {
        let symptoms = SymptomSet::default().merge(&SymptomUpdate::select(ids));
        FlowPlan::plan(&symptoms, &QuestionCatalog::standard())
    }

    #[test]
    fn advance_walks_dense_indices_and_clamps_at_review() {
        let plan = plan_for(&[SymptomId::CoughGt2Weeks]);
        assert_eq!(plan.total_steps(), 5);
        assert_eq!(advance(1, &plan), 2);
        assert_eq!(advance(2, &plan), 3);
        assert_eq!(advance(5, &plan), 5);
    }

    #[test]
    fn empty_block_jumps_between_symptoms_and_upload() {
        let plan = plan_for(&[]);
        assert_eq!(plan.total_steps(), 4);
        assert_eq!(advance(STEP_SYMPTOMS, &plan), plan.upload_step());
        assert_eq!(retreat(plan.upload_step(), &plan), STEP_SYMPTOMS);
    }

    #[test]
    fn retreat_clamps_at_first_step() {
        let plan = plan_for(&[]);
        assert_eq!(retreat(1, &plan), 1);
    }

    #[test]
    fn advance_then_retreat_round_trips() {
        let plan = plan_for(&[SymptomId::CoughGt2Weeks, SymptomId::NightSweats]);
        for step in STEP_BASIC_INFO..plan.total_steps() {
            assert_eq!(retreat(advance(step, &plan), &plan), step);
        }
    }

    #[test]
    fn clamp_pulls_stranded_index_back_to_review() {
        let wide = plan_for(&[SymptomId::CoughGt2Weeks, SymptomId::TbContact]);
        let narrow = plan_for(&[]);
        let stranded = wide.total_steps();
        assert_eq!(clamp_step(stranded, &narrow), narrow.review_step());
    }
}
