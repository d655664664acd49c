use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::{
    answer_record::AnswerRecord,
    assessment_result::AssessmentResult,
    assessment_session::{AssessmentSession, SubmissionReason},
    question_item::DifficultyLevel,
};

/// Persisted record of a submitted assessment session.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct SkillAssessment {
    pub id: String, // same id as the live session it came from
    pub user_id: String,
    pub skill_name: String,
    pub difficulty: DifficultyLevel,
    pub proctoring_enabled: bool,
    pub tab_switch_count: u32,
    pub submission_reason: SubmissionReason,
    pub result: AssessmentResult,
    #[graphql(skip)]
    pub answers: Vec<AnswerRecord>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl SkillAssessment {
    pub fn from_session(
        session: &AssessmentSession,
        result: AssessmentResult,
        completed_at: DateTime<Utc>,
    ) -> Self {
        SkillAssessment {
            id: session.id().to_string(),
            user_id: session.user_id().to_string(),
            skill_name: session.skill_name().to_string(),
            difficulty: session.difficulty(),
            proctoring_enabled: session.proctoring_enabled(),
            tab_switch_count: session.tab_switch_count(),
            submission_reason: session
                .submission_reason()
                .unwrap_or(SubmissionReason::EarlySubmit),
            result,
            answers: session.answers().values().cloned().collect(),
            started_at: session.started_at().unwrap_or(completed_at),
            completed_at,
        }
    }
}
