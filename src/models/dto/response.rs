use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::{
    assessment_session::{AssessmentSession, SessionStatus},
    question_item::{DifficultyLevel, QuestionItem, QuestionType},
    Certification, SkillAssessment,
};

/// A question as the candidate sees it. Never carries the answer key.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub index: usize,
    pub id: String,
    pub question_type: QuestionType,
    pub prompt_text: String,
    pub options: Vec<String>,
}

impl QuestionView {
    fn from_question(index: usize, question: &QuestionItem) -> Self {
        QuestionView {
            index,
            id: question.id.clone(),
            question_type: question.question_type,
            prompt_text: question.prompt_text.clone(),
            options: question.options.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub id: String,
    pub user_id: String,
    pub skill_name: String,
    pub difficulty: DifficultyLevel,
    pub proctoring_enabled: bool,
    pub status: SessionStatus,
    pub remaining_seconds: u32,
    pub total_questions: usize,
    pub answered_count: usize,
    pub current_question: Option<QuestionView>,
    pub current_answer: Option<String>,
    pub can_go_next: bool,
    pub can_go_previous: bool,
    pub flag_count: usize,
    pub tab_switch_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
}

impl From<&AssessmentSession> for SessionView {
    fn from(session: &AssessmentSession) -> Self {
        let index = session.current_question_index();
        let current_answer = session
            .answers()
            .get(&index)
            .map(|a| a.answer_value.clone());
        let current_answered = current_answer
            .as_deref()
            .is_some_and(|a| !a.trim().is_empty());

        SessionView {
            id: session.id().to_string(),
            user_id: session.user_id().to_string(),
            skill_name: session.skill_name().to_string(),
            difficulty: session.difficulty(),
            proctoring_enabled: session.proctoring_enabled(),
            status: session.status(),
            remaining_seconds: session.remaining_seconds(),
            total_questions: session.questions().len(),
            answered_count: session.answers().values().filter(|a| !a.is_blank()).count(),
            current_question: session
                .current_question()
                .map(|q| QuestionView::from_question(index, q)),
            current_answer,
            can_go_next: current_answered && index + 1 < session.questions().len(),
            can_go_previous: index > 0,
            flag_count: session.flags().len(),
            tab_switch_count: session.tab_switch_count(),
            started_at: session.started_at(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionOutcome {
    pub assessment: SkillAssessment,
    pub certification: Option<Certification>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CertificationVerification {
    pub valid: bool,
    pub certification: Certification,
}

impl CertificationVerification {
    pub fn at(certification: Certification, now: DateTime<Utc>) -> Self {
        CertificationVerification {
            valid: certification.is_valid_at(now),
            certification,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
