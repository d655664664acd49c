use serde::Deserialize;
use validator::Validate;

use crate::models::domain::question_item::DifficultyLevel;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StartAssessmentRequest {
    #[validate(length(min = 1, max = 128))]
    pub user_id: String,

    #[validate(length(min = 1, max = 100))]
    pub skill_name: String,

    pub difficulty: DifficultyLevel,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecordAnswerRequest {
    #[validate(length(max = 20000))]
    pub answer_value: String,
}
