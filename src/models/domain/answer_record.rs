use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct AnswerRecord {
    pub question_index: usize,
    pub answer_value: String,
    pub time_spent_seconds: i64,
    pub timestamp: DateTime<Utc>,
}

impl AnswerRecord {
    pub fn new(
        question_index: usize,
        answer_value: &str,
        displayed_at: DateTime<Utc>,
        answered_at: DateTime<Utc>,
    ) -> Self {
        AnswerRecord {
            question_index,
            answer_value: answer_value.to_string(),
            time_spent_seconds: (answered_at - displayed_at).num_seconds().max(0),
            timestamp: answered_at,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.answer_value.trim().is_empty()
    }
}
