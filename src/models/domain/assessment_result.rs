use async_graphql::SimpleObject;
use serde::{Deserialize, Serialize};

use crate::models::domain::{integrity_flag::IntegrityFlag, question_item::DifficultyLevel};

/// Immutable outcome of a submitted session.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct AssessmentResult {
    pub score: u32, // 0-100, penalties applied
    pub raw_score: u32,
    pub correct_count: u32,
    pub total_count: u32,
    pub penalty_applied: u32,
    pub passed: bool,
    pub time_taken_minutes: u32,
    pub flags: Vec<IntegrityFlag>,
    pub recommended_next_level: DifficultyLevel,
}
