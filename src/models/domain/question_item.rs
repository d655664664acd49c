use async_graphql::Enum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestionItem {
    pub id: String,
    pub question_type: QuestionType,
    pub prompt_text: String,
    #[serde(default)]
    pub options: Vec<String>, // empty for coding and practical questions
    pub correct_answer: String,
    pub explanation: String,
    pub difficulty: DifficultyLevel,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema, Enum, Copy)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    Coding,
    Practical,
}

#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize, JsonSchema, Enum, Copy,
)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl DifficultyLevel {
    const TIERS: [DifficultyLevel; 4] = [
        DifficultyLevel::Beginner,
        DifficultyLevel::Intermediate,
        DifficultyLevel::Advanced,
        DifficultyLevel::Expert,
    ];

    /// Proctoring (camera sampling and tab monitoring) only runs on the top tier.
    pub fn requires_proctoring(self) -> bool {
        self == DifficultyLevel::Expert
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DifficultyLevel::Beginner => "beginner",
            DifficultyLevel::Intermediate => "intermediate",
            DifficultyLevel::Advanced => "advanced",
            DifficultyLevel::Expert => "expert",
        }
    }

    fn tier(self) -> usize {
        Self::TIERS.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn step_up(self) -> Self {
        Self::TIERS[(self.tier() + 1).min(Self::TIERS.len() - 1)]
    }

    pub fn step_down(self) -> Self {
        Self::TIERS[self.tier().saturating_sub(1)]
    }
}

impl std::fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl QuestionItem {
    /// An answer counts only when it is exactly the stored correct answer.
    pub fn is_answered_correctly(&self, answer_value: &str) -> bool {
        answer_value == self.correct_answer
    }
}
