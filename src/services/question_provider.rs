use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    constants::assessment_prompt::question_set_prompt,
    errors::{AppError, AppResult},
    models::domain::{
        question_item::{DifficultyLevel, QuestionType},
        QuestionItem,
    },
    services::completion_service::{generate_structured, CompletionClient},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionSetProvider: Send + Sync {
    /// An empty list means the provider produced nothing usable.
    async fn fetch(&self, skill: &str, difficulty: DifficultyLevel)
        -> AppResult<Vec<QuestionItem>>;
}

#[derive(Debug, Deserialize, JsonSchema)]
struct GeneratedQuestionSet {
    questions: Vec<GeneratedQuestion>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct GeneratedQuestion {
    question_type: QuestionType,
    prompt_text: String,
    #[serde(default)]
    options: Vec<String>,
    correct_answer: String,
    #[serde(default)]
    explanation: String,
}

impl GeneratedQuestion {
    fn is_gradable(&self) -> bool {
        if self.prompt_text.trim().is_empty() || self.correct_answer.trim().is_empty() {
            return false;
        }
        match self.question_type {
            QuestionType::MultipleChoice => self.options.contains(&self.correct_answer),
            QuestionType::Coding | QuestionType::Practical => true,
        }
    }

    fn into_item(self, difficulty: DifficultyLevel) -> QuestionItem {
        QuestionItem {
            id: Uuid::new_v4().to_string(),
            question_type: self.question_type,
            prompt_text: self.prompt_text,
            options: self.options,
            correct_answer: self.correct_answer,
            explanation: self.explanation,
            difficulty,
        }
    }
}

pub struct GenerativeQuestionProvider {
    completion: Arc<dyn CompletionClient>,
    question_count: usize,
}

impl GenerativeQuestionProvider {
    pub fn new(completion: Arc<dyn CompletionClient>, question_count: usize) -> Self {
        Self {
            completion,
            question_count,
        }
    }
}

#[async_trait]
impl QuestionSetProvider for GenerativeQuestionProvider {
    async fn fetch(
        &self,
        skill: &str,
        difficulty: DifficultyLevel,
    ) -> AppResult<Vec<QuestionItem>> {
        let prompt = question_set_prompt(skill, difficulty.as_str(), self.question_count);

        let generated = match generate_structured::<GeneratedQuestionSet>(
            self.completion.as_ref(),
            &prompt,
        )
        .await
        {
            Ok(set) => set,
            Err(AppError::MalformedResponse(reason)) => {
                log::warn!(
                    "Question set for '{}' ({}) was malformed: {}",
                    skill,
                    difficulty,
                    reason
                );
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let received = generated.questions.len();
        let questions: Vec<QuestionItem> = generated
            .questions
            .into_iter()
            .filter(GeneratedQuestion::is_gradable)
            .take(self.question_count)
            .map(|q| q.into_item(difficulty))
            .collect();

        if questions.len() < received.min(self.question_count) {
            log::warn!(
                "Dropped {} ungradable questions for '{}' ({})",
                received.min(self.question_count) - questions.len(),
                skill,
                difficulty
            );
        }
        log::debug!(
            "Fetched {} questions for '{}' ({})",
            questions.len(),
            skill,
            difficulty
        );

        Ok(questions)
    }
}
