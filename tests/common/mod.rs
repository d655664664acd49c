#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::RwLock;

use blox_talent_server::{
    app_state::{AppState, Dependencies},
    config::Config,
    errors::{AppError, AppResult},
    models::domain::{Certification, SkillAssessment},
    repositories::{CertificationRepository, SkillAssessmentRepository},
    services::{completion_service::CompletionClient, proctoring::DisabledFrameAnalyzer},
};

#[derive(Default)]
pub struct InMemorySkillAssessmentRepository {
    records: Arc<RwLock<HashMap<String, SkillAssessment>>>,
}

impl InMemorySkillAssessmentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SkillAssessmentRepository for InMemorySkillAssessmentRepository {
    async fn create(&self, assessment: SkillAssessment) -> AppResult<SkillAssessment> {
        let mut records = self.records.write().await;
        if records.contains_key(&assessment.id) {
            return Err(AppError::AlreadyExists(format!(
                "Assessment with id '{}' already exists",
                assessment.id
            )));
        }
        records.insert(assessment.id.clone(), assessment.clone());
        Ok(assessment)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<SkillAssessment>> {
        let records = self.records.read().await;
        Ok(records.get(id).cloned())
    }

    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<SkillAssessment>> {
        let records = self.records.read().await;
        let mut items: Vec<_> = records
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        Ok(items)
    }
}

#[derive(Default)]
pub struct InMemoryCertificationRepository {
    records: Arc<RwLock<HashMap<String, Certification>>>,
}

impl InMemoryCertificationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CertificationRepository for InMemoryCertificationRepository {
    async fn create(&self, certification: Certification) -> AppResult<Certification> {
        let mut records = self.records.write().await;
        let code_taken = records
            .values()
            .any(|c| c.verification_code == certification.verification_code);
        if records.contains_key(&certification.id) || code_taken {
            return Err(AppError::AlreadyExists(format!(
                "Certification with id '{}' already exists",
                certification.id
            )));
        }
        records.insert(certification.id.clone(), certification.clone());
        Ok(certification)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Certification>> {
        let records = self.records.read().await;
        Ok(records.get(id).cloned())
    }

    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<Certification>> {
        let records = self.records.read().await;
        let mut items: Vec<_> = records
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.issued_at.cmp(&a.issued_at));
        Ok(items)
    }

    async fn find_by_verification_code(&self, code: &str) -> AppResult<Option<Certification>> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .find(|c| c.verification_code == code)
            .cloned())
    }
}

type Responder = dyn Fn(&str) -> AppResult<Value> + Send + Sync;

/// Completion client that answers from a closure instead of a model.
pub struct StubCompletionClient {
    respond: Box<Responder>,
}

impl StubCompletionClient {
    pub fn new<F>(respond: F) -> Self
    where
        F: Fn(&str) -> AppResult<Value> + Send + Sync + 'static,
    {
        Self {
            respond: Box::new(respond),
        }
    }
}

#[async_trait]
impl CompletionClient for StubCompletionClient {
    async fn invoke(&self, prompt: &str, _response_schema: &Value) -> AppResult<Value> {
        (self.respond)(prompt)
    }
}

/// Three questions: multiple choice, coding, practical.
pub fn question_set_json() -> Value {
    json!({
        "questions": [
            {
                "question_type": "multiple_choice",
                "prompt_text": "Which container replicates to every client?",
                "options": ["ServerStorage", "ReplicatedStorage", "ServerScriptService", "Lighting"],
                "correct_answer": "ReplicatedStorage",
                "explanation": "ReplicatedStorage is visible to the server and all clients."
            },
            {
                "question_type": "coding",
                "prompt_text": "Which property gives a Vector3's length?",
                "correct_answer": "Magnitude",
                "explanation": "Vector3.Magnitude."
            },
            {
                "question_type": "practical",
                "prompt_text": "Which event fires when a player's character spawns?",
                "correct_answer": "CharacterAdded",
                "explanation": "Player.CharacterAdded."
            }
        ]
    })
}

pub const CORRECT_ANSWERS: [&str; 3] = ["ReplicatedStorage", "Magnitude", "CharacterAdded"];

pub struct TestContext {
    pub state: AppState,
    pub assessments: Arc<InMemorySkillAssessmentRepository>,
    pub certifications: Arc<InMemoryCertificationRepository>,
}

pub fn test_config() -> Config {
    let mut config = Config::from_env();
    config.assessment_duration_secs = 3600;
    config.assessment_question_count = 3;
    config.frame_sample_interval_secs = 5;
    config
}

pub fn test_context(completion: StubCompletionClient) -> TestContext {
    let assessments = Arc::new(InMemorySkillAssessmentRepository::new());
    let certifications = Arc::new(InMemoryCertificationRepository::new());

    let state = AppState::from_dependencies(
        test_config(),
        Dependencies {
            completion: Arc::new(completion),
            assessments: assessments.clone(),
            certifications: certifications.clone(),
            frame_analyzer: Arc::new(DisabledFrameAnalyzer),
        },
        None,
    );

    TestContext {
        state,
        assessments,
        certifications,
    }
}
