use std::sync::Arc;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        CertificationRepository, MongoCertificationRepository, MongoSkillAssessmentRepository,
        SkillAssessmentRepository,
    },
    services::{
        assessment_service::{AssessmentService, SessionSettings},
        certification_service::CertificationService,
        completion_service::{CompletionClient, OpenAiCompletionClient},
        content_generator_service::ContentGeneratorService,
        proctoring::{DisabledFrameAnalyzer, FrameAnalyzer, HttpFrameAnalyzer},
        question_provider::GenerativeQuestionProvider,
    },
};

/// External collaborators the services are wired against.
pub struct Dependencies {
    pub completion: Arc<dyn CompletionClient>,
    pub assessments: Arc<dyn SkillAssessmentRepository>,
    pub certifications: Arc<dyn CertificationRepository>,
    pub frame_analyzer: Arc<dyn FrameAnalyzer>,
}

#[derive(Clone)]
pub struct AppState {
    pub assessment_service: Arc<AssessmentService>,
    pub certification_service: Arc<CertificationService>,
    pub content_generator_service: Arc<ContentGeneratorService>,
    pub db: Option<Database>, // None when running against in-memory repositories
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let assessment_repository = Arc::new(MongoSkillAssessmentRepository::new(&db));
        assessment_repository.ensure_indexes().await?;

        let certification_repository = Arc::new(MongoCertificationRepository::new(&db));
        certification_repository.ensure_indexes().await?;

        let frame_analyzer: Arc<dyn FrameAnalyzer> = match &config.frame_analyzer_url {
            Some(url) => {
                log::info!("Camera frames will be analyzed by {}", url);
                Arc::new(HttpFrameAnalyzer::new(url)?)
            }
            None => {
                log::warn!("FRAME_ANALYZER_URL is not set; camera frames will not be analyzed");
                Arc::new(DisabledFrameAnalyzer)
            }
        };

        let dependencies = Dependencies {
            completion: Arc::new(OpenAiCompletionClient::new(&config)),
            assessments: assessment_repository,
            certifications: certification_repository,
            frame_analyzer,
        };

        Ok(Self::from_dependencies(config, dependencies, Some(db)))
    }

    pub fn from_dependencies(config: Config, deps: Dependencies, db: Option<Database>) -> Self {
        let certification_service = Arc::new(CertificationService::new(deps.certifications));

        let question_provider = Arc::new(GenerativeQuestionProvider::new(
            Arc::clone(&deps.completion),
            config.assessment_question_count,
        ));

        let assessment_service = Arc::new(AssessmentService::new(
            question_provider,
            deps.assessments,
            Arc::clone(&certification_service),
            deps.frame_analyzer,
            SessionSettings::from_config(&config),
        ));

        let content_generator_service = Arc::new(ContentGeneratorService::new(deps.completion));

        Self {
            assessment_service,
            certification_service,
            content_generator_service,
            db,
            config: Arc::new(config),
        }
    }
}
