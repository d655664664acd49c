use std::sync::Arc;

use crate::{
    constants::prompts::{
        asset_optimization_prompt, brand_strategy_prompt, career_roadmap_prompt,
        job_description_prompt,
    },
    errors::{AppError, AppResult},
    models::dto::generator_dto::{
        AssetOptimization, BrandStrategy, CareerRoadmap, GeneratedContent, GenerationRequest,
        JobDescription,
    },
    services::completion_service::{generate_structured, CompletionClient},
};

pub struct ContentGeneratorService {
    completion: Arc<dyn CompletionClient>,
}

impl ContentGeneratorService {
    pub fn new(completion: Arc<dyn CompletionClient>) -> Self {
        Self { completion }
    }

    pub async fn generate(&self, request: GenerationRequest) -> AppResult<GeneratedContent> {
        request.validate()?;
        let kind = request.kind();
        log::info!("Generating {} content", kind);

        let client = self.completion.as_ref();
        let content = match &request {
            GenerationRequest::CareerRoadmap(r) => GeneratedContent::CareerRoadmap(
                generate_structured::<CareerRoadmap>(client, &career_roadmap_prompt(r)).await?,
            ),
            GenerationRequest::JobDescription(r) => GeneratedContent::JobDescription(
                generate_structured::<JobDescription>(client, &job_description_prompt(r)).await?,
            ),
            GenerationRequest::BrandStrategy(r) => GeneratedContent::BrandStrategy(
                generate_structured::<BrandStrategy>(client, &brand_strategy_prompt(r)).await?,
            ),
            GenerationRequest::AssetOptimization(r) => GeneratedContent::AssetOptimization(
                generate_structured::<AssetOptimization>(client, &asset_optimization_prompt(r))
                    .await?,
            ),
        };

        if !content.is_usable() {
            log::warn!("Generated {} content was empty", kind);
            return Err(AppError::MalformedResponse(format!(
                "generated {} was empty",
                kind
            )));
        }

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::dto::generator_dto::{BrandStrategyRequest, CareerRoadmapRequest},
        services::completion_service::MockCompletionClient,
    };
    use serde_json::json;

    fn roadmap_request() -> GenerationRequest {
        GenerationRequest::CareerRoadmap(CareerRoadmapRequest {
            current_role: "Modeler".to_string(),
            target_role: "Technical Artist".to_string(),
            skills: vec!["Blender".to_string()],
            years_experience: 2,
            weekly_hours: Some(8),
        })
    }

    #[tokio::test]
    async fn generates_typed_roadmap() {
        let mut client = MockCompletionClient::new();
        client
            .expect_invoke()
            .withf(|prompt, _| prompt.contains("Target role: Technical Artist"))
            .times(1)
            .returning(|_, _| {
                Ok(json!({
                    "summary": "Move from modeling into shaders and tooling",
                    "milestones": [{
                        "title": "Learn SurfaceAppearance",
                        "timeframe_weeks": 4,
                        "skills": ["PBR textures"],
                        "resources": ["Roblox Creator Docs"],
                        "project_idea": "Retexture a showcase place"
                    }],
                    "certifications_to_earn": ["3D Modeling - advanced"]
                }))
            });

        let service = ContentGeneratorService::new(Arc::new(client));
        let content = service.generate(roadmap_request()).await.expect("roadmap");

        match content {
            GeneratedContent::CareerRoadmap(roadmap) => {
                assert_eq!(roadmap.milestones.len(), 1);
                assert_eq!(roadmap.milestones[0].timeframe_weeks, 4);
            }
            other => panic!("unexpected content: {:?}", other),
        }
    }

    #[tokio::test]
    async fn invalid_request_never_reaches_the_model() {
        let mut client = MockCompletionClient::new();
        client.expect_invoke().times(0);

        let service = ContentGeneratorService::new(Arc::new(client));
        let result = service
            .generate(GenerationRequest::BrandStrategy(BrandStrategyRequest {
                developer_name: String::new(),
                specialties: vec!["VFX".to_string()],
                portfolio_highlights: vec![],
                target_clients: "Simulator studios".to_string(),
            }))
            .await;

        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn empty_but_well_formed_output_is_rejected() {
        let mut client = MockCompletionClient::new();
        client.expect_invoke().returning(|_, _| {
            Ok(json!({
                "summary": "",
                "milestones": [],
                "certifications_to_earn": []
            }))
        });

        let service = ContentGeneratorService::new(Arc::new(client));
        let result = service.generate(roadmap_request()).await;

        assert!(matches!(result, Err(AppError::MalformedResponse(_))));
    }
}
