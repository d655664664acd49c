use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::AppResult;

// Requests

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CareerRoadmapRequest {
    #[validate(length(min = 1, max = 100))]
    pub current_role: String,

    #[validate(length(min = 1, max = 100))]
    pub target_role: String,

    #[validate(length(max = 30))]
    #[serde(default)]
    pub skills: Vec<String>,

    #[validate(range(max = 50))]
    pub years_experience: u8,

    #[validate(range(min = 1, max = 80))]
    pub weekly_hours: Option<u8>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct JobDescriptionRequest {
    #[validate(length(min = 1, max = 120))]
    pub job_title: String,

    #[validate(length(min = 1, max = 120))]
    pub studio_name: String,

    #[validate(length(max = 60))]
    pub game_genre: Option<String>,

    #[validate(length(min = 1, max = 40))]
    pub employment_type: String, // full_time, contract, commission...

    #[validate(length(min = 1, max = 30))]
    pub required_skills: Vec<String>,

    #[validate(length(max = 120))]
    pub budget: Option<String>,

    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BrandStrategyRequest {
    #[validate(length(min = 1, max = 100))]
    pub developer_name: String,

    #[validate(length(min = 1, max = 20))]
    pub specialties: Vec<String>,

    #[validate(length(max = 20))]
    #[serde(default)]
    pub portfolio_highlights: Vec<String>,

    #[validate(length(min = 1, max = 300))]
    pub target_clients: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AssetOptimizationRequest {
    #[validate(length(min = 1, max = 120))]
    pub asset_name: String,

    #[validate(length(min = 1, max = 40))]
    pub asset_type: String, // model, mesh, texture, script, ui

    #[validate(length(min = 1, max = 4000))]
    pub description: String,

    pub triangle_count: Option<u32>,

    #[validate(length(max = 20))]
    pub texture_resolution: Option<String>,

    #[validate(length(max = 10))]
    #[serde(default)]
    pub target_platforms: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationRequest {
    CareerRoadmap(CareerRoadmapRequest),
    JobDescription(JobDescriptionRequest),
    BrandStrategy(BrandStrategyRequest),
    AssetOptimization(AssetOptimizationRequest),
}

impl GenerationRequest {
    pub fn validate(&self) -> AppResult<()> {
        match self {
            GenerationRequest::CareerRoadmap(r) => r.validate()?,
            GenerationRequest::JobDescription(r) => r.validate()?,
            GenerationRequest::BrandStrategy(r) => r.validate()?,
            GenerationRequest::AssetOptimization(r) => r.validate()?,
        }
        Ok(())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            GenerationRequest::CareerRoadmap(_) => "career_roadmap",
            GenerationRequest::JobDescription(_) => "job_description",
            GenerationRequest::BrandStrategy(_) => "brand_strategy",
            GenerationRequest::AssetOptimization(_) => "asset_optimization",
        }
    }
}

// LLM response contracts

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CareerRoadmap {
    pub summary: String,
    pub milestones: Vec<RoadmapMilestone>,
    pub certifications_to_earn: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RoadmapMilestone {
    pub title: String,
    pub timeframe_weeks: u32,
    pub skills: Vec<String>,
    pub resources: Vec<String>,
    pub project_idea: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct JobDescription {
    pub title: String,
    pub overview: String,
    pub responsibilities: Vec<String>,
    pub requirements: Vec<String>,
    pub nice_to_have: Vec<String>,
    pub compensation_note: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BrandStrategy {
    pub tagline: String,
    pub positioning_statement: String,
    pub target_audience: String,
    pub content_pillars: Vec<ContentPillar>,
    pub portfolio_tips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ContentPillar {
    pub name: String,
    pub description: String,
    pub example_posts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AssetOptimization {
    pub overall_assessment: String,
    pub estimated_performance_gain: String,
    pub recommendations: Vec<OptimizationRecommendation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OptimizationRecommendation {
    pub area: String,
    pub issue: String,
    pub action: String,
    pub priority: RecommendationPriority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationPriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum GeneratedContent {
    CareerRoadmap(CareerRoadmap),
    JobDescription(JobDescription),
    BrandStrategy(BrandStrategy),
    AssetOptimization(AssetOptimization),
}

impl GeneratedContent {
    /// A response can match the schema and still be empty; those are rejected.
    pub fn is_usable(&self) -> bool {
        match self {
            GeneratedContent::CareerRoadmap(r) => !r.milestones.is_empty(),
            GeneratedContent::JobDescription(j) => {
                !j.title.trim().is_empty() && !j.responsibilities.is_empty()
            }
            GeneratedContent::BrandStrategy(b) => {
                !b.tagline.trim().is_empty() && !b.content_pillars.is_empty()
            }
            GeneratedContent::AssetOptimization(a) => !a.recommendations.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_are_tagged_by_kind() {
        let request: GenerationRequest = serde_json::from_value(serde_json::json!({
            "kind": "career_roadmap",
            "current_role": "Builder",
            "target_role": "Technical Lead",
            "skills": ["Luau", "Blender"],
            "years_experience": 3
        }))
        .expect("request should parse");

        assert_eq!(request.kind(), "career_roadmap");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let parsed = serde_json::from_value::<GenerationRequest>(serde_json::json!({
            "kind": "tarot_reading"
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn job_description_requires_skills() {
        let request = GenerationRequest::JobDescription(JobDescriptionRequest {
            job_title: "Gameplay Scripter".to_string(),
            studio_name: "Brick Works".to_string(),
            game_genre: Some("Obby".to_string()),
            employment_type: "contract".to_string(),
            required_skills: vec![],
            budget: None,
            notes: None,
        });

        assert!(request.validate().is_err());
    }

    #[test]
    fn generated_content_serializes_with_kind_and_content() {
        let content = GeneratedContent::AssetOptimization(AssetOptimization {
            overall_assessment: "Heavy mesh".to_string(),
            estimated_performance_gain: "30% fewer draw calls".to_string(),
            recommendations: vec![OptimizationRecommendation {
                area: "geometry".to_string(),
                issue: "120k triangles".to_string(),
                action: "Decimate to 20k".to_string(),
                priority: RecommendationPriority::High,
            }],
        });

        let json = serde_json::to_value(&content).expect("serialize");
        assert_eq!(json["kind"], "asset_optimization");
        assert_eq!(json["content"]["recommendations"][0]["priority"], "high");
        assert!(content.is_usable());
    }

    #[test]
    fn empty_roadmap_is_not_usable() {
        let content = GeneratedContent::CareerRoadmap(CareerRoadmap {
            summary: "Nothing to do".to_string(),
            milestones: vec![],
            certifications_to_earn: vec![],
        });
        assert!(!content.is_usable());
    }
}
