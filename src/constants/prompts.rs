use crate::models::dto::generator_dto::{
    AssetOptimizationRequest, BrandStrategyRequest, CareerRoadmapRequest, JobDescriptionRequest,
};

pub const STRUCTURED_OUTPUT_SYSTEM_PROMPT: &str = "You are a content engine for a Roblox developer job marketplace. Every reply is a single JSON document that validates against the schema supplied with the request. Do not add prose, markdown or commentary outside the JSON. When information is missing, make reasonable, clearly generic assumptions rather than inventing specific facts about real people or studios.";

pub const CAREER_ROADMAP_PROMPT: &str = r#"Create a career roadmap for a Roblox developer.

## CANDIDATE
- Current role: {current_role}
- Target role: {target_role}
- Years of experience: {years_experience}
- Current skills: {skills}
- Time available: {weekly_hours} hours per week

## REQUIREMENTS
- 4 to 8 milestones in the order they should be tackled.
- Every milestone names concrete skills, learning resources (official Roblox documentation, DevForum topics, open-source places) and one portfolio project that proves the milestone.
- "timeframe_weeks" must be realistic for the weekly hours given.
- "certifications_to_earn" lists marketplace skill assessments worth passing on the way (e.g. "Luau Scripting - advanced")."#;

pub const JOB_DESCRIPTION_PROMPT: &str = r#"Write a job posting for a Roblox studio.

## ROLE
- Title: {job_title}
- Studio: {studio_name}
- Game genre: {game_genre}
- Employment type: {employment_type}
- Required skills: {required_skills}
- Budget / pay: {budget}
- Extra notes from the employer: {notes}

## REQUIREMENTS
- "overview" is two or three sentences a developer would read first.
- Responsibilities and requirements are concrete and specific to Roblox development.
- "compensation_note" restates the budget honestly; if none was given, say compensation is discussed on application.
- "tags" are short lowercase search tags."#;

pub const BRAND_STRATEGY_PROMPT: &str = r#"Build a personal brand strategy for a freelance Roblox developer.

## DEVELOPER
- Name: {developer_name}
- Specialties: {specialties}
- Portfolio highlights: {portfolio_highlights}
- Clients they want: {target_clients}

## REQUIREMENTS
- A tagline under twelve words.
- A positioning statement that says who they help and how they are different.
- Three to five content pillars with example posts for X/Twitter, the DevForum and the marketplace profile.
- Practical portfolio tips tied to the specialties."#;

pub const ASSET_OPTIMIZATION_PROMPT: &str = r#"Review a Roblox asset for performance.

## ASSET
- Name: {asset_name}
- Type: {asset_type}
- Triangle count: {triangle_count}
- Texture resolution: {texture_resolution}
- Target platforms: {target_platforms}
- Description: {description}

## REQUIREMENTS
- Judge the asset against Roblox mobile and console budgets when those platforms are targeted.
- Each recommendation names the area (geometry, textures, scripts, physics, streaming, ui), the issue, the concrete action and a priority.
- "estimated_performance_gain" is a short qualitative or percentage estimate."#;

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none given".to_string()
    } else {
        items.join(", ")
    }
}

fn or_not_specified(value: Option<&str>) -> &str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or("not specified")
}

pub fn career_roadmap_prompt(request: &CareerRoadmapRequest) -> String {
    CAREER_ROADMAP_PROMPT
        .replace("{current_role}", &request.current_role)
        .replace("{target_role}", &request.target_role)
        .replace("{years_experience}", &request.years_experience.to_string())
        .replace("{skills}", &list_or_none(&request.skills))
        .replace(
            "{weekly_hours}",
            &request
                .weekly_hours
                .map_or_else(|| "10".to_string(), |h| h.to_string()),
        )
}

pub fn job_description_prompt(request: &JobDescriptionRequest) -> String {
    JOB_DESCRIPTION_PROMPT
        .replace("{job_title}", &request.job_title)
        .replace("{studio_name}", &request.studio_name)
        .replace("{game_genre}", or_not_specified(request.game_genre.as_deref()))
        .replace("{employment_type}", &request.employment_type)
        .replace("{required_skills}", &list_or_none(&request.required_skills))
        .replace("{budget}", or_not_specified(request.budget.as_deref()))
        .replace("{notes}", or_not_specified(request.notes.as_deref()))
}

pub fn brand_strategy_prompt(request: &BrandStrategyRequest) -> String {
    BRAND_STRATEGY_PROMPT
        .replace("{developer_name}", &request.developer_name)
        .replace("{specialties}", &list_or_none(&request.specialties))
        .replace(
            "{portfolio_highlights}",
            &list_or_none(&request.portfolio_highlights),
        )
        .replace("{target_clients}", &request.target_clients)
}

pub fn asset_optimization_prompt(request: &AssetOptimizationRequest) -> String {
    ASSET_OPTIMIZATION_PROMPT
        .replace("{asset_name}", &request.asset_name)
        .replace("{asset_type}", &request.asset_type)
        .replace(
            "{triangle_count}",
            &request
                .triangle_count
                .map_or_else(|| "unknown".to_string(), |t| t.to_string()),
        )
        .replace(
            "{texture_resolution}",
            or_not_specified(request.texture_resolution.as_deref()),
        )
        .replace("{target_platforms}", &list_or_none(&request.target_platforms))
        .replace("{description}", &request.description)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_description_prompt_fills_optional_gaps() {
        let prompt = job_description_prompt(&JobDescriptionRequest {
            job_title: "UI Designer".to_string(),
            studio_name: "Brick Works".to_string(),
            game_genre: None,
            employment_type: "commission".to_string(),
            required_skills: vec!["Figma".to_string(), "Roact".to_string()],
            budget: Some("  ".to_string()),
            notes: None,
        });

        assert!(prompt.contains("Title: UI Designer"));
        assert!(prompt.contains("Required skills: Figma, Roact"));
        assert!(prompt.contains("Game genre: not specified"));
        assert!(prompt.contains("Budget / pay: not specified"));
        assert!(!prompt.contains('{'));
    }

    #[test]
    fn career_roadmap_prompt_defaults_weekly_hours() {
        let prompt = career_roadmap_prompt(&CareerRoadmapRequest {
            current_role: "Builder".to_string(),
            target_role: "Scripter".to_string(),
            skills: vec![],
            years_experience: 1,
            weekly_hours: None,
        });

        assert!(prompt.contains("Current skills: none given"));
        assert!(prompt.contains("Time available: 10 hours per week"));
    }
}
