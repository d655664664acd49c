use async_graphql::{Context, ErrorExtensions, Object, Result, ID};

use crate::{
    app_state::AppState,
    graphql::helpers::{parse_id, require_non_blank},
    models::domain::{Certification, SkillAssessment},
};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn skill_assessments(
        &self,
        ctx: &Context<'_>,
        user_id: String,
    ) -> Result<Vec<SkillAssessment>> {
        let state = ctx.data::<AppState>()?;
        let user_id = require_non_blank("userId", &user_id).map_err(|e| e.extend())?;

        state
            .assessment_service
            .list_for_user(user_id)
            .await
            .map_err(|e| e.extend())
    }

    async fn skill_assessment(&self, ctx: &Context<'_>, id: ID) -> Result<SkillAssessment> {
        let state = ctx.data::<AppState>()?;
        let id = parse_id(&id).map_err(|e| e.extend())?;

        state
            .assessment_service
            .get_result(&id)
            .await
            .map_err(|e| e.extend())
    }

    async fn certifications(
        &self,
        ctx: &Context<'_>,
        user_id: String,
    ) -> Result<Vec<Certification>> {
        let state = ctx.data::<AppState>()?;
        let user_id = require_non_blank("userId", &user_id).map_err(|e| e.extend())?;

        state
            .certification_service
            .list_for_user(user_id)
            .await
            .map_err(|e| e.extend())
    }

    async fn certification(&self, ctx: &Context<'_>, id: ID) -> Result<Certification> {
        let state = ctx.data::<AppState>()?;
        let id = parse_id(&id).map_err(|e| e.extend())?;

        state
            .certification_service
            .get_certification(&id)
            .await
            .map_err(|e| e.extend())
    }

    async fn certification_by_code(
        &self,
        ctx: &Context<'_>,
        code: String,
    ) -> Result<Certification> {
        let state = ctx.data::<AppState>()?;

        state
            .certification_service
            .verify(&code)
            .await
            .map_err(|e| e.extend())
    }
}
