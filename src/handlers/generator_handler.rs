use std::sync::Arc;

use actix_web::{post, web, HttpResponse};

use crate::{app_state::AppState, errors::AppError, models::dto::generator_dto::GenerationRequest};

#[post("/api/generators")]
pub async fn generate_content(
    state: web::Data<Arc<AppState>>,
    request: web::Json<GenerationRequest>,
) -> Result<HttpResponse, AppError> {
    let content = state
        .content_generator_service
        .generate(request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(content))
}
