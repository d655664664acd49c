use std::sync::Arc;

use actix_web::{get, web, HttpResponse};
use chrono::Utc;

use crate::{
    app_state::AppState, errors::AppError, models::dto::response::CertificationVerification,
};

#[get("/api/users/{user_id}/certifications")]
pub async fn list_user_certifications(
    state: web::Data<Arc<AppState>>,
    user_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let certifications = state.certification_service.list_for_user(&user_id).await?;
    Ok(HttpResponse::Ok().json(certifications))
}

#[get("/api/certifications/{id}")]
pub async fn get_certification(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let certification = state.certification_service.get_certification(&id).await?;
    Ok(HttpResponse::Ok().json(certification))
}

#[get("/api/certifications/verify/{code}")]
pub async fn verify_certification(
    state: web::Data<Arc<AppState>>,
    code: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let certification = state.certification_service.verify(&code).await?;
    Ok(HttpResponse::Ok().json(CertificationVerification::at(certification, Utc::now())))
}
