use std::sync::Arc;

use actix_web::{delete, get, http::header, post, put, web, HttpRequest, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::{
        request::{RecordAnswerRequest, StartAssessmentRequest},
        response::MessageResponse,
    },
};

#[post("/api/assessments")]
pub async fn start_assessment(
    state: web::Data<Arc<AppState>>,
    request: web::Json<StartAssessmentRequest>,
) -> Result<HttpResponse, AppError> {
    let session = state
        .assessment_service
        .start_assessment(request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(session))
}

#[get("/api/assessments/{id}")]
pub async fn get_assessment(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let session = state.assessment_service.get_session(&id).await?;
    Ok(HttpResponse::Ok().json(session))
}

#[get("/api/assessments/{id}/result")]
pub async fn get_assessment_result(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let assessment = state.assessment_service.get_result(&id).await?;
    Ok(HttpResponse::Ok().json(assessment))
}

#[put("/api/assessments/{id}/answers/{index}")]
pub async fn record_answer(
    state: web::Data<Arc<AppState>>,
    path: web::Path<(String, usize)>,
    request: web::Json<RecordAnswerRequest>,
) -> Result<HttpResponse, AppError> {
    let (id, index) = path.into_inner();
    let session = state
        .assessment_service
        .record_answer(&id, index, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(session))
}

#[post("/api/assessments/{id}/next")]
pub async fn next_question(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let session = state.assessment_service.next_question(&id).await?;
    Ok(HttpResponse::Ok().json(session))
}

#[post("/api/assessments/{id}/previous")]
pub async fn previous_question(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let session = state.assessment_service.previous_question(&id).await?;
    Ok(HttpResponse::Ok().json(session))
}

#[post("/api/assessments/{id}/visibility-lost")]
pub async fn visibility_lost(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.assessment_service.report_visibility_lost(&id).await?;
    Ok(HttpResponse::Accepted().finish())
}

/// Raw image bytes from the candidate's camera. Size is checked by the
/// frame source.
#[post("/api/assessments/{id}/frames")]
pub async fn upload_frame(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream");

    state
        .assessment_service
        .upload_frame(&id, content_type, body.to_vec())
        .await?;
    Ok(HttpResponse::Accepted().finish())
}

#[post("/api/assessments/{id}/submit")]
pub async fn submit_assessment(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let outcome = state.assessment_service.submit(&id).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

#[delete("/api/assessments/{id}")]
pub async fn abandon_assessment(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.assessment_service.abandon(&id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: format!("Assessment {} abandoned", id),
    }))
}

#[get("/api/users/{user_id}/assessments")]
pub async fn list_user_assessments(
    state: web::Data<Arc<AppState>>,
    user_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let assessments = state.assessment_service.list_for_user(&user_id).await?;
    Ok(HttpResponse::Ok().json(assessments))
}
