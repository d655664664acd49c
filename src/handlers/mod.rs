pub mod assessment_handler;
pub mod certification_handler;
pub mod generator_handler;
pub mod health_handler;

use actix_web::web;

use crate::services::proctoring::MAX_FRAME_BYTES;

pub use assessment_handler::{
    abandon_assessment, get_assessment, get_assessment_result, list_user_assessments,
    next_question, previous_question, record_answer, start_assessment, submit_assessment,
    upload_frame, visibility_lost,
};
pub use certification_handler::{
    get_certification, list_user_certifications, verify_certification,
};
pub use generator_handler::generate_content;
pub use health_handler::{health_check, health_check_live, health_check_ready};

/// Registers every REST route. Shared by the server and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PayloadConfig::new(MAX_FRAME_BYTES + 1024))
        .service(health_check)
        .service(health_check_ready)
        .service(health_check_live)
        .service(start_assessment)
        .service(get_assessment)
        .service(get_assessment_result)
        .service(record_answer)
        .service(next_question)
        .service(previous_question)
        .service(visibility_lost)
        .service(upload_frame)
        .service(submit_assessment)
        .service(abandon_assessment)
        .service(list_user_assessments)
        .service(list_user_certifications)
        .service(get_certification)
        .service(verify_certification)
        .service(generate_content);
}
