pub mod assessment_service;
pub mod certification_service;
pub mod completion_service;
pub mod content_generator_service;
pub mod integrity_monitor;
pub mod proctoring;
pub mod question_provider;
pub mod scoring;
pub mod session_clock;
