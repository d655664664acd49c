pub mod answer_record;
pub mod assessment_result;
pub mod assessment_session;
pub mod certification;
pub mod integrity_flag;
pub mod question_item;
pub mod skill_assessment;
pub use answer_record::AnswerRecord;
pub use assessment_result::AssessmentResult;
pub use assessment_session::AssessmentSession;
pub use certification::Certification;
pub use integrity_flag::IntegrityFlag;
pub use question_item::QuestionItem;
pub use skill_assessment::SkillAssessment;
