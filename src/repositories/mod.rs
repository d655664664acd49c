pub mod certification_repository;
pub mod skill_assessment_repository;

pub use certification_repository::{CertificationRepository, MongoCertificationRepository};
pub use skill_assessment_repository::{MongoSkillAssessmentRepository, SkillAssessmentRepository};
