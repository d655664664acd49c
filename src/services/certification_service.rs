use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    errors::{AppError, AppResult},
    models::domain::{Certification, SkillAssessment},
    repositories::CertificationRepository,
};

pub struct CertificationService {
    repository: Arc<dyn CertificationRepository>,
}

impl CertificationService {
    pub fn new(repository: Arc<dyn CertificationRepository>) -> Self {
        Self { repository }
    }

    /// Issues a certification for a passed assessment; failed ones get none.
    pub async fn issue_for(
        &self,
        assessment: &SkillAssessment,
        issued_at: DateTime<Utc>,
    ) -> AppResult<Option<Certification>> {
        if !assessment.result.passed {
            return Ok(None);
        }

        let certification = Certification::issue(
            &assessment.user_id,
            &assessment.id,
            &assessment.skill_name,
            assessment.difficulty,
            assessment.result.score,
            issued_at,
        );

        let certification = self.repository.create(certification).await?;
        log::info!(
            "Issued certification {} ({} - {}) to user {}",
            certification.id,
            certification.skill_name,
            certification.level,
            certification.user_id
        );
        Ok(Some(certification))
    }

    pub async fn get_certification(&self, id: &str) -> AppResult<Certification> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Certification with id '{}' not found", id)))
    }

    pub async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<Certification>> {
        self.repository.list_by_user(user_id).await
    }

    pub async fn verify(&self, code: &str) -> AppResult<Certification> {
        let normalized = code.trim().to_uppercase();
        self.repository
            .find_by_verification_code(&normalized)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("No certification with verification code '{}'", normalized))
            })
    }
}
