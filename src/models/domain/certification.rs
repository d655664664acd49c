use async_graphql::SimpleObject;
use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::question_item::DifficultyLevel;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct Certification {
    pub id: String,
    pub user_id: String,
    pub assessment_id: String,
    pub skill_name: String,
    pub level: DifficultyLevel,
    pub score: u32,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub verification_code: String,
}

impl Certification {
    pub fn issue(
        user_id: &str,
        assessment_id: &str,
        skill_name: &str,
        level: DifficultyLevel,
        score: u32,
        issued_at: DateTime<Utc>,
    ) -> Self {
        let id = Uuid::new_v4().to_string();
        let verification_code = verification_code(&id, user_id, skill_name, issued_at);

        Certification {
            id,
            user_id: user_id.to_string(),
            assessment_id: assessment_id.to_string(),
            skill_name: skill_name.to_string(),
            level,
            score,
            issued_at,
            expires_at: one_year_after(issued_at),
            verification_code,
        }
    }

    pub fn is_valid_at(&self, at: DateTime<Utc>) -> bool {
        at >= self.issued_at && at < self.expires_at
    }
}

fn one_year_after(issued_at: DateTime<Utc>) -> DateTime<Utc> {
    issued_at
        .checked_add_months(Months::new(12))
        .unwrap_or(issued_at + Duration::days(365))
}

/// Short public code employers can use to look a certification up.
pub fn verification_code(
    certification_id: &str,
    user_id: &str,
    skill_name: &str,
    issued_at: DateTime<Utc>,
) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(certification_id.as_bytes());
    hasher.update(user_id.as_bytes());
    hasher.update(skill_name.as_bytes());
    hasher.update(issued_at.to_rfc3339().as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..16].to_uppercase()
}
