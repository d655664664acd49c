use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{Database, SKILL_ASSESSMENTS_COLLECTION},
    errors::AppResult,
    models::domain::SkillAssessment,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SkillAssessmentRepository: Send + Sync {
    async fn create(&self, assessment: SkillAssessment) -> AppResult<SkillAssessment>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<SkillAssessment>>;
    /// Newest first.
    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<SkillAssessment>>;
}

pub struct MongoSkillAssessmentRepository {
    collection: Collection<SkillAssessment>,
}

impl MongoSkillAssessmentRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(SKILL_ASSESSMENTS_COLLECTION);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for {} collection", SKILL_ASSESSMENTS_COLLECTION);

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let user_completed_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "completed_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("user_completed".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(user_completed_index).await?;

        log::info!(
            "Successfully created indexes for {} collection",
            SKILL_ASSESSMENTS_COLLECTION
        );
        Ok(())
    }
}

#[async_trait]
impl SkillAssessmentRepository for MongoSkillAssessmentRepository {
    async fn create(&self, assessment: SkillAssessment) -> AppResult<SkillAssessment> {
        self.collection.insert_one(&assessment).await?;
        Ok(assessment)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<SkillAssessment>> {
        let assessment = self.collection.find_one(doc! { "id": id }).await?;
        Ok(assessment)
    }

    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<SkillAssessment>> {
        let assessments = self
            .collection
            .find(doc! { "user_id": user_id })
            .sort(doc! { "completed_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(assessments)
    }
}
