use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{Database, CERTIFICATIONS_COLLECTION},
    errors::AppResult,
    models::domain::Certification,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CertificationRepository: Send + Sync {
    async fn create(&self, certification: Certification) -> AppResult<Certification>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Certification>>;
    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<Certification>>;
    async fn find_by_verification_code(&self, code: &str) -> AppResult<Option<Certification>>;
}

pub struct MongoCertificationRepository {
    collection: Collection<Certification>,
}

impl MongoCertificationRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(CERTIFICATIONS_COLLECTION);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for {} collection", CERTIFICATIONS_COLLECTION);

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let code_index = IndexModel::builder()
            .keys(doc! { "verification_code": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("verification_code_unique".to_string())
                    .build(),
            )
            .build();

        let user_id_index = IndexModel::builder()
            .keys(doc! { "user_id": 1 })
            .options(IndexOptions::builder().name("user_id".to_string()).build())
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(code_index).await?;
        self.collection.create_index(user_id_index).await?;

        log::info!(
            "Successfully created indexes for {} collection",
            CERTIFICATIONS_COLLECTION
        );
        Ok(())
    }
}

#[async_trait]
impl CertificationRepository for MongoCertificationRepository {
    async fn create(&self, certification: Certification) -> AppResult<Certification> {
        self.collection.insert_one(&certification).await?;
        Ok(certification)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Certification>> {
        let certification = self.collection.find_one(doc! { "id": id }).await?;
        Ok(certification)
    }

    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<Certification>> {
        let certifications = self
            .collection
            .find(doc! { "user_id": user_id })
            .sort(doc! { "issued_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(certifications)
    }

    async fn find_by_verification_code(&self, code: &str) -> AppResult<Option<Certification>> {
        let certification = self
            .collection
            .find_one(doc! { "verification_code": code })
            .await?;
        Ok(certification)
    }
}
