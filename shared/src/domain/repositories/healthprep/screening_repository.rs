use async_trait::async_trait;
use crate::domain::entities::healthprep::Screening;
use crate::domain::repositories::healthprep::patient_repository::ProviderScope;
use crate::shared::AppResult;
use uuid::Uuid;

#[async_trait]
pub trait ScreeningRepository: Send + Sync {
    async fn create(&self, screening: Screening) -> AppResult<Screening>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Screening>>;
    async fn find_for_patient_and_type(
        &self,
        patient_id: Uuid,
        screening_type_id: Uuid,
    ) -> AppResult<Option<Screening>>;
    async fn update(&self, screening: Screening) -> AppResult<Screening>;
    async fn list_for_patient(&self, patient_id: Uuid) -> AppResult<Vec<Screening>>;
    /// §4.7 "Screening listing excludes `superseded` rows by default"; set
    /// `include_superseded` to see full provenance.
    async fn list_for_scope(
        &self,
        scope: &ProviderScope,
        include_superseded: bool,
    ) -> AppResult<Vec<Screening>>;
    async fn associate_document(&self, screening_id: Uuid, document_id: Uuid) -> AppResult<()>;
    /// §4.1.6 scoped invalidation: drop a document association without touching
    /// unrelated screenings for the same patient.
    async fn dissociate_documents(&self, screening_id: Uuid, document_ids: &[Uuid]) -> AppResult<()>;
}
