use async_trait::async_trait;
use crate::domain::entities::healthprep::PatientDocument;
use crate::shared::AppResult;
use uuid::Uuid;

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn create(&self, document: PatientDocument) -> AppResult<PatientDocument>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<PatientDocument>>;
    async fn find_by_source_id(
        &self,
        tenant_id: Uuid,
        source_id: &str,
    ) -> AppResult<Option<PatientDocument>>;
    async fn update(&self, document: PatientDocument) -> AppResult<PatientDocument>;
    /// Documents newer than a patient's `documents_last_evaluated_at` (§4.1.4).
    async fn list_for_patient_since(
        &self,
        patient_id: Uuid,
        since: Option<chrono::DateTime<chrono::Utc>>,
    ) -> AppResult<Vec<PatientDocument>>;
    async fn list_for_patient(&self, patient_id: Uuid) -> AppResult<Vec<PatientDocument>>;
}
