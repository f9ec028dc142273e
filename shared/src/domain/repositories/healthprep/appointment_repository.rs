use async_trait::async_trait;
use crate::domain::entities::healthprep::Appointment;
use crate::shared::AppResult;
use uuid::Uuid;

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn upsert_by_source_id(&self, appointment: Appointment) -> AppResult<Appointment>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Appointment>>;
    async fn list_for_patient(&self, patient_id: Uuid) -> AppResult<Vec<Appointment>>;
    /// Prep-sheet generation input (§4.6): appointments in the tenant's
    /// prioritization window, actionable statuses only.
    async fn list_upcoming_for_tenant(
        &self,
        tenant_id: Uuid,
        window_days: i32,
    ) -> AppResult<Vec<Appointment>>;
}
