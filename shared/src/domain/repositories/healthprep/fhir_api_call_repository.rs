use async_trait::async_trait;
use crate::domain::entities::healthprep::FhirApiCall;
use crate::shared::AppResult;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[async_trait]
pub trait FhirApiCallRepository: Send + Sync {
    async fn record(&self, call: FhirApiCall) -> AppResult<FhirApiCall>;
    /// §4.2/§5 hourly rate-limit check: calls made since `since` for this tenant.
    async fn count_since(&self, tenant_id: Uuid, since: DateTime<Utc>) -> AppResult<i64>;
}
