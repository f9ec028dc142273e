use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// §3 "FHIRApiCall" — rate-limit bookkeeping and audit for every outbound FHIR call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FhirApiCall {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub provider_id: Option<Uuid>,
    pub endpoint: String,
    pub method: String,
    pub resource_type: String,
    pub response_status: Option<i32>,
    pub response_time_ms: Option<i64>,
    pub called_at: DateTime<Utc>,
}

impl FhirApiCall {
    pub fn new(
        tenant_id: Uuid,
        provider_id: Option<Uuid>,
        endpoint: String,
        method: String,
        resource_type: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            provider_id,
            endpoint,
            method,
            resource_type,
            response_status: None,
            response_time_ms: None,
            called_at: Utc::now(),
        }
    }
}
