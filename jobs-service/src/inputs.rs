//! The `AsyncJob.inputs`/`results` JSON payloads for each `JobType` (§4.5). The job
//! record carries the full authorization context it was enqueued under — tenant and
//! provider scope, the enqueuing principal's role and accessible providers — so a
//! worker claiming the job later never has to reach back to a session or re-derive
//! who it's acting on behalf of.

use screening_service::context::Role;
use serde::{Deserialize, Serialize};
use shared::shared::{AppError, AppResult};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeKind {
    Tenant,
    Provider,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrincipalSnapshot {
    pub user_id: Uuid,
    pub role: Role,
    pub accessible_provider_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSyncInputs {
    pub patient_ids: Vec<Uuid>,
    pub provider_id: Option<Uuid>,
    pub scope: ScopeKind,
    pub force: bool,
    pub principal: PrincipalSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchPrepSheetsInputs {
    pub patient_ids: Vec<Uuid>,
    pub screening_type_ids: Vec<Uuid>,
    pub scope: ScopeKind,
    pub provider_id: Option<Uuid>,
    pub principal: PrincipalSnapshot,
}

/// `results` payload recorded on a `completed` job (§4.5 progress contract).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchSyncResults {
    pub synced: Vec<Uuid>,
    pub failed: Vec<JobItemFailure>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchPrepSheetsResults {
    pub generated: Vec<Uuid>,
    pub failed: Vec<JobItemFailure>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobItemFailure {
    pub patient_id: Uuid,
    pub message: String,
}

pub fn decode<T: for<'de> Deserialize<'de>>(value: &serde_json::Value) -> AppResult<T> {
    serde_json::from_value(value.clone())
        .map_err(|err| AppError::Validation(format!("malformed job inputs: {err}")))
}

pub fn encode<T: Serialize>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).expect("job input/result types are always representable as JSON")
}
