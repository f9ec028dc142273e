use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::state_machine::{state_machine, State, TransitionError};
use crate::impl_state;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "job_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl_state!(JobStatus);

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Queued => write!(f, "queued"),
            Self::Running => write!(f, "running"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

// §4.5 "Job record lifecycle: queued -> running -> (completed | failed | cancelled)".
// A cancellation request may land while a job is still queued (never dispatched) or
// while running (cooperative — the worker notices between items, §5).
state_machine! {
    AsyncJobStateMachine for JobStatus {
        initial: Queued,

        Queued => {
            Start [action: record_started] => Running,
            Cancel [action: record_cancelled] => Cancelled,
        },
        Running => {
            Complete [action: record_completed] => Completed,
            Fail [action: record_failed] => Failed,
            Cancel [action: record_cancelled] => Cancelled,
        },
    }
}

/// Transition context the worker threads through `AsyncJobMachine::transition`.
#[derive(Debug, Clone, Default)]
pub struct AsyncJobContext {
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Truncated to 2 KiB per §4.5 worker contract before being stored.
    pub error_message: Option<String>,
}

pub struct AsyncJobMachine;

const ERROR_MESSAGE_MAX_BYTES: usize = 2048;

impl AsyncJobStateMachine<AsyncJobContext> for AsyncJobMachine {
    fn record_started(ctx: &mut AsyncJobContext) {
        ctx.started_at = Some(Utc::now());
    }

    fn record_completed(ctx: &mut AsyncJobContext) {
        ctx.completed_at = Some(Utc::now());
    }

    fn record_failed(ctx: &mut AsyncJobContext) {
        ctx.completed_at = Some(Utc::now());
        if let Some(msg) = &ctx.error_message {
            if msg.len() > ERROR_MESSAGE_MAX_BYTES {
                let mut truncated = msg.clone();
                truncated.truncate(ERROR_MESSAGE_MAX_BYTES);
                ctx.error_message = Some(truncated);
            }
        }
    }

    fn record_cancelled(ctx: &mut AsyncJobContext) {
        ctx.completed_at = Some(Utc::now());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "job_type", rename_all = "snake_case")]
pub enum JobType {
    BatchSync,
    BatchPrepSheets,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "job_priority", rename_all = "snake_case")]
pub enum JobPriority {
    Low,
    Normal,
    High,
}

/// §3 "AsyncJob".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsyncJob {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub job_type: JobType,
    pub status: JobStatus,
    pub priority: JobPriority,
    pub total_items: i32,
    pub completed_items: i32,
    pub failed_items: i32,
    pub inputs: serde_json::Value,
    pub results: Option<serde_json::Value>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AsyncJob {
    pub fn new(
        tenant_id: Uuid,
        user_id: Uuid,
        job_type: JobType,
        priority: JobPriority,
        total_items: i32,
        inputs: serde_json::Value,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            user_id,
            job_type,
            status: JobStatus::Queued,
            priority,
            total_items,
            completed_items: 0,
            failed_items: 0,
            inputs,
            results: None,
            started_at: None,
            completed_at: None,
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// `progress_percentage = completed_items / total_items * 100`, clamped [0, 100].
    pub fn progress_percentage(&self) -> f64 {
        if self.total_items <= 0 {
            return 0.0;
        }
        let pct = (self.completed_items as f64 / self.total_items as f64) * 100.0;
        pct.clamp(0.0, 100.0)
    }

    pub fn duration_seconds(&self) -> Option<i64> {
        let started = self.started_at?;
        let end = self.completed_at.unwrap_or_else(Utc::now);
        Some((end - started).num_seconds().max(0))
    }

    fn apply_transition(
        &mut self,
        event: AsyncJobStateMachineEvent,
    ) -> Result<(), TransitionError> {
        let mut ctx = AsyncJobContext {
            started_at: self.started_at,
            completed_at: self.completed_at,
            error_message: self.error_message.clone(),
        };
        let next = AsyncJobMachine::transition(&self.status, event, &mut ctx)?;
        self.status = next;
        self.started_at = ctx.started_at;
        self.completed_at = ctx.completed_at;
        self.error_message = ctx.error_message;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn start(&mut self) -> Result<(), TransitionError> {
        self.apply_transition(AsyncJobStateMachineEvent::Start)
    }

    pub fn complete(&mut self) -> Result<(), TransitionError> {
        self.apply_transition(AsyncJobStateMachineEvent::Complete)
    }

    pub fn fail(&mut self, error_message: String) -> Result<(), TransitionError> {
        self.error_message = Some(error_message);
        self.apply_transition(AsyncJobStateMachineEvent::Fail)
    }

    pub fn cancel(&mut self) -> Result<(), TransitionError> {
        self.apply_transition(AsyncJobStateMachineEvent::Cancel)
    }

    /// Idempotent progress update (§4.5 worker contract).
    pub fn record_item_progress(&mut self, succeeded: bool) {
        if succeeded {
            self.completed_items += 1;
        } else {
            self.failed_items += 1;
        }
        self.updated_at = Utc::now();
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self.status,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_queued_to_completed() {
        let mut job = AsyncJob::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            JobType::BatchSync,
            JobPriority::Normal,
            10,
            serde_json::json!({"patient_ids": []}),
        );
        assert_eq!(job.status, JobStatus::Queued);
        job.start().unwrap();
        assert_eq!(job.status, JobStatus::Running);
        assert!(job.started_at.is_some());

        for _ in 0..8 {
            job.record_item_progress(true);
        }
        for _ in 0..2 {
            job.record_item_progress(false);
        }
        assert_eq!(job.progress_percentage(), 100.0);

        job.complete().unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert!(job.completed_at.is_some());
    }

    #[test]
    fn cannot_complete_a_queued_job() {
        let mut job = AsyncJob::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            JobType::BatchPrepSheets,
            JobPriority::Low,
            1,
            serde_json::json!({}),
        );
        assert!(job.complete().is_err());
    }

    #[test]
    fn cancellation_is_reachable_from_running() {
        let mut job = AsyncJob::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            JobType::BatchSync,
            JobPriority::High,
            5,
            serde_json::json!({}),
        );
        job.start().unwrap();
        job.cancel().unwrap();
        assert_eq!(job.status, JobStatus::Cancelled);
        assert!(job.is_terminal());
    }

    #[test]
    fn failed_error_message_is_truncated() {
        let mut job = AsyncJob::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            JobType::BatchSync,
            JobPriority::Normal,
            1,
            serde_json::json!({}),
        );
        job.start().unwrap();
        let long_message = "x".repeat(4096);
        job.fail(long_message).unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.error_message.unwrap().len(), 2048);
    }
}
