//! §4.5 "Async Job Runtime": a durable FIFO queue with priority lanes and per-tenant
//! concurrency caps, fronting `screening-service`'s sync pipeline and prep-sheet
//! generator so both run as cancellable, progress-reporting background jobs instead
//! of blocking an HTTP request thread.

pub mod inputs;
pub mod queue;
pub mod runtime;
pub mod worker;

pub use inputs::{
    BatchPrepSheetsInputs, BatchPrepSheetsResults, BatchSyncInputs, BatchSyncResults,
    JobItemFailure, PrincipalSnapshot, ScopeKind,
};
pub use queue::JobQueue;
pub use runtime::WorkerPool;
pub use worker::JobExecutor;
