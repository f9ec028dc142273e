//! §4.2 "EMR Sync Pipeline": fixed-order FHIR fetch sequence, merge into the local
//! store, hand-off to the screening engine; plus the §5 retry/backoff helper every
//! outbound call in this module is wrapped in.

pub mod backoff;
pub mod pipeline;
pub mod resources;

pub use backoff::with_backoff;
pub use pipeline::{EmrSyncPipeline, StageFailure, SyncStats};
