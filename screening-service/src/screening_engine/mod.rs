//! §4.1 "Screening Engine": eligibility, document/immunization evidencing, selective
//! refresh, and the `ScreeningEngine` orchestrator built on top of them.

pub mod document_match;
pub mod eligibility;
pub mod engine;
pub mod immunization;
pub mod matcher;
pub mod selective_refresh;

pub use engine::{ImmunizationSource, NoImmunizationSource, ScreeningEngine};
