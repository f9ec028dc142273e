//! HealthPrep domain entities: the multi-tenant clinical-screening data model.

pub mod appointment;
pub mod async_job;
pub mod audit_entry;
pub mod document;
pub mod fhir_api_call;
pub mod patient;
pub mod provider;
pub mod screening;
pub mod screening_type;
pub mod tenant;

pub use appointment::*;
pub use async_job::*;
pub use audit_entry::*;
pub use document::*;
pub use fhir_api_call::*;
pub use patient::*;
pub use provider::*;
pub use screening::*;
pub use screening_type::*;
pub use tenant::*;
