pub mod appointment;
pub mod async_job;
pub mod audit;
pub mod document;
pub mod fhir_api_call;
pub mod patient;
pub mod provider;
pub mod screening;
pub mod screening_type;
pub mod tenant;
