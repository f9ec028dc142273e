//! HTTP handlers for vault API

pub mod app_handlers;
pub mod approle_handlers;
pub mod auth_handlers;
pub mod policy_handlers;
pub mod realm_handlers;
pub mod secrets_handlers;
pub mod sys_handlers;

