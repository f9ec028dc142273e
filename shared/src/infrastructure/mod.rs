pub mod database;
pub mod encryption;
pub mod storage;
pub mod providers;
pub mod oidc;
pub mod zanzibar;
pub mod repositories;
pub mod logging;

