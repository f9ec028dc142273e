pub mod kms_provider;
pub mod storage_provider;
pub mod db_provider;

pub use kms_provider::create_kms_provider;
pub use storage_provider::create_storage_provider;
pub use db_provider::{create_local_db, create_live_db};

