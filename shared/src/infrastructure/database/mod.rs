pub mod local_db;
pub mod live_db;
pub mod crdt;
pub mod rls;
pub mod migrations;
pub mod db_service;
pub mod queries;

pub use local_db::LocalDb;
pub use live_db::LiveDb;
pub use db_service::{DatabaseService, create_pool, create_pool_with_options};

