pub mod runner;

pub use runner::{
    parse_sql_statements, run_migrations, run_migrations_with_config, MigrationConfig,
};
