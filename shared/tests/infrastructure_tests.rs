#[path = "infrastructure/database/migrations/integration_test.rs"]
mod migrations_integration_test;

#[path = "infrastructure/database/migrations/runner_test.rs"]
mod migrations_runner_test;
