//! Interactive first-boot CLI: creates the single tenant-less root admin account
//! (§3 "User") and, optionally, onboards the first tenant (§3 "Tenant") through the
//! same `TenantOnboardingUseCase` the admin API would otherwise drive. Onboarding a
//! tenant here only creates the row in `pending_approval` state; a root admin still
//! has to `approve` it before any sync job can run against it.

use std::process;

use dialoguer::{Input, Password, Select};
use dotenv::dotenv;

use screening_service::setup::{CreateRootAdminUseCase, TenantOnboardingUseCase};
use shared::config::Settings;
use shared::domain::entities::healthprep::EpicEnvironment;
use shared::domain::repositories::SetupRepository;
use shared::infrastructure::database::{create_pool, DatabaseService};
use shared::infrastructure::repositories::{
    SetupRepositoryImpl, TenantRepositoryImpl, UserRepositoryImpl,
};

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    println!("=== HealthPrep Initial Setup ===\n");

    let settings = Settings::from_env().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {e}");
        process::exit(1);
    });

    println!("Connecting to database...");
    let pool = create_pool(&settings.database.url).await.unwrap_or_else(|e| {
        eprintln!("Failed to connect to database: {e}");
        process::exit(1);
    });
    let database_service = std::sync::Arc::new(DatabaseService::new(pool.clone()));
    database_service.health_check().await.unwrap_or_else(|e| {
        eprintln!("Database health check failed: {e}");
        process::exit(1);
    });
    println!("\u{2713} Database connected\n");

    println!("Running database migrations...");
    let migrator = sqlx::migrate::Migrator::new(std::path::Path::new("./migrations"))
        .await
        .unwrap_or_else(|e| {
            eprintln!("Failed to initialize migrator: {e}");
            process::exit(1);
        });
    migrator.run(&pool).await.unwrap_or_else(|e| {
        eprintln!("Failed to run migrations: {e}");
        process::exit(1);
    });
    println!("\u{2713} Migrations complete\n");

    let setup_repository: Box<dyn SetupRepository> = Box::new(SetupRepositoryImpl::new(pool.clone()));
    let is_completed = setup_repository.is_setup_completed().await.unwrap_or_else(|e| {
        eprintln!("Failed to check setup status: {e}");
        process::exit(1);
    });

    if is_completed {
        println!("\u{26a0} Setup has already been completed.");
        let options = vec!["Exit", "Onboard another tenant anyway"];
        let selection = Select::new()
            .with_prompt("What would you like to do?")
            .items(&options)
            .default(0)
            .interact()
            .unwrap_or(0);
        if selection == 0 {
            println!("Exiting...");
            process::exit(0);
        }
    } else {
        println!("=== Root Admin Setup ===\n");
        let email: String = Input::new()
            .with_prompt("Root admin email")
            .validate_with(|s: &String| if s.contains('@') { Ok(()) } else { Err("invalid email") })
            .interact_text()
            .unwrap_or_else(|e| {
                eprintln!("Error reading input: {e}");
                process::exit(1);
            });
        let username: String = Input::new()
            .with_prompt("Root admin username")
            .interact_text()
            .unwrap_or_else(|e| {
                eprintln!("Error reading input: {e}");
                process::exit(1);
            });
        let password = Password::new()
            .with_prompt("Root admin password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .validate_with(|s: &String| {
                if s.len() >= 8 {
                    Ok(())
                } else {
                    Err("password must be at least 8 characters")
                }
            })
            .interact()
            .unwrap_or_else(|e| {
                eprintln!("Error reading password: {e}");
                process::exit(1);
            });

        let create_root_admin = CreateRootAdminUseCase::new(
            Box::new(SetupRepositoryImpl::new(pool.clone())),
            Box::new(UserRepositoryImpl::new(database_service.clone())),
        );
        match create_root_admin.execute(&email, &username, &password).await {
            Ok(user) => println!("\u{2713} Root admin created: {} ({})\n", user.email, user.username),
            Err(e) => {
                eprintln!("Failed to create root admin: {e}");
                process::exit(1);
            }
        }
    }

    println!("=== First Tenant (optional) ===\n");
    let want_tenant = Select::new()
        .with_prompt("Onboard a tenant now?")
        .items(&["Yes", "No, I'll do it later via the admin API"])
        .default(0)
        .interact()
        .unwrap_or(1);
    if want_tenant != 0 {
        println!("Done. Run this tool again later to onboard a tenant.");
        return;
    }

    let name: String = Input::new()
        .with_prompt("Tenant name (alphanumeric and hyphens only)")
        .validate_with(|s: &String| {
            if !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '-') {
                Ok(())
            } else {
                Err("alphanumeric and hyphens only")
            }
        })
        .interact_text()
        .unwrap_or_else(|e| {
            eprintln!("Error reading input: {e}");
            process::exit(1);
        });
    let display_name: String = Input::new()
        .with_prompt("Tenant display name")
        .interact_text()
        .unwrap_or_else(|e| {
            eprintln!("Error reading input: {e}");
            process::exit(1);
        });
    let environment = Select::new()
        .with_prompt("Epic environment")
        .items(&["sandbox", "production"])
        .default(0)
        .interact()
        .unwrap_or(0);
    let epic_environment = if environment == 0 {
        EpicEnvironment::Sandbox
    } else {
        EpicEnvironment::Production
    };

    let onboarding = TenantOnboardingUseCase::new(Box::new(TenantRepositoryImpl::new(pool.clone())));
    match onboarding.execute(&name, &display_name, epic_environment).await {
        Ok(tenant) => {
            println!("\u{2713} Tenant created: {} ({})", tenant.display_name, tenant.name);
            println!("  status = pending_approval; a root admin must approve it before sync jobs run.");
        }
        Err(e) => eprintln!("Failed to onboard tenant: {e}"),
    }
}
