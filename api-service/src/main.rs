use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use api_service::infra::{HtmlPassthroughPdfRenderer, UnavailableOcrBackend};
use authz_core::fhir::{EncryptedCredentialStore, FhirClientFactory};
use screening_service::phi_filter::SanitizerSalt;
use screening_service::prep_sheet::PrepSheetCompiler;
use screening_service::screening_engine::{NoImmunizationSource, ScreeningEngine};
use screening_service::setup::{CreateRootAdminUseCase, TenantOnboardingUseCase};
use shared::infrastructure::database::{create_pool, DatabaseService};
use shared::infrastructure::repositories::{
    AppointmentRepositoryImpl, AsyncJobRepositoryImpl, AuditRepositoryImpl,
    DocumentRepositoryImpl, FhirApiCallRepositoryImpl, PatientRepositoryImpl,
    PermissionRepositoryImpl, ProviderRepositoryImpl, RefreshTokenRepositoryImpl,
    RelationshipRepositoryImpl, RoleRepositoryImpl, ScreeningRepositoryImpl,
    ScreeningTypeRepositoryImpl, SetupRepositoryImpl, TenantRepositoryImpl, UserRepositoryImpl,
};
use shared::infrastructure::zanzibar::{GraphCache, PermissionChecker, RelationshipStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let settings = shared::config::Settings::from_env()
        .map_err(|e| format!("Failed to load configuration: {e}"))?;

    info!("Starting api-service on {}:{}", settings.server.host, settings.server.port);

    info!("Connecting to database...");
    let pool = create_pool(&settings.database.url)
        .await
        .map_err(|e| format!("Failed to connect to database: {e}"))?;
    let database_service = Arc::new(DatabaseService::new(pool.clone()));
    database_service
        .health_check()
        .await
        .map_err(|e| format!("Database health check failed: {e}"))?;
    info!("Database health check passed");

    info!("Running database migrations...");
    let migrator = sqlx::migrate::Migrator::new(std::path::Path::new("./migrations"))
        .await
        .map_err(|e| format!("Failed to initialize migrator: {e}"))?;
    migrator
        .run(&pool)
        .await
        .map_err(|e| format!("Failed to run migrations: {e}"))?;
    info!("Database migrations completed");

    let token_manager_state = Arc::new(shared::infrastructure::oidc::TokenManager::new(
        &settings.oidc.jwt_secret,
        settings.oidc.issuer.clone(),
        settings.oidc.jwt_expiration,
    ));
    let token_manager_login = authz_core::oidc::TokenManager::new(
        &settings.oidc.jwt_secret,
        settings.oidc.issuer.clone(),
        settings.oidc.jwt_expiration,
    );
    let token_manager_refresh = authz_core::oidc::TokenManager::new(
        &settings.oidc.jwt_secret,
        settings.oidc.issuer.clone(),
        settings.oidc.jwt_expiration,
    );

    let relationship_store = Arc::new(RelationshipStore::new(Box::new(
        RelationshipRepositoryImpl::new(pool.clone()),
    )));
    let permission_repository = Arc::new(PermissionRepositoryImpl::new(pool.clone()));
    let role_repository_for_use_cases = || {
        Box::new(RoleRepositoryImpl::new(
            database_service.clone(),
            relationship_store.clone(),
            permission_repository.clone(),
        ))
    };

    let get_permissions_use_case = authz_core::authorization::GetUserPermissionsUseCase::new(
        Box::new(UserRepositoryImpl::new(database_service.clone())),
        role_repository_for_use_cases(),
        Box::new(PermissionRepositoryImpl::new(pool.clone())),
    );

    let login_use_case = Arc::new(authz_core::auth::LoginUseCase::new(
        Box::new(UserRepositoryImpl::new(database_service.clone())),
        Box::new(RefreshTokenRepositoryImpl::new(pool.clone())),
        role_repository_for_use_cases(),
        Box::new(PermissionRepositoryImpl::new(pool.clone())),
        token_manager_login,
    ));
    let refresh_token_use_case = Arc::new(authz_core::auth::RefreshTokenUseCase::new(
        Box::new(UserRepositoryImpl::new(database_service.clone())),
        Box::new(RefreshTokenRepositoryImpl::new(pool.clone())),
        token_manager_refresh,
    ));
    let logout_use_case = Arc::new(authz_core::auth::LogoutUseCase::new(Box::new(
        RefreshTokenRepositoryImpl::new(pool.clone()),
    )));
    let userinfo_use_case = Arc::new(authz_core::auth::UserInfoUseCase::new(
        Box::new(UserRepositoryImpl::new(database_service.clone())),
        get_permissions_use_case,
    ));

    info!("Initializing graph cache...");
    let graph_cache = Arc::new(GraphCache::with_default_ttl());
    let permission_checker = Arc::new(PermissionChecker::with_graph_cache(
        RelationshipStore::new(Box::new(RelationshipRepositoryImpl::new(pool.clone()))),
        graph_cache,
        true,
    ));

    let setup_repository = Arc::new(SetupRepositoryImpl::new(pool.clone()));
    let setup_organization_use_case = Arc::new(
        screening_service::setup::TenantOnboardingUseCase::new(Box::new(TenantRepositoryImpl::new(pool.clone()))),
    );
    let create_super_admin_use_case = Arc::new(CreateRootAdminUseCase::new(
        Box::new(SetupRepositoryImpl::new(pool.clone())),
        Box::new(UserRepositoryImpl::new(database_service.clone())),
    ));

    let shared_state = shared::AppState {
        database_service: database_service.clone(),
        database_pool: Arc::new(pool.clone()),
        login_use_case,
        refresh_token_use_case,
        logout_use_case,
        userinfo_use_case,
        token_manager: token_manager_state,
        permission_checker,
        relationship_store,
        setup_repository,
        setup_organization_use_case,
        create_super_admin_use_case,
    };

    let user_repository = Arc::new(UserRepositoryImpl::new(database_service.clone()));
    let tenant_repository = Arc::new(TenantRepositoryImpl::from_service(database_service.clone()));
    let provider_repository = Arc::new(ProviderRepositoryImpl::new(database_service.clone()));
    let patient_repository = Arc::new(PatientRepositoryImpl::new(database_service.clone()));
    let screening_repository = Arc::new(ScreeningRepositoryImpl::new(database_service.clone()));
    let screening_type_repository = Arc::new(ScreeningTypeRepositoryImpl::new(database_service.clone()));
    let document_repository = Arc::new(DocumentRepositoryImpl::new(database_service.clone()));
    let appointment_repository = Arc::new(AppointmentRepositoryImpl::new(database_service.clone()));
    let async_job_repository = Arc::new(AsyncJobRepositoryImpl::new(database_service.clone()));
    let fhir_api_call_repository = Arc::new(FhirApiCallRepositoryImpl::new(database_service.clone()));
    let audit_repository = Arc::new(AuditRepositoryImpl::new(database_service.clone()));

    let prep_sheet_compiler = Arc::new(PrepSheetCompiler::new(
        screening_repository.clone(),
        screening_type_repository.clone(),
        document_repository.clone(),
        appointment_repository.clone(),
    ));
    let job_queue = Arc::new(jobs_service::JobQueue::new(
        async_job_repository.clone(),
        fhir_api_call_repository.clone(),
        audit_repository.clone(),
    ));

    info!("Starting async job worker pool...");
    let credential_store = Arc::new(EncryptedCredentialStore::new(
        tenant_repository.clone(),
        provider_repository.clone(),
    ));
    let fhir_client_factory = Arc::new(FhirClientFactory::new(
        credential_store,
        fhir_api_call_repository.clone(),
        settings.emr.oauth_redirect_url.clone(),
    ));
    let screening_engine = Arc::new(ScreeningEngine::new(
        patient_repository.clone(),
        screening_type_repository.clone(),
        screening_repository.clone(),
        document_repository.clone(),
        audit_repository.clone(),
        Arc::new(NoImmunizationSource),
    ));
    let job_executor = Arc::new(jobs_service::JobExecutor::new(
        async_job_repository.clone(),
        tenant_repository.clone(),
        patient_repository.clone(),
        document_repository.clone(),
        appointment_repository.clone(),
        screening_repository.clone(),
        screening_type_repository.clone(),
        audit_repository.clone(),
        screening_engine,
        Arc::new(UnavailableOcrBackend),
        SanitizerSalt::from_session_secret(Some(&settings.oidc.jwt_secret)),
        fhir_client_factory,
        prep_sheet_compiler.clone(),
        Arc::new(HtmlPassthroughPdfRenderer),
    ));
    let _worker_pool = jobs_service::WorkerPool::spawn(
        async_job_repository,
        tenant_repository.clone(),
        job_executor,
        settings.emr.worker_count,
    );

    let app_state = Arc::new(api_service::AppState {
        shared: shared_state,
        user_repository,
        tenant_repository,
        provider_repository,
        patient_repository,
        screening_repository,
        screening_type_repository,
        prep_sheet_compiler,
        job_queue,
    });

    let app = api_service::presentation::api::routes::create_router(app_state)
        .layer(axum::middleware::from_fn(
            api_service::presentation::api::middleware::request_id_middleware,
        ))
        .layer(tower_http::cors::CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.server.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
