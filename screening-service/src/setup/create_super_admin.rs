use shared::domain::entities::User;
use shared::domain::repositories::{SetupRepository, UserRepository};
use shared::AppResult;
use bcrypt::{hash, DEFAULT_COST};

/// Creates the single root admin account (§3 "User ... Root admins are tenant-less").
/// Run once, during initial deployment, before any tenant exists.
pub struct CreateRootAdminUseCase {
    setup_repository: Box<dyn SetupRepository>,
    user_repository: Box<dyn UserRepository>,
}

impl CreateRootAdminUseCase {
    pub fn new(
        setup_repository: Box<dyn SetupRepository>,
        user_repository: Box<dyn UserRepository>,
    ) -> Self {
        Self {
            setup_repository,
            user_repository,
        }
    }

    pub async fn execute(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> AppResult<User> {
        let is_completed = self.setup_repository.is_setup_completed().await?;
        if is_completed {
            return Err(shared::shared::AppError::Validation(
                "Setup has already been completed".to_string(),
            ));
        }

        if email.trim().is_empty() || !email.contains('@') {
            return Err(shared::shared::AppError::Validation(
                "Invalid email address".to_string(),
            ));
        }

        if username.trim().is_empty() {
            return Err(shared::shared::AppError::Validation(
                "Username cannot be empty".to_string(),
            ));
        }

        if password.len() < 8 {
            return Err(shared::shared::AppError::Validation(
                "Password must be at least 8 characters long".to_string(),
            ));
        }

        if self.user_repository.find_by_email(email).await?.is_some() {
            return Err(shared::shared::AppError::Conflict(
                "User with this email already exists".to_string(),
            ));
        }

        if self.user_repository.find_by_username(username).await?.is_some() {
            return Err(shared::shared::AppError::Conflict(
                "User with this username already exists".to_string(),
            ));
        }

        let password_hash = hash(password, DEFAULT_COST)
            .map_err(|e| shared::shared::AppError::Internal(format!("Failed to hash password: {}", e)))?;

        // Root admins are tenant-less (§3 "User"): tenant_id stays None.
        let user = User::new_super_user(email.to_string(), username.to_string(), password_hash);
        let created_user = self.user_repository.create(user).await?;

        self.setup_repository
            .mark_setup_completed(Some(created_user.id))
            .await?;

        Ok(created_user)
    }
}
