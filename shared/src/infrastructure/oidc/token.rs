use crate::domain::entities::User;
use crate::shared::AppResult;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub aud: String,
    /// Tenant scope — `None` for root admins, who are tenant-less (§3 "User").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
}

pub struct TokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    expiration: u64,
}

impl TokenManager {
    pub fn new(secret: &str, issuer: String, expiration: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_ref()),
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
            issuer,
            expiration,
        }
    }

    pub fn generate_access_token(&self, user: &User) -> AppResult<String> {
        self.generate_access_token_with_permissions(user, "", &[])
    }

    pub fn generate_access_token_with_permissions(
        &self,
        user: &User,
        role: &str,
        permissions: &[String],
    ) -> AppResult<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.expiration as i64);

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
            aud: "healthprep".to_string(),
            tenant_id: user.tenant_id.map(|id| id.to_string()),
            role: if role.is_empty() { None } else { Some(role.to_string()) },
            permissions: if permissions.is_empty() { None } else { Some(permissions.to_vec()) },
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| crate::shared::AppError::Authentication(format!("Token generation failed: {}", e)))
    }

    pub fn generate_refresh_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now();
        let exp = now + Duration::days(7);

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
            aud: "healthprep".to_string(),
            tenant_id: user.tenant_id.map(|id| id.to_string()),
            role: None,
            permissions: None,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| crate::shared::AppError::Authentication(format!("Refresh token generation failed: {}", e)))
    }

    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&["healthprep"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| crate::shared::AppError::Authentication(format!("Token validation failed: {}", e)))?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn test_user() -> User {
        let mut user = User::new(
            "nurse@tenant.example".into(),
            "nurse1".into(),
            "hash".into(),
        );
        user.tenant_id = Some(Uuid::new_v4());
        user
    }

    #[test]
    fn round_trips_tenant_scoped_claims() {
        let manager = TokenManager::new("test-secret", "healthprep".into(), 3600);
        let user = test_user();
        let token = manager
            .generate_access_token_with_permissions(&user, "nurse", &["view_patients".to_string()])
            .unwrap();
        let claims = manager.validate_token(&token).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.tenant_id, user.tenant_id.map(|id| id.to_string()));
        assert_eq!(claims.role.as_deref(), Some("nurse"));
    }

    #[test]
    fn root_admin_token_carries_no_tenant() {
        let manager = TokenManager::new("test-secret", "healthprep".into(), 3600);
        let admin = User::new_super_user("root@system".into(), "root".into(), "hash".into());
        let token = manager.generate_access_token(&admin).unwrap();
        let claims = manager.validate_token(&token).unwrap();
        assert!(claims.tenant_id.is_none());
    }
}
