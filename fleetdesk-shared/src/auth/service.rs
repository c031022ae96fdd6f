/// Authentication service
///
/// Composes the sanitizer, credential hasher, and token codec into the three
/// flows the rest of the service calls: login, refresh, and request
/// authentication. Stateless apart from the immutable codec configuration
/// and the shared store handle — concurrent logins are fully independent,
/// and dropping an in-flight call commits nothing.

use std::sync::Arc;

use thiserror::Error;

use crate::{
    config::AuthConfig,
    models::identity::Identity,
    sanitize::{sanitize_email, SanitizeError},
    store::{IdentityStore, StoreError},
};

use super::{
    jwt::{TokenCodec, TokenError, TokenPair},
    password,
};

// Argon2id hash of a throwaway password. A login against an unknown email
// verifies against this so it burns the same hash cost as a wrong password.
const DECOY_HASH: &str =
    "$argon2id$v=19$m=65536,t=3,p=4$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Error type for authentication flows
///
/// Expired and invalid tokens stay distinguishable (the boundary reacts
/// differently), but nothing finer leaks: wrong password and unknown email
/// collapse into one [`AuthError::InvalidCredentials`].
#[derive(Debug, Error)]
pub enum AuthError {
    /// No Authorization header on the request
    #[error("missing credentials")]
    MissingCredentials,

    /// Authorization header present but not a Bearer scheme
    #[error("expected a Bearer token")]
    InvalidScheme,

    /// Well-signed token past its expiry — recoverable via refresh
    #[error("token has expired")]
    TokenExpired,

    /// Forged, corrupt, or mis-scoped token — not recoverable
    #[error("invalid token")]
    TokenInvalid,

    /// Wrong password or unknown identity (deliberately indistinguishable)
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Input failed sanitization
    #[error(transparent)]
    Validation(#[from] SanitizeError),

    /// Identity store failure
    #[error("identity store failure: {0}")]
    Store(#[from] StoreError),

    /// Internal failure (signing, task join)
    #[error("internal auth failure: {0}")]
    Internal(String),
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AuthError::TokenExpired,
            TokenError::Invalid => AuthError::TokenInvalid,
            TokenError::Signing(msg) => AuthError::Internal(msg),
        }
    }
}

/// Login, refresh, and request-authentication orchestration
pub struct AuthService {
    codec: TokenCodec,
    store: Arc<dyn IdentityStore>,
}

impl AuthService {
    /// Creates the service from configuration and a store handle
    pub fn new(config: &AuthConfig, store: Arc<dyn IdentityStore>) -> Self {
        Self {
            codec: TokenCodec::new(config),
            store,
        }
    }

    /// The token codec this service signs and verifies with
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Authenticates an email/password pair and mints a token pair
    ///
    /// The password check runs on the blocking pool; no lock is held across
    /// it and cancellation mid-flight has no side effect.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AuthError> {
        let email = sanitize_email(email)?;

        let record = self.store.find_by_email(&email).await?;

        let (identity, stored_hash) = match record {
            Some(record) => (Some(record.identity), record.password_hash),
            None => (None, DECOY_HASH.to_string()),
        };

        let candidate = password.to_owned();
        let matched =
            tokio::task::spawn_blocking(move || password::verify_password(&candidate, &stored_hash))
                .await
                .map_err(|e| AuthError::Internal(format!("hash verification task failed: {}", e)))?;

        let identity = match (identity, matched) {
            (Some(identity), true) => identity,
            _ => return Err(AuthError::InvalidCredentials),
        };

        Ok(TokenPair {
            access_token: self.codec.issue_access_token(&identity)?,
            refresh_token: self.codec.issue_refresh_token(&identity)?,
        })
    }

    /// Exchanges a valid refresh token for a new access token
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, AuthError> {
        let claims = self.codec.verify(refresh_token)?;
        let identity = claims.to_identity();

        Ok(self.codec.issue_access_token(&identity)?)
    }

    /// Authenticates the bearer token from an Authorization header value
    ///
    /// Returns the request-scoped identity on success. Absent header and
    /// non-Bearer schemes are rejected before any token parsing happens.
    pub fn authenticate_request(&self, authorization: Option<&str>) -> Result<Identity, AuthError> {
        let header = authorization.ok_or(AuthError::MissingCredentials)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidScheme)?;

        let claims = self.codec.verify(token)?;

        Ok(claims.to_identity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::identity::{Role, SubjectType};
    use crate::store::{MemoryIdentityStore, NewIdentity};

    const TEST_PASSWORD: &str = "Depot!Pass1";

    fn test_config() -> AuthConfig {
        let mut config = AuthConfig::new("test-secret-key-at-least-32-bytes-long");
        config.hash_cost = 12;
        config
    }

    async fn service_with_user(config: &AuthConfig) -> AuthService {
        let store = Arc::new(MemoryIdentityStore::new());
        store
            .create(NewIdentity {
                email: "driver@example.com".to_string(),
                password_hash: password::hash_password(TEST_PASSWORD, config.hash_cost).unwrap(),
                role: Role::Employee,
                employee_id: Some(1204),
                truck_id: Some(17),
            })
            .await
            .unwrap();

        AuthService::new(config, store)
    }

    #[tokio::test]
    async fn test_login_mints_verifiable_pair() {
        let config = test_config();
        let service = service_with_user(&config).await;

        let pair = service.login("driver@example.com", TEST_PASSWORD).await.unwrap();

        let claims = service.codec().verify(&pair.access_token).unwrap();
        assert_eq!(claims.email, "driver@example.com");
        assert_eq!(claims.subject_type, SubjectType::Employee);
        assert!(service.codec().verify(&pair.refresh_token).is_ok());
    }

    #[tokio::test]
    async fn test_login_normalizes_email_first() {
        let config = test_config();
        let service = service_with_user(&config).await;

        let pair = service.login("  Driver@Example.COM ", TEST_PASSWORD).await;

        assert!(pair.is_ok());
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_look_the_same() {
        let config = test_config();
        let service = service_with_user(&config).await;

        let wrong_password = service.login("driver@example.com", "Wrong!Pass1").await;
        let unknown_email = service.login("ghost@example.com", TEST_PASSWORD).await;

        assert!(matches!(wrong_password, Err(AuthError::InvalidCredentials)));
        assert!(matches!(unknown_email, Err(AuthError::InvalidCredentials)));
        assert_eq!(
            wrong_password.unwrap_err().to_string(),
            unknown_email.unwrap_err().to_string()
        );
    }

    #[tokio::test]
    async fn test_malformed_login_email_is_a_validation_error() {
        let config = test_config();
        let service = service_with_user(&config).await;

        let result = service.login("not-an-email", TEST_PASSWORD).await;

        assert!(matches!(result, Err(AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn test_refresh_issues_new_access_token() {
        let config = test_config();
        let service = service_with_user(&config).await;

        let pair = service.login("driver@example.com", TEST_PASSWORD).await.unwrap();
        let access_token = service.refresh(&pair.refresh_token).await.unwrap();

        let claims = service.codec().verify(&access_token).unwrap();
        assert_eq!(claims.email, "driver@example.com");
        assert_eq!(claims.employee_id, Some(1204));
    }

    #[tokio::test]
    async fn test_refresh_rejects_garbage() {
        let config = test_config();
        let service = service_with_user(&config).await;

        assert!(matches!(
            service.refresh("garbage").await,
            Err(AuthError::TokenInvalid)
        ));
    }

    #[tokio::test]
    async fn test_authenticate_request_happy_path() {
        let config = test_config();
        let service = service_with_user(&config).await;

        let pair = service.login("driver@example.com", TEST_PASSWORD).await.unwrap();
        let header = format!("Bearer {}", pair.access_token);

        let identity = service.authenticate_request(Some(&header)).unwrap();

        assert_eq!(identity.email, "driver@example.com");
        assert_eq!(identity.truck_id, Some(17));
    }

    #[tokio::test]
    async fn test_authenticate_request_rejects_missing_and_malformed() {
        let config = test_config();
        let service = service_with_user(&config).await;

        assert!(matches!(
            service.authenticate_request(None),
            Err(AuthError::MissingCredentials)
        ));
        assert!(matches!(
            service.authenticate_request(Some("Basic dXNlcjpwYXNz")),
            Err(AuthError::InvalidScheme)
        ));
        assert!(matches!(
            service.authenticate_request(Some("Bearer garbage")),
            Err(AuthError::TokenInvalid)
        ));
    }

    #[tokio::test]
    async fn test_expired_token_is_reported_as_expired() {
        let mut config = test_config();
        config.access_ttl_secs = -3600;
        config.leeway_secs = 0;
        let service = service_with_user(&config).await;

        let pair = service.login("driver@example.com", TEST_PASSWORD).await.unwrap();
        let header = format!("Bearer {}", pair.access_token);

        assert!(matches!(
            service.authenticate_request(Some(&header)),
            Err(AuthError::TokenExpired)
        ));
    }
}
