/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /v1/auth/register` - Register a new identity
/// - `POST /v1/auth/login` - Login and get a token pair
/// - `POST /v1/auth/refresh` - Exchange a refresh token for an access token
/// - `GET  /v1/auth/me` - Echo the authenticated identity

use axum::{extract::State, Extension, Json};
use fleetdesk_shared::{
    auth::{jwt::TokenPair, password},
    models::identity::{Identity, Role},
    sanitize,
    store::{IdentityStore, NewIdentity},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};

/// Register request
///
/// Email format is checked by the sanitizer after normalization, not here —
/// the derive only caps raw input sizes.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address
    #[validate(length(max = 254, message = "Email must be at most 254 characters"))]
    pub email: String,

    /// Password (checked against the configured policy)
    #[validate(length(max = 128, message = "Password must be at most 128 characters"))]
    pub password: String,

    /// Optional role; defaults to `user`
    pub role: Option<Role>,

    /// Employee number, for fleet staff accounts
    pub employee_id: Option<i32>,

    /// Truck assignment, if already known
    pub truck_id: Option<i32>,
}

/// Register response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    /// New identity ID
    pub id: String,

    /// Normalized email the account was created with
    pub email: String,

    /// Access token
    pub access_token: String,

    /// Refresh token
    pub refresh_token: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(length(max = 254, message = "Email must be at most 254 characters"))]
    pub email: String,

    /// Password
    #[validate(length(max = 128, message = "Password must be at most 128 characters"))]
    pub password: String,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    /// Refresh token
    pub refresh_token: String,
}

/// Refresh token response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    /// New access token
    pub access_token: String,
}

/// Register a new identity
///
/// Sanitizes the email, checks the password against the configured policy
/// (all failures reported together), hashes on the blocking pool, stores the
/// identity, and returns a freshly minted token pair.
///
/// # Errors
///
/// - `422 Unprocessable Entity`: validation or policy failure
/// - `409 Conflict`: email already registered
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<RegisterResponse>> {
    req.validate().map_err(ApiError::from_validator)?;

    let email = sanitize::sanitize_email(&req.email)
        .map_err(|e| ApiError::field_error("email", e.to_string()))?;

    let check = state.config.auth.password_policy.validate(&req.password);
    if !check.valid {
        return Err(ApiError::password_policy(check.errors));
    }

    let cost = state.config.auth.hash_cost;
    let candidate = req.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || password::hash_password(&candidate, cost))
        .await
        .map_err(|e| ApiError::InternalError(format!("hashing task failed: {}", e)))??;

    let identity = state
        .store
        .create(NewIdentity {
            email,
            password_hash,
            role: req.role.unwrap_or(Role::User),
            employee_id: req.employee_id,
            truck_id: req.truck_id,
        })
        .await?;

    let access_token = state.auth.codec().issue_access_token(&identity)?;
    let refresh_token = state.auth.codec().issue_refresh_token(&identity)?;

    Ok(Json(RegisterResponse {
        id: identity.id.to_string(),
        email: identity.email,
        access_token,
        refresh_token,
    }))
}

/// Login endpoint
///
/// # Errors
///
/// - `422 Unprocessable Entity`: validation failed
/// - `401 Unauthorized`: invalid credentials (unknown email and wrong
///   password are indistinguishable)
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<TokenPair>> {
    req.validate().map_err(ApiError::from_validator)?;

    let pair = state.auth.login(&req.email, &req.password).await?;

    Ok(Json(pair))
}

/// Token refresh endpoint
///
/// # Errors
///
/// - `401 Unauthorized`: invalid or expired refresh token
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let access_token = state.auth.refresh(&req.refresh_token).await?;

    Ok(Json(RefreshResponse { access_token }))
}

/// Returns the identity authenticated by the bearer middleware
pub async fn me(Extension(identity): Extension<Identity>) -> Json<Identity> {
    Json(identity)
}
