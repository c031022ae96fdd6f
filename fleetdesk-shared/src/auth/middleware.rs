/// Bearer-token middleware for Axum
///
/// Wraps [`AuthService::authenticate_request`]: the middleware pulls the
/// `Authorization` header off the request, authenticates it, and inserts the
/// resulting [`Identity`] into the request extensions for handlers to
/// extract with `Extension<Identity>`.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use axum::{middleware, routing::get, Extension, Router};
/// use fleetdesk_shared::auth::{bearer_auth, AuthService};
/// use fleetdesk_shared::models::identity::Identity;
///
/// async fn whoami(Extension(identity): Extension<Identity>) -> String {
///     identity.email
/// }
///
/// fn protected(service: Arc<AuthService>) -> Router {
///     Router::new()
///         .route("/whoami", get(whoami))
///         .layer(middleware::from_fn(bearer_auth(service)))
/// }
/// ```

use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::service::{AuthError, AuthService};

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Missing credentials").into_response()
            }
            AuthError::InvalidScheme => {
                (StatusCode::UNAUTHORIZED, "Expected a Bearer token").into_response()
            }
            AuthError::TokenExpired => {
                (StatusCode::UNAUTHORIZED, "Token expired").into_response()
            }
            AuthError::TokenInvalid => {
                (StatusCode::UNAUTHORIZED, "Invalid token").into_response()
            }
            AuthError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid email or password").into_response()
            }
            AuthError::Validation(err) => {
                (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()).into_response()
            }
            AuthError::Store(_) | AuthError::Internal(_) => {
                tracing::error!("authentication failed internally: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

/// Bearer authentication middleware
///
/// On success the request gains an [`crate::models::identity::Identity`]
/// extension; on failure the typed [`AuthError`] response is returned and
/// the inner service never runs.
pub async fn bearer_auth_middleware(
    service: Arc<AuthService>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let identity = service.authenticate_request(authorization)?;

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

/// Creates a bearer authentication middleware closure
///
/// Helper that captures the service handle for `axum::middleware::from_fn`.
pub fn bearer_auth(
    service: Arc<AuthService>,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<
    Box<dyn std::future::Future<Output = Result<Response, AuthError>> + Send>,
> + Clone {
    move |req, next| {
        let service = service.clone();
        Box::pin(bearer_auth_middleware(service, req, next))
    }
}
