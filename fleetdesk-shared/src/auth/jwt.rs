/// Signed session tokens
///
/// Tokens are compact JWS strings (header.payload.signature) signed with
/// HS256 and bound to a fixed issuer and audience so they cannot be replayed
/// against another service. Access and refresh tokens carry the same claim
/// shape and differ only in lifetime.
///
/// # Validation
///
/// [`TokenCodec::verify`] checks, in this order: signature, issuer,
/// audience, `exp`, `nbf`. A 30-second leeway (configurable) absorbs clock
/// skew between hosts on both `exp` and `nbf`. Failures collapse into two
/// distinguishable kinds — [`TokenError::Expired`] for a well-signed token
/// past its expiry, [`TokenError::Invalid`] for everything else — so the
/// boundary layer can tell "refresh me" from "reject outright" without
/// leaking anything finer.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    config::AuthConfig,
    models::identity::{Identity, Role, SubjectType},
};

/// Error type for token operations
#[derive(Debug, Error)]
pub enum TokenError {
    /// Signature checked out but the token is past its expiry
    #[error("token has expired")]
    Expired,

    /// Bad signature, malformed structure, or issuer/audience mismatch
    #[error("invalid token")]
    Invalid,

    /// Failed to sign a new token (issuance side only)
    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Claims embedded in and protected by a signed token
///
/// The shape is identical for access and refresh tokens; the flavor is not a
/// claim, only an expiry policy chosen at issuance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject — identity ID
    pub sub: Uuid,

    /// Email address of the subject
    pub email: String,

    /// Assigned role
    pub role: Role,

    /// Subject type derived from role and employee number
    #[serde(rename = "type")]
    pub subject_type: SubjectType,

    /// Employee number, present for fleet staff
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<i32>,

    /// Assigned truck, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truck_id: Option<i32>,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Not before (Unix timestamp, equal to `iat`)
    pub nbf: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,
}

impl TokenClaims {
    fn for_identity(identity: &Identity, issuer: &str, audience: &str, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: identity.id,
            email: identity.email.clone(),
            role: identity.role,
            subject_type: identity.subject_type(),
            employee_id: identity.employee_id,
            truck_id: identity.truck_id,
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + ttl).timestamp(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
        }
    }

    /// Rebuilds the request-scoped identity these claims were minted from
    pub fn to_identity(&self) -> Identity {
        Identity {
            id: self.sub,
            email: self.email.clone(),
            role: self.role,
            employee_id: self.employee_id,
            truck_id: self.truck_id,
        }
    }
}

/// Access/refresh token pair returned by a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Token issuance and verification
///
/// Built once from [`AuthConfig`] at startup; every method is a pure
/// function of its inputs plus the captured immutable configuration, so a
/// single codec is shared freely across concurrent request handlers.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
    leeway_secs: u64,
}

impl TokenCodec {
    /// Creates a codec from configuration
    ///
    /// A secret shorter than the recommended 32 bytes is accepted but logged;
    /// length is never re-checked at verification time.
    pub fn new(config: &AuthConfig) -> Self {
        if config.jwt_secret.len() < 32 {
            tracing::warn!(
                len = config.jwt_secret.len(),
                "JWT secret is shorter than the recommended 32 bytes"
            );
        }

        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            access_ttl: Duration::seconds(config.access_ttl_secs),
            refresh_ttl: Duration::seconds(config.refresh_ttl_secs),
            leeway_secs: config.leeway_secs,
        }
    }

    /// Issues a short-lived access token for an identity
    pub fn issue_access_token(&self, identity: &Identity) -> Result<String, TokenError> {
        self.sign(TokenClaims::for_identity(
            identity,
            &self.issuer,
            &self.audience,
            self.access_ttl,
        ))
    }

    /// Issues a long-lived refresh token for an identity
    pub fn issue_refresh_token(&self, identity: &Identity) -> Result<String, TokenError> {
        self.sign(TokenClaims::for_identity(
            identity,
            &self.issuer,
            &self.audience,
            self.refresh_ttl,
        ))
    }

    fn sign(&self, claims: TokenClaims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verifies a token and returns its claims
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = self.leeway_secs;

        decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => {
                    tracing::debug!("token rejected: {}", e);
                    TokenError::Invalid
                }
            })
    }

    /// Decodes claims without verifying the signature
    ///
    /// Diagnostics only — the result MUST NOT be used to authorize anything.
    /// Returns `None` on structurally malformed input and never fails.
    pub fn decode_unverified(&self, token: &str) -> Option<TokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;

        decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)
            .ok()
            .map(|data| data.claims)
    }
}
