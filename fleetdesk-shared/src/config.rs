/// Authentication configuration
///
/// A single immutable [`AuthConfig`] value is built at process start and
/// shared (behind `Arc`) with every component that signs, verifies, or
/// hashes. There is no runtime write path: rotating the secret or changing a
/// lifetime means restarting the process with new environment values.

use crate::auth::policy::PasswordPolicy;

/// Default access-token lifetime: 24 hours
pub const DEFAULT_ACCESS_TTL_SECS: i64 = 86_400;

/// Default refresh-token lifetime: 7 days
pub const DEFAULT_REFRESH_TTL_SECS: i64 = 604_800;

/// Default clock-skew tolerance applied to `exp`/`nbf` checks
pub const DEFAULT_LEEWAY_SECS: u64 = 30;

/// Immutable authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC signing secret; at least 32 bytes recommended
    pub jwt_secret: String,

    /// Issuer string bound into every token
    pub issuer: String,

    /// Audience string bound into every token
    pub audience: String,

    /// Access-token lifetime in seconds
    pub access_ttl_secs: i64,

    /// Refresh-token lifetime in seconds
    pub refresh_ttl_secs: i64,

    /// Clock-skew tolerance in seconds for `exp`/`nbf` validation
    pub leeway_secs: u64,

    /// Credential-hash cost factor (log2 of Argon2id memory in KiB)
    pub hash_cost: u32,

    /// Process-wide default password policy
    pub password_policy: PasswordPolicy,
}

impl AuthConfig {
    /// Creates a configuration with the given secret and FleetDesk defaults
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            issuer: "fleetdesk".to_string(),
            audience: "fleetdesk-backoffice".to_string(),
            access_ttl_secs: DEFAULT_ACCESS_TTL_SECS,
            refresh_ttl_secs: DEFAULT_REFRESH_TTL_SECS,
            leeway_secs: DEFAULT_LEEWAY_SECS,
            hash_cost: crate::auth::password::DEFAULT_COST,
            password_policy: PasswordPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::new("test-secret-key-at-least-32-bytes-long");

        assert_eq!(config.issuer, "fleetdesk");
        assert_eq!(config.audience, "fleetdesk-backoffice");
        assert_eq!(config.access_ttl_secs, 86_400);
        assert_eq!(config.refresh_ttl_secs, 604_800);
        assert_eq!(config.leeway_secs, 30);
        assert!(config.password_policy.require_uppercase);
    }
}
