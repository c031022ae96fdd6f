/// Configuration management for the API server
///
/// Loads configuration from environment variables once at startup. The
/// resulting value is immutable for the process lifetime — secret rotation
/// or lifetime changes happen by restarting with new environment values.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `CORS_ORIGINS`: Comma-separated allowed origins (default: *)
/// - `PRODUCTION`: Enables HSTS and other production hardening (default: false)
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `JWT_SECRET`: Secret key for token signing (required, >= 32 chars)
/// - `JWT_ISSUER` / `JWT_AUDIENCE`: Token scoping strings
/// - `ACCESS_TOKEN_TTL_SECS` / `REFRESH_TOKEN_TTL_SECS`: Token lifetimes
/// - `TOKEN_LEEWAY_SECS`: Clock-skew tolerance for token validation
/// - `HASH_COST`: Credential-hash cost factor
/// - `PASSWORD_MIN_LENGTH`, `PASSWORD_REQUIRE_UPPERCASE`,
///   `PASSWORD_REQUIRE_LOWERCASE`, `PASSWORD_REQUIRE_NUMBERS`,
///   `PASSWORD_REQUIRE_SPECIAL_CHARS`: Password policy overrides

use std::env;
use std::str::FromStr;

use fleetdesk_shared::{auth::policy::PasswordPolicy, config::AuthConfig};

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Authentication configuration (shared with the auth core)
    pub auth: AuthConfig,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; "*" means permissive
    pub cors_origins: Vec<String>,

    /// Production mode (enables HSTS)
    pub production: bool,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing, a value fails to
    /// parse, or the signing secret is shorter than 32 characters.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = parsed_var("API_PORT", 8080u16)?;
        let production = parsed_var("PRODUCTION", false)?;

        let cors_origins: Vec<String> = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;
        let max_connections = parsed_var("DATABASE_MAX_CONNECTIONS", 10u32)?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;
        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let mut auth = AuthConfig::new(jwt_secret);
        if let Ok(issuer) = env::var("JWT_ISSUER") {
            auth.issuer = issuer;
        }
        if let Ok(audience) = env::var("JWT_AUDIENCE") {
            auth.audience = audience;
        }
        auth.access_ttl_secs = parsed_var("ACCESS_TOKEN_TTL_SECS", auth.access_ttl_secs)?;
        auth.refresh_ttl_secs = parsed_var("REFRESH_TOKEN_TTL_SECS", auth.refresh_ttl_secs)?;
        auth.leeway_secs = parsed_var("TOKEN_LEEWAY_SECS", auth.leeway_secs)?;
        auth.hash_cost = parsed_var("HASH_COST", auth.hash_cost)?;
        auth.password_policy = PasswordPolicy {
            min_length: parsed_var("PASSWORD_MIN_LENGTH", auth.password_policy.min_length)?,
            require_uppercase: parsed_var(
                "PASSWORD_REQUIRE_UPPERCASE",
                auth.password_policy.require_uppercase,
            )?,
            require_lowercase: parsed_var(
                "PASSWORD_REQUIRE_LOWERCASE",
                auth.password_policy.require_lowercase,
            )?,
            require_numbers: parsed_var(
                "PASSWORD_REQUIRE_NUMBERS",
                auth.password_policy.require_numbers,
            )?,
            require_special_chars: parsed_var(
                "PASSWORD_REQUIRE_SPECIAL_CHARS",
                auth.password_policy.require_special_chars,
            )?,
        };

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                cors_origins,
                production,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            auth,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

/// Parses an optional environment variable, falling back to a default
fn parsed_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("invalid value for {}: {}", name, e)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                cors_origins: vec!["*".to_string()],
                production: false,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/test".to_string(),
                max_connections: 10,
            },
            auth: AuthConfig::new("test-secret-key-at-least-32-bytes-long"),
        }
    }

    #[test]
    fn test_bind_address() {
        assert_eq!(test_config().bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_parsed_var_falls_back_to_default() {
        assert_eq!(
            parsed_var("FLEETDESK_TEST_UNSET_VARIABLE", 42u32).unwrap(),
            42
        );
    }
}
