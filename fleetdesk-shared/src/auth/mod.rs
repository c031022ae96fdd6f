//! Authentication and credential-management core
//!
//! # Modules
//!
//! - [`policy`]: configurable password strength policy
//! - [`password`]: Argon2id credential hashing and verification
//! - [`jwt`]: signed token issuance and verification
//! - [`service`]: login / refresh / request-authentication orchestration
//! - [`middleware`]: Axum bearer-token middleware over the service
//!
//! # Security Features
//!
//! - **Password Hashing**: Argon2id with a tunable, self-describing cost
//!   factor embedded in every stored hash
//! - **Tokens**: HS256-signed claim sets bound to a fixed issuer/audience
//! - **Constant-time Verification**: delegated to the argon2 primitive
//! - **Enumeration Resistance**: unknown email and wrong password are
//!   indistinguishable to callers

pub mod jwt;
pub mod middleware;
pub mod password;
pub mod policy;
pub mod service;

pub use jwt::{TokenClaims, TokenCodec, TokenError, TokenPair};
pub use middleware::bearer_auth;
pub use policy::{PasswordPolicy, PolicyCheck};
pub use service::{AuthError, AuthService};
