//! Identity store seam
//!
//! Persistence is an external collaborator: the auth core only ever asks it
//! two things — look an identity up by email, create one at registration.
//! [`IdentityStore`] is that contract. The Postgres implementation is what
//! production runs; the in-memory one backs tests and local tooling.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::identity::{Identity, Role};

pub mod memory;
pub mod postgres;

pub use memory::MemoryIdentityStore;
pub use postgres::PgIdentityStore;

/// Error type for identity-store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// An identity with this email already exists
    #[error("an identity with this email already exists")]
    Duplicate,

    /// A stored row could not be mapped back into an identity
    #[error("stored identity row is malformed: {0}")]
    Corrupt(String),

    /// Underlying database failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A stored identity together with its credential hash
///
/// This is the only shape in which a password hash leaves the store, and it
/// goes no further than the authentication service.
#[derive(Debug, Clone)]
pub struct IdentityRecord {
    pub identity: Identity,
    pub password_hash: String,
}

/// Input for creating a new identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewIdentity {
    /// Normalized email address (sanitize before it gets here)
    pub email: String,

    /// PHC-format credential hash (never a plaintext password)
    pub password_hash: String,

    /// Assigned role
    pub role: Role,

    /// Employee number for fleet staff
    pub employee_id: Option<i32>,

    /// Assigned truck, if any
    pub truck_id: Option<i32>,
}

/// The two operations the auth core needs from persistence
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Finds an identity and its credential hash by normalized email
    async fn find_by_email(&self, email: &str) -> Result<Option<IdentityRecord>, StoreError>;

    /// Creates a new identity
    ///
    /// Returns [`StoreError::Duplicate`] when the email is already taken.
    async fn create(&self, data: NewIdentity) -> Result<Identity, StoreError>;
}
