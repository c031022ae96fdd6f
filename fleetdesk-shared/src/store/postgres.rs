/// Postgres identity store
///
/// # Schema
///
/// ```sql
/// CREATE TABLE identities (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email CITEXT NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     role TEXT NOT NULL DEFAULT 'user',
///     employee_id INTEGER,
///     truck_id INTEGER,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::identity::{Identity, Role};

use super::{IdentityRecord, IdentityStore, NewIdentity, StoreError};

type IdentityRow = (Uuid, String, String, Option<i32>, Option<i32>, String);

/// Identity store backed by a Postgres connection pool
pub struct PgIdentityStore {
    pool: PgPool,
}

impl PgIdentityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn record_from_row(
    (id, email, role, employee_id, truck_id, password_hash): IdentityRow,
) -> Result<IdentityRecord, StoreError> {
    let role = Role::parse(&role)
        .ok_or_else(|| StoreError::Corrupt(format!("unknown role {:?}", role)))?;

    Ok(IdentityRecord {
        identity: Identity {
            id,
            email,
            role,
            employee_id,
            truck_id,
        },
        password_hash,
    })
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<IdentityRecord>, StoreError> {
        let row: Option<IdentityRow> = sqlx::query_as(
            r#"
            SELECT id, email, role, employee_id, truck_id, password_hash
            FROM identities
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(record_from_row).transpose()
    }

    async fn create(&self, data: NewIdentity) -> Result<Identity, StoreError> {
        let row: IdentityRow = sqlx::query_as(
            r#"
            INSERT INTO identities (email, password_hash, role, employee_id, truck_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, role, employee_id, truck_id, password_hash
            "#,
        )
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(data.role.as_str())
        .bind(data.employee_id)
        .bind(data.truck_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err)
                if db_err.constraint().is_some_and(|c| c.contains("email")) =>
            {
                StoreError::Duplicate
            }
            _ => StoreError::Database(e),
        })?;

        Ok(record_from_row(row)?.identity)
    }
}
