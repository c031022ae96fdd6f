/// Identity model
///
/// An [`Identity`] is the authenticated principal attached to a request. It
/// is loaded from the identity store (or rebuilt from verified token claims)
/// and treated as immutable for the lifetime of the request — this crate
/// never constructs one from scratch outside of those two paths.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role assigned to an identity in the back office
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full administrative access
    Admin,

    /// Fleet staff (drivers, dispatchers)
    Employee,

    /// Regular account with no staff privileges
    User,
}

impl Role {
    /// Role as its lowercase wire/storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
            Role::User => "user",
        }
    }

    /// Parses the lowercase storage representation back into a role
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Role::Admin),
            "employee" => Some(Role::Employee),
            "user" => Some(Role::User),
            _ => None,
        }
    }
}

/// Subject type embedded in token claims
///
/// Derived deterministically from role and employee number; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectType {
    Admin,
    Employee,
    User,
}

impl SubjectType {
    /// Derives the subject type for a role/employee-number combination
    ///
    /// The admin role wins regardless of any employee number; otherwise the
    /// presence of an employee number makes the subject an employee.
    pub fn derive(role: Role, employee_id: Option<i32>) -> Self {
        match role {
            Role::Admin => SubjectType::Admin,
            _ if employee_id.is_some() => SubjectType::Employee,
            _ => SubjectType::User,
        }
    }
}

/// An authenticated identity
///
/// The password hash is deliberately not part of this type — it lives in
/// [`crate::store::IdentityRecord`] and never crosses the authentication
/// boundary outward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque identity ID (UUID v4)
    pub id: Uuid,

    /// Normalized email address
    pub email: String,

    /// Assigned role
    pub role: Role,

    /// Employee number, present for fleet staff
    pub employee_id: Option<i32>,

    /// Truck currently assigned to this identity, if any
    pub truck_id: Option<i32>,
}

impl Identity {
    /// Subject type this identity carries into token claims
    pub fn subject_type(&self) -> SubjectType {
        SubjectType::derive(self.role, self.employee_id)
    }
}
