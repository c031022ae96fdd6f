/// Shared data models for FleetDesk
///
/// # Models
///
/// - `identity`: authenticated identities, their roles, and the subject type
///   derived from them for token claims

pub mod identity;

pub use identity::{Identity, Role, SubjectType};
