/// Credential hashing using Argon2id
///
/// Hashes are emitted in PHC string format, so the algorithm, version,
/// parameters, and salt are embedded in the stored value. Verification reads
/// the parameters back out of the hash — historical hashes keep verifying
/// after the default cost factor changes.
///
/// The cost factor is the log2 of the Argon2id memory cost in KiB: the
/// default of 16 yields m=65536 (64 MiB) with t=3 iterations and p=4 lanes.
///
/// Hashing is the one computationally expensive operation in this crate.
/// Async callers must run both [`hash_password`] and [`verify_password`]
/// under `tokio::task::spawn_blocking` and hold no locks across the call.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};
use thiserror::Error;

/// Default cost factor (m=65536 KiB, 64 MiB)
pub const DEFAULT_COST: u32 = 16;

/// Fixed iteration count
const TIME_COST: u32 = 3;

/// Fixed parallelism
const LANES: u32 = 4;

/// Lowest accepted cost factor (m=4096 KiB)
const MIN_COST: u32 = 12;

/// Highest accepted cost factor (m=4 GiB)
const MAX_COST: u32 = 22;

/// Error type for credential hashing
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Cost factor outside the supported range
    #[error("unsupported cost factor {0}, expected 12..=22")]
    CostOutOfRange(u32),

    /// Failed to hash password
    #[error("failed to hash password: {0}")]
    Hash(String),
}

/// Hashes a password at the given cost factor
///
/// # Arguments
///
/// * `password` - The plaintext password to hash
/// * `cost` - log2 of the Argon2id memory cost in KiB (see [`DEFAULT_COST`])
///
/// # Returns
///
/// PHC string format hash, e.g.
///
/// ```text
/// $argon2id$v=19$m=65536,t=3,p=4$c2FsdHNhbHRzYWx0$hash...
/// ```
pub fn hash_password(password: &str, cost: u32) -> Result<String, PasswordError> {
    if !(MIN_COST..=MAX_COST).contains(&cost) {
        return Err(PasswordError::CostOutOfRange(cost));
    }

    let salt = SaltString::generate(&mut OsRng);

    let params = ParamsBuilder::new()
        .m_cost(1u32 << cost)
        .t_cost(TIME_COST)
        .p_cost(LANES)
        .output_len(32)
        .build()
        .map_err(|e| PasswordError::Hash(format!("invalid parameters: {}", e)))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hash(format!("hash generation failed: {}", e)))?;

    Ok(password_hash.to_string())
}

/// Verifies a password against a stored hash
///
/// Comparison is constant-time with respect to the candidate password
/// (delegated to the argon2 primitive). This function never fails: a
/// malformed or truncated stored hash yields `false`, the same as a wrong
/// password.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let parsed = match PasswordHash::new(stored) {
        Ok(parsed) => parsed,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Cost 12 (m=4096) keeps the test suite fast; the parameters still
    // round-trip through the PHC string exactly like the default cost.
    const TEST_COST: u32 = 12;

    #[test]
    fn test_hash_embeds_parameters() {
        let hash = hash_password("fleet_pass_123", TEST_COST).unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("v=19"));
        assert!(hash.contains("m=4096"));
        assert!(hash.contains("t=3"));
        assert!(hash.contains("p=4"));
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct_password", TEST_COST).unwrap();

        assert!(verify_password("correct_password", &hash));
        assert!(!verify_password("wrong_password", &hash));
        assert!(!verify_password("", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let hash1 = hash_password("same_password", TEST_COST).unwrap();
        let hash2 = hash_password("same_password", TEST_COST).unwrap();

        assert_ne!(hash1, hash2);
        assert!(verify_password("same_password", &hash1));
        assert!(verify_password("same_password", &hash2));
    }

    #[test]
    fn test_old_cost_factor_still_verifies() {
        // A hash produced at one cost verifies after the default changes:
        // the parameters ride along inside the PHC string.
        let old = hash_password("rotating-costs", TEST_COST).unwrap();
        let new = hash_password("rotating-costs", TEST_COST + 1).unwrap();

        assert!(verify_password("rotating-costs", &old));
        assert!(verify_password("rotating-costs", &new));
        assert!(old.contains("m=4096"));
        assert!(new.contains("m=8192"));
    }

    #[test]
    fn test_malformed_hash_returns_false() {
        assert!(!verify_password("password", ""));
        assert!(!verify_password("password", "not-a-phc-string"));
        assert!(!verify_password("password", "$argon2id$truncated"));
        assert!(!verify_password("password", "$2b$12$bcrypt-shaped-garbage"));
    }

    #[test]
    fn test_cost_out_of_range() {
        assert!(matches!(
            hash_password("p", 5),
            Err(PasswordError::CostOutOfRange(5))
        ));
        assert!(matches!(
            hash_password("p", 30),
            Err(PasswordError::CostOutOfRange(30))
        ));
    }

    #[test]
    fn test_unicode_passwords_round_trip() {
        for password in ["with spaces", "пароль-密码", "véry_løng_ünicode_passphrase_1234"] {
            let hash = hash_password(password, TEST_COST).unwrap();
            assert!(verify_password(password, &hash), "password {:?}", password);
        }
    }
}
