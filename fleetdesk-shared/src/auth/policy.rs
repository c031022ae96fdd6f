/// Password strength policy
///
/// A [`PasswordPolicy`] is a plain configuration value, not per-user state.
/// One process-wide default exists ([`PasswordPolicy::default`]); callers may
/// construct an override.
///
/// Validation runs every applicable rule in a fixed order and reports all
/// failures together, so the caller can surface a complete field-level error
/// list in one round trip.

use serde::{Deserialize, Serialize};

/// Punctuation set accepted as "special characters"
pub const SPECIAL_CHARS: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Configurable password strength policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordPolicy {
    /// Minimum password length in characters
    pub min_length: usize,

    /// Require at least one uppercase letter
    pub require_uppercase: bool,

    /// Require at least one lowercase letter
    pub require_lowercase: bool,

    /// Require at least one decimal digit
    pub require_numbers: bool,

    /// Require at least one character from [`SPECIAL_CHARS`]
    pub require_special_chars: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            require_uppercase: true,
            require_lowercase: true,
            require_numbers: true,
            require_special_chars: true,
        }
    }
}

/// Outcome of a policy check
///
/// `valid` is true iff `errors` is empty. Error order matches rule order and
/// is stable across runs.
#[derive(Debug, Clone, Serialize)]
pub struct PolicyCheck {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl PasswordPolicy {
    /// Checks a candidate password against this policy
    ///
    /// Rules run in a fixed order — length, uppercase, lowercase, digit,
    /// special character — and no rule short-circuits the rest: every
    /// failure appends exactly one message.
    pub fn validate(&self, password: &str) -> PolicyCheck {
        let mut errors = Vec::new();

        if password.chars().count() < self.min_length {
            errors.push(format!(
                "Password must be at least {} characters long",
                self.min_length
            ));
        }

        if self.require_uppercase && !password.chars().any(|c| c.is_uppercase()) {
            errors.push("Password must contain at least one uppercase letter".to_string());
        }

        if self.require_lowercase && !password.chars().any(|c| c.is_lowercase()) {
            errors.push("Password must contain at least one lowercase letter".to_string());
        }

        if self.require_numbers && !password.chars().any(|c| c.is_ascii_digit()) {
            errors.push("Password must contain at least one digit".to_string());
        }

        if self.require_special_chars && !password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
            errors.push("Password must contain at least one special character".to_string());
        }

        PolicyCheck {
            valid: errors.is_empty(),
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_password_has_no_errors() {
        let check = PasswordPolicy::default().validate("Str0ng!Pass");

        assert!(check.valid);
        assert!(check.errors.is_empty());
    }

    #[test]
    fn test_every_failure_is_reported() {
        // Violates all five rules at once
        let check = PasswordPolicy::default().validate("");

        assert!(!check.valid);
        assert_eq!(check.errors.len(), 5);
    }

    #[test]
    fn test_error_order_is_deterministic() {
        let check = PasswordPolicy::default().validate("x");

        // length, uppercase, digit, special — lowercase is satisfied by "x"
        assert_eq!(check.errors.len(), 4);
        assert!(check.errors[0].contains("at least 8 characters"));
        assert!(check.errors[1].contains("uppercase"));
        assert!(check.errors[2].contains("digit"));
        assert!(check.errors[3].contains("special"));
    }

    #[test]
    fn test_each_rule_appends_one_message() {
        let check = PasswordPolicy::default().validate("nouppercase1!");

        assert_eq!(check.errors.len(), 1);
        assert!(check.errors[0].contains("uppercase"));
    }

    #[test]
    fn test_override_policy_relaxes_rules() {
        let policy = PasswordPolicy {
            min_length: 4,
            require_uppercase: false,
            require_lowercase: false,
            require_numbers: false,
            require_special_chars: false,
        };

        assert!(policy.validate("abcd").valid);
        assert!(!policy.validate("abc").valid);
    }

    #[test]
    fn test_special_char_set_is_fixed() {
        // A letter from outside the punctuation set does not count
        let policy = PasswordPolicy {
            min_length: 1,
            require_uppercase: false,
            require_lowercase: false,
            require_numbers: false,
            require_special_chars: true,
        };

        assert!(policy.validate("a#b").valid);
        assert!(!policy.validate("abc").valid);
    }
}
