//! Input sanitization
//!
//! Untrusted request input passes through here before it reaches the
//! authentication core. String scrubbing strips rather than escapes: the
//! output contains no executable markup at all. Structured values are
//! handled by dispatching over [`serde_json::Value`] — the closed set of
//! value kinds (string, number, object, array, bool, null) — with identical
//! per-kind behavior on every level of nesting.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;
use validator::ValidateEmail;

// <script>/<style> elements are removed together with their bodies; all
// remaining tags are removed but keep their text content.
static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").unwrap());
static STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

/// Error type for sanitizer rejections
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SanitizeError {
    /// Input failed syntactic validation after scrubbing
    #[error("invalid format: {0}")]
    InvalidFormat(String),
}

/// Scrubs a string of null bytes and markup, then trims whitespace
///
/// Script and style elements disappear including their bodies; other tags
/// are stripped but their text content survives.
pub fn sanitize_string(input: &str) -> String {
    let no_nul = input.replace('\0', "");
    let no_scripts = SCRIPT_RE.replace_all(&no_nul, "");
    let no_styles = STYLE_RE.replace_all(&no_scripts, "");
    let no_tags = TAG_RE.replace_all(&no_styles, "");
    no_tags.trim().to_string()
}

/// Scrubs and validates an email address, returning its canonical form
///
/// The result is lowercased. Google-hosted addresses additionally drop dots
/// and `+tag` sub-addresses in the local part and normalize the domain to
/// `gmail.com`, so aliases of one mailbox collapse to a single identity.
///
/// # Errors
///
/// Returns [`SanitizeError::InvalidFormat`] when the scrubbed input is not
/// RFC-compliant email syntax — no best-effort value is produced.
pub fn sanitize_email(input: &str) -> Result<String, SanitizeError> {
    let cleaned = sanitize_string(input);

    if !cleaned.validate_email() {
        return Err(SanitizeError::InvalidFormat(format!(
            "not a valid email address: {:?}",
            cleaned
        )));
    }

    let lowered = cleaned.to_lowercase();
    if let Some((local, domain)) = lowered.split_once('@') {
        if domain == "gmail.com" || domain == "googlemail.com" {
            let local = local.split('+').next().unwrap_or(local).replace('.', "");
            return Ok(format!("{}@gmail.com", local));
        }
    }

    Ok(lowered)
}

/// Coerces a JSON value to a finite number
///
/// Numbers pass through; numeric strings are parsed. Anything else — and any
/// non-finite result — is an [`SanitizeError::InvalidFormat`].
pub fn sanitize_number(value: &Value) -> Result<f64, SanitizeError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(n) if n.is_finite() => Ok(n),
        _ => Err(SanitizeError::InvalidFormat(format!(
            "not a number: {}",
            value
        ))),
    }
}

/// Recursively sanitizes every string inside a JSON value
///
/// Strings are passed through [`sanitize_string`]; objects and arrays are
/// recursed into; numbers, booleans, and null are left untouched. A
/// `serde_json::Value` is always acyclic, so recursion terminates.
pub fn sanitize_object(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(sanitize_string(&s)),
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize_object).collect()),
        Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .map(|(key, field)| (key, sanitize_object(field)))
                .collect(),
        ),
        other => other,
    }
}
