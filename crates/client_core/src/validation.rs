use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidationError;

/// local-part `@` domain `.` tld, with no whitespace and a single `@`.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Checks the editable fields of a user before submission.
///
/// Emptiness is judged on the trimmed values; the address pattern is matched
/// against the email exactly as typed.
pub fn validate(name: &str, email: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() || email.trim().is_empty() {
        return Err(ValidationError::MissingFields);
    }

    if !EMAIL_PATTERN.is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(())
}
