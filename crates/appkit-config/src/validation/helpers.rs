//! Shared helpers used by the section validators.

/// Push an error if `value` is empty or only whitespace.
pub(crate) fn validate_non_empty(errors: &mut Vec<String>, name: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(format!("{name} must not be empty"));
    }
}

/// Push an error if `value` is below `min`.
pub(crate) fn validate_min(errors: &mut Vec<String>, name: &str, value: u64, min: u64) {
    if value < min {
        errors.push(format!("{name} = {value} must be at least {min}"));
    }
}
