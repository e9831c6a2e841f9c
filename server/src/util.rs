//! Small helpers shared by the submission workflows and the record store.

/// Trim an optional form value, mapping blank input to `None`.
///
/// Optional fields are stored as null when absent, never as empty strings.
pub fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Check an email address against the simple shape
/// `non-whitespace@non-whitespace.non-whitespace`.
///
/// This is intentionally loose: the relay bounces anything undeliverable.
pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() {
        return false;
    }

    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}
