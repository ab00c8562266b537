use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer};

use crate::error::FieldErrors;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Checks a required field's presence and length (in characters), returning the
/// trimmed value when it passes.
pub(crate) fn required_len(
    errors: &mut FieldErrors,
    field: &'static str,
    value: Option<&str>,
    min: usize,
    max: usize,
) -> Option<String> {
    let value = value.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        errors.add(field, "This field is required.");
        return None;
    }
    let len = value.chars().count();
    if len < min || len > max {
        errors.add(
            field,
            format!("Field must be between {} and {} characters long.", min, max),
        );
        return None;
    }
    Some(value.to_string())
}

/// Like `required_len`, but secrets are taken verbatim, surrounding spaces included.
pub(crate) fn required_secret(
    errors: &mut FieldErrors,
    field: &'static str,
    value: Option<&str>,
    min: usize,
    max: usize,
) -> Option<String> {
    let value = value.unwrap_or_default();
    if value.is_empty() {
        errors.add(field, "This field is required.");
        return None;
    }
    let len = value.chars().count();
    if len < min || len > max {
        errors.add(
            field,
            format!("Field must be between {} and {} characters long.", min, max),
        );
        return None;
    }
    Some(value.to_string())
}

/// HTML checkboxes are either absent or carry a truthy marker such as `y` or `on`.
pub(crate) fn checkbox<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(matches!(
        raw.as_deref().map(str::to_ascii_lowercase).as_deref(),
        Some("y" | "yes" | "on" | "true" | "1")
    ))
}
