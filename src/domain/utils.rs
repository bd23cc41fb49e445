//! Shared argument validation and endpoint building for tool handlers

use serde_json::{Map, Value};
use url::form_urlencoded;

use crate::errors::AppError;

pub const MAX_PAGE_LIMIT: u32 = 1_000;

/// Validates an identifier that is interpolated into a single path segment.
pub fn path_id(field: &'static str, value: &str) -> Result<String, AppError> {
    let normalized = value.trim();
    if normalized.is_empty() {
        return Err(AppError::bad_request(
            "invalid_identifier",
            format!("{field} must not be empty"),
        ));
    }

    if normalized
        .chars()
        .any(|character| is_reserved_in_path(character) || character == '/')
    {
        return Err(AppError::bad_request(
            "invalid_identifier",
            format!("{field} must not contain '/', '?', '#', '%' or whitespace"),
        ));
    }

    Ok(normalized.to_string())
}

/// Validates a relative file path such as `components/schemas.yaml`.
pub fn file_path(field: &'static str, value: &str) -> Result<String, AppError> {
    let normalized = value.trim().trim_start_matches('/');
    let invalid = normalized.is_empty()
        || normalized.chars().any(is_reserved_in_path)
        || normalized
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..");

    if invalid {
        return Err(AppError::bad_request(
            "invalid_file_path",
            format!("{field} must be a relative path without empty, '.' or '..' segments"),
        ));
    }

    Ok(normalized.to_string())
}

fn is_reserved_in_path(character: char) -> bool {
    matches!(character, '?' | '#' | '%') || character.is_whitespace() || character.is_control()
}

pub fn page_limit(limit: Option<u32>) -> Result<Option<u32>, AppError> {
    match limit {
        Some(0) => Err(AppError::bad_request(
            "invalid_limit",
            format!("limit must be between 1 and {MAX_PAGE_LIMIT}"),
        )),
        Some(value) if value > MAX_PAGE_LIMIT => Err(AppError::bad_request(
            "invalid_limit",
            format!("limit must be between 1 and {MAX_PAGE_LIMIT}"),
        )),
        other => Ok(other),
    }
}

/// Restricts a free-form argument to a fixed set of values, case-insensitively.
pub fn one_of(
    field: &'static str,
    value: Option<String>,
    allowed: &[&str],
) -> Result<Option<String>, AppError> {
    let Some(value) = value else {
        return Ok(None);
    };

    let normalized = value.trim();
    match allowed
        .iter()
        .find(|candidate| candidate.eq_ignore_ascii_case(normalized))
    {
        Some(candidate) => Ok(Some(candidate.to_string())),
        None => Err(AppError::bad_request(
            "invalid_enum_value",
            format!("{field} must be one of: {}", allowed.join(", ")),
        )),
    }
}

pub fn required_text(field: &'static str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::bad_request(
            "missing_field",
            format!("{field} must not be empty"),
        ));
    }
    Ok(trimmed.to_string())
}

pub fn require_changes(update: &Value, fields: &str) -> Result<(), AppError> {
    if update.as_object().is_some_and(|map| map.is_empty()) {
        return Err(AppError::bad_request(
            "empty_update",
            format!("at least one of {fields} must be provided"),
        ));
    }
    Ok(())
}

/// Builds a JSON object from the entries that are present.
pub fn object<const N: usize>(entries: [(&str, Option<Value>); N]) -> Value {
    Value::Object(
        entries
            .into_iter()
            .filter_map(|(key, value)| value.map(|value| (key.to_string(), value)))
            .collect::<Map<String, Value>>(),
    )
}

/// Parses an argument that carries a JSON document as text.
pub fn json_payload(field: &'static str, raw: &str) -> Result<Value, AppError> {
    serde_json::from_str(raw).map_err(|err| {
        AppError::bad_request("invalid_json", format!("{field} must be valid JSON: {err}"))
    })
}

pub fn json_object_payload(field: &'static str, raw: &str) -> Result<Value, AppError> {
    let value = json_payload(field, raw)?;
    if !value.is_object() {
        return Err(AppError::bad_request(
            "invalid_json",
            format!("{field} must be a JSON object"),
        ));
    }
    Ok(value)
}

pub fn json_array_payload(field: &'static str, raw: &str) -> Result<Value, AppError> {
    let value = json_payload(field, raw)?;
    if !value.is_array() {
        return Err(AppError::bad_request(
            "invalid_json",
            format!("{field} must be a JSON array"),
        ));
    }
    Ok(value)
}

/// Appends URL-encoded query parameters to a path, skipping absent values.
#[derive(Debug, Clone)]
pub struct Endpoint {
    path: String,
    query: Vec<(&'static str, String)>,
}

impl Endpoint {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    pub fn query(mut self, key: &'static str, value: Option<impl ToString>) -> Self {
        if let Some(value) = value {
            let value = value.to_string();
            let value = value.trim();
            if !value.is_empty() {
                self.query.push((key, value.to_string()));
            }
        }
        self
    }

    pub fn build(self) -> String {
        if self.query.is_empty() {
            return self.path;
        }

        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query)
            .finish();
        format!("{}?{query}", self.path)
    }
}
