//! Outbound header composition
//!
//! Header names are lower-cased on insertion so lookups and overrides never need
//! case-insensitive scans. Conversion to a transport `HeaderMap` happens once, at dispatch.

use std::collections::BTreeMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use super::error::ApiError;

pub const API_KEY_HEADER: &str = "x-api-key";
pub const CONTENT_TYPE_HEADER: &str = "content-type";
pub const USER_AGENT_HEADER: &str = "user-agent";

/// Headers owned by the transport; callers can never set them.
pub const TRANSPORT_MANAGED_HEADERS: [&str; 6] = [
    "content-length",
    "transfer-encoding",
    "connection",
    "host",
    "accept-encoding",
    "keep-alive",
];

pub const CLIENT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet {
    entries: BTreeMap<String, String>,
}

impl HeaderSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.entries.insert(name.to_ascii_lowercase(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn to_header_map(&self) -> Result<HeaderMap, ApiError> {
        let mut map = HeaderMap::with_capacity(self.entries.len());
        for (name, value) in &self.entries {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ApiError::InvalidRequest(format!("invalid header name `{name}`")))?;
            let header_value = HeaderValue::from_str(value).map_err(|_| {
                ApiError::InvalidRequest(format!("invalid value for header `{name}`"))
            })?;
            map.insert(header_name, header_value);
        }
        Ok(map)
    }
}

pub fn is_transport_managed(name: &str) -> bool {
    TRANSPORT_MANAGED_HEADERS
        .iter()
        .any(|managed| managed.eq_ignore_ascii_case(name.trim()))
}

/// Appends this client's identity to a caller-supplied agent chain.
pub fn compose_user_agent(extra_headers: &[(String, String)]) -> String {
    let existing = extra_headers
        .iter()
        .find(|(name, _)| name.trim().eq_ignore_ascii_case(USER_AGENT_HEADER))
        .map(|(_, value)| value.as_str());

    match existing {
        Some(agent) => format!("{agent}/{CLIENT_USER_AGENT}"),
        None => CLIENT_USER_AGENT.to_string(),
    }
}

/// Builds the final header set.
///
/// `body_content_type` is `Some` only when a body will be sent; without a body no
/// content type is emitted at all, not even one supplied by the caller.
///
/// Precedence, later wins: content type, caller extras minus the transport-managed
/// names, the API key, the composed user agent.
pub fn compose_headers(
    body_content_type: Option<&str>,
    extra_headers: &[(String, String)],
    api_key: &str,
) -> HeaderSet {
    let mut headers = HeaderSet::new();

    if let Some(content_type) = body_content_type {
        headers.insert(CONTENT_TYPE_HEADER, content_type);
    }

    for (name, value) in extra_headers {
        let name = name.trim();
        if name.is_empty() || is_transport_managed(name) {
            continue;
        }
        if body_content_type.is_none() && name.eq_ignore_ascii_case(CONTENT_TYPE_HEADER) {
            continue;
        }
        headers.insert(name, value.clone());
    }

    headers.insert(API_KEY_HEADER, api_key);
    headers.insert(USER_AGENT_HEADER, compose_user_agent(extra_headers));
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extras(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn strips_transport_managed_headers_for_any_casing() {
        let headers = compose_headers(
            None,
            &extras(&[
                ("Content-Length", "999"),
                ("TRANSFER-ENCODING", "chunked"),
                ("Connection", "close"),
                ("hOsT", "evil.example"),
                ("Accept-Encoding", "br"),
                ("Keep-Alive", "timeout=5"),
                ("X-Custom", "v"),
            ]),
            "key",
        );

        assert_eq!(headers.get("x-custom"), Some("v"));
        for name in TRANSPORT_MANAGED_HEADERS {
            assert!(!headers.contains(name), "{name} should be stripped");
        }
    }

    #[test]
    fn api_key_and_user_agent_win_over_caller_values() {
        let headers = compose_headers(
            None,
            &extras(&[("X-Api-Key", "attacker-supplied"), ("User-Agent", "caller/1.0")]),
            "resolved-key",
        );

        assert_eq!(headers.get(API_KEY_HEADER), Some("resolved-key"));
        assert_eq!(
            headers.get(USER_AGENT_HEADER),
            Some(format!("caller/1.0/{CLIENT_USER_AGENT}").as_str())
        );
    }

    #[test]
    fn default_user_agent_is_client_identity() {
        assert_eq!(compose_user_agent(&[]), CLIENT_USER_AGENT);
        assert!(CLIENT_USER_AGENT.starts_with("postman-mcp/"));
    }

    #[test]
    fn caller_may_override_content_type() {
        let headers = compose_headers(
            Some("application/json"),
            &extras(&[("Content-Type", "text/plain")]),
            "key",
        );

        assert_eq!(headers.get(CONTENT_TYPE_HEADER), Some("text/plain"));
        assert_eq!(headers.len(), 3);
    }

    #[test]
    fn no_content_type_without_body() {
        let headers = compose_headers(None, &extras(&[("content-type", "text/plain")]), "key");

        assert!(!headers.contains(CONTENT_TYPE_HEADER));
    }

    #[test]
    fn header_map_rejects_invalid_values() {
        let mut headers = HeaderSet::new();
        headers.insert("x-bad", "line\nbreak");

        let error = headers.to_header_map().expect_err("newline must be rejected");
        assert!(error.to_string().contains("x-bad"));
    }
}
