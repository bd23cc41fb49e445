use std::{env, net::SocketAddr};

use thiserror::Error;
use url::Url;

use crate::postman_client::{API_KEY_ENV, BASE_URL_ENV, DEFAULT_BASE_URL};

#[derive(Debug, Clone)]
pub struct Config {
    pub mcp_token: String,
    pub bind_addr: String,
    pub bind_port: u16,
    pub postman_api_key: Option<String>,
    pub postman_base_url: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("MCP_API_TOKEN is required and must not be empty")]
    MissingMcpToken,
    #[error("BIND_PORT must be a valid u16")]
    InvalidPort,
    #[error("invalid bind address or port")]
    InvalidSocket,
    #[error("POSTMAN_API_BASE_URL must be an absolute http(s) URL")]
    InvalidBaseUrl,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mcp_token = non_empty_var("MCP_API_TOKEN").ok_or(ConfigError::MissingMcpToken)?;

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
        let bind_port = env::var("BIND_PORT")
            .ok()
            .map(|value| value.parse::<u16>().map_err(|_| ConfigError::InvalidPort))
            .transpose()?
            .unwrap_or(8080);

        let postman_base_url = non_empty_var(BASE_URL_ENV)
            .map(|value| validate_base_url(&value))
            .transpose()?
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let config = Self {
            mcp_token,
            bind_addr,
            bind_port,
            postman_api_key: non_empty_var(API_KEY_ENV),
            postman_base_url,
        };

        let _ = config.bind_socket()?;
        Ok(config)
    }

    pub fn bind_socket(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.bind_port)
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidSocket)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn validate_base_url(value: &str) -> Result<String, ConfigError> {
    let parsed = Url::parse(value).map_err(|_| ConfigError::InvalidBaseUrl)?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(ConfigError::InvalidBaseUrl);
    }

    Ok(value.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use std::sync::{Mutex, MutexGuard, PoisonError};

    use super::*;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_guard() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[test]
    fn parse_defaults() {
        let _guard = env_guard();
        env::set_var("MCP_API_TOKEN", "abc");
        env::remove_var("BIND_ADDR");
        env::remove_var("BIND_PORT");
        env::remove_var(BASE_URL_ENV);

        let config = Config::from_env().expect("config should parse");
        assert_eq!(config.bind_addr, "127.0.0.1");
        assert_eq!(config.bind_port, 8080);
        assert_eq!(config.postman_base_url, "https://api.postman.com");
    }

    #[test]
    fn missing_token_fails() {
        let _guard = env_guard();
        env::remove_var("MCP_API_TOKEN");

        let err = Config::from_env().expect_err("expected missing token error");
        assert!(matches!(err, ConfigError::MissingMcpToken));
    }

    #[test]
    fn base_url_override_is_normalized() {
        let _guard = env_guard();
        env::set_var("MCP_API_TOKEN", "abc");
        env::remove_var("BIND_PORT");
        env::set_var(BASE_URL_ENV, "http://localhost:4010/");

        let config = Config::from_env().expect("config should parse");
        env::remove_var(BASE_URL_ENV);
        assert_eq!(config.postman_base_url, "http://localhost:4010");
    }

    #[test]
    fn invalid_base_url_fails() {
        let _guard = env_guard();
        env::set_var("MCP_API_TOKEN", "abc");
        env::remove_var("BIND_PORT");
        env::set_var(BASE_URL_ENV, "ftp://api.postman.com");

        let err = Config::from_env().expect_err("expected invalid base url error");
        env::remove_var(BASE_URL_ENV);
        assert!(matches!(err, ConfigError::InvalidBaseUrl));
    }

    #[test]
    fn invalid_port_fails() {
        let _guard = env_guard();
        env::set_var("MCP_API_TOKEN", "abc");
        env::set_var("BIND_PORT", "not-a-port");

        let err = Config::from_env().expect_err("expected invalid port error");
        env::remove_var("BIND_PORT");
        assert!(matches!(err, ConfigError::InvalidPort));
    }
}
