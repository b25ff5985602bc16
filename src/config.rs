//! Startup configuration.
//!
//! Read once at process start from environment variables (a `.env` file in the
//! working directory is loaded first, if present):
//! - `TASKLIST_DATABASE_URL` - Optional. Store connection string. Defaults to
//!   `tasklist.db` in the platform data directory.
//! - `TASKLIST_CLIENT_ORIGIN` - Optional. Comma-separated origins allowed to call
//!   the API from a browser. Unset means any origin.
//! - `TASKLIST_HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `TASKLIST_PORT` - Optional. Server port. Defaults to `5000`.
//! - `TASKLIST_API_URL` - Optional. Todo collection URL used by the terminal
//!   client. Defaults to `http://localhost:5000/api/todos`.

use std::path::{Path, PathBuf};

use axum::http::HeaderValue;
use thiserror::Error;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api/todos";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Result of loading `.env`. Loading happens before tracing is set up, so
/// the outcome is kept and logged afterwards.
#[derive(Debug)]
pub enum DotenvStatus {
    Loaded(PathBuf),
    Missing,
    Failed(String),
}

impl DotenvStatus {
    pub fn log(&self) {
        match self {
            Self::Loaded(path) => tracing::debug!("Loaded environment from {}", path.display()),
            Self::Missing => {}
            Self::Failed(e) => tracing::warn!("Failed to load .env file: {}", e),
        }
    }
}

/// Load variables from `.env` in the working directory, if it exists.
pub fn load_dotenv() -> DotenvStatus {
    status(dotenvy::dotenv())
}

/// Load variables from the env file at `path`, if it exists.
pub fn load_dotenv_from(path: &Path) -> DotenvStatus {
    status(dotenvy::from_path(path).map(|()| path.to_path_buf()))
}

fn status(result: Result<PathBuf, dotenvy::Error>) -> DotenvStatus {
    match result {
        Ok(path) => DotenvStatus::Loaded(path),
        Err(e) if e.not_found() => DotenvStatus::Missing,
        Err(e) => DotenvStatus::Failed(e.to_string()),
    }
}

/// API server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Store connection string; `None` means the platform default location.
    pub database_url: Option<String>,
    /// Origins allowed by CORS; `None` allows any origin.
    pub client_origins: Option<Vec<String>>,
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            client_origins: None,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = non_empty(lookup("TASKLIST_DATABASE_URL"));

        let client_origins = match non_empty(lookup("TASKLIST_CLIENT_ORIGIN")) {
            Some(raw) => Some(parse_origins(&raw)?),
            None => None,
        };

        let host = non_empty(lookup("TASKLIST_HOST")).unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match non_empty(lookup("TASKLIST_PORT")) {
            Some(raw) => raw.parse::<u16>().map_err(|_| {
                ConfigError::InvalidValue("TASKLIST_PORT".to_string(), raw.clone())
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            database_url,
            client_origins,
            host,
            port,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Terminal client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_url =
            non_empty(lookup("TASKLIST_API_URL")).unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self { api_url }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_origins(raw: &str) -> Result<Vec<String>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            HeaderValue::from_str(origin)
                .map(|_| origin.trim_end_matches('/').to_string())
                .map_err(|_| {
                    ConfigError::InvalidValue(
                        "TASKLIST_CLIENT_ORIGIN".to_string(),
                        origin.to_string(),
                    )
                })
        })
        .collect()
}
