use std::path::PathBuf;
use tracing::Level;
use voicegate_core::endpoint::{
    DEFAULT_BACKEND_HOST, DEFAULT_CONVERSATION_SERVICE, validate_host, validate_service_name,
};

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all shell configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct ShellConfig {
    /// Backend host from deployment configuration. Validated lazily: a
    /// malformed value falls back to `default_backend_host` at resolution time.
    pub backend_host: Option<String>,
    pub default_backend_host: String,
    pub conversation_service: String,
    pub personas_path: Option<PathBuf>,
    pub input_editable: bool,
    pub log_level: Level,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            backend_host: None,
            default_backend_host: DEFAULT_BACKEND_HOST.to_string(),
            conversation_service: DEFAULT_CONVERSATION_SERVICE.to_string(),
            personas_path: None,
            input_editable: false,
            log_level: Level::INFO,
        }
    }
}

fn parse_bool(var: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue(
            var.to_string(),
            format!("'{}' is not a boolean", value),
        )),
    }
}

impl ShellConfig {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let backend_host = std::env::var("BACKEND_HOST")
            .or_else(|_| std::env::var("REACT_APP_BACKEND_HOST"))
            .ok()
            .filter(|h| !h.trim().is_empty());

        let default_backend_host = std::env::var("DEFAULT_BACKEND_HOST")
            .unwrap_or_else(|_| DEFAULT_BACKEND_HOST.to_string());
        validate_host(&default_backend_host).map_err(|e| {
            ConfigError::InvalidValue("DEFAULT_BACKEND_HOST".to_string(), e.to_string())
        })?;

        let conversation_service = std::env::var("CONVERSATION_SERVICE")
            .unwrap_or_else(|_| DEFAULT_CONVERSATION_SERVICE.to_string());
        validate_service_name(&conversation_service).map_err(|e| {
            ConfigError::InvalidValue("CONVERSATION_SERVICE".to_string(), e.to_string())
        })?;

        let personas_path = std::env::var("PERSONAS_PATH").ok().map(PathBuf::from);

        let input_editable = match std::env::var("INPUT_EDITABLE") {
            Ok(value) => parse_bool("INPUT_EDITABLE", &value)?,
            Err(_) => false,
        };

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            backend_host,
            default_backend_host,
            conversation_service,
            personas_path,
            input_editable,
            log_level,
        })
    }
}
