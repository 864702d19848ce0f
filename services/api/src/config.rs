//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    /// Server-side default credential; requests may still supply their own.
    pub openai_api_key: Option<String>,
    /// Ordered model fallback list tried until one succeeds.
    pub generation_models: Vec<String>,
    /// Executable invoked for PNG OCR.
    pub tesseract_command: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Load API Key (as optional) ---
        let openai_api_key = std::env::var("OPENAI_API_KEY").ok();

        // --- Load Adapter-specific Settings ---
        let models_str = std::env::var("GENERATION_MODELS")
            .unwrap_or_else(|_| "gpt-4o-mini,gpt-4o,gpt-3.5-turbo".to_string());
        let generation_models: Vec<String> = models_str
            .split(',')
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect();
        if generation_models.is_empty() {
            return Err(ConfigError::InvalidValue(
                "GENERATION_MODELS".to_string(),
                "at least one model identifier is required".to_string(),
            ));
        }

        let tesseract_command =
            std::env::var("TESSERACT_COMMAND").unwrap_or_else(|_| "tesseract".to_string());

        Ok(Self {
            bind_address,
            log_level,
            openai_api_key,
            generation_models,
            tesseract_command,
        })
    }
}
