use std::path::PathBuf;
use std::time::Duration;

use crate::controller::ControllerSettings;

/// Client configuration from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub db_path: PathBuf,
    pub page_size: usize,
    pub fetch_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    /// LARDER_API_URL defaults to "https://forkify-api.herokuapp.com/api"
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = lookup("LARDER_API_URL")
            .unwrap_or_else(|| "https://forkify-api.herokuapp.com/api".to_string());
        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(ConfigError::Invalid(
                "LARDER_API_URL",
                "must be an http:// or https:// URL",
            ));
        }

        let db_path = lookup("LARDER_DB_PATH")
            .unwrap_or_else(|| "./larder.redb".to_string())
            .into();

        let page_size = parse_positive(&lookup, "LARDER_PAGE_SIZE", 10)?;
        let timeout_secs = parse_positive(&lookup, "LARDER_FETCH_TIMEOUT_SECS", 10)?;

        Ok(Config {
            api_url,
            db_path,
            page_size,
            fetch_timeout: Duration::from_secs(timeout_secs as u64),
        })
    }

    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            page_size: self.page_size,
            fetch_timeout: self.fetch_timeout,
        }
    }
}

fn parse_positive(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: usize,
) -> Result<usize, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(ConfigError::Invalid(var, "must be a positive integer")),
        },
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Invalid(&'static str, &'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Invalid(var, msg) => write!(f, "Invalid value for {}: {}", var, msg),
        }
    }
}

impl std::error::Error for ConfigError {}
