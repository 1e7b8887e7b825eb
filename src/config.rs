use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::time::Duration;
use tickerscope::services::Theme;
use tickerscope::utils::{DEFAULT_LONG_WINDOW, DEFAULT_SHORT_WINDOW};

pub const DEFAULT_PORT: u16 = 8888;

// YAML-serializable configuration structure
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct ConfigYaml {
    pub server_name: Option<String>,
    pub port: Option<u16>,
    pub environment: Option<String>,
    pub yahoo_base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub rate_limit_per_minute: Option<u32>,
    pub cache_ttl_secs: Option<u64>,
    pub short_window: Option<usize>,
    pub long_window: Option<usize>,
    pub default_theme: Option<Theme>,
    pub client_requests_per_second: Option<u64>,
    pub client_burst_size: Option<u32>,
}

// Holds application-wide settings
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_name: String,
    pub port: u16,
    pub environment: String,
    pub yahoo_base_url: String,
    pub request_timeout: Duration,
    pub rate_limit_per_minute: u32,
    pub cache_ttl: Duration,
    pub short_window: usize,
    pub long_window: usize,
    pub default_theme: Theme,
    pub client_requests_per_second: u64,
    pub client_burst_size: u32,
}

impl From<ConfigYaml> for AppConfig {
    fn from(yaml: ConfigYaml) -> Self {
        Self {
            server_name: yaml.server_name.unwrap_or_else(|| "tickerscope".to_string()),
            port: yaml.port.unwrap_or(DEFAULT_PORT),
            environment: yaml.environment.unwrap_or_else(|| "development".to_string()),
            yahoo_base_url: yaml
                .yahoo_base_url
                .unwrap_or_else(|| tickerscope::services::DEFAULT_BASE_URL.to_string()),
            request_timeout: Duration::from_secs(yaml.request_timeout_secs.unwrap_or(30)),
            rate_limit_per_minute: yaml.rate_limit_per_minute.unwrap_or(60),
            cache_ttl: Duration::from_secs(yaml.cache_ttl_secs.unwrap_or(300)),
            short_window: yaml.short_window.unwrap_or(DEFAULT_SHORT_WINDOW),
            long_window: yaml.long_window.unwrap_or(DEFAULT_LONG_WINDOW),
            default_theme: yaml.default_theme.unwrap_or_default(),
            client_requests_per_second: yaml.client_requests_per_second.unwrap_or(2),
            client_burst_size: yaml.client_burst_size.unwrap_or(10),
        }
    }
}

impl AppConfig {
    // Load configuration from YAML file or environment variables
    pub fn load() -> anyhow::Result<Self> {
        // Check for CONFIG_FILE environment variable first
        if let Ok(config_file) = env::var("CONFIG_FILE") {
            Self::from_yaml(&config_file)
        } else {
            Self::from_env()
        }
    }

    // Load configuration from YAML file
    pub fn from_yaml(file_path: &str) -> anyhow::Result<Self> {
        let yaml_content = fs::read_to_string(file_path)
            .with_context(|| format!("Failed to read config file {}", file_path))?;
        Self::from_yaml_str(&yaml_content)
    }

    pub fn from_yaml_str(yaml_content: &str) -> anyhow::Result<Self> {
        let yaml_config: ConfigYaml =
            serde_yaml::from_str(yaml_content).context("Failed to parse YAML config")?;
        Ok(yaml_config.into())
    }

    // Load all configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys take defaults, malformed ones are errors.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parsed<T: std::str::FromStr>(
            lookup: &dyn Fn(&str) -> Option<String>,
            key: &str,
        ) -> anyhow::Result<Option<T>>
        where
            T::Err: std::fmt::Display,
        {
            match lookup(key) {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .map(Some)
                    .map_err(|e| anyhow::anyhow!("Invalid {}={:?}: {}", key, raw, e)),
                None => Ok(None),
            }
        }

        let lookup: &dyn Fn(&str) -> Option<String> = &lookup;
        let yaml = ConfigYaml {
            server_name: lookup("SERVER_NAME"),
            port: parsed(lookup, "PORT")?,
            environment: lookup("ENVIRONMENT"),
            yahoo_base_url: lookup("YAHOO_BASE_URL"),
            request_timeout_secs: parsed(lookup, "REQUEST_TIMEOUT_SECS")?,
            rate_limit_per_minute: parsed(lookup, "RATE_LIMIT_PER_MINUTE")?,
            cache_ttl_secs: parsed(lookup, "CACHE_TTL_SECS")?,
            short_window: parsed(lookup, "SHORT_WINDOW")?,
            long_window: parsed(lookup, "LONG_WINDOW")?,
            default_theme: parsed(lookup, "DEFAULT_THEME")?,
            client_requests_per_second: parsed(lookup, "CLIENT_REQUESTS_PER_SECOND")?,
            client_burst_size: parsed(lookup, "CLIENT_BURST_SIZE")?,
        };
        Ok(yaml.into())
    }
}
