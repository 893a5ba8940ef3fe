use reqwest::Method;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Base URL every endpoint path is appended to (e.g. `http://localhost:8080/api`).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Deadline for one attempt, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Headers sent with every request, e.g. a session cookie or bearer token
    /// supplied by the surrounding environment.
    #[serde(default)]
    pub default_headers: HashMap<String, String>,

    /// Share one round-trip between identical concurrent reads.
    #[serde(default = "default_coalesce_reads")]
    pub coalesce_reads: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Extra attempts after the first; 0 disables retries.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_base_backoff_ms")]
    pub base_backoff_ms: u64,

    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,

    /// HTTP methods eligible for retry.
    #[serde(default = "default_retry_methods")]
    pub retry_methods: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            user_agent: default_user_agent(),
            default_headers: HashMap::new(),
            coalesce_reads: default_coalesce_reads(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_backoff_ms: default_base_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            retry_methods: default_retry_methods(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}
fn default_timeout_ms() -> u64 {
    30_000
}
fn default_connect_timeout_ms() -> u64 {
    5_000
}
fn default_user_agent() -> String {
    format!("campus-admin/{}", env!("CARGO_PKG_VERSION"))
}
fn default_coalesce_reads() -> bool {
    true
}
fn default_max_retries() -> u32 {
    2
}
fn default_base_backoff_ms() -> u64 {
    100
}
fn default_max_backoff_ms() -> u64 {
    2_000
}
fn default_retry_methods() -> Vec<String> {
    vec!["GET".to_string()]
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with CAMPUS__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("CAMPUS").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides.
    ///
    /// Builds the config from embedded defaults and overrides only, without
    /// touching the file system.
    #[cfg(test)]
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [gateway]
            base_url = "http://localhost:8080/api"
            timeout_ms = 30000
            connect_timeout_ms = 5000
            user_agent = "campus-admin-test"
            coalesce_reads = true

            [retry]
            max_retries = 2
            base_backoff_ms = 100
            max_backoff_ms = 2000
            retry_methods = ["GET"]

            [logging]
            level = "info"
            format = "json"
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        // Validation is left to the caller so tests can inspect partial configs
        let cfg: Self = builder.build()?.try_deserialize()?;
        Ok(cfg)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.gateway.base_url.trim().is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "CAMPUS__GATEWAY__BASE_URL must be set".to_string(),
            ));
        }

        if reqwest::Url::parse(&self.gateway.base_url).is_err() {
            return Err(ConfigValidationError::InvalidValue(format!(
                "gateway.base_url is not an absolute URL: {}",
                self.gateway.base_url
            )));
        }

        if self.gateway.timeout_ms == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "gateway.timeout_ms cannot be 0".to_string(),
            ));
        }

        if self.retry.base_backoff_ms > self.retry.max_backoff_ms {
            return Err(ConfigValidationError::InvalidValue(
                "retry.base_backoff_ms cannot exceed retry.max_backoff_ms".to_string(),
            ));
        }

        for method in &self.retry.retry_methods {
            if Method::from_bytes(method.to_uppercase().as_bytes()).is_err() {
                return Err(ConfigValidationError::InvalidValue(format!(
                    "retry.retry_methods contains an invalid method: {}",
                    method
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_load_with_defaults() {
        let config = Config::load_for_test(&[]).expect("Failed to load config");

        assert_eq!(config.gateway.base_url, "http://localhost:8080/api");
        assert_eq!(config.gateway.timeout_ms, 30000);
        assert!(config.gateway.coalesce_reads);
        assert!(config.gateway.default_headers.is_empty());
        assert_eq!(config.retry.max_retries, 2);
        assert_eq!(config.retry.retry_methods, vec!["GET".to_string()]);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_load_without_files_uses_defaults() {
        // Tests run from the crate directory, which has no config/ directory.
        let config = Config::load().expect("Failed to load config");

        if std::env::var("CAMPUS__GATEWAY__BASE_URL").is_err() {
            assert_eq!(config.gateway.base_url, "http://localhost:8080/api");
        }
        if std::env::var("CAMPUS__GATEWAY__TIMEOUT_MS").is_err() {
            assert_eq!(config.gateway.timeout_ms, 30000);
        }
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_override() {
        let config = Config::load_for_test(&[
            ("gateway.base_url", "https://sis.campus.edu/api"),
            ("retry.max_retries", "0"),
            ("logging.format", "pretty"),
        ])
        .expect("Failed to load config");

        assert_eq!(config.gateway.base_url, "https://sis.campus.edu/api");
        assert_eq!(config.retry.max_retries, 0);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_config_default_headers_override() {
        let config = Config::load_for_test(&[(
            "gateway.default_headers.authorization",
            "Bearer abc123",
        )])
        .expect("Failed to load config");

        assert_eq!(
            config.gateway.default_headers.get("authorization").map(String::as_str),
            Some("Bearer abc123")
        );
    }

    #[test]
    fn test_config_validation_missing_base_url() {
        let config =
            Config::load_for_test(&[("gateway.base_url", "")]).expect("Failed to load config");
        let result = config.validate();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("CAMPUS__GATEWAY__BASE_URL"));
    }

    #[test]
    fn test_config_validation_relative_base_url() {
        let config =
            Config::load_for_test(&[("gateway.base_url", "/api")]).expect("Failed to load config");
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("absolute URL"));
    }

    #[test]
    fn test_config_validation_zero_timeout() {
        let config =
            Config::load_for_test(&[("gateway.timeout_ms", "0")]).expect("Failed to load config");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_backoff_order() {
        let config = Config::load_for_test(&[
            ("retry.base_backoff_ms", "5000"),
            ("retry.max_backoff_ms", "100"),
        ])
        .expect("Failed to load config");

        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("base_backoff_ms"));
    }

    #[test]
    fn test_config_validation_bad_method() {
        let mut config = Config::load_for_test(&[]).expect("Failed to load config");
        config.retry.retry_methods = vec!["GE T".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_defaults_match_embedded_config() {
        let gateway = GatewayConfig::default();
        assert_eq!(gateway.base_url, "http://localhost:8080/api");
        assert_eq!(gateway.timeout_ms, 30_000);

        let retry = RetryConfig::default();
        assert_eq!(retry.max_retries, 2);
        assert_eq!(retry.base_backoff_ms, 100);
    }
}
