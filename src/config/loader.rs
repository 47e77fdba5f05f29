use std::fs;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::types::Config;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("config validation failed: {message}")]
    Validation { message: String },
}

impl Config {
    /// Path of the configuration file under the platform config directory.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("cardstock").join("config.toml")
    }

    /// Load configuration from the default config file.
    ///
    /// A missing file yields `Config::default()`; an existing file is
    /// parsed as TOML and validated.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();

        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;

        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate field combinations serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.catalog.endpoint.starts_with("http") {
            return Err(ConfigError::Validation {
                message: format!(
                    "catalog endpoint '{}' is not an HTTP URL",
                    self.catalog.endpoint
                ),
            });
        }

        if self.catalog.request_timeout_seconds == 0 {
            return Err(ConfigError::Validation {
                message: "catalog request timeout must be positive".to_string(),
            });
        }

        if self.retry.backoff_multiplier < 1.0 {
            return Err(ConfigError::Validation {
                message: format!(
                    "backoff multiplier {} would shrink delays",
                    self.retry.backoff_multiplier
                ),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn default_config_is_valid() {
        Config::default().validate().expect("defaults must validate");
    }

    #[test]
    fn empty_file_falls_back_to_defaults() {
        let config: Config = toml::from_str("").expect("empty TOML must parse");
        assert_eq!(
            config.catalog.endpoint,
            "https://rickandmortyapi.com/graphql"
        );
        assert_eq!(config.retry.max_retries, 3);
        assert!(config.storage.path.is_none());
    }

    #[test]
    fn partial_sections_keep_field_defaults() {
        let config: Config = toml::from_str(
            r#"
            [retry]
            max_retries = 1
            "#,
        )
        .expect("partial TOML must parse");

        assert_eq!(config.retry.max_retries, 1);
        assert_eq!(config.retry.initial_delay_ms, 350);
    }

    #[test]
    fn retry_section_maps_onto_the_policy() {
        let config: Config = toml::from_str(
            r#"
            [retry]
            initial_delay_ms = 10
            backoff_multiplier = 3.0
            max_retries = 2
            max_delay_ms = 40
            "#,
        )
        .expect("retry TOML must parse");

        let policy = config.retry.to_policy();
        assert_eq!(policy.initial_delay, Duration::from_millis(10));
        assert_eq!(policy.delay_for(1), Duration::from_millis(30));
        assert_eq!(policy.delay_for(3), Duration::from_millis(40));
    }

    #[test]
    fn shrinking_backoff_is_rejected() {
        let config: Config = toml::from_str(
            r#"
            [retry]
            backoff_multiplier = 0.5
            "#,
        )
        .expect("TOML must parse");

        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn non_http_endpoint_is_rejected() {
        let config: Config = toml::from_str(
            r#"
            [catalog]
            endpoint = "ftp://example.com"
            "#,
        )
        .expect("TOML must parse");

        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { .. })
        ));
    }
}
