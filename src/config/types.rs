use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::store::RetryPolicy;

/// Root configuration container.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub connectivity: ConnectivityConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Remote catalog endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// GraphQL endpoint serving the catalog.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Connection timeout in seconds (default: 5).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

/// Reachability probe settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectivityConfig {
    /// URL probed before connectivity-checked actions run.
    #[serde(default = "default_probe_url")]
    pub probe_url: String,
    /// Probe timeout in seconds (default: 3).
    #[serde(default = "default_probe_timeout")]
    pub timeout_seconds: u64,
}

/// Backoff schedule applied to retry-enabled actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// First backoff delay in milliseconds (default: 350).
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    /// Multiplier applied per failed attempt (default: 2).
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
    /// Additional attempts after the first (default: 3).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Backoff ceiling in milliseconds (default: 5000).
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl RetryConfig {
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy {
            initial_delay: Duration::from_millis(self.initial_delay_ms),
            backoff_multiplier: self.backoff_multiplier,
            max_retries: self.max_retries,
            max_delay: Duration::from_millis(self.max_delay_ms),
        }
    }
}

/// Storage location override.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Path of the JSON storage file. Defaults to the platform data dir.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_endpoint() -> String {
    "https://rickandmortyapi.com/graphql".to_string()
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_request_timeout() -> u64 {
    30
}

fn default_probe_url() -> String {
    "https://rickandmortyapi.com/api".to_string()
}

fn default_probe_timeout() -> u64 {
    3
}

fn default_initial_delay_ms() -> u64 {
    350
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_max_retries() -> u32 {
    3
}

fn default_max_delay_ms() -> u64 {
    5000
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            connect_timeout_seconds: default_connect_timeout(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            probe_url: default_probe_url(),
            timeout_seconds: default_probe_timeout(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_initial_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            max_retries: default_max_retries(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}
