//! Runtime configuration
//!
//! Settings for the API client and for a dump run. Every field has a default
//! so that a config can be built from a handful of CLI flags.

use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding the access token
pub const TOKEN_ENV: &str = "ACCESS_TOKEN";

// ============================================================================
// API Config
// ============================================================================

/// VK API client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Method endpoint root
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API version sent with every call
    #[serde(default = "default_version")]
    pub version: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries for transport failures and retryable API errors
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Request quota shared by all concurrent dumps
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
}

fn default_base_url() -> String {
    "https://api.vk.com/method".to_string()
}

fn default_version() -> String {
    "5.131".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_requests_per_second() -> u32 {
    3
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            version: default_version(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            requests_per_second: default_requests_per_second(),
        }
    }
}

impl ApiConfig {
    /// HTTP transport settings for this API config
    pub fn http_config(&self) -> HttpClientConfig {
        HttpClientConfig::builder()
            .base_url(&self.base_url)
            .timeout(Duration::from_secs(self.timeout_secs))
            .max_retries(self.max_retries)
            .rate_limit(RateLimiterConfig::per_second(self.requests_per_second))
            .build()
    }
}

// ============================================================================
// Dump Config
// ============================================================================

/// Settings for a dump run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DumpConfig {
    /// Directory the peer files are written to
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    /// Peers dumped at the same time
    #[serde(default = "default_threads")]
    pub threads: usize,

    /// Newest messages kept per peer
    #[serde(default = "default_max_messages")]
    pub max_messages: usize,

    /// Run batches server-side through `execute` instead of one call per page
    #[serde(default = "default_use_execute")]
    pub use_execute: bool,

    /// API client settings
    #[serde(default)]
    pub api: ApiConfig,
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("vkms-result")
}

fn default_threads() -> usize {
    2
}

fn default_max_messages() -> usize {
    75_000
}

fn default_use_execute() -> bool {
    true
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            out_dir: default_out_dir(),
            threads: default_threads(),
            max_messages: default_max_messages(),
            use_execute: default_use_execute(),
            api: ApiConfig::default(),
        }
    }
}

impl DumpConfig {
    /// Reject settings a dump cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.threads == 0 {
            return Err(Error::config("threads must be at least 1"));
        }
        if self.max_messages == 0 {
            return Err(Error::config("max messages must be at least 1"));
        }
        if self.api.version.trim().is_empty() {
            return Err(Error::missing_field("api.version"));
        }
        url::Url::parse(&self.api.base_url)?;
        Ok(())
    }
}

/// Pick the access token. The environment variable wins over the flag.
pub fn resolve_token(env_value: Option<String>, flag: Option<String>) -> Result<String> {
    env_value
        .filter(|t| !t.is_empty())
        .or(flag.filter(|t| !t.is_empty()))
        .ok_or_else(|| Error::missing_field(format!("token (set {TOKEN_ENV} or pass --token)")))
}
