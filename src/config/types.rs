use crate::url::{EntityKind, ServiceId};
use serde::Deserialize;
use std::collections::HashMap;

/// Main configuration structure for Songbridge
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default, rename = "service")]
    pub services: Vec<ServiceOverride>,
}

/// Collection fan-out behavior
#[derive(Debug, Clone, Deserialize)]
pub struct ResolverConfig {
    /// Maximum number of collection members resolved per request
    #[serde(rename = "fan-out-limit", default = "default_fan_out_limit")]
    pub fan_out_limit: usize,

    /// Resolve and search members one at a time, in document order
    #[serde(default)]
    pub sequential: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fan_out_limit: default_fan_out_limit(),
            sequential: false,
        }
    }
}

/// Outbound HTTP settings shared by document fetches and searches
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Video search API settings
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Search endpoint
    #[serde(rename = "api-url", default = "default_api_url")]
    pub api_url: String,

    /// Environment variable holding the API key, read at call time
    #[serde(rename = "api-key-env", default = "default_api_key_env")]
    pub api_key_env: String,

    /// Prefix the video id is appended to
    #[serde(rename = "watch-url", default = "default_watch_url")]
    pub watch_url: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key_env: default_api_key_env(),
            watch_url: default_watch_url(),
        }
    }
}

/// Override for one of the built-in service profiles
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceOverride {
    pub id: ServiceId,

    #[serde(default)]
    pub hostname: Option<String>,

    #[serde(rename = "title-pattern", default)]
    pub title_pattern: Option<String>,

    #[serde(rename = "entity-index", default)]
    pub entity_index: Option<usize>,

    /// Replaces the whole token table when present
    #[serde(default)]
    pub entities: Option<HashMap<String, EntityKind>>,
}

fn default_fan_out_limit() -> usize {
    3
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("songbridge/{}", env!("CARGO_PKG_VERSION"))
}

fn default_api_url() -> String {
    "https://www.googleapis.com/youtube/v3/search".to_string()
}

fn default_api_key_env() -> String {
    "YOUTUBE_API_KEY".to_string()
}

fn default_watch_url() -> String {
    "https://youtube.com/watch?v=".to_string()
}
