//! Songbridge: music links to video links
//!
//! This crate classifies a music streaming URL (track, album or playlist),
//! extracts `(name, artist)` pairs from the service's rendered page and finds a
//! matching video for each pair, fanning out concurrently over collections.

pub mod config;
pub mod output;
pub mod resolver;
pub mod search;
pub mod track;
pub mod url;

use thiserror::Error;

/// Main error type for Songbridge operations
#[derive(Debug, Error)]
pub enum SongbridgeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Resolve(#[from] ResolveError),

    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid title pattern: {0}")]
    InvalidPattern(String),
}

/// Errors raised while classifying a raw URL
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Unsupported service: {0}")]
    UnsupportedService(String),

    #[error("Unsupported entity type '{token}' for {service}")]
    UnsupportedEntityType { service: String, token: String },

    #[error("Entity '{token}' for {service} needs an item index")]
    AmbiguousEntity { service: String, token: String },
}

/// Errors raised while pulling track metadata out of a document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("Document has no title element")]
    TitleNotFound,

    #[error("Title '{0}' does not match the expected pattern")]
    TitlePatternMismatch(String),
}

/// Failure of a single resolution, tagged with the stage that produced it
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Classification failed: {0}")]
    Classify(#[from] ClassifyError),

    #[error("Fetch failed for {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Document error for {url}: {message}")]
    Parse { url: String, message: String },

    #[error("Extraction failed for {url}: {source}")]
    Extract { url: String, source: ExtractError },

    #[error("Expected a {expected} URL: {url}")]
    WrongEntity { url: String, expected: &'static str },

    #[error("Resolution of {url} did not complete")]
    Incomplete { url: String },
}

/// Errors raised by the video search client
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Can't search videos: '{0}' is not set")]
    MissingCredential(String),

    #[error("Upstream search failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("No video found for {0}")]
    NoMatch(String),
}

/// Result type alias for Songbridge operations
pub type Result<T> = std::result::Result<T, SongbridgeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use resolver::{CollectionReport, MemberOutcome, Resolution, Resolver};
pub use search::{SearchCache, SearchClient, VideoMatch};
pub use track::Track;
pub use url::{classify, ClassifiedUrl, EntityType, ServiceId, ServiceRegistry};
