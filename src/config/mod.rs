//! Configuration module for Songbridge
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every section has defaults, so an empty file (or no file
//! at all) yields a working configuration.
//!
//! # Example
//!
//! ```no_run
//! use songbridge::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("songbridge.toml")).unwrap();
//! println!("Fan-out limit: {}", config.resolver.fan_out_limit);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, HttpConfig, ResolverConfig, SearchConfig, ServiceOverride};

// Re-export parser functions
pub use parser::{apply_env_overrides, load_config, SEQUENTIAL_ENV};
pub use validation::validate;
