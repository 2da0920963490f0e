use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Presence of this variable (any value) forces sequential collection processing
pub const SEQUENTIAL_ENV: &str = "SEQUENTIAL";

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Applies environment-driven overrides to a loaded configuration
pub fn apply_env_overrides(config: &mut Config) {
    if std::env::var_os(SEQUENTIAL_ENV).is_some() {
        tracing::debug!("{} is set, resolving collections sequentially", SEQUENTIAL_ENV);
        config.resolver.sequential = true;
    }
}
