use crate::config::types::{Config, HttpConfig, ResolverConfig, SearchConfig, ServiceOverride};
use crate::url::compile_title_pattern;
use crate::ConfigError;
use url::Url;

/// Upper bound on concurrent member resolutions
const MAX_FAN_OUT: usize = 50;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_resolver_config(&config.resolver)?;
    validate_http_config(&config.http)?;
    validate_search_config(&config.search)?;
    validate_service_overrides(&config.services)?;
    Ok(())
}

fn validate_resolver_config(config: &ResolverConfig) -> Result<(), ConfigError> {
    if config.fan_out_limit < 1 || config.fan_out_limit > MAX_FAN_OUT {
        return Err(ConfigError::Validation(format!(
            "fan_out_limit must be between 1 and {}, got {}",
            MAX_FAN_OUT, config.fan_out_limit
        )));
    }

    Ok(())
}

fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 || config.timeout_secs > 120 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be between 1 and 120, got {}",
            config.timeout_secs
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    let api_url = Url::parse(&config.api_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid api_url: {}", e)))?;

    if api_url.scheme() != "http" && api_url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "api_url must use HTTP or HTTPS, got '{}'",
            config.api_url
        )));
    }

    if config.api_key_env.is_empty() || config.api_key_env.contains('=') {
        return Err(ConfigError::Validation(format!(
            "api_key_env must be a valid variable name, got '{}'",
            config.api_key_env
        )));
    }

    Url::parse(&config.watch_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid watch_url: {}", e)))?;

    Ok(())
}

fn validate_service_overrides(services: &[ServiceOverride]) -> Result<(), ConfigError> {
    for (i, service) in services.iter().enumerate() {
        if services[..i].iter().any(|other| other.id == service.id) {
            return Err(ConfigError::Validation(format!(
                "Service '{}' is configured more than once",
                service.id
            )));
        }

        if let Some(hostname) = &service.hostname {
            validate_hostname(hostname)?;
        }

        if let Some(pattern) = &service.title_pattern {
            compile_title_pattern(pattern)?;
        }

        if let Some(entities) = &service.entities {
            if entities.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "Service '{}' must map at least one entity token",
                    service.id
                )));
            }

            if let Some(token) = entities.keys().find(|t| t.is_empty() || t.contains('/')) {
                return Err(ConfigError::Validation(format!(
                    "Service '{}' has an invalid entity token '{}'",
                    service.id, token
                )));
            }
        }
    }

    Ok(())
}

fn validate_hostname(hostname: &str) -> Result<(), ConfigError> {
    if hostname.is_empty() {
        return Err(ConfigError::Validation(
            "hostname cannot be empty".to_string(),
        ));
    }

    if !hostname
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "Hostname '{}' contains invalid characters",
            hostname
        )));
    }

    if hostname.starts_with('.') || hostname.ends_with('.') || hostname.contains("..") {
        return Err(ConfigError::Validation(format!(
            "Hostname '{}' is malformed",
            hostname
        )));
    }

    Ok(())
}
