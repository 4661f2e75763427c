use crate::config::types::{AccountConfig, Config, ScraperConfig, ServerConfig, StorageConfig};
use crate::ConfigError;
use std::net::SocketAddr;
use url::Url;

/// First year commemorative 2-euro coins could have been issued
const FIRST_EURO_YEAR: i32 = 1999;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scraper_config(&config.scraper)?;
    validate_server_config(&config.server)?;
    validate_storage_config(&config.storage)?;
    if let Some(account) = &config.account {
        validate_account_config(account)?;
    }
    Ok(())
}

/// Validates scraper configuration
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    if config.first_year < FIRST_EURO_YEAR {
        return Err(ConfigError::Validation(format!(
            "first_year must be >= {}, got {}",
            FIRST_EURO_YEAR, config.first_year
        )));
    }

    if config.last_year < config.first_year {
        return Err(ConfigError::Validation(format!(
            "last_year ({}) must not be before first_year ({})",
            config.last_year, config.first_year
        )));
    }

    if config.request_timeout < 1 || config.request_timeout > 300 {
        return Err(ConfigError::Validation(format!(
            "request_timeout must be between 1 and 300 seconds, got {}",
            config.request_timeout
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    validate_base_url("primary_base_url", &config.primary_base_url)?;
    validate_base_url("secondary_base_url", &config.secondary_base_url)?;

    for slug in &config.countries {
        validate_country_slug(slug)?;
    }

    Ok(())
}

/// Validates server configuration
fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    config.bind_address.parse::<SocketAddr>().map_err(|e| {
        ConfigError::Validation(format!(
            "Invalid bind_address '{}': {}",
            config.bind_address, e
        ))
    })?;

    if config.cors_origins.iter().any(|origin| origin.is_empty()) {
        return Err(ConfigError::Validation(
            "cors_origins cannot contain empty entries".to_string(),
        ));
    }

    Ok(())
}

/// Validates storage configuration
fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates the seeded account
fn validate_account_config(config: &AccountConfig) -> Result<(), ConfigError> {
    if config.username.is_empty() {
        return Err(ConfigError::Validation(
            "account username cannot be empty".to_string(),
        ));
    }

    if !config
        .username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "account username must contain only alphanumeric characters, '-' and '_', got '{}'",
            config.username
        )));
    }

    if config.password.is_empty() {
        return Err(ConfigError::Validation(
            "account password cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates that a base URL parses and uses an HTTP scheme
fn validate_base_url(name: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", name, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            name, value
        )));
    }

    Ok(())
}

/// Validates a country slug such as `san-marino`
fn validate_country_slug(slug: &str) -> Result<(), ConfigError> {
    if slug.is_empty()
        || slug.starts_with('-')
        || slug.ends_with('-')
        || !slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "Invalid country slug '{}'",
            slug
        )));
    }
    Ok(())
}
