use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Does not read `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("CAMPUSNAV_ENV", "development"))?;

    let bind_addr = or_default("CAMPUSNAV_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("CAMPUSNAV_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("CAMPUSNAV_LOG_LEVEL", "info");
    let config_path = PathBuf::from(or_default(
        "CAMPUSNAV_CONFIG_PATH",
        "./config/configuration.xml",
    ));
    let locations_path = PathBuf::from(or_default(
        "CAMPUSNAV_LOCATIONS_PATH",
        "./config/locations.xml",
    ));

    let directions_base_url = or_default(
        "CAMPUSNAV_DIRECTIONS_BASE_URL",
        "https://maps.googleapis.com/maps/api/directions/",
    );
    if !(directions_base_url.starts_with("http://") || directions_base_url.starts_with("https://"))
    {
        return Err(invalid(
            "CAMPUSNAV_DIRECTIONS_BASE_URL",
            "must be an http or https URL".to_string(),
        ));
    }

    let maps_api_key = lookup("CAMPUSNAV_MAPS_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty());
    if env == Environment::Production && maps_api_key.is_none() {
        return Err(ConfigError::MissingEnvVar(
            "CAMPUSNAV_MAPS_API_KEY".to_string(),
        ));
    }

    let directions_timeout_secs = parse_u64("CAMPUSNAV_DIRECTIONS_TIMEOUT_SECS", "30")?;
    let directions_max_retries = parse_u32("CAMPUSNAV_DIRECTIONS_MAX_RETRIES", "0")?;
    let directions_backoff_base_ms = parse_u64("CAMPUSNAV_DIRECTIONS_BACKOFF_BASE_MS", "500")?;

    let rate_limit_per_minute = parse_u32("CAMPUSNAV_RATE_LIMIT_PER_MINUTE", "120")?;
    if rate_limit_per_minute == 0 {
        return Err(invalid(
            "CAMPUSNAV_RATE_LIMIT_PER_MINUTE",
            "must be greater than zero".to_string(),
        ));
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        config_path,
        locations_path,
        directions_base_url,
        maps_api_key,
        directions_timeout_secs,
        directions_max_retries,
        directions_backoff_base_ms,
        rate_limit_per_minute,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "CAMPUSNAV_ENV".to_string(),
            reason: format!("expected development, test, or production; got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
