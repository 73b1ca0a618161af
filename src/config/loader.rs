//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{DatabaseConfig, Environment, ShiftSyncConfig};
use crate::config::secret_string;
use crate::domain::errors::ShiftSyncError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into ShiftSyncConfig
/// 4. Applies environment variable overrides (SHIFTSYNC_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`ShiftSyncError::Configuration`] if the file is missing or
/// unreadable, a referenced variable is unset, the TOML is malformed, or
/// validation fails.
///
/// # Examples
///
/// ```no_run
/// use shiftsync::config::loader::load_config;
///
/// let config = load_config("shiftsync.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ShiftSyncConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ShiftSyncError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ShiftSyncError::Configuration(format!(
            "Failed to read configuration file {}: {e}",
            path.display()
        ))
    })?;

    let config = parse_config(&contents)?;
    tracing::debug!(path = %path.display(), "Configuration loaded");
    Ok(config)
}

/// Parses configuration text with the same substitution, override and
/// validation steps as [`load_config`]
///
/// # Errors
///
/// See [`load_config`].
pub fn parse_config(contents: &str) -> Result<ShiftSyncConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: ShiftSyncConfig = toml::from_str(&contents)
        .map_err(|e| ShiftSyncError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        ShiftSyncError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched. Every missing variable is reported at
/// once.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| ShiftSyncError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let processed = re.replace_all(line, |caps: &regex::Captures| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    caps[0].to_string()
                }
            }
        });
        result.push_str(&processed);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(ShiftSyncError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(variable = name, value = %raw, "Ignoring unparseable override");
            None
        }
    }
}

/// Applies environment variable overrides using the SHIFTSYNC_* prefix
///
/// Variables follow the pattern SHIFTSYNC_<SECTION>_<KEY>, for example
/// SHIFTSYNC_DATABASE_CONNECTION_STRING or SHIFTSYNC_ORCHESTRATOR_SOURCE_LABEL.
fn apply_env_overrides(config: &mut ShiftSyncConfig) {
    if let Ok(val) = std::env::var("SHIFTSYNC_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("SHIFTSYNC_ENVIRONMENT") {
        match val.to_lowercase().as_str() {
            "development" => config.environment = Environment::Development,
            "staging" => config.environment = Environment::Staging,
            "production" => config.environment = Environment::Production,
            other => tracing::warn!(value = other, "Ignoring unknown SHIFTSYNC_ENVIRONMENT"),
        }
    }

    if let Ok(val) = std::env::var("SHIFTSYNC_DATABASE_CONNECTION_STRING") {
        match config.database {
            Some(ref mut database) => database.connection_string = secret_string(val),
            None => config.database = Some(DatabaseConfig::new(secret_string(val))),
        }
    }
    if let Some(ref mut database) = config.database {
        if let Some(max) = env_parse("SHIFTSYNC_DATABASE_MAX_CONNECTIONS") {
            database.max_connections = max;
        }
        if let Some(timeout) = env_parse("SHIFTSYNC_DATABASE_CONNECTION_TIMEOUT_SECONDS") {
            database.connection_timeout_seconds = timeout;
        }
        if let Some(timeout) = env_parse("SHIFTSYNC_DATABASE_STATEMENT_TIMEOUT_SECONDS") {
            database.statement_timeout_seconds = timeout;
        }
    }

    if let Ok(val) = std::env::var("SHIFTSYNC_ORCHESTRATOR_SOURCE_LABEL") {
        config.orchestrator.source_label = val;
    }
    if let Some(transactional) = env_parse("SHIFTSYNC_ORCHESTRATOR_TRANSACTIONAL") {
        config.orchestrator.transactional = transactional;
    }
    if let Some(months) = env_parse("SHIFTSYNC_ORCHESTRATOR_MIN_SCRAPE_MONTHS") {
        config.orchestrator.min_scrape_months = months;
    }
    if let Some(months) = env_parse("SHIFTSYNC_ORCHESTRATOR_MAX_SCRAPE_MONTHS") {
        config.orchestrator.max_scrape_months = months;
    }

    if let Some(enabled) = env_parse("SHIFTSYNC_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = enabled;
    }
    if let Ok(val) = std::env::var("SHIFTSYNC_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("SHIFTSYNC_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }
}
