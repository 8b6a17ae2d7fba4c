use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_flag = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        parse_bool(&raw).ok_or_else(|| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected true/false, got '{raw}'"),
        })
    };

    let handle = match lookup("POSTPULSE_HANDLE") {
        Ok(raw) => {
            let handle = normalize_handle(&raw);
            if handle.is_empty() {
                return Err(ConfigError::InvalidEnvVar {
                    var: "POSTPULSE_HANDLE".to_string(),
                    reason: format!("'{raw}' is empty once whitespace and '@' are stripped"),
                });
            }
            Some(handle)
        }
        Err(_) => None,
    };
    let bearer_token = lookup("POSTPULSE_BEARER_TOKEN")
        .ok()
        .filter(|token| !token.trim().is_empty());

    let max_results = parse_u32("POSTPULSE_MAX_RESULTS", "90")?;
    let data_dir = PathBuf::from(or_default("POSTPULSE_DATA_DIR", "."));
    let api_base_url = or_default("POSTPULSE_API_BASE_URL", "https://api.twitter.com/2/");
    let request_timeout_secs = parse_u64("POSTPULSE_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("POSTPULSE_USER_AGENT", "postpulse/0.1 (engagement-stats)");
    let empty_fetch_fallback = parse_flag("POSTPULSE_EMPTY_FETCH_FALLBACK", "true")?;
    let log_level = or_default("POSTPULSE_LOG_LEVEL", "info");

    Ok(AppConfig {
        handle,
        bearer_token,
        max_results,
        data_dir,
        api_base_url,
        request_timeout_secs,
        user_agent,
        empty_fetch_fallback,
        log_level,
    })
}

/// Strip surrounding whitespace and a leading `@` from a handle.
#[must_use]
pub fn normalize_handle(raw: &str) -> String {
    raw.trim().trim_start_matches('@').to_string()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
