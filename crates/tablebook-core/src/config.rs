use crate::app_config::{AppConfig, PacingMode};
use crate::request::RawBookingRequest;
use crate::selectors::{load_selectors, WidgetSelectors};
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
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing and validation are decoupled from the real environment so tests can
/// drive them with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        optional(var).unwrap_or_else(|| default.to_string())
    };

    let parse_i64 = |var: &str, default: &str| -> Result<i64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<i64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let target_url = require("BOOKING_URL")?;
    let customer_name = require("NAME")?;
    let customer_phone = require("PHONE")?;
    let customer_email = optional("EMAIL");
    let party_size = parse_i64("PARTY_SIZE", "2")?;
    let preferred_times = split_times(&require("TIMES")?);
    let target_date = optional("DATE");
    let headless = parse_bool("HEADLESS", &or_default("HEADLESS", "false"))?;

    let request = RawBookingRequest {
        target_url,
        customer_name,
        customer_phone,
        customer_email,
        party_size,
        preferred_times,
        target_date,
        headless,
    }
    .validate()?;

    let log_level = or_default("TABLEBOOK_LOG_LEVEL", "info");
    let screenshot_dir = PathBuf::from(or_default("TABLEBOOK_SCREENSHOT_DIR", "."));
    let element_timeout_ms = parse_u64("TABLEBOOK_ELEMENT_TIMEOUT_MS", "5000")?;
    if element_timeout_ms == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "TABLEBOOK_ELEMENT_TIMEOUT_MS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    let settle_secs = parse_u64("TABLEBOOK_SETTLE_SECS", "3")?;
    let pacing_mode = parse_pacing_mode(&or_default("TABLEBOOK_PACING", "midpoint"))?;
    let pacing_scale = parse_pacing_scale(&or_default("TABLEBOOK_PACING_SCALE", "1.0"))?;
    let chrome_path = optional("TABLEBOOK_CHROME_PATH").map(PathBuf::from);
    let selectors = match optional("TABLEBOOK_SELECTORS_PATH") {
        Some(path) => load_selectors(&PathBuf::from(path))?,
        None => WidgetSelectors::default(),
    };

    Ok(AppConfig {
        request,
        log_level,
        screenshot_dir,
        element_timeout_ms,
        settle_secs,
        pacing_mode,
        pacing_scale,
        chrome_path,
        selectors,
    })
}

/// Split a comma-separated `TIMES` value, keeping order and dropping the
/// empty tail a trailing comma would produce.
fn split_times(raw: &str) -> Vec<String> {
    let mut times: Vec<String> = raw.split(',').map(str::to_string).collect();
    if times.last().is_some_and(|t| t.trim().is_empty()) {
        times.pop();
    }
    times
}

fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected true or false, got '{other}'"),
        }),
    }
}

fn parse_pacing_mode(raw: &str) -> Result<PacingMode, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "midpoint" => Ok(PacingMode::Midpoint),
        "jitter" => Ok(PacingMode::Jitter),
        other => Err(ConfigError::InvalidEnvVar {
            var: "TABLEBOOK_PACING".to_string(),
            reason: format!("expected 'midpoint' or 'jitter', got '{other}'"),
        }),
    }
}

fn parse_pacing_scale(raw: &str) -> Result<f64, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar {
        var: "TABLEBOOK_PACING_SCALE".to_string(),
        reason,
    };
    let scale = raw
        .trim()
        .parse::<f64>()
        .map_err(|e| invalid(e.to_string()))?;
    if scale.is_finite() && scale > 0.0 {
        Ok(scale)
    } else {
        Err(invalid(format!("must be a positive number, got {scale}")))
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
