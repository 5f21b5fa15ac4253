use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
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
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a plain
/// `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Blank keys in a .env file count as unset.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
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

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("BRANDMAP_ENV", "development"))?;
    let bind_addr = parse_addr("BRANDMAP_BIND_ADDR", "0.0.0.0:8000")?;
    let log_level = or_default("BRANDMAP_LOG_LEVEL", "info");

    let qloo_api_key = optional("QLOO_API_KEY");
    let qloo_base_url = or_default("QLOO_API_BASE_URL", "https://hackathon.api.qloo.com");
    let qloo_request_timeout_secs = parse_u64("QLOO_REQUEST_TIMEOUT_SECS", "15")?;
    let profile_budget_secs = parse_u64("BRANDMAP_PROFILE_BUDGET_SECS", "60")?;

    let gemini_api_key = optional("GEMINI_API_KEY");
    let gemini_base_url = or_default(
        "GEMINI_API_BASE_URL",
        "https://generativelanguage.googleapis.com",
    );
    let gemini_model = or_default("GEMINI_MODEL", "gemini-2.5-flash");
    let gemini_request_timeout_secs = parse_u64("GEMINI_REQUEST_TIMEOUT_SECS", "60")?;

    let generation_workers = parse_usize("BRANDMAP_GENERATION_WORKERS", "4")?;
    if generation_workers == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "BRANDMAP_GENERATION_WORKERS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        qloo_api_key,
        qloo_base_url,
        qloo_request_timeout_secs,
        profile_budget_secs,
        gemini_api_key,
        gemini_base_url,
        gemini_model,
        gemini_request_timeout_secs,
        generation_workers,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "BRANDMAP_ENV".to_string(),
            reason: format!("expected development, test, or production; got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
