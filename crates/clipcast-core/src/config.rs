use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Default Facebook Login scopes required for Reels publishing.
const DEFAULT_FB_SCOPES: &str =
    "pages_read_engagement,pages_show_list,instagram_basic,instagram_content_publish";

/// Default TikTok scopes required for video upload.
const DEFAULT_TIKTOK_SCOPES: &str = "user.info.basic,video.upload";

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
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
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

    let fb_app_id = require("FB_APP_ID")?;
    let fb_api_secret = require("FB_API_SECRET")?;
    let fb_redirect_uri = require("FB_REDIRECT_URI")?;
    let fb_api_version = or_default("FB_API_VERSION", "v16.0");
    let fb_scopes = split_scopes(&or_default("FB_SCOPES", DEFAULT_FB_SCOPES));

    let tiktok_client_key = require("TIKTOK_CLIENT_KEY")?;
    let tiktok_client_secret = require("TIKTOK_CLIENT_SECRET")?;
    let tiktok_redirect_uri = require("TIKTOK_REDIRECT_URI")?;
    let tiktok_scopes = split_scopes(&or_default("TIKTOK_SCOPES", DEFAULT_TIKTOK_SCOPES));

    let env = parse_environment(&or_default("CLIPCAST_ENV", "development"));
    let bind_addr = parse_addr("CLIPCAST_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("CLIPCAST_LOG_LEVEL", "info");
    let http_timeout_secs = parse_u64("CLIPCAST_HTTP_TIMEOUT_SECS", "30")?;

    let poll_max_attempts = parse_u32("CLIPCAST_POLL_MAX_ATTEMPTS", "30")?;
    let poll_interval_ms = parse_u64("CLIPCAST_POLL_INTERVAL_MS", "1000")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        http_timeout_secs,
        fb_app_id,
        fb_api_secret,
        fb_redirect_uri,
        fb_api_version,
        fb_scopes,
        tiktok_client_key,
        tiktok_client_secret,
        tiktok_redirect_uri,
        tiktok_scopes,
        poll_max_attempts,
        poll_interval_ms,
    })
}

/// Split a comma-separated scope list, dropping empty entries.
fn split_scopes(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
