//! Shared configuration and domain types for clipcast.
//!
//! Everything here is provider-agnostic: the env-driven [`AppConfig`], the
//! [`Credential`] a session holds after an OAuth exchange, and the
//! [`LinkedAccount`] destination list shown on the publish page.

mod app_config;
mod config;
mod types;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use types::{Credential, LinkedAccount, Provider, UnknownProviderError};

use thiserror::Error;

/// Errors raised while loading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
