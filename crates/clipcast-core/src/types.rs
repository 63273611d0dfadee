use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bearer token material held by a browser session after an OAuth exchange.
///
/// `refresh_token` and `provider_user_id` are only populated for providers
/// that return them (TikTok); the Graph long-lived exchange returns an access
/// token alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub provider_user_id: Option<String>,
}

/// A destination account content can be published onto.
///
/// `username` is best-effort: per-account handle lookups may fail without
/// dropping the account from the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedAccount {
    pub id: String,
    pub name: String,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Instagram,
    TikTok,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Instagram => write!(f, "instagram"),
            Provider::TikTok => write!(f, "tiktok"),
        }
    }
}

#[derive(Debug, Error)]
#[error("unsupported social provider: {0}")]
pub struct UnknownProviderError(pub String);

impl std::str::FromStr for Provider {
    type Err = UnknownProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "instagram" => Ok(Provider::Instagram),
            "tiktok" => Ok(Provider::TikTok),
            other => Err(UnknownProviderError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_parses_known_names() {
        assert_eq!("instagram".parse::<Provider>().unwrap(), Provider::Instagram);
        assert_eq!("tiktok".parse::<Provider>().unwrap(), Provider::TikTok);
    }

    #[test]
    fn provider_rejects_unknown_names() {
        let err = "myspace".parse::<Provider>().unwrap_err();
        assert_eq!(err.to_string(), "unsupported social provider: myspace");
    }

    #[test]
    fn provider_display_round_trips() {
        for provider in [Provider::Instagram, Provider::TikTok] {
            assert_eq!(
                provider.to_string().parse::<Provider>().unwrap(),
                provider
            );
        }
    }
}
