use thiserror::Error;

/// Errors returned by the TikTok Open API client.
#[derive(Debug, Error)]
pub enum TikTokError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The OAuth code exchange returned an error or no access token.
    #[error("TikTok token exchange failed: {0}")]
    AuthExchange(String),

    /// The refresh-token exchange returned an error or no access token.
    #[error("TikTok access token refresh failed: {0}")]
    Refresh(String),

    /// The user-info call returned an error or no user object.
    #[error("TikTok user info lookup failed: {0}")]
    UserInfo(String),

    /// Downloading the source video from its hosted URL failed.
    #[error("fetching source video failed: {0}")]
    VideoFetch(String),

    /// The multipart upload was rejected by the provider.
    #[error("TikTok video upload failed: {0}")]
    Upload(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
