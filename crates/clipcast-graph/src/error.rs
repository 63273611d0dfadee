use thiserror::Error;

/// Errors returned by the Facebook Graph API client.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The OAuth code exchange returned an error or no access token.
    #[error("Facebook token exchange failed: {0}")]
    AuthExchange(String),

    /// Listing pages or looking up account details failed.
    #[error("account lookup failed: {0}")]
    AccountLookup(String),

    /// The media-container creation call returned an error or no id.
    #[error("media container creation failed: {0}")]
    ContainerCreation(String),

    /// A status-check payload carried neither a status code nor an error.
    #[error("container status check failed: {0}")]
    StatusCheck(String),

    /// The media-publish call returned an error or no media id.
    #[error("media publish failed: {0}")]
    Publish(String),

    /// The long-lived token exchange returned an error or no access token.
    #[error("Instagram access token refresh failed: {0}")]
    Refresh(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
