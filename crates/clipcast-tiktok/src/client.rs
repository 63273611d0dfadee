//! HTTP client for the TikTok Open API.
//!
//! TikTok splits its surface across two hosts: the legacy
//! `open-api.tiktok.com` host carries OAuth and the share upload, and
//! `open.tiktokapis.com` carries the v2 user-info endpoint. Token responses
//! nest everything under a `data` object, with `error_code`/`description`
//! fields in the same place on failure.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;

use clipcast_core::Credential;

use crate::error::TikTokError;

const DEFAULT_AUTH_BASE_URL: &str = "https://open-api.tiktok.com/";
const DEFAULT_API_BASE_URL: &str = "https://open.tiktokapis.com/";

/// Client for the TikTok Open API.
///
/// Use [`TikTokClient::new`] for production or
/// [`TikTokClient::with_base_urls`] to point both hosts at mock servers in
/// tests.
pub struct TikTokClient {
    client: Client,
    client_key: String,
    client_secret: String,
    auth_base: Url,
    api_base: Url,
}

/// TikTok account details shown on the upload page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TikTokUser {
    pub display_name: String,
    pub open_id: String,
    pub union_id: Option<String>,
    pub avatar_url: Option<String>,
}

impl TikTokClient {
    /// Creates a new client pointed at the production TikTok hosts.
    ///
    /// # Errors
    ///
    /// Returns [`TikTokError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        client_key: &str,
        client_secret: &str,
        timeout_secs: u64,
    ) -> Result<Self, TikTokError> {
        Self::with_base_urls(
            client_key,
            client_secret,
            timeout_secs,
            DEFAULT_AUTH_BASE_URL,
            DEFAULT_API_BASE_URL,
        )
    }

    /// Creates a new client with custom host URLs (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`TikTokError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`TikTokError::AuthExchange`] if either base
    /// URL is invalid.
    pub fn with_base_urls(
        client_key: &str,
        client_secret: &str,
        timeout_secs: u64,
        auth_base_url: &str,
        api_base_url: &str,
    ) -> Result<Self, TikTokError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("clipcast/0.1 (reels-publishing)")
            .build()?;

        Ok(Self {
            client,
            client_key: client_key.to_owned(),
            client_secret: client_secret.to_owned(),
            auth_base: parse_base_url(auth_base_url)?,
            api_base: parse_base_url(api_base_url)?,
        })
    }

    /// Builds the TikTok OAuth consent redirect URL for the given scopes.
    ///
    /// Scopes are joined with a literal `%2c`; the remaining parameters are
    /// inserted verbatim as the connect endpoint expects.
    #[must_use]
    pub fn login_url(&self, redirect_uri: &str, scopes: &[String]) -> String {
        let scope = scopes.join("%2c");
        format!(
            "{auth_base}platform/oauth/connect/?client_key={client_key}&response_type=code&scope={scope}&redirect_uri={redirect_uri}",
            auth_base = self.auth_base,
            client_key = self.client_key,
        )
    }

    /// Exchanges an OAuth authorization code for an access token, refresh
    /// token, and the account's `open_id`.
    ///
    /// # Errors
    ///
    /// - [`TikTokError::AuthExchange`] if the provider returns an error or no
    ///   access token.
    /// - [`TikTokError::Http`] on network failure.
    /// - [`TikTokError::Deserialize`] if the body is not valid JSON.
    pub async fn exchange_code(&self, code: &str) -> Result<Credential, TikTokError> {
        let url = self.build_auth_url(
            "oauth/access_token/",
            &[
                ("client_key", self.client_key.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
            ],
        );
        let body = self.get_json(url).await?;
        credential_from_token_body(&body).map_err(TikTokError::AuthExchange)
    }

    /// Exchanges a refresh token for a fresh access token.
    ///
    /// # Errors
    ///
    /// - [`TikTokError::Refresh`] if the provider returns an error or no
    ///   access token.
    /// - [`TikTokError::Http`] on network failure.
    /// - [`TikTokError::Deserialize`] if the body is not valid JSON.
    pub async fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<Credential, TikTokError> {
        let url = self.build_auth_url(
            "oauth/refresh_token/",
            &[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_key", self.client_key.as_str()),
            ],
        );
        let body = self.get_json(url).await?;
        credential_from_token_body(&body).map_err(TikTokError::Refresh)
    }

    /// Fetches the authenticated user's display info from the v2 API.
    ///
    /// # Errors
    ///
    /// - [`TikTokError::UserInfo`] if the provider returns an error or no
    ///   user object.
    /// - [`TikTokError::Http`] on network failure.
    /// - [`TikTokError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn user_info(&self, access_token: &str) -> Result<TikTokUser, TikTokError> {
        let mut url = self.api_base.clone();
        url.set_path("v2/user/info/");
        url.query_pairs_mut()
            .append_pair("fields", "display_name,open_id,union_id,avatar_url");

        let response = self
            .client
            .get(url.clone())
            .bearer_auth(access_token)
            .send()
            .await?;
        let body = response.text().await?;
        let body: Value =
            serde_json::from_str(&body).map_err(|e| TikTokError::Deserialize {
                context: url.path().to_owned(),
                source: e,
            })?;

        let Some(user) = body.pointer("/data/user") else {
            return Err(TikTokError::UserInfo(
                error_description(&body).unwrap_or_else(|| "response carried no user".to_owned()),
            ));
        };

        serde_json::from_value(user.clone()).map_err(|e| TikTokError::Deserialize {
            context: "user/info".to_owned(),
            source: e,
        })
    }

    /// Downloads a hosted video into memory so it can be re-uploaded to
    /// TikTok as a multipart file part.
    ///
    /// # Errors
    ///
    /// Returns [`TikTokError::VideoFetch`] on network failure or a non-2xx
    /// status from the video host.
    pub async fn fetch_video(&self, video_url: &str) -> Result<Vec<u8>, TikTokError> {
        let fetch_err = |e: reqwest::Error| TikTokError::VideoFetch(format!("{video_url}: {e}"));
        let response = self
            .client
            .get(video_url)
            .send()
            .await
            .map_err(fetch_err)?
            .error_for_status()
            .map_err(fetch_err)?;
        let bytes = response.bytes().await.map_err(fetch_err)?;
        tracing::debug!(video_url, size = bytes.len(), "fetched source video");
        Ok(bytes.to_vec())
    }

    /// Uploads a video to the authenticated account via the legacy share
    /// endpoint, as a multipart form with a single `video` file part.
    ///
    /// # Errors
    ///
    /// - [`TikTokError::Upload`] if the provider reports a non-zero error
    ///   code.
    /// - [`TikTokError::Http`] on network failure or a non-2xx status.
    /// - [`TikTokError::Deserialize`] if the body is not valid JSON.
    pub async fn upload_video(
        &self,
        access_token: &str,
        open_id: &str,
        video: Vec<u8>,
    ) -> Result<(), TikTokError> {
        let url = self.build_auth_url(
            "share/video/upload/",
            &[("access_token", access_token), ("open_id", open_id)],
        );

        let part = Part::bytes(video).file_name("video.mp4");
        let form = Form::new().part("video", part);

        let response = self
            .client
            .post(url.clone())
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        let body: Value =
            serde_json::from_str(&body).map_err(|e| TikTokError::Deserialize {
                context: url.path().to_owned(),
                source: e,
            })?;

        match body.pointer("/data/err_code").and_then(Value::as_i64) {
            Some(0) | None => Ok(()),
            Some(code) => Err(TikTokError::Upload(
                error_description(&body).unwrap_or_else(|| format!("error code {code}")),
            )),
        }
    }

    /// Builds a request URL on the legacy auth/share host with
    /// percent-encoded query parameters.
    fn build_auth_url(&self, path: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self.auth_base.clone();
        url.set_path(path);
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    /// Sends a GET request and parses the response body as JSON. Application
    /// errors ride inside the `data` object, so no 2xx assertion here.
    async fn get_json(&self, url: Url) -> Result<Value, TikTokError> {
        let context = url.path().to_owned();
        let response = self.client.get(url).send().await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| TikTokError::Deserialize { context, source: e })
    }
}

/// Normalise and parse a base URL, ensuring a trailing slash.
fn parse_base_url(base_url: &str) -> Result<Url, TikTokError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised)
        .map_err(|e| TikTokError::AuthExchange(format!("invalid base URL '{base_url}': {e}")))
}

/// Builds a [`Credential`] from a token-endpoint body
/// (`data.{access_token, refresh_token, open_id}`), or the provider's error
/// description on failure.
fn credential_from_token_body(body: &Value) -> Result<Credential, String> {
    let data = body.get("data").unwrap_or(&Value::Null);
    let Some(access_token) = data.get("access_token").and_then(Value::as_str) else {
        return Err(
            error_description(body).unwrap_or_else(|| "response carried no access token".to_owned())
        );
    };

    Ok(Credential {
        access_token: access_token.to_owned(),
        refresh_token: data
            .get("refresh_token")
            .and_then(Value::as_str)
            .map(ToOwned::to_owned),
        provider_user_id: data
            .get("open_id")
            .and_then(Value::as_str)
            .map(ToOwned::to_owned),
    })
}

/// Extracts the human-readable error description TikTok nests under `data`.
fn error_description(body: &Value) -> Option<String> {
    for pointer in ["/data/description", "/data/err_msg", "/error/message"] {
        if let Some(message) = body.pointer(pointer).and_then(Value::as_str) {
            if !message.is_empty() {
                return Some(message.to_owned());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> TikTokClient {
        TikTokClient::new("key-1", "secret", 30).expect("client construction should not fail")
    }

    #[test]
    fn login_url_targets_connect_endpoint() {
        let client = test_client();
        let scopes = vec!["user.info.basic".to_owned(), "video.upload".to_owned()];
        assert_eq!(
            client.login_url("https://localhost:3000/tiktok/callback", &scopes),
            "https://open-api.tiktok.com/platform/oauth/connect/?client_key=key-1\
             &response_type=code&scope=user.info.basic%2cvideo.upload\
             &redirect_uri=https://localhost:3000/tiktok/callback"
        );
    }

    #[test]
    fn credential_from_token_body_reads_data_object() {
        let body = serde_json::json!({
            "data": {
                "access_token": "tok",
                "refresh_token": "refresh",
                "open_id": "open-1"
            }
        });
        let credential = credential_from_token_body(&body).unwrap();
        assert_eq!(credential.access_token, "tok");
        assert_eq!(credential.refresh_token.as_deref(), Some("refresh"));
        assert_eq!(credential.provider_user_id.as_deref(), Some("open-1"));
    }

    #[test]
    fn credential_from_token_body_surfaces_description() {
        let body = serde_json::json!({
            "data": { "error_code": 10007, "description": "Parameter error." }
        });
        let err = credential_from_token_body(&body).unwrap_err();
        assert_eq!(err, "Parameter error.");
    }

    #[test]
    fn credential_from_token_body_handles_missing_data() {
        let body = serde_json::json!({ "message": "error" });
        let err = credential_from_token_body(&body).unwrap_err();
        assert_eq!(err, "response carried no access token");
    }
}
