//! HTTP client for the Facebook Graph API.
//!
//! Wraps `reqwest` with Graph-specific error handling and typed response
//! deserialization. Graph reports application errors as an `error` object in
//! the JSON body (often with a non-2xx HTTP status), so responses are parsed
//! before any status check and error payloads surface as the calling
//! operation's [`GraphError`] variant, carrying the provider's message.

use std::time::Duration;

use reqwest::{Client, Method, Url};
use serde_json::Value;

use clipcast_core::Credential;

use crate::error::GraphError;
use crate::types::{AccountsResponse, BusinessAccount, ContainerStatus, ContainerStatusCode};

const DEFAULT_BASE_URL: &str = "https://graph.facebook.com/";

/// Facebook Login consent dialog. Built as a redirect URL, never fetched.
const DIALOG_URL: &str = "https://www.facebook.com/dialog/oauth";

/// Client for the Facebook Graph API.
///
/// Holds the app credentials, the redirect URI registered with the app, and
/// the Graph API version used for versioned endpoints. Use
/// [`GraphClient::new`] for production or [`GraphClient::with_base_url`] to
/// point at a mock server in tests.
pub struct GraphClient {
    client: Client,
    app_id: String,
    api_secret: String,
    redirect_uri: String,
    api_version: String,
    base_url: Url,
}

impl GraphClient {
    /// Creates a new client pointed at the production Graph API.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        app_id: &str,
        api_secret: &str,
        redirect_uri: &str,
        api_version: &str,
        timeout_secs: u64,
    ) -> Result<Self, GraphError> {
        Self::with_base_url(
            app_id,
            api_secret,
            redirect_uri,
            api_version,
            timeout_secs,
            DEFAULT_BASE_URL,
        )
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GraphError::AuthExchange`] if `base_url`
    /// is not a valid URL.
    pub fn with_base_url(
        app_id: &str,
        api_secret: &str,
        redirect_uri: &str,
        api_version: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, GraphError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("clipcast/0.1 (reels-publishing)")
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // set_path writes from the root rather than replacing a trailing
        // segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| GraphError::AuthExchange(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            app_id: app_id.to_owned(),
            api_secret: api_secret.to_owned(),
            redirect_uri: redirect_uri.to_owned(),
            api_version: api_version.to_owned(),
            base_url,
        })
    }

    /// Builds the Facebook Login redirect URL for the given scopes.
    ///
    /// Scopes are joined with a literal `%2c` and the remaining parameters are
    /// inserted verbatim — the parameter set the Login dialog expects.
    #[must_use]
    pub fn login_url(&self, scopes: &[String]) -> String {
        let scope = scopes.join("%2c");
        format!(
            "{DIALOG_URL}?app_id={app_id}&scope={scope}&client_id={app_id}&redirect_uri={redirect_uri}&response_type=code",
            app_id = self.app_id,
            redirect_uri = self.redirect_uri,
        )
    }

    /// Exchanges an OAuth authorization code for an access token.
    ///
    /// Calls the unversioned `GET /oauth/access_token` endpoint.
    ///
    /// # Errors
    ///
    /// - [`GraphError::AuthExchange`] if the provider returns an error payload
    ///   or no access token.
    /// - [`GraphError::Http`] on network failure.
    /// - [`GraphError::Deserialize`] if the body is not valid JSON.
    pub async fn exchange_code(&self, code: &str) -> Result<Credential, GraphError> {
        let url = self.build_url(
            "oauth/access_token",
            &[
                ("client_id", self.app_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("client_secret", self.api_secret.as_str()),
                ("code", code),
            ],
        );
        let body = self.request_json(Method::GET, url).await?;
        if let Some(message) = graph_error_message(&body) {
            return Err(GraphError::AuthExchange(message));
        }

        let access_token = body
            .get("access_token")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                GraphError::AuthExchange("response carried no access_token".to_owned())
            })?;

        Ok(Credential {
            access_token: access_token.to_owned(),
            refresh_token: None,
            provider_user_id: None,
        })
    }

    /// Lists the user's Facebook Pages that have a linked Instagram Business
    /// Account. Pages without the linkage are filtered out.
    ///
    /// # Errors
    ///
    /// - [`GraphError::AccountLookup`] if the provider returns an error payload.
    /// - [`GraphError::Http`] on network failure.
    /// - [`GraphError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn list_accounts(
        &self,
        access_token: &str,
    ) -> Result<Vec<BusinessAccount>, GraphError> {
        let url = self.build_url(
            &format!("{}/me/accounts", self.api_version),
            &[
                ("fields", "instagram_business_account,name"),
                ("access_token", access_token),
            ],
        );
        let body = self.request_json(Method::GET, url).await?;
        if let Some(message) = graph_error_message(&body) {
            return Err(GraphError::AccountLookup(message));
        }

        let envelope: AccountsResponse =
            serde_json::from_value(body).map_err(|e| GraphError::Deserialize {
                context: "me/accounts".to_owned(),
                source: e,
            })?;

        Ok(envelope
            .data
            .into_iter()
            .filter_map(|page| {
                page.instagram_business_account.map(|ig| BusinessAccount {
                    id: ig.id,
                    name: page.name,
                })
            })
            .collect())
    }

    /// Looks up the Instagram username for a business account id.
    ///
    /// # Errors
    ///
    /// - [`GraphError::AccountLookup`] if the provider returns an error
    ///   payload or no username.
    /// - [`GraphError::Http`] on network failure.
    /// - [`GraphError::Deserialize`] if the body is not valid JSON.
    pub async fn account_username(
        &self,
        access_token: &str,
        ig_user_id: &str,
    ) -> Result<String, GraphError> {
        let url = self.build_url(
            &format!("{}/{ig_user_id}", self.api_version),
            &[("fields", "username"), ("access_token", access_token)],
        );
        let body = self.request_json(Method::GET, url).await?;
        if let Some(message) = graph_error_message(&body) {
            return Err(GraphError::AccountLookup(message));
        }

        body.get("username")
            .and_then(Value::as_str)
            .map(ToOwned::to_owned)
            .ok_or_else(|| {
                GraphError::AccountLookup(format!("account {ig_user_id} carried no username"))
            })
    }

    /// Resolves the Instagram Business Account id linked to a Facebook Page,
    /// if any.
    ///
    /// # Errors
    ///
    /// - [`GraphError::AccountLookup`] if the provider returns an error payload.
    /// - [`GraphError::Http`] on network failure.
    /// - [`GraphError::Deserialize`] if the body is not valid JSON.
    pub async fn instagram_user_for_page(
        &self,
        access_token: &str,
        page_id: &str,
    ) -> Result<Option<String>, GraphError> {
        let url = self.build_url(
            &format!("{}/{page_id}", self.api_version),
            &[
                ("fields", "instagram_business_account"),
                ("access_token", access_token),
            ],
        );
        let body = self.request_json(Method::GET, url).await?;
        if let Some(message) = graph_error_message(&body) {
            return Err(GraphError::AccountLookup(message));
        }

        Ok(body
            .get("instagram_business_account")
            .and_then(|ig| ig.get("id"))
            .and_then(Value::as_str)
            .map(ToOwned::to_owned))
    }

    /// Submits a remote video URL for asynchronous Reels ingestion and returns
    /// the media container id.
    ///
    /// # Errors
    ///
    /// - [`GraphError::ContainerCreation`] if the provider returns an error
    ///   payload or no container id.
    /// - [`GraphError::Http`] on network failure.
    /// - [`GraphError::Deserialize`] if the body is not valid JSON.
    pub async fn create_media_container(
        &self,
        access_token: &str,
        ig_user_id: &str,
        video_url: &str,
    ) -> Result<String, GraphError> {
        let url = self.build_url(
            &format!("{}/{ig_user_id}/media", self.api_version),
            &[
                ("media_type", "REELS"),
                ("video_url", video_url),
                ("access_token", access_token),
            ],
        );
        let body = self.request_json(Method::POST, url).await?;
        if let Some(message) = graph_error_message(&body) {
            return Err(GraphError::ContainerCreation(message));
        }

        body.get("id")
            .and_then(Value::as_str)
            .map(ToOwned::to_owned)
            .ok_or_else(|| {
                GraphError::ContainerCreation("response carried no container id".to_owned())
            })
    }

    /// Fetches the current ingestion status of a media container. One poll
    /// tick — the bounded loop lives in the publish pipeline.
    ///
    /// An `error` payload or `status_code: ERROR` maps to
    /// [`ContainerStatusCode::Error`] with the provider's message; any other
    /// status code is [`ContainerStatusCode::InProgress`]. A payload with
    /// neither an error nor a status code fails with
    /// [`GraphError::StatusCheck`] rather than being treated as still pending.
    ///
    /// # Errors
    ///
    /// - [`GraphError::StatusCheck`] on a malformed status payload.
    /// - [`GraphError::Http`] on network failure.
    /// - [`GraphError::Deserialize`] if the body is not valid JSON.
    pub async fn container_status(
        &self,
        access_token: &str,
        container_id: &str,
    ) -> Result<ContainerStatus, GraphError> {
        let url = self.build_url(
            &format!("{}/{container_id}", self.api_version),
            &[("fields", "status_code"), ("access_token", access_token)],
        );
        let body = self.request_json(Method::GET, url).await?;

        if let Some(message) = graph_error_message(&body) {
            return Ok(ContainerStatus {
                code: ContainerStatusCode::Error,
                error_message: Some(message),
            });
        }

        match body.get("status_code").and_then(Value::as_str) {
            Some("FINISHED") => Ok(ContainerStatus {
                code: ContainerStatusCode::Finished,
                error_message: None,
            }),
            Some("ERROR") => Ok(ContainerStatus {
                code: ContainerStatusCode::Error,
                error_message: None,
            }),
            Some(other) => {
                tracing::debug!(container_id, status_code = other, "container still pending");
                Ok(ContainerStatus {
                    code: ContainerStatusCode::InProgress,
                    error_message: None,
                })
            }
            None => Err(GraphError::StatusCheck(format!(
                "status payload for container {container_id} carried neither status_code nor error"
            ))),
        }
    }

    /// Publishes a finished media container, making it a live post. Returns
    /// the published media id.
    ///
    /// # Errors
    ///
    /// - [`GraphError::Publish`] if the provider returns an error payload or
    ///   no media id.
    /// - [`GraphError::Http`] on network failure.
    /// - [`GraphError::Deserialize`] if the body is not valid JSON.
    pub async fn publish_media(
        &self,
        access_token: &str,
        ig_user_id: &str,
        container_id: &str,
    ) -> Result<String, GraphError> {
        let url = self.build_url(
            &format!("{}/{ig_user_id}/media_publish", self.api_version),
            &[
                ("creation_id", container_id),
                ("access_token", access_token),
            ],
        );
        let body = self.request_json(Method::POST, url).await?;
        if let Some(message) = graph_error_message(&body) {
            return Err(GraphError::Publish(message));
        }

        body.get("id")
            .and_then(Value::as_str)
            .map(ToOwned::to_owned)
            .ok_or_else(|| GraphError::Publish("response carried no media id".to_owned()))
    }

    /// Exchanges an access token for a long-lived one
    /// (`grant_type=fb_exchange_token`).
    ///
    /// The exchange returns only an access token, so the resulting credential
    /// carries no refresh token.
    ///
    /// # Errors
    ///
    /// - [`GraphError::Refresh`] if the provider returns an error payload or
    ///   no access token.
    /// - [`GraphError::Http`] on network failure.
    /// - [`GraphError::Deserialize`] if the body is not valid JSON.
    pub async fn refresh_access_token(
        &self,
        access_token: &str,
    ) -> Result<Credential, GraphError> {
        let url = self.build_url(
            &format!("{}/oauth/access_token", self.api_version),
            &[
                ("grant_type", "fb_exchange_token"),
                ("client_id", self.app_id.as_str()),
                ("client_secret", self.api_secret.as_str()),
                ("fb_exchange_token", access_token),
            ],
        );
        let body = self.request_json(Method::GET, url).await?;
        if let Some(message) = graph_error_message(&body) {
            return Err(GraphError::Refresh(message));
        }

        let access_token = body
            .get("access_token")
            .and_then(Value::as_str)
            .ok_or_else(|| GraphError::Refresh("response carried no access_token".to_owned()))?;

        Ok(Credential {
            access_token: access_token.to_owned(),
            refresh_token: None,
            provider_user_id: None,
        })
    }

    /// Builds a full request URL with properly percent-encoded query
    /// parameters via [`Url::query_pairs_mut`].
    fn build_url(&self, path: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(path);
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    /// Sends a request and parses the response body as JSON.
    ///
    /// Does not assert a 2xx status: Graph pairs error payloads with 4xx
    /// statuses and the callers want the payload's message either way.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Http`] on network failure and
    /// [`GraphError::Deserialize`] if the body is not valid JSON.
    async fn request_json(&self, method: Method, url: Url) -> Result<Value, GraphError> {
        let context = format!("{} {}", method, url.path());
        let response = self.client.request(method, url).send().await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| GraphError::Deserialize { context, source: e })
    }
}

/// Extracts the message from a Graph `error` payload, if present.
///
/// An error object without a message still counts as an error, with the
/// provider's conventional "Unknown error" placeholder.
fn graph_error_message(body: &Value) -> Option<String> {
    body.get("error").map(|error| {
        error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Unknown error")
            .to_owned()
    })
}
