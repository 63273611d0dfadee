//! Provider-dispatching access-token refresh.

use clipcast_core::{Credential, Provider};
use clipcast_graph::GraphClient;
use clipcast_tiktok::{TikTokClient, TikTokError};

use crate::error::PublishError;

/// Refreshes a credential for the given provider.
///
/// Instagram exchanges the current access token for a long-lived one (no
/// refresh token involved); TikTok rotates the access token, refresh token,
/// and open id in one exchange. Unknown provider names never reach this far —
/// they fail at [`Provider`] parse time.
///
/// # Errors
///
/// Returns the client's refresh error, or a [`TikTokError::Refresh`] when a
/// TikTok credential carries no refresh token.
pub async fn refresh_credential(
    provider: Provider,
    graph: &GraphClient,
    tiktok: &TikTokClient,
    credential: &Credential,
) -> Result<Credential, PublishError> {
    match provider {
        Provider::Instagram => Ok(graph.refresh_access_token(&credential.access_token).await?),
        Provider::TikTok => {
            let refresh_token = credential.refresh_token.as_deref().ok_or_else(|| {
                PublishError::TikTok(TikTokError::Refresh(
                    "credential carries no refresh token".to_owned(),
                ))
            })?;
            Ok(tiktok.refresh_access_token(refresh_token).await?)
        }
    }
}
