//! The publish workflows: Instagram Reels and TikTok upload.
//!
//! Each workflow is a strict step sequence; a failure at any step aborts the
//! remainder and maps into a [`PublishResult`] failure. There is no retry and
//! no rollback — a created-but-unpublished container is abandoned and the
//! provider garbage-collects it.

use clipcast_core::Credential;
use clipcast_graph::GraphClient;
use clipcast_tiktok::{TikTokClient, TikTokError};

use crate::error::PublishError;
use crate::poller::{poll_until_finished, PollPolicy};

/// Where a video should land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishTarget {
    /// An Instagram Business Account id, ready to publish onto.
    BusinessAccount(String),
    /// A Facebook Page id; its linked business account is resolved first and
    /// the workflow fails if the page has none.
    Page(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Success,
    Failure,
}

/// Terminal result of one workflow run, rendered by the web layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishResult {
    pub outcome: PublishOutcome,
    pub published_media_id: Option<String>,
    pub error_message: Option<String>,
}

impl PublishResult {
    #[must_use]
    pub fn success(published_media_id: Option<String>) -> Self {
        Self {
            outcome: PublishOutcome::Success,
            published_media_id,
            error_message: None,
        }
    }

    #[must_use]
    pub fn failure(error_message: impl Into<String>) -> Self {
        Self {
            outcome: PublishOutcome::Failure,
            published_media_id: None,
            error_message: Some(error_message.into()),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcome == PublishOutcome::Success
    }
}

/// Publishes a hosted video to Instagram Reels.
///
/// Steps, each depending on the prior succeeding: resolve the target to a
/// business-account id, create the media container, poll until the container
/// is finished, publish. The finalize call runs only after a successful poll,
/// so at most one publish happens per container.
pub async fn publish_video(
    graph: &GraphClient,
    credential: &Credential,
    target: &PublishTarget,
    video_url: &str,
    policy: PollPolicy,
) -> PublishResult {
    match run_publish(graph, credential, target, video_url, policy).await {
        Ok(media_id) => {
            tracing::info!(media_id, "video published");
            PublishResult::success(Some(media_id))
        }
        Err(e) => {
            tracing::warn!(error = %e, video_url, "publish workflow failed");
            PublishResult::failure(e.to_string())
        }
    }
}

async fn run_publish(
    graph: &GraphClient,
    credential: &Credential,
    target: &PublishTarget,
    video_url: &str,
    policy: PollPolicy,
) -> Result<String, PublishError> {
    let token = credential.access_token.as_str();

    let ig_user_id = match target {
        PublishTarget::BusinessAccount(id) => id.clone(),
        PublishTarget::Page(page_id) => graph
            .instagram_user_for_page(token, page_id)
            .await?
            .ok_or_else(|| PublishError::NoLinkedAccount {
                page_id: page_id.clone(),
            })?,
    };

    let container_id = graph
        .create_media_container(token, &ig_user_id, video_url)
        .await?;
    tracing::debug!(container_id, ig_user_id, "media container created");

    poll_until_finished(graph, token, &container_id, policy).await?;

    let media_id = graph.publish_media(token, &ig_user_id, &container_id).await?;
    Ok(media_id)
}

/// Uploads a hosted video to the authenticated TikTok account: fetch the
/// video bytes, then re-upload them as a multipart form.
///
/// TikTok's share endpoint returns no public media id, so a successful result
/// carries none.
pub async fn upload_to_tiktok(
    tiktok: &TikTokClient,
    credential: &Credential,
    video_url: &str,
) -> PublishResult {
    match run_upload(tiktok, credential, video_url).await {
        Ok(()) => {
            tracing::info!(video_url, "video uploaded to TikTok");
            PublishResult::success(None)
        }
        Err(e) => {
            tracing::warn!(error = %e, video_url, "TikTok upload workflow failed");
            PublishResult::failure(e.to_string())
        }
    }
}

async fn run_upload(
    tiktok: &TikTokClient,
    credential: &Credential,
    video_url: &str,
) -> Result<(), PublishError> {
    let open_id = credential.provider_user_id.as_deref().ok_or_else(|| {
        PublishError::TikTok(TikTokError::Upload("credential carries no open id".to_owned()))
    })?;

    let video = tiktok.fetch_video(video_url).await?;
    tiktok
        .upload_video(&credential.access_token, open_id, video)
        .await?;
    Ok(())
}
