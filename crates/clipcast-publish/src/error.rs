use thiserror::Error;

use clipcast_graph::GraphError;
use clipcast_tiktok::TikTokError;

/// Errors raised by the publish pipeline.
///
/// Client errors pass through transparently; the pipeline adds only the
/// outcomes it detects itself: a page without an Instagram linkage, a
/// container the provider reported as failed, and an exhausted poll budget.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    TikTok(#[from] TikTokError),

    /// The selected Facebook Page has no linked Instagram Business Account.
    #[error("page {page_id} has no linked Instagram business account")]
    NoLinkedAccount { page_id: String },

    /// The provider reported a terminal error for the media container.
    #[error("video upload failed: {message}")]
    UploadFailed { message: String },

    /// The container never reached a terminal status within the poll budget.
    #[error("media container was still processing after {attempts} status checks")]
    PollTimeout { attempts: u32 },
}
