//! Bounded status polling for media-container ingestion.
//!
//! Converts the provider-side transcoding job into a synchronous result for
//! the workflow: poll up to `max_attempts` times at a fixed interval, exit
//! early on the first terminal status.

use std::time::Duration;

use clipcast_graph::{ContainerStatusCode, GraphClient};

use crate::error::PublishError;

/// Attempt budget and cadence for one polling run.
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollPolicy {
    /// 30 attempts at 1 s, for a ~30 s worst-case wait.
    fn default() -> Self {
        Self {
            max_attempts: 30,
            interval: Duration::from_secs(1),
        }
    }
}

impl PollPolicy {
    #[must_use]
    pub fn new(max_attempts: u32, interval_ms: u64) -> Self {
        Self {
            max_attempts,
            interval: Duration::from_millis(interval_ms),
        }
    }
}

/// Polls a media container until it reaches a terminal status.
///
/// Each tick fetches the container status once. The loop sleeps only between
/// attempts, so a terminal result on the final attempt pays no trailing wait.
///
/// # Errors
///
/// - [`PublishError::UploadFailed`] as soon as the provider reports a
///   terminal error — remaining budget is not consumed.
/// - [`PublishError::PollTimeout`] if the budget is exhausted without a
///   terminal status.
/// - [`PublishError::Graph`] if a status check itself fails, including the
///   malformed-payload case — a payload with no recognizable status must not
///   read as still-pending.
pub async fn poll_until_finished(
    graph: &GraphClient,
    access_token: &str,
    container_id: &str,
    policy: PollPolicy,
) -> Result<(), PublishError> {
    for attempt in 1..=policy.max_attempts {
        let status = graph.container_status(access_token, container_id).await?;

        match status.code {
            ContainerStatusCode::Finished => {
                tracing::debug!(container_id, attempt, "media container finished");
                return Ok(());
            }
            ContainerStatusCode::Error => {
                return Err(PublishError::UploadFailed {
                    message: status
                        .error_message
                        .unwrap_or_else(|| "Unknown error".to_owned()),
                });
            }
            ContainerStatusCode::InProgress => {
                if attempt < policy.max_attempts {
                    tokio::time::sleep(policy.interval).await;
                }
            }
        }
    }

    Err(PublishError::PollTimeout {
        attempts: policy.max_attempts,
    })
}
