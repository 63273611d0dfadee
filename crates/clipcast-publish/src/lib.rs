//! The asynchronous publish pipeline.
//!
//! Orchestrates one submitted video for one authenticated account:
//! destination resolution (with best-effort handle enrichment), Reels
//! media-container creation, the bounded status-polling loop, and the
//! finalizing publish call. Every failure collapses into a user-facing
//! [`PublishResult`] at the workflow boundary; raw client errors never reach
//! the web layer.

mod destinations;
mod error;
mod poller;
mod refresh;
mod workflow;

pub use destinations::resolve_destinations;
pub use error::PublishError;
pub use poller::{poll_until_finished, PollPolicy};
pub use refresh::refresh_credential;
pub use workflow::{publish_video, upload_to_tiktok, PublishOutcome, PublishResult, PublishTarget};
