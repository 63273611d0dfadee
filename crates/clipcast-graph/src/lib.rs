//! Facebook Graph API client for Instagram Reels publishing.
//!
//! One method per Graph operation: OAuth code exchange, page/business-account
//! listing, username lookup, Reels media-container creation, container status,
//! media publish, and the long-lived token refresh. No retry logic lives here;
//! the publish pipeline owns the status-polling loop.

mod client;
mod error;
mod types;

pub use client::GraphClient;
pub use error::GraphError;
pub use types::{BusinessAccount, ContainerStatus, ContainerStatusCode};
