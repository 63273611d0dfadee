//! TikTok Open API client.
//!
//! OAuth code exchange and refresh against the legacy `open-api.tiktok.com`
//! host, user info against `open.tiktokapis.com/v2`, and the multipart video
//! upload. Both hosts are injectable for tests.

mod client;
mod error;

pub use client::{TikTokClient, TikTokUser};
pub use error::TikTokError;
