//! In-memory, cookie-keyed session store.
//!
//! State lives for the process lifetime only; losing it just means the user
//! logs in again. The two providers' states are kept separate so one login
//! cannot clobber the other's token.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tower_cookies::cookie::SameSite;
use tower_cookies::{Cookie, Cookies};
use uuid::Uuid;

use clipcast_core::{Credential, LinkedAccount};
use clipcast_tiktok::TikTokUser;

pub const SESSION_COOKIE: &str = "clipcast_session";

#[derive(Debug, Clone, Default)]
pub struct SessionData {
    pub instagram: Option<InstagramSession>,
    pub tiktok: Option<TikTokSession>,
}

#[derive(Debug, Clone)]
pub struct InstagramSession {
    pub credential: Credential,
    /// Last resolved destination list, re-rendered on publish failures.
    pub accounts: Vec<LinkedAccount>,
}

#[derive(Debug, Clone)]
pub struct TikTokSession {
    pub credential: Credential,
    pub user: Option<TikTokUser>,
}

#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<Uuid, SessionData>>>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the session id carried by the request cookie, creating a new
    /// id (and setting the cookie) when absent or unparsable.
    pub fn session_id(&self, cookies: &Cookies) -> Uuid {
        if let Some(id) = cookies
            .get(SESSION_COOKIE)
            .and_then(|c| c.value().parse::<Uuid>().ok())
        {
            return id;
        }

        let id = Uuid::new_v4();
        let cookie = Cookie::build((SESSION_COOKIE, id.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build();
        cookies.add(cookie);
        id
    }

    /// Returns a snapshot of the session's data, or an empty default for an
    /// unknown id.
    pub async fn get(&self, id: Uuid) -> SessionData {
        self.inner.lock().await.get(&id).cloned().unwrap_or_default()
    }

    /// Applies a mutation to the session's data, creating the entry if needed.
    pub async fn update<F>(&self, id: Uuid, apply: F)
    where
        F: FnOnce(&mut SessionData),
    {
        let mut sessions = self.inner.lock().await;
        apply(sessions.entry(id).or_default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential(token: &str) -> Credential {
        Credential {
            access_token: token.to_owned(),
            refresh_token: None,
            provider_user_id: None,
        }
    }

    #[tokio::test]
    async fn unknown_session_id_yields_empty_data() {
        let store = SessionStore::new();
        let data = store.get(Uuid::new_v4()).await;
        assert!(data.instagram.is_none());
        assert!(data.tiktok.is_none());
    }

    #[tokio::test]
    async fn update_round_trips_session_data() {
        let store = SessionStore::new();
        let id = Uuid::new_v4();

        store
            .update(id, |s| {
                s.instagram = Some(InstagramSession {
                    credential: credential("tok-ig"),
                    accounts: Vec::new(),
                });
            })
            .await;

        let data = store.get(id).await;
        assert_eq!(
            data.instagram.map(|s| s.credential.access_token).as_deref(),
            Some("tok-ig")
        );
    }

    #[tokio::test]
    async fn provider_states_do_not_clobber_each_other() {
        let store = SessionStore::new();
        let id = Uuid::new_v4();

        store
            .update(id, |s| {
                s.instagram = Some(InstagramSession {
                    credential: credential("tok-ig"),
                    accounts: Vec::new(),
                });
            })
            .await;
        store
            .update(id, |s| {
                s.tiktok = Some(TikTokSession {
                    credential: credential("tok-tt"),
                    user: None,
                });
            })
            .await;

        let data = store.get(id).await;
        assert_eq!(
            data.instagram.map(|s| s.credential.access_token).as_deref(),
            Some("tok-ig")
        );
        assert_eq!(
            data.tiktok.map(|s| s.credential.access_token).as_deref(),
            Some("tok-tt")
        );
    }
}
