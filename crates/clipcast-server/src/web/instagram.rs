//! Instagram routes: Facebook Login redirect, OAuth callback, and the Reels
//! publish page/form.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use serde::Deserialize;
use tower_cookies::Cookies;

use clipcast_publish::{publish_video, resolve_destinations, PublishTarget};

use crate::session::InstagramSession;
use crate::web::{views, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/insta/login", get(login))
        .route("/insta/callback", get(callback))
        .route("/insta/publish", get(publish_page).post(publish))
}

async fn login(State(state): State<AppState>) -> Redirect {
    Redirect::to(&state.graph.login_url(&state.config.fb_scopes))
}

#[derive(Debug, Deserialize)]
struct CallbackQuery {
    code: Option<String>,
}

async fn callback(
    State(state): State<AppState>,
    cookies: Cookies,
    Query(query): Query<CallbackQuery>,
) -> Response {
    let Some(code) = query.code else {
        return views::landing_page(Some("Facebook login returned no authorization code"))
            .into_response();
    };

    match state.graph.exchange_code(&code).await {
        Ok(credential) => {
            let id = state.sessions.session_id(&cookies);
            state
                .sessions
                .update(id, |s| {
                    s.instagram = Some(InstagramSession {
                        credential,
                        accounts: Vec::new(),
                    });
                })
                .await;
            Redirect::to("/insta/publish").into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "facebook code exchange failed");
            views::landing_page(Some(&e.to_string())).into_response()
        }
    }
}

async fn publish_page(State(state): State<AppState>, cookies: Cookies) -> Response {
    let id = state.sessions.session_id(&cookies);
    let Some(instagram) = state.sessions.get(id).await.instagram else {
        return Redirect::to("/").into_response();
    };

    match resolve_destinations(&state.graph, &instagram.credential.access_token).await {
        Ok(accounts) => {
            state
                .sessions
                .update(id, |s| {
                    if let Some(instagram) = s.instagram.as_mut() {
                        instagram.accounts.clone_from(&accounts);
                    }
                })
                .await;
            views::publish_page(&accounts, None, None).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "destination resolution failed");
            views::landing_page(Some(&e.to_string())).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
struct PublishForm {
    ig_user_id: String,
    video_url: String,
}

async fn publish(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(form): Form<PublishForm>,
) -> Response {
    let id = state.sessions.session_id(&cookies);
    let Some(instagram) = state.sessions.get(id).await.instagram else {
        return Redirect::to("/").into_response();
    };

    let target = PublishTarget::BusinessAccount(form.ig_user_id);
    let result = publish_video(
        &state.graph,
        &instagram.credential,
        &target,
        &form.video_url,
        state.poll_policy,
    )
    .await;

    if result.is_success() {
        let media_id = result.published_media_id.unwrap_or_default();
        views::publish_page(
            &instagram.accounts,
            Some(&format!("Video #{media_id} published successfully")),
            None,
        )
        .into_response()
    } else {
        views::publish_page(
            &instagram.accounts,
            None,
            result.error_message.as_deref(),
        )
        .into_response()
    }
}
