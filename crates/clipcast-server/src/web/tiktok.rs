//! TikTok routes: OAuth connect redirect, callback, and the upload page/form.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use serde::Deserialize;
use tower_cookies::Cookies;

use clipcast_publish::upload_to_tiktok;

use crate::session::TikTokSession;
use crate::web::{views, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tiktok/login", get(login))
        .route("/tiktok/callback", get(callback))
        .route("/tiktok/upload", get(upload_page).post(upload))
}

async fn login(State(state): State<AppState>) -> Redirect {
    Redirect::to(
        &state
            .tiktok
            .login_url(&state.config.tiktok_redirect_uri, &state.config.tiktok_scopes),
    )
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
        return views::landing_page(Some("TikTok login returned no authorization code"))
            .into_response();
    };

    match state.tiktok.exchange_code(&code).await {
        Ok(credential) => {
            let id = state.sessions.session_id(&cookies);
            state
                .sessions
                .update(id, |s| {
                    s.tiktok = Some(TikTokSession {
                        credential,
                        user: None,
                    });
                })
                .await;
            Redirect::to("/tiktok/upload").into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "tiktok code exchange failed");
            views::landing_page(Some(&e.to_string())).into_response()
        }
    }
}

async fn upload_page(State(state): State<AppState>, cookies: Cookies) -> Response {
    let id = state.sessions.session_id(&cookies);
    let Some(tiktok) = state.sessions.get(id).await.tiktok else {
        return Redirect::to("/").into_response();
    };

    match state.tiktok.user_info(&tiktok.credential.access_token).await {
        Ok(user) => {
            state
                .sessions
                .update(id, |s| {
                    if let Some(tiktok) = s.tiktok.as_mut() {
                        tiktok.user = Some(user.clone());
                    }
                })
                .await;
            views::upload_page(Some(&user), None, None).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "tiktok user info lookup failed");
            views::landing_page(Some(&e.to_string())).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
struct UploadForm {
    video_url: String,
}

async fn upload(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(form): Form<UploadForm>,
) -> Response {
    let id = state.sessions.session_id(&cookies);
    let Some(tiktok) = state.sessions.get(id).await.tiktok else {
        return Redirect::to("/").into_response();
    };

    let result = upload_to_tiktok(&state.tiktok, &tiktok.credential, &form.video_url).await;

    if result.is_success() {
        views::upload_page(
            tiktok.user.as_ref(),
            Some("Video uploaded successfully"),
            None,
        )
        .into_response()
    } else {
        views::upload_page(tiktok.user.as_ref(), None, result.error_message.as_deref())
            .into_response()
    }
}
