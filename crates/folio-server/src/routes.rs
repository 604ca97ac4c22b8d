//! Route handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE, COOKIE, SET_COOKIE},
    },
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::json;

use folio_core::{Certificate, Comment, Project, ProjectDetail, ViewHandle};
use folio_site::typewriter::{DELETING_DELAY, PAUSE_DELAY, TYPING_DELAY};
use folio_site::{
    CommentDraft, ImageAttachment, Route, SESSION_COOKIE, SPLASH_COOKIE, format_relative,
};

use crate::error::ApiError;
use crate::state::AppState;

type AppResult<T> = Result<T, ApiError>;

// ============================================================================
// Landing
// ============================================================================

#[derive(Deserialize)]
pub struct LandingQuery {
    #[serde(default)]
    all: bool,
}

#[derive(Serialize)]
struct ProjectCard<'a> {
    #[serde(flatten)]
    project: &'a Project,
    href: String,
}

pub async fn landing_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LandingQuery>,
    headers: HeaderMap,
) -> Response {
    let session = cookie_value(&headers, SESSION_COOKIE);
    let show_splash = state
        .site
        .splash
        .first_visit(cookie_value(&headers, SPLASH_COOKIE).as_deref());

    let view = ViewHandle::mounted("landing");
    let synced = state.site.synchronizer.sync(&view).await.is_ok();
    let lists = state.site.synchronizer.view();
    view.unmount();

    let config = &state.site.config().site;
    let projects: Vec<ProjectCard<'_>> = lists
        .projects_page(config.initial_items, query.all)
        .iter()
        .map(|project| ProjectCard {
            project,
            href: Route::ProjectDetail(project.id.clone()).href(),
        })
        .collect();
    let certificates: &[Certificate] = lists.certificates_page(config.initial_items, query.all);

    let body = json!({
        "splash": {
            "show": show_splash,
            "duration_ms": state.site.splash.duration().as_millis() as u64,
        },
        "typewriter": {
            "words": config.typewriter_words,
            "typing_ms": TYPING_DELAY.as_millis() as u64,
            "pause_ms": PAUSE_DELAY.as_millis() as u64,
            "deleting_ms": DELETING_DELAY.as_millis() as u64,
        },
        "synced": synced,
        "about": state.site.about(),
        "initial_items": config.initial_items,
        "project_count": lists.projects.len(),
        "certificate_count": lists.certificates.len(),
        "projects": projects,
        "certificates": certificates,
    });

    let mut cookies = Vec::new();
    if session.is_none() {
        let id = uuid::Uuid::new_v4();
        cookies.push(format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax"));
    }
    if show_splash {
        cookies.push(state.site.splash.seen_cookie());
    }

    let mut response = Json(body).into_response();
    for cookie in cookies {
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(SET_COOKIE, value);
        }
    }
    response
}

/// Value of the cookie `name` from the request, if present and non-empty.
fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

// ============================================================================
// About
// ============================================================================

pub async fn about_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.site.about())
}

// ============================================================================
// Project detail
// ============================================================================

#[derive(Serialize)]
struct DetailBody {
    #[serde(flatten)]
    detail: ProjectDetail,
    live_demo_available: bool,
    is_private: bool,
    technology_count: usize,
    feature_count: usize,
}

pub async fn project_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    let found = match state.site.resolver.resolve_or_fetch(&id).await {
        Ok(found) => found,
        Err(e) => {
            tracing::warn!(id = %id, error = %e, "Project lookup fell back to loading state");
            None
        }
    };

    match found {
        Some(detail) => Json(DetailBody {
            live_demo_available: detail.live_demo().is_some(),
            is_private: detail.is_private(),
            technology_count: detail.technology_count(),
            feature_count: detail.feature_count(),
            detail,
        })
        .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "state": "loading", "id": id })),
        )
            .into_response(),
    }
}

// ============================================================================
// Comments
// ============================================================================

#[derive(Serialize)]
struct CommentView {
    #[serde(flatten)]
    comment: Comment,
    relative: String,
}

fn render_comments(comments: Vec<Comment>, now: DateTime<Utc>) -> Vec<CommentView> {
    comments
        .into_iter()
        .map(|comment| CommentView {
            relative: format_relative(now, comment.created_at),
            comment,
        })
        .collect()
}

pub async fn comments_handler(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    let mut feed = state.site.comments.subscribe().await?;
    let comments = feed.next().await.map(<[Comment]>::to_vec).unwrap_or_default();
    feed.release();

    let comments = render_comments(comments, state.clock.now());
    Ok(Json(json!({ "count": comments.len(), "comments": comments })).into_response())
}

pub async fn comments_stream_handler(
    State(state): State<Arc<AppState>>,
) -> AppResult<Sse<impl Stream<Item = Result<Event, axum::Error>>>> {
    let feed = state.site.comments.subscribe().await?;
    let clock = state.clock.clone();

    let events = feed.map(move |comments| {
        Event::default()
            .event("comments")
            .json_data(render_comments(comments, clock.now()))
    });
    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

#[derive(Deserialize)]
pub struct ImagePayload {
    #[serde(rename = "fileName")]
    file_name: String,
    /// Base64 file contents
    data: String,
}

#[derive(Deserialize)]
pub struct CommentPayload {
    #[serde(rename = "userName", default)]
    user_name: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    image: Option<ImagePayload>,
}

/// Submissions are gated per visitor session; a request without a session
/// cookie is its own visitor.
pub async fn post_comment_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<CommentPayload>,
) -> AppResult<Response> {
    let session = cookie_value(&headers, SESSION_COOKIE)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let mut draft = CommentDraft::new(payload.user_name, payload.content);
    if let Some(image) = payload.image {
        let bytes = STANDARD
            .decode(image.data.as_bytes())
            .map_err(|e| ApiError::MalformedPayload(format!("image data is not base64: {e}")))?;
        draft = draft.with_image(ImageAttachment::new(image.file_name, bytes));
    }

    let id = state.site.comments.submit_for(&session, draft).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))).into_response())
}

// ============================================================================
// Resume and health
// ============================================================================

pub async fn resume_handler(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    let bytes = tokio::fs::read(&state.resume_path).await.map_err(|e| {
        tracing::warn!(path = %state.resume_path.display(), error = %e, "Resume not readable");
        ApiError::NotFound("resume".to_string())
    })?;

    let file_name = state
        .resume_path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("resume.pdf");
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{file_name}\""))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    Ok((
        [
            (CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

pub async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({ "status": "ok", "remote": state.site.remote().name() }))
}
