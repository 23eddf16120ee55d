//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Session-bound handlers resolve (or open) the session first, then lock it
//! only for the duration of the call.

use std::sync::Arc;
use axum::{extract::{Path, Query, State}, http::StatusCode, Json, response::IntoResponse};
use tracing::{info, instrument};

use crate::domain::SkillCategory;
use crate::protocol::*;
use crate::state::AppState;
use crate::logic::*;

#[instrument(level = "info", skip(state))]
pub async fn http_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(HealthOut {
    ok: true,
    provider: state.provider_name().to_string(),
    sessions: state.session_count().await,
  })
}

#[instrument(level = "info", skip(state))]
pub async fn http_open_session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let session_id = state.open_session().await;
  info!(target: "canvas", %session_id, "HTTP session opened");
  Json(SessionOut { session_id })
}

#[instrument(level = "info", skip(state))]
pub async fn http_close_session(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> impl IntoResponse {
  if state.close_session(&id).await {
    info!(target: "canvas", session_id = %id, "HTTP session closed");
    StatusCode::NO_CONTENT
  } else {
    StatusCode::NOT_FOUND
  }
}

#[instrument(level = "info", skip(state, body), fields(session_id = ?body.session_id, title_len = body.title.len()))]
pub async fn http_set_challenge(
  State(state): State<Arc<AppState>>,
  Json(body): Json<SetChallengeIn>,
) -> impl IntoResponse {
  let (session_id, session) = state.session(body.session_id.as_deref()).await;
  let mut s = session.lock().await;
  let out = set_challenge(&mut s, &body.title, &body.description);
  let ok = out.is_accepted();
  Json(ChallengeOut {
    session_id,
    ok,
    message: out.message().to_string(),
    challenge: if ok { s.selected_challenge.clone() } else { None },
  })
}

#[instrument(level = "info", skip(state, body), fields(session_id = ?body.session_id, index = body.index))]
pub async fn http_select_challenge(
  State(state): State<Arc<AppState>>,
  Json(body): Json<SelectChallengeIn>,
) -> impl IntoResponse {
  let (session_id, session) = state.session(body.session_id.as_deref()).await;
  let mut s = session.lock().await;
  let out = select_challenge(&mut s, body.index);
  let ok = out.is_accepted();
  Json(ChallengeOut {
    session_id,
    ok,
    message: out.message().to_string(),
    challenge: if ok { s.selected_challenge.clone() } else { None },
  })
}

/// Lists challenges. With a `sessionId`, the list also becomes that session's selectable set.
#[instrument(level = "info", skip(state), fields(difficulty = ?q.difficulty, limit = ?q.limit))]
pub async fn http_get_challenges(
  State(state): State<Arc<AppState>>,
  Query(q): Query<ChallengesQuery>,
) -> impl IntoResponse {
  let listing = get_challenges(&state, q.difficulty.as_deref().unwrap_or("easy"), q.limit).await;
  let mut session_id = None;
  if let Some(id) = q.session_id.as_deref() {
    let (resolved, session) = state.session(Some(id)).await;
    session.lock().await.offer(listing.items.clone());
    session_id = Some(resolved);
  }
  info!(target: "canvas", count = listing.items.len(), source = ?listing.source, "HTTP challenges served");
  Json(ChallengesOut {
    session_id,
    challenges: listing.items,
    source: listing.source,
    notice: listing.notice,
  })
}

#[instrument(level = "info", skip(state), fields(category = ?q.category, limit = ?q.limit))]
pub async fn http_get_skills(
  State(state): State<Arc<AppState>>,
  Query(q): Query<SkillsQuery>,
) -> impl IntoResponse {
  let raw = q.category.as_deref().unwrap_or("algorithms");
  let listing = get_skills(&state, raw, q.limit).await;
  Json(SkillsOut {
    category: SkillCategory::from_name(raw),
    skills: listing.items,
    source: listing.source,
    notice: listing.notice,
  })
}

#[instrument(level = "info", skip(state, body), fields(session_id = ?body.session_id, phase = %body.phase, content_len = body.content.len()))]
pub async fn http_post_canvas(
  State(state): State<Arc<AppState>>,
  Json(body): Json<CanvasIn>,
) -> impl IntoResponse {
  let (session_id, session) = state.session(body.session_id.as_deref()).await;
  let mut s = session.lock().await;
  let reply = guide_canvas_phase(&mut s, &state.guardrails, &body.phase, &body.content);
  Json(CanvasOut { session_id, ok: reply.ok, phase: reply.phase, feedback: reply.feedback })
}

#[instrument(level = "info", skip(body), fields(title_len = body.title.len()))]
pub async fn http_post_analyze(Json(body): Json<AnalyzeIn>) -> impl IntoResponse {
  Json(analyze(&body.title, &body.description))
}
