//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.
//!
//! Every connection owns its own `Session`; it is dropped when the socket closes.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{info, error, instrument, debug};

use crate::domain::SkillCategory;
use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::logic::*;
use crate::session::Session;
use crate::state::AppState;

#[instrument(level = "info", skip(ws, state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "professor", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "professor", "WebSocket connected");
  let mut session = Session::new();
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        // Parse, dispatch, serialize response.
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "canvas", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &state, &mut session).await
          }
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "professor", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "professor", phase = %session.current_phase, "WebSocket disconnected");
}

#[instrument(level = "info", skip(state, session))]
pub(crate) async fn handle_client_ws(msg: ClientWsMessage, state: &AppState, session: &mut Session) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::SetChallenge { title, description } => {
      let out = set_challenge(session, &title, &description);
      let ok = out.is_accepted();
      ServerWsMessage::ChallengeSet {
        ok,
        message: out.message().to_string(),
        challenge: if ok { session.selected_challenge.clone() } else { None },
      }
    }

    ClientWsMessage::LoadChallenges { difficulty, limit } => {
      let listing = get_challenges(state, difficulty.as_deref().unwrap_or("easy"), limit).await;
      session.offer(listing.items.clone());
      info!(target: "canvas", count = listing.items.len(), source = ?listing.source, "WS challenges served");
      ServerWsMessage::Challenges { challenges: listing.items, source: listing.source, notice: listing.notice }
    }

    ClientWsMessage::SelectChallenge { index } => {
      let out = select_challenge(session, index);
      let ok = out.is_accepted();
      ServerWsMessage::ChallengeSet {
        ok,
        message: out.message().to_string(),
        challenge: if ok { session.selected_challenge.clone() } else { None },
      }
    }

    ClientWsMessage::Guide { phase, content } => {
      let reply = guide_canvas_phase(session, &state.guardrails, &phase, &content);
      ServerWsMessage::Guidance { ok: reply.ok, phase: reply.phase, feedback: reply.feedback }
    }

    ClientWsMessage::Skills { category, limit } => {
      let raw = category.unwrap_or_else(|| "algorithms".into());
      let listing = get_skills(state, &raw, limit).await;
      ServerWsMessage::Skills {
        category: SkillCategory::from_name(&raw),
        skills: listing.items,
        source: listing.source,
        notice: listing.notice,
      }
    }

    ClientWsMessage::Analyze { title, description } => {
      ServerWsMessage::Analysis { result: analyze(&title, &description) }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{DataSource, Phase};

  fn parse(json: &str) -> ClientWsMessage {
    serde_json::from_str(json).unwrap()
  }

  #[tokio::test]
  async fn load_then_select_then_guide() {
    let state = AppState::offline();
    let mut session = Session::new();

    let reply = handle_client_ws(parse(r#"{"type":"load_challenges","difficulty":"medium","limit":2}"#), &state, &mut session).await;
    match reply {
      ServerWsMessage::Challenges { challenges, source, notice } => {
        assert_eq!(challenges.len(), 2);
        assert_eq!(source, DataSource::Catalog);
        assert!(notice.is_none());
      }
      other => panic!("unexpected reply: {:?}", other),
    }

    let reply = handle_client_ws(parse(r#"{"type":"select_challenge","index":0}"#), &state, &mut session).await;
    assert!(matches!(reply, ServerWsMessage::ChallengeSet { ok: true, challenge: Some(_), .. }));

    let reply = handle_client_ws(
      parse(r#"{"type":"guide","phase":"tests","content":"empty input and duplicates"}"#),
      &state,
      &mut session,
    )
    .await;
    match reply {
      ServerWsMessage::Guidance { ok, phase, feedback } => {
        assert!(ok);
        assert_eq!(phase, Phase::Tests);
        assert!(feedback.starts_with("## Phase 3"));
      }
      other => panic!("unexpected reply: {:?}", other),
    }
    assert_eq!(session.current_phase, Phase::Tests);
  }

  #[tokio::test]
  async fn guide_without_challenge_and_ping() {
    let state = AppState::offline();
    let mut session = Session::new();
    assert!(matches!(handle_client_ws(ClientWsMessage::Ping, &state, &mut session).await, ServerWsMessage::Pong));

    let reply = handle_client_ws(
      parse(r#"{"type":"guide","phase":"code","content":"loop over the array once"}"#),
      &state,
      &mut session,
    )
    .await;
    assert!(matches!(reply, ServerWsMessage::Guidance { ok: false, ref feedback, .. } if feedback.starts_with("Please set a challenge first")));
  }
}
