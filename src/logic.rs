//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Setting / selecting the session challenge
//!   - Canvas phase guidance behind the input guardrails
//!   - Catalog listings (remote provider first, static catalog on any failure)
//!   - Stateless pattern analysis

use tracing::{debug, error, info, instrument, warn};

use crate::config::Guardrails;
use crate::domain::{Challenge, DataSource, DetectionResult, Difficulty, Phase, Skill, SkillCategory};
use crate::guidance::guide;
use crate::patterns::detect;
use crate::session::{Outcome, Session};
use crate::state::AppState;

pub const DEFAULT_CHALLENGE_LIMIT: usize = 5;
pub const DEFAULT_SKILL_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 50;

const FALLBACK_NOTICE: &str = "Live catalog data is unavailable right now; showing the built-in catalog instead.";

/// A listing plus where it came from. `notice` is a soft, user-facing remark.
#[derive(Debug, Clone)]
pub struct Listing<T> {
  pub items: Vec<T>,
  pub source: DataSource,
  pub notice: Option<String>,
}

/// Result of a guidance request; `ok == false` means `feedback` is a prompt to retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuideReply {
  pub ok: bool,
  pub phase: Phase,
  pub feedback: String,
}

/// Missing, zero or negative limits take the default; large ones clamp to `MAX_LIMIT`.
pub fn clamp_limit(limit: Option<i64>, default: usize) -> usize {
  match limit {
    Some(n) if n > 0 => (n as u64).min(MAX_LIMIT as u64) as usize,
    _ => default,
  }
}

#[instrument(level = "info", skip(session, title, description), fields(title_len = title.len(), desc_len = description.len()))]
pub fn set_challenge(session: &mut Session, title: &str, description: &str) -> Outcome {
  let out = session.set_challenge(title, description);
  match (&out, &session.selected_challenge) {
    (Outcome::Accepted(_), Some(c)) => {
      info!(target: "canvas", id = %c.id, name = %c.name, difficulty = %c.difficulty, "Challenge set from free text")
    }
    _ => debug!(target: "canvas", message = %out.message(), "Challenge rejected"),
  }
  out
}

#[instrument(level = "info", skip(session), fields(available = session.available_challenges.len()))]
pub fn select_challenge(session: &mut Session, index: i64) -> Outcome {
  // Negative positions are just another out-of-range index.
  let idx = usize::try_from(index).unwrap_or(usize::MAX);
  let out = session.select_challenge(idx);
  if let (Outcome::Accepted(_), Some(c)) = (&out, &session.selected_challenge) {
    info!(target: "canvas", id = %c.id, name = %c.name, "Challenge selected");
  }
  out
}

/// Guardrails first (blank, too short, too long), then the "challenge required" rule,
/// then detect + guide on the selected challenge.
#[instrument(level = "info", skip(session, guardrails, user_input), fields(input_len = user_input.len()))]
pub fn guide_canvas_phase(
  session: &mut Session,
  guardrails: &Guardrails,
  phase_name: &str,
  user_input: &str,
) -> GuideReply {
  let phase = Phase::from_name(phase_name);
  let input = user_input.trim();
  let chars = input.chars().count();

  let refuse = |feedback: String| GuideReply { ok: false, phase, feedback };

  if input.is_empty() {
    return refuse(format!("Please provide some input for the {} phase to get guidance.", phase));
  }
  if chars < guardrails.min_input_chars {
    return refuse(format!(
      "Please provide more detailed input for the {} phase (at least {} characters).",
      phase, guardrails.min_input_chars
    ));
  }
  if chars > guardrails.max_input_chars {
    return refuse(format!(
      "Please keep your {} input under {} characters.",
      phase, guardrails.max_input_chars
    ));
  }

  let Some(challenge) = session.selected_challenge.clone() else {
    return refuse("Please set a challenge first, then come back to this phase.".into());
  };

  session.enter_phase(phase);
  let detection = detect(&challenge.name, &challenge.description);
  debug!(
    target: "canvas",
    id = %challenge.id,
    %phase,
    patterns = detection.detected_patterns.len(),
    complexity = %detection.complexity_estimate,
    "Rendering canvas guidance"
  );
  GuideReply { ok: true, phase, feedback: guide(phase, &detection, Some(&challenge), input) }
}

/// Remote first when a provider is configured; the static catalog on any failure.
#[instrument(level = "info", skip(state), fields(provider = %state.provider_name()))]
pub async fn get_challenges(state: &AppState, difficulty: &str, limit: Option<i64>) -> Listing<Challenge> {
  let difficulty = Difficulty::from_name(difficulty);
  let limit = clamp_limit(limit, DEFAULT_CHALLENGE_LIMIT);

  let mut notice = None;
  if let Some(provider) = &state.provider {
    match provider.fetch_challenges(difficulty, limit).await {
      Ok(items) => {
        info!(target: "canvas", %difficulty, count = items.len(), "Challenges served from provider");
        return Listing { items, source: DataSource::Remote, notice: None };
      }
      Err(e) => {
        error!(target: "canvas", %difficulty, error = %e, "Provider challenges failed; using built-in catalog.");
        notice = Some(FALLBACK_NOTICE.to_string());
      }
    }
  }

  let items = state.catalog.challenges(difficulty, limit);
  warn!(target: "canvas", %difficulty, count = items.len(), "Challenges served from built-in catalog");
  Listing { items, source: DataSource::Catalog, notice }
}

#[instrument(level = "info", skip(state), fields(provider = %state.provider_name()))]
pub async fn get_skills(state: &AppState, category: &str, limit: Option<i64>) -> Listing<Skill> {
  let category = SkillCategory::from_name(category);
  let limit = clamp_limit(limit, DEFAULT_SKILL_LIMIT);

  let mut notice = None;
  if let Some(provider) = &state.provider {
    match provider.fetch_skills(category, limit).await {
      Ok(items) => {
        info!(target: "canvas", %category, count = items.len(), "Skills served from provider");
        return Listing { items, source: DataSource::Remote, notice: None };
      }
      Err(e) => {
        error!(target: "canvas", %category, error = %e, "Provider skills failed; using built-in catalog.");
        notice = Some(FALLBACK_NOTICE.to_string());
      }
    }
  }

  let items = state.catalog.skills(category, limit);
  warn!(target: "canvas", %category, count = items.len(), "Skills served from built-in catalog");
  Listing { items, source: DataSource::Catalog, notice }
}

#[instrument(level = "info", skip(title, description), fields(title_len = title.len(), desc_len = description.len()))]
pub fn analyze(title: &str, description: &str) -> DetectionResult {
  let r = detect(title, description);
  debug!(target: "canvas", patterns = r.detected_patterns.len(), complexity = %r.complexity_estimate, "Analysis done");
  r
}
