//! Loading canvas configuration (input guardrails + optional challenge bank) from TOML.
//!
//! See `CanvasConfig` for the expected schema. Remote provider settings come from
//! environment variables and live in `provider::ProviderSettings`.

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::ChallengeExample;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct CanvasConfig {
  #[serde(default)]
  pub guardrails: Guardrails,
  #[serde(default)]
  pub sessions: SessionLimits,
  #[serde(default)]
  pub challenges: Vec<ChallengeCfg>,
}

/// Challenge entry accepted in the TOML bank.
#[derive(Clone, Debug, Deserialize)]
pub struct ChallengeCfg {
  #[serde(default)] pub id: Option<String>,
  pub name: String,
  pub description: String,
  #[serde(default = "default_difficulty")] pub difficulty: String,
  #[serde(default)] pub skills: Vec<String>,
  #[serde(default)] pub examples: Vec<ChallengeExample>,
}

fn default_difficulty() -> String {
  "easy".into()
}

/// Limits applied to canvas input before guidance is rendered.
#[derive(Clone, Debug, Deserialize)]
pub struct Guardrails {
  #[serde(default = "default_min_input_chars")]
  pub min_input_chars: usize,
  #[serde(default = "default_max_input_chars")]
  pub max_input_chars: usize,
}

fn default_min_input_chars() -> usize { 10 }
fn default_max_input_chars() -> usize { 5000 }

impl Default for Guardrails {
  fn default() -> Self {
    Self { min_input_chars: default_min_input_chars(), max_input_chars: default_max_input_chars() }
  }
}

/// Bounds on the HTTP session store. Idle sessions are swept when a new one is opened.
#[derive(Clone, Debug, Deserialize)]
pub struct SessionLimits {
  #[serde(default = "default_idle_minutes")]
  pub idle_minutes: u64,
  #[serde(default = "default_max_sessions")]
  pub max_sessions: usize,
}

fn default_idle_minutes() -> u64 { 30 }
fn default_max_sessions() -> usize { 10_000 }

impl Default for SessionLimits {
  fn default() -> Self {
    Self { idle_minutes: default_idle_minutes(), max_sessions: default_max_sessions() }
  }
}

impl SessionLimits {
  pub fn idle_ttl(&self) -> std::time::Duration {
    std::time::Duration::from_secs(self.idle_minutes.saturating_mul(60))
  }
}

pub fn parse_canvas_config(s: &str) -> Result<CanvasConfig, toml::de::Error> {
  toml::from_str::<CanvasConfig>(s)
}

/// Attempt to load `CanvasConfig` from CANVAS_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_canvas_config_from_env() -> Option<CanvasConfig> {
  let path = std::env::var("CANVAS_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_canvas_config(&s) {
      Ok(cfg) => {
        info!(target: "professor", %path, bank = cfg.challenges.len(), "Loaded canvas config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "professor", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "professor", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_full_config() {
    let cfg = parse_canvas_config(
      r#"
        [guardrails]
        min_input_chars = 5

        [sessions]
        max_sessions = 100

        [[challenges]]
        name = "Valid Anagram"
        description = "Return true if t is an anagram of s."
        difficulty = "easy"
        skills = ["strings", "hash tables"]
        examples = [{ input = "s = \"anagram\", t = \"nagaram\"", output = "true" }]
      "#,
    )
    .expect("valid toml");
    assert_eq!(cfg.guardrails.min_input_chars, 5);
    assert_eq!(cfg.guardrails.max_input_chars, 5000);
    assert_eq!(cfg.sessions.max_sessions, 100);
    assert_eq!(cfg.sessions.idle_ttl().as_secs(), 30 * 60);
    assert_eq!(cfg.challenges.len(), 1);
    assert_eq!(cfg.challenges[0].examples[0].output, "true");
  }

  #[test]
  fn empty_config_uses_defaults() {
    let cfg = parse_canvas_config("").expect("empty toml");
    assert_eq!(cfg.guardrails.min_input_chars, 10);
    assert_eq!(cfg.sessions.idle_minutes, 30);
    assert_eq!(cfg.sessions.max_sessions, 10_000);
    assert!(cfg.challenges.is_empty());
  }

  #[test]
  fn missing_required_fields_is_an_error() {
    assert!(parse_canvas_config("[[challenges]]\nname = \"x\"\n").is_err());
  }
}
