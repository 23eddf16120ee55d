//! Per-user canvas session: the selected challenge, the current phase pointer,
//! and the list of challenges the user may pick from.
//!
//! A `Session` is owned by exactly one interaction context (a WebSocket
//! connection or one HTTP session id). It never outlives the process.

use uuid::Uuid;

use crate::domain::{Challenge, ChallengeSource, Phase, PatternCategory};
use crate::patterns::{detect, display_name};

/// Outcome of an operation that may be refused with a user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
  Accepted(String),
  Rejected(String),
}

impl Outcome {
  pub fn is_accepted(&self) -> bool {
    matches!(self, Outcome::Accepted(_))
  }

  pub fn message(&self) -> &str {
    match self {
      Outcome::Accepted(m) | Outcome::Rejected(m) => m,
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct Session {
  pub selected_challenge: Option<Challenge>,
  pub current_phase: Phase,
  pub available_challenges: Vec<Challenge>,
}

impl Session {
  pub fn new() -> Self {
    Self::default()
  }

  /// Build a challenge from free text and select it. Phase restarts at constraints.
  pub fn set_challenge(&mut self, title: &str, description: &str) -> Outcome {
    let title = title.trim();
    let description = description.trim();
    if title.is_empty() {
      return Outcome::Rejected("Please provide a challenge title.".into());
    }
    if description.is_empty() {
      return Outcome::Rejected("Please provide a challenge description.".into());
    }

    let detection = detect(title, description);
    let skills = detection
      .detected_patterns
      .iter()
      .filter(|m| m.category != PatternCategory::ComplexityHints)
      .map(|m| display_name(&m.pattern_name))
      .collect();

    let challenge = Challenge {
      id: Uuid::new_v4().to_string(),
      name: title.to_string(),
      description: description.to_string(),
      skills,
      difficulty: detection.complexity_estimate,
      examples: vec![],
      source: ChallengeSource::User,
    };
    let message = confirmation(&challenge);
    self.selected_challenge = Some(challenge);
    self.current_phase = Phase::Constraints;
    Outcome::Accepted(message)
  }

  /// Select one of the offered challenges by position.
  pub fn select_challenge(&mut self, index: usize) -> Outcome {
    if self.available_challenges.is_empty() {
      return Outcome::Rejected("No challenges loaded yet. Load a challenge list first.".into());
    }
    let Some(challenge) = self.available_challenges.get(index).cloned() else {
      return Outcome::Rejected(format!(
        "Please pick a challenge between 0 and {}.",
        self.available_challenges.len() - 1
      ));
    };
    let message = confirmation(&challenge);
    self.selected_challenge = Some(challenge);
    self.current_phase = Phase::Constraints;
    Outcome::Accepted(message)
  }

  /// Replace the list the user can select from.
  pub fn offer(&mut self, challenges: Vec<Challenge>) {
    self.available_challenges = challenges;
  }

  pub fn enter_phase(&mut self, phase: Phase) {
    self.current_phase = phase;
  }
}

fn confirmation(c: &Challenge) -> String {
  let mut out = format!(
    "## Challenge set\n\n**Title:** {}\n\n**Description:** {}\n",
    c.name, c.description
  );
  if !c.skills.is_empty() {
    out.push_str(&format!("\n**Skills:** {}\n", c.skills.join(", ")));
  }
  out.push_str("\nWork through the Algorithm Design Canvas one phase at a time:\n\n");
  for p in Phase::ALL {
    let line = match p {
      Phase::Constraints => "define input/output format, edge cases, and performance requirements",
      Phase::Ideas => "brainstorm solution approaches and algorithms",
      Phase::Tests => "design test cases that validate the solution",
      Phase::Code => "structure and plan the implementation",
    };
    out.push_str(&format!("{}. **{}**: {}\n", p.ordinal(), display_name(p.as_str()), line));
  }
  out.push_str("\nStart with **Constraints**.");
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::Catalog;
  use crate::domain::Difficulty;

  #[test]
  fn set_challenge_requires_title_and_description() {
    let mut s = Session::new();
    assert_eq!(s.set_challenge("  ", "desc"), Outcome::Rejected("Please provide a challenge title.".into()));
    assert_eq!(s.set_challenge("Two Sum", ""), Outcome::Rejected("Please provide a challenge description.".into()));
    assert!(s.selected_challenge.is_none());
  }

  #[test]
  fn set_challenge_builds_user_challenge_and_resets_phase() {
    let mut s = Session::new();
    s.enter_phase(Phase::Code);
    let out = s.set_challenge(" Two Sum ", " Given an array of integers and a target ");
    assert!(out.is_accepted());
    assert!(out.message().contains("**Title:** Two Sum"));
    assert!(out.message().contains("4. **Code**"));
    let c = s.selected_challenge.as_ref().unwrap();
    assert_eq!(c.source, ChallengeSource::User);
    assert_eq!(c.name, "Two Sum");
    assert!(c.skills.contains(&"Array".to_string()));
    assert_eq!(c.difficulty, Difficulty::Easy);
    assert_eq!(s.current_phase, Phase::Constraints);
  }

  #[test]
  fn select_challenge_handles_empty_and_out_of_range() {
    let mut s = Session::new();
    assert!(!s.select_challenge(0).is_accepted());

    s.offer(Catalog::default().challenges(Difficulty::Easy, 5));
    let out = s.select_challenge(7);
    assert_eq!(out, Outcome::Rejected("Please pick a challenge between 0 and 4.".into()));
    assert!(s.selected_challenge.is_none());

    assert!(s.select_challenge(1).is_accepted());
    assert_eq!(s.selected_challenge.as_ref().unwrap().name, "Valid Parentheses");
  }
}
