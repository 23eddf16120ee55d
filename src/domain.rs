//! Domain models used by the backend: difficulty, canvas phases, challenges, skills,
//! and the pattern-detection result types.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse difficulty label shared by challenges and the complexity estimate.
/// Ordering matters: lower variants win ties in the complexity vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
  #[default]
  Easy,
  Medium,
  Hard,
}

impl Difficulty {
  pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

  pub fn as_str(&self) -> &'static str {
    match self {
      Difficulty::Easy => "easy",
      Difficulty::Medium => "medium",
      Difficulty::Hard => "hard",
    }
  }

  /// Lenient parse: unknown or blank values clamp to `Easy`.
  pub fn from_name(s: &str) -> Self {
    match s.trim().to_lowercase().as_str() {
      "medium" => Difficulty::Medium,
      "hard" => Difficulty::Hard,
      _ => Difficulty::Easy,
    }
  }
}

impl fmt::Display for Difficulty {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// The four stages of the Algorithm Design Canvas, in working order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
  #[default]
  Constraints,
  Ideas,
  Tests,
  Code,
}

impl Phase {
  pub const ALL: [Phase; 4] = [Phase::Constraints, Phase::Ideas, Phase::Tests, Phase::Code];

  pub fn as_str(&self) -> &'static str {
    match self {
      Phase::Constraints => "constraints",
      Phase::Ideas => "ideas",
      Phase::Tests => "tests",
      Phase::Code => "code",
    }
  }

  /// Unknown phase names silently become `Constraints`.
  pub fn from_name(s: &str) -> Self {
    match s.trim().to_lowercase().as_str() {
      "ideas" => Phase::Ideas,
      "tests" => Phase::Tests,
      "code" => Phase::Code,
      _ => Phase::Constraints,
    }
  }

  pub fn ordinal(&self) -> u8 {
    match self {
      Phase::Constraints => 1,
      Phase::Ideas => 2,
      Phase::Tests => 3,
      Phase::Code => 4,
    }
  }
}

impl fmt::Display for Phase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Where did a challenge come from?
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeSource {
  User,    // typed in by the learner
  Catalog, // built-in fallback catalog or TOML bank
  Remote,  // returned by the catalog provider
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChallengeExample {
  pub input: String,
  pub output: String,
}

/// A coding challenge. Immutable once built.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Challenge {
  pub id: String,
  pub name: String,
  pub description: String,
  #[serde(default)] pub skills: Vec<String>,
  pub difficulty: Difficulty,
  #[serde(default)] pub examples: Vec<ChallengeExample>,
  pub source: ChallengeSource,
}

/// Which source actually served a catalog listing.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
  Remote,
  Catalog,
}

/// Skill groups offered by the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
  #[default]
  Algorithms,
  DataStructures,
  ProblemSolving,
  ComplexityAnalysis,
}

impl SkillCategory {
  pub const ALL: [SkillCategory; 4] = [
    SkillCategory::Algorithms,
    SkillCategory::DataStructures,
    SkillCategory::ProblemSolving,
    SkillCategory::ComplexityAnalysis,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      SkillCategory::Algorithms => "algorithms",
      SkillCategory::DataStructures => "data_structures",
      SkillCategory::ProblemSolving => "problem_solving",
      SkillCategory::ComplexityAnalysis => "complexity_analysis",
    }
  }

  /// Unknown categories clamp to `Algorithms`. Accepts spaces or dashes as separators.
  pub fn from_name(s: &str) -> Self {
    let norm = s.trim().to_lowercase().replace([' ', '-'], "_");
    match norm.as_str() {
      "data_structures" => SkillCategory::DataStructures,
      "problem_solving" => SkillCategory::ProblemSolving,
      "complexity_analysis" => SkillCategory::ComplexityAnalysis,
      _ => SkillCategory::Algorithms,
    }
  }
}

impl fmt::Display for SkillCategory {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Skill {
  pub name: String,
  pub description: String,
  pub category: SkillCategory,
}

/// Pattern families in the keyword table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternCategory {
  DataStructures,
  Algorithms,
  ComplexityHints,
}

/// One keyword-table entry that matched the challenge text.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct PatternMatch {
  pub category: PatternCategory,
  pub pattern_name: String,
  /// Every keyword of the entry found in the text, in table order.
  pub matched_keywords: Vec<String>,
}

/// Output of the pattern detector. Never stored; recomputed on demand.
#[derive(Clone, Debug, Serialize, PartialEq, Eq, Default)]
pub struct DetectionResult {
  pub detected_patterns: Vec<PatternMatch>,
  pub suggested_approaches: BTreeSet<String>,
  pub complexity_estimate: Difficulty,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn lenient_parsers_clamp_unknown_values() {
    assert_eq!(Difficulty::from_name("impossible"), Difficulty::Easy);
    assert_eq!(Difficulty::from_name(" HARD "), Difficulty::Hard);
    assert_eq!(Phase::from_name("summary"), Phase::Constraints);
    assert_eq!(Phase::from_name("Tests"), Phase::Tests);
    assert_eq!(SkillCategory::from_name("nonexistent"), SkillCategory::Algorithms);
    assert_eq!(SkillCategory::from_name("Data Structures"), SkillCategory::DataStructures);
  }

  #[test]
  fn enums_serialize_as_wire_names() {
    assert_eq!(serde_json::to_string(&Phase::Ideas).unwrap(), "\"ideas\"");
    assert_eq!(serde_json::to_string(&PatternCategory::DataStructures).unwrap(), "\"data_structures\"");
    assert_eq!(serde_json::to_string(&SkillCategory::ProblemSolving).unwrap(), "\"problem_solving\"");
    assert_eq!(serde_json::from_str::<Difficulty>("\"medium\"").unwrap(), Difficulty::Medium);
  }
}
