//! Phase guidance: static per-phase templates plus pattern-specific tips.
//!
//! `guide` is pure. It never rejects input; length guardrails and the
//! "no challenge set" rule live in `logic`.

use crate::domain::{Challenge, DetectionResult, Phase};
use crate::patterns::display_name;
use crate::util::fill_template;

/// Number of detected patterns that may contribute a tip line.
const MAX_TIP_PATTERNS: usize = 2;
/// Number of patterns / approaches summarized in the challenge context block.
const MAX_CONTEXT_ITEMS: usize = 3;

struct PhaseTemplate {
  title: &'static str,
  body: &'static str,
}

const CONSTRAINTS_TPL: PhaseTemplate = PhaseTemplate {
  title: "Define Constraints",
  body: "Let's pin down the constraints of the problem before anything else.{challenge_context}

### Questions to answer

1. **Input format**: what data are you given?
   - Which data structures are involved?
   - What are the ranges and size limits?
   - Are there implicit constraints hiding in the description?

2. **Output format**: what exactly must you return?
   - Exact shape and type of the result?

3. **Performance**: are there time or space hints?
   - How many elements might you process?
   - Is an efficiency target stated or implied?

4. **Edge cases**: which special inputs must you handle?
   - Empty input, a single element?
   - Minimum and maximum values, boundaries?
{tips}
**Your task:** write down the constraints clearly, both explicit and implicit.",
};

const IDEAS_TPL: PhaseTemplate = PhaseTemplate {
  title: "Brainstorm Solution Ideas",
  body: "Let's explore several ways to solve it.{challenge_context}

### Brainstorming framework

1. **Brute force**: what is the most direct solution?
   - How would you solve it by hand, step by step?
   - Ignore efficiency for now.

2. **Pattern recognition**: which algorithmic patterns apply?
{approaches}
3. **Data structure selection**: which structures would help?
   - Start from the patterns detected above.

4. **Optimization**: where can time or space improve?
   - What is the bottleneck of the brute force?
   - Which algorithm or structure removes it?
{tips}
**Your task:** share your ideas and weigh them against the challenge context.",
};

const TESTS_TPL: PhaseTemplate = PhaseTemplate {
  title: "Design Test Cases",
  body: "Let's build test scenarios that would catch a wrong solution.{challenge_context}

### Testing strategy

1. **Basic cases**: simple, expected inputs
   - What is the most straightforward example?
   - Exercise the main logic path.

2. **Edge cases**: boundary conditions
   - Empty input, single element
   - Minimum and maximum values
   - Zero and negative numbers, if they apply

3. **Corner cases**: unusual but valid inputs
   - Which tricky inputs could break your solution?
   - Think about the detected patterns.

4. **Invalid cases**: how should bad input be handled?
   - Null or missing input, wrong types
   - Out-of-range values
{tips}
**Your task:** list test cases that cover every scenario above.",
};

const CODE_TPL: PhaseTemplate = PhaseTemplate {
  title: "Structure Your Code",
  body: "Time to organize the implementation.{challenge_context}

### Implementation plan

1. **Function signature**: define the main function
   - Which parameters follow from your constraints?
   - What does it return?

2. **Algorithm steps**: break the chosen approach down
   - List the main steps in order.
   - Separate core logic from helpers.

3. **Data structures**: carry over your brainstorming
   - Which structures give you the efficiency you need?
   - Any temporary storage?

4. **Implementation strategy**: order of work
   - Which part comes first?
   - How will you test as you go?
{tips}
**Remember:** clean, readable code that honors your constraints and edge cases.",
};

fn template(phase: Phase) -> &'static PhaseTemplate {
  match phase {
    Phase::Constraints => &CONSTRAINTS_TPL,
    Phase::Ideas => &IDEAS_TPL,
    Phase::Tests => &TESTS_TPL,
    Phase::Code => &CODE_TPL,
  }
}

/// Fixed (phase, pattern) tip table. Patterns without an entry contribute nothing.
pub fn phase_tip(phase: Phase, pattern_name: &str) -> Option<&'static str> {
  let tip = match (phase, pattern_name) {
    (Phase::Constraints, "array") => "Consider array bounds, negative indices, and empty arrays",
    (Phase::Constraints, "string") => "Think about string length, character encoding, and empty strings",
    (Phase::Constraints, "tree") => "Consider null nodes, tree height, and balanced vs unbalanced trees",
    (Phase::Constraints, "graph") => "Think about disconnected components, cycles, and node/edge counts",
    (Phase::Constraints, "hash") => "Decide what the keys are and whether collisions or duplicates matter",
    (Phase::Constraints, "dynamic_programming") => "Define the state space and identify overlapping subproblems",

    (Phase::Ideas, "array") => "Two pointers, sliding window, or prefix sums might be useful",
    (Phase::Ideas, "string") => "Consider character frequency, substring matching, or string building",
    (Phase::Ideas, "tree") => "Tree traversal (DFS/BFS) or divide-and-conquer approaches",
    (Phase::Ideas, "graph") => "BFS for shortest paths, DFS for connectivity, topological sort",
    (Phase::Ideas, "hash") => "Trade memory for speed with a map from value to position or count",
    (Phase::Ideas, "dynamic_programming") => "Memoization (top-down) or tabulation (bottom-up)",

    (Phase::Tests, "array") => "Test with empty arrays, single elements, and sorted/unsorted data",
    (Phase::Tests, "string") => "Test with empty strings, single characters, and special characters",
    (Phase::Tests, "tree") => "Test with null trees, single nodes, and deeply nested trees",
    (Phase::Tests, "graph") => "Test with single nodes, disconnected graphs, and cyclic graphs",
    (Phase::Tests, "hash") => "Test with duplicate keys and with every key distinct",
    (Phase::Tests, "dynamic_programming") => "Test base cases and optimal substructure properties",

    (Phase::Code, "array") => "Use clear variable names for indices and consider boundary checks",
    (Phase::Code, "string") => "Plan string manipulation carefully to avoid index errors",
    (Phase::Code, "tree") => "Handle null checks and consider recursive vs iterative approaches",
    (Phase::Code, "graph") => "Choose appropriate graph representation (adjacency list/matrix)",
    (Phase::Code, "hash") => "Pick the map type up front and keep lookups out of nested loops",
    (Phase::Code, "dynamic_programming") => "Initialize your DP table/memo properly",
    _ => return None,
  };
  Some(tip)
}

/// Tip lines for the first two detected patterns only.
pub fn context_tips(phase: Phase, detection: &DetectionResult) -> Vec<&'static str> {
  detection
    .detected_patterns
    .iter()
    .take(MAX_TIP_PATTERNS)
    .filter_map(|m| phase_tip(phase, &m.pattern_name))
    .collect()
}

fn challenge_context(challenge: &Challenge, detection: &DetectionResult) -> String {
  let mut out = format!("\n\n**Current challenge: {}**\n*{}*\n", challenge.name, challenge.description);

  if !challenge.examples.is_empty() {
    out.push_str("\n**Examples:**\n");
    for ex in &challenge.examples {
      out.push_str(&format!("- Input: `{}` -> Output: `{}`\n", ex.input, ex.output));
    }
  }

  if !detection.detected_patterns.is_empty() {
    let names: Vec<String> = detection
      .detected_patterns
      .iter()
      .take(MAX_CONTEXT_ITEMS)
      .map(|m| display_name(&m.pattern_name))
      .collect();
    out.push_str(&format!("*Detected patterns: {}*\n", names.join(", ")));
  }

  if !detection.suggested_approaches.is_empty() {
    let top: Vec<&str> = detection
      .suggested_approaches
      .iter()
      .take(MAX_CONTEXT_ITEMS)
      .map(String::as_str)
      .collect();
    out.push_str(&format!("*Suggested approaches: {}*\n", top.join(", ")));
  }

  out.push_str(&format!("*Estimated difficulty: {}*\n", detection.complexity_estimate));
  out
}

/// Compose the markdown guidance document for one canvas phase.
pub fn guide(
  phase: Phase,
  detection: &DetectionResult,
  challenge: Option<&Challenge>,
  user_input: &str,
) -> String {
  let tpl = template(phase);

  let context = challenge
    .map(|c| challenge_context(c, detection))
    .unwrap_or_default();

  let tips = context_tips(phase, detection);
  let tips_block = if tips.is_empty() {
    String::new()
  } else {
    let lines: Vec<String> = tips.iter().map(|t| format!("- {}", t)).collect();
    format!("\n**Context-specific tips:**\n{}\n", lines.join("\n"))
  };

  let approaches = if detection.suggested_approaches.is_empty() {
    String::new()
  } else {
    let all: Vec<&str> = detection.suggested_approaches.iter().map(String::as_str).collect();
    format!("   - Consider: {}\n", all.join(", "))
  };

  // Only the static halves go through the templater; challenge text is spliced
  // in verbatim so braces in a user description are never expanded.
  let (head, tail) = tpl.body.split_once("{challenge_context}").unwrap_or((tpl.body, ""));
  let statics = [("tips", tips_block.as_str()), ("approaches", approaches.as_str())];
  let body = format!(
    "{}{}{}",
    fill_template(head, &statics),
    context,
    fill_template(tail, &statics)
  );

  let mut out = format!("## Phase {}: {}\n\n{}", phase.ordinal(), tpl.title, body);

  let echo = user_input.trim();
  if !echo.is_empty() {
    out.push_str(&format!(
      "\n\n**Your input:** {}\n\nGood start. Let's check it against the points above.",
      echo
    ));
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{ChallengeExample, ChallengeSource, Difficulty};
  use crate::patterns::detect;

  fn challenge(name: &str, description: &str) -> Challenge {
    Challenge {
      id: "t1".into(),
      name: name.into(),
      description: description.into(),
      skills: vec![],
      difficulty: Difficulty::Easy,
      examples: vec![ChallengeExample { input: "[2,7,11,15], 9".into(), output: "[0,1]".into() }],
      source: ChallengeSource::User,
    }
  }

  fn tip_count(doc: &str) -> usize {
    Phase::ALL
      .iter()
      .flat_map(|p| ["array", "string", "tree", "graph", "hash", "dynamic_programming"].map(|n| phase_tip(*p, n)))
      .flatten()
      .filter(|t| doc.contains(&format!("- {}", t)))
      .count()
  }

  #[test]
  fn ideas_tips_come_from_first_two_patterns_only() {
    // array, string, tree all match; only the first two contribute tips.
    let det = detect("array string tree", "");
    assert_eq!(det.detected_patterns.len(), 3);
    let doc = guide(Phase::Ideas, &det, None, "");
    assert!(doc.contains(phase_tip(Phase::Ideas, "array").unwrap()));
    assert!(doc.contains(phase_tip(Phase::Ideas, "string").unwrap()));
    assert!(!doc.contains(phase_tip(Phase::Ideas, "tree").unwrap()));
    assert_eq!(tip_count(&doc), 2);
  }

  #[test]
  fn patterns_without_tips_are_skipped() {
    // two_pointers has no tip, array does
    let det = detect("pair", "array");
    let names: Vec<&str> = det.detected_patterns.iter().map(|m| m.pattern_name.as_str()).collect();
    assert_eq!(names, vec!["array", "two_pointers"]);
    assert_eq!(context_tips(Phase::Tests, &det), vec![phase_tip(Phase::Tests, "array").unwrap()]);
  }

  #[test]
  fn unknown_phase_renders_like_constraints() {
    let det = detect("Two Sum", "array target");
    let c = challenge("Two Sum", "array target");
    let a = guide(Phase::from_name("summary"), &det, Some(&c), "my notes here");
    let b = guide(Phase::Constraints, &det, Some(&c), "my notes here");
    assert_eq!(a, b);
    assert!(a.starts_with("## Phase 1: Define Constraints"));
  }

  #[test]
  fn embeds_challenge_context_and_examples() {
    let c = challenge("Two Sum", "Given an array of integers and a target");
    let det = detect(&c.name, &c.description);
    let doc = guide(Phase::Code, &det, Some(&c), "");
    assert!(doc.starts_with("## Phase 4: Structure Your Code"));
    assert!(doc.contains("**Current challenge: Two Sum**"));
    assert!(doc.contains("- Input: `[2,7,11,15], 9` -> Output: `[0,1]`"));
    assert!(doc.contains("Detected patterns: Array"));
    assert!(!doc.contains("{challenge_context}"));
    assert!(!doc.contains("{tips}"));
  }

  #[test]
  fn placeholders_in_challenge_text_stay_literal() {
    let c = challenge("Array {approaches}", "Array task; see {tips}");
    let det = detect(&c.name, &c.description);
    let doc = guide(Phase::Constraints, &det, Some(&c), "");
    assert!(doc.contains("**Current challenge: Array {approaches}**"));
    assert!(doc.contains("*Array task; see {tips}*"));
    assert_eq!(doc.matches("**Context-specific tips:**").count(), 1);
    assert_eq!(tip_count(&doc), 1);
  }

  #[test]
  fn echoes_user_input_only_when_present() {
    let det = DetectionResult::default();
    let with = guide(Phase::Tests, &det, None, "  empty list and one element  ");
    assert!(with.contains("**Your input:** empty list and one element"));
    let without = guide(Phase::Tests, &det, None, "   ");
    assert!(!without.contains("**Your input:**"));
    assert!(!without.contains("Context-specific tips"));
  }

  #[test]
  fn ideas_lists_all_suggested_approaches() {
    let det = detect("tree graph", "");
    let doc = guide(Phase::Ideas, &det, None, "");
    for a in &det.suggested_approaches {
      assert!(doc.contains(a.as_str()), "missing approach {a}");
    }
  }
}
