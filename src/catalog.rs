//! Built-in fallback content: challenges by difficulty and skills by category.
//!
//! This guarantees the canvas is useful without any remote provider. Extra
//! challenges from the TOML bank are appended after the built-in ones.

use tracing::{error, info};

use crate::config::ChallengeCfg;
use crate::domain::{Challenge, ChallengeExample, ChallengeSource, Difficulty, Skill, SkillCategory};

#[derive(Clone, Debug)]
pub struct Catalog {
  challenges: Vec<Challenge>,
  skills: Vec<Skill>,
}

impl Default for Catalog {
  fn default() -> Self {
    Self { challenges: seed_challenges(), skills: seed_skills() }
  }
}

impl Catalog {
  /// Built-in catalog extended with bank entries. Entries with a blank name or
  /// description are skipped; ids are assigned per difficulty after the seeds.
  pub fn with_bank(bank: &[ChallengeCfg]) -> Self {
    let mut catalog = Self::default();
    for cc in bank {
      if cc.name.trim().is_empty() || cc.description.trim().is_empty() {
        error!(target: "canvas", name = %cc.name, "Skipping bank challenge: missing name or description.");
        continue;
      }
      let difficulty = Difficulty::from_name(&cc.difficulty);
      let n = catalog.challenges.iter().filter(|c| c.difficulty == difficulty).count() + 1;
      catalog.challenges.push(Challenge {
        id: cc.id.clone().unwrap_or_else(|| format!("catalog-{}-{}", difficulty, n)),
        name: cc.name.trim().to_string(),
        description: cc.description.trim().to_string(),
        skills: cc.skills.clone(),
        difficulty,
        examples: cc.examples.clone(),
        source: ChallengeSource::Catalog,
      });
    }

    for d in Difficulty::ALL {
      let count = catalog.challenges.iter().filter(|c| c.difficulty == d).count();
      info!(target: "canvas", difficulty = %d, count, "Catalog inventory");
    }
    catalog
  }

  /// Challenges of one difficulty, catalog order, at most `limit`.
  pub fn challenges(&self, difficulty: Difficulty, limit: usize) -> Vec<Challenge> {
    self
      .challenges
      .iter()
      .filter(|c| c.difficulty == difficulty)
      .take(limit)
      .cloned()
      .collect()
  }

  pub fn skills(&self, category: SkillCategory, limit: usize) -> Vec<Skill> {
    self
      .skills
      .iter()
      .filter(|s| s.category == category)
      .take(limit)
      .cloned()
      .collect()
  }
}

fn ex(input: &str, output: &str) -> ChallengeExample {
  ChallengeExample { input: input.into(), output: output.into() }
}

fn seed(
  id: &str,
  difficulty: Difficulty,
  name: &str,
  description: &str,
  skills: &[&str],
  examples: Vec<ChallengeExample>,
) -> Challenge {
  Challenge {
    id: id.into(),
    name: name.into(),
    description: description.into(),
    skills: skills.iter().map(|s| s.to_string()).collect(),
    difficulty,
    examples,
    source: ChallengeSource::Catalog,
  }
}

/// Hand-curated challenges: 5 easy, 4 medium, 3 hard.
pub fn seed_challenges() -> Vec<Challenge> {
  use Difficulty::{Easy, Hard, Medium};
  vec![
    seed("catalog-easy-1", Easy, "Two Sum",
      "Given an array of integers and a target, return the indices of the two numbers that add up to the target.",
      &["arrays", "hash tables"],
      vec![ex("nums = [2,7,11,15], target = 9", "[0,1]")]),
    seed("catalog-easy-2", Easy, "Valid Parentheses",
      "Given a string containing only the characters ()[]{}, determine whether every bracket is closed in the correct order.",
      &["stacks", "strings"],
      vec![ex("s = \"()[]{}\"", "true"), ex("s = \"(]\"", "false")]),
    seed("catalog-easy-3", Easy, "Reverse Linked List",
      "Given the head of a singly linked list, reverse the list and return the new head.",
      &["linked lists", "pointers"],
      vec![ex("head = [1,2,3,4,5]", "[5,4,3,2,1]")]),
    seed("catalog-easy-4", Easy, "Valid Palindrome",
      "Given a string, check whether it reads the same forward and backward after removing non-alphanumeric characters and ignoring case.",
      &["strings", "two pointers"],
      vec![ex("s = \"A man, a plan, a canal: Panama\"", "true")]),
    seed("catalog-easy-5", Easy, "Maximum Depth of Binary Tree",
      "Given the root of a binary tree, return the number of nodes along the longest path from the root down to a leaf.",
      &["trees", "recursion"],
      vec![ex("root = [3,9,20,null,null,15,7]", "3")]),

    seed("catalog-medium-1", Medium, "Longest Substring Without Repeating Characters",
      "Given a string, find the length of the longest substring that contains no repeated character.",
      &["sliding window", "hash tables"],
      vec![ex("s = \"abcabcbb\"", "3")]),
    seed("catalog-medium-2", Medium, "Number of Islands",
      "Given a grid of '1' (land) and '0' (water), count the connected groups of land cells.",
      &["graphs", "bfs", "dfs"],
      vec![ex("grid = [[1,1,0],[0,1,0],[0,0,1]]", "2")]),
    seed("catalog-medium-3", Medium, "Coin Change",
      "Given coin denominations and an amount, return the fewest coins that make up the amount, or -1 if impossible.",
      &["dynamic programming"],
      vec![ex("coins = [1,2,5], amount = 11", "3")]),
    seed("catalog-medium-4", Medium, "Merge Intervals",
      "Given a list of intervals, merge every overlapping pair and return the non-overlapping result in sorted order.",
      &["sorting", "arrays"],
      vec![ex("[[1,3],[2,6],[8,10]]", "[[1,6],[8,10]]")]),

    seed("catalog-hard-1", Hard, "Median of Two Sorted Arrays",
      "Given two sorted arrays, return the median of the combined data in O(log (m+n)) time.",
      &["binary search", "arrays"],
      vec![ex("nums1 = [1,3], nums2 = [2]", "2.0")]),
    seed("catalog-hard-2", Hard, "Trapping Rain Water",
      "Given non-negative bar heights, compute how much water is trapped between the bars after raining.",
      &["two pointers", "stacks"],
      vec![ex("height = [0,1,0,2,1,0,1,3,2,1,2,1]", "6")]),
    seed("catalog-hard-3", Hard, "Word Ladder",
      "Given a begin word, an end word and a dictionary, return the number of words in the shortest transformation sequence changing one letter at a time.",
      &["graphs", "bfs", "hash tables"],
      vec![ex("begin = \"hit\", end = \"cog\", words = [hot,dot,dog,lot,log,cog]", "5")]),
  ]
}

/// Four categories with five skills each.
pub fn seed_skills() -> Vec<Skill> {
  use SkillCategory::{Algorithms, ComplexityAnalysis, DataStructures, ProblemSolving};
  let table: &[(SkillCategory, &str, &str)] = &[
    (Algorithms, "Sorting", "Comparison sorts, counting sort, and when built-in sorting is enough"),
    (Algorithms, "Binary Search", "Halving a sorted search space, including search on the answer"),
    (Algorithms, "Graph Traversal", "BFS and DFS for reachability, components, and shortest paths"),
    (Algorithms, "Dynamic Programming", "Memoization and tabulation over overlapping subproblems"),
    (Algorithms, "Greedy Algorithms", "Locally optimal choices with an exchange argument"),

    (DataStructures, "Arrays and Strings", "Indexing, slicing, prefix sums, and in-place updates"),
    (DataStructures, "Hash Tables", "Constant-time lookups, counting, and deduplication"),
    (DataStructures, "Stacks and Queues", "LIFO/FIFO processing, matching pairs, level order"),
    (DataStructures, "Linked Lists", "Pointer manipulation, dummy heads, fast and slow pointers"),
    (DataStructures, "Trees and Heaps", "Traversals, binary search trees, priority queues"),

    (ProblemSolving, "Clarifying Constraints", "Turning a description into explicit input/output limits"),
    (ProblemSolving, "Brute Force First", "Writing the obvious solution before optimizing"),
    (ProblemSolving, "Pattern Recognition", "Mapping a new problem onto a known technique"),
    (ProblemSolving, "Test Case Design", "Basic, edge, corner, and invalid cases"),
    (ProblemSolving, "Incremental Implementation", "Building and checking a solution one step at a time"),

    (ComplexityAnalysis, "Big-O Notation", "Describing growth of time and space with input size"),
    (ComplexityAnalysis, "Time Complexity", "Counting dominant operations of loops and recursion"),
    (ComplexityAnalysis, "Space Complexity", "Auxiliary memory, recursion depth, and in-place tricks"),
    (ComplexityAnalysis, "Amortized Analysis", "Average cost over a sequence of operations"),
    (ComplexityAnalysis, "Trade-offs", "Spending memory to save time and the reverse"),
  ];
  table
    .iter()
    .map(|(category, name, description)| Skill {
      name: name.to_string(),
      description: description.to_string(),
      category: *category,
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn builtin_catalog_has_expected_shape() {
    let c = Catalog::default();
    assert_eq!(c.challenges(Difficulty::Easy, 50).len(), 5);
    assert_eq!(c.challenges(Difficulty::Medium, 50).len(), 4);
    assert_eq!(c.challenges(Difficulty::Hard, 50).len(), 3);
    for cat in SkillCategory::ALL {
      assert_eq!(c.skills(cat, 50).len(), 5, "category {cat}");
    }
    assert!(seed_challenges().iter().all(|ch| !ch.examples.is_empty()));
  }

  #[test]
  fn limit_truncates_in_catalog_order() {
    let c = Catalog::default();
    let two = c.challenges(Difficulty::Easy, 2);
    assert_eq!(two.iter().map(|ch| ch.name.as_str()).collect::<Vec<_>>(), vec!["Two Sum", "Valid Parentheses"]);
  }

  #[test]
  fn bank_entries_are_appended_and_blank_ones_skipped() {
    let bank = vec![
      ChallengeCfg {
        id: None,
        name: "Valid Anagram".into(),
        description: "Return true if t is an anagram of s.".into(),
        difficulty: "easy".into(),
        skills: vec!["strings".into()],
        examples: vec![],
      },
      ChallengeCfg {
        id: None,
        name: "   ".into(),
        description: "no name".into(),
        difficulty: "hard".into(),
        skills: vec![],
        examples: vec![],
      },
    ];
    let c = Catalog::with_bank(&bank);
    let easy = c.challenges(Difficulty::Easy, 50);
    assert_eq!(easy.len(), 6);
    assert_eq!(easy[5].name, "Valid Anagram");
    assert_eq!(easy[5].id, "catalog-easy-6");
    assert_eq!(c.challenges(Difficulty::Hard, 50).len(), 3);
  }
}
