//! Keyword-driven pattern detection over challenge text.
//!
//! Flow:
//! 1) Lower-case `"{title} {description}"`.
//! 2) Walk the canonical keyword table in order; an entry matches when any of its
//!    keywords is a substring of the text.
//! 3) Union the suggested approaches of every matched pattern.
//! 4) Vote a coarse difficulty from three keyword buckets (ties go to the easier bucket).
//!
//! Everything here is pure and deterministic; the tables are the versioned data.

use std::collections::BTreeSet;

use crate::domain::{DetectionResult, Difficulty, PatternCategory, PatternMatch};

pub const TABLE_VERSION: &str = "canvas.patterns.v1";

pub struct PatternDef {
    pub category: PatternCategory,
    pub name: &'static str,
    pub keywords: &'static [&'static str],
}

macro_rules! pat {
    ($cat:ident, $name:expr, [$($kw:expr),+ $(,)?]) => {
        PatternDef { category: PatternCategory::$cat, name: $name, keywords: &[$($kw),+] }
    };
}

/// Iteration order of this table is the output order of `detect`.
pub const PATTERN_TABLE: &[PatternDef] = &[
    pat!(DataStructures, "array", ["array", "list", "elements", "index", "sort"]),
    pat!(DataStructures, "string", ["string", "text", "character", "substring", "palindrome"]),
    pat!(DataStructures, "tree", ["tree", "binary", "node", "leaf", "root", "traversal"]),
    pat!(DataStructures, "graph", ["graph", "vertex", "edge", "path", "connected", "bfs", "dfs"]),
    pat!(DataStructures, "stack", ["stack", "lifo", "push", "pop", "parentheses", "bracket"]),
    pat!(DataStructures, "queue", ["queue", "fifo", "dequeue", "level order"]),
    pat!(DataStructures, "hash", ["hash", "map", "dictionary", "lookup", "count", "frequency"]),
    pat!(DataStructures, "linked_list", ["linked", "node", "next", "pointer", "merge"]),
    pat!(Algorithms, "sorting", ["sort", "order", "arrange", "merge", "quick"]),
    pat!(Algorithms, "searching", ["search", "find", "binary search", "target"]),
    pat!(Algorithms, "two_pointers", ["two pointer", "left", "right", "pair", "sum"]),
    pat!(Algorithms, "sliding_window", ["window", "subarray", "substring", "contiguous"]),
    pat!(Algorithms, "dynamic_programming", ["optimal", "maximum", "minimum", "dp", "fibonacci", "knapsack"]),
    pat!(Algorithms, "backtracking", ["backtrack", "permutation", "combination", "generate", "all possible"]),
    pat!(Algorithms, "greedy", ["greedy", "minimum", "maximum", "optimal choice"]),
    pat!(ComplexityHints, "time_critical", ["o(n)", "o(log n)", "efficient", "fast", "optimal time"]),
    pat!(ComplexityHints, "space_critical", ["in-place", "constant space", "o(1) space", "memory efficient"]),
];

/// Pattern name -> human-readable techniques worth suggesting.
const APPROACHES: &[(&str, &[&str])] = &[
    ("array", &["Two pointers", "Sliding window", "Hash map for lookups"]),
    ("string", &["Two pointers", "String manipulation", "Character frequency counting"]),
    ("tree", &["Tree traversal (DFS/BFS)", "Recursive solutions", "Level-order processing"]),
    ("graph", &["BFS for shortest path", "DFS for connectivity", "Topological sort"]),
    ("stack", &["Monotonic stack", "Matching pairs with a stack"]),
    ("queue", &["Level-order processing", "BFS for shortest path"]),
    ("hash", &["Hash map for lookups", "Character frequency counting"]),
    ("linked_list", &["Fast and slow pointers", "Dummy head node"]),
    ("sorting", &["Merge sort", "Quick sort", "Built-in sorting"]),
    ("searching", &["Binary search", "Hash table lookup", "Linear scan"]),
    ("two_pointers", &["Two pointers", "Sorting then scanning"]),
    ("sliding_window", &["Sliding window", "Prefix sums"]),
    ("dynamic_programming", &["Memoization (top-down)", "Tabulation (bottom-up)", "State optimization"]),
    ("backtracking", &["Recursive backtracking", "Pruning the search space"]),
    ("greedy", &["Greedy choice with proof", "Sorting then scanning"]),
];

/// Difficulty buckets voted on by `estimate_complexity`, in tie-break order.
const COMPLEXITY_BUCKETS: &[(Difficulty, &[&str])] = &[
    (Difficulty::Easy, &["simple", "basic", "straightforward", "easy", "find", "check"]),
    (Difficulty::Medium, &["optimal", "efficient", "multiple", "various", "complex"]),
    (Difficulty::Hard, &["minimum", "maximum", "all possible", "optimize", "constraint", "advanced"]),
];

/// Detect patterns, approaches and a complexity estimate for a challenge.
pub fn detect(title: &str, description: &str) -> DetectionResult {
    let text = format!("{} {}", title, description).to_lowercase();

    let detected_patterns: Vec<PatternMatch> = PATTERN_TABLE
        .iter()
        .filter_map(|def| {
            let found: Vec<String> = def
                .keywords
                .iter()
                .filter(|kw| text.contains(*kw))
                .map(|kw| kw.to_string())
                .collect();
            if found.is_empty() {
                None
            } else {
                Some(PatternMatch {
                    category: def.category,
                    pattern_name: def.name.to_string(),
                    matched_keywords: found,
                })
            }
        })
        .collect();

    let suggested_approaches: BTreeSet<String> = detected_patterns
        .iter()
        .flat_map(|m| approaches_for(&m.pattern_name).iter())
        .map(|a| a.to_string())
        .collect();

    DetectionResult {
        detected_patterns,
        suggested_approaches,
        complexity_estimate: estimate_complexity(&text),
    }
}

/// Each bucket scores one point per keyword present. Highest score wins;
/// on a tie the lower difficulty wins, so text with no hints is `Easy`.
/// Expects already lower-cased text.
pub fn estimate_complexity(text: &str) -> Difficulty {
    let mut best = (Difficulty::Easy, 0usize);
    for (level, keywords) in COMPLEXITY_BUCKETS {
        let score = keywords.iter().filter(|kw| text.contains(*kw)).count();
        if score > best.1 {
            best = (*level, score);
        }
    }
    best.0
}

pub fn approaches_for(pattern_name: &str) -> &'static [&'static str] {
    APPROACHES
        .iter()
        .find(|(name, _)| *name == pattern_name)
        .map(|(_, list)| *list)
        .unwrap_or(&[])
}

/// "two_pointers" -> "Two Pointers"
pub fn display_name(pattern_name: &str) -> String {
    pattern_name
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
