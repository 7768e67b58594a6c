//! Stage 7: final polish.
//!
//! Negative phrasing is rewritten first, in table order, so the paired
//! `don't`/`never` rules only see what the specific ones left behind. Each
//! replacement reads correctly where the negative stood. A negative with no
//! known positive counterpart is left as written.

use super::StageOutcome;
use crate::rules::{Rewrite, apply_rewrites};
use crate::utils::text::capitalize_first;
use once_cell::sync::Lazy;

const DONT: &str = r"(?:don't|don’t|do not)";
const DONT_OR_NEVER: &str = r"(?:don't|don’t|do not|never)";

static NEGATIVE_TO_POSITIVE: Lazy<Vec<Rewrite>> = Lazy::new(|| {
    let negated = |verbs: &str| format!(r"(?i)\b{DONT_OR_NEVER}\s+(?:{verbs})\b");
    vec![
        Rewrite::new(&format!(r"(?i)\b{DONT} be vague\b"), "be specific"),
        Rewrite::new(&format!(r"(?i)\b{DONT} use\b"), "use alternatives to"),
        Rewrite::new(&format!(r"(?i)\b{DONT} forget to\b"), "remember to"),
        Rewrite::new(&negated("skip|omit|leave out"), "include"),
        Rewrite::new(&negated("guess|assume"), "verify"),
        Rewrite::new(&negated("ignore|overlook"), "address"),
        Rewrite::new(&negated("include"), "exclude"),
        Rewrite::new(&negated("forget"), "remember"),
        Rewrite::new(&negated("exceed|go over"), "stay within"),
        Rewrite::new(&negated("rush"), "take time over"),
        Rewrite::new(r"(?i)\bavoid\b", "minimize"),
        Rewrite::new(r"(?i)\bno more than\b", "at most"),
    ]
});

const INTENSIFIERS: &[&str] = &[
    "very",
    "really",
    "extremely",
    "highly",
    "truly",
    "absolutely",
    "incredibly",
    "super",
];

static REPEATED_INTENSIFIERS: Lazy<Vec<Rewrite>> = Lazy::new(|| {
    INTENSIFIERS
        .iter()
        .map(|w| Rewrite::new(&format!(r"(?i)\b({w})(\s+{w})+\b"), "$1"))
        .collect()
});

pub fn polish(text: &str) -> StageOutcome {
    let mut outcome = StageOutcome::unchanged(text);

    let (positive, rewrites) = apply_rewrites(&NEGATIVE_TO_POSITIVE, text);
    if rewrites > 0 {
        outcome.technique("negative_to_positive");
    }
    let (collapsed, collapses) = apply_rewrites(&REPEATED_INTENSIFIERS, &positive);
    let (capitalized, capitalized_changed) = capitalize_first(&collapsed);

    outcome.applied = rewrites > 0 || collapses > 0 || capitalized_changed;
    outcome.detail = Some(serde_json::json!({
        "rewrites": rewrites,
        "collapsedIntensifiers": collapses,
        "capitalized": capitalized_changed,
    }));
    outcome.text = capitalized;
    outcome
}
