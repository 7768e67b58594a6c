//! Post-hoc validation of the optimized text.
//!
//! Always five independent checks. A failed check is data, never an error.
//!
//! The framework documents are fixed-size scaffolds, so a prompt of three
//! words or fewer usually lands above the expansion ceiling and fails that
//! check.

use super::intent::{IntentProfile, PrimaryAction};
use crate::rules::compile;
use crate::scoring::metrics::{ACTION_VERBS, VAGUE_WORDS};
use crate::utils::text::{first_words, word_count};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const MIN_EXPANSION: f64 = 2.0;
pub const MAX_EXPANSION: f64 = 20.0;

pub const INTENT_PRESERVED: &str = "Intent preserved";
pub const VAGUENESS_REDUCED: &str = "Vagueness reduced";
pub const FORMAT_SPECIFIED: &str = "Output format specified";
pub const EXECUTABLE: &str = "Executable by a third party";
pub const EXPANSION: &str = "Appropriate expansion";

static VAGUE: Lazy<Regex> = Lazy::new(|| compile(VAGUE_WORDS));
static ACTION: Lazy<Regex> = Lazy::new(|| compile(ACTION_VERBS));
static FORMAT: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)(format|output|structure|deliver as|deliverable)"));
static CONTEXT: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)(context|background|you are|role|situation)"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationCheck {
    pub name: String,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ValidationCheck {
    fn new(name: &str, passed: bool, details: String) -> Self {
        Self {
            name: name.to_string(),
            passed,
            details: Some(details),
        }
    }
}

pub fn validate(original: &str, optimized: &str, intent: &IntentProfile) -> Vec<ValidationCheck> {
    vec![
        intent_preserved(original, optimized, intent.primary_action),
        vagueness_reduced(original, optimized),
        format_specified(optimized),
        executable(optimized),
        expansion(original, optimized),
    ]
}

fn intent_preserved(original: &str, optimized: &str, action: PrimaryAction) -> ValidationCheck {
    let haystack = optimized.to_lowercase();
    let opening = first_words(original, 5);
    let action_word = action.as_str();
    if haystack.contains(action_word) {
        ValidationCheck::new(INTENT_PRESERVED, true, format!("Primary action '{}' retained", action_word))
    } else if !opening.is_empty() && haystack.contains(&opening) {
        ValidationCheck::new(INTENT_PRESERVED, true, format!("Opening '{}' retained", opening))
    } else {
        ValidationCheck::new(
            INTENT_PRESERVED,
            false,
            format!("Neither '{}' nor the opening words of the prompt appear", action_word),
        )
    }
}

fn vagueness_reduced(original: &str, optimized: &str) -> ValidationCheck {
    let before = VAGUE.find_iter(original).count();
    let after = VAGUE.find_iter(optimized).count();
    ValidationCheck::new(
        VAGUENESS_REDUCED,
        after <= before,
        format!("Vague terms: {} before, {} after", before, after),
    )
}

fn format_specified(optimized: &str) -> ValidationCheck {
    let passed = FORMAT.is_match(optimized);
    let details = if passed {
        "Output format language present"
    } else {
        "State the expected format or deliverable"
    };
    ValidationCheck::new(FORMAT_SPECIFIED, passed, details.to_string())
}

fn executable(optimized: &str) -> ValidationCheck {
    let context = CONTEXT.is_match(optimized);
    let action = ACTION.is_match(optimized);
    let format = FORMAT.is_match(optimized);
    ValidationCheck::new(
        EXECUTABLE,
        context && action && format,
        format!("context: {}, action: {}, format: {}", context, action, format),
    )
}

fn expansion(original: &str, optimized: &str) -> ValidationCheck {
    let before = word_count(original);
    let after = word_count(optimized);
    if before == 0 {
        return ValidationCheck::new(EXPANSION, false, "Original prompt has no words".to_string());
    }
    let ratio = after as f64 / before as f64;
    ValidationCheck::new(
        EXPANSION,
        (MIN_EXPANSION..=MAX_EXPANSION).contains(&ratio),
        format!(
            "Expansion {:.1}x (expected {:.1}x to {:.1}x)",
            ratio, MIN_EXPANSION, MAX_EXPANSION
        ),
    )
}
