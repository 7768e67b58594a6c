//! Stage 6: quality enhancement.
//!
//! Blocks go after the body and before a trailing parameter run, so image
//! parameters stay the last thing in the prompt.

use super::StageOutcome;
use super::gaps::{self, Gap, has_gap};
use super::intent::{Complexity, IntentProfile};
use crate::adapters::image::split_parameter_tail;
use crate::rules::compile;
use once_cell::sync::Lazy;
use regex::Regex;

static EDGE_WORDS: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\b(edge cases?|exceptions?|errors?|fallbacks?)\b"));
static SUCCESS_WORDS: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\b(success|criteria|validate|verify)\b"));

const EXAMPLE_BLOCK: &str = "\n\nExample Output:\n[Provide one short example of the expected result]";
const EDGE_CASE_BLOCK: &str = "\n\nEdge Cases:\n\
    - [Empty or missing input]\n\
    - [Unusually large input]\n\
    - [Conflicting requirements]";
const SUCCESS_BLOCK: &str = "\n\nSuccess Criteria:\n\
    - The result addresses every requirement above\n\
    - The output matches the requested format\n\
    - Claims and numbers can be checked";
const METRICS_LINE: &str = "\n\nMetrics: [Add specific numbers, targets, or limits]";

pub fn enhance_quality(text: &str, intent: &IntentProfile, gaps: &[Gap]) -> StageOutcome {
    let mut outcome = StageOutcome::unchanged(text);
    let (body, tail) = split_parameter_tail(text);
    let mut out = body.to_string();

    if has_gap(gaps, gaps::EXAMPLES) && intent.complexity != Complexity::Low {
        out.push_str(EXAMPLE_BLOCK);
        outcome.technique("few_shot");
    }
    if intent.complexity == Complexity::High && !EDGE_WORDS.is_match(text) {
        out.push_str(EDGE_CASE_BLOCK);
        outcome.technique("edge_cases");
    }
    if !SUCCESS_WORDS.is_match(text) {
        out.push_str(SUCCESS_BLOCK);
        outcome.technique("success_criteria");
    }
    if has_gap(gaps, gaps::METRICS) {
        out.push_str(METRICS_LINE);
        outcome.technique("specificity");
    }

    if !outcome.techniques.is_empty() {
        if !tail.is_empty() {
            out.push_str("\n\n");
            out.push_str(tail.trim_start());
        }
        outcome.text = out;
        outcome.applied = true;
    }
    outcome
}
