//! Stage 2: gap detection.
//!
//! Enumerates what the prompt is missing relative to generic best practice,
//! the selected tool's required phrases, and the selected framework's
//! components. Evaluation order is fixed and is the order of the output.

use super::intent::{Complexity, Domain, IntentProfile};
use crate::knowledge::{FrameworkDef, ToolDef};
use crate::rules::compile;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const METRICS: &str = "metrics";
pub const TIMELINE: &str = "timeline";
pub const OUTPUT_FORMAT: &str = "output_format";
pub const EXAMPLES: &str = "examples";
pub const CONSTRAINTS: &str = "constraints";
pub const NEGATIVE_CONSTRAINTS: &str = "negative_constraints";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
}

/// A missing element with a suggested fix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gap {
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: Severity,
    pub fix: String,
}

/// A best-practice check that reports a gap when `present` does not match.
struct GapCheck {
    kind: &'static str,
    severity: Severity,
    fix: &'static str,
    present: Regex,
    skip: fn(&IntentProfile) -> bool,
}

static CHECKS: Lazy<Vec<GapCheck>> = Lazy::new(|| {
    vec![
        GapCheck {
            kind: METRICS,
            severity: Severity::High,
            fix: "Add specific numbers, percentages, or quantities",
            present: compile(r"\d"),
            skip: |_| false,
        },
        GapCheck {
            kind: TIMELINE,
            severity: Severity::Medium,
            fix: "Specify a timeframe or deadline",
            present: compile(
                r"(?i)\b(deadline|timeline|by|before|after|duration|today|tomorrow|days?|weeks?|months?|years?|quarter)\b",
            ),
            skip: |intent| intent.domain == Domain::Creative,
        },
        GapCheck {
            kind: OUTPUT_FORMAT,
            severity: Severity::High,
            fix: "Define the output format (structure, length, style)",
            present: compile(r"(?i)\b(format|output|structure|style|json|table|list|bullets?|markdown|csv)\b"),
            skip: |_| false,
        },
        GapCheck {
            kind: EXAMPLES,
            severity: Severity::Medium,
            fix: "Provide an example of the expected result",
            present: compile(r"(?i)(example|e\.g\.|for instance|such as|sample)"),
            skip: |intent| intent.complexity == Complexity::Low,
        },
        GapCheck {
            kind: CONSTRAINTS,
            severity: Severity::Medium,
            fix: "State constraints such as scope, length, or limits",
            present: compile(
                r"(?i)\b(must|should|required?|requires|constraints?|limits?|only|within|at most|at least|maximum|minimum)\b",
            ),
            skip: |_| false,
        },
    ]
});

static NEGATIVE: Lazy<Regex> = Lazy::new(|| compile(r"(?i)\b(don't|do not|avoid|never|no)\b"));

fn push_unique(gaps: &mut Vec<Gap>, gap: Gap) {
    if !gaps.iter().any(|g| g.kind == gap.kind) {
        gaps.push(gap);
    }
}

pub fn detect_gaps(
    prompt: &str,
    intent: &IntentProfile,
    tool: Option<&ToolDef>,
    framework: Option<&FrameworkDef>,
) -> Vec<Gap> {
    let mut gaps = Vec::new();
    let lower = prompt.to_lowercase();

    for check in CHECKS.iter() {
        if (check.skip)(intent) || check.present.is_match(prompt) {
            continue;
        }
        push_unique(
            &mut gaps,
            Gap {
                kind: check.kind.to_string(),
                severity: check.severity,
                fix: check.fix.to_string(),
            },
        );
    }

    if let Some(tool) = tool {
        for phrase in &tool.must_include {
            if !lower.contains(&phrase.to_lowercase()) {
                push_unique(
                    &mut gaps,
                    Gap {
                        kind: format!("tool_requirement:{}", phrase.to_lowercase()),
                        severity: Severity::High,
                        fix: format!("Include {} (expected by {})", phrase, tool.name),
                    },
                );
            }
        }
    }

    if let Some(framework) = framework {
        for component in &framework.components {
            if !lower.contains(&component.to_lowercase()) {
                push_unique(
                    &mut gaps,
                    Gap {
                        kind: format!("framework_component:{}", component.to_lowercase()),
                        severity: Severity::Medium,
                        fix: format!("Add a {} section ({} framework)", component, framework.name),
                    },
                );
            }
        }
    }

    if NEGATIVE.is_match(prompt) {
        push_unique(
            &mut gaps,
            Gap {
                kind: NEGATIVE_CONSTRAINTS.to_string(),
                severity: Severity::High,
                fix: "Rephrase negative constraints as positive instructions".to_string(),
            },
        );
    }

    gaps
}

/// Whether a gap of `kind` was detected.
pub fn has_gap(gaps: &[Gap], kind: &str) -> bool {
    gaps.iter().any(|g| g.kind == kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::intent::analyze_intent;

    fn kinds(gaps: &[Gap]) -> Vec<&str> {
        gaps.iter().map(|g| g.kind.as_str()).collect()
    }

    #[test]
    fn test_bare_prompt_reports_metrics_and_format() {
        let prompt = "write a report";
        let intent = analyze_intent(prompt, None);
        let gaps = detect_gaps(prompt, &intent, None, None);
        let metrics = gaps.iter().find(|g| g.kind == METRICS).unwrap();
        assert_eq!(metrics.severity, Severity::High);
        let format = gaps.iter().find(|g| g.kind == OUTPUT_FORMAT).unwrap();
        assert_eq!(format.severity, Severity::High);
        // low complexity skips examples
        assert!(!has_gap(&gaps, EXAMPLES));
        assert_eq!(kinds(&gaps), vec![METRICS, TIMELINE, OUTPUT_FORMAT, CONSTRAINTS]);
    }

    #[test]
    fn test_creative_domain_skips_timeline() {
        let prompt = "a poem about autumn";
        let intent = analyze_intent(prompt, None);
        assert!(!has_gap(&detect_gaps(prompt, &intent, None, None), TIMELINE));
    }

    #[test]
    fn test_tool_and_framework_gaps_in_order() {
        let tool = ToolDef {
            name: "T".into(),
            must_include: vec!["Audience".into(), "tone".into()],
            ..Default::default()
        };
        let fw = FrameworkDef {
            name: "RTF".into(),
            components: vec!["Role".into(), "Task".into(), "Format".into()],
        };
        let prompt = "Set the tone for the task, never ramble";
        let intent = analyze_intent(prompt, None);
        let gaps = detect_gaps(prompt, &intent, Some(&tool), Some(&fw));
        let tail: Vec<&str> = kinds(&gaps).into_iter().skip_while(|k| !k.contains(':')).collect();
        assert_eq!(
            tail,
            vec![
                "tool_requirement:audience",
                "framework_component:role",
                "framework_component:format",
                NEGATIVE_CONSTRAINTS
            ]
        );
        let tool_gap = gaps.iter().find(|g| g.kind == "tool_requirement:audience").unwrap();
        assert_eq!(tool_gap.severity, Severity::High);
    }

    #[test]
    fn test_duplicate_requirements_collapse() {
        let tool = ToolDef {
            name: "T".into(),
            must_include: vec!["scope".into(), "Scope".into()],
            ..Default::default()
        };
        let intent = analyze_intent("x", None);
        let gaps = detect_gaps("x", &intent, Some(&tool), None);
        assert_eq!(gaps.iter().filter(|g| g.kind == "tool_requirement:scope").count(), 1);
    }
}
