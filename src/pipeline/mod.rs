//! The seven-stage optimization pipeline and its validator.
//!
//! Stages run in a fixed order. Each consumes the previous stage's text plus
//! the shared Stage 1/2 results and yields one [`StageRecord`]. A fault in
//! any stage aborts the run; no partial result is returned.

pub mod context;
pub mod enhance;
pub mod gaps;
pub mod intent;
pub mod polish;
pub mod validate;

use crate::error::{PromptForgeError, Result};
use crate::knowledge::KnowledgeBase;
use crate::{adapters, frameworks};
use serde::{Deserialize, Serialize};
use validate::ValidationCheck;

/// Inputs above this size are rejected before any stage runs
pub const MAX_PROMPT_SIZE: usize = 100 * 1024;

pub const STAGE_INTENT: &str = "Intent Analysis";
pub const STAGE_GAPS: &str = "Gap Detection";
pub const STAGE_CONTEXT: &str = "Context Injection";
pub const STAGE_POLISH: &str = "Final Polish";
pub const STAGE_VALIDATION: &str = "Validation";

/// What a single text-transforming stage produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageOutcome {
    pub text: String,
    pub applied: bool,
    /// Technique names, in the order they fired
    pub techniques: Vec<String>,
    pub detail: Option<serde_json::Value>,
}

impl StageOutcome {
    /// Pass-through outcome: `text` verbatim, nothing applied.
    pub fn unchanged(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Self::default()
        }
    }

    pub fn technique(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.techniques.contains(&name) {
            self.techniques.push(name);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageRecord {
    pub name: String,
    pub output: String,
    pub applied: bool,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    pub final_text: String,
    /// Distinct technique names, in first-applied order
    pub applied_techniques: Vec<String>,
    pub stages: Vec<StageRecord>,
    pub validation: Vec<ValidationCheck>,
}

impl OptimizationResult {
    pub fn stage(&self, name: &str) -> Option<&StageRecord> {
        self.stages.iter().find(|s| s.name == name)
    }

    pub fn passed_checks(&self) -> usize {
        self.validation.iter().filter(|c| c.passed).count()
    }
}

/// Accumulates stage records and techniques for one run.
#[derive(Default)]
struct RunLog {
    stages: Vec<StageRecord>,
    techniques: Vec<String>,
}

impl RunLog {
    fn record(&mut self, name: &str, description: String, outcome: &StageOutcome) {
        tracing::debug!(
            stage = name,
            applied = outcome.applied,
            chars = outcome.text.len(),
            "{}",
            description
        );
        for technique in &outcome.techniques {
            if !self.techniques.contains(technique) {
                self.techniques.push(technique.clone());
            }
        }
        self.stages.push(StageRecord {
            name: name.to_string(),
            output: outcome.text.clone(),
            applied: outcome.applied,
            description,
            detail: outcome.detail.clone(),
        });
    }
}

fn describe(applied: bool, when_applied: String, when_skipped: &str) -> String {
    if applied {
        when_applied
    } else {
        when_skipped.to_string()
    }
}

fn detail_of<T: Serialize>(stage: &str, value: &T) -> Result<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| PromptForgeError::pipeline(stage, e.to_string()))
}

/// Reject input the pipeline will not process.
pub fn validate_prompt(prompt: &str) -> Result<()> {
    if prompt.trim().is_empty() {
        return Err(PromptForgeError::InvalidParams {
            message: "Prompt cannot be empty".to_string(),
        });
    }
    if prompt.len() > MAX_PROMPT_SIZE {
        return Err(PromptForgeError::InvalidParams {
            message: format!(
                "Prompt exceeds maximum size of {}KB ({} bytes)",
                MAX_PROMPT_SIZE / 1024,
                prompt.len()
            ),
        });
    }
    Ok(())
}

/// Run all seven stages and the validator over `prompt`.
///
/// Unknown tool or framework ids degrade the tool- and framework-specific
/// stages to pass-through.
pub fn optimize(
    prompt: &str,
    tool_id: &str,
    framework_id: &str,
    kb: &KnowledgeBase,
) -> Result<OptimizationResult> {
    validate_prompt(prompt)?;
    let tool = kb.tool(tool_id);
    let framework = kb.framework(framework_id);
    let mut log = RunLog::default();

    let profile = intent::analyze_intent(prompt, tool);
    let mut stage = StageOutcome::unchanged(prompt);
    stage.applied = true;
    stage.detail = Some(detail_of(STAGE_INTENT, &profile)?);
    log.record(
        STAGE_INTENT,
        format!(
            "{} {} request, {} complexity",
            profile.domain, profile.primary_action, profile.complexity
        ),
        &stage,
    );

    let found = gaps::detect_gaps(prompt, &profile, tool, framework);
    let mut stage = StageOutcome::unchanged(prompt);
    stage.applied = !found.is_empty();
    stage.detail = Some(detail_of(STAGE_GAPS, &found)?);
    log.record(
        STAGE_GAPS,
        format!("{} gaps detected", found.len()),
        &stage,
    );

    let injected = context::inject_context(prompt, &profile);
    log.record(
        STAGE_CONTEXT,
        describe(
            injected.applied,
            format!("Added {}", injected.techniques.join(", ")),
            "Prompt already carries role and context",
        ),
        &injected,
    );

    let formatted = frameworks::apply_framework(
        &injected.text,
        prompt,
        framework_id,
        framework,
        &profile,
        tool,
    )?;
    log.record(
        frameworks::STAGE,
        describe(
            formatted.applied,
            format!("Restructured with {}", framework_id),
            "Framework not in catalog",
        ),
        &formatted,
    );

    let adapted = adapters::adapt_for_tool(&formatted.text, prompt, tool_id, tool, &profile);
    log.record(
        adapters::STAGE,
        describe(
            adapted.applied,
            format!("Applied {}", adapted.techniques.join(", ")),
            "No tool-specific conventions applied",
        ),
        &adapted,
    );

    let enhanced = enhance::enhance_quality(&adapted.text, &profile, &found);
    log.record(
        "Quality Enhancement",
        describe(
            enhanced.applied,
            format!("Added {}", enhanced.techniques.join(", ")),
            "No enhancements needed",
        ),
        &enhanced,
    );

    let polished = polish::polish(&enhanced.text);
    if polished.text.trim().is_empty() {
        return Err(PromptForgeError::pipeline(STAGE_POLISH, "pipeline produced empty text"));
    }
    log.record(
        STAGE_POLISH,
        describe(polished.applied, "Rewrote phrasing".to_string(), "Text already polished"),
        &polished,
    );

    let checks = validate::validate(prompt, &polished.text, &profile);
    let passed = checks.iter().filter(|c| c.passed).count();
    let mut stage = StageOutcome::unchanged(&polished.text);
    stage.applied = true;
    stage.detail = Some(detail_of(STAGE_VALIDATION, &checks)?);
    log.record(
        STAGE_VALIDATION,
        format!("{}/{} checks passed", passed, checks.len()),
        &stage,
    );

    Ok(OptimizationResult {
        final_text: polished.text,
        applied_techniques: log.techniques,
        stages: log.stages,
        validation: checks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_outcome_dedupes_techniques() {
        let mut out = StageOutcome::unchanged("x");
        out.technique("a");
        out.technique("b");
        out.technique("a");
        assert_eq!(out.techniques, vec!["a", "b"]);
        assert!(!out.applied);
    }

    #[test]
    fn test_rejects_empty_and_oversized() {
        let kb = KnowledgeBase::builtin();
        assert!(matches!(
            optimize("   ", "claude_chat", "CRISPE", &kb),
            Err(PromptForgeError::InvalidParams { .. })
        ));
        let huge = "a".repeat(MAX_PROMPT_SIZE + 1);
        assert!(optimize(&huge, "claude_chat", "CRISPE", &kb).is_err());
    }

    #[test]
    fn test_eight_records_in_fixed_order() {
        let kb = KnowledgeBase::builtin();
        let result = optimize("write a report", "claude_chat", "CRISPE", &kb).unwrap();
        let names: Vec<&str> = result.stages.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Intent Analysis",
                "Gap Detection",
                "Context Injection",
                "Framework Formatting",
                "Tool Adaptation",
                "Quality Enhancement",
                "Final Polish",
                "Validation"
            ]
        );
        assert_eq!(result.validation.len(), 5);
        assert_eq!(result.stages.last().unwrap().output, result.final_text);
    }

    #[test]
    fn test_techniques_are_distinct() {
        let kb = KnowledgeBase::builtin();
        let result = optimize("write a report", "claude_chat", "CRISPE", &kb).unwrap();
        let mut sorted = result.applied_techniques.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), result.applied_techniques.len());
        assert_eq!(result.applied_techniques[0], "role_prompting");
        assert!(result.applied_techniques.contains(&"framework:CRISPE".to_string()));
    }
}
