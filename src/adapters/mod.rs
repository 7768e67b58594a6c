//! Stage 5: tool adaptation.
//!
//! Adaptations are independent rules keyed on the tool's id, name, and
//! category. Rules run in registry order; each sees the output of the
//! rules before it.

pub mod chat;
pub mod code;
pub mod image;
pub mod research;
pub mod template;

use crate::knowledge::ToolDef;
use crate::pipeline::StageOutcome;
use crate::pipeline::intent::IntentProfile;
use once_cell::sync::Lazy;
use std::sync::Arc;

pub const STAGE: &str = "Tool Adaptation";

/// What a rule knows about the target
pub struct AdaptContext<'a> {
    pub tool_id: &'a str,
    /// The caller's original prompt
    pub prompt: &'a str,
    pub tool: &'a ToolDef,
    pub intent: &'a IntentProfile,
}

impl AdaptContext<'_> {
    /// Whether the tool id or display name mentions any of `needles`.
    pub fn tool_is(&self, needles: &[&str]) -> bool {
        let id = self.tool_id.to_lowercase();
        let name = self.tool.name.to_lowercase();
        needles.iter().any(|n| id.contains(n) || name.contains(n))
    }

    pub fn category_is(&self, category: &str) -> bool {
        self.tool.category.eq_ignore_ascii_case(category)
    }
}

pub trait AdapterRule: Send + Sync {
    /// Technique name reported when the rule fires
    fn name(&self) -> &'static str;
    fn applies(&self, ctx: &AdaptContext<'_>, text: &str) -> bool;
    fn adapt(&self, ctx: &AdaptContext<'_>, text: &str) -> String;
}

static RULES: Lazy<Vec<Arc<dyn AdapterRule>>> = Lazy::new(|| {
    vec![
        Arc::new(template::ToolTemplate),
        Arc::new(chat::StepInstructions),
        Arc::new(chat::ChainOfThought),
        Arc::new(chat::FormatHint),
        Arc::new(image::MidjourneyParameters),
        Arc::new(image::SceneDetail),
        Arc::new(code::FileReferences),
        Arc::new(code::CodingRequirements),
        Arc::new(research::ResearchScope),
    ]
});

pub fn rules() -> &'static [Arc<dyn AdapterRule>] {
    &RULES
}

pub fn adapt_for_tool(
    text: &str,
    prompt: &str,
    tool_id: &str,
    tool: Option<&ToolDef>,
    intent: &IntentProfile,
) -> StageOutcome {
    let Some(tool) = tool else {
        tracing::warn!("Tool '{}' not in catalog, skipping adaptation", tool_id);
        return StageOutcome::unchanged(text);
    };
    let ctx = AdaptContext {
        tool_id,
        prompt,
        tool,
        intent,
    };

    let mut outcome = StageOutcome::unchanged(text);
    for rule in RULES.iter() {
        if rule.applies(&ctx, &outcome.text) {
            outcome.text = rule.adapt(&ctx, &outcome.text);
            outcome.technique(rule.name());
            tracing::debug!("Adapter rule '{}' fired for {}", rule.name(), tool_id);
        }
    }
    outcome.applied = !outcome.techniques.is_empty();
    if outcome.applied {
        outcome.detail = Some(serde_json::json!({ "rules": outcome.techniques }));
    }
    outcome
}

/// Case-insensitive containment.
pub(crate) fn mentions(text: &str, needle: &str) -> bool {
    text.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::KnowledgeBase;
    use crate::pipeline::intent::analyze_intent;

    fn adapt(tool_id: &str, prompt: &str) -> StageOutcome {
        let kb = KnowledgeBase::builtin();
        let tool = kb.tool(tool_id);
        let intent = analyze_intent(prompt, tool);
        adapt_for_tool(prompt, prompt, tool_id, tool, &intent)
    }

    #[test]
    fn test_unknown_tool_passes_through() {
        let kb = KnowledgeBase::builtin();
        let intent = analyze_intent("draw a cat", None);
        let out = adapt_for_tool("draw a cat", "draw a cat", "nope", None, &intent);
        assert!(!out.applied);
        assert_eq!(out.text, "draw a cat");
        assert!(kb.tool("nope").is_none());
    }

    #[test]
    fn test_rules_fire_in_registry_order() {
        let out = adapt(
            "claude_chat",
            "Analyze our churn numbers for 2024: compare cohorts and segments, and also list drivers",
        );
        assert_eq!(
            out.techniques,
            vec!["tool_template", "step_instructions", "chain_of_thought"]
        );
        assert!(out.text.starts_with("Approach this task thoughtfully"));
        let steps = out.text.find("Follow these steps:").unwrap();
        let cot = out.text.find("step by step").unwrap();
        assert!(steps < cot);
    }

    #[test]
    fn test_weighting_only_touches_the_instruction() {
        let prompt = "castle, fog, ravens, moonlight, ruins";
        let text = format!("Context: night, wind, rain, cold, dark\n\nInstruction: {}", prompt);
        let kb = KnowledgeBase::builtin();
        let tool = kb.tool("midjourney");
        let intent = analyze_intent(prompt, tool);
        let out = adapt_for_tool(&text, prompt, "midjourney", tool, &intent);
        assert!(out.text.starts_with("Context: night, wind, rain, cold, dark\n"));
        assert!(out.text.contains("Instruction: castle:: fog:: ravens:: moonlight:: ruins --ar"));
    }

    #[test]
    fn test_adaptation_is_idempotent() {
        let first = adapt("midjourney", "a lighthouse at dusk");
        let kb = KnowledgeBase::builtin();
        let tool = kb.tool("midjourney");
        let intent = analyze_intent("a lighthouse at dusk", tool);
        let second = adapt_for_tool(&first.text, "a lighthouse at dusk", "midjourney", tool, &intent);
        assert!(!second.applied);
        assert_eq!(second.text, first.text);
    }
}
