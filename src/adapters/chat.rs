//! Conversational assistants (Claude, ChatGPT, Gemini).

use super::{AdaptContext, AdapterRule, mentions};
use crate::pipeline::intent::{Complexity, OutputType, PrimaryAction};

const ASSISTANTS: &[&str] = &["claude", "chatgpt", "gpt", "gemini"];

fn is_assistant(ctx: &AdaptContext<'_>) -> bool {
    ctx.category_is("chat") && ctx.tool_is(ASSISTANTS)
}

/// Numbered working steps for anything beyond a one-liner
pub struct StepInstructions;

impl AdapterRule for StepInstructions {
    fn name(&self) -> &'static str {
        "step_instructions"
    }

    fn applies(&self, ctx: &AdaptContext<'_>, text: &str) -> bool {
        is_assistant(ctx)
            && ctx.intent.complexity != Complexity::Low
            && !mentions(text, "follow these steps")
    }

    fn adapt(&self, _ctx: &AdaptContext<'_>, text: &str) -> String {
        format!(
            "{}\n\nFollow these steps:\n\
             1. Restate the goal in one sentence\n\
             2. Work through each requirement in order\n\
             3. Check the result against the requirements before answering",
            text
        )
    }
}

pub struct ChainOfThought;

impl AdapterRule for ChainOfThought {
    fn name(&self) -> &'static str {
        "chain_of_thought"
    }

    fn applies(&self, ctx: &AdaptContext<'_>, text: &str) -> bool {
        is_assistant(ctx)
            && ctx.intent.primary_action == PrimaryAction::Analyze
            && !mentions(text, "step by step")
    }

    fn adapt(&self, _ctx: &AdaptContext<'_>, text: &str) -> String {
        format!(
            "{}\n\nThink through this step by step and show your reasoning before the final answer.",
            text
        )
    }
}

/// Explicit serialization hint for structured-data requests.
pub struct FormatHint;

impl AdapterRule for FormatHint {
    fn name(&self) -> &'static str {
        "structured_output"
    }

    fn applies(&self, ctx: &AdaptContext<'_>, text: &str) -> bool {
        ctx.category_is("chat")
            && ctx.intent.output_type == OutputType::StructuredData
            && !["json", "csv", "yaml", "table"].iter().any(|f| mentions(text, f))
    }

    fn adapt(&self, _ctx: &AdaptContext<'_>, text: &str) -> String {
        format!(
            "{}\n\nReturn the result as a table or a JSON object with consistent field names.",
            text
        )
    }
}
