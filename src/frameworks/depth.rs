//! DEPTH: Define the role, Establish success metrics, Provide context,
//! Task breakdown, Human feedback loop.

use super::formatter::{FormatContext, FrameworkFormatter, action_step};
use crate::utils::text::article;

pub struct Depth;

impl FrameworkFormatter for Depth {
    fn id(&self) -> &'static str {
        "DEPTH"
    }

    fn format(&self, ctx: &FormatContext<'_>) -> String {
        let output = ctx.output();
        format!(
            "Define Role: {role}\n\n\
             Establish Success Metrics:\n\
             - {goal}\n\
             - The output is {a} complete {output}\n\n\
             Provide Context: A {domain} request for {tool}. Audience: {audience}.\n\n\
             Task Breakdown:\n\
             1. {task}\n\
             2. {step}\n\
             3. Verify the result against the success metrics\n\n\
             Human Feedback Loop: After responding, ask the one question that would most improve the next iteration.",
            role = ctx.role_line(),
            goal = ctx.goal(),
            a = article(output),
            output = output,
            domain = ctx.intent.domain,
            tool = ctx.tool_name(),
            audience = ctx.audience(),
            task = ctx.task(),
            step = action_step(ctx.intent.primary_action),
        )
    }
}
