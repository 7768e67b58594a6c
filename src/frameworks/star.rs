//! STAR: Situation, Task, Action, Result.

use super::formatter::{FormatContext, FrameworkFormatter, action_step};

pub struct Star;

impl FrameworkFormatter for Star {
    fn id(&self) -> &'static str {
        "STAR"
    }

    fn format(&self, ctx: &FormatContext<'_>) -> String {
        format!(
            "Situation: A {domain} request for {tool}. Audience: {audience}.\n\n\
             Task: {task}\n\n\
             Action: {step}.\n\n\
             Result: {goal}. Deliver the result as {output}.",
            domain = ctx.intent.domain,
            tool = ctx.tool_name(),
            audience = ctx.audience(),
            task = ctx.task(),
            step = action_step(ctx.intent.primary_action),
            goal = ctx.goal().trim_end_matches('.'),
            output = ctx.output(),
        )
    }
}
