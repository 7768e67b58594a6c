//! RISEN: Role, Instructions, Steps, End goal, Narrowing.

use super::formatter::{FormatContext, FrameworkFormatter, action_step};

pub struct Risen;

impl FrameworkFormatter for Risen {
    fn id(&self) -> &'static str {
        "RISEN"
    }

    fn format(&self, ctx: &FormatContext<'_>) -> String {
        format!(
            "Role: {role}\n\n\
             Instructions: {task}\n\n\
             Steps:\n\
             1. Clarify the requirements and the underlying goal\n\
             2. {step}\n\
             3. Review the result against the end goal\n\n\
             End Goal: {goal}\n\n\
             Narrowing:\n\
             - Output type: {output}\n\
             - Audience: {audience}\n\
             - Stay within the scope of the instructions",
            role = ctx.role_line(),
            task = ctx.task(),
            step = action_step(ctx.intent.primary_action),
            goal = ctx.goal(),
            output = ctx.output(),
            audience = ctx.audience(),
        )
    }
}
