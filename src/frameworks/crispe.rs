//! CRISPE: Context, Role, Instruction, Specification, Performance, Example.

use super::formatter::{FormatContext, FrameworkFormatter};

pub struct Crispe;

impl FrameworkFormatter for Crispe {
    fn id(&self) -> &'static str {
        "CRISPE"
    }

    fn format(&self, ctx: &FormatContext<'_>) -> String {
        let intent = ctx.intent;
        format!(
            "Context: A {domain} request for {tool}. Underlying goal: {goal}\n\n\
             Role: {role}\n\n\
             Instruction: {task}\n\n\
             Specification:\n\
             - Output type: {output}\n\
             - Audience: {audience}\n\
             - Depth: suited to a {complexity}-complexity request\n\n\
             Performance Criteria:\n\
             - Fully addresses the instruction\n\
             - Serves the underlying goal\n\
             - Uses a layout suited to {output} output\n\n\
             Example: [Provide a sample of the desired {output}]",
            domain = intent.domain,
            tool = ctx.tool_name(),
            goal = ctx.goal(),
            role = ctx.role_line(),
            task = ctx.task(),
            output = ctx.output(),
            audience = ctx.audience(),
            complexity = intent.complexity,
        )
    }
}
