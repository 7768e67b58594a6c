//! RTF: Role, Task, Format.

use super::formatter::{FormatContext, FrameworkFormatter, style_for};

pub struct Rtf;

impl FrameworkFormatter for Rtf {
    fn id(&self) -> &'static str {
        "RTF"
    }

    fn format(&self, ctx: &FormatContext<'_>) -> String {
        format!(
            "Role: {role}\n\n\
             Task: {task}\n\n\
             Format: {style}. Output type: {output}. Audience: {audience}.",
            role = ctx.role_line(),
            task = ctx.task(),
            style = style_for(ctx.intent.output_type),
            output = ctx.output(),
            audience = ctx.audience(),
        )
    }
}
