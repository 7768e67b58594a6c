//! CO-STAR: Context, Objective, Style, Tone, Audience, Response.

use super::formatter::{FormatContext, FrameworkFormatter, style_for, tone_for};

pub struct CoStar;

impl FrameworkFormatter for CoStar {
    fn id(&self) -> &'static str {
        "CO-STAR"
    }

    fn format(&self, ctx: &FormatContext<'_>) -> String {
        let intent = ctx.intent;
        format!(
            "Context: A {domain} request for {tool}. Underlying goal: {goal}\n\n\
             Objective: {task}\n\n\
             Style: {style}\n\n\
             Tone: {tone}\n\n\
             Audience: {audience}\n\n\
             Response: Deliver the result as {output}.",
            domain = intent.domain,
            tool = ctx.tool_name(),
            goal = ctx.goal(),
            task = ctx.task(),
            style = style_for(intent.output_type),
            tone = tone_for(intent.audience),
            audience = ctx.audience(),
            output = ctx.output(),
        )
    }
}
