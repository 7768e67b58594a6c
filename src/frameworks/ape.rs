//! APE: Action, Purpose, Expectation.

use super::formatter::{FormatContext, FrameworkFormatter};
use crate::utils::text::article;

pub struct Ape;

impl FrameworkFormatter for Ape {
    fn id(&self) -> &'static str {
        "APE"
    }

    fn format(&self, ctx: &FormatContext<'_>) -> String {
        let output = ctx.output();
        format!(
            "Action: {task}\n\n\
             Purpose: {goal}\n\n\
             Expectation: {a} {output} result for audience: {audience}, at {complexity} depth.",
            task = ctx.task(),
            goal = ctx.goal(),
            a = capitalized_article(output),
            output = output,
            audience = ctx.audience(),
            complexity = ctx.intent.complexity,
        )
    }
}

fn capitalized_article(word: &str) -> &'static str {
    match article(word) {
        "an" => "An",
        _ => "A",
    }
}
