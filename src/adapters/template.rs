//! Catalog-supplied preambles.

use super::{AdaptContext, AdapterRule};
use crate::knowledge::ToolDef;

/// Leads the prompt with the tool's own template, when it has one
pub struct ToolTemplate;

impl ToolTemplate {
    fn template<'a>(ctx: &AdaptContext<'a>) -> Option<&'a str> {
        let tool: &'a ToolDef = ctx.tool;
        tool.template
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

impl AdapterRule for ToolTemplate {
    fn name(&self) -> &'static str {
        "tool_template"
    }

    fn applies(&self, ctx: &AdaptContext<'_>, text: &str) -> bool {
        Self::template(ctx).is_some_and(|t| !text.contains(t))
    }

    fn adapt(&self, ctx: &AdaptContext<'_>, text: &str) -> String {
        match Self::template(ctx) {
            Some(template) => format!("{}\n\n{}", template, text),
            None => text.to_string(),
        }
    }
}
