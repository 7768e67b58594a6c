//! Fallback for frameworks without a dedicated strategy: one labeled
//! placeholder per declared component, then the incoming text.

use super::formatter::{FormatContext, FrameworkFormatter};

pub struct Generic;

impl FrameworkFormatter for Generic {
    fn id(&self) -> &'static str {
        "generic"
    }

    fn format(&self, ctx: &FormatContext<'_>) -> String {
        let name = if ctx.framework.name.is_empty() {
            "Custom"
        } else {
            ctx.framework.name.as_str()
        };
        let mut out = format!("Using {} Framework:\n\n", name);
        for component in &ctx.framework.components {
            out.push_str(&format!("{}: [Define {}]\n", component, component.to_lowercase()));
        }
        out.push_str(&format!("\nOriginal Intent: {}", ctx.text.trim()));
        out
    }
}
