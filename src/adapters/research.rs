//! Search and deep-research tools.

use super::{AdaptContext, AdapterRule, mentions};

pub struct ResearchScope;

impl AdapterRule for ResearchScope {
    fn name(&self) -> &'static str {
        "research_scope"
    }

    fn applies(&self, ctx: &AdaptContext<'_>, text: &str) -> bool {
        ctx.category_is("research") && !mentions(text, "timeframe:")
    }

    fn adapt(&self, _ctx: &AdaptContext<'_>, text: &str) -> String {
        let mut out = format!("{}\n\nTimeframe: [e.g. publications since 2023]", text);
        if !mentions(text, "source types:") {
            out.push_str("\nSource types: [Peer-reviewed papers, official statistics, industry reports]");
        }
        out
    }
}
