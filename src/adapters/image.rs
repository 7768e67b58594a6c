//! Image generators.

use super::{AdaptContext, AdapterRule, mentions};
use crate::rules::compile;
use once_cell::sync::Lazy;
use regex::Regex;

/// Comma runs at or above this length become Midjourney weight separators
const WEIGHT_SEPARATOR_MIN_COMMAS: usize = 4;

pub const MIDJOURNEY_PARAMETERS: &str = "--ar 16:9 --stylize 250";
pub const MIDJOURNEY_EXCLUSIONS: &str = "--no text, watermark, blurry";

/// A trailing run of Midjourney parameters on the last line
static PARAMETER_TAIL: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?s)^(.*?)(\s+--(?:ar|aspect|stylize|s|no|v|version|chaos|c|q|quality|seed|style|niji|tile|weird|iw)\b[^\n]*)$",
    )
});

/// Split `text` into its body and a trailing parameter run, if any.
///
/// Later stages append to the body and re-attach the tail so parameters
/// stay at the very end of the prompt.
pub fn split_parameter_tail(text: &str) -> (&str, &str) {
    match PARAMETER_TAIL.captures(text) {
        Some(caps) => match (caps.get(1), caps.get(2)) {
            (Some(body), Some(tail)) => (body.as_str(), tail.as_str()),
            _ => (text, ""),
        },
        None => (text, ""),
    }
}

pub struct MidjourneyParameters;

impl AdapterRule for MidjourneyParameters {
    fn name(&self) -> &'static str {
        "midjourney_parameters"
    }

    fn applies(&self, ctx: &AdaptContext<'_>, text: &str) -> bool {
        ctx.tool_is(&["midjourney"])
            && (!text.contains("--ar") || !text.contains("--no") || needs_weights(ctx, text))
    }

    fn adapt(&self, ctx: &AdaptContext<'_>, text: &str) -> String {
        let mut out = if needs_weights(ctx, text) {
            let instruction = ctx.prompt.trim();
            text.replace(instruction, &weighted(instruction))
        } else {
            text.to_string()
        };
        if !out.contains("--ar") {
            out.push(' ');
            out.push_str(MIDJOURNEY_PARAMETERS);
        }
        if !out.contains("--no") {
            out.push(' ');
            out.push_str(MIDJOURNEY_EXCLUSIONS);
        }
        out
    }
}

/// The caller's clauses are comma-heavy and still appear unweighted.
fn needs_weights(ctx: &AdaptContext<'_>, text: &str) -> bool {
    let instruction = ctx.prompt.trim();
    !instruction.contains("::")
        && instruction.matches(',').count() >= WEIGHT_SEPARATOR_MIN_COMMAS
        && text.contains(instruction)
}

fn weighted(instruction: &str) -> String {
    instruction
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join(":: ")
}

/// Lighting and camera scaffolding for photographic generators
pub struct SceneDetail;

impl AdapterRule for SceneDetail {
    fn name(&self) -> &'static str {
        "visual_detail"
    }

    fn applies(&self, ctx: &AdaptContext<'_>, text: &str) -> bool {
        ctx.tool_is(&["flux", "dall-e", "dalle"]) && !mentions(text, "lighting:")
    }

    fn adapt(&self, _ctx: &AdaptContext<'_>, text: &str) -> String {
        format!(
            "{}\n\nLighting: [Light source, direction, and mood]\n\
             Camera: [Lens, angle, and distance]\n\
             Composition: [Subject placement and framing]\n\
             Style: [Art style or visual reference]",
            text
        )
    }
}
