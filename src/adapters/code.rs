//! Coding assistants.

use super::{AdaptContext, AdapterRule, mentions};

/// File anchors for editor-integrated assistants
pub struct FileReferences;

impl AdapterRule for FileReferences {
    fn name(&self) -> &'static str {
        "file_references"
    }

    fn applies(&self, ctx: &AdaptContext<'_>, text: &str) -> bool {
        ctx.tool_is(&["cursor", "copilot"]) && !mentions(text, "files:")
    }

    fn adapt(&self, _ctx: &AdaptContext<'_>, text: &str) -> String {
        format!("{}\n\nFiles: @[path/to/relevant/file]", text)
    }
}

pub struct CodingRequirements;

impl AdapterRule for CodingRequirements {
    fn name(&self) -> &'static str {
        "coding_requirements"
    }

    fn applies(&self, ctx: &AdaptContext<'_>, text: &str) -> bool {
        ctx.category_is("coding") && !mentions(text, "requirements:")
    }

    fn adapt(&self, _ctx: &AdaptContext<'_>, text: &str) -> String {
        let mut out = format!(
            "{}\n\nRequirements:\n\
             - [ ] Handle errors explicitly\n\
             - [ ] Include tests for the new behavior\n\
             - [ ] Follow the project's existing conventions",
            text
        );
        if !mentions(text, "tech stack") {
            out.push_str("\nTech stack: [Language, framework, and versions]");
        }
        out
    }
}
