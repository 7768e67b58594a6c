//! Formatter trait and shared section helpers.

use crate::knowledge::{FrameworkDef, ToolDef};
use crate::pipeline::context::{has_role, role_for};
use crate::pipeline::intent::{Audience, IntentProfile, OutputType, PrimaryAction};

/// Everything a strategy may draw on when synthesizing its document
pub struct FormatContext<'a> {
    /// Output of the previous stage
    pub text: &'a str,
    /// The caller's original prompt
    pub task: &'a str,
    pub framework: &'a FrameworkDef,
    pub intent: &'a IntentProfile,
    pub tool: Option<&'a ToolDef>,
}

impl FormatContext<'_> {
    /// Role sentence, deferring to a role the prompt already declares.
    pub fn role_line(&self) -> String {
        if has_role(self.task) {
            "Adopt the role described in the instruction.".to_string()
        } else {
            format!(
                "You are {}.",
                role_for(&self.intent.domain, self.intent.primary_action)
            )
        }
    }

    pub fn tool_name(&self) -> &str {
        self.tool
            .map(|t| t.name.as_str())
            .filter(|n| !n.is_empty())
            .unwrap_or("the target AI tool")
    }

    pub fn goal(&self) -> &str {
        &self.intent.implicit_goal
    }

    pub fn output(&self) -> &'static str {
        self.intent.output_type.as_str()
    }

    pub fn audience(&self) -> &'static str {
        self.intent.audience.as_str()
    }

    pub fn task(&self) -> &str {
        self.task.trim()
    }

    /// Lines of the previous stage's text, outside the task, that `document`
    /// does not already express.
    ///
    /// A `Label: value` line counts as expressed when the document has its
    /// own line with that label.
    pub fn carried_context(&self, document: &str) -> Vec<&str> {
        self.text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !self.task.contains(line))
            .filter(|line| !expressed(document, line))
            .collect()
    }
}

fn expressed(document: &str, line: &str) -> bool {
    if document.contains(line) {
        return true;
    }
    let Some((label, _)) = line.split_once(':') else {
        return false;
    };
    let label = format!("{}:", label);
    document.lines().any(|l| {
        let l = l.trim_start().trim_start_matches("- ");
        l.starts_with(&label)
    })
}

pub trait FrameworkFormatter: Send + Sync {
    /// Framework identifier this strategy handles
    fn id(&self) -> &'static str;
    fn format(&self, ctx: &FormatContext<'_>) -> String;
}

/// The step that does the real work for a given action.
pub(crate) fn action_step(action: PrimaryAction) -> &'static str {
    match action {
        PrimaryAction::Create => "Build the deliverable section by section",
        PrimaryAction::Analyze => "Examine the material and record each finding with evidence",
        PrimaryAction::Write => "Write a complete draft, then tighten it",
        PrimaryAction::Explain => "Build the explanation from fundamentals up to detail",
        PrimaryAction::Optimize => "Identify the largest improvement opportunities and apply them",
        PrimaryAction::Fix => "Isolate the root cause and apply a targeted fix",
        PrimaryAction::Plan => "Lay out milestones, owners, and dependencies",
        PrimaryAction::Execute => "Carry out the task completely",
    }
}

pub(crate) fn style_for(output: OutputType) -> &'static str {
    match output {
        OutputType::Code => "Clean, idiomatic, well-commented code",
        OutputType::Document => "Well-organized prose with clear headings",
        OutputType::Image => "Vivid, concrete visual description",
        OutputType::StructuredData => "Consistent, machine-readable fields",
        OutputType::StructuredFormat => "Scannable lists and short sections",
        OutputType::Text => "Clear, direct prose",
    }
}

pub(crate) fn tone_for(audience: Audience) -> &'static str {
    match audience {
        Audience::Beginners => "Friendly and encouraging, with jargon explained",
        Audience::Experts => "Precise and technical",
        Audience::TeamStakeholders => "Professional and concise",
        Audience::GeneralPublic => "Accessible and engaging",
        Audience::NotSpecified => "Professional and approachable",
    }
}
