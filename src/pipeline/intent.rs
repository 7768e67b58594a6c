//! Stage 1: intent analysis.
//!
//! Classifies a prompt into an [`IntentProfile`]. Every classification is a
//! first-match walk over a fixed priority list, so each field resolves to
//! exactly one value.

use crate::knowledge::ToolDef;
use crate::rules::compile;
use crate::utils::text::word_count;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Domain {
    Technical,
    Creative,
    Business,
    Research,
    Writing,
    Personal,
    /// Fallback: the selected tool's category, or `general`
    Category(String),
}

impl Domain {
    pub fn as_str(&self) -> &str {
        match self {
            Domain::Technical => "technical",
            Domain::Creative => "creative",
            Domain::Business => "business",
            Domain::Research => "research",
            Domain::Writing => "writing",
            Domain::Personal => "personal",
            Domain::Category(c) => c,
        }
    }
}

impl Serialize for Domain {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimaryAction {
    Create,
    Analyze,
    Write,
    Explain,
    Optimize,
    Fix,
    Plan,
    Execute,
}

impl PrimaryAction {
    pub fn as_str(self) -> &'static str {
        match self {
            PrimaryAction::Create => "create",
            PrimaryAction::Analyze => "analyze",
            PrimaryAction::Write => "write",
            PrimaryAction::Explain => "explain",
            PrimaryAction::Optimize => "optimize",
            PrimaryAction::Fix => "fix",
            PrimaryAction::Plan => "plan",
            PrimaryAction::Execute => "execute",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Audience {
    #[serde(rename = "beginners")]
    Beginners,
    #[serde(rename = "experts")]
    Experts,
    #[serde(rename = "team/stakeholders")]
    TeamStakeholders,
    #[serde(rename = "general public")]
    GeneralPublic,
    #[serde(rename = "not specified")]
    NotSpecified,
}

impl Audience {
    pub fn as_str(self) -> &'static str {
        match self {
            Audience::Beginners => "beginners",
            Audience::Experts => "experts",
            Audience::TeamStakeholders => "team/stakeholders",
            Audience::GeneralPublic => "general public",
            Audience::NotSpecified => "not specified",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OutputType {
    #[serde(rename = "code")]
    Code,
    #[serde(rename = "document")]
    Document,
    #[serde(rename = "image")]
    Image,
    #[serde(rename = "structured data")]
    StructuredData,
    #[serde(rename = "structured format")]
    StructuredFormat,
    #[serde(rename = "text")]
    Text,
}

impl OutputType {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputType::Code => "code",
            OutputType::Document => "document",
            OutputType::Image => "image",
            OutputType::StructuredData => "structured data",
            OutputType::StructuredFormat => "structured format",
            OutputType::Text => "text",
        }
    }
}

macro_rules! impl_display {
    ($($t:ty),*) => {$(
        impl std::fmt::Display for $t {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    )*};
}

impl_display!(Domain, PrimaryAction, Audience, OutputType);

impl std::fmt::Display for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Complexity::Low => "low",
            Complexity::Medium => "medium",
            Complexity::High => "high",
        })
    }
}

/// Stage-1 classification, read-only for the rest of the run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentProfile {
    pub domain: Domain,
    pub complexity: Complexity,
    pub primary_action: PrimaryAction,
    pub implicit_goal: String,
    pub audience: Audience,
    pub output_type: OutputType,
}

static DOMAINS: Lazy<Vec<(Domain, Regex)>> = Lazy::new(|| {
    vec![
        (
            Domain::Technical,
            compile(r"(?i)\b(code|coding|program|function|api|database|software|debug|algorithm|script|deploy|server|bug|app)\b"),
        ),
        (
            Domain::Creative,
            compile(r"(?i)\b(story|poem|creative|image|art|illustration|logo|painting|character|fiction|song)\b"),
        ),
        (
            Domain::Business,
            compile(r"(?i)\b(business|marketing|sales|strategy|revenue|customer|market|startup|product|company|brand)\b"),
        ),
        (
            Domain::Research,
            compile(r"(?i)\b(research|study|analy[sz]e|analysis|data|investigate|compare|survey|evidence|literature)\b"),
        ),
        (
            Domain::Writing,
            compile(r"(?i)\b(write|writing|article|blog|essay|email|report|copy|content|documentation)\b"),
        ),
        (
            Domain::Personal,
            compile(r"(?i)\b(my|personal|life|health|fitness|travel|family|habit|diet|budget)\b"),
        ),
    ]
});

static ACTIONS: Lazy<Vec<(PrimaryAction, Regex)>> = Lazy::new(|| {
    vec![
        (PrimaryAction::Create, compile(r"(?i)\b(create|build|generate|make|design|develop)\b")),
        (PrimaryAction::Analyze, compile(r"(?i)\b(analy[sz]e|evaluate|assess|review|compare|examine)\b")),
        (PrimaryAction::Write, compile(r"(?i)\b(write|draft|compose)\b")),
        (PrimaryAction::Explain, compile(r"(?i)\b(explain|describe|clarify|teach|summari[sz]e)\b")),
        (PrimaryAction::Optimize, compile(r"(?i)\b(optimi[sz]e|improve|enhance|refactor|speed up)\b")),
        (PrimaryAction::Fix, compile(r"(?i)\b(fix|debug|solve|repair|resolve|troubleshoot)\b")),
        (PrimaryAction::Plan, compile(r"(?i)\b(plan|organi[sz]e|schedule|roadmap|outline)\b")),
    ]
});

static AUDIENCES: Lazy<Vec<(Audience, Regex)>> = Lazy::new(|| {
    vec![
        (Audience::Beginners, compile(r"(?i)\b(beginners?|novices?|newbies?|non-technical|simple terms|eli5)\b")),
        (Audience::Experts, compile(r"(?i)\b(experts?|advanced|professionals?|senior|specialists?)\b")),
        (
            Audience::TeamStakeholders,
            compile(r"(?i)\b(team|stakeholders?|executives?|management|board|clients?)\b"),
        ),
        (Audience::GeneralPublic, compile(r"(?i)\b(public|everyone|general audience|readers|customers)\b")),
    ]
});

static OUTPUTS: Lazy<Vec<(OutputType, Regex)>> = Lazy::new(|| {
    vec![
        (OutputType::Code, compile(r"(?i)\b(code|function|script|class|snippet|program|component)\b")),
        (OutputType::Document, compile(r"(?i)\b(report|document|article|essay|blog|proposal|email|memo)\b")),
        (OutputType::Image, compile(r"(?i)\b(image|picture|photo|illustration|logo|render|artwork)\b")),
        (OutputType::StructuredData, compile(r"(?i)\b(json|csv|table|spreadsheet|yaml|xml)\b")),
        (OutputType::StructuredFormat, compile(r"(?i)\b(list|outline|bullets?|steps|checklist)\b")),
    ]
});

static CONJUNCTIONS: Lazy<Regex> = Lazy::new(|| compile(r"(?i)\b(and|also|additionally|furthermore)\b"));
static HELP: Lazy<Regex> = Lazy::new(|| compile(r"(?i)\bhelp\b"));
static STYLE_CUES: Lazy<Regex> = Lazy::new(|| compile(r"(?i)\b(style|aesthetic|mood|lighting|color|palette)"));
static TEST_CUES: Lazy<Regex> = Lazy::new(|| compile(r"(?i)\b(test|tests|testing|spec|coverage)\b"));
static TIMEFRAME_CUES: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)(\b\d{4}\b|\b(recent|latest|since|year|month|week|current)\b)"));

fn first_match<T: Clone>(table: &[(T, Regex)], prompt: &str) -> Option<T> {
    table
        .iter()
        .find(|(_, re)| re.is_match(prompt))
        .map(|(v, _)| v.clone())
}

fn category(tool: Option<&ToolDef>) -> &str {
    tool.map(|t| t.category.as_str()).filter(|c| !c.is_empty()).unwrap_or("general")
}

pub fn detect_domain(prompt: &str, tool: Option<&ToolDef>) -> Domain {
    first_match(&DOMAINS, prompt).unwrap_or_else(|| Domain::Category(category(tool).to_string()))
}

pub fn assess_complexity(prompt: &str) -> Complexity {
    let words = word_count(prompt);
    let mut score = 0;
    if words > 50 {
        score += 2;
    } else if words > 20 {
        score += 1;
    }
    if prompt.contains(':') || prompt.contains('\n') {
        score += 1;
    }
    if prompt.chars().any(|c| c.is_ascii_digit()) {
        score += 1;
    }
    if CONJUNCTIONS.find_iter(prompt).count() > 2 {
        score += 2;
    }
    match score {
        s if s >= 4 => Complexity::High,
        s if s >= 2 => Complexity::Medium,
        _ => Complexity::Low,
    }
}

pub fn detect_action(prompt: &str) -> PrimaryAction {
    first_match(&ACTIONS, prompt).unwrap_or(PrimaryAction::Execute)
}

pub fn infer_implicit_goal(prompt: &str, tool: Option<&ToolDef>, action: PrimaryAction) -> String {
    let category = category(tool);
    if word_count(prompt) < 8 && HELP.is_match(prompt) {
        "Get clear, actionable guidance on the underlying problem".to_string()
    } else if category == "creative" && !STYLE_CUES.is_match(prompt) {
        "Produce a visually distinctive result with a clearly defined style".to_string()
    } else if category == "coding" && !TEST_CUES.is_match(prompt) {
        "Deliver working, tested code that fits the existing codebase".to_string()
    } else if category == "research" && !TIMEFRAME_CUES.is_match(prompt) {
        "Gather current, well-sourced findings within a defined timeframe".to_string()
    } else {
        format!("Accomplish the {} task with a complete, usable result", action)
    }
}

pub fn detect_audience(prompt: &str) -> Audience {
    first_match(&AUDIENCES, prompt).unwrap_or(Audience::NotSpecified)
}

pub fn detect_output_type(prompt: &str, tool: Option<&ToolDef>) -> OutputType {
    first_match(&OUTPUTS, prompt).unwrap_or(match category(tool) {
        "coding" => OutputType::Code,
        "creative" => OutputType::Image,
        "research" => OutputType::Document,
        _ => OutputType::Text,
    })
}

pub fn analyze_intent(prompt: &str, tool: Option<&ToolDef>) -> IntentProfile {
    let primary_action = detect_action(prompt);
    IntentProfile {
        domain: detect_domain(prompt, tool),
        complexity: assess_complexity(prompt),
        primary_action,
        implicit_goal: infer_implicit_goal(prompt, tool, primary_action),
        audience: detect_audience(prompt),
        output_type: detect_output_type(prompt, tool),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool(category: &str) -> ToolDef {
        ToolDef {
            name: "T".into(),
            category: category.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_domain_priority_order() {
        // technical beats writing
        assert_eq!(detect_domain("write code for a parser", None), Domain::Technical);
        assert_eq!(detect_domain("write a report", None), Domain::Writing);
        assert_eq!(detect_domain("a poem about the sea", None), Domain::Creative);
    }

    #[test]
    fn test_domain_falls_back_to_category() {
        assert_eq!(
            detect_domain("hello there", Some(&tool("chat"))),
            Domain::Category("chat".into())
        );
        assert_eq!(detect_domain("hello there", None), Domain::Category("general".into()));
    }

    #[test]
    fn test_complexity_buckets() {
        assert_eq!(assess_complexity("write a report"), Complexity::Low);
        assert_eq!(assess_complexity("Goal: 3 things"), Complexity::Medium);
        let long = format!("{} and also this and that: 5", "word ".repeat(55));
        assert_eq!(assess_complexity(&long), Complexity::High);
    }

    #[test]
    fn test_action_priority_and_fallback() {
        assert_eq!(detect_action("write and create a plan"), PrimaryAction::Create);
        assert_eq!(detect_action("write a report"), PrimaryAction::Write);
        assert_eq!(detect_action("hello"), PrimaryAction::Execute);
    }

    #[test]
    fn test_implicit_goal_special_cases() {
        assert!(infer_implicit_goal("help me", None, PrimaryAction::Execute).contains("guidance"));
        assert!(
            infer_implicit_goal("a cat on a roof", Some(&tool("creative")), PrimaryAction::Execute)
                .contains("style")
        );
        assert!(
            infer_implicit_goal("add a login form", Some(&tool("coding")), PrimaryAction::Execute)
                .contains("tested")
        );
        assert!(
            infer_implicit_goal("solar panel efficiency", Some(&tool("research")), PrimaryAction::Execute)
                .contains("timeframe")
        );
        assert_eq!(
            infer_implicit_goal("write a report", Some(&tool("chat")), PrimaryAction::Write),
            "Accomplish the write task with a complete, usable result"
        );
    }

    #[test]
    fn test_audience_and_output_defaults() {
        assert_eq!(detect_audience("explain it to beginners"), Audience::Beginners);
        assert_eq!(detect_audience("write a report"), Audience::NotSpecified);
        assert_eq!(detect_output_type("write a report", None), OutputType::Document);
        assert_eq!(detect_output_type("rename things", Some(&tool("coding"))), OutputType::Code);
        assert_eq!(detect_output_type("rename things", None), OutputType::Text);
    }

    #[test]
    fn test_profile_serializes_labels() {
        let profile = analyze_intent("write a report", Some(&tool("chat")));
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["domain"], "writing");
        assert_eq!(json["primaryAction"], "write");
        assert_eq!(json["audience"], "not specified");
        assert_eq!(json["complexity"], "low");
    }
}
