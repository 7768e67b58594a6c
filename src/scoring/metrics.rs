//! The ten metric functions.
//!
//! Each metric starts from a fixed baseline and applies the adjustments in
//! its rule table. Constants here are part of the scoring contract.

use crate::knowledge::{FrameworkDef, KnowledgeBase, ToolDef};
use crate::rules::{Rule, evaluate};
use crate::utils::text::{char_len, paragraph_count, sentence_count, unique_word_ratio, word_count};
use once_cell::sync::Lazy;

/// Neutral tool-alignment score used when the tool is unknown.
pub const NEUTRAL_TOOL_ALIGNMENT: u8 = 50;
/// Completeness baseline, also the value for an unknown tool.
pub const COMPLETENESS_BASE: i32 = 20;
/// Framework-adherence value used when the framework is unknown.
pub const NEUTRAL_FRAMEWORK_ADHERENCE: u8 = 50;

pub(crate) const VAGUE_WORDS: &str = r"(?i)(thing|stuff|somehow|maybe|perhaps|sort of|kind of)";
pub(crate) const NEGATIVE_CONSTRAINTS: &str = r"(?i)(don't|do not|avoid|never|no)";
pub(crate) const ACTION_VERBS: &str =
    r"(?i)(create|write|build|analyze|generate|design|implement|develop|plan|optimize|refactor)";

static SPECIFICITY: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        Rule::matches("metrics", r"\d", 15),
        Rule::matches("timeframe", r"(?i)(deadline|by|before|after|timeline|duration)", 10),
        Rule::matches("constraints", r"(?i)(must|should|require|constraint|limit)", 10),
        Rule::matches("examples", r"(?i)(example|such as|like|e\.g\.|for instance)", 10),
        Rule::matches("details", r"(?i)(specific|particular|exactly|precisely)", 10),
        Rule::when("length_over_100", |p| char_len(p) > 100, 10),
        Rule::when("length_over_200", |p| char_len(p) > 200, 5),
    ]
});

static CLARITY: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        Rule::when("multiple_sentences", |p| sentence_count(p) >= 2, 10),
        Rule::matches("question", r"\?", 10),
        Rule::each_match("vague_words", VAGUE_WORDS, -5),
        Rule::matches("clear_objective", r"(?i)(create|write|analyze|generate|build|design)", 15),
        Rule::matches("contrast", r"(?i)(but|however|although|despite)", -5),
    ]
});

static COMPLETENESS: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        Rule::matches("context", r"(?i)(context|background|situation)", 10),
        Rule::matches("objective", r"(?i)(objective|goal|task|purpose)", 10),
        Rule::matches("format", r"(?i)(format|output|structure|style)", 10),
    ]
});

static STRUCTURE: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        Rule::matches("sections", ":", 15),
        Rule::matches("lists", r"[-•*]|\n\d+\.", 15),
        Rule::when("paragraphs", |p| paragraph_count(p) > 1, 15),
        Rule::matches("capitalized", r"^[A-Z]", 10),
        Rule::when("run_on", |p| char_len(p) > 500 && !p.contains('\n'), -20),
    ]
});

static ACTIONABILITY: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        Rule::each_match("action_verbs", ACTION_VERBS, 15).capped(40),
        Rule::matches("deliverables", r"(?i)(output|result|deliverable|produce|provide)", 15),
        Rule::matches("success_criteria", r"(?i)(success|criteria|requirement|must|should)", 15),
    ]
});

static REPRODUCIBILITY: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        Rule::matches("examples", r"(?i)(example|instance|sample)", 15),
        Rule::matches("templates", r"(?i)(format|template|structure|schema)", 15),
        Rule::matches("placeholders", r"\[.*?\]|\{.*?\}", 15),
        Rule::matches("steps", r"(?i)(step|procedure|process|workflow)", 15),
    ]
});

static ERROR_RESISTANCE: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        Rule::each_match("negative_constraints", NEGATIVE_CONSTRAINTS, -10),
        Rule::matches("edge_cases", r"(?i)(edge case|error|exception|handle|fallback)", 20),
        Rule::matches("validation", r"(?i)(validate|verify|check|ensure)", 10),
        Rule::matches("ambiguity", r"(?i)(or|maybe|possibly|might)", -10),
    ]
});

fn clamp(score: i32) -> u8 {
    score.clamp(0, 100) as u8
}

fn contains_ci(haystack_lower: &str, needle: &str) -> bool {
    haystack_lower.contains(&needle.to_lowercase())
}

pub fn specificity(prompt: &str) -> u8 {
    clamp(evaluate(30, &SPECIFICITY, prompt))
}

pub fn clarity(prompt: &str) -> u8 {
    clamp(evaluate(50, &CLARITY, prompt))
}

pub fn completeness(prompt: &str, tool: Option<&ToolDef>) -> u8 {
    let Some(tool) = tool else {
        return clamp(COMPLETENESS_BASE);
    };
    let lower = prompt.to_lowercase();
    let required = tool
        .must_include
        .iter()
        .filter(|element| contains_ci(&lower, element))
        .count() as i32
        * 15;
    clamp(evaluate(COMPLETENESS_BASE + required, &COMPLETENESS, prompt))
}

pub fn structure(prompt: &str) -> u8 {
    clamp(evaluate(40, &STRUCTURE, prompt))
}

pub fn tool_alignment(prompt: &str, tool: Option<&ToolDef>, kb: &KnowledgeBase) -> u8 {
    let Some(tool) = tool else {
        return NEUTRAL_TOOL_ALIGNMENT;
    };
    let lower = prompt.to_lowercase();
    let mut score = 50;
    score += tool
        .best_for
        .iter()
        .filter(|use_case| contains_ci(&lower, use_case))
        .count() as i32
        * 10;
    for technique in tool.techniques.iter().filter_map(|id| kb.technique(id)) {
        score += technique
            .trigger
            .iter()
            .filter(|trigger| contains_ci(&lower, trigger))
            .count() as i32
            * 5;
    }
    clamp(score)
}

pub fn framework_adherence(prompt: &str, framework: Option<&FrameworkDef>) -> u8 {
    let Some(framework) = framework else {
        return NEUTRAL_FRAMEWORK_ADHERENCE;
    };
    if framework.components.is_empty() {
        return 30;
    }
    let lower = prompt.to_lowercase();
    let per_component = 70.0 / framework.components.len() as f64;
    let matched = framework
        .components
        .iter()
        .filter(|component| contains_ci(&lower, component))
        .count() as f64;
    clamp((30.0 + matched * per_component).round() as i32)
}

pub fn token_efficiency(prompt: &str) -> u8 {
    let words = word_count(prompt) as i32;
    let mut score = if words < 10 { words * 5 } else { 100 };
    if words > 200 && !prompt.contains('\n') {
        score -= 20;
    }
    if unique_word_ratio(prompt) < 0.5 {
        score -= 20;
    }
    clamp(score)
}

pub fn actionability(prompt: &str) -> u8 {
    clamp(evaluate(30, &ACTIONABILITY, prompt))
}

pub fn reproducibility(prompt: &str) -> u8 {
    clamp(evaluate(40, &REPRODUCIBILITY, prompt))
}

pub fn error_resistance(prompt: &str) -> u8 {
    clamp(evaluate(60, &ERROR_RESISTANCE, prompt))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool(must_include: &[&str]) -> ToolDef {
        ToolDef {
            name: "Test".into(),
            category: "chat".into(),
            must_include: must_include.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_specificity_empty_is_base() {
        assert_eq!(specificity(""), 30);
    }

    #[test]
    fn test_specificity_adjustments() {
        // digit + timeframe ("by") + constraint ("must")
        assert_eq!(specificity("Finish 3 drafts by Friday, must be short"), 65);
    }

    #[test]
    fn test_clarity_penalizes_vague_words_with_floor() {
        let vague = "stuff ".repeat(20);
        assert_eq!(clarity(&vague), 0);
        assert_eq!(clarity("Write a poem. Make it rhyme?"), 50 + 10 + 10 + 15);
    }

    #[test]
    fn test_completeness_unknown_tool_is_baseline() {
        assert_eq!(completeness("context goal format", None), 20);
    }

    #[test]
    fn test_completeness_counts_required_phrases() {
        let t = tool(&["Audience", "tone"]);
        assert_eq!(completeness("audience and tone", Some(&t)), 50);
    }

    #[test]
    fn test_completeness_saturates_at_100() {
        let t = tool(&["a", "b", "c", "d", "e", "f"]);
        assert_eq!(completeness("a b c d e f context goal format", Some(&t)), 100);
    }

    #[test]
    fn test_structure() {
        assert_eq!(structure("plain"), 40);
        assert_eq!(structure("Goal: x\n\n- item"), 40 + 15 + 15 + 15 + 10);
        let run_on = "a".repeat(501);
        assert_eq!(structure(&run_on), 20);
    }

    #[test]
    fn test_tool_alignment_unknown_tool_is_neutral() {
        let kb = KnowledgeBase::default();
        assert_eq!(tool_alignment("anything", None, &kb), 50);
    }

    #[test]
    fn test_tool_alignment_counts_triggers() {
        let kb = KnowledgeBase::builtin();
        let t = kb.tool("claude_chat").cloned();
        // "analysis" use-case + "step by step" trigger + "context" trigger
        let s = tool_alignment("Do the analysis step by step with context", t.as_ref(), &kb);
        assert_eq!(s, 50 + 10 + 5 + 5);
    }

    #[test]
    fn test_framework_adherence_rounds_at_end() {
        let fw = FrameworkDef {
            name: "T".into(),
            components: vec!["Role".into(), "Task".into(), "Format".into()],
        };
        assert_eq!(framework_adherence("role task", Some(&fw)), 77);
        assert_eq!(framework_adherence("role task format", Some(&fw)), 100);
        assert_eq!(framework_adherence("nothing", None), 50);
    }

    #[test]
    fn test_token_efficiency_short_prompt() {
        assert_eq!(token_efficiency("write blog"), 10);
        assert_eq!(token_efficiency(""), 0);
    }

    #[test]
    fn test_token_efficiency_redundancy() {
        let repeated = "word ".repeat(30);
        assert_eq!(token_efficiency(&repeated), 80);
    }

    #[test]
    fn test_actionability_caps_verbs() {
        assert_eq!(actionability("create build design implement"), 70);
    }

    #[test]
    fn test_reproducibility_placeholders() {
        assert_eq!(reproducibility("Fill in [name]"), 55);
    }

    #[test]
    fn test_error_resistance_floor() {
        assert_eq!(error_resistance("never never never never never never never"), 0);
    }
}
