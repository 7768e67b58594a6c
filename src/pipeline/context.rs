//! Stage 3: context injection (role, purpose, audience scaffolding).

use super::StageOutcome;
use super::intent::{Audience, Domain, IntentProfile, PrimaryAction};
use crate::rules::compile;
use crate::utils::text::{article, word_count};
use once_cell::sync::Lazy;
use regex::Regex;

/// Prompts shorter than this get an explicit purpose line
pub const PURPOSE_WORD_LIMIT: usize = 20;

static ROLE_PHRASE: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\b(you are|you're|act as|acting as|your role is)\b"));

fn table_role(domain: &Domain, action: PrimaryAction) -> Option<&'static str> {
    use PrimaryAction::*;
    let role = match (domain, action) {
        (Domain::Technical, Create) => "a senior software engineer",
        (Domain::Technical, Analyze) => "a systems analyst",
        (Domain::Technical, Write) => "a technical writer",
        (Domain::Technical, Explain) => "a patient technical educator",
        (Domain::Technical, Optimize) => "a performance engineer",
        (Domain::Technical, Fix) => "an expert debugging engineer",
        (Domain::Technical, Plan) => "a software architect",
        (Domain::Creative, Create) => "a creative director",
        (Domain::Creative, Write) => "an award-winning creative writer",
        (Domain::Creative, Optimize) => "a creative editor",
        (Domain::Business, Create) => "a product strategist",
        (Domain::Business, Analyze) => "a business analyst",
        (Domain::Business, Write) => "a business communications specialist",
        (Domain::Business, Optimize) => "an operations consultant",
        (Domain::Business, Plan) => "a strategy consultant",
        (Domain::Research, Analyze) => "a research analyst",
        (Domain::Research, Write) => "an academic writer",
        (Domain::Research, Explain) => "a subject-matter researcher",
        (Domain::Writing, Create) => "a content strategist",
        (Domain::Writing, Write) => "a professional writer and editor",
        (Domain::Writing, Explain) => "an explanatory writer",
        (Domain::Writing, Optimize) => "a senior editor",
        (Domain::Personal, Explain) => "a knowledgeable advisor",
        (Domain::Personal, Plan) => "a personal coach",
        _ => return None,
    };
    Some(role)
}

/// Role for a domain and action, falling back to "a <domain> expert".
pub fn role_for(domain: &Domain, action: PrimaryAction) -> String {
    match table_role(domain, action) {
        Some(role) => role.to_string(),
        None => format!("{} {} expert", article(domain.as_str()), domain),
    }
}

pub fn has_role(text: &str) -> bool {
    ROLE_PHRASE.is_match(text)
}

pub fn inject_context(prompt: &str, intent: &IntentProfile) -> StageOutcome {
    let mut outcome = StageOutcome::unchanged(prompt);
    let mut text = prompt.trim().to_string();

    if !has_role(prompt) {
        text = format!(
            "You are {}.\n\n{}",
            role_for(&intent.domain, intent.primary_action),
            text
        );
        outcome.technique("role_prompting");
    }

    if word_count(prompt) < PURPOSE_WORD_LIMIT {
        text.push_str(&format!("\n\nPurpose: {}.", intent.implicit_goal));
        outcome.technique("context_front_loading");
    }

    if intent.audience == Audience::NotSpecified && intent.domain != Domain::Personal {
        text.push_str("\nAudience: [Specify who will read or use the output]");
        outcome.technique("context_front_loading");
    }

    if !outcome.techniques.is_empty() {
        outcome.text = text;
        outcome.applied = true;
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::intent::analyze_intent;

    #[test]
    fn test_role_table_and_fallback() {
        assert_eq!(role_for(&Domain::Writing, PrimaryAction::Write), "a professional writer and editor");
        assert_eq!(role_for(&Domain::Personal, PrimaryAction::Fix), "a personal expert");
        assert_eq!(
            role_for(&Domain::Category("image".into()), PrimaryAction::Execute),
            "an image expert"
        );
    }

    #[test]
    fn test_short_prompt_gets_role_purpose_audience() {
        let intent = analyze_intent("write a report", None);
        let out = inject_context("write a report", &intent);
        assert!(out.applied);
        assert!(out.text.starts_with("You are a professional writer and editor.\n\nwrite a report"));
        assert!(out.text.contains("Purpose: "));
        assert!(out.text.contains("Audience: ["));
        assert_eq!(out.techniques, vec!["role_prompting", "context_front_loading"]);
    }

    #[test]
    fn test_existing_role_and_long_prompt_untouched() {
        let prompt = "You are a historian. Explain the causes of the first world war to experts, \
                      covering political alliances, militarism, imperial rivalry and the July crisis in detail";
        let intent = analyze_intent(prompt, None);
        let out = inject_context(prompt, &intent);
        assert!(!out.applied);
        assert_eq!(out.text, prompt);
    }

    #[test]
    fn test_personal_domain_skips_audience() {
        let intent = analyze_intent("plan my week", None);
        let out = inject_context("plan my week", &intent);
        assert!(!out.text.contains("Audience:"));
        assert!(out.text.starts_with("You are a personal coach."));
    }
}
