//! Scoring engine: ten independent metrics, their aggregate, and the
//! diagnostics derived from them.
//!
//! Pure functions of the prompt and the selected catalog entries; safe to
//! call on every keystroke.

pub mod metrics;

use crate::knowledge::KnowledgeBase;
use serde::{Deserialize, Serialize};

/// Score at or above which a metric raises no issue
pub const ISSUE_THRESHOLD: u8 = 60;
/// Score at or above which a metric earns no recommendation
pub const RECOMMENDATION_THRESHOLD: u8 = 70;

/// The ten metrics, in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Specificity,
    Clarity,
    Completeness,
    Structure,
    ToolAlignment,
    FrameworkAdherence,
    TokenEfficiency,
    Actionability,
    Reproducibility,
    ErrorResistance,
}

impl Metric {
    pub const ALL: [Metric; 10] = [
        Metric::Specificity,
        Metric::Clarity,
        Metric::Completeness,
        Metric::Structure,
        Metric::ToolAlignment,
        Metric::FrameworkAdherence,
        Metric::TokenEfficiency,
        Metric::Actionability,
        Metric::Reproducibility,
        Metric::ErrorResistance,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Metric::Specificity => "specificity",
            Metric::Clarity => "clarity",
            Metric::Completeness => "completeness",
            Metric::Structure => "structure",
            Metric::ToolAlignment => "toolAlignment",
            Metric::FrameworkAdherence => "frameworkAdherence",
            Metric::TokenEfficiency => "tokenEfficiency",
            Metric::Actionability => "actionability",
            Metric::Reproducibility => "reproducibility",
            Metric::ErrorResistance => "errorResistance",
        }
    }

    /// Diagnostic reported when this metric scores below [`ISSUE_THRESHOLD`]
    pub fn issue(self) -> &'static str {
        match self {
            Metric::Specificity => "Lacks specificity - add metrics, timeframes, and concrete details",
            Metric::Clarity => "Unclear objective - be more direct and remove vague language",
            Metric::Completeness => "Missing key elements for selected tool",
            Metric::Structure => "Poor structure - use sections, bullets, or clear paragraphs",
            Metric::ToolAlignment => "Not aligned with selected tool's strengths",
            Metric::FrameworkAdherence => "Doesn't follow framework components",
            Metric::TokenEfficiency => "Inefficient - too redundant or unstructured",
            Metric::Actionability => "Not actionable - needs clear verbs and deliverables",
            Metric::Reproducibility => "Hard to reproduce - add examples or templates",
            Metric::ErrorResistance => "Uses negative constraints - reframe positively",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Exactly ten named scores, each in `[0, 100]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSet {
    pub specificity: u8,
    pub clarity: u8,
    pub completeness: u8,
    pub structure: u8,
    pub tool_alignment: u8,
    pub framework_adherence: u8,
    pub token_efficiency: u8,
    pub actionability: u8,
    pub reproducibility: u8,
    pub error_resistance: u8,
}

impl ScoreSet {
    pub fn get(&self, metric: Metric) -> u8 {
        match metric {
            Metric::Specificity => self.specificity,
            Metric::Clarity => self.clarity,
            Metric::Completeness => self.completeness,
            Metric::Structure => self.structure,
            Metric::ToolAlignment => self.tool_alignment,
            Metric::FrameworkAdherence => self.framework_adherence,
            Metric::TokenEfficiency => self.token_efficiency,
            Metric::Actionability => self.actionability,
            Metric::Reproducibility => self.reproducibility,
            Metric::ErrorResistance => self.error_resistance,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, u8)> + '_ {
        Metric::ALL.iter().map(move |m| (*m, self.get(*m)))
    }

    /// Rounded mean of all ten scores.
    pub fn average(&self) -> u8 {
        let sum: u32 = self.iter().map(|(_, s)| u32::from(s)).sum();
        (f64::from(sum) / Metric::ALL.len() as f64).round() as u8
    }
}

/// Live analysis of a prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub scores: ScoreSet,
    pub average: u8,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Score `prompt` against the selected tool and framework.
///
/// Unknown ids degrade to the neutral defaults of the tool- and
/// framework-dependent metrics.
pub fn score(prompt: &str, tool_id: &str, framework_id: &str, kb: &KnowledgeBase) -> ScoreSet {
    let tool = kb.tool(tool_id);
    let framework = kb.framework(framework_id);
    if tool.is_none() {
        tracing::warn!("Unknown tool '{}', using neutral tool scores", tool_id);
    }
    if framework.is_none() {
        tracing::warn!("Unknown framework '{}', using neutral adherence score", framework_id);
    }

    let scores = ScoreSet {
        specificity: metrics::specificity(prompt),
        clarity: metrics::clarity(prompt),
        completeness: metrics::completeness(prompt, tool),
        structure: metrics::structure(prompt),
        tool_alignment: metrics::tool_alignment(prompt, tool, kb),
        framework_adherence: metrics::framework_adherence(prompt, framework),
        token_efficiency: metrics::token_efficiency(prompt),
        actionability: metrics::actionability(prompt),
        reproducibility: metrics::reproducibility(prompt),
        error_resistance: metrics::error_resistance(prompt),
    };
    tracing::debug!(?scores, "scored prompt ({} chars)", prompt.len());
    scores
}

/// One fixed diagnostic per metric below [`ISSUE_THRESHOLD`], in metric order.
pub fn issues(scores: &ScoreSet) -> Vec<String> {
    scores
        .iter()
        .filter(|(_, s)| *s < ISSUE_THRESHOLD)
        .map(|(m, _)| m.issue().to_string())
        .collect()
}

pub fn recommendations(scores: &ScoreSet, framework_id: &str) -> Vec<String> {
    let mut recs = Vec::new();
    if scores.specificity < RECOMMENDATION_THRESHOLD {
        recs.push("Add specific metrics and timeframes".to_string());
    }
    if scores.framework_adherence < RECOMMENDATION_THRESHOLD {
        recs.push(format!("Use {} framework structure", framework_id));
    }
    if scores.error_resistance < RECOMMENDATION_THRESHOLD {
        recs.push("Convert negative constraints to positive affirmatives".to_string());
    }
    if scores.completeness < RECOMMENDATION_THRESHOLD {
        recs.push("Include all required elements for the tool".to_string());
    }
    recs
}

/// Full live analysis: scores, their average, issues, and recommendations.
pub fn analyze(prompt: &str, tool_id: &str, framework_id: &str, kb: &KnowledgeBase) -> AnalysisResult {
    let scores = score(prompt, tool_id, framework_id, kb);
    AnalysisResult {
        average: scores.average(),
        issues: issues(&scores),
        recommendations: recommendations(&scores, framework_id),
        scores,
    }
}
