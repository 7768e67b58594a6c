//! Knowledge base snapshot: tool, framework, and technique definitions.
//!
//! The snapshot is loaded once and then only borrowed by the engine. Every
//! sequence field defaults to empty so a sparse definition never needs an
//! `Option` check downstream.

use crate::error::{PromptForgeError, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub type ToolId = String;
pub type FrameworkId = String;
pub type TechniqueId = String;

/// Target AI tool profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolDef {
    pub name: String,
    pub category: String,
    /// Phrases a good prompt for this tool is expected to contain
    pub must_include: Vec<String>,
    pub best_for: Vec<String>,
    pub techniques: Vec<TechniqueId>,
    pub template: Option<String>,
}

/// Prompt-structuring framework; component order is significant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FrameworkDef {
    pub name: String,
    pub components: Vec<String>,
}

/// Prompting technique with phrases that show it is already in use
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TechniqueDef {
    pub name: String,
    pub trigger: Vec<String>,
}

/// Immutable catalog handed to the engine whole
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeBase {
    pub tools: BTreeMap<ToolId, ToolDef>,
    pub frameworks: BTreeMap<FrameworkId, FrameworkDef>,
    pub techniques: BTreeMap<TechniqueId, TechniqueDef>,
}

static BUILTIN: Lazy<KnowledgeBase> = Lazy::new(|| {
    serde_json::from_str(include_str!("builtin.json")).expect("bundled catalog is valid JSON")
});

impl KnowledgeBase {
    /// The bundled catalog (16 tools, 7 frameworks, 8 techniques).
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| PromptForgeError::KnowledgeBase {
            message: format!("invalid knowledge base JSON: {}", e),
        })
    }

    /// Load from a single snapshot file or a catalog directory.
    ///
    /// A directory is expected to contain `tools/`, `frameworks/`, and
    /// `techniques/` subdirectories of `<id>.json` files. Missing
    /// subdirectories are treated as empty.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.is_dir() {
            let kb = Self {
                tools: load_dir(&path.join("tools"))?,
                frameworks: load_dir(&path.join("frameworks"))?,
                techniques: load_dir(&path.join("techniques"))?,
            };
            tracing::debug!(
                "Loaded catalog directory {}: {} tools, {} frameworks, {} techniques",
                path.display(),
                kb.tools.len(),
                kb.frameworks.len(),
                kb.techniques.len()
            );
            Ok(kb)
        } else {
            let content = std::fs::read_to_string(path).map_err(|e| {
                PromptForgeError::KnowledgeBase {
                    message: format!("cannot read {}: {}", path.display(), e),
                }
            })?;
            Self::from_json_str(&content)
        }
    }

    pub fn tool(&self, id: &str) -> Option<&ToolDef> {
        self.tools.get(id)
    }

    pub fn framework(&self, id: &str) -> Option<&FrameworkDef> {
        self.frameworks.get(id)
    }

    pub fn technique(&self, id: &str) -> Option<&TechniqueDef> {
        self.techniques.get(id)
    }

    /// Closest known tool id, for "did you mean" diagnostics.
    pub fn suggest_tool(&self, id: &str) -> Option<&str> {
        closest(id, self.tools.keys())
    }

    pub fn suggest_framework(&self, id: &str) -> Option<&str> {
        closest(id, self.frameworks.keys())
    }

    /// Look up a tool, failing with the closest match in the message.
    pub fn require_tool(&self, id: &str) -> Result<&ToolDef> {
        self.tool(id).ok_or_else(|| unknown("tool", id, self.suggest_tool(id)))
    }

    pub fn require_framework(&self, id: &str) -> Result<&FrameworkDef> {
        self.framework(id)
            .ok_or_else(|| unknown("framework", id, self.suggest_framework(id)))
    }
}

fn load_dir<T: serde::de::DeserializeOwned>(dir: &Path) -> Result<BTreeMap<String, T>> {
    let mut out = BTreeMap::new();
    if !dir.is_dir() {
        return Ok(out);
    }
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let content = std::fs::read_to_string(&path)?;
        let def = serde_json::from_str(&content).map_err(|e| PromptForgeError::KnowledgeBase {
            message: format!("invalid definition {}: {}", path.display(), e),
        })?;
        out.insert(id.to_string(), def);
    }
    Ok(out)
}

fn closest<'a>(input: &str, candidates: impl Iterator<Item = &'a String>) -> Option<&'a str> {
    let input_lower = input.to_lowercase();
    candidates
        .map(|c| (c, strsim::jaro_winkler(&input_lower, &c.to_lowercase())))
        .filter(|(_, sim)| *sim >= 0.7)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(c, _)| c.as_str())
}

fn unknown(kind: &str, id: &str, suggestion: Option<&str>) -> PromptForgeError {
    let mut message = format!("Unknown {} '{}'", kind, id);
    if let Some(closest) = suggestion {
        message.push_str(&format!(". Did you mean '{}'?", closest));
    }
    PromptForgeError::InvalidParams { message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_counts() {
        let kb = KnowledgeBase::builtin();
        assert_eq!(kb.tools.len(), 16);
        assert_eq!(kb.frameworks.len(), 7);
        assert_eq!(kb.techniques.len(), 8);
    }

    #[test]
    fn test_builtin_tool_techniques_resolve() {
        let kb = KnowledgeBase::builtin();
        for (id, tool) in &kb.tools {
            for tech in &tool.techniques {
                assert!(kb.technique(tech).is_some(), "{} references unknown {}", id, tech);
            }
        }
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let kb = KnowledgeBase::from_json_str(
            r#"{"tools": {"bare": {"name": "Bare"}}, "frameworks": {"X": {}}}"#,
        )
        .unwrap();
        let tool = kb.tool("bare").unwrap();
        assert!(tool.must_include.is_empty());
        assert!(tool.best_for.is_empty());
        assert!(tool.techniques.is_empty());
        assert!(tool.template.is_none());
        assert!(kb.framework("X").unwrap().components.is_empty());
        assert!(kb.techniques.is_empty());
    }

    #[test]
    fn test_suggest_tool() {
        let kb = KnowledgeBase::builtin();
        assert_eq!(kb.suggest_tool("claude_chta"), Some("claude_chat"));
        assert_eq!(kb.suggest_tool("zzzzzzzz"), None);
    }

    #[test]
    fn test_require_framework_error_suggests() {
        let kb = KnowledgeBase::builtin();
        let err = kb.require_framework("CRISP").unwrap_err().to_string();
        assert!(err.contains("Did you mean 'CRISPE'?"), "{}", err);
    }
}
