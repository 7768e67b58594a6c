//! Optimization history: entries built from finished runs, an append-only
//! JSONL log, and the aggregate statistics read from it.
//!
//! The engine never touches the log. Callers build a [`LibraryEntry`] from
//! a run and hand it to [`LibraryLog::append`].

use crate::error::{PromptForgeError, Result};
use crate::pipeline::OptimizationResult;
use crate::scoring::AnalysisResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const TITLE_CHARS: usize = 50;
/// Fixed estimate added to the pre-optimization average; not a re-measured score
pub const QUALITY_BOOST: u8 = 25;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryEntry {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    pub tool_id: String,
    pub framework_id: String,
    pub applied_techniques: Vec<String>,
    pub original_prompt: String,
    pub optimized_prompt: String,
    pub quality_before: u8,
    pub quality_after: u8,
    pub created_at: DateTime<Utc>,
    pub last_used_at: DateTime<Utc>,
    pub use_count: u32,
}

/// A finished run, as the caller saw it
pub struct RunRecord<'a> {
    pub prompt: &'a str,
    pub tool_id: &'a str,
    pub framework_id: &'a str,
    /// Category of the selected tool
    pub category: &'a str,
    pub analysis: &'a AnalysisResult,
    pub result: &'a OptimizationResult,
}

impl LibraryEntry {
    /// Snapshot a run. Identifier and clock are supplied by the caller.
    pub fn from_run(id: Uuid, now: DateTime<Utc>, run: &RunRecord<'_>) -> Self {
        let quality_before = run.analysis.average;
        Self {
            id,
            title: run.prompt.chars().take(TITLE_CHARS).collect(),
            category: run.category.to_string(),
            tool_id: run.tool_id.to_string(),
            framework_id: run.framework_id.to_string(),
            applied_techniques: run.result.applied_techniques.clone(),
            original_prompt: run.prompt.to_string(),
            optimized_prompt: run.result.final_text.clone(),
            quality_before,
            quality_after: quality_before.saturating_add(QUALITY_BOOST).min(100),
            created_at: now,
            last_used_at: now,
            use_count: 1,
        }
    }

    pub fn improvement(&self) -> i32 {
        i32::from(self.quality_after) - i32::from(self.quality_before)
    }
}

/// Append-only JSONL history file
#[derive(Debug, Clone)]
pub struct LibraryLog {
    path: PathBuf,
}

impl LibraryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, entry: &LibraryEntry) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let line = serde_json::to_string(entry)?;
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)?;
        tracing::debug!("Appended library entry {} to {}", entry.id, self.path.display());
        Ok(())
    }

    /// All entries in append order. A missing file is an empty log.
    pub fn entries(&self) -> Result<Vec<LibraryEntry>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                serde_json::from_str(line).map_err(|e| PromptForgeError::Library {
                    message: format!("{} line {}: {}", self.path.display(), i + 1, e),
                })
            })
            .collect()
    }
}

/// Aggregates over a history log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LibraryStats {
    pub total: usize,
    /// Rounded mean of `quality_after - quality_before`, 0 when empty
    pub avg_improvement: i32,
    pub most_used_tool: Option<String>,
    /// Technique counts, most used first, ties by name
    pub technique_usage: Vec<(String, usize)>,
}

impl LibraryStats {
    pub fn from_entries(entries: &[LibraryEntry]) -> Self {
        let total = entries.len();
        let avg_improvement = if total == 0 {
            0
        } else {
            let sum: i32 = entries.iter().map(LibraryEntry::improvement).sum();
            (f64::from(sum) / total as f64).round() as i32
        };

        // Ties go to the tool seen first.
        let mut tool_order: Vec<&str> = Vec::new();
        let mut tool_counts: HashMap<&str, usize> = HashMap::new();
        for entry in entries {
            let count = tool_counts.entry(entry.tool_id.as_str()).or_insert(0);
            if *count == 0 {
                tool_order.push(entry.tool_id.as_str());
            }
            *count += 1;
        }
        let mut most_used_tool: Option<(&str, usize)> = None;
        for tool in tool_order {
            let count = tool_counts[tool];
            if most_used_tool.is_none_or(|(_, best)| count > best) {
                most_used_tool = Some((tool, count));
            }
        }

        let mut technique_counts: HashMap<&str, usize> = HashMap::new();
        for technique in entries.iter().flat_map(|e| e.applied_techniques.iter()) {
            *technique_counts.entry(technique.as_str()).or_insert(0) += 1;
        }
        let mut technique_usage: Vec<(String, usize)> = technique_counts
            .into_iter()
            .map(|(t, c)| (t.to_string(), c))
            .collect();
        technique_usage.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Self {
            total,
            avg_improvement,
            most_used_tool: most_used_tool.map(|(t, _)| t.to_string()),
            technique_usage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::KnowledgeBase;
    use crate::{pipeline, scoring};

    fn entry(tool: &str, before: u8, techniques: &[&str]) -> LibraryEntry {
        entry_for("write a report", tool, before, techniques)
    }

    fn entry_for(prompt: &str, tool: &str, before: u8, techniques: &[&str]) -> LibraryEntry {
        let kb = KnowledgeBase::builtin();
        let analysis = scoring::analyze("write a report", tool, "CRISPE", &kb);
        let mut result = pipeline::optimize("write a report", tool, "CRISPE", &kb).unwrap();
        result.applied_techniques = techniques.iter().map(|t| t.to_string()).collect();
        let mut analysis = analysis;
        analysis.average = before;
        LibraryEntry::from_run(
            Uuid::new_v4(),
            Utc::now(),
            &RunRecord {
                prompt,
                tool_id: tool,
                framework_id: "CRISPE",
                category: "chat",
                analysis: &analysis,
                result: &result,
            },
        )
    }

    #[test]
    fn test_quality_after_is_capped() {
        assert_eq!(entry("claude_chat", 40, &[]).quality_after, 65);
        assert_eq!(entry("claude_chat", 90, &[]).quality_after, 100);
    }

    #[test]
    fn test_title_truncates_by_chars() {
        let long = "é".repeat(80);
        let e = entry_for(&long, "claude_chat", 40, &[]);
        assert_eq!(e.title.chars().count(), TITLE_CHARS);
        assert_eq!(e.original_prompt, long);
        assert_eq!(entry("claude_chat", 40, &[]).title, "write a report");
    }

    #[test]
    fn test_stats() {
        let entries = vec![
            entry("claude_chat", 40, &["role_prompting", "framework:CRISPE"]),
            entry("midjourney", 90, &["framework:CRISPE"]),
            entry("midjourney", 50, &["few_shot"]),
            entry("claude_chat", 80, &["role_prompting", "framework:CRISPE"]),
        ];
        let stats = LibraryStats::from_entries(&entries);
        assert_eq!(stats.total, 4);
        // 25 + 10 + 25 + 20 = 80
        assert_eq!(stats.avg_improvement, 20);
        assert_eq!(stats.most_used_tool.as_deref(), Some("claude_chat"));
        assert_eq!(
            stats.technique_usage,
            vec![
                ("framework:CRISPE".to_string(), 3),
                ("role_prompting".to_string(), 2),
                ("few_shot".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_empty_stats() {
        let stats = LibraryStats::from_entries(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.avg_improvement, 0);
        assert!(stats.most_used_tool.is_none());
        assert!(stats.technique_usage.is_empty());
    }
}
