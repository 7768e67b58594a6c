use chrono::{TimeZone, Utc};
use prompt_forge::library::RunRecord;
use prompt_forge::{KnowledgeBase, LibraryEntry, LibraryLog, LibraryStats, PromptForgeError, analyze, optimize};
use uuid::Uuid;

fn scratch_log() -> LibraryLog {
    LibraryLog::new(
        std::env::temp_dir()
            .join(format!("prompt-forge-lib-{}", Uuid::new_v4()))
            .join("library.jsonl"),
    )
}

fn run_entry(prompt: &str, tool: &str) -> LibraryEntry {
    let kb = KnowledgeBase::builtin();
    let analysis = analyze(prompt, tool, "CRISPE", &kb);
    let result = optimize(prompt, tool, "CRISPE", &kb).unwrap();
    let category = kb.tool(tool).map(|t| t.category.clone()).unwrap_or_default();
    LibraryEntry::from_run(
        Uuid::new_v4(),
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        &RunRecord {
            prompt,
            tool_id: tool,
            framework_id: "CRISPE",
            category: &category,
            analysis: &analysis,
            result: &result,
        },
    )
}

#[test]
fn test_entry_snapshot() {
    let entry = run_entry("write a report", "claude_chat");
    assert_eq!(entry.title, "write a report");
    assert_eq!(entry.category, "chat");
    assert_eq!(entry.use_count, 1);
    assert_eq!(entry.created_at, entry.last_used_at);
    assert_eq!(entry.quality_after, (entry.quality_before + 25).min(100));
    assert!(entry.applied_techniques.contains(&"framework:CRISPE".to_string()));
}

#[test]
fn test_append_then_read_back_in_order() {
    let log = scratch_log();
    assert!(log.entries().unwrap().is_empty());

    let first = run_entry("write a report", "claude_chat");
    let second = run_entry("a lighthouse at dusk", "midjourney");
    log.append(&first).unwrap();
    log.append(&second).unwrap();

    let entries = log.entries().unwrap();
    assert_eq!(entries, vec![first, second]);

    let stats = LibraryStats::from_entries(&entries);
    assert_eq!(stats.total, 2);
    assert_eq!(stats.most_used_tool.as_deref(), Some("claude_chat"));
    assert!(stats.technique_usage.iter().any(|(t, c)| t == "framework:CRISPE" && *c == 2));

    if let Some(dir) = log.path().parent() {
        std::fs::remove_dir_all(dir).ok();
    }
}

#[test]
fn test_corrupt_line_reports_position() {
    let log = scratch_log();
    log.append(&run_entry("write a report", "claude_chat")).unwrap();
    let mut content = std::fs::read_to_string(log.path()).unwrap();
    content.push_str("{ truncated\n");
    std::fs::write(log.path(), content).unwrap();

    let err = log.entries().unwrap_err();
    assert!(matches!(err, PromptForgeError::Library { .. }));
    assert!(err.to_string().contains("line 2"));

    if let Some(dir) = log.path().parent() {
        std::fs::remove_dir_all(dir).ok();
    }
}
