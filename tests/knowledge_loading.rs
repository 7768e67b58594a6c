use prompt_forge::{KnowledgeBase, PromptForgeError, analyze, optimize};
use std::path::PathBuf;

fn scratch_dir(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("prompt-forge-{}-{}", label, uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_load_catalog_directory() {
    let dir = scratch_dir("kb-dir");
    std::fs::create_dir_all(dir.join("tools")).unwrap();
    std::fs::create_dir_all(dir.join("frameworks")).unwrap();
    std::fs::write(
        dir.join("tools/notebook.json"),
        r#"{"name": "Notebook", "category": "chat", "mustInclude": ["dataset"]}"#,
    )
    .unwrap();
    std::fs::write(
        dir.join("frameworks/RTF.json"),
        r#"{"name": "RTF", "components": ["Role", "Task", "Format"]}"#,
    )
    .unwrap();
    std::fs::write(dir.join("tools/README.md"), "ignored").unwrap();

    let kb = KnowledgeBase::from_path(&dir).unwrap();
    assert_eq!(kb.tools.len(), 1);
    assert_eq!(kb.tool("notebook").unwrap().must_include, vec!["dataset"]);
    assert_eq!(kb.framework("RTF").unwrap().components.len(), 3);
    assert!(kb.techniques.is_empty());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_load_snapshot_file() {
    let dir = scratch_dir("kb-file");
    let path = dir.join("catalog.json");
    std::fs::write(
        &path,
        r#"{"tools": {"sparse": {"name": "Sparse"}}, "frameworks": {}, "techniques": {}}"#,
    )
    .unwrap();
    let kb = KnowledgeBase::from_path(&path).unwrap();
    assert!(kb.tool("sparse").unwrap().techniques.is_empty());
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_invalid_definition_is_knowledge_base_error() {
    let dir = scratch_dir("kb-bad");
    std::fs::create_dir_all(dir.join("tools")).unwrap();
    std::fs::write(dir.join("tools/broken.json"), "{ not json").unwrap();
    let err = KnowledgeBase::from_path(&dir).unwrap_err();
    assert!(matches!(err, PromptForgeError::KnowledgeBase { .. }));
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_missing_file_is_error() {
    let path = std::env::temp_dir().join(format!("prompt-forge-missing-{}.json", uuid::Uuid::new_v4()));
    assert!(KnowledgeBase::from_path(path).is_err());
}

#[test]
fn test_sparse_definitions_never_fail() {
    let kb = KnowledgeBase::from_json_str(
        r#"{"tools": {"bare": {}}, "frameworks": {"EMPTY": {}}}"#,
    )
    .unwrap();
    let analysis = analyze("write blog", "bare", "EMPTY", &kb);
    assert_eq!(analysis.scores.completeness, 20);
    assert_eq!(analysis.scores.framework_adherence, 30);

    let result = optimize("write blog", "bare", "EMPTY", &kb).unwrap();
    let stage = result.stage("Framework Formatting").unwrap();
    assert!(stage.applied);
    assert!(stage.output.starts_with("Using Custom Framework:"));
}
