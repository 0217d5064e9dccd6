//! End-to-end scenarios for the WhatsFlowing stage, driven through StageRunner

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use chrono::{DateTime, Local, TimeZone};
use tempfile::TempDir;

use whatsflowing::journal::journal_file_name;
use whatsflowing::logging::MemoryLogSink;
use whatsflowing::runner::{MemorySession, StageRunner};
use whatsflowing::stage::{ProcessContext, Stage, WhatsFlowing, REL_SUCCESS};

fn hello_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("resources")
        .join("hello.txt")
}

fn fixed_now() -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2024, 3, 7, 12, 0, 0)
        .earliest()
        .unwrap()
}

fn stage() -> WhatsFlowing {
    WhatsFlowing::with_clock(fixed_now)
}

fn todays_journal(dir: &Path) -> PathBuf {
    dir.join(journal_file_name(fixed_now().date_naive()))
}

fn first_line(path: &Path) -> String {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .next()
        .unwrap()
        .to_string()
}

fn runner_for(dir: &Path, pattern: &str) -> StageRunner<WhatsFlowing> {
    let mut runner = StageRunner::new(stage());
    runner.set_property("Attributes to Log", pattern);
    runner.set_property("Log File Directory", dir.to_string_lossy());
    runner
}

#[test]
fn test_validator_missing_directory() {
    let mut runner = StageRunner::new(stage());
    runner.enqueue(Vec::new(), HashMap::new());

    let results = runner.validate();

    assert_eq!(results.len(), 1);
    for result in &results {
        assert!(result.to_string().contains("Log File Directory is required"));
    }
}

#[test]
fn test_validator_satisfied() {
    let mut runner = StageRunner::new(stage());
    runner.set_property("Log File Directory", "src/test/resources");
    runner.enqueue(Vec::new(), HashMap::new());

    assert!(runner.validate().is_empty());
}

#[test]
fn test_single_attribute() {
    let temp_dir = TempDir::new().unwrap();
    let mut runner = runner_for(temp_dir.path(), "filename");

    runner.enqueue_file(&hello_path(), HashMap::new()).unwrap();
    runner.run(1).unwrap();

    runner.assert_all_transferred(&REL_SUCCESS, 1);
    let out = &runner.transferred(&REL_SUCCESS)[0];
    assert_eq!(out.payload(), b"Hello, World!");

    let file_name = out.attribute("filename").unwrap();
    assert_eq!(file_name, "hello.txt");
    assert_eq!(
        first_line(&todays_journal(temp_dir.path())),
        format!("Key=filename Value={};", file_name)
    );
}

#[test]
fn test_multiple_attributes_with_regex() {
    let temp_dir = TempDir::new().unwrap();
    let mut runner = runner_for(temp_dir.path(), "file.*");

    let mut attributes = HashMap::new();
    attributes.insert("filesize".to_string(), "34".to_string());
    runner.enqueue_file(&hello_path(), attributes).unwrap();
    runner.run(1).unwrap();

    runner.assert_all_transferred(&REL_SUCCESS, 1);
    let out = &runner.transferred(&REL_SUCCESS)[0];
    assert_eq!(out.payload(), b"Hello, World!");

    assert_eq!(
        first_line(&todays_journal(temp_dir.path())),
        format!(
            "Key=filename Value={}; Key=filesize Value={};",
            out.attribute("filename").unwrap(),
            out.attribute("filesize").unwrap()
        )
    );
}

#[test]
fn test_many_attributes_with_union_regex() {
    let temp_dir = TempDir::new().unwrap();
    let mut runner = runner_for(temp_dir.path(), "file.*|path");

    let mut attributes = HashMap::new();
    attributes.insert("filesize".to_string(), "34".to_string());
    runner.enqueue_file(&hello_path(), attributes).unwrap();
    runner.run(1).unwrap();

    runner.assert_all_transferred(&REL_SUCCESS, 1);
    let out = &runner.transferred(&REL_SUCCESS)[0];

    assert_eq!(
        first_line(&todays_journal(temp_dir.path())),
        format!(
            "Key=filename Value={}; Key=filesize Value={}; Key=path Value={};",
            out.attribute("filename").unwrap(),
            out.attribute("filesize").unwrap(),
            out.attribute("path").unwrap()
        )
    );
}

#[test]
fn test_pass_through_under_journal_failure() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("read-only");
    fs::write(&blocker, "not a directory").unwrap();

    let mut runner = runner_for(&blocker.join("journals"), "file.*");
    runner.enqueue(b"payload".to_vec(), HashMap::new());
    runner.run(1).unwrap();

    runner.assert_all_transferred(&REL_SUCCESS, 1);
    let warnings = runner.logger().warn_messages();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("Failed to create directory"));
}

#[test]
fn test_pass_through_when_journal_path_is_directory() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir(todays_journal(temp_dir.path())).unwrap();

    let mut runner = runner_for(temp_dir.path(), "file.*");
    runner.enqueue(b"payload".to_vec(), HashMap::new());
    runner.run(1).unwrap();

    runner.assert_all_transferred(&REL_SUCCESS, 1);
    assert_eq!(runner.transferred(&REL_SUCCESS)[0].payload(), b"payload");
    let warnings = runner.logger().warn_messages();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("Failed to open"));
    assert!(todays_journal(temp_dir.path()).is_dir());
}

#[test]
fn test_pattern_rejected_before_any_record_is_taken() {
    let temp_dir = TempDir::new().unwrap();
    let mut runner = runner_for(temp_dir.path(), "(?x) file.* # trailing comment");
    runner.enqueue(Vec::new(), HashMap::new());

    let err = runner.run(1).unwrap_err();

    assert!(err.is_config());
    assert!(!err.is_expression());
    assert_eq!(runner.queued(), 1);
    assert!(runner.transferred(&REL_SUCCESS).is_empty());
    assert!(!todays_journal(temp_dir.path()).exists());
}

#[test]
fn test_record_unchanged_by_stage() {
    let temp_dir = TempDir::new().unwrap();
    let mut runner = runner_for(temp_dir.path(), ".*");

    let mut attributes = HashMap::new();
    attributes.insert("note".to_string(), "a=b; c\nd".to_string());
    let id = runner.enqueue(vec![0u8, 159, 146, 150], attributes);
    runner.run(1).unwrap();

    let out = &runner.transferred(&REL_SUCCESS)[0];
    assert_eq!(out.id(), id);
    assert_eq!(out.payload(), &[0u8, 159, 146, 150]);
    assert_eq!(out.attribute("note"), Some("a=b; c\nd"));
    assert_eq!(out.attributes().len(), 4);
}

#[test]
fn test_no_matching_attributes_writes_empty_line() {
    let temp_dir = TempDir::new().unwrap();
    let mut runner = runner_for(temp_dir.path(), "nothing-matches-this");

    runner.enqueue(Vec::new(), HashMap::new());
    runner.enqueue(Vec::new(), HashMap::new());
    runner.run(2).unwrap();

    runner.assert_all_transferred(&REL_SUCCESS, 2);
    assert_eq!(
        fs::read_to_string(todays_journal(temp_dir.path())).unwrap(),
        "\n\n"
    );
}

#[test]
fn test_missing_directory_is_created() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("deep").join("er").join("journal");
    let mut runner = runner_for(&dir, "filename");

    runner.enqueue(Vec::new(), HashMap::new());
    runner.run(1).unwrap();

    assert!(dir.is_dir());
    assert!(todays_journal(&dir).exists());
}

#[test]
fn test_directory_expression_per_record() {
    let temp_dir = TempDir::new().unwrap();
    let template = format!("{}/${{team}}", temp_dir.path().display());
    let mut runner = runner_for(Path::new(&template), "team");

    for team in ["red", "blue", "red"] {
        let mut attributes = HashMap::new();
        attributes.insert("team".to_string(), team.to_string());
        runner.enqueue(Vec::new(), attributes);
    }
    runner.run(3).unwrap();

    runner.assert_all_transferred(&REL_SUCCESS, 3);
    let red = fs::read_to_string(todays_journal(&temp_dir.path().join("red"))).unwrap();
    let blue = fs::read_to_string(todays_journal(&temp_dir.path().join("blue"))).unwrap();
    assert_eq!(red, "Key=team Value=red;\nKey=team Value=red;\n");
    assert_eq!(blue, "Key=team Value=blue;\n");
}

#[test]
fn test_bad_expression_keeps_record_queued() {
    let mut runner = StageRunner::new(stage());
    runner.set_property("Log File Directory", "logs/${unterminated");
    runner.enqueue(Vec::new(), HashMap::new());

    let err = runner.run(1).unwrap_err();

    assert!(err.is_expression());
    assert_eq!(runner.queued(), 1);
    assert!(runner.transferred(&REL_SUCCESS).is_empty());
}

#[test]
fn test_run_with_empty_queue() {
    let temp_dir = TempDir::new().unwrap();
    let mut runner = runner_for(temp_dir.path(), "file.*");

    runner.run(3).unwrap();

    runner.assert_all_transferred(&REL_SUCCESS, 0);
    assert!(!todays_journal(temp_dir.path()).exists());
}

#[test]
fn test_concurrent_triggers_share_one_journal() {
    let temp_dir = TempDir::new().unwrap();
    let stage = Arc::new(stage());

    let mut properties = BTreeMap::new();
    properties.insert(
        "Log File Directory".to_string(),
        temp_dir.path().to_string_lossy().into_owned(),
    );
    properties.insert("Attributes to Log".to_string(), "seq".to_string());
    let context = ProcessContext::new(properties, Arc::new(MemoryLogSink::new()));

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let stage = Arc::clone(&stage);
            let context = context.clone();
            thread::spawn(move || {
                let mut session = MemorySession::new();
                for i in 0..25 {
                    let mut attributes = HashMap::new();
                    attributes.insert("seq".to_string(), format!("{}-{}", worker, i));
                    session.enqueue(whatsflowing::models::Record::new(Vec::new(), attributes));
                }
                for _ in 0..25 {
                    stage.on_trigger(&context, &mut session).unwrap();
                }
                session.transferred(&REL_SUCCESS).len()
            })
        })
        .collect();

    let routed: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(routed, 100);

    let contents = fs::read_to_string(todays_journal(temp_dir.path())).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 100);
    assert!(lines
        .iter()
        .all(|l| l.starts_with("Key=seq Value=") && l.ends_with(';')));
}
