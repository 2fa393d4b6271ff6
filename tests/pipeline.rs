use chrono::NaiveDate;
use std::fs;
use std::path::Path;

use meetact::gate::RuleGate;
use meetact::ingest::meeting_from_text;
use meetact::models::RoleTable;
use meetact::output::json::{read_loose, read_records, write_records};
use meetact::{Extractor, OutputShape, Pipeline, PipelineConfig, Strictness};

fn config(dir: &Path) -> PipelineConfig {
    PipelineConfig {
        input_dir: dir.to_path_buf(),
        output_path: dir.join("actions.json"),
        reference_date: NaiveDate::from_ymd_opt(2024, 1, 1),
        ..Default::default()
    }
}

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

// ==========================================================================
// End-to-end runs
// ==========================================================================

#[test]
fn test_run_orders_by_file_then_utterance() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "b_review.txt",
        "Sam: We need to ship the release tomorrow.\nLee: sounds good\n",
    );
    write(
        dir.path(),
        "a_kickoff.txt",
        "Sam: Lee, can you draft the agenda by Friday?\nLee: I will book the meeting room today\n",
    );
    write(dir.path(), "roles.csv", "name,role\nSam,manager\nLee,engineer\n");
    write(dir.path(), "notes.md", "Sam: please ignore this markdown file\n");

    let report = Pipeline::from_config(config(dir.path())).run().unwrap();

    assert_eq!(report.meetings, 2);
    assert_eq!(report.utterances, 4);
    let meetings: Vec<&str> = report.records.iter().map(|r| r.meeting.as_str()).collect();
    assert_eq!(meetings, vec!["a_kickoff", "a_kickoff", "b_review"]);

    let first = &report.records[0];
    assert_eq!(first.assignee, "Lee");
    assert_eq!(first.assignee_role, "engineer");
    assert_eq!(first.deadline_iso.as_deref(), Some("2024-01-05"));

    let second = &report.records[1];
    assert_eq!(second.speaker, "Lee");
    assert_eq!(second.assignee, "Lee");
    assert_eq!(second.deadline_iso.as_deref(), Some("2024-01-01"));

    let third = &report.records[2];
    assert_eq!(third.speaker_role, "manager");
    assert_eq!(third.action_item, "We need to ship the release tomorrow.");
    assert_eq!(third.deadline_iso.as_deref(), Some("2024-01-02"));
}

#[test]
fn test_run_without_roles_file() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "m.txt", "Sam: please send the minutes tonight\n");

    let report = Pipeline::from_config(config(dir.path())).run().unwrap();
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].speaker_role, "");
    assert_eq!(report.records[0].assignee, "Sam");
}

#[test]
fn test_unlabeled_lines_are_unknown_speaker() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "m.txt", "Sam: hello all\nwe need to order more laptops\n");

    let report = Pipeline::from_config(config(dir.path())).run().unwrap();
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].speaker, "UNK");
}

#[test]
fn test_json_transcript_input() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "call.json",
        r#"{"segments": [{"text": "  "}, {"text": "Please circulate the notes by Wednesday."}]}"#,
    );

    let report = Pipeline::from_config(config(dir.path())).run().unwrap();
    assert_eq!(report.utterances, 1);
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].speaker, "UNK");
    assert_eq!(report.records[0].deadline_iso.as_deref(), Some("2024-01-03"));
}

#[test]
fn test_previous_output_is_not_read_as_transcript() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "m.txt", "Sam: please send the minutes tonight\n");
    let cfg = config(dir.path());

    let first = Pipeline::from_config(cfg.clone()).run().unwrap();
    write_records(&cfg.output_path, &first.records, OutputShape::Full).unwrap();

    let second = Pipeline::from_config(cfg).run().unwrap();
    assert_eq!(second.meetings, 1);
    assert_eq!(second.records, first.records);
}

#[test]
fn test_empty_input_dir() {
    let dir = tempfile::tempdir().unwrap();
    let report = Pipeline::from_config(config(dir.path())).run().unwrap();
    assert_eq!(report.meetings, 0);
    assert!(report.records.is_empty());
}

#[test]
fn test_strict_run() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "m.txt",
        "Sam: Okay, let's get started.\n\
         Sam: Okay, we need to finalize the budget by Friday.\n\
         Sam: Can you tell me what the users want?\n\
         Sam: Please send it.\n",
    );
    let cfg = PipelineConfig {
        strictness: Strictness::Strict,
        ..config(dir.path())
    };
    let reference = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
    let pipeline = Pipeline::new(cfg.clone(), Box::new(RuleGate), cfg.extractor(), reference);
    let report = pipeline.run().unwrap();

    assert_eq!(report.utterances, 4);
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].action_item, "finalize the budget by Friday.");
    assert_eq!(report.records[0].deadline_iso.as_deref(), Some("2024-01-05"));
}

#[test]
fn test_in_memory_meeting_threads_last_addressed() {
    let roles: RoleTable = [("Ana", "designer")].into_iter().collect();
    let meeting = meeting_from_text(
        "sync",
        "Sam: Ana, the mockups look great.\nSam: can you export them for the client\n",
        roles,
    );
    let pipeline = Pipeline::from_config(PipelineConfig {
        reference_date: NaiveDate::from_ymd_opt(2024, 1, 1),
        ..Default::default()
    });

    let records = pipeline.process_meeting(&meeting);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].meeting, "sync");
    assert_eq!(records[0].assignee, "Ana");
    assert_eq!(records[0].assignee_role, "designer");
}

// ==========================================================================
// Output files
// ==========================================================================

#[test]
fn test_output_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "m.txt",
        "Sam: Lee, can you draft the agenda by Friday?\nLee: we should update the wiki page\n",
    );
    let cfg = config(dir.path());
    let report = Pipeline::from_config(cfg.clone()).run().unwrap();
    assert_eq!(report.records.len(), 2);

    let out = dir.path().join("processed").join("actions.json");
    write_records(&out, &report.records, OutputShape::Full).unwrap();
    assert_eq!(read_records(&out).unwrap(), report.records);
}

#[test]
fn test_reduced_output_file() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "m.txt", "Sam: please send the minutes tonight\n");
    let report = Pipeline::from_config(config(dir.path())).run().unwrap();

    let out = dir.path().join("reduced.json");
    write_records(&out, &report.records, OutputShape::Reduced).unwrap();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert!(value[0].get("assignee").is_none());
    assert_eq!(value[0]["deadline"], "tonight");

    let loose = read_loose(&out).unwrap();
    assert_eq!(loose[0].action_item.as_deref(), Some("please send the minutes tonight"));
}

#[test]
fn test_extractor_default_is_lenient() {
    assert_eq!(Extractor::default().strictness(), Strictness::Lenient);
}
