//! End-to-end tests with an external scorer command standing in for the
//! pretrained metric model wrapper.

use std::sync::Arc;

use tempfile::TempDir;

use scorewatch_core::application::{Outcome, Processor, ProcessorOptions};
use scorewatch_core::port::time_provider::SystemTimeProvider;
use scorewatch_core::port::ScoreLog;
use scorewatch_infra_fs::{FsReportSink, JsonlScoreLog};
use scorewatch_infra_scorer::CommandScorer;

fn build_with_script(dir: &TempDir, script: &str) -> (Processor, Arc<JsonlScoreLog>) {
    let scorer = CommandScorer::new(
        "sh",
        vec!["-c".to_string(), script.to_string()],
        Some(5000),
        Arc::new(SystemTimeProvider),
    );
    let log = Arc::new(JsonlScoreLog::new(
        dir.path().join("scores.jsonl"),
        dir.path().join("warnings.jsonl"),
        dir.path().join("skipped.jsonl"),
    ));
    let processor = Processor::new(
        Arc::new(scorer),
        log.clone(),
        Arc::new(FsReportSink::new(dir.path().join("report.html"))),
        Arc::new(SystemTimeProvider),
        ProcessorOptions::default(),
    );
    (processor, log)
}

#[tokio::test]
async fn external_score_flows_into_record_and_report() {
    let dir = TempDir::new().unwrap();
    let (processor, log) = build_with_script(&dir, "cat > /dev/null; echo 0.9137");

    let outcome = processor
        .process("sample.txt", "Hallo Welt\nHello world\n")
        .await
        .unwrap();

    match outcome {
        Outcome::Scored(record) => {
            assert_eq!(record.score, 0.9137);
            assert!(!record.warning);
            // the command scorer accepts a missing reference
            assert_eq!(record.reference, None);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    let results = log.read_results().await.unwrap();
    assert_eq!(results.len(), 1);

    let report = std::fs::read_to_string(dir.path().join("report.html")).unwrap();
    assert!(report.contains("sample.txt"));
    assert!(report.contains("0.9137"));
}

#[tokio::test]
async fn failing_command_leaves_logs_untouched() {
    let dir = TempDir::new().unwrap();
    let (processor, log) = build_with_script(&dir, "cat > /dev/null; exit 7");

    let result = processor
        .process("sample.txt", "Hallo Welt\nHello world\n")
        .await;
    assert!(result.is_err());

    assert!(log.read_results().await.unwrap().is_empty());
    assert!(log.read_skips().await.unwrap().is_empty());
    assert!(!dir.path().join("report.html").exists());
}

#[tokio::test]
async fn below_threshold_external_score_warns() {
    let dir = TempDir::new().unwrap();
    let (processor, log) = build_with_script(&dir, "cat > /dev/null; echo 0.3125");

    let outcome = processor
        .process("weak.txt", "Quelle\nmt output\nreference\n")
        .await
        .unwrap();
    match outcome {
        Outcome::Scored(record) => assert!(record.warning),
        other => panic!("unexpected outcome: {other:?}"),
    }

    let results = log.read_results().await.unwrap();
    assert!(results[0].warning);
    let warnings = std::fs::read_to_string(dir.path().join("warnings.jsonl")).unwrap();
    assert!(warnings.contains("weak.txt"));
}
