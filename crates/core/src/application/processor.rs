// Processor - per-file scoring pipeline
// parse -> (skip | score) -> append records -> regenerate report

use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::application::report::{render_report, ReportOptions};
use crate::application::stats::SessionStats;
use crate::domain::{DomainError, ScoreRecord, SkipRecord, TranslationSample};
use crate::error::Result;
use crate::port::{ReportSink, ScoreLog, Scorer, TimeProvider};

/// Skip reason for files with fewer than two usable lines
pub const REASON_INSUFFICIENT_LINES: &str = "Insufficient lines";
/// Skip reason when the configured scorer needs a reference the file lacks
pub const REASON_REFERENCE_REQUIRED: &str = "Reference required by scorer";

/// Processor options
#[derive(Debug, Clone)]
pub struct ProcessorOptions {
    /// Minimum acceptable score; lower results are flagged
    pub threshold: f64,
    /// Report auto-refresh period in seconds (0 disables)
    pub auto_refresh_secs: u64,
}

impl Default for ProcessorOptions {
    fn default() -> Self {
        Self {
            threshold: 0.8,
            auto_refresh_secs: 0,
        }
    }
}

/// What happened to one submitted file
#[derive(Debug, Clone)]
pub enum Outcome {
    Scored(ScoreRecord),
    Skipped(SkipRecord),
}

/// Processor runs the scoring pipeline for submitted files
pub struct Processor {
    scorer: Arc<dyn Scorer>,
    log: Arc<dyn ScoreLog>,
    report_sink: Arc<dyn ReportSink>,
    time_provider: Arc<dyn TimeProvider>,
    options: ProcessorOptions,
    stats: Mutex<SessionStats>,
}

impl Processor {
    pub fn new(
        scorer: Arc<dyn Scorer>,
        log: Arc<dyn ScoreLog>,
        report_sink: Arc<dyn ReportSink>,
        time_provider: Arc<dyn TimeProvider>,
        options: ProcessorOptions,
    ) -> Self {
        Self {
            scorer,
            log,
            report_sink,
            time_provider,
            options,
            stats: Mutex::new(SessionStats::new()),
        }
    }

    /// Process one submitted file (name + raw text).
    ///
    /// Unparseable files and samples missing a required reference produce a
    /// skip record; scoring failures propagate to the caller and write
    /// nothing. The report is regenerated after every record.
    pub async fn process(&self, file_name: &str, text: &str) -> Result<Outcome> {
        let sample = match TranslationSample::parse(text) {
            Ok(sample) => sample,
            Err(DomainError::InsufficientLines { lines }) => {
                return self
                    .skip(file_name, REASON_INSUFFICIENT_LINES, lines)
                    .await;
            }
            Err(e) => return Err(e.into()),
        };

        if self.scorer.requires_reference() && sample.reference.is_none() {
            let lines = sample.lines();
            return self.skip(file_name, REASON_REFERENCE_REQUIRED, lines).await;
        }

        let raw_score = self.scorer.score(&sample).await?;
        let record = ScoreRecord::from_sample(file_name, sample, raw_score, self.options.threshold);

        self.log.append_result(&record).await?;
        self.stats
            .lock()
            .unwrap()
            .record(record.score, record.warning);

        if record.warning {
            self.log.append_warning(&record).await?;
            warn!(
                file = %record.file,
                score = %record.score,
                threshold = %self.options.threshold,
                "Score below threshold"
            );
        } else {
            info!(file = %record.file, score = %record.score, "Scored");
        }

        self.regenerate_report().await?;
        Ok(Outcome::Scored(record))
    }

    async fn skip(&self, file_name: &str, reason: &str, lines: Vec<String>) -> Result<Outcome> {
        let record = SkipRecord::new(file_name, reason, lines);
        warn!(file = %record.file, reason = %record.reason, "Skipping file");
        self.log.append_skip(&record).await?;
        self.regenerate_report().await?;
        Ok(Outcome::Skipped(record))
    }

    /// Rebuild the HTML report from the full accumulated logs
    pub async fn regenerate_report(&self) -> Result<()> {
        let results = self.log.read_results().await?;
        let skipped = self.log.read_skips().await?;

        let options = ReportOptions {
            metric_name: self.scorer.name().to_string(),
            threshold: self.options.threshold,
            auto_refresh_secs: self.options.auto_refresh_secs,
        };

        let html = render_report(
            &results,
            &skipped,
            &options,
            &self.time_provider.now_stamp(),
        );
        self.report_sink.publish(&html).await?;
        Ok(())
    }

    /// Snapshot of this session's counters
    pub fn stats(&self) -> SessionStats {
        self.stats.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::score_log::mocks::{MemoryReportSink, MemoryScoreLog};
    use crate::port::scorer::mocks::MockScorer;
    use crate::port::time_provider::mocks::FixedTimeProvider;

    fn processor_with(scorer: MockScorer) -> (Processor, Arc<MemoryScoreLog>, Arc<MemoryReportSink>) {
        let log = Arc::new(MemoryScoreLog::new());
        let sink = Arc::new(MemoryReportSink::new());
        let processor = Processor::new(
            Arc::new(scorer),
            log.clone(),
            sink.clone(),
            Arc::new(FixedTimeProvider::new(1000, "2024-01-01 00:00:00")),
            ProcessorOptions::default(),
        );
        (processor, log, sink)
    }

    #[tokio::test]
    async fn good_score_appends_result_only() {
        let (processor, log, sink) = processor_with(MockScorer::new_fixed(0.95));

        let outcome = processor.process("a.txt", "src\nmt\nref\n").await.unwrap();
        match outcome {
            Outcome::Scored(record) => {
                assert_eq!(record.score, 0.95);
                assert!(!record.warning);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        assert_eq!(log.results.lock().unwrap().len(), 1);
        assert!(log.warnings.lock().unwrap().is_empty());
        assert!(log.skips.lock().unwrap().is_empty());
        assert_eq!(sink.publish_count(), 1);

        let stats = processor.stats();
        assert_eq!(stats.processed(), 1);
        assert_eq!(stats.warnings(), 0);
    }

    #[tokio::test]
    async fn low_score_also_goes_to_warning_log() {
        let (processor, log, _sink) = processor_with(MockScorer::new_fixed(0.42));

        let outcome = processor.process("low.txt", "src\nmt\n").await.unwrap();
        match outcome {
            Outcome::Scored(record) => assert!(record.warning),
            other => panic!("unexpected outcome: {other:?}"),
        }

        assert_eq!(log.results.lock().unwrap().len(), 1);
        assert_eq!(log.warnings.lock().unwrap().len(), 1);
        assert_eq!(processor.stats().warnings(), 1);
    }

    #[tokio::test]
    async fn short_file_is_skipped_with_its_lines() {
        let (processor, log, sink) = processor_with(MockScorer::new_fixed(0.9));

        let outcome = processor.process("short.txt", "lonely line\n").await.unwrap();
        match outcome {
            Outcome::Skipped(record) => {
                assert_eq!(record.reason, REASON_INSUFFICIENT_LINES);
                assert_eq!(record.lines, vec!["lonely line".to_string()]);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        assert!(log.results.lock().unwrap().is_empty());
        assert_eq!(log.skips.lock().unwrap().len(), 1);
        // report regenerated for skips too
        assert_eq!(sink.publish_count(), 1);
        assert_eq!(processor.stats().processed(), 0);
    }

    #[tokio::test]
    async fn reference_only_scorer_skips_two_line_files() {
        let (processor, log, _sink) = processor_with(MockScorer::new_reference_only(0.9));

        let outcome = processor.process("noref.txt", "src\nmt\n").await.unwrap();
        match outcome {
            Outcome::Skipped(record) => {
                assert_eq!(record.reason, REASON_REFERENCE_REQUIRED);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(log.results.lock().unwrap().is_empty());

        // with a reference it scores normally
        let outcome = processor.process("ref.txt", "src\nmt\nref\n").await.unwrap();
        assert!(matches!(outcome, Outcome::Scored(_)));
        assert_eq!(log.results.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn scorer_failure_writes_nothing() {
        let (processor, log, sink) = processor_with(MockScorer::new_fail("model unavailable"));

        let result = processor.process("a.txt", "src\nmt\n").await;
        assert!(result.is_err());

        assert!(log.results.lock().unwrap().is_empty());
        assert!(log.skips.lock().unwrap().is_empty());
        assert_eq!(sink.publish_count(), 0);
        assert_eq!(processor.stats().processed(), 0);
    }

    #[tokio::test]
    async fn report_reflects_accumulated_records() {
        let (processor, _log, sink) = processor_with(MockScorer::new_fixed(0.5));

        processor.process("a.txt", "s\nm\n").await.unwrap();
        processor.process("b.txt", "s\nm\n").await.unwrap();

        let html = sink.last().unwrap();
        assert!(html.contains("a.txt"));
        assert!(html.contains("b.txt"));
        assert!(html.contains("2024-01-01 00:00:00"));
        // both below the 0.8 default threshold
        assert!(html.contains("<details open>"));
    }
}
