// Score Log & Report Sink Ports
// Persistence interface for the append-only record logs and the report file

use crate::domain::{ScoreRecord, SkipRecord};
use async_trait::async_trait;
use thiserror::Error;

/// Log persistence errors
#[derive(Error, Debug)]
pub enum LogError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Append-only record logs (scores, warnings, skipped), plus the
/// read-back side that feeds report generation.
#[async_trait]
pub trait ScoreLog: Send + Sync {
    /// Append a scored record to the main scores log
    async fn append_result(&self, record: &ScoreRecord) -> Result<(), LogError>;

    /// Append a below-threshold record to the separate warnings log
    async fn append_warning(&self, record: &ScoreRecord) -> Result<(), LogError>;

    /// Append a skip record to the skipped log
    async fn append_skip(&self, record: &SkipRecord) -> Result<(), LogError>;

    /// Read the full accumulated scores log
    async fn read_results(&self) -> Result<Vec<ScoreRecord>, LogError>;

    /// Read the full accumulated skipped log
    async fn read_skips(&self) -> Result<Vec<SkipRecord>, LogError>;
}

/// Destination for the rendered HTML report
#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn publish(&self, html: &str) -> Result<(), LogError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    /// In-memory ScoreLog for testing
    #[derive(Default)]
    pub struct MemoryScoreLog {
        pub results: Mutex<Vec<ScoreRecord>>,
        pub warnings: Mutex<Vec<ScoreRecord>>,
        pub skips: Mutex<Vec<SkipRecord>>,
    }

    impl MemoryScoreLog {
        pub fn new() -> Self {
            Self::default()
        }
    }

    #[async_trait]
    impl ScoreLog for MemoryScoreLog {
        async fn append_result(&self, record: &ScoreRecord) -> Result<(), LogError> {
            self.results.lock().unwrap().push(record.clone());
            Ok(())
        }

        async fn append_warning(&self, record: &ScoreRecord) -> Result<(), LogError> {
            self.warnings.lock().unwrap().push(record.clone());
            Ok(())
        }

        async fn append_skip(&self, record: &SkipRecord) -> Result<(), LogError> {
            self.skips.lock().unwrap().push(record.clone());
            Ok(())
        }

        async fn read_results(&self) -> Result<Vec<ScoreRecord>, LogError> {
            Ok(self.results.lock().unwrap().clone())
        }

        async fn read_skips(&self) -> Result<Vec<SkipRecord>, LogError> {
            Ok(self.skips.lock().unwrap().clone())
        }
    }

    /// In-memory ReportSink capturing every published report
    #[derive(Default)]
    pub struct MemoryReportSink {
        pub published: Mutex<Vec<String>>,
    }

    impl MemoryReportSink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn publish_count(&self) -> usize {
            self.published.lock().unwrap().len()
        }

        pub fn last(&self) -> Option<String> {
            self.published.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl ReportSink for MemoryReportSink {
        async fn publish(&self, html: &str) -> Result<(), LogError> {
            self.published.lock().unwrap().push(html.to_string());
            Ok(())
        }
    }
}
