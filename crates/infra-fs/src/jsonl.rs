// JSONL implementation of the ScoreLog port
// One JSON object per line, append-only; reads feed report regeneration.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::warn;

use scorewatch_core::domain::{ScoreRecord, SkipRecord};
use scorewatch_core::port::{LogError, ScoreLog};

/// ScoreLog over three append-only JSONL files
pub struct JsonlScoreLog {
    scores_path: PathBuf,
    warnings_path: PathBuf,
    skipped_path: PathBuf,
}

impl JsonlScoreLog {
    pub fn new(
        scores_path: impl Into<PathBuf>,
        warnings_path: impl Into<PathBuf>,
        skipped_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            scores_path: scores_path.into(),
            warnings_path: warnings_path.into(),
            skipped_path: skipped_path.into(),
        }
    }

    async fn append_line<T: Serialize>(path: &Path, value: &T) -> Result<(), LogError> {
        let mut line =
            serde_json::to_vec(value).map_err(|e| LogError::Serialization(e.to_string()))?;
        line.push(b'\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(|e| LogError::IoError(e.to_string()))?;
        file.write_all(&line)
            .await
            .map_err(|e| LogError::IoError(e.to_string()))?;
        file.flush()
            .await
            .map_err(|e| LogError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Read a whole JSONL file. A missing file reads as empty; blank lines
    /// are ignored; unparseable lines are skipped with a warning so one
    /// corrupt line cannot wedge report regeneration.
    async fn read_lines<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, LogError> {
        let text = match tokio::fs::read_to_string(path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(LogError::IoError(e.to_string())),
        };

        let mut records = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<T>(line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        line = idx + 1,
                        error = %e,
                        "Skipping unparseable log line"
                    );
                }
            }
        }
        Ok(records)
    }
}

#[async_trait]
impl ScoreLog for JsonlScoreLog {
    async fn append_result(&self, record: &ScoreRecord) -> Result<(), LogError> {
        Self::append_line(&self.scores_path, record).await
    }

    async fn append_warning(&self, record: &ScoreRecord) -> Result<(), LogError> {
        Self::append_line(&self.warnings_path, record).await
    }

    async fn append_skip(&self, record: &SkipRecord) -> Result<(), LogError> {
        Self::append_line(&self.skipped_path, record).await
    }

    async fn read_results(&self) -> Result<Vec<ScoreRecord>, LogError> {
        Self::read_lines(&self.scores_path).await
    }

    async fn read_skips(&self) -> Result<Vec<SkipRecord>, LogError> {
        Self::read_lines(&self.skipped_path).await
    }
}
