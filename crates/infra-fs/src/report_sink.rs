// Filesystem ReportSink
// Writes the rendered HTML report, replacing the previous one.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use scorewatch_core::port::{LogError, ReportSink};

pub struct FsReportSink {
    path: PathBuf,
}

impl FsReportSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ReportSink for FsReportSink {
    async fn publish(&self, html: &str) -> Result<(), LogError> {
        tokio::fs::write(&self.path, html)
            .await
            .map_err(|e| LogError::IoError(e.to_string()))?;
        debug!(path = %self.path.display(), bytes = html.len(), "Report written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn publish_overwrites_previous_report() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.html");
        let sink = FsReportSink::new(&path);

        sink.publish("<html>v1</html>").await.unwrap();
        sink.publish("<html>v2</html>").await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "<html>v2</html>");
    }
}
