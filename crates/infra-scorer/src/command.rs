// Command scorer implementation
// Spawns the external pretrained metric model wrapper as a child process
// with environment allowlisting.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::info;

use scorewatch_core::domain::TranslationSample;
use scorewatch_core::port::{ScoreError, Scorer, TimeProvider};

/// Environment variables child processes may inherit
const DEFAULT_ENV_ALLOWLIST: &[&str] = &["PATH", "HOME", "USER", "LANG"];

/// Scorer that delegates to an external command.
///
/// The sample is written to the child's stdin as one JSON object
/// (`{"src": ..., "mt": ..., "ref": ...}`, `ref` null when absent); the
/// last non-blank stdout line must be the score.
pub struct CommandScorer {
    program: String,
    args: Vec<String>,
    timeout_ms: Option<i64>,
    env_allowlist: Vec<String>,
    time_provider: Arc<dyn TimeProvider>,
}

impl CommandScorer {
    pub fn new(
        program: impl Into<String>,
        args: Vec<String>,
        timeout_ms: Option<i64>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            program: program.into(),
            args,
            timeout_ms,
            env_allowlist: DEFAULT_ENV_ALLOWLIST
                .iter()
                .map(|s| s.to_string())
                .collect(),
            time_provider,
        }
    }

    /// Extend the environment allowlist (e.g. model cache directories)
    pub fn allow_env(mut self, names: impl IntoIterator<Item = String>) -> Self {
        self.env_allowlist.extend(names);
        self
    }

    fn allowed_env(&self) -> Vec<(String, String)> {
        std::env::vars()
            .filter(|(k, _)| self.env_allowlist.contains(k))
            .collect()
    }

    async fn spawn_and_wait(&self, payload: &[u8]) -> Result<std::process::Output, ScoreError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env_clear()
            .envs(self.allowed_env())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // a timed-out child must not outlive the scoring call
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ScoreError::SpawnFailed(e.to_string()))?;

        if let Some(mut stdin) = child.stdin.take() {
            // A scorer that exits without reading stdin closes the pipe;
            // its verdict still arrives via stdout, so ignore write errors.
            let _ = stdin.write_all(payload).await;
            let _ = stdin.write_all(b"\n").await;
        }

        if let Some(timeout_ms) = self.timeout_ms {
            match timeout(
                Duration::from_millis(timeout_ms as u64),
                child.wait_with_output(),
            )
            .await
            {
                Ok(Ok(output)) => Ok(output),
                Ok(Err(e)) => Err(ScoreError::IoError(e.to_string())),
                Err(_) => Err(ScoreError::Timeout(timeout_ms)),
            }
        } else {
            child
                .wait_with_output()
                .await
                .map_err(|e| ScoreError::IoError(e.to_string()))
        }
    }

    fn parse_score(stdout: &str) -> Result<f64, ScoreError> {
        let line = stdout
            .lines()
            .rev()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .ok_or_else(|| ScoreError::InvalidOutput("empty stdout".to_string()))?;

        let score: f64 = line
            .parse()
            .map_err(|_| ScoreError::InvalidOutput(format!("not a number: {line:?}")))?;

        if !score.is_finite() {
            return Err(ScoreError::InvalidOutput(format!(
                "non-finite score: {line:?}"
            )));
        }
        Ok(score)
    }
}

#[async_trait]
impl Scorer for CommandScorer {
    fn name(&self) -> &str {
        &self.program
    }

    async fn score(&self, sample: &TranslationSample) -> Result<f64, ScoreError> {
        let payload = serde_json::json!({
            "src": sample.source,
            "mt": sample.mt_output,
            "ref": sample.reference,
        });
        let payload =
            serde_json::to_vec(&payload).map_err(|e| ScoreError::IoError(e.to_string()))?;

        let start = self.time_provider.now_millis();
        let output = self.spawn_and_wait(&payload).await?;
        let duration_ms = self.time_provider.now_millis() - start;

        if !output.status.success() {
            return Err(ScoreError::InvalidOutput(format!(
                "scorer exited with {:?}: {}",
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let score = Self::parse_score(&String::from_utf8_lossy(&output.stdout))?;

        info!(
            program = %self.program,
            duration_ms = %duration_ms,
            score = %score,
            "Scorer command completed"
        );
        Ok(score)
    }
}
