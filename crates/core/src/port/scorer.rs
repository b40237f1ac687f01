// Scorer Port
// Abstraction over the quality metric (external model wrapper or built-in)

use crate::domain::TranslationSample;
use async_trait::async_trait;
use thiserror::Error;

/// Scoring errors
#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("Scorer spawn failed: {0}")]
    SpawnFailed(String),

    #[error("Scorer timeout after {0}ms")]
    Timeout(i64),

    #[error("Invalid scorer output: {0}")]
    InvalidOutput(String),

    #[error("Scorer requires a reference translation")]
    MissingReference,

    #[error("IO error: {0}")]
    IoError(String),
}

/// Scorer trait
///
/// Implementations:
/// - CommandScorer: delegates to an external pretrained metric model process
/// - LexicalScorer: built-in reference-based fallback
#[async_trait]
pub trait Scorer: Send + Sync {
    /// Metric name shown in the report header and console output
    fn name(&self) -> &str;

    /// Whether this scorer can only score samples carrying a reference
    fn requires_reference(&self) -> bool {
        false
    }

    /// Score one sample; higher is better, nominally in [0, 1]
    ///
    /// # Errors
    /// - ScoreError::SpawnFailed if the scorer backend cannot be started
    /// - ScoreError::Timeout if scoring exceeds the configured deadline
    /// - ScoreError::InvalidOutput if the backend produced no usable score
    async fn score(&self, sample: &TranslationSample) -> Result<f64, ScoreError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock scorer behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Always return this score
        Fixed(f64),
        /// Always fail with message
        Fail(String),
    }

    /// Mock Scorer for testing
    pub struct MockScorer {
        behavior: Arc<Mutex<MockBehavior>>,
        call_count: Arc<Mutex<usize>>,
        requires_reference: bool,
    }

    impl MockScorer {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior: Arc::new(Mutex::new(behavior)),
                call_count: Arc::new(Mutex::new(0)),
                requires_reference: false,
            }
        }

        pub fn new_fixed(score: f64) -> Self {
            Self::new(MockBehavior::Fixed(score))
        }

        pub fn new_fail(message: impl Into<String>) -> Self {
            Self::new(MockBehavior::Fail(message.into()))
        }

        /// Same as `new_fixed`, but refuses samples without a reference
        pub fn new_reference_only(score: f64) -> Self {
            let mut scorer = Self::new_fixed(score);
            scorer.requires_reference = true;
            scorer
        }

        pub fn call_count(&self) -> usize {
            *self.call_count.lock().unwrap()
        }
    }

    #[async_trait]
    impl Scorer for MockScorer {
        fn name(&self) -> &str {
            "mock"
        }

        fn requires_reference(&self) -> bool {
            self.requires_reference
        }

        async fn score(&self, _sample: &TranslationSample) -> Result<f64, ScoreError> {
            *self.call_count.lock().unwrap() += 1;

            let behavior = self.behavior.lock().unwrap().clone();
            match behavior {
                MockBehavior::Fixed(score) => Ok(score),
                MockBehavior::Fail(msg) => Err(ScoreError::SpawnFailed(msg)),
            }
        }
    }
}
