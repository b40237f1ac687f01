// Port Layer - Interfaces for external dependencies

pub mod score_log;
pub mod scorer;
pub mod time_provider;

// Re-exports
pub use score_log::{LogError, ReportSink, ScoreLog};
pub use scorer::{ScoreError, Scorer};
pub use time_provider::TimeProvider;
