// Scorewatch Infra-FS - Filesystem adapters
// JSONL record logs, report file sink, and the input directory watcher

pub mod jsonl;
pub mod report_sink;
pub mod watcher;

pub use jsonl::JsonlScoreLog;
pub use report_sink::FsReportSink;
pub use watcher::TranslationWatcher;
