// Application Layer - Use Cases

pub mod processor;
pub mod report;
pub mod shutdown;
pub mod stats;

// Re-exports
pub use processor::{Outcome, Processor, ProcessorOptions};
pub use report::{render_report, ReportOptions};
pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};
pub use stats::SessionStats;
