//! Scorewatch - Main Entry Point
//! Watches a translations folder, scores each file, keeps JSONL logs and
//! an HTML report up to date.

mod config;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tabled::{Table, Tabled};
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{Cli, Command, Options};
use scorewatch_core::application::{
    shutdown_channel, Outcome, Processor, ProcessorOptions, SessionStats,
};
use scorewatch_core::port::time_provider::SystemTimeProvider;
use scorewatch_core::port::{ScoreLog, Scorer};
use scorewatch_infra_fs::{FsReportSink, JsonlScoreLog, TranslationWatcher};
use scorewatch_infra_scorer::{CommandScorer, LexicalScorer};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn init_logging() {
    let log_format = std::env::var("SCOREWATCH_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("scorewatch=info"))
        .expect("Failed to create env filter");

    match log_format.as_str() {
        "json" => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            // Development: Pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }
}

fn build_scorer(options: &Options, time_provider: Arc<SystemTimeProvider>) -> Arc<dyn Scorer> {
    match &options.scorer_command {
        Some(program) => Arc::new(CommandScorer::new(
            program.clone(),
            options.scorer_args.clone(),
            options.scorer_timeout_ms(),
            time_provider,
        )),
        None => Arc::new(LexicalScorer::new()),
    }
}

fn build_processor(options: &Options) -> (Processor, Arc<JsonlScoreLog>) {
    let time_provider = Arc::new(SystemTimeProvider);
    let scorer = build_scorer(options, time_provider.clone());
    let log = Arc::new(JsonlScoreLog::new(
        options.scores_file(),
        options.warnings_file(),
        options.skipped_file(),
    ));
    let report_sink = Arc::new(FsReportSink::new(options.report_file()));

    let processor = Processor::new(
        scorer,
        log.clone(),
        report_sink,
        time_provider,
        ProcessorOptions {
            threshold: options.threshold,
            auto_refresh_secs: options.auto_refresh_secs,
        },
    );
    (processor, log)
}

/// Read and process one submitted file; failures are reported and swallowed
/// so a bad file never stops the watcher.
async fn handle_file(processor: &Processor, options: &Options, path: &Path) {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) => {
            error!(file = %path.display(), error = %e, "Failed to read file");
            return;
        }
    };

    match processor.process(&file_name, &text).await {
        Ok(Outcome::Scored(record)) => {
            if record.warning {
                println!(
                    "{}",
                    format!(
                        "⚠ WARNING: {} scored {:.4}, below threshold {}!",
                        record.file, record.score, options.threshold
                    )
                    .red()
                );
            } else {
                println!(
                    "{}",
                    format!("Processed {} → score: {:.4}", record.file, record.score).green()
                );
            }
        }
        Ok(Outcome::Skipped(record)) => {
            println!(
                "{}",
                format!("⚠ Skipping {} ({})", record.file, record.reason).yellow()
            );
        }
        Err(e) => {
            error!(file = %file_name, error = %e, "Error processing file");
        }
    }
}

/// Batch-process the .txt files already present in the input folder
async fn scan_existing(processor: &Processor, options: &Options) -> Result<()> {
    let dir = options.input_dir();
    let mut entries = tokio::fs::read_dir(&dir).await?;
    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("txt")
            && entry.file_type().await?.is_file()
        {
            paths.push(path);
        }
    }
    paths.sort();

    for path in &paths {
        handle_file(processor, options, path).await;
    }
    Ok(())
}

fn print_summary(stats: &SessionStats, threshold: f64) {
    if stats.processed() == 0 {
        println!("{}", "No files processed yet.".cyan());
        return;
    }

    println!("\n================= SUMMARY =================");
    println!("Total processed: {}", stats.processed());
    println!("Warnings (< {}): {}", threshold, stats.warnings());
    println!("Average score: {:.4}", stats.average().unwrap_or(0.0));
    println!("==========================================\n");
}

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// Print accumulated totals from the logs (across all sessions)
async fn print_status(log: &JsonlScoreLog, threshold: f64) -> Result<()> {
    let results = log.read_results().await?;
    let skips = log.read_skips().await?;

    let total = results.len();
    let warnings = results.iter().filter(|r| r.warning).count();
    let average = if total == 0 {
        0.0
    } else {
        results.iter().map(|r| r.score).sum::<f64>() / total as f64
    };

    println!("{}", "Accumulated Status".cyan().bold());
    println!();

    let rows = vec![
        StatusRow {
            metric: "Total evaluated".to_string(),
            value: total.to_string(),
        },
        StatusRow {
            metric: format!("Below threshold ({threshold})"),
            value: warnings.to_string(),
        },
        StatusRow {
            metric: "Average score".to_string(),
            value: format!("{average:.4}"),
        },
        StatusRow {
            metric: "Skipped files".to_string(),
            value: skips.len().to_string(),
        },
    ];
    println!("{}", Table::new(rows));
    Ok(())
}

/// Watch loop: react to created .txt files until shutdown
async fn watch(processor: &Processor, options: &Options) -> Result<()> {
    let input_dir = options.input_dir();
    let mut watcher = TranslationWatcher::new(&input_dir)
        .map_err(|e| anyhow::anyhow!("Failed to watch {}: {}", input_dir.display(), e))?;

    info!(input_dir = %input_dir.display(), "Watching folder");
    println!("Watching folder: {}", input_dir.display());
    println!("Press Ctrl+C to stop");

    let (shutdown_tx, mut shutdown_rx) = shutdown_channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown_tx.shutdown();
        }
    });

    loop {
        tokio::select! {
            created = watcher.next_created() => {
                match created {
                    Some(path) => handle_file(processor, options, &path).await,
                    None => {
                        error!("Watcher channel closed unexpectedly");
                        break;
                    }
                }
            }
            _ = shutdown_rx.wait() => {
                info!("Shutdown signal received. Exiting gracefully...");
                break;
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let options = cli.options;
    let (processor, log) = build_processor(&options);

    info!("scorewatch v{} starting...", VERSION);

    match cli.command.unwrap_or(Command::Watch) {
        Command::Report => {
            processor.regenerate_report().await?;
            println!("Report written to {}", options.report_file().display());
        }

        Command::Status => {
            print_status(&log, options.threshold).await?;
        }

        Command::Scan => {
            tokio::fs::create_dir_all(options.input_dir()).await?;
            info!(input_dir = %options.input_dir().display(), "Batch processing existing files");
            scan_existing(&processor, &options).await?;
            processor.regenerate_report().await?;
            print_summary(&processor.stats(), options.threshold);
        }

        Command::Watch => {
            tokio::fs::create_dir_all(options.input_dir()).await?;
            info!(input_dir = %options.input_dir().display(), "Batch processing existing files");
            scan_existing(&processor, &options).await?;
            processor.regenerate_report().await?;
            print_summary(&processor.stats(), options.threshold);

            watch(&processor, &options).await?;

            // final report + summary on the way out
            processor.regenerate_report().await?;
            print_summary(&processor.stats(), options.threshold);
        }
    }

    Ok(())
}
