// CLI configuration

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "scorewatch")]
#[command(about = "Watches a folder of translation files and scores MT quality", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Defaults to `watch` when omitted
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub options: Options,
}

#[derive(Subcommand)]
pub enum Command {
    /// Process existing files, then watch the folder for new ones
    Watch,

    /// Process existing files once and exit
    Scan,

    /// Regenerate the HTML report from the accumulated logs and exit
    Report,

    /// Print accumulated totals from the logs
    Status,
}

#[derive(Args)]
pub struct Options {
    /// Folder containing incoming .txt files
    #[arg(long, env = "SCOREWATCH_INPUT_DIR", default_value = "./translations")]
    pub input_dir: String,

    /// Main scores log (JSONL)
    #[arg(long, env = "SCOREWATCH_SCORES_FILE", default_value = "./scores.jsonl")]
    pub scores_file: String,

    /// Separate warnings log (JSONL)
    #[arg(long, env = "SCOREWATCH_WARNINGS_FILE", default_value = "./warnings.jsonl")]
    pub warnings_file: String,

    /// Skipped files log (JSONL)
    #[arg(long, env = "SCOREWATCH_SKIPPED_FILE", default_value = "./skipped.jsonl")]
    pub skipped_file: String,

    /// Human-friendly HTML report
    #[arg(long, env = "SCOREWATCH_REPORT_FILE", default_value = "./report.html")]
    pub report_file: String,

    /// Minimum acceptable score; lower results are flagged
    #[arg(long, env = "SCOREWATCH_THRESHOLD", default_value_t = 0.8)]
    pub threshold: f64,

    /// >0 embeds an HTML auto-refresh with this period (seconds)
    #[arg(long, env = "SCOREWATCH_AUTO_REFRESH_SECS", default_value_t = 0)]
    pub auto_refresh_secs: u64,

    /// External scoring command: reads one JSON sample on stdin and prints
    /// the score. Absent means the built-in lexical scorer is used.
    #[arg(long, env = "SCOREWATCH_SCORER_COMMAND")]
    pub scorer_command: Option<String>,

    /// Extra argument for the scoring command (repeatable; values may be
    /// flags for the scorer itself, e.g. `--scorer-arg --model`)
    #[arg(long = "scorer-arg", num_args = 1, allow_hyphen_values = true)]
    pub scorer_args: Vec<String>,

    /// Timeout for one scoring call, seconds
    #[arg(long, env = "SCOREWATCH_SCORER_TIMEOUT_SECS")]
    pub scorer_timeout_secs: Option<u64>,
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

impl Options {
    pub fn input_dir(&self) -> PathBuf {
        expand(&self.input_dir)
    }

    pub fn scores_file(&self) -> PathBuf {
        expand(&self.scores_file)
    }

    pub fn warnings_file(&self) -> PathBuf {
        expand(&self.warnings_file)
    }

    pub fn skipped_file(&self) -> PathBuf {
        expand(&self.skipped_file)
    }

    pub fn report_file(&self) -> PathBuf {
        expand(&self.report_file)
    }

    pub fn scorer_timeout_ms(&self) -> Option<i64> {
        self.scorer_timeout_secs.map(|s| (s * 1000) as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_documented_layout() {
        let cli = Cli::try_parse_from(["scorewatch"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.options.input_dir, "./translations");
        assert_eq!(cli.options.threshold, 0.8);
        assert_eq!(cli.options.auto_refresh_secs, 0);
        assert!(cli.options.scorer_command.is_none());
    }

    #[test]
    fn scorer_args_are_repeatable() {
        let cli = Cli::try_parse_from([
            "scorewatch",
            "--scorer-command",
            "comet-score",
            "--scorer-arg",
            "--model",
            "--scorer-arg",
            "wmt22-comet-da",
            "watch",
        ])
        .unwrap();
        assert_eq!(cli.options.scorer_args, vec!["--model", "wmt22-comet-da"]);
    }
}
