// Score and Skip Record Models
// These are the JSONL line shapes; field names are the on-disk format.

use serde::{Deserialize, Serialize};

use crate::domain::TranslationSample;

/// Round a score to 4 decimal places (log and report precision).
pub fn round4(score: f64) -> f64 {
    (score * 10_000.0).round() / 10_000.0
}

/// One scored translation, appended to the scores log (and to the
/// warnings log when `warning` is set).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub file: String,
    pub source: String,
    pub mt_output: String,
    pub reference: Option<String>,
    pub score: f64,
    pub warning: bool,
}

impl ScoreRecord {
    /// Build a record from a scored sample.
    ///
    /// The raw score is rounded to 4 decimals; `warning` is set when the
    /// rounded score falls below `threshold`.
    pub fn from_sample(
        file: impl Into<String>,
        sample: TranslationSample,
        raw_score: f64,
        threshold: f64,
    ) -> Self {
        let score = round4(raw_score);
        Self {
            file: file.into(),
            source: sample.source,
            mt_output: sample.mt_output,
            reference: sample.reference,
            score,
            warning: score < threshold,
        }
    }
}

/// A file that could not be scored, appended to the skipped log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipRecord {
    pub file: String,
    pub reason: String,
    pub lines: Vec<String>,
}

impl SkipRecord {
    pub fn new(file: impl Into<String>, reason: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            file: file.into(),
            reason: reason.into(),
            lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_four_decimals() {
        assert_eq!(round4(0.912_37), 0.9124);
        assert_eq!(round4(0.912_34), 0.9123);
        assert_eq!(round4(1.0), 1.0);
        assert_eq!(round4(0.0), 0.0);
    }

    #[test]
    fn warning_flag_uses_rounded_score() {
        let sample = TranslationSample::new("src", "mt", None);
        // 0.79996 rounds to 0.8 and must NOT warn at threshold 0.8
        let record = ScoreRecord::from_sample("a.txt", sample, 0.799_96, 0.8);
        assert_eq!(record.score, 0.8);
        assert!(!record.warning);
    }

    #[test]
    fn below_threshold_warns() {
        let sample = TranslationSample::new("src", "mt", Some("ref".to_string()));
        let record = ScoreRecord::from_sample("a.txt", sample, 0.4321, 0.8);
        assert!(record.warning);
        assert_eq!(record.reference.as_deref(), Some("ref"));
    }

    #[test]
    fn record_serializes_with_on_disk_field_names() {
        let sample = TranslationSample::new("s", "m", None);
        let record = ScoreRecord::from_sample("a.txt", sample, 0.9, 0.8);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["file"], "a.txt");
        assert_eq!(json["mt_output"], "m");
        assert_eq!(json["reference"], serde_json::Value::Null);
        assert_eq!(json["warning"], false);
    }
}
