// Translation Sample Domain Model

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, Result};

/// One translation to evaluate: the source sentence, the MT output,
/// and an optional human reference translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationSample {
    pub source: String,
    pub mt_output: String,
    pub reference: Option<String>,
}

impl TranslationSample {
    pub fn new(
        source: impl Into<String>,
        mt_output: impl Into<String>,
        reference: Option<String>,
    ) -> Self {
        Self {
            source: source.into(),
            mt_output: mt_output.into(),
            reference,
        }
    }

    /// Parse raw file text into a sample.
    ///
    /// Keeps trimmed, non-blank lines only. Line 1 is the source,
    /// line 2 the MT output, line 3 (when present) the reference.
    /// Lines beyond the third are ignored.
    ///
    /// # Errors
    /// - `DomainError::InsufficientLines` when fewer than 2 usable lines remain
    pub fn parse(text: &str) -> Result<Self> {
        let lines: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();

        if lines.len() < 2 {
            return Err(DomainError::InsufficientLines { lines });
        }

        let mut lines = lines.into_iter();
        let source = lines.next().unwrap_or_default();
        let mt_output = lines.next().unwrap_or_default();
        let reference = lines.next();

        Ok(Self {
            source,
            mt_output,
            reference,
        })
    }

    /// The lines this sample was built from, for skip records.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.source.clone(), self.mt_output.clone()];
        if let Some(reference) = &self.reference {
            lines.push(reference.clone());
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_line_file() {
        let sample = TranslationSample::parse("Hallo Welt\nHello world\n").unwrap();
        assert_eq!(sample.source, "Hallo Welt");
        assert_eq!(sample.mt_output, "Hello world");
        assert_eq!(sample.reference, None);
    }

    #[test]
    fn parses_three_line_file_with_reference() {
        let sample =
            TranslationSample::parse("Hallo Welt\nHello world\nHello, world!\n").unwrap();
        assert_eq!(sample.reference.as_deref(), Some("Hello, world!"));
    }

    #[test]
    fn skips_blank_lines_and_trims() {
        let sample = TranslationSample::parse("\n  Hallo Welt  \r\n\n\tHello world\n\n").unwrap();
        assert_eq!(sample.source, "Hallo Welt");
        assert_eq!(sample.mt_output, "Hello world");
    }

    #[test]
    fn rejects_single_line_file() {
        let err = TranslationSample::parse("only a source line\n").unwrap_err();
        match err {
            DomainError::InsufficientLines { lines } => {
                assert_eq!(lines, vec!["only a source line".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_empty_file() {
        let err = TranslationSample::parse("\n\n  \n").unwrap_err();
        match err {
            DomainError::InsufficientLines { lines } => assert!(lines.is_empty()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn extra_lines_are_ignored() {
        let sample = TranslationSample::parse("a\nb\nc\nd\ne\n").unwrap();
        assert_eq!(sample.reference.as_deref(), Some("c"));
    }
}
