// Session Statistics
// In-memory counters for the console summary; the durable state is the logs.

/// Counters for the current session (since startup)
#[derive(Debug, Clone, Default)]
pub struct SessionStats {
    processed: usize,
    warnings: usize,
    score_sum: f64,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, score: f64, warning: bool) {
        self.processed += 1;
        self.score_sum += score;
        if warning {
            self.warnings += 1;
        }
    }

    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn warnings(&self) -> usize {
        self.warnings
    }

    /// Mean of all recorded scores; None when nothing was processed
    pub fn average(&self) -> Option<f64> {
        if self.processed == 0 {
            None
        } else {
            Some(self.score_sum / self.processed as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stats_have_no_average() {
        let stats = SessionStats::new();
        assert_eq!(stats.processed(), 0);
        assert_eq!(stats.average(), None);
    }

    #[test]
    fn records_accumulate() {
        let mut stats = SessionStats::new();
        stats.record(0.9, false);
        stats.record(0.5, true);
        assert_eq!(stats.processed(), 2);
        assert_eq!(stats.warnings(), 1);
        assert!((stats.average().unwrap() - 0.7).abs() < 1e-9);
    }
}
