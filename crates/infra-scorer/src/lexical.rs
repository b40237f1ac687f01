// Lexical scorer implementation
// Reference-based fallback when no external metric model is configured:
// clipped n-gram precision (geometric mean, brevity penalty), word-level
// edit-distance similarity, and token F1, blended.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

use scorewatch_core::domain::TranslationSample;
use scorewatch_core::port::{ScoreError, Scorer};

const MAX_NGRAMS: usize = 4;

// Token overlap ignores word order entirely, so it carries the
// smallest weight in the blend.
const WEIGHT_NGRAM: f64 = 0.5;
const WEIGHT_EDIT: f64 = 0.3;
const WEIGHT_TOKEN_F1: f64 = 0.2;

fn ngrams(words: &[&str], n: usize) -> Vec<String> {
    if n > words.len() {
        return Vec::new();
    }
    if n == 1 {
        return words.iter().map(|w| w.to_string()).collect();
    }
    (0..=words.len() - n).map(|i| words[i..i + n].join(" ")).collect()
}

fn ngram_counts(grams: &[String]) -> HashMap<&str, usize> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for gram in grams {
        *counts.entry(gram.as_str()).or_insert(0) += 1;
    }
    counts
}

fn clipped_matches(mt: &HashMap<&str, usize>, reference: &HashMap<&str, usize>) -> usize {
    mt.iter()
        .filter_map(|(gram, mt_count)| reference.get(gram).map(|ref_count| mt_count.min(ref_count)))
        .sum()
}

fn ngram_precision(mt_words: &[&str], ref_words: &[&str], n: usize) -> f64 {
    let mt_grams = ngrams(mt_words, n);
    if mt_grams.is_empty() {
        return 0.0;
    }
    let ref_grams = ngrams(ref_words, n);

    let mt_counts = ngram_counts(&mt_grams);
    let ref_counts = ngram_counts(&ref_grams);

    clipped_matches(&mt_counts, &ref_counts) as f64 / mt_grams.len() as f64
}

fn geometric_mean(values: &[f64]) -> f64 {
    if values.is_empty() || values.iter().any(|&v| v == 0.0) {
        return 0.0;
    }
    let log_sum: f64 = values.iter().map(|v| v.ln()).sum();
    (log_sum / values.len() as f64).exp()
}

/// Clipped n-gram precision up to MAX_NGRAMS with brevity penalty
fn ngram_score(mt_words: &[&str], ref_words: &[&str]) -> f64 {
    if mt_words.is_empty() || ref_words.is_empty() {
        return 0.0;
    }

    let max_n = MAX_NGRAMS.min(mt_words.len()).min(ref_words.len());
    let precisions: Vec<f64> = (1..=max_n)
        .map(|n| ngram_precision(mt_words, ref_words, n))
        .collect();
    let mean = geometric_mean(&precisions);

    let brevity_penalty = if mt_words.len() > ref_words.len() {
        1.0
    } else {
        (1.0 - ref_words.len() as f64 / mt_words.len() as f64).exp()
    };

    brevity_penalty * mean
}

fn edit_distance(mt_words: &[&str], ref_words: &[&str]) -> usize {
    let rows = mt_words.len() + 1;
    let cols = ref_words.len() + 1;
    let mut dp = vec![0usize; rows * cols];

    for i in 0..rows {
        dp[i * cols] = i;
    }
    for j in 0..cols {
        dp[j] = j;
    }

    for i in 1..rows {
        for j in 1..cols {
            let cost = usize::from(mt_words[i - 1] != ref_words[j - 1]);
            let delete = dp[(i - 1) * cols + j] + 1;
            let insert = dp[i * cols + (j - 1)] + 1;
            let substitute = dp[(i - 1) * cols + (j - 1)] + cost;
            dp[i * cols + j] = delete.min(insert).min(substitute);
        }
    }
    dp[rows * cols - 1]
}

/// 1 - normalized word-level edit distance
fn edit_similarity(mt_words: &[&str], ref_words: &[&str]) -> f64 {
    let normalizer = mt_words.len().max(ref_words.len()).max(1);
    let distance = edit_distance(mt_words, ref_words) as f64;
    (1.0 - distance / normalizer as f64).max(0.0)
}

fn token_f1(mt_words: &[&str], ref_words: &[&str]) -> f64 {
    let mt_set: HashSet<&str> = mt_words.iter().copied().collect();
    let ref_set: HashSet<&str> = ref_words.iter().copied().collect();

    if mt_set.is_empty() && ref_set.is_empty() {
        return 1.0;
    }
    if mt_set.is_empty() || ref_set.is_empty() {
        return 0.0;
    }

    let common = mt_set.intersection(&ref_set).count() as f64;
    let precision = common / mt_set.len() as f64;
    let recall = common / ref_set.len() as f64;
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

fn blended_score(mt: &str, reference: &str) -> f64 {
    let mt_words: Vec<&str> = mt.split_whitespace().collect();
    let ref_words: Vec<&str> = reference.split_whitespace().collect();

    if mt_words.is_empty() && ref_words.is_empty() {
        return 1.0;
    }

    WEIGHT_NGRAM * ngram_score(&mt_words, &ref_words)
        + WEIGHT_EDIT * edit_similarity(&mt_words, &ref_words)
        + WEIGHT_TOKEN_F1 * token_f1(&mt_words, &ref_words)
}

/// Built-in reference-based scorer
pub struct LexicalScorer;

impl LexicalScorer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LexicalScorer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Scorer for LexicalScorer {
    fn name(&self) -> &str {
        "lexical"
    }

    fn requires_reference(&self) -> bool {
        true
    }

    async fn score(&self, sample: &TranslationSample) -> Result<f64, ScoreError> {
        let reference = sample
            .reference
            .as_deref()
            .ok_or(ScoreError::MissingReference)?;
        Ok(blended_score(&sample.mt_output, reference))
    }
}
