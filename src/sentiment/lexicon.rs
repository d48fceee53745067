//! Lexicon Sentiment Scorer
//!
//! Keyword-count heuristic with fixed probability triples. This is the
//! "basic" analyzer and the fallback for the pretrained model adapter.

use super::{Label, Probabilities, SentimentResult};
use std::collections::HashSet;

const POSITIVE_WORDS: [&str; 12] = [
    "good",
    "great",
    "excellent",
    "amazing",
    "love",
    "awesome",
    "fantastic",
    "wonderful",
    "best",
    "happy",
    "like",
    "enjoy",
];

const NEGATIVE_WORDS: [&str; 11] = [
    "bad",
    "terrible",
    "awful",
    "hate",
    "worst",
    "poor",
    "horrible",
    "disappointing",
    "useless",
    "dislike",
    "wrong",
];

/// Substrings that force a strong positive verdict
const POSITIVE_OVERRIDES: [&str; 2] = ["amazing", "love"];
/// Substrings that force a strong negative verdict (checked after positives)
const NEGATIVE_OVERRIDES: [&str; 2] = ["hate", "terrible"];

const NO_SIGNAL: Probabilities = Probabilities::new(0.2, 0.6, 0.2);
const LEAN_POSITIVE: Probabilities = Probabilities::new(0.1, 0.3, 0.6);
const LEAN_NEGATIVE: Probabilities = Probabilities::new(0.6, 0.3, 0.1);
const BALANCED: Probabilities = Probabilities::new(0.3, 0.4, 0.3);
const STRONG_POSITIVE: Probabilities = Probabilities::new(0.05, 0.15, 0.8);
const STRONG_NEGATIVE: Probabilities = Probabilities::new(0.8, 0.15, 0.05);

/// Sentiment analyzer using lexicon-based approach
#[derive(Debug, Clone)]
pub struct LexiconAnalyzer {
    positive_words: Vec<&'static str>,
    negative_words: Vec<&'static str>,
    positive_overrides: Vec<&'static str>,
    negative_overrides: Vec<&'static str>,
}

impl LexiconAnalyzer {
    /// Create a new analyzer with the built-in lexicons
    pub fn new() -> Self {
        Self {
            positive_words: POSITIVE_WORDS.to_vec(),
            negative_words: NEGATIVE_WORDS.to_vec(),
            positive_overrides: POSITIVE_OVERRIDES.to_vec(),
            negative_overrides: NEGATIVE_OVERRIDES.to_vec(),
        }
    }

    /// Score `text`.
    ///
    /// Only lowercasing is applied before matching; tokens keep their
    /// punctuation, so "good!" is not a hit while the override substrings
    /// still match inside it.
    pub fn predict(&self, text: &str) -> SentimentResult {
        let lower = text.to_lowercase();
        let tokens: HashSet<&str> = lower.split_whitespace().collect();

        let positive_count = count_hits(&self.positive_words, &tokens);
        let negative_count = count_hits(&self.negative_words, &tokens);

        let (mut label, mut probabilities) = vote(positive_count, negative_count);

        if self.positive_overrides.iter().any(|w| lower.contains(w)) {
            label = Label::Positive;
            probabilities = STRONG_POSITIVE;
        } else if self.negative_overrides.iter().any(|w| lower.contains(w)) {
            label = Label::Negative;
            probabilities = STRONG_NEGATIVE;
        }

        SentimentResult::new(lower, label, probabilities)
    }
}

impl Default for LexiconAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Number of lexicon words present among the tokens (each word counts once)
fn count_hits(words: &[&'static str], tokens: &HashSet<&str>) -> usize {
    words.iter().filter(|w| tokens.contains(*w)).count()
}

/// Label and distribution from the raw keyword counts
fn vote(positive_count: usize, negative_count: usize) -> (Label, Probabilities) {
    let total = positive_count + negative_count;
    if total == 0 {
        return (Label::Neutral, NO_SIGNAL);
    }

    let pos_ratio = positive_count as f64 / total as f64;
    let neg_ratio = negative_count as f64 / total as f64;

    if pos_ratio > neg_ratio {
        (Label::Positive, LEAN_POSITIVE)
    } else if neg_ratio > pos_ratio {
        (Label::Negative, LEAN_NEGATIVE)
    } else {
        (Label::Neutral, BALANCED)
    }
}
