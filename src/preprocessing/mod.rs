//! Text normalization
//!
//! Linear pipeline used to prepare text for vocabulary-based models:
//! clean → remove stopwords → lemmatize. The live prediction path does not
//! depend on it; the lexicon scorer and the model adapter only lowercase.
//!
//! Language resources (stopword list, noun exceptions, noun list) are bundled with
//! the crate and provisioned once per process on first use. A resource that
//! fails to parse is reported as [`ServiceError::Resource`] instead of
//! silently skipping that step.

pub mod lemmatizer;

pub use lemmatizer::Lemmatizer;

use crate::error::{Result, ServiceError};
use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;
use std::collections::HashSet;

const ENGLISH_STOPWORDS: &str = include_str!("data/english_stopwords.txt");

static NON_LETTERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z\s]").expect("valid non-letter pattern"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

static NORMALIZER: OnceCell<TextNormalizer> = OnceCell::new();

/// Normalize text with the process-wide normalizer
pub fn normalize(raw: &str) -> Result<String> {
    Ok(TextNormalizer::shared()?.normalize(raw))
}

/// Lowercase, drop everything but letters and whitespace, collapse spaces
pub fn clean_text(text: &str) -> String {
    let lower = text.to_lowercase();
    let letters = NON_LETTERS.replace_all(&lower, "");
    WHITESPACE.replace_all(&letters, " ").trim().to_string()
}

/// Stopword removal plus lemmatization over cleaned text
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    stopwords: HashSet<String>,
    lemmatizer: Lemmatizer,
}

impl TextNormalizer {
    /// Load the bundled English resources
    pub fn new() -> Result<Self> {
        let stopwords = parse_stopwords(ENGLISH_STOPWORDS)?;
        let lemmatizer = Lemmatizer::new()?;
        tracing::debug!(
            stopwords = stopwords.len(),
            exceptions = lemmatizer.exception_count(),
            nouns = lemmatizer.noun_count(),
            "Text normalization resources loaded"
        );
        Ok(Self {
            stopwords,
            lemmatizer,
        })
    }

    /// The process-wide instance, provisioned on first call
    pub fn shared() -> Result<&'static TextNormalizer> {
        NORMALIZER.get_or_try_init(TextNormalizer::new)
    }

    /// Full pipeline
    pub fn normalize(&self, raw: &str) -> String {
        let cleaned = clean_text(raw);
        let filtered = self.remove_stopwords(&cleaned);
        self.lemmatize_text(&filtered)
    }

    /// Drop stopword tokens
    pub fn remove_stopwords(&self, text: &str) -> String {
        text.split_whitespace()
            .filter(|word| !self.stopwords.contains(*word))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Reduce every token to its base form
    pub fn lemmatize_text(&self, text: &str) -> String {
        text.split_whitespace()
            .map(|word| self.lemmatizer.lemmatize(word))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn parse_stopwords(list: &str) -> Result<HashSet<String>> {
    let words: HashSet<String> = list
        .lines()
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect();

    if words.is_empty() {
        return Err(ServiceError::Resource("stopword list is empty".to_string()));
    }
    Ok(words)
}
