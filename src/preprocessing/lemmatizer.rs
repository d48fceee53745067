//! Noun lemmatizer
//!
//! WordNet "morphy"-style reduction for nouns:
//! - an exception table for irregular plurals
//! - suffix detachment rules that generate candidate base forms
//! - a noun list that decides which candidates are real words
//!
//! The shortest candidate found in the noun list wins. A word with no known
//! candidate is returned unchanged, so verb forms such as "running" and
//! adverbs such as "always" pass through.

use crate::error::{Result, ServiceError};
use std::collections::{HashMap, HashSet};

const NOUN_EXCEPTIONS: &str = include_str!("data/noun_exceptions.txt");
const ENGLISH_NOUNS: &str = include_str!("data/english_nouns.txt");

/// Noun detachment rules, in WordNet order
const DETACHMENT_RULES: [(&str, &str); 8] = [
    ("s", ""),
    ("ses", "s"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
];

#[derive(Debug, Clone)]
pub struct Lemmatizer {
    exceptions: HashMap<String, String>,
    nouns: HashSet<String>,
}

impl Lemmatizer {
    /// Build from the bundled exception table and noun list
    pub fn new() -> Result<Self> {
        Self::from_resources(NOUN_EXCEPTIONS, ENGLISH_NOUNS)
    }

    /// Build from an exception table of `inflected base` lines and a noun
    /// list with one word per line.
    ///
    /// Blank lines and `#` comments are skipped; any other malformed line
    /// makes the resource unusable.
    pub fn from_resources(exception_table: &str, noun_list: &str) -> Result<Self> {
        Ok(Self {
            exceptions: parse_exceptions(exception_table)?,
            nouns: parse_nouns(noun_list)?,
        })
    }

    /// Reduce a lowercase word to its base form
    pub fn lemmatize(&self, word: &str) -> String {
        if let Some(base) = self.exceptions.get(word) {
            return base.clone();
        }

        let detached = DETACHMENT_RULES.iter().filter_map(|(suffix, replacement)| {
            word.strip_suffix(suffix)
                .map(|stem| format!("{stem}{replacement}"))
        });

        std::iter::once(word.to_string())
            .chain(detached)
            .filter(|candidate| self.nouns.contains(candidate))
            .min_by_key(|candidate| candidate.len())
            .unwrap_or_else(|| word.to_string())
    }

    pub fn exception_count(&self) -> usize {
        self.exceptions.len()
    }

    pub fn noun_count(&self) -> usize {
        self.nouns.len()
    }
}

fn resource_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

fn parse_exceptions(table: &str) -> Result<HashMap<String, String>> {
    let mut exceptions = HashMap::new();
    for (lineno, line) in resource_lines(table) {
        let mut parts = line.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(inflected), Some(base), None) => {
                exceptions.insert(inflected.to_string(), base.to_string());
            }
            _ => {
                return Err(ServiceError::Resource(format!(
                    "noun exception table line {}: expected 'inflected base', got '{}'",
                    lineno, line
                )))
            }
        }
    }

    if exceptions.is_empty() {
        return Err(ServiceError::Resource(
            "noun exception table is empty".to_string(),
        ));
    }
    Ok(exceptions)
}

fn parse_nouns(list: &str) -> Result<HashSet<String>> {
    let mut nouns = HashSet::new();
    for (lineno, line) in resource_lines(list) {
        if !line.chars().all(|c| c.is_ascii_lowercase()) {
            return Err(ServiceError::Resource(format!(
                "noun list line {}: expected one lowercase word, got '{}'",
                lineno, line
            )));
        }
        nouns.insert(line.to_string());
    }

    if nouns.is_empty() {
        return Err(ServiceError::Resource("noun list is empty".to_string()));
    }
    Ok(nouns)
}
