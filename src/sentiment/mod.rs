//! Sentiment result types and the lexicon scorer
//!
//! Every analyzer reports into the same canonical label set:
//! - `negative`, `neutral`, `positive`, always in that order
//! - a probability for each of the three labels
//! - a score equal to the probability of the winning label

pub mod lexicon;

#[cfg(test)]
mod tests;

pub use lexicon::LexiconAnalyzer;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical sentiment label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Negative,
    Neutral,
    Positive,
}

impl Label {
    /// The fixed, ordered label set
    pub const ALL: [Label; 3] = [Label::Negative, Label::Neutral, Label::Positive];

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Negative => "negative",
            Label::Neutral => "neutral",
            Label::Positive => "positive",
        }
    }

    /// Map a model's native label name onto the canonical set.
    ///
    /// "positive" is checked before "negative", anything else is neutral.
    pub fn from_model_label(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.contains("positive") {
            Label::Positive
        } else if lower.contains("negative") {
            Label::Negative
        } else {
            Label::Neutral
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Probability for each canonical label
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Probabilities {
    pub negative: f64,
    pub neutral: f64,
    pub positive: f64,
}

impl Probabilities {
    pub const fn new(negative: f64, neutral: f64, positive: f64) -> Self {
        Self {
            negative,
            neutral,
            positive,
        }
    }

    pub fn get(&self, label: Label) -> f64 {
        match label {
            Label::Negative => self.negative,
            Label::Neutral => self.neutral,
            Label::Positive => self.positive,
        }
    }

    /// Add probability mass to a label
    pub fn add(&mut self, label: Label, mass: f64) {
        match label {
            Label::Negative => self.negative += mass,
            Label::Neutral => self.neutral += mass,
            Label::Positive => self.positive += mass,
        }
    }

    pub fn sum(&self) -> f64 {
        self.negative + self.neutral + self.positive
    }
}

/// Outcome of scoring one piece of text
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentResult {
    /// The form of the text that was actually scored
    pub text: String,
    pub label: Label,
    /// Probability of `label`
    pub score: f64,
    pub probabilities: Probabilities,
}

impl SentimentResult {
    /// Build a result whose score is read from the distribution
    pub fn new(text: String, label: Label, probabilities: Probabilities) -> Self {
        Self {
            text,
            score: probabilities.get(label),
            label,
            probabilities,
        }
    }

    /// Serialize with the given field naming
    pub fn to_json(&self, naming: FieldNaming) -> serde_json::Result<serde_json::Value> {
        match naming {
            FieldNaming::LabelScore => serde_json::to_value(LabelScoreBody {
                text: &self.text,
                label: self.label,
                score: self.score,
                probabilities: &self.probabilities,
            }),
            FieldNaming::SentimentConfidence => serde_json::to_value(SentimentConfidenceBody {
                text: &self.text,
                sentiment: self.label,
                confidence: self.score,
                probabilities: &self.probabilities,
            }),
        }
    }
}

/// Response field naming for a serialized result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldNaming {
    /// `text`, `label`, `score`, `probabilities`
    LabelScore,
    /// `text`, `sentiment`, `confidence`, `probabilities`
    SentimentConfidence,
}

// ============ Wire bodies ============

#[derive(Serialize)]
struct LabelScoreBody<'a> {
    text: &'a str,
    label: Label,
    score: f64,
    probabilities: &'a Probabilities,
}

#[derive(Serialize)]
struct SentimentConfidenceBody<'a> {
    text: &'a str,
    sentiment: Label,
    confidence: f64,
    probabilities: &'a Probabilities,
}
