//! Pretrained Model Adapter
//!
//! Wraps a sequence-classification model and reports its output in the
//! canonical negative/neutral/positive space.
//!
//! Two levels of fallback:
//! - construction ([`PretrainedAnalyzer::load`]) returns an error that the
//!   caller turns into a lexicon analyzer (see [`crate::analyzer::Analyzer::select`])
//! - [`PretrainedAnalyzer::predict`] never fails: any tokenization, inference
//!   or output problem is answered by the lexicon scorer for that call

pub mod distilbert;

pub use distilbert::DistilBertClassifier;

use crate::config::AnalyzerConfig;
use crate::error::{Result, ServiceError};
use crate::sentiment::{Label, LexiconAnalyzer, Probabilities, SentimentResult};
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};

/// A model producing one raw score per native class
#[cfg_attr(test, mockall::automock)]
pub trait SequenceClassifier: Send + Sync {
    /// Raw per-class scores (logits) for one input
    fn logits(&self, text: &str) -> Result<Vec<f32>>;

    /// Native class names keyed by class index, if the model has any
    fn id2label(&self) -> Option<BTreeMap<usize, String>>;
}

/// Native class index → canonical label, fixed at construction
#[derive(Debug, Clone, PartialEq)]
pub struct LabelMap {
    classes: BTreeMap<usize, Label>,
}

impl LabelMap {
    /// Build from the model's class names; no names means a binary
    /// negative/positive model
    pub fn from_id2label(id2label: Option<&BTreeMap<usize, String>>) -> Self {
        match id2label {
            Some(names) if !names.is_empty() => Self {
                classes: names
                    .iter()
                    .map(|(idx, name)| (*idx, Label::from_model_label(name)))
                    .collect(),
            },
            _ => Self::binary(),
        }
    }

    pub fn binary() -> Self {
        Self {
            classes: BTreeMap::from([(0, Label::Negative), (1, Label::Positive)]),
        }
    }

    pub fn get(&self, index: usize) -> Option<Label> {
        self.classes.get(&index).copied()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Winning label and canonical distribution for native probabilities.
    ///
    /// A two-class output fills negative/positive and leaves neutral at 0.0.
    /// Class names decide which side is which when they name both;
    /// otherwise index 0 is negative. Wider outputs sum per canonical label.
    pub fn distribute(&self, probs: &[f64]) -> Result<(Label, Probabilities)> {
        if probs.is_empty() {
            return Err(ServiceError::Inference("model returned no class scores".to_string()));
        }
        if probs.iter().any(|p| !p.is_finite()) {
            return Err(ServiceError::Inference(
                "model returned non-finite class scores".to_string(),
            ));
        }

        let winner = argmax(probs);

        if probs.len() == 2 {
            let (neg_idx, pos_idx) = match (self.get(0), self.get(1)) {
                (Some(Label::Positive), Some(Label::Negative)) => (1, 0),
                _ => (0, 1),
            };
            let probabilities = Probabilities::new(probs[neg_idx], 0.0, probs[pos_idx]);
            let label = if winner == pos_idx {
                Label::Positive
            } else {
                Label::Negative
            };
            return Ok((label, probabilities));
        }

        let mut probabilities = Probabilities::default();
        for (idx, p) in probs.iter().enumerate() {
            probabilities.add(self.get(idx).unwrap_or(Label::Neutral), *p);
        }
        let label = self.get(winner).unwrap_or(Label::Neutral);
        Ok((label, probabilities))
    }
}

/// Numerically stable softmax
pub fn softmax(logits: &[f32]) -> Vec<f64> {
    let max = logits
        .iter()
        .map(|&x| f64::from(x))
        .fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|&x| (f64::from(x) - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Index of the first maximum
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (idx, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = idx;
        }
    }
    best
}

/// Transformer-backed analyzer with a lexicon safety net
pub struct PretrainedAnalyzer {
    model_name: String,
    classifier: Box<dyn SequenceClassifier>,
    labels: LabelMap,
    fallback: LexiconAnalyzer,
}

impl PretrainedAnalyzer {
    /// Download (or reuse the cached) checkpoint and build the analyzer
    pub fn load(config: &AnalyzerConfig) -> Result<Self> {
        let device = candle_core::Device::Cpu;
        let classifier =
            DistilBertClassifier::load(&config.model_name, config.max_sequence_length, &device)?;
        Ok(Self::new(config.model_name.clone(), Box::new(classifier)))
    }

    /// Wrap an already-loaded classifier
    pub fn new(model_name: String, classifier: Box<dyn SequenceClassifier>) -> Self {
        let labels = LabelMap::from_id2label(classifier.id2label().as_ref());
        tracing::debug!(model = %model_name, classes = labels.len(), "Label mapping built");
        Self {
            model_name,
            classifier,
            labels,
            fallback: LexiconAnalyzer::new(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn labels(&self) -> &LabelMap {
        &self.labels
    }

    /// Score `text`; falls back to the lexicon scorer on any model failure
    pub fn predict(&self, text: &str) -> SentimentResult {
        // Candle kernels panic on some shape errors; treat that like any other failure
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.try_predict(text)));
        match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                tracing::warn!(model = %self.model_name, error = %e, "Transformer prediction failed, using lexicon fallback");
                self.fallback.predict(text)
            }
            Err(_) => {
                tracing::warn!(model = %self.model_name, "Transformer prediction panicked, using lexicon fallback");
                self.fallback.predict(text)
            }
        }
    }

    /// Model-only scoring without the fallback
    pub fn try_predict(&self, text: &str) -> Result<SentimentResult> {
        let clean = text.to_lowercase();
        let logits = self.classifier.logits(&clean)?;
        let probs = softmax(&logits);
        let (label, probabilities) = self.labels.distribute(&probs)?;
        Ok(SentimentResult::new(clean, label, probabilities))
    }
}

impl std::fmt::Debug for PretrainedAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PretrainedAnalyzer")
            .field("model_name", &self.model_name)
            .field("labels", &self.labels)
            .finish()
    }
}

#[cfg(test)]
mod tests;
