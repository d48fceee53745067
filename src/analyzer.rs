//! Analyzer selection
//!
//! The service runs exactly one analyzer variant for its lifetime. Asking for
//! the enhanced model and failing to load it yields the lexicon variant, so
//! selection never fails.

use crate::config::AnalyzerConfig;
use crate::error::Result;
use crate::model::PretrainedAnalyzer;
use crate::sentiment::{FieldNaming, LexiconAnalyzer, SentimentResult};

#[derive(Debug)]
pub enum Analyzer {
    Lexicon(LexiconAnalyzer),
    Pretrained(PretrainedAnalyzer),
}

impl Analyzer {
    /// Pick the analyzer for `config`, loading the pretrained model if asked
    pub fn select(config: &AnalyzerConfig) -> Self {
        Self::select_with(config, PretrainedAnalyzer::load)
    }

    /// Same as [`Analyzer::select`] with a custom model loader
    pub fn select_with<F>(config: &AnalyzerConfig, load: F) -> Self
    where
        F: FnOnce(&AnalyzerConfig) -> Result<PretrainedAnalyzer>,
    {
        if !config.use_enhanced_model {
            tracing::info!("Using lexicon sentiment analyzer");
            return Analyzer::Lexicon(LexiconAnalyzer::new());
        }

        match load(config) {
            Ok(model) => {
                tracing::info!(model = %model.model_name(), "Using pretrained sentiment analyzer");
                Analyzer::Pretrained(model)
            }
            Err(e) => {
                tracing::error!(model = %config.model_name, error = %e, "Error loading pretrained model");
                tracing::info!("Falling back to lexicon sentiment analyzer");
                Analyzer::Lexicon(LexiconAnalyzer::new())
            }
        }
    }

    pub fn predict(&self, text: &str) -> SentimentResult {
        match self {
            Analyzer::Lexicon(lexicon) => lexicon.predict(text),
            Analyzer::Pretrained(model) => model.predict(text),
        }
    }

    /// Response field naming that belongs to this variant
    pub fn native_naming(&self) -> FieldNaming {
        match self {
            Analyzer::Lexicon(_) => FieldNaming::SentimentConfidence,
            Analyzer::Pretrained(_) => FieldNaming::LabelScore,
        }
    }

    pub fn is_pretrained(&self) -> bool {
        matches!(self, Analyzer::Pretrained(_))
    }

    /// `transformer-based` or `rule-based`
    pub fn model_type(&self) -> &'static str {
        match self {
            Analyzer::Lexicon(_) => "rule-based",
            Analyzer::Pretrained(_) => "transformer-based",
        }
    }
}
