//! Configuration management
//!
//! Layering, lowest to highest precedence:
//! 1. built-in defaults
//! 2. optional TOML file
//! 3. `SENTIMENT_*` environment variables
//! 4. the legacy `PORT` / `USE_ENHANCED_MODEL` variables

use crate::error::{Result, ServiceError};
use crate::sentiment::FieldNaming;
use serde::Deserialize;
use std::collections::HashMap;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_MODEL: &str = "distilbert-base-uncased-finetuned-sst-2-english";
pub const DEFAULT_MAX_SEQUENCE_LENGTH: usize = 512;
pub const DEFAULT_CONFIG_PATH: &str = "sentiment.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Use the pretrained transformer model (falls back to lexicon on load failure)
    pub use_enhanced_model: bool,
    /// Hugging Face checkpoint for the enhanced analyzer
    pub model_name: String,
    /// Tokenizer truncation length
    pub max_sequence_length: usize,
    /// Build the analyzer at startup instead of on the first request
    pub preload: bool,
    /// Field naming for `/analyze` responses
    pub response_shape: ResponseShape,
}

/// Which `/analyze` field naming to emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResponseShape {
    /// `sentiment`/`confidence` for the lexicon analyzer, `label`/`score` for the model
    #[default]
    Auto,
    /// Always `label`/`score`
    Label,
    /// Always `sentiment`/`confidence`
    Sentiment,
}

impl ResponseShape {
    /// Resolve against the naming native to the active analyzer
    pub fn resolve(&self, native: FieldNaming) -> FieldNaming {
        match self {
            ResponseShape::Auto => native,
            ResponseShape::Label => FieldNaming::LabelScore,
            ResponseShape::Sentiment => FieldNaming::SentimentConfidence,
        }
    }
}

/// Analyzer selection, fixed for the process lifetime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerConfig {
    pub use_enhanced_model: bool,
    pub model_name: String,
    pub max_sequence_length: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            use_enhanced_model: true,
            model_name: DEFAULT_MODEL.to_string(),
            max_sequence_length: DEFAULT_MAX_SEQUENCE_LENGTH,
        }
    }
}

impl AnalyzerConfig {
    /// Lexicon-only configuration
    pub fn basic() -> Self {
        Self {
            use_enhanced_model: false,
            ..Self::default()
        }
    }
}

impl Settings {
    /// Load configuration from an optional file plus the process environment
    pub fn load(path: Option<&str>) -> Result<Self> {
        Self::load_with(path, std::env::vars().collect())
    }

    /// Load configuration against an explicit environment snapshot
    pub fn load_with(path: Option<&str>, env: HashMap<String, String>) -> Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("host", DEFAULT_HOST)?
            .set_default("port", i64::from(DEFAULT_PORT))?
            .set_default("use_enhanced_model", true)?
            .set_default("model_name", DEFAULT_MODEL)?
            .set_default("max_sequence_length", DEFAULT_MAX_SEQUENCE_LENGTH as i64)?
            .set_default("preload", false)?
            .set_default("response_shape", "auto")?;

        if let Some(path) = path {
            let expanded = shellexpand::tilde(path);
            builder = builder
                .add_source(config::File::with_name(expanded.as_ref()).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("SENTIMENT")
                .try_parsing(true)
                .source(Some(env.clone().into_iter().collect())),
        );

        let port = env.get("PORT").map(|v| parse_port(v)).transpose()?;
        let enhanced = env.get("USE_ENHANCED_MODEL").map(|v| parse_enhanced_flag(v));

        let settings: Settings = builder
            .set_override_option("port", port.map(i64::from))?
            .set_override_option("use_enhanced_model", enhanced)?
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.max_sequence_length == 0 {
            return Err(ServiceError::Config(
                "max_sequence_length must be greater than zero".to_string(),
            ));
        }
        if self.use_enhanced_model && self.model_name.trim().is_empty() {
            return Err(ServiceError::Config(
                "model_name is required when the enhanced model is enabled".to_string(),
            ));
        }
        Ok(())
    }

    pub fn analyzer_config(&self) -> AnalyzerConfig {
        AnalyzerConfig {
            use_enhanced_model: self.use_enhanced_model,
            model_name: self.model_name.clone(),
            max_sequence_length: self.max_sequence_length,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            use_enhanced_model: true,
            model_name: DEFAULT_MODEL.to_string(),
            max_sequence_length: DEFAULT_MAX_SEQUENCE_LENGTH,
            preload: false,
            response_shape: ResponseShape::Auto,
        }
    }
}

/// `USE_ENHANCED_MODEL` is on only when it reads "true" (any case)
pub fn parse_enhanced_flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}

fn parse_port(value: &str) -> Result<u16> {
    value
        .trim()
        .parse::<u16>()
        .map_err(|e| {
            ServiceError::Config(format!(
                "PORT must be a valid port number, got '{}': {}",
                value, e
            ))
        })
}
