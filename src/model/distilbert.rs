//! DistilBERT sequence classifier on candle
//!
//! Fetches a Hugging Face checkpoint (config, tokenizer, weights) through
//! the hub cache and runs encoder + classification head on the CLS token.

use super::SequenceClassifier;
use crate::error::{Result, ServiceError};
use candle_core::{DType, Device, IndexOp, Tensor};
use candle_nn::{linear, Linear, Module, VarBuilder};
use candle_transformers::models::distilbert::{Config as DistilBertConfig, DistilBertModel};
use hf_hub::{api::sync::Api, Repo, RepoType};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tokenizers::{Tokenizer, TruncationParams};

/// Head-related fields of `config.json` the encoder config does not expose
#[derive(Debug, Deserialize)]
struct ClassifierConfigJson {
    dim: usize,
    #[serde(default)]
    id2label: HashMap<String, String>,
}

pub struct DistilBertClassifier {
    model: DistilBertModel,
    pre_classifier: Linear,
    classifier: Linear,
    tokenizer: Tokenizer,
    id2label: BTreeMap<usize, String>,
    device: Device,
}

impl DistilBertClassifier {
    /// Load `repo_id` from the hub, truncating inputs to `max_len` tokens
    pub fn load(repo_id: &str, max_len: usize, device: &Device) -> Result<Self> {
        tracing::info!(model = %repo_id, "Loading pretrained sentiment model");

        let api = Api::new()?;
        let repo = api.repo(Repo::new(repo_id.to_string(), RepoType::Model));

        let config_path = repo.get("config.json")?;
        let tokenizer_path = repo.get("tokenizer.json")?;
        let (weights_path, safetensors) = match repo.get("model.safetensors") {
            Ok(path) => (path, true),
            Err(_) => (repo.get("pytorch_model.bin")?, false),
        };

        let raw_config = std::fs::read_to_string(&config_path)?;
        let config: DistilBertConfig = serde_json::from_str(&raw_config)?;
        let head: ClassifierConfigJson = serde_json::from_str(&raw_config)?;
        let id2label = parse_id2label(&head.id2label)?;
        let num_labels = id2label.len().max(2);

        let vb = weights(&weights_path, safetensors, device)?;
        let model = DistilBertModel::load(vb.pp("distilbert"), &config)
            .map_err(|e| ServiceError::ModelLoad(format!("encoder weights: {}", e)))?;
        let pre_classifier = linear(head.dim, head.dim, vb.pp("pre_classifier"))
            .map_err(|e| ServiceError::ModelLoad(format!("pre_classifier weights: {}", e)))?;
        let classifier = linear(head.dim, num_labels, vb.pp("classifier"))
            .map_err(|e| ServiceError::ModelLoad(format!("classifier weights: {}", e)))?;

        let tokenizer = load_tokenizer(&tokenizer_path, max_len)?;

        tracing::info!(
            model = %repo_id,
            labels = num_labels,
            max_len,
            "Pretrained sentiment model ready"
        );

        Ok(Self {
            model,
            pre_classifier,
            classifier,
            tokenizer,
            id2label,
            device: device.clone(),
        })
    }
}

impl SequenceClassifier for DistilBertClassifier {
    fn logits(&self, text: &str) -> Result<Vec<f32>> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| ServiceError::Tokenization(e.to_string()))?;
        let ids = encoding.get_ids();
        if ids.is_empty() {
            return Err(ServiceError::Tokenization(
                "tokenizer produced no tokens".to_string(),
            ));
        }

        let input_ids = Tensor::new(ids, &self.device)?.unsqueeze(0)?;
        // Single unpadded sequence: nothing is masked out
        let mask = Tensor::zeros((ids.len(), ids.len()), DType::U8, &self.device)?;

        let hidden = self.model.forward(&input_ids, &mask)?;
        let cls = hidden.i((.., 0))?;
        let pooled = self.pre_classifier.forward(&cls)?.relu()?;
        let logits = self.classifier.forward(&pooled)?;

        Ok(logits.squeeze(0)?.to_vec1::<f32>()?)
    }

    fn id2label(&self) -> Option<BTreeMap<usize, String>> {
        if self.id2label.is_empty() {
            None
        } else {
            Some(self.id2label.clone())
        }
    }
}

fn weights(path: &Path, safetensors: bool, device: &Device) -> Result<VarBuilder<'static>> {
    let vb = if safetensors {
        // SAFETY: the file is a hub-cache artifact that is not modified while mapped
        unsafe { VarBuilder::from_mmaped_safetensors(&[path], DType::F32, device) }
    } else {
        VarBuilder::from_pth(path, DType::F32, device)
    };
    vb.map_err(|e| ServiceError::ModelLoad(format!("{}: {}", path.display(), e)))
}

fn load_tokenizer(path: &Path, max_len: usize) -> Result<Tokenizer> {
    let mut tokenizer =
        Tokenizer::from_file(path).map_err(|e| ServiceError::ModelLoad(e.to_string()))?;
    tokenizer.with_padding(None);
    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length: max_len,
            ..Default::default()
        }))
        .map_err(|e| ServiceError::ModelLoad(e.to_string()))?;
    Ok(tokenizer)
}

/// `{"0": "NEGATIVE", "1": "POSITIVE"}` → index-keyed map
fn parse_id2label(raw: &HashMap<String, String>) -> Result<BTreeMap<usize, String>> {
    raw.iter()
        .map(|(idx, name)| {
            idx.parse::<usize>()
                .map(|i| (i, name.clone()))
                .map_err(|_| ServiceError::ModelLoad(format!("invalid id2label key '{}'", idx)))
        })
        .collect()
}
