//! Text tower (CLIP ViT-B/32) for topic label embeddings

use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use tokenizers::Tokenizer;

use crate::config::{CONTEXT_LENGTH, PAD_TOKEN};
use crate::core::Embedding;
use crate::error::{Error, Result};

const OUTPUT_NAMES: &[&str] = &["text_embeds", "pooler_output"];

pub struct TextModel {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    pad_id: i64,
    wants_mask: bool,
}

impl TextModel {
    pub fn load(model_path: &Path, tokenizer_path: &Path) -> Result<Self> {
        let session = crate::runtime::create_session(model_path)?;

        let tokenizer = Tokenizer::from_file(tokenizer_path).map_err(|e| Error::ModelLoad {
            path: tokenizer_path.to_path_buf(),
            message: format!("Failed to load tokenizer: {}", e),
        })?;

        let pad_id = tokenizer.token_to_id(PAD_TOKEN).ok_or_else(|| Error::ModelLoad {
            path: tokenizer_path.to_path_buf(),
            message: format!("Tokenizer has no {} token", PAD_TOKEN),
        })? as i64;

        let wants_mask = session.inputs().iter().any(|i| i.name() == "attention_mask");

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            pad_id,
            wants_mask,
        })
    }

    pub fn encode_batch(&self, labels: &[&str]) -> Result<Vec<Embedding>> {
        if labels.is_empty() {
            return Ok(Vec::new());
        }

        let tokens = labels
            .iter()
            .map(|label| tokenize(&self.tokenizer, label, self.pad_id))
            .collect::<Result<Vec<_>>>()?;

        let (ids, mask, width) = pad_batch(&tokens, self.pad_id);
        let shape = vec![labels.len(), width];

        let ids = ort::value::Value::from_array((shape.clone(), ids))
            .map_err(|e| Error::Inference(format!("Failed to create input_ids: {}", e)))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| Error::Inference(format!("Session lock poisoned: {}", e)))?;

        let outputs = if self.wants_mask {
            let mask = ort::value::Value::from_array((shape, mask))
                .map_err(|e| Error::Inference(format!("Failed to create attention_mask: {}", e)))?;
            session.run(ort::inputs!["input_ids" => ids, "attention_mask" => mask])
        } else {
            session.run(ort::inputs!["input_ids" => ids])
        }
        .map_err(|e| Error::Inference(format!("Text inference failed: {}", e)))?;

        super::tensor::extract_embeddings(&outputs, OUTPUT_NAMES, labels.len())
    }
}

/// Token ids for one label, cut to the context length.
///
/// A label made only of special tokens is rejected. Truncated sequences keep
/// the end-of-text token in the last slot, where pooling expects it.
fn tokenize(tokenizer: &Tokenizer, label: &str, pad_id: i64) -> Result<Vec<i64>> {
    let encoding = tokenizer
        .encode(label, true)
        .map_err(|e| Error::model_input(label, format!("tokenization failed: {}", e)))?;

    if !encoding.get_special_tokens_mask().iter().any(|&m| m == 0) {
        return Err(Error::model_input(label, "label has no token representation"));
    }

    let mut ids: Vec<i64> = encoding.get_ids().iter().map(|&x| x as i64).collect();
    if ids.len() > CONTEXT_LENGTH {
        ids.truncate(CONTEXT_LENGTH);
        ids[CONTEXT_LENGTH - 1] = pad_id;
    }
    Ok(ids)
}

/// Right-pad every sequence to the longest one.
///
/// The pad token doubles as end-of-text, and pooling picks the first
/// occurrence of it, so padding never shifts the pooled position.
fn pad_batch(tokens: &[Vec<i64>], pad_id: i64) -> (Vec<i64>, Vec<i64>, usize) {
    let width = tokens.iter().map(|t| t.len()).max().unwrap_or(0);
    let mut ids = Vec::with_capacity(tokens.len() * width);
    let mut mask = Vec::with_capacity(tokens.len() * width);

    for t in tokens {
        ids.extend_from_slice(t);
        ids.extend(std::iter::repeat(pad_id).take(width - t.len()));
        mask.extend(std::iter::repeat(1).take(t.len()));
        mask.extend(std::iter::repeat(0).take(width - t.len()));
    }

    (ids, mask, width)
}
