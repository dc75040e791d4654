// ============================================================
// Layer 5 — Inferencer
// ============================================================
// Loads the trained transformer and scores token windows.
//
//   chunk of subword ids
//        │   [CLS] chunk [SEP] [PAD]...
//        ▼
//   TransformerClassifier::forward → logits [1, 2]
//        │   softmax
//        ▼
//   P(plagiarised) = probs[1]

use anyhow::{Context, Result};
use burn::prelude::*;
use tokenizers::Tokenizer;

use crate::application::train_transformer_use_case::TransformerTrainConfig;
use crate::data::dataset::{SpecialIds, TokenSample};
use crate::domain::{document::Label, error::DetectError, traits::ChunkClassifier};
use crate::infra::{
    checkpoint::CheckpointManager,
    tokenizer_store::{special_id, CLS_TOKEN, PAD_TOKEN, SEP_TOKEN},
};
use crate::ml::model::{TransformerClassifier, TransformerClassifierConfig};

pub struct Inferencer<B: Backend> {
    model:       TransformerClassifier<B>,
    tokenizer:   Tokenizer,
    special:     SpecialIds,
    max_seq_len: usize,
    device:      B::Device,
}

impl<B: Backend> Inferencer<B> {
    pub fn new(
        model:       TransformerClassifier<B>,
        tokenizer:   Tokenizer,
        max_seq_len: usize,
        device:      B::Device,
    ) -> Result<Self> {
        let special = SpecialIds {
            cls: special_id(&tokenizer, CLS_TOKEN)?,
            sep: special_id(&tokenizer, SEP_TOKEN)?,
            pad: special_id(&tokenizer, PAD_TOKEN)?,
        };
        Ok(Self { model, tokenizer, special, max_seq_len, device })
    }

    /// Rebuild the architecture from train_config.json and load the latest epoch.
    pub fn from_checkpoint(
        ckpt_manager: &CheckpointManager,
        tokenizer:    Tokenizer,
        device:       B::Device,
    ) -> Result<Self> {
        let cfg: TransformerTrainConfig = ckpt_manager.load_config()?;
        // dropout is irrelevant at inference
        let model_cfg = TransformerClassifierConfig::new(
            cfg.vocab_size, cfg.max_seq_len, cfg.d_model,
            cfg.num_heads, cfg.num_layers, cfg.d_ff, 0.0,
        );
        let model: TransformerClassifier<B> = model_cfg.init(&device);
        let (model, epoch) = ckpt_manager.load_latest(model, &device)?;
        tracing::info!("Transformer loaded from epoch {} checkpoint", epoch);
        Self::new(model, tokenizer, cfg.max_seq_len, device)
    }

    /// Fail unless a chunk of `max_tokens` plus [CLS] and [SEP] fits the model.
    pub fn ensure_fits(&self, max_tokens: usize) -> Result<(), DetectError> {
        if max_tokens + 2 > self.max_seq_len {
            return Err(DetectError::InvalidConfig(format!(
                "chunks of {max_tokens} tokens plus [CLS]/[SEP] exceed the model's max_seq_len of {}",
                self.max_seq_len
            )));
        }
        Ok(())
    }

    /// Softmax over the two classes for one encoded chunk: [P(original), P(plagiarised)]
    pub fn class_probabilities(&self, chunk: &[u32]) -> Result<[f64; 2]> {
        let sample = TokenSample::encode(chunk, self.special, self.max_seq_len, 0);

        let ids: Vec<i32>  = sample.input_ids.iter().map(|&x| x as i32).collect();
        let mask: Vec<i32> = sample.attention_mask.iter().map(|&x| x as i32).collect();

        let input_ids = Tensor::<B, 1, Int>::from_ints(ids.as_slice(), &self.device)
            .reshape([1, self.max_seq_len]);
        let attention_mask = Tensor::<B, 1, Int>::from_ints(mask.as_slice(), &self.device)
            .reshape([1, self.max_seq_len]);

        let logits = self.model.forward(input_ids, attention_mask);
        let probs: Vec<f32> = burn::tensor::activation::softmax(logits, 1)
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow::anyhow!("Cannot read probabilities: {e:?}"))?;

        let original    = *probs.get(Label::Original.class_index()).context("missing class 0 probability")?;
        let plagiarized = *probs.get(Label::Plagiarized.class_index()).context("missing class 1 probability")?;
        tracing::trace!("chunk of {} ids → p1={:.4}", chunk.len(), plagiarized);
        Ok([original as f64, plagiarized as f64])
    }
}

impl<B: Backend> ChunkClassifier for Inferencer<B> {
    type Token = u32;

    fn tokenize(&self, text: &str) -> Result<Vec<u32>> {
        let enc = self.tokenizer
            .encode(text, false)
            .map_err(|e| anyhow::anyhow!("Tokenisation error: {e}"))?;
        Ok(enc.get_ids().to_vec())
    }

    fn plagiarism_probability(&self, chunk: &[u32]) -> Result<f64> {
        let [_, plagiarized] = self.class_probabilities(chunk)?;
        Ok(plagiarized)
    }
}
