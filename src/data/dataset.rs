use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

/// Ids of the special tokens framing every transformer sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialIds {
    pub cls: u32,
    pub sep: u32,
    pub pad: u32,
}

/// One tokenised and padded transformer sample.
/// Sequence format: [CLS] tokens [SEP] [PAD]...
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSample {
    pub input_ids:      Vec<u32>,
    pub attention_mask: Vec<u32>,
    pub label:          usize,
}

impl TokenSample {
    /// Build `[CLS] tokens [SEP]`, truncated to `max_seq_len` and padded up to it.
    /// Truncation keeps the closing [SEP].
    pub fn encode(tokens: &[u32], special: SpecialIds, max_seq_len: usize, label: usize) -> Self {
        let body_len = tokens.len().min(max_seq_len.saturating_sub(2));

        let mut input_ids = Vec::with_capacity(max_seq_len);
        input_ids.push(special.cls);
        input_ids.extend_from_slice(&tokens[..body_len]);
        input_ids.push(special.sep);
        input_ids.truncate(max_seq_len);

        // Attention mask: 1 for real tokens, 0 for padding
        let mut attention_mask = vec![1u32; input_ids.len()];
        input_ids.resize(max_seq_len, special.pad);
        attention_mask.resize(max_seq_len, 0);

        Self { input_ids, attention_mask, label }
    }

    /// Number of real (unpadded) tokens
    pub fn real_len(&self) -> usize {
        self.attention_mask.iter().filter(|&&m| m == 1).count()
    }
}

/// One dense TF-IDF row for the bag-of-words model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSample {
    pub features: Vec<f32>,
    pub label:    usize,
}

/// In-memory dataset over any sample type.
pub struct SampleDataset<T> {
    samples: Vec<T>,
}

impl<T> SampleDataset<T> {
    pub fn new(samples: Vec<T>) -> Self { Self { samples } }

    pub fn sample_count(&self) -> usize { self.samples.len() }
}

impl<T: Clone + Send + Sync> Dataset<T> for SampleDataset<T> {
    fn get(&self, index: usize) -> Option<T> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
