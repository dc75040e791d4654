// ============================================================
// Layer 4 — Batchers
// ============================================================
// Implements Burn's Batcher trait to stack individual samples
// into tensors for one forward pass.
//
//   TokenBatcher   : Vec<TokenSample>   → TokenBatch   [N, S] ids + mask
//   FeatureBatcher : Vec<FeatureSample> → FeatureBatch [N, F] floats
//
// Both flatten the per-sample rows into one Vec and reshape:
//   [s1_t1, s1_t2, ..., s1_tS, s2_t1, ..., sN_tS] → [N, S]
// which works because every row is already padded to the same
// length (sequences) or has the vocabulary width (features).
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::{FeatureSample, TokenSample};

// ─── TokenBatch ───────────────────────────────────────────────────────────────
/// A batch of transformer samples.
#[derive(Debug, Clone)]
pub struct TokenBatch<B: Backend> {
    /// Token ID sequences — shape: [batch_size, seq_len]
    pub input_ids: Tensor<B, 2, Int>,

    /// Attention masks — shape: [batch_size, seq_len]
    /// 1 = real token, 0 = padding
    pub attention_mask: Tensor<B, 2, Int>,

    /// Class index per sample — shape: [batch_size]
    pub labels: Tensor<B, 1, Int>,
}

#[derive(Clone, Debug)]
pub struct TokenBatcher<B: Backend> {
    /// The device to create tensors on
    pub device: B::Device,
}

impl<B: Backend> TokenBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<TokenSample, TokenBatch<B>> for TokenBatcher<B> {
    fn batch(&self, items: Vec<TokenSample>) -> TokenBatch<B> {
        let batch_size = items.len();
        // All sequences have the same length (pre-padded)
        let seq_len    = items.first().map(|s| s.input_ids.len()).unwrap_or(0);

        // Burn uses i32 for Int tensor input
        let input_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.input_ids.iter().map(|&x| x as i32))
            .collect();

        let mask_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.attention_mask.iter().map(|&x| x as i32))
            .collect();

        let labels: Vec<i32> = items.iter().map(|s| s.label as i32).collect();

        let input_ids = Tensor::<B, 1, Int>::from_ints(
            input_flat.as_slice(), &self.device
        ).reshape([batch_size, seq_len]);

        let attention_mask = Tensor::<B, 1, Int>::from_ints(
            mask_flat.as_slice(), &self.device
        ).reshape([batch_size, seq_len]);

        let labels = Tensor::<B, 1, Int>::from_ints(labels.as_slice(), &self.device);

        TokenBatch { input_ids, attention_mask, labels }
    }
}

// ─── FeatureBatch ─────────────────────────────────────────────────────────────
/// A batch of dense TF-IDF rows.
#[derive(Debug, Clone)]
pub struct FeatureBatch<B: Backend> {
    /// shape: [batch_size, num_features]
    pub features: Tensor<B, 2>,

    /// shape: [batch_size]
    pub labels: Tensor<B, 1, Int>,
}

#[derive(Clone, Debug)]
pub struct FeatureBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> FeatureBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<FeatureSample, FeatureBatch<B>> for FeatureBatcher<B> {
    fn batch(&self, items: Vec<FeatureSample>) -> FeatureBatch<B> {
        let batch_size   = items.len();
        let num_features = items.first().map(|s| s.features.len()).unwrap_or(0);

        let flat: Vec<f32> = items
            .iter()
            .flat_map(|s| s.features.iter().copied())
            .collect();
        let labels: Vec<i32> = items.iter().map(|s| s.label as i32).collect();

        let features = Tensor::<B, 1>::from_floats(flat.as_slice(), &self.device)
            .reshape([batch_size, num_features]);
        let labels   = Tensor::<B, 1, Int>::from_ints(labels.as_slice(), &self.device);

        FeatureBatch { features, labels }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_token_batch_shapes() {
        let batcher = TokenBatcher::<TestBackend>::new(Default::default());
        let items = vec![
            TokenSample { input_ids: vec![101, 7, 102, 0], attention_mask: vec![1, 1, 1, 0], label: 1 },
            TokenSample { input_ids: vec![101, 8, 9, 102], attention_mask: vec![1, 1, 1, 1], label: 0 },
        ];
        let batch = batcher.batch(items);
        assert_eq!(batch.input_ids.dims(), [2, 4]);
        assert_eq!(batch.attention_mask.dims(), [2, 4]);
        assert_eq!(batch.labels.dims(), [2]);
    }

    #[test]
    fn test_feature_batch_keeps_rows() {
        let batcher = FeatureBatcher::<TestBackend>::new(Default::default());
        let items = vec![
            FeatureSample { features: vec![0.5, 0.0, 0.5], label: 1 },
            FeatureSample { features: vec![0.0, 1.0, 0.0], label: 0 },
        ];
        let batch = batcher.batch(items);
        assert_eq!(batch.features.dims(), [2, 3]);

        let values: Vec<f32> = batch.features.into_data().to_vec::<f32>().unwrap();
        assert_eq!(values, vec![0.5, 0.0, 0.5, 0.0, 1.0, 0.0]);
    }
}
