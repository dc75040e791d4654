// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the subcommands and all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for bad values
//   - type conversion (string → usize, f64, enums)
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::application::{
    check_use_case::{CheckConfig, ClassifierKind},
    train_bow_use_case::BowTrainConfig,
    train_transformer_use_case::TransformerTrainConfig,
};
use crate::data::splitter::DEFAULT_SPLIT_SEED;
use crate::domain::verdict::FusionPolicy;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check one text or file for plagiarism (the default when no command is given)
    Check(CheckArgs),

    /// Train the transformer classifier on the labelled dataset
    TrainTransformer(TrainTransformerArgs),

    /// Train the TF-IDF bag-of-words classifier on the labelled dataset
    TrainBow(TrainBowArgs),

    /// Classify a whole text with the bag-of-words model and print a confidence band
    PredictBow(PredictBowArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClassifierArg {
    Transformer,
    Bow,
}

impl From<ClassifierArg> for ClassifierKind {
    fn from(c: ClassifierArg) -> Self {
        match c {
            ClassifierArg::Transformer => ClassifierKind::Transformer,
            ClassifierArg::Bow         => ClassifierKind::BagOfWords,
        }
    }
}

/// All arguments for the `check` command
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Urdu text or a path to a .txt/.docx/.pdf file; prompted for when omitted
    #[arg(long)]
    pub input: Option<String>,

    /// Reference dataset with Plagiarized/ and Non_plagiarized/ folders
    #[arg(long, default_value = "dataset")]
    pub dataset_dir: PathBuf,

    /// Model artifacts (default: models/transformer or models/bow)
    #[arg(long)]
    pub model_dir: Option<PathBuf>,

    /// Classifier used for the chunk probabilities
    #[arg(long, value_enum, default_value_t = ClassifierArg::Transformer)]
    pub classifier: ClassifierArg,

    /// Tokens per chunk
    #[arg(long, default_value_t = 300)]
    pub max_tokens: usize,

    /// Tokens shared by neighbouring chunks
    #[arg(long, default_value_t = 50)]
    pub stride: usize,

    /// Below this cosine similarity (%) the text is original, whatever the classifier says
    #[arg(long, default_value_t = 30.0)]
    pub similarity_floor: f64,

    /// Average probability (%) above which the text is plagiarised
    #[arg(long, default_value_t = 70.0)]
    pub plagiarized_above: f64,

    /// Average probability (%) below which the text is original
    #[arg(long, default_value_t = 30.0)]
    pub original_below: f64,
}

impl Default for CheckArgs {
    fn default() -> Self {
        let cfg = CheckConfig::default();
        Self {
            input:             None,
            dataset_dir:       cfg.dataset_dir,
            model_dir:         None,
            classifier:        ClassifierArg::Transformer,
            max_tokens:        cfg.max_tokens,
            stride:            cfg.stride,
            similarity_floor:  cfg.policy.similarity_floor,
            plagiarized_above: cfg.policy.plagiarized_above,
            original_below:    cfg.policy.original_below,
        }
    }
}

/// Convert CLI args into the application-layer config.
/// The application layer never sees clap types.
impl From<CheckArgs> for CheckConfig {
    fn from(a: CheckArgs) -> Self {
        CheckConfig {
            dataset_dir: a.dataset_dir,
            model_dir:   a.model_dir,
            classifier:  a.classifier.into(),
            max_tokens:  a.max_tokens,
            stride:      a.stride,
            policy:      FusionPolicy::new(a.similarity_floor, a.plagiarized_above, a.original_below),
        }
    }
}

/// All arguments for the `train-transformer` command
#[derive(Args, Debug)]
pub struct TrainTransformerArgs {
    #[arg(long, default_value = "dataset")]
    pub dataset_dir: PathBuf,

    /// Directory to save checkpoints, tokenizer and metrics
    #[arg(long, default_value = "models/transformer")]
    pub model_dir: PathBuf,

    /// Maximum number of tokens per input sequence, [CLS] and [SEP] included
    #[arg(long, default_value_t = 512)]
    pub max_seq_len: usize,

    #[arg(long, default_value_t = 8)]
    pub batch_size: usize,

    /// Total number of passes through the training data
    #[arg(long, default_value_t = 3)]
    pub epochs: usize,

    #[arg(long, default_value_t = 2e-4)]
    pub lr: f64,

    /// Hidden dimension of the transformer; must be divisible by num_heads
    #[arg(long, default_value_t = 256)]
    pub d_model: usize,

    #[arg(long, default_value_t = 8)]
    pub num_heads: usize,

    #[arg(long, default_value_t = 4)]
    pub num_layers: usize,

    /// Inner dimension of the feed-forward network
    #[arg(long, default_value_t = 1024)]
    pub d_ff: usize,

    #[arg(long, default_value_t = 0.1)]
    pub dropout: f64,

    /// Maximum vocabulary entries when building a new tokenizer
    #[arg(long, default_value_t = 30000)]
    pub vocab_size: usize,

    /// Share of documents used for training; the rest validates
    #[arg(long, default_value_t = 0.8)]
    pub train_fraction: f64,

    #[arg(long, default_value_t = DEFAULT_SPLIT_SEED)]
    pub seed: u64,

    /// Continue from the latest epoch checkpoint in model_dir
    #[arg(long)]
    pub resume: bool,
}

impl From<TrainTransformerArgs> for TransformerTrainConfig {
    fn from(a: TrainTransformerArgs) -> Self {
        TransformerTrainConfig {
            dataset_dir:    a.dataset_dir,
            model_dir:      a.model_dir,
            vocab_size:     a.vocab_size,
            max_seq_len:    a.max_seq_len,
            d_model:        a.d_model,
            num_heads:      a.num_heads,
            num_layers:     a.num_layers,
            d_ff:           a.d_ff,
            dropout:        a.dropout,
            epochs:         a.epochs,
            batch_size:     a.batch_size,
            lr:             a.lr,
            train_fraction: a.train_fraction,
            seed:           a.seed,
            resume:         a.resume,
        }
    }
}

/// All arguments for the `train-bow` command
#[derive(Args, Debug)]
pub struct TrainBowArgs {
    #[arg(long, default_value = "dataset")]
    pub dataset_dir: PathBuf,

    #[arg(long, default_value = "models/bow")]
    pub model_dir: PathBuf,

    /// Keep only this many of the most frequent terms
    #[arg(long, default_value_t = 5000)]
    pub max_features: usize,

    #[arg(long, default_value_t = 30)]
    pub epochs: usize,

    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    #[arg(long, default_value_t = 1e-2)]
    pub lr: f64,

    #[arg(long, default_value_t = 0.8)]
    pub train_fraction: f64,

    #[arg(long, default_value_t = DEFAULT_SPLIT_SEED)]
    pub seed: u64,
}

impl From<TrainBowArgs> for BowTrainConfig {
    fn from(a: TrainBowArgs) -> Self {
        BowTrainConfig {
            dataset_dir:    a.dataset_dir,
            model_dir:      a.model_dir,
            max_features:   a.max_features,
            epochs:         a.epochs,
            batch_size:     a.batch_size,
            lr:             a.lr,
            train_fraction: a.train_fraction,
            seed:           a.seed,
        }
    }
}

/// All arguments for the `predict-bow` command
#[derive(Args, Debug)]
pub struct PredictBowArgs {
    /// Urdu text or a path to a .txt/.docx/.pdf file; prompted for when omitted
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long, default_value = "models/bow")]
    pub model_dir: PathBuf,
}
