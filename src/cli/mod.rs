// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application);
// this layer prompts, routes and prints.
//
// Commands:
//   (none) / check      — similarity + chunked classifier + verdict
//   train-transformer   — train the transformer classifier
//   train-bow           — train the TF-IDF classifier
//   predict-bow         — whole-text TF-IDF prediction
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};

use commands::{CheckArgs, Commands, PredictBowArgs, TrainBowArgs, TrainTransformerArgs};
use crate::application::check_use_case::{CheckInput, CheckReport};

#[derive(Parser, Debug)]
#[command(
    name = "urdu-plag",
    version,
    about = "Detect plagiarism in Urdu text by combining corpus similarity with a chunked classifier."
)]
pub struct Cli {
    /// Subcommand to run; without one, `check` runs interactively with defaults
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            None                                 => run_check(CheckArgs::default()),
            Some(Commands::Check(args))            => run_check(args),
            Some(Commands::TrainTransformer(args)) => run_train_transformer(args),
            Some(Commands::TrainBow(args))         => run_train_bow(args),
            Some(Commands::PredictBow(args))       => run_predict_bow(args),
        }
    }
}

/// Use `--input` when given, otherwise ask on stdin.
fn read_input(input: Option<String>) -> Result<CheckInput> {
    let line = match input {
        Some(line) => line,
        None => {
            print!("📥 Enter Urdu text or a file path (.txt/.docx/.pdf): ");
            io::stdout().flush()?;
            let mut line = String::new();
            io::stdin()
                .lock()
                .read_line(&mut line)
                .context("Cannot read from stdin")?;
            line
        }
    };
    Ok(CheckInput::from_line(&line))
}

fn run_check(args: CheckArgs) -> Result<()> {
    use crate::application::check_use_case::CheckUseCase;

    let input = read_input(args.input.clone())?;
    println!("🔄 Starting checks...");
    let report = CheckUseCase::new(args.into()).execute(&input)?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &CheckReport) {
    println!("\n========== Extracted Text ==========\n{}\n", report.extracted);
    println!("({} words after normalisation and stop-word removal)\n", report.cleaned.split_whitespace().count());

    println!("========== Cosine Similarity ==========");
    println!("Max cosine similarity vs dataset: {:.2}%", report.similarity);

    println!("\n========== Chunk-wise {} Probabilities ==========", report.classifier);
    for (i, p) in report.chunks.per_chunk.iter().enumerate() {
        println!("Chunk {:02}: {:.2}% plagiarized", i + 1, p);
    }
    println!("Average {} plagiarism probability: {:.2}%", report.classifier, report.chunks.average);

    println!("\n========== Final Decision ==========");
    println!("🔍 Final Verdict: {}", report.decision);
}

fn run_train_transformer(args: TrainTransformerArgs) -> Result<()> {
    use crate::application::train_transformer_use_case::TrainTransformerUseCase;

    tracing::info!("Starting transformer training on dataset: {}", args.dataset_dir.display());
    let model_dir = args.model_dir.clone();
    TrainTransformerUseCase::new(args.into()).execute()?;

    println!("Training complete. Checkpoints saved to '{}'.", model_dir.display());
    Ok(())
}

fn run_train_bow(args: TrainBowArgs) -> Result<()> {
    use crate::application::train_bow_use_case::TrainBowUseCase;

    tracing::info!("Starting bag-of-words training on dataset: {}", args.dataset_dir.display());
    let model_dir = args.model_dir.clone();
    let report = TrainBowUseCase::new(args.into()).execute()?;

    println!("📊 Evaluation:\n{report}");
    println!("✅ Model and vectorizer saved to '{}'.", model_dir.display());
    Ok(())
}

fn run_predict_bow(args: PredictBowArgs) -> Result<()> {
    use crate::application::predict_bow_use_case::PredictBowUseCase;

    let use_case   = PredictBowUseCase::new(args.model_dir)?;
    let input      = read_input(args.input)?;
    let prediction = use_case.predict(&input)?;

    println!("\n📊 Prediction Result:");
    let marker = match prediction.label {
        crate::domain::document::Label::Plagiarized => "⚠️",
        crate::domain::document::Label::Original    => "✅",
    };
    println!("{marker} {} ({:.2}% confidence)", prediction.band, prediction.confidence * 100.0);
    Ok(())
}
