use anyhow::Result;
use std::path::Path;

use crate::data::{loader::CorpusLoader, preprocessor::Preprocessor};
use crate::domain::{document::Document, error::DetectError, traits::DocumentSource};

/// Load both labelled dataset folders with every text already cleaned.
///
/// Documents that are empty after cleaning are dropped; a corpus with no
/// documents left is an `EmptyCorpus` error.
pub fn load_clean_corpus(root: &Path) -> Result<Vec<Document>> {
    let prep = Preprocessor::new();
    let docs: Vec<Document> = CorpusLoader::new(root)
        .load_all()?
        .into_iter()
        .map(|mut doc| {
            doc.text = prep.clean(&doc.text);
            doc
        })
        .filter(|doc| {
            let keep = !doc.text.is_empty();
            if !keep {
                tracing::warn!("Skipping '{}': no text after cleaning", doc.source);
            }
            keep
        })
        .collect();

    if docs.is_empty() {
        return Err(DetectError::EmptyCorpus { root: root.to_path_buf() }.into());
    }
    Ok(docs)
}
