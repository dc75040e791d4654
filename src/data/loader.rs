// ============================================================
// Layer 4 — Document Loaders
// ============================================================
// Two entry points:
//
//   extract_text_from_file — one user-supplied file, dispatched
//                            on extension (.txt / .docx / .pdf)
//   CorpusLoader           — the labelled reference dataset:
//                              <root>/Plagiarized/*.txt
//                              <root>/Non_plagiarized/*.txt
//
// .docx files are ZIP archives of XML parsed with docx-rs:
//   Document → Paragraph → Run → Text
// We walk this tree collecting Text nodes, one string per
// paragraph, and join paragraphs with spaces.
//
// .pdf files go through pdf-extract, which reads the text layer
// only (scanned pages come back empty).

use anyhow::{Context, Result};
use std::{fs, path::{Path, PathBuf}};
use docx_rs::read_docx;

use crate::domain::document::{Document, Label};
use crate::domain::error::DetectError;
use crate::domain::traits::DocumentSource;

/// Extract plain text from a .txt, .docx or .pdf file.
///
/// Line structure is not preserved: every format comes back as
/// space-separated text, ready for the preprocessor.
pub fn extract_text_from_file(path: &Path) -> Result<String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let text = match extension.as_str() {
        "txt"  => read_utf8(path)?.replace(['\r', '\n'], " "),
        "docx" => extract_docx(path)?,
        "pdf"  => extract_pdf(path)?,
        _ => {
            return Err(DetectError::UnsupportedFormat {
                extension: if extension.is_empty() { "<none>".to_string() } else { format!(".{extension}") },
            }
            .into())
        }
    };

    tracing::debug!("Extracted {} chars from '{}'", text.chars().count(), path.display());
    Ok(text.trim().to_string())
}

/// Read a UTF-8 text file, mapping IO and encoding failures to `Unreadable`.
fn read_utf8(path: &Path) -> Result<String, DetectError> {
    fs::read_to_string(path).map_err(|source| DetectError::Unreadable {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a single .docx file and return its paragraph text joined with spaces.
fn extract_docx(path: &Path) -> Result<String> {
    // Read the raw bytes of the .docx file (which is a ZIP)
    let bytes = fs::read(path).map_err(|source| DetectError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let docx = read_docx(&bytes).map_err(|e| DetectError::Extraction {
        path:    path.to_path_buf(),
        message: format!("{e:?}"),
    })?;

    let mut paragraphs: Vec<String> = Vec::new();

    for child in &docx.document.children {
        use docx_rs::DocumentChild;

        // We only care about Paragraph nodes (not tables, images, etc.)
        if let DocumentChild::Paragraph(para) = child {
            let para_text = extract_paragraph_text(para);
            if !para_text.trim().is_empty() {
                paragraphs.push(para_text);
            }
        }
    }

    Ok(paragraphs.join(" "))
}

/// Extract plain text from a single docx-rs Paragraph node.
///
/// Multiple runs in a paragraph are concatenated with no separator
/// because they are parts of the same sentence.
fn extract_paragraph_text(para: &docx_rs::Paragraph) -> String {
    let mut parts = Vec::new();

    for child in &para.children {
        use docx_rs::ParagraphChild;

        if let ParagraphChild::Run(run) = child {
            for rc in &run.children {
                use docx_rs::RunChild;

                if let RunChild::Text(t) = rc {
                    parts.push(t.text.clone());
                }
            }
        }
    }

    parts.join("")
}

fn extract_pdf(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| DetectError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let text = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| DetectError::Extraction {
        path:    path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(text.split_whitespace().collect::<Vec<_>>().join(" "))
}

// ─── CorpusLoader ─────────────────────────────────────────────────────────────
/// Loads the labelled reference dataset. Used both as the similarity
/// corpus and as training data for the classifiers.
pub struct CorpusLoader {
    /// Dataset root containing the two labelled sub-folders
    root: PathBuf,
}

impl CorpusLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Load every .txt file of one labelled folder.
    /// Unreadable files are logged and skipped.
    pub fn load_label(&self, label: Label) -> Result<Vec<Document>> {
        let dir = self.root.join(label.folder_name());
        if !dir.is_dir() {
            tracing::warn!("Dataset folder '{}' does not exist — skipping", dir.display());
            return Ok(Vec::new());
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(&dir)
            .with_context(|| format!("Cannot read directory '{}'", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("txt"))
            .collect();
        // read_dir order is platform dependent; sort for reproducible splits
        paths.sort();

        let mut docs = Vec::with_capacity(paths.len());
        for path in paths {
            match read_utf8(&path) {
                Ok(text) => {
                    let source = path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .unwrap_or("unknown")
                        .to_string();
                    docs.push(Document::labelled(source, text, label));
                }
                Err(e) => tracing::warn!("Skipping '{}': {}", path.display(), e),
            }
        }

        tracing::debug!("Loaded {} {} documents from '{}'", docs.len(), label, dir.display());
        Ok(docs)
    }
}

impl DocumentSource for CorpusLoader {
    /// Plagiarised documents first, then non-plagiarised ones.
    fn load_all(&self) -> Result<Vec<Document>> {
        let mut docs = self.load_label(Label::Plagiarized)?;
        docs.extend(self.load_label(Label::Original)?);

        tracing::info!("Loaded {} documents from '{}'", docs.len(), self.root.display());
        Ok(docs)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn detect_error(err: &anyhow::Error) -> &DetectError {
        err.downcast_ref::<DetectError>().expect("expected a DetectError")
    }

    #[test]
    fn test_txt_newlines_become_spaces() {
        let dir  = tempdir().unwrap();
        let path = dir.path().join("input.txt");
        fs::write(&path, "پہلی سطر\nدوسری سطر\n").unwrap();

        let text = extract_text_from_file(&path).unwrap();
        assert_eq!(text, "پہلی سطر دوسری سطر");
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        let dir  = tempdir().unwrap();
        let path = dir.path().join("INPUT.TXT");
        fs::write(&path, "متن").unwrap();
        assert_eq!(extract_text_from_file(&path).unwrap(), "متن");
    }

    #[test]
    fn test_unsupported_extension() {
        let dir  = tempdir().unwrap();
        let path = dir.path().join("notes.rtf");
        fs::write(&path, "text").unwrap();

        let err = extract_text_from_file(&path).unwrap_err();
        assert!(matches!(
            detect_error(&err),
            DetectError::UnsupportedFormat { extension } if extension == ".rtf"
        ));
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let dir = tempdir().unwrap();
        let err = extract_text_from_file(&dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(detect_error(&err), DetectError::Unreadable { .. }));
    }

    #[test]
    fn test_invalid_utf8_is_unreadable() {
        let dir  = tempdir().unwrap();
        let path = dir.path().join("latin1.txt");
        fs::write(&path, [0xff, 0xfe, 0xfa]).unwrap();

        let err = extract_text_from_file(&path).unwrap_err();
        assert!(matches!(detect_error(&err), DetectError::Unreadable { .. }));
    }

    #[test]
    fn test_corrupt_docx_is_extraction_error() {
        let dir  = tempdir().unwrap();
        let path = dir.path().join("broken.docx");
        fs::write(&path, b"not a zip archive").unwrap();

        let err = extract_text_from_file(&path).unwrap_err();
        assert!(matches!(detect_error(&err), DetectError::Extraction { .. }));
    }

    #[test]
    fn test_corpus_loader_labels_and_filters() {
        let dir = tempdir().unwrap();
        let plag = dir.path().join("Plagiarized");
        let orig = dir.path().join("Non_plagiarized");
        fs::create_dir_all(&plag).unwrap();
        fs::create_dir_all(&orig).unwrap();
        fs::write(plag.join("a.txt"), "نقل شدہ").unwrap();
        fs::write(plag.join("b.md"), "ignored").unwrap();
        fs::write(orig.join("c.txt"), "اصل").unwrap();
        fs::write(orig.join("d.txt"), [0xff, 0xfe]).unwrap(); // skipped

        let docs = CorpusLoader::new(dir.path()).load_all().unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].source, "a.txt");
        assert_eq!(docs[0].label, Some(Label::Plagiarized));
        assert_eq!(docs[1].label, Some(Label::Original));
    }

    #[test]
    fn test_missing_dataset_folders_yield_empty_corpus() {
        let dir  = tempdir().unwrap();
        let docs = CorpusLoader::new(dir.path().join("nowhere")).load_all().unwrap();
        assert!(docs.is_empty());
    }
}
