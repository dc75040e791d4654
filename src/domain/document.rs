// ============================================================
// Layer 3 — Document Domain Type
// ============================================================
// A single text loaded from disk or typed at the prompt.
// During training the document carries the label of the
// dataset folder it came from; at inference time it has none.

use serde::{Deserialize, Serialize};

/// Binary class of a training document.
///
/// The discriminants are the class indices the classifiers are
/// trained on: softmax output 1 is the plagiarism probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    Original = 0,
    Plagiarized = 1,
}

impl Label {
    /// Dataset sub-folder holding documents of this class
    pub fn folder_name(self) -> &'static str {
        match self {
            Label::Original => "Non_plagiarized",
            Label::Plagiarized => "Plagiarized",
        }
    }

    pub fn class_index(self) -> usize {
        self as usize
    }

    pub fn all() -> [Label; 2] {
        [Label::Original, Label::Plagiarized]
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::Original => write!(f, "original"),
            Label::Plagiarized => write!(f, "plagiarized"),
        }
    }
}

/// A raw document. By the time a Document is created the text
/// has already been extracted from its file format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// The filename — kept for traceability in logs
    pub source: String,

    /// Extracted text before normalisation
    pub text: String,

    /// Present only for documents read from a labelled dataset folder
    pub label: Option<Label>,
}

impl Document {
    /// An unlabelled document, e.g. user input to be checked.
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text:   text.into(),
            label:  None,
        }
    }

    pub fn labelled(source: impl Into<String>, text: impl Into<String>, label: Label) -> Self {
        Self {
            label: Some(label),
            ..Self::new(source, text)
        }
    }
}
