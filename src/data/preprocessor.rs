// ============================================================
// Layer 4 — Urdu Text Preprocessor
// ============================================================
// Normalises raw Urdu text before vectorisation and tokenisation.
//
// Urdu text copied from the web or Word mixes Arabic and Urdu
// code points for what a reader sees as the same letter
// (ي / ی, ك / ک, ه / ہ), carries optional diacritics, and is full
// of invisible formatting characters. Without normalisation two
// copies of the same paragraph produce different term vectors.
//
// Cleaning steps (applied in order):
//   1. Map Arabic letter and digit forms to their Urdu forms
//   2. Fold letter + combining mark pairs into precomposed letters
//   3. Drop diacritics and tatweel
//   4. Put spaces around Urdu punctuation
//   5. Replace control / zero-width / no-break characters with spaces
//   6. Collapse all whitespace runs into single spaces and trim
//   7. Drop stop words
//
// Reference: Unicode Arabic block U+0600–U+06FF

use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Common Urdu function words. Stored unnormalised; the set below runs
/// every entry through the same character normalisation as the input.
const STOP_WORDS: &[&str] = &[
    "آ", "آئی", "آئے", "آپ", "آگے", "اب", "ابھی", "اپنا", "اپنی", "اپنے",
    "اس", "اسی", "اسے", "اگر", "ان", "انہوں", "انہیں", "انھوں", "اور", "اوپر",
    "ایسا", "ایسی", "ایسے", "ایک", "بار", "بعد", "بغیر", "بہت", "بھی", "پاس",
    "پر", "پھر", "پہلے", "تا", "تاکہ", "تب", "تجھ", "تک", "تم", "تو",
    "تھا", "تھی", "تھیں", "تھے", "جا", "جاتا", "جاتی", "جاتے", "جائے", "جب",
    "جبکہ", "جس", "جن", "جنہوں", "جو", "جیسا", "جیسے", "چاہیے", "چکا", "چکی",
    "چکے", "چونکہ", "حالانکہ", "دوران", "دی", "دیا", "دیں", "دیے", "رہا", "رہی",
    "رہیں", "رہے", "سا", "ساتھ", "سب", "سکتا", "سکتی", "سکتے", "سی", "سے",
    "شاید", "صرف", "طرح", "عین", "غیر", "کا", "کب", "کبھی", "کچھ", "کر",
    "کرتا", "کرتی", "کرتے", "کرنا", "کرنے", "کریں", "کس", "کسی", "کم", "کو",
    "کوئی", "کون", "کہ", "کہا", "کہاں", "کی", "کیا", "کیسے", "کیوں", "کیے",
    "کے", "گا", "گئی", "گئے", "گی", "گیا", "گے", "لئے", "لیکن", "لیے",
    "مگر", "میرا", "میری", "میرے", "میں", "نا", "نہ", "نہیں", "نے", "والا",
    "والی", "والے", "وغیرہ", "وہ", "وہاں", "وہی", "ہر", "ہم", "ہمیں", "ہو",
    "ہوا", "ہوتا", "ہوتی", "ہوتے", "ہوئی", "ہوئے", "ہوں", "ہی", "ہیں", "ہے",
    "یا", "یہ", "یہاں", "یہی",
];

static STOP_WORD_SET: Lazy<HashSet<String>> = Lazy::new(|| {
    STOP_WORDS
        .iter()
        .map(|w| normalize_letters(w))
        .collect()
});

pub struct Preprocessor;

impl Preprocessor {
    /// Create a new Preprocessor instance
    pub fn new() -> Self {
        Self
    }

    /// Full cleaning pipeline: normalisation followed by stop-word removal.
    /// The result is a single line of space-separated terms.
    pub fn clean(&self, text: &str) -> String {
        let normalized = self.normalize(text);
        self.remove_stop_words(&normalized)
    }

    /// Steps 1–6: character-level normalisation and whitespace cleanup.
    pub fn normalize(&self, text: &str) -> String {
        let letters = normalize_letters(text);

        // ── Steps 4–5: punctuation spacing and invisible characters ──────────
        let mut spaced = String::with_capacity(letters.len());
        for c in letters.chars() {
            match c {
                '۔' | '،' | '؟' | '؛' => {
                    spaced.push(' ');
                    spaced.push(c);
                    spaced.push(' ');
                }
                '\u{00A0}' | '\u{200B}' | '\u{FEFF}' => spaced.push(' '),
                c if c.is_control() => spaced.push(' '),
                c => spaced.push(c),
            }
        }

        // ── Step 6: collapse whitespace ──────────────────────────────────────
        spaced.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Step 7: drop every whitespace-separated token found in the stop-word list.
    pub fn remove_stop_words(&self, text: &str) -> String {
        text.split_whitespace()
            .filter(|t| !self.is_stop_word(t))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        STOP_WORD_SET.contains(token)
    }
}

/// Implement Default so Preprocessor can be created with Preprocessor::default()
impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Steps 1–3. Shared by the stop-word table so both sides agree on code points.
fn normalize_letters(text: &str) -> String {
    // ── Step 1: Arabic → Urdu letter and digit forms ─────────────────────────
    let mapped = text.chars().map(|c| match c {
        '\u{064A}' | '\u{0649}' => '\u{06CC}', // ي ى → ی
        '\u{0643}' => '\u{06A9}',              // ك → ک
        '\u{0647}' | '\u{06D5}' => '\u{06C1}', // ه ە → ہ
        '\u{0629}' => '\u{06C3}',              // ة → ۃ
        '\u{0671}' => '\u{0627}',              // ٱ → ا
        '\u{0660}'..='\u{0669}' => {
            // Arabic-Indic digits → Extended Arabic-Indic (Urdu) digits
            char::from_u32(c as u32 - 0x0660 + 0x06F0).unwrap_or(c)
        }
        c => c,
    });

    // ── Step 2: fold base letter + combining mark into one code point ────────
    let mut folded: Vec<char> = Vec::with_capacity(text.len());
    for c in mapped {
        let combined = match (folded.last().copied(), c) {
            (Some('\u{0627}'), '\u{0653}') => Some('\u{0622}'), // ا + ٓ → آ
            (Some('\u{0627}'), '\u{0654}') => Some('\u{0623}'), // ا + ٔ → أ
            (Some('\u{0648}'), '\u{0654}') => Some('\u{0624}'), // و + ٔ → ؤ
            (Some('\u{06CC}'), '\u{0654}') => Some('\u{0626}'), // ی + ٔ → ئ
            (Some('\u{06C1}'), '\u{0654}') => Some('\u{06C2}'), // ہ + ٔ → ۂ
            (Some('\u{06D2}'), '\u{0654}') => Some('\u{06D3}'), // ے + ٔ → ۓ
            _ => None,
        };
        match combined {
            Some(letter) => {
                folded.pop();
                folded.push(letter);
            }
            None => folded.push(c),
        }
    }

    // ── Step 3: diacritics (zabar, zer, pesh, tanween, shadd, …) and tatweel ─
    folded
        .into_iter()
        .filter(|c| !matches!(*c, '\u{064B}'..='\u{065F}' | '\u{0670}' | '\u{0640}'))
        .collect()
}
