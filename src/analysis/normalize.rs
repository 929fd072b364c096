//! Span text normalization.
//!
//! Every piece of text is cleaned here before any statistic or score looks
//! at it.

use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Cleans raw text runs pulled out of a PDF.
#[derive(Debug, Clone)]
pub struct Normalizer {
    whitespace: Regex,
    artifacts: Regex,
}

impl Normalizer {
    /// Create a normalizer.
    pub fn new() -> Self {
        Self {
            whitespace: Regex::new(r"\s+").expect("whitespace pattern"),
            // Word characters, whitespace and common punctuation survive.
            artifacts: Regex::new(r#"[^\w\s\-.,:;!?()\[\]/"'&]"#).expect("artifact pattern"),
        }
    }

    /// Normalize a raw text run.
    ///
    /// Composes to NFC, collapses whitespace runs to a single space, strips
    /// characters outside the allow-list and trims. Returns an empty string
    /// when nothing survives.
    pub fn normalize(&self, raw: &str) -> String {
        if raw.trim().is_empty() {
            return String::new();
        }

        let composed: String = raw.nfc().collect();
        let collapsed = self.collapse(&composed);
        let stripped = self.artifacts.replace_all(&collapsed, "");
        self.collapse(&stripped)
    }

    fn collapse(&self, text: &str) -> String {
        self.whitespace.replace_all(text.trim(), " ").into_owned()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

fn shared() -> &'static Normalizer {
    static NORMALIZER: OnceLock<Normalizer> = OnceLock::new();
    NORMALIZER.get_or_init(Normalizer::new)
}

/// Normalize text with the shared [`Normalizer`].
pub fn normalize(raw: &str) -> String {
    shared().normalize(raw)
}

/// Whether cleaned text is long enough to take part in any analysis.
pub fn is_qualifying(cleaned: &str) -> bool {
    cleaned.chars().count() >= 3
}
