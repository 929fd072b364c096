//! Heading classification (analysis pass 2).
//!
//! Each span is scored independently against the document-wide
//! [`FontStatistics`] and a fixed set of textual patterns. The acceptance bar
//! is deliberately low: recall matters more than precision here.

use std::sync::OnceLock;

use regex::Regex;

use crate::model::TextSpan;

use super::config::HeadingConfig;
use super::normalize::normalize;
use super::stats::FontStatistics;
use super::HeadingStrategy;

/// Structural patterns that mark a line as a heading.
const HEADING_PATTERNS: &[&str] = &[
    // Numbered sections: "1.", "1.1", "2.3.4 Scope"
    r"^(?:\d+\.?\s*)+",
    // ALL CAPS line
    r"^[A-Z][A-Z\s]{2,}$",
    r"^(?:Chapter|Section|Part|Appendix)\s+\d+",
    // Roman numerals: "IV. Results"
    r"^[IVX]+\.\s+",
    // Single word followed by a colon
    r"^\w+\s*:$",
];

/// Score-based heading classifier.
#[derive(Debug, Clone)]
pub struct ScoringClassifier {
    config: HeadingConfig,
    patterns: Vec<Regex>,
    digit: Regex,
}

impl ScoringClassifier {
    /// Create a classifier with default thresholds.
    pub fn new() -> Self {
        Self::with_config(HeadingConfig::default())
    }

    /// Create a classifier with custom thresholds.
    pub fn with_config(config: HeadingConfig) -> Self {
        let patterns = HEADING_PATTERNS
            .iter()
            .map(|p| Regex::new(p).expect("heading pattern"))
            .collect();
        let digit = Regex::new(r"\d").expect("digit pattern");
        Self {
            config,
            patterns,
            digit,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &HeadingConfig {
        &self.config
    }

    /// Whether the text matches any structural heading pattern.
    pub fn has_heading_pattern(&self, text: &str) -> bool {
        let text = text.trim();
        self.patterns.iter().any(|re| re.is_match(text))
    }

    /// Score a span.
    ///
    /// Returns `None` when the span is rejected outright (too short, too many
    /// words, or mostly digits), otherwise the sum of the satisfied signal
    /// weights.
    pub fn score(&self, span: &TextSpan, stats: &FontStatistics) -> Option<u32> {
        let cfg = &self.config;
        let text = normalize(&span.text);

        let char_count = text.chars().count();
        if char_count < cfg.min_chars {
            return None;
        }

        let words: Vec<&str> = text.split_whitespace().collect();
        if words.len() > cfg.max_words {
            return None;
        }

        if self.digit_ratio(&text) > cfg.max_digit_ratio {
            return None;
        }

        let avg = stats.avg_font_size;
        let mut score = 0;

        if span.size >= avg * cfg.large_ratio {
            score += cfg.large_weight;
        }
        if span.size >= avg * cfg.significant_ratio {
            score += cfg.significant_weight;
        }
        if span.bold {
            score += cfg.bold_weight;
        }
        if self.has_heading_pattern(&text) {
            score += cfg.pattern_weight;
        }
        if is_title_case(&words, cfg.title_case_ratio) {
            score += cfg.title_case_weight;
        }
        if words.len() <= cfg.brevity_words {
            score += cfg.brevity_weight;
        }

        Some(score)
    }

    /// Share of characters that are decimal digits.
    ///
    /// Only `\d` counts; numeric letters such as `Ⅳ` do not.
    pub fn digit_ratio(&self, text: &str) -> f32 {
        let total = text.chars().count();
        if total == 0 {
            return 0.0;
        }
        let digits = self.digit.find_iter(text).count();
        digits as f32 / total as f32
    }

    /// Whether a span is accepted as a heading candidate.
    pub fn is_heading(&self, span: &TextSpan, stats: &FontStatistics) -> bool {
        self.score(span, stats)
            .is_some_and(|score| score >= self.config.min_score)
    }
}

impl Default for ScoringClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadingStrategy for ScoringClassifier {
    fn score(&self, span: &TextSpan, stats: &FontStatistics) -> Option<u32> {
        ScoringClassifier::score(self, span, stats)
    }

    fn accepts(&self, score: u32) -> bool {
        score >= self.config.min_score
    }
}

/// Multi-word text where most words start with an uppercase letter.
fn is_title_case(words: &[&str], ratio: f32) -> bool {
    if words.len() < 2 {
        return false;
    }
    let capitalized = words
        .iter()
        .filter(|w| w.chars().next().is_some_and(char::is_uppercase))
        .count();
    capitalized as f32 / words.len() as f32 >= ratio
}

fn shared() -> &'static ScoringClassifier {
    static CLASSIFIER: OnceLock<ScoringClassifier> = OnceLock::new();
    CLASSIFIER.get_or_init(ScoringClassifier::new)
}

/// Classify a span with the default thresholds.
pub fn is_heading(span: &TextSpan, stats: &FontStatistics) -> bool {
    shared().is_heading(span, stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(avg: f32) -> FontStatistics {
        FontStatistics {
            avg_font_size: avg,
            ..FontStatistics::default()
        }
    }

    fn span(text: &str, size: f32) -> TextSpan {
        TextSpan::new(text, 1, 72.0, 50.0, size, "Helvetica")
    }

    #[test]
    fn test_introduction_scores_eight() {
        let classifier = ScoringClassifier::new();
        let s = span("INTRODUCTION", 24.0);
        assert_eq!(classifier.score(&s, &stats(12.0)), Some(8));
        assert!(classifier.is_heading(&s, &stats(12.0)));
    }

    #[test]
    fn test_short_text_rejected() {
        let big_bold = span("Hi", 40.0).with_bold(true);
        assert!(!is_heading(&big_bold, &stats(12.0)));
        assert!(!is_heading(&span("  ", 40.0), &stats(12.0)));
        assert!(!is_heading(&span("•A•", 40.0), &stats(12.0)));
    }

    #[test]
    fn test_long_prose_rejected() {
        let text = "this sentence has far more than twenty words in it so it reads like a \
                    paragraph of body text and not like any heading at all";
        assert!(text.split_whitespace().count() > 20);
        let s = span(text, 30.0).with_bold(true);
        assert_eq!(ScoringClassifier::new().score(&s, &stats(12.0)), None);
    }

    #[test]
    fn test_digit_ratio_rejected() {
        let s = span("2023 2024 2025 2026", 30.0).with_bold(true);
        let ratio = ScoringClassifier::new().digit_ratio("2023 2024 2025 2026");
        assert!((ratio - 16.0 / 19.0).abs() < 1e-6);
        assert!(!is_heading(&s, &stats(12.0)));
    }

    #[test]
    fn test_digit_ratio_counts_decimal_digits_only() {
        let classifier = ScoringClassifier::new();
        // Roman numeral letters are numeric but not decimal digits
        assert_eq!(classifier.digit_ratio("ⅣⅤⅥ"), 0.0);
        assert_eq!(classifier.digit_ratio("½¾"), 0.0);
        // Other scripts' decimal digits still count
        assert_eq!(classifier.digit_ratio("١٢٣"), 1.0);
        assert_eq!(classifier.digit_ratio(""), 0.0);
    }

    #[test]
    fn test_body_text_rejected() {
        let s = span("the results were consistent with prior work", 12.0);
        assert_eq!(ScoringClassifier::new().score(&s, &stats(12.0)), Some(1));
        assert!(!is_heading(&s, &stats(12.0)));
    }

    #[test]
    fn test_black_weight_not_bold() {
        let s = TextSpan::new("overview of the results", 1, 72.0, 50.0, 11.0, "Arial-Black");
        assert!(!s.bold);
        // brevity only
        assert_eq!(ScoringClassifier::new().score(&s, &stats(11.0)), Some(1));
        assert!(!is_heading(&s, &stats(11.0)));
    }

    #[test]
    fn test_bold_short_line_accepted() {
        // bold +2, brevity +1
        let s = span("background and motivation", 12.0).with_bold(true);
        assert_eq!(ScoringClassifier::new().score(&s, &stats(12.0)), Some(3));
        assert!(is_heading(&s, &stats(12.0)));
    }

    #[test]
    fn test_size_thresholds() {
        let classifier = ScoringClassifier::new();
        // large but not significantly larger
        assert_eq!(classifier.score(&span("lower case words", 13.5), &stats(12.0)), Some(3));
        assert_eq!(classifier.score(&span("lower case words", 16.0), &stats(12.0)), Some(5));
        assert_eq!(classifier.score(&span("lower case words", 12.5), &stats(12.0)), Some(1));
    }

    #[test]
    fn test_patterns() {
        let classifier = ScoringClassifier::new();
        assert!(classifier.has_heading_pattern("1. Introduction"));
        assert!(classifier.has_heading_pattern("2.3 Scope of Work"));
        assert!(classifier.has_heading_pattern("TABLE OF CONTENTS"));
        assert!(classifier.has_heading_pattern("Chapter 4 Results"));
        assert!(classifier.has_heading_pattern("Appendix 2"));
        assert!(classifier.has_heading_pattern("IV. Discussion"));
        assert!(classifier.has_heading_pattern("Summary:"));
        assert!(!classifier.has_heading_pattern("Summary of findings"));
        assert!(!classifier.has_heading_pattern("AB"));
        assert!(!classifier.has_heading_pattern("Chapter Four"));
    }

    #[test]
    fn test_title_case() {
        assert!(is_title_case(&["Scope", "of", "Work", "Plan"], 0.7));
        assert!(!is_title_case(&["Scope", "of", "the", "work"], 0.7));
        assert!(!is_title_case(&["Scope"], 0.7));
    }

    #[test]
    fn test_custom_min_score() {
        let classifier = ScoringClassifier::with_config(HeadingConfig::new().with_min_score(9));
        assert!(!classifier.is_heading(&span("INTRODUCTION", 24.0), &stats(12.0)));
    }
}
