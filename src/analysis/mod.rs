//! Heading inference engine.
//!
//! The analysis runs in strictly ordered stages over an immutable span list:
//!
//! 1. [`normalize`] cleans every span and drops those too short to matter.
//! 2. [`stats::collect`] builds document-wide [`FontStatistics`] (pass 1).
//! 3. A [`HeadingStrategy`] scores each span against those statistics (pass 2).
//! 4. [`levels`] ranks the accepted candidates' sizes into H1..H6.
//! 5. [`assemble`] orders the headings and builds the [`DocumentResult`].
//!
//! A [`TitleStrategy`] resolves the title on its own, from metadata and
//! page-1 geometry only.
//!
//! # Example
//!
//! ```
//! use pdf_outline::analysis::OutlineAnalyzer;
//! use pdf_outline::model::{HeadingLevel, SpanDocument, TextSpan};
//!
//! let doc = SpanDocument::new(vec![
//!     TextSpan::new("INTRODUCTION", 1, 72.0, 50.0, 24.0, "Helvetica"),
//!     TextSpan::new("body text that explains the topic", 1, 72.0, 90.0, 12.0, "Helvetica"),
//!     TextSpan::new("more body text on the first page", 1, 72.0, 104.0, 12.0, "Helvetica"),
//! ]);
//!
//! let result = OutlineAnalyzer::new().analyze(&doc);
//! assert_eq!(result.outline[0].text, "INTRODUCTION");
//! assert_eq!(result.outline[0].level, HeadingLevel::H1);
//! ```

pub mod assemble;
pub mod classify;
pub mod config;
pub mod levels;
pub mod normalize;
pub mod stats;
pub mod title;

pub use assemble::assemble;
pub use classify::{is_heading, ScoringClassifier};
pub use config::{AnalyzerConfig, HeadingConfig, TitleConfig};
pub use levels::{resolve_levels, resolve_levels_with, MAX_LEVELS};
pub use normalize::{is_qualifying, normalize, Normalizer};
pub use stats::{collect, FontStatistics, FontStatisticsCollector};
pub use title::{resolve_title, MetadataThenGeometry};

use crate::model::{DocumentResult, HeadingCandidate, SpanDocument, TextSpan};

/// Decides which spans are heading candidates.
pub trait HeadingStrategy: Send + Sync {
    /// Score a span, or `None` if it is rejected outright.
    fn score(&self, span: &TextSpan, stats: &FontStatistics) -> Option<u32>;

    /// Whether a score is high enough to accept the span.
    fn accepts(&self, score: u32) -> bool;

    /// Score a span and wrap it as a candidate if accepted.
    fn classify(&self, span: &TextSpan, stats: &FontStatistics) -> Option<HeadingCandidate> {
        let score = self.score(span, stats)?;
        self.accepts(score)
            .then(|| HeadingCandidate::new(span.clone(), score))
    }
}

/// Decides the title of a document.
pub trait TitleStrategy: Send + Sync {
    /// Resolve the title. Always returns a title, falling back to a
    /// placeholder when nothing qualifies.
    fn resolve(&self, document: &SpanDocument) -> String;
}

/// Runs the full analysis for one document at a time.
///
/// Holds no per-document state, so one analyzer can be shared across
/// threads processing different documents.
pub struct OutlineAnalyzer {
    headings: Box<dyn HeadingStrategy>,
    title: Box<dyn TitleStrategy>,
    max_levels: usize,
}

impl OutlineAnalyzer {
    /// Create an analyzer with the default strategies.
    pub fn new() -> Self {
        Self::with_config(AnalyzerConfig::default())
    }

    /// Create an analyzer with the default strategies configured by `config`.
    pub fn with_config(config: AnalyzerConfig) -> Self {
        Self {
            headings: Box::new(ScoringClassifier::with_config(config.heading)),
            title: Box::new(MetadataThenGeometry::with_config(config.title)),
            max_levels: config.max_levels.clamp(1, MAX_LEVELS),
        }
    }

    /// Replace the heading strategy.
    pub fn with_heading_strategy(mut self, strategy: impl HeadingStrategy + 'static) -> Self {
        self.headings = Box::new(strategy);
        self
    }

    /// Replace the title strategy.
    pub fn with_title_strategy(mut self, strategy: impl TitleStrategy + 'static) -> Self {
        self.title = Box::new(strategy);
        self
    }

    /// Normalize span text and drop spans too short to analyze.
    pub fn normalize_spans(spans: &[TextSpan]) -> Vec<TextSpan> {
        spans
            .iter()
            .filter_map(|span| {
                let text = normalize(&span.text);
                is_qualifying(&text).then(|| TextSpan {
                    text,
                    ..span.clone()
                })
            })
            .collect()
    }

    /// Heading candidates of a document with their levels assigned.
    pub fn headings(&self, document: &SpanDocument) -> Vec<HeadingCandidate> {
        let spans = Self::normalize_spans(&document.spans);
        let stats = collect(&spans);

        let candidates: Vec<HeadingCandidate> = spans
            .iter()
            .filter_map(|span| self.headings.classify(span, &stats))
            .collect();

        log::debug!(
            "{} of {} spans accepted as headings (avg size {:.1})",
            candidates.len(),
            spans.len(),
            stats.avg_font_size
        );

        resolve_levels_with(candidates, self.max_levels)
    }

    /// Resolve the title of a document.
    pub fn title(&self, document: &SpanDocument) -> String {
        self.title.resolve(document)
    }

    /// Infer the title and outline of a document.
    pub fn analyze(&self, document: &SpanDocument) -> DocumentResult {
        let leveled = self.headings(document);
        let title = self.title(document);
        assemble(title, leveled)
    }
}

impl Default for OutlineAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for OutlineAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutlineAnalyzer")
            .field("max_levels", &self.max_levels)
            .finish_non_exhaustive()
    }
}

/// Infer the title and outline of a document with the default analyzer.
pub fn analyze(document: &SpanDocument) -> DocumentResult {
    OutlineAnalyzer::new().analyze(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DocumentMetadata, HeadingLevel};

    fn span(text: &str, page: u32, y: f32, size: f32, font: &str) -> TextSpan {
        TextSpan::new(text, page, 72.0, y, size, font)
    }

    struct NeverHeading;

    impl HeadingStrategy for NeverHeading {
        fn score(&self, _span: &TextSpan, _stats: &FontStatistics) -> Option<u32> {
            None
        }

        fn accepts(&self, _score: u32) -> bool {
            false
        }
    }

    struct FixedTitle(&'static str);

    impl TitleStrategy for FixedTitle {
        fn resolve(&self, _document: &SpanDocument) -> String {
            self.0.to_string()
        }
    }

    #[test]
    fn test_empty_document() {
        let result = analyze(&SpanDocument::default());
        assert_eq!(result.title, "Untitled Document");
        assert!(result.outline.is_empty());
    }

    #[test]
    fn test_normalize_spans_drops_short() {
        let spans = vec![
            span("  a  ", 1, 0.0, 12.0, "Arial"),
            span("• Scope   of work", 1, 0.0, 12.0, "Arial"),
        ];
        let cleaned = OutlineAnalyzer::normalize_spans(&spans);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].text, "Scope of work");
    }

    #[test]
    fn test_analyze_small_document() {
        let body = "this paragraph is ordinary body text set in the regular font";
        let doc = SpanDocument::new(vec![
            span("Project Kickoff Report", 1, 40.0, 26.0, "Helvetica-Bold"),
            span("1. Background", 1, 100.0, 16.0, "Helvetica-Bold"),
            span(body, 1, 130.0, 11.0, "Helvetica"),
            span(body, 1, 145.0, 11.0, "Helvetica"),
            span(body, 2, 60.0, 11.0, "Helvetica"),
            span("1.1 Prior Work", 2, 30.0, 13.0, "Helvetica-Bold"),
            span(body, 2, 80.0, 11.0, "Helvetica"),
        ]);

        let result = analyze(&doc);
        assert_eq!(result.title, "Project Kickoff Report");

        let outline: Vec<(HeadingLevel, &str, u32)> = result
            .outline
            .iter()
            .map(|e| (e.level, e.text.as_str(), e.page))
            .collect();
        assert_eq!(
            outline,
            vec![
                (HeadingLevel::H1, "Project Kickoff Report", 1),
                (HeadingLevel::H2, "1. Background", 1),
                (HeadingLevel::H3, "1.1 Prior Work", 2),
            ]
        );
    }

    #[test]
    fn test_swapped_strategies() {
        let doc = SpanDocument::new(vec![span("INTRODUCTION", 1, 50.0, 24.0, "Arial")])
            .with_metadata(DocumentMetadata::with_title("Ignored Metadata"));
        let analyzer = OutlineAnalyzer::new()
            .with_heading_strategy(NeverHeading)
            .with_title_strategy(FixedTitle("Fixed"));

        let result = analyzer.analyze(&doc);
        assert_eq!(result.title, "Fixed");
        assert!(result.outline.is_empty());
    }

    #[test]
    fn test_analyzer_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<OutlineAnalyzer>();
    }
}
