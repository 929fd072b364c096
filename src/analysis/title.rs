//! Document title resolution.
//!
//! Runs independently of heading classification: it trusts document metadata
//! first and otherwise looks only at the geometry of page 1. Document-wide
//! font statistics are never consulted.

use crate::model::{DocumentMetadata, SpanDocument, TextSpan, TitleCandidate};

use super::config::TitleConfig;
use super::normalize::normalize;
use super::TitleStrategy;

/// Metadata title first, largest page-1 text second.
#[derive(Debug, Clone, Default)]
pub struct MetadataThenGeometry {
    config: TitleConfig,
}

impl MetadataThenGeometry {
    /// Create a resolver with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resolver with custom thresholds.
    pub fn with_config(config: TitleConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &TitleConfig {
        &self.config
    }

    /// Normalized metadata title, if long enough to be trusted.
    pub fn metadata_title(&self, metadata: &DocumentMetadata) -> Option<String> {
        let title = normalize(metadata.title.as_deref()?);
        (title.chars().count() >= self.config.min_metadata_chars).then_some(title)
    }

    /// Title candidates built from page-1 spans.
    ///
    /// Keeps spans whose cleaned text has enough words and characters, sorted
    /// by descending size, then top to bottom.
    pub fn candidates<'a, I>(&self, spans: I) -> Vec<TitleCandidate>
    where
        I: IntoIterator<Item = &'a TextSpan>,
    {
        let mut candidates: Vec<TitleCandidate> = spans
            .into_iter()
            .filter(|span| span.page == 1)
            .filter_map(|span| {
                let text = normalize(&span.text);
                let long_enough = text.split_whitespace().count() >= self.config.min_words
                    && text.chars().count() >= self.config.min_chars;
                long_enough.then(|| TitleCandidate {
                    text,
                    size: span.size,
                    y: span.y,
                    bold: span.bold,
                })
            })
            .collect();

        candidates.sort_by(|a, b| b.size.total_cmp(&a.size).then(a.y.total_cmp(&b.y)));
        candidates
    }

    /// Drop candidates that repeat an earlier one on the same visual line.
    ///
    /// Two candidates are duplicates when their vertical distance is under
    /// the same-line tolerance and one text contains the other, ignoring
    /// case. Input order decides which one survives.
    pub fn suppress_near_duplicates(
        &self,
        candidates: Vec<TitleCandidate>,
    ) -> Vec<TitleCandidate> {
        let mut accepted: Vec<TitleCandidate> = Vec::with_capacity(candidates.len());
        let mut accepted_lower: Vec<String> = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            let lower = candidate.text.to_lowercase();
            let duplicate = accepted
                .iter()
                .zip(&accepted_lower)
                .any(|(existing, existing_lower)| {
                    (candidate.y - existing.y).abs() < self.config.same_line_tolerance
                        && (existing_lower.contains(&lower)
                            || lower.contains(existing_lower.as_str()))
                });
            if !duplicate {
                accepted.push(candidate);
                accepted_lower.push(lower);
            }
        }

        accepted
    }

    /// Title from page-1 geometry alone.
    pub fn geometric_title<'a, I>(&self, spans: I) -> Option<String>
    where
        I: IntoIterator<Item = &'a TextSpan>,
    {
        let candidates = self.candidates(spans);
        self.suppress_near_duplicates(candidates)
            .into_iter()
            .next()
            .map(|c| c.text)
    }
}

impl TitleStrategy for MetadataThenGeometry {
    fn resolve(&self, document: &SpanDocument) -> String {
        if let Some(title) = self.metadata_title(&document.metadata) {
            log::debug!("title from metadata: {}", title);
            return title;
        }

        match self.geometric_title(document.page_spans(1)) {
            Some(title) => {
                log::debug!("title from page 1 geometry: {}", title);
                title
            }
            None => self.config.fallback.clone(),
        }
    }
}

/// Resolve a document's title with the default strategy.
pub fn resolve_title(document: &SpanDocument) -> String {
    MetadataThenGeometry::new().resolve(document)
}
