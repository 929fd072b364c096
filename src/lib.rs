//! # pdf-outline
//!
//! Infers a document title and a hierarchical heading outline (H1..H6) from
//! the rendered text of a PDF, using typography and layout alone.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdf_outline::{extract_outline, render};
//!
//! fn main() -> pdf_outline::Result<()> {
//!     // Never fails: unreadable files yield a degraded result
//!     let result = extract_outline("document.pdf");
//!
//!     let json = render::to_json(&result, render::JsonFormat::Pretty)?;
//!     println!("{}", json);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Extraction**: content streams are walked into positioned [`TextSpan`]s
//! - **Statistics**: document-wide font size distribution
//! - **Classification**: additive score per span (size, bold, patterns, casing)
//! - **Levels**: distinct heading sizes ranked into H1..H6
//! - **Title**: metadata first, then the largest text on page 1
//! - **Batch**: directory processing on a rayon pool with JSON Schema checks

pub mod analysis;
pub mod batch;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use analysis::{AnalyzerConfig, HeadingConfig, OutlineAnalyzer, TitleConfig};
pub use batch::{BatchEvent, BatchOptions, BatchProcessor, BatchSummary};
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_pdf, PdfFormat};
pub use error::{Error, Result};
pub use model::{
    DocumentMetadata, DocumentResult, HeadingLevel, OutlineEntry, SpanDocument, TextSpan,
};
pub use parser::{ErrorMode, ExtractOptions, SpanExtractor};
pub use render::{JsonFormat, SchemaValidator, ValidationReport};

use std::path::Path;

/// Extract the positioned text spans and metadata of a PDF file.
///
/// # Example
///
/// ```no_run
/// let doc = pdf_outline::extract_spans("document.pdf").unwrap();
/// println!("{} spans on {} pages", doc.spans.len(), doc.page_count);
/// ```
pub fn extract_spans<P: AsRef<Path>>(path: P) -> Result<SpanDocument> {
    SpanExtractor::open(path)?.extract_document()
}

/// Infer the title and outline of a PDF file, reporting failures.
pub fn try_extract_outline<P: AsRef<Path>>(path: P) -> Result<DocumentResult> {
    PdfOutline::new().parse(path).map(OutlineResult::into_result)
}

/// Infer the title and outline of a PDF file.
///
/// Never fails: a document that cannot be read produces
/// `{"title": "Error Processing Document", "outline": []}`.
///
/// # Example
///
/// ```no_run
/// use pdf_outline::extract_outline;
///
/// let result = extract_outline("document.pdf");
/// for entry in &result.outline {
///     println!("{} {} (p.{})", entry.level, entry.text, entry.page);
/// }
/// ```
pub fn extract_outline<P: AsRef<Path>>(path: P) -> DocumentResult {
    PdfOutline::new().outline(path)
}

/// Infer the title and outline of a PDF held in memory, reporting failures.
pub fn try_outline_from_bytes(data: &[u8]) -> Result<DocumentResult> {
    PdfOutline::new()
        .parse_bytes(data)
        .map(OutlineResult::into_result)
}

/// Infer the title and outline of a PDF held in memory.
///
/// Never fails, like [`extract_outline`].
pub fn outline_from_bytes(data: &[u8]) -> DocumentResult {
    try_outline_from_bytes(data).unwrap_or_else(|e| {
        log::warn!("in-memory document: {}", e);
        DocumentResult::failed()
    })
}

/// Infer the title and outline of already extracted spans.
pub fn analyze_spans(document: &SpanDocument) -> DocumentResult {
    analysis::analyze(document)
}

/// Infer the title and outline of a PDF file without blocking the runtime.
#[cfg(feature = "async")]
pub async fn extract_outline_async<P: AsRef<Path>>(path: P) -> DocumentResult {
    let path = path.as_ref();
    let data = match tokio::fs::read(path).await {
        Ok(data) => data,
        Err(e) => {
            log::warn!("{}: {}", path.display(), e);
            return DocumentResult::failed();
        }
    };
    tokio::task::spawn_blocking(move || outline_from_bytes(&data))
        .await
        .unwrap_or_else(|e| {
            log::warn!("outline task failed: {}", e);
            DocumentResult::failed()
        })
}

/// Builder for outline extraction with custom options.
///
/// # Example
///
/// ```no_run
/// use pdf_outline::{AnalyzerConfig, HeadingConfig, PdfOutline, JsonFormat};
///
/// let json = PdfOutline::new()
///     .with_config(AnalyzerConfig::new().with_heading(HeadingConfig::new().with_min_score(4)))
///     .with_max_pages(50)
///     .strict()
///     .parse("document.pdf")?
///     .to_json(JsonFormat::Compact)?;
/// # Ok::<(), pdf_outline::Error>(())
/// ```
pub struct PdfOutline {
    extract_options: ExtractOptions,
    analyzer: OutlineAnalyzer,
}

impl PdfOutline {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            extract_options: ExtractOptions::default(),
            analyzer: OutlineAnalyzer::new(),
        }
    }

    /// Fail on the first page that cannot be decoded.
    pub fn strict(mut self) -> Self {
        self.extract_options = self.extract_options.with_error_mode(ErrorMode::Strict);
        self
    }

    /// Skip pages that cannot be decoded (the default).
    pub fn lenient(mut self) -> Self {
        self.extract_options = self.extract_options.lenient();
        self
    }

    /// Only read the first `max_pages` pages (0 = all).
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.extract_options = self.extract_options.with_max_pages(max_pages);
        self
    }

    /// Set span extraction options.
    pub fn with_extract_options(mut self, options: ExtractOptions) -> Self {
        self.extract_options = options;
        self
    }

    /// Configure the default analyzer.
    pub fn with_config(mut self, config: AnalyzerConfig) -> Self {
        self.analyzer = OutlineAnalyzer::with_config(config);
        self
    }

    /// Use a custom analyzer, e.g. with replaced strategies.
    pub fn with_analyzer(mut self, analyzer: OutlineAnalyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Extract and analyze a PDF file.
    pub fn parse<P: AsRef<Path>>(self, path: P) -> Result<OutlineResult> {
        let Self {
            extract_options,
            analyzer,
        } = self;
        let extractor = SpanExtractor::open_with_options(path, extract_options)?;
        let document = extractor.extract_document()?;
        Ok(Self::finish(&analyzer, document))
    }

    /// Extract and analyze a PDF held in memory.
    pub fn parse_bytes(self, data: &[u8]) -> Result<OutlineResult> {
        let Self {
            extract_options,
            analyzer,
        } = self;
        let extractor = SpanExtractor::from_bytes_with_options(data, extract_options)?;
        let document = extractor.extract_document()?;
        Ok(Self::finish(&analyzer, document))
    }

    /// Extract and analyze a PDF file, degrading instead of failing.
    ///
    /// An unreadable document yields [`DocumentResult::failed`].
    pub fn outline<P: AsRef<Path>>(self, path: P) -> DocumentResult {
        let path = path.as_ref();
        self.parse(path)
            .map(OutlineResult::into_result)
            .unwrap_or_else(|e| {
                log::warn!("{}: {}", path.display(), e);
                DocumentResult::failed()
            })
    }

    fn finish(analyzer: &OutlineAnalyzer, document: SpanDocument) -> OutlineResult {
        let result = analyzer.analyze(&document);
        OutlineResult { document, result }
    }
}

impl Default for PdfOutline {
    fn default() -> Self {
        Self::new()
    }
}

/// Extracted spans together with the inferred outline.
pub struct OutlineResult {
    /// The extracted spans
    pub document: SpanDocument,
    /// The inferred title and outline
    result: DocumentResult,
}

impl OutlineResult {
    /// The inferred title and outline.
    pub fn result(&self) -> &DocumentResult {
        &self.result
    }

    /// Take the inferred title and outline.
    pub fn into_result(self) -> DocumentResult {
        self.result
    }

    /// Convert the outline to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.result, format)
    }

    /// Validate the outline against a schema.
    pub fn validate(&self, schema: &SchemaValidator) -> Result<ValidationReport> {
        schema.validate(&self.result)
    }
}
