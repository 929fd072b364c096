//! Positioned text spans: the input of the outline analysis.

use serde::{Deserialize, Serialize};

/// Round a font size to one decimal place.
///
/// Sizes are compared and clustered at this precision everywhere in the crate.
pub fn round_size(size: f32) -> f32 {
    (size * 10.0).round() / 10.0
}

/// Integer key of a font size at 0.1 precision, usable in hash maps.
pub fn size_key(size: f32) -> i32 {
    (size * 10.0).round() as i32
}

/// A visually distinct run of same-styled text on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    /// The text content, raw or normalized
    pub text: String,
    /// Page number (1-indexed)
    pub page: u32,
    /// X position of the left edge
    pub x: f32,
    /// Y position of the top edge, measured from the top of the page
    pub y: f32,
    /// Font size in points, rounded to one decimal
    pub size: f32,
    /// Font name (e.g., "Helvetica-Bold")
    pub font_name: String,
    /// Whether the font appears to be bold
    pub bold: bool,
    /// Whether the font appears to be italic
    pub italic: bool,
}

impl TextSpan {
    /// Create a span, deriving bold/italic flags from the font name.
    pub fn new(
        text: impl Into<String>,
        page: u32,
        x: f32,
        y: f32,
        size: f32,
        font_name: impl Into<String>,
    ) -> Self {
        let font_name = font_name.into();
        let lower = font_name.to_lowercase();
        let bold = lower.contains("bold");
        let italic = lower.contains("italic");

        Self {
            text: text.into(),
            page,
            x,
            y,
            size: round_size(size),
            font_name,
            bold,
            italic,
        }
    }

    /// Override the bold flag.
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Override the italic flag.
    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }
}

/// Document-level metadata consulted by the title resolver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Title from the document information dictionary
    pub title: Option<String>,
}

impl DocumentMetadata {
    /// Metadata carrying a title.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
        }
    }
}

/// Everything the analysis needs to know about one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpanDocument {
    /// Spans in extraction order
    pub spans: Vec<TextSpan>,
    /// Document metadata
    pub metadata: DocumentMetadata,
    /// Number of pages in the document
    pub page_count: u32,
}

impl SpanDocument {
    /// Create a document from spans, inferring the page count from them.
    pub fn new(spans: Vec<TextSpan>) -> Self {
        let page_count = spans.iter().map(|s| s.page).max().unwrap_or(0);
        Self {
            spans,
            metadata: DocumentMetadata::default(),
            page_count,
        }
    }

    /// Attach metadata.
    pub fn with_metadata(mut self, metadata: DocumentMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Set the page count.
    pub fn with_page_count(mut self, page_count: u32) -> Self {
        self.page_count = page_count;
        self
    }

    /// Spans located on the given page.
    pub fn page_spans(&self, page: u32) -> impl Iterator<Item = &TextSpan> {
        self.spans.iter().filter(move |s| s.page == page)
    }
}
