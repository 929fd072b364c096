//! Data model shared by extraction and analysis.
//!
//! Spans flow in, a [`DocumentResult`] flows out. Everything here is
//! document-scoped; nothing is pooled across files.

mod outline;
mod span;

pub use outline::{
    DocumentResult, HeadingCandidate, HeadingLevel, OutlineEntry, TitleCandidate, ERROR_TITLE,
    UNTITLED,
};
pub use span::{round_size, size_key, DocumentMetadata, SpanDocument, TextSpan};
