//! PDF parsing module: turns a PDF into positioned text spans.

pub mod backend;
mod extract;
mod options;

pub use backend::{LopdfBackend, PageBox, PdfBackend};
pub use extract::SpanExtractor;
pub use options::{ErrorMode, ExtractOptions};
