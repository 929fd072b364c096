//! Span extraction options.

/// Options for extracting text spans from PDF documents.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Whether to merge adjacent runs sharing font, size and baseline
    pub merge_runs: bool,

    /// Maximum number of pages to read (0 = all)
    pub max_pages: u32,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip pages that fail to decode).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Enable or disable run merging.
    pub fn with_merge_runs(mut self, merge: bool) -> Self {
        self.merge_runs = merge;
        self
    }

    /// Limit the number of pages read.
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Whether a 1-based page number falls inside the page limit.
    pub fn includes_page(&self, page: u32) -> bool {
        self.max_pages == 0 || page <= self.max_pages
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Lenient,
            merge_runs: true,
            max_pages: 0,
        }
    }
}

/// Error handling mode during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any error
    Strict,
    /// Skip invalid pages and continue
    #[default]
    Lenient,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = ExtractOptions::default();
        assert_eq!(opts.error_mode, ErrorMode::Lenient);
        assert!(opts.merge_runs);
        assert_eq!(opts.max_pages, 0);
        assert!(opts.includes_page(1000));
    }

    #[test]
    fn test_builder() {
        let opts = ExtractOptions::new()
            .with_error_mode(ErrorMode::Strict)
            .with_merge_runs(false)
            .with_max_pages(2);
        assert_eq!(opts.error_mode, ErrorMode::Strict);
        assert!(!opts.merge_runs);
        assert!(opts.includes_page(2));
        assert!(!opts.includes_page(3));
    }
}
