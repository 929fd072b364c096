//! Heading candidates and the outline produced for a document.

use serde::{Deserialize, Serialize};

use super::TextSpan;

/// Title used when no page-1 text qualifies as a title.
pub const UNTITLED: &str = "Untitled Document";

/// Title used when a document could not be processed at all.
pub const ERROR_TITLE: &str = "Error Processing Document";

/// Ordinal heading level, H1 (outermost) through H6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
}

impl HeadingLevel {
    /// All levels, outermost first.
    pub const ALL: [HeadingLevel; 6] = [
        HeadingLevel::H1,
        HeadingLevel::H2,
        HeadingLevel::H3,
        HeadingLevel::H4,
        HeadingLevel::H5,
        HeadingLevel::H6,
    ];

    /// Level for a zero-based rank, saturating at H6.
    pub fn from_rank(rank: usize) -> Self {
        Self::ALL[rank.min(Self::ALL.len() - 1)]
    }

    /// Numeric depth, 1 for H1 through 6 for H6.
    pub fn depth(self) -> u8 {
        self as u8 + 1
    }

    /// Level name as it appears in the output ("H1".."H6").
    pub fn as_str(self) -> &'static str {
        match self {
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
            HeadingLevel::H4 => "H4",
            HeadingLevel::H5 => "H5",
            HeadingLevel::H6 => "H6",
        }
    }
}

impl std::fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A span accepted by the heading classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingCandidate {
    /// The underlying span (normalized text)
    pub span: TextSpan,
    /// Classifier score
    pub score: u32,
    level: Option<HeadingLevel>,
}

impl HeadingCandidate {
    /// Create an unleveled candidate.
    pub fn new(span: TextSpan, score: u32) -> Self {
        Self {
            span,
            score,
            level: None,
        }
    }

    /// The assigned level, if the level resolver has run.
    pub fn level(&self) -> Option<HeadingLevel> {
        self.level
    }

    /// Assign a level. A level, once set, is never reassigned.
    ///
    /// Returns `false` if the candidate already carried a level.
    pub fn assign_level(&mut self, level: HeadingLevel) -> bool {
        if self.level.is_some() {
            return false;
        }
        self.level = Some(level);
        true
    }
}

/// A page-1 text run considered for the document title.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleCandidate {
    /// Normalized text
    pub text: String,
    /// Font size, rounded to one decimal
    pub size: f32,
    /// Top edge, measured from the top of the page
    pub y: f32,
    /// Whether the run is set in a bold font
    pub bold: bool,
}

/// One heading in the final outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Heading level
    pub level: HeadingLevel,
    /// Heading text
    pub text: String,
    /// Page number (1-indexed)
    pub page: u32,
}

/// The inferred title and outline of one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentResult {
    /// Document title
    pub title: String,
    /// Headings in reading order
    pub outline: Vec<OutlineEntry>,
}

impl DocumentResult {
    /// Create a result.
    pub fn new(title: impl Into<String>, outline: Vec<OutlineEntry>) -> Self {
        Self {
            title: title.into(),
            outline,
        }
    }

    /// Degraded result for a document that could not be processed.
    pub fn failed() -> Self {
        Self::new(ERROR_TITLE, Vec::new())
    }

    /// Degraded result naming the file that could not be processed.
    pub fn failed_file(file_name: &str) -> Self {
        Self::new(format!("Error Processing: {}", file_name), Vec::new())
    }

    /// Check if this is a degraded error result.
    pub fn is_failed(&self) -> bool {
        self.outline.is_empty() && self.title.starts_with("Error Processing")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_rank_saturates() {
        assert_eq!(HeadingLevel::from_rank(0), HeadingLevel::H1);
        assert_eq!(HeadingLevel::from_rank(5), HeadingLevel::H6);
        assert_eq!(HeadingLevel::from_rank(42), HeadingLevel::H6);
        assert_eq!(HeadingLevel::H3.depth(), 3);
    }

    #[test]
    fn test_level_serializes_as_name() {
        let json = serde_json::to_string(&HeadingLevel::H2).unwrap();
        assert_eq!(json, "\"H2\"");
        let level: HeadingLevel = serde_json::from_str("\"H5\"").unwrap();
        assert_eq!(level, HeadingLevel::H5);
    }

    #[test]
    fn test_level_assigned_once() {
        let span = TextSpan::new("Intro", 1, 0.0, 0.0, 12.0, "Arial");
        let mut candidate = HeadingCandidate::new(span, 4);
        assert!(candidate.assign_level(HeadingLevel::H2));
        assert!(!candidate.assign_level(HeadingLevel::H1));
        assert_eq!(candidate.level(), Some(HeadingLevel::H2));
    }

    #[test]
    fn test_failed_results() {
        let result = DocumentResult::failed();
        assert_eq!(result.title, ERROR_TITLE);
        assert!(result.is_failed());

        let result = DocumentResult::failed_file("report.pdf");
        assert_eq!(result.title, "Error Processing: report.pdf");
        assert!(result.is_failed());

        assert!(!DocumentResult::new(UNTITLED, vec![]).is_failed());
    }

    #[test]
    fn test_result_has_exactly_two_fields() {
        let result = DocumentResult::new(
            "Doc",
            vec![OutlineEntry {
                level: HeadingLevel::H1,
                text: "Intro".into(),
                page: 1,
            }],
        );
        let value = serde_json::to_value(&result).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(value["outline"][0]["level"], "H1");
        assert_eq!(value["outline"][0]["page"], 1);
    }
}
