//! Tunable thresholds for heading classification and title resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::UNTITLED;

/// Thresholds and weights used by the heading classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadingConfig {
    /// Size ratio to the document average counted as "large"
    pub large_ratio: f32,
    /// Size ratio to the document average counted as "significantly larger"
    pub significant_ratio: f32,
    /// Minimum total score for a span to be accepted
    pub min_score: u32,
    /// Spans with more words than this are treated as prose
    pub max_words: usize,
    /// Spans whose digit ratio exceeds this are treated as data
    pub max_digit_ratio: f32,
    /// Spans with at most this many words earn the brevity bonus
    pub brevity_words: usize,
    /// Share of capitalized words needed for the title-case bonus
    pub title_case_ratio: f32,
    /// Minimum cleaned text length in characters
    pub min_chars: usize,

    /// Score for a size at or above `large_ratio`
    pub large_weight: u32,
    /// Score for a size at or above `significant_ratio`, on top of `large_weight`
    pub significant_weight: u32,
    /// Score for a bold font
    pub bold_weight: u32,
    /// Score for matching a structural heading pattern
    pub pattern_weight: u32,
    /// Score for title-cased text
    pub title_case_weight: u32,
    /// Score for short text
    pub brevity_weight: u32,
}

impl Default for HeadingConfig {
    fn default() -> Self {
        Self {
            large_ratio: 1.1,
            significant_ratio: 1.3,
            min_score: 3,
            max_words: 20,
            max_digit_ratio: 0.3,
            brevity_words: 8,
            title_case_ratio: 0.7,
            min_chars: 3,
            large_weight: 2,
            significant_weight: 2,
            bold_weight: 2,
            pattern_weight: 3,
            title_case_weight: 1,
            brevity_weight: 1,
        }
    }
}

impl HeadingConfig {
    /// Create a config with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum accepted score.
    pub fn with_min_score(mut self, score: u32) -> Self {
        self.min_score = score;
        self
    }

    /// Set the maximum word count.
    pub fn with_max_words(mut self, words: usize) -> Self {
        self.max_words = words;
        self
    }

    /// Set the maximum digit ratio.
    pub fn with_max_digit_ratio(mut self, ratio: f32) -> Self {
        self.max_digit_ratio = ratio;
        self
    }

    /// Set the "large" and "significantly larger" size ratios.
    pub fn with_size_ratios(mut self, large: f32, significant: f32) -> Self {
        self.large_ratio = large;
        self.significant_ratio = significant;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.large_ratio <= 0.0 || self.significant_ratio <= 0.0 {
            return Err(Error::Config("size ratios must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.max_digit_ratio) {
            return Err(Error::Config("max_digit_ratio must be within 0..=1".into()));
        }
        if !(0.0..=1.0).contains(&self.title_case_ratio) {
            return Err(Error::Config(
                "title_case_ratio must be within 0..=1".into(),
            ));
        }
        Ok(())
    }
}

/// Thresholds used by the geometric title strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleConfig {
    /// Minimum words in a page-1 title candidate
    pub min_words: usize,
    /// Minimum characters in a page-1 title candidate
    pub min_chars: usize,
    /// Vertical distance under which two candidates share a visual line
    pub same_line_tolerance: f32,
    /// Minimum characters for a metadata title to be trusted
    pub min_metadata_chars: usize,
    /// Title returned when nothing qualifies
    pub fallback: String,
}

impl Default for TitleConfig {
    fn default() -> Self {
        Self {
            min_words: 2,
            min_chars: 10,
            same_line_tolerance: 10.0,
            min_metadata_chars: 4,
            fallback: UNTITLED.to_string(),
        }
    }
}

impl TitleConfig {
    /// Create a config with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fallback title.
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    /// Set the same-line tolerance.
    pub fn with_same_line_tolerance(mut self, tolerance: f32) -> Self {
        self.same_line_tolerance = tolerance;
        self
    }
}

/// Full analyzer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub heading: HeadingConfig,
    pub title: TitleConfig,
    /// Number of distinct heading levels (1..=6)
    pub max_levels: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            heading: HeadingConfig::default(),
            title: TitleConfig::default(),
            max_levels: 6,
        }
    }
}

impl AnalyzerConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set heading configuration.
    pub fn with_heading(mut self, heading: HeadingConfig) -> Self {
        self.heading = heading;
        self
    }

    /// Set title configuration.
    pub fn with_title(mut self, title: TitleConfig) -> Self {
        self.title = title;
        self
    }

    /// Set the number of distinct heading levels, clamped to 1..=6.
    pub fn with_max_levels(mut self, levels: usize) -> Self {
        self.max_levels = levels.clamp(1, 6);
        self
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check the configuration for out-of-range values.
    pub fn validate(&self) -> Result<()> {
        if !(1..=6).contains(&self.max_levels) {
            return Err(Error::Config("max_levels must be within 1..=6".into()));
        }
        self.heading.validate()
    }
}
