//! Document-wide font statistics (analysis pass 1).

use std::collections::HashMap;

use crate::model::{round_size, size_key, TextSpan};

use super::normalize::normalize;

/// Average size used when a document has no qualifying text.
pub const DEFAULT_FONT_SIZE: f32 = 12.0;

/// Aggregate font-size and font-usage distribution of one document.
#[derive(Debug, Clone, PartialEq)]
pub struct FontStatistics {
    /// Arithmetic mean of the size of every qualifying span
    pub avg_font_size: f32,
    /// The (size, font name) pair carrying the most characters
    pub most_common_font: (f32, String),
    /// Observed sizes, deduplicated and sorted strictly descending
    pub distinct_sizes: Vec<f32>,
}

impl Default for FontStatistics {
    fn default() -> Self {
        Self {
            avg_font_size: DEFAULT_FONT_SIZE,
            most_common_font: (DEFAULT_FONT_SIZE, String::new()),
            distinct_sizes: Vec::new(),
        }
    }
}

impl FontStatistics {
    /// Body text size: the size of the most common font.
    pub fn body_size(&self) -> f32 {
        self.most_common_font.0
    }
}

/// Accumulates statistics over a stream of spans.
#[derive(Debug, Default)]
pub struct FontStatisticsCollector {
    size_sum: f64,
    size_count: usize,
    /// (size key, font) -> (character weight, first-seen order)
    usage: HashMap<(i32, String), (usize, usize)>,
    sizes: Vec<i32>,
}

impl FontStatisticsCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one span. Spans whose cleaned text is 2 characters or shorter
    /// are ignored.
    pub fn add(&mut self, span: &TextSpan) {
        let cleaned = normalize(&span.text);
        let weight = cleaned.chars().count();
        if weight <= 2 {
            return;
        }

        let size = round_size(span.size);
        let key = size_key(size);
        self.size_sum += size as f64;
        self.size_count += 1;
        self.sizes.push(key);

        let order = self.usage.len();
        let entry = self
            .usage
            .entry((key, span.font_name.clone()))
            .or_insert((0, order));
        entry.0 += weight;
    }

    /// Number of spans that contributed.
    pub fn count(&self) -> usize {
        self.size_count
    }

    /// Produce the final statistics.
    pub fn finish(self) -> FontStatistics {
        if self.size_count == 0 {
            return FontStatistics::default();
        }

        let avg_font_size = (self.size_sum / self.size_count as f64) as f32;

        // Heaviest key wins; ties go to the key seen first.
        let most_common_font = self
            .usage
            .into_iter()
            .max_by(|(_, (wa, oa)), (_, (wb, ob))| wa.cmp(wb).then(ob.cmp(oa)))
            .map(|((key, font), _)| (key as f32 / 10.0, font))
            .unwrap_or((DEFAULT_FONT_SIZE, String::new()));

        let mut sizes = self.sizes;
        sizes.sort_unstable_by(|a, b| b.cmp(a));
        sizes.dedup();
        let distinct_sizes = sizes.into_iter().map(|k| k as f32 / 10.0).collect();

        FontStatistics {
            avg_font_size,
            most_common_font,
            distinct_sizes,
        }
    }
}

/// Collect statistics for a whole document in a single pass.
pub fn collect<'a, I>(spans: I) -> FontStatistics
where
    I: IntoIterator<Item = &'a TextSpan>,
{
    let mut collector = FontStatisticsCollector::new();
    for span in spans {
        collector.add(span);
    }
    log::debug!("font statistics over {} spans", collector.count());
    collector.finish()
}
