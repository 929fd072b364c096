//! Heading level resolution.
//!
//! Levels are ranked from the font sizes present among the accepted
//! candidates only, not from the whole document's palette. A size that is
//! H2 in one document can be H1 in another.

use std::collections::BTreeMap;

use crate::model::{size_key, HeadingCandidate, HeadingLevel};

use super::stats::FontStatistics;

/// Maximum number of distinct heading levels.
pub const MAX_LEVELS: usize = 6;

/// Map each distinct candidate size (as a 0.1-precision key) to a level.
///
/// The largest size maps to H1, the next to H2 and so on. Sizes ranked past
/// `max_levels` saturate at the deepest level.
pub fn level_map(
    candidates: &[HeadingCandidate],
    max_levels: usize,
) -> BTreeMap<i32, HeadingLevel> {
    let max_levels = max_levels.clamp(1, MAX_LEVELS);

    let mut keys: Vec<i32> = candidates.iter().map(|c| size_key(c.span.size)).collect();
    keys.sort_unstable_by(|a, b| b.cmp(a));
    keys.dedup();

    keys.into_iter()
        .enumerate()
        .map(|(rank, key)| (key, HeadingLevel::from_rank(rank.min(max_levels - 1))))
        .collect()
}

/// Assign levels to candidates using up to `max_levels` distinct levels.
pub fn resolve_levels_with(
    mut candidates: Vec<HeadingCandidate>,
    max_levels: usize,
) -> Vec<HeadingCandidate> {
    let map = level_map(&candidates, max_levels);
    log::debug!(
        "resolving {} headings across {} distinct sizes",
        candidates.len(),
        map.len()
    );

    for candidate in &mut candidates {
        let level = map
            .get(&size_key(candidate.span.size))
            .copied()
            .unwrap_or(HeadingLevel::H6);
        candidate.assign_level(level);
    }
    candidates
}

/// Assign H1..H6 levels to heading candidates by font size rank.
///
/// The statistics are part of the signature so that both analysis passes
/// share the same shape, but the mapping ignores them on purpose: it is
/// relative to the detected headings, not to the document.
pub fn resolve_levels(
    candidates: Vec<HeadingCandidate>,
    _stats: &FontStatistics,
) -> Vec<HeadingCandidate> {
    resolve_levels_with(candidates, MAX_LEVELS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TextSpan;

    fn candidate(text: &str, size: f32) -> HeadingCandidate {
        HeadingCandidate::new(TextSpan::new(text, 1, 0.0, 0.0, size, "Arial"), 3)
    }

    fn levels(candidates: &[HeadingCandidate]) -> Vec<HeadingLevel> {
        candidates.iter().map(|c| c.level().unwrap()).collect()
    }

    #[test]
    fn test_single_heading_is_h1() {
        let resolved = resolve_levels(
            vec![candidate("INTRODUCTION", 24.0)],
            &FontStatistics::default(),
        );
        assert_eq!(levels(&resolved), vec![HeadingLevel::H1]);
    }

    #[test]
    fn test_ranked_by_candidate_sizes_only() {
        // The document palette is irrelevant: 14pt is the largest heading here.
        let stats = FontStatistics {
            distinct_sizes: vec![30.0, 24.0, 14.0, 12.0, 10.0],
            ..FontStatistics::default()
        };
        let resolved = resolve_levels(
            vec![
                candidate("Scope", 12.0),
                candidate("Overview", 14.0),
                candidate("Goals", 12.0),
            ],
            &stats,
        );
        assert_eq!(
            levels(&resolved),
            vec![HeadingLevel::H2, HeadingLevel::H1, HeadingLevel::H2]
        );
    }

    #[test]
    fn test_saturates_at_h6() {
        let sizes = [30.0, 28.0, 26.0, 24.0, 22.0, 20.0, 18.0, 16.0];
        let candidates: Vec<_> = sizes.iter().map(|&s| candidate("Heading", s)).collect();
        let resolved = resolve_levels(candidates, &FontStatistics::default());
        let got = levels(&resolved);
        assert_eq!(&got[..6], &HeadingLevel::ALL);
        assert_eq!(got[6], HeadingLevel::H6);
        assert_eq!(got[7], HeadingLevel::H6);
    }

    #[test]
    fn test_monotonic_in_size() {
        let sizes = [11.0, 19.5, 14.0, 19.5, 8.0, 26.0, 14.0, 9.5, 30.0, 7.0];
        let candidates: Vec<_> = sizes.iter().map(|&s| candidate("Heading", s)).collect();
        let resolved = resolve_levels(candidates, &FontStatistics::default());
        for a in &resolved {
            for b in &resolved {
                if a.span.size > b.span.size {
                    assert!(a.level() <= b.level());
                }
                if a.span.size == b.span.size {
                    assert_eq!(a.level(), b.level());
                }
            }
        }
    }

    #[test]
    fn test_custom_level_cap() {
        let candidates = vec![
            candidate("A heading", 20.0),
            candidate("B heading", 16.0),
            candidate("C heading", 12.0),
        ];
        let resolved = resolve_levels_with(candidates, 2);
        assert_eq!(
            levels(&resolved),
            vec![HeadingLevel::H1, HeadingLevel::H2, HeadingLevel::H2]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(resolve_levels(Vec::new(), &FontStatistics::default()).is_empty());
    }
}
