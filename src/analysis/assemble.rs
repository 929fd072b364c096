//! Final outline assembly.

use crate::model::{DocumentResult, HeadingCandidate, OutlineEntry};

/// Order leveled candidates by reading position and build the result.
///
/// Candidates are sorted by page, then top to bottom; the sort is stable so
/// spans sharing a position keep their extraction order. Candidates without
/// a level are skipped.
pub fn assemble(title: impl Into<String>, mut leveled: Vec<HeadingCandidate>) -> DocumentResult {
    leveled.sort_by(|a, b| {
        a.span
            .page
            .cmp(&b.span.page)
            .then(a.span.y.total_cmp(&b.span.y))
    });

    let outline = leveled
        .into_iter()
        .filter_map(|candidate| {
            let level = candidate.level()?;
            Some(OutlineEntry {
                level,
                text: candidate.span.text,
                page: candidate.span.page,
            })
        })
        .collect();

    DocumentResult::new(title, outline)
}
