//! Era filter with progressive window widening
//!
//! Tries each finite half-window in ascending order and stops at the first
//! one that keeps enough candidates. Tracks with an unknown year only survive
//! the final unbounded window, which keeps everything.

use super::Candidate;
use crate::store::MetadataLookup;
use tracing::debug;

/// Keep candidates released near `year`
///
/// The keep target is `min(target_count, max(min_keep, candidates.len() / 3))`.
/// Input order is preserved.
pub fn filter_by_era(
    candidates: Vec<Candidate>,
    lookup: &impl MetadataLookup,
    year: Option<i32>,
    target_count: usize,
    widths: &[u32],
    min_keep: usize,
) -> Vec<Candidate> {
    let Some(year) = year else {
        return candidates;
    };

    let bar = target_count.min(min_keep.max(candidates.len() / 3));

    for &width in widths {
        let kept: Vec<Candidate> = candidates
            .iter()
            .filter(|c| {
                lookup
                    .metadata_or_empty(&c.id)
                    .year
                    .is_some_and(|y| (i64::from(y) - i64::from(year)).abs() <= i64::from(width))
            })
            .cloned()
            .collect();

        if kept.len() >= bar {
            debug!(
                "Era filter: kept {}/{} candidates within ±{} years of {}",
                kept.len(),
                candidates.len(),
                width,
                year
            );
            return kept;
        }
    }

    debug!(
        "Era filter: no finite window reached {} candidates, keeping all {}",
        bar,
        candidates.len()
    );
    candidates
}
