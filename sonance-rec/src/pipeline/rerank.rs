//! Final reranking with soft priors and artist diversity
//!
//! Sort key per candidate:
//!
//! ```text
//! similarity + boost * (w_year * year_prior + w_pop * pop_closeness - seed_artist_penalty)
//! ```
//!
//! The seed-artist term only applies when the candidate's primary contributor
//! is one of the seeds'. A second pass walks the sorted list and lowers the
//! score of every repeat contributor by a fixed penalty. That pass does not
//! re-sort: the returned order is the pre-demotion order, only the reported
//! scores carry the penalty.

use super::{Candidate, Profile};
use crate::store::MetadataLookup;
use sonance_common::RecommendParams;
use std::collections::HashSet;

/// Gaussian closeness of release years; 0 when either year is unknown
pub fn year_prior(year: Option<i32>, profile_year: Option<i32>, sigma: f32) -> f32 {
    match (year, profile_year) {
        (Some(y), Some(qy)) => {
            let d = f64::from(y) - f64::from(qy);
            let sigma = f64::from(sigma);
            (-(d * d) / (2.0 * sigma * sigma)).exp() as f32
        }
        _ => 0.0,
    }
}

/// Linear closeness of popularity tiers in [0, 1]; 0 when either tier is unknown
pub fn pop_closeness(pop: Option<u8>, profile_pop: Option<u8>) -> f32 {
    match (pop, profile_pop) {
        (Some(p), Some(qp)) => {
            let gap = (i32::from(p) - i32::from(qp)).unsigned_abs().min(10) as f32;
            (1.0 - gap / 10.0).max(0.0)
        }
        _ => 0.0,
    }
}

/// Score and reorder candidates against the profile, then demote repeat artists
pub fn rerank(
    candidates: Vec<Candidate>,
    lookup: &impl MetadataLookup,
    profile: &Profile,
    params: &RecommendParams,
) -> Vec<Candidate> {
    let mut ranked: Vec<Candidate> = candidates
        .into_iter()
        .map(|c| {
            let meta = lookup.metadata_or_empty(&c.id);
            let diversity = match meta.primary_artist() {
                Some(artist) if profile.seed_artists.contains(artist) => -params.seed_artist_penalty,
                _ => 0.0,
            };
            let bonus = params.prior_boost
                * (params.year_weight * year_prior(meta.year, profile.year, params.year_sigma)
                    + params.pop_weight * pop_closeness(meta.pop_bucket, profile.pop_bucket)
                    + diversity);
            Candidate {
                score: c.score + bonus,
                ..c
            }
        })
        .collect();

    // Stable: equal keys keep their input order
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

    demote_repeated_artists(&mut ranked, lookup, params.repeat_artist_penalty);
    ranked
}

/// Lower the score of every non-first occurrence of a primary contributor
///
/// Order is left untouched. Candidates without a contributor are never demoted.
pub fn demote_repeated_artists(ranked: &mut [Candidate], lookup: &impl MetadataLookup, penalty: f32) {
    let mut seen: HashSet<&str> = HashSet::new();
    for candidate in ranked.iter_mut() {
        if let Some(artist) = lookup.metadata_or_empty(&candidate.id).primary_artist() {
            if !seen.insert(artist) {
                candidate.score -= penalty;
            }
        }
    }
}

/// Keep candidates tagged with `tag` (case-insensitive, trimmed)
///
/// A blank tag disables the filter.
pub fn filter_by_tag(
    candidates: Vec<Candidate>,
    lookup: &impl MetadataLookup,
    tag: Option<&str>,
) -> Vec<Candidate> {
    match tag.map(str::trim).filter(|t| !t.is_empty()) {
        Some(tag) => candidates
            .into_iter()
            .filter(|c| lookup.metadata_or_empty(&c.id).has_tag(tag))
            .collect(),
        None => candidates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TrackMetadata;
    use std::collections::{BTreeSet, HashMap};

    fn track(artist: &str, year: Option<i32>, pop: Option<u8>) -> TrackMetadata {
        TrackMetadata {
            artist_names: vec![artist.to_string()],
            year,
            pop_bucket: pop,
            ..Default::default()
        }
    }

    fn lookup(entries: &[(&str, TrackMetadata)]) -> HashMap<String, TrackMetadata> {
        entries.iter().map(|(id, m)| (id.to_string(), m.clone())).collect()
    }

    fn neutral_params() -> RecommendParams {
        RecommendParams {
            year_weight: 0.0,
            pop_weight: 0.0,
            seed_artist_penalty: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_year_prior_shape() {
        assert_eq!(year_prior(Some(2000), Some(2000), 3.5), 1.0);
        let one_sigma = year_prior(Some(2000), Some(2003), 3.0);
        assert!((one_sigma - (-0.5f32).exp()).abs() < 1e-6);
        assert_eq!(year_prior(None, Some(2000), 3.5), 0.0);
        assert_eq!(year_prior(Some(2000), None, 3.5), 0.0);
    }

    #[test]
    fn test_year_prior_extreme_years() {
        assert_eq!(year_prior(Some(i32::MIN), Some(i32::MAX), 3.5), 0.0);
        assert_eq!(year_prior(Some(i32::MAX), Some(i32::MIN), 3.5), 0.0);
        assert_eq!(year_prior(Some(i32::MAX), Some(i32::MAX), 3.5), 1.0);
    }

    #[test]
    fn test_rerank_with_extreme_years() {
        let lookup = lookup(&[
            ("far", track("X", Some(2_000_000_000), Some(5))),
            ("near", track("Y", Some(-2_000_000_000), Some(5))),
        ]);
        let profile = Profile { year: Some(-2_000_000_000), ..Default::default() };
        let candidates = vec![Candidate::new("far", 0.5), Candidate::new("near", 0.4)];

        let out = rerank(candidates, &lookup, &profile, &neutral_params());
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|c| c.score.is_finite()));
    }

    #[test]
    fn test_pop_closeness_shape() {
        assert_eq!(pop_closeness(Some(5), Some(5)), 1.0);
        assert!((pop_closeness(Some(2), Some(5)) - 0.7).abs() < 1e-6);
        assert_eq!(pop_closeness(Some(0), Some(10)), 0.0);
        assert_eq!(pop_closeness(None, Some(5)), 0.0);
    }

    #[test]
    fn test_priors_reorder_close_scores() {
        let lookup = lookup(&[
            ("off_era", track("X", Some(1970), Some(5))),
            ("on_era", track("Y", Some(2000), Some(5))),
        ]);
        let profile = Profile { year: Some(2000), pop_bucket: Some(5), seed_artists: BTreeSet::new() };
        let candidates = vec![Candidate::new("off_era", 0.80), Candidate::new("on_era", 0.78)];

        let out = rerank(candidates, &lookup, &profile, &RecommendParams::default());
        assert_eq!(out[0].id, "on_era");
        // 0.78 + 0.15 * 1 + 0.05 * 1
        assert!((out[0].score - 0.98).abs() < 1e-5);
    }

    #[test]
    fn test_seed_artist_penalized() {
        let lookup = lookup(&[("same", track("Seed", None, None)), ("other", track("Other", None, None))]);
        let profile = Profile {
            seed_artists: ["Seed".to_string()].into_iter().collect(),
            ..Default::default()
        };
        let candidates = vec![Candidate::new("same", 0.90), Candidate::new("other", 0.87)];

        let out = rerank(candidates, &lookup, &profile, &RecommendParams::default());
        assert_eq!(out[0].id, "other");
        assert!((out[1].score - 0.84).abs() < 1e-6);
    }

    #[test]
    fn test_repeat_artist_demoted_without_resort() {
        let lookup = lookup(&[
            ("a1", track("A", None, None)),
            ("a2", track("A", None, None)),
            ("b1", track("B", None, None)),
        ]);
        let candidates = vec![
            Candidate::new("a1", 0.90),
            Candidate::new("a2", 0.89),
            Candidate::new("b1", 0.885),
        ];

        let out = rerank(candidates, &lookup, &Profile::default(), &neutral_params());

        let ids: Vec<&str> = out.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2", "b1"]);
        assert_eq!(out[0].score, 0.90);
        assert!((out[1].score - (0.89 - 0.02)).abs() < 1e-6);
        assert_eq!(out[2].score, 0.885);
        // Demoted score now sits below the next entry, order is kept anyway
        assert!(out[1].score < out[2].score);
    }

    #[test]
    fn test_contributorless_candidates_never_demoted() {
        let lookup = lookup(&[("x", TrackMetadata::default()), ("y", TrackMetadata::default())]);
        let mut ranked = vec![Candidate::new("x", 0.5), Candidate::new("y", 0.4)];
        demote_repeated_artists(&mut ranked, &lookup, 0.02);
        assert_eq!(ranked[1].score, 0.4);
    }

    #[test]
    fn test_tag_filter() {
        let mut tagged = track("A", None, None);
        tagged.tags = vec!["Synth Pop".to_string()];
        let lookup = lookup(&[("t", tagged), ("u", track("B", None, None))]);
        let candidates = vec![Candidate::new("t", 0.5), Candidate::new("u", 0.4)];

        let out = filter_by_tag(candidates.clone(), &lookup, Some("  synth pop "));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "t");

        assert_eq!(filter_by_tag(candidates.clone(), &lookup, Some("  ")), candidates);
        assert_eq!(filter_by_tag(candidates.clone(), &lookup, None), candidates);
    }
}
