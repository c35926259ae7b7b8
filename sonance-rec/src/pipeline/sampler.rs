//! Popularity-tier mix control
//!
//! Candidates are partitioned by popularity tier (unknown tier is its own
//! bucket). Bucket weights are `size^bias`:
//! - `bias = 1` proportional to bucket size
//! - `bias = 0` every bucket weighs the same
//! - `bias < 0` favors small, less mainstream buckets
//!
//! Each bucket gets `round(weight * k)` slots filled by uniform sampling
//! without replacement. The RNG is created per call from a fixed seed, so
//! identical inputs always give identical output, independent of call order.

use super::Candidate;
use crate::store::MetadataLookup;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;
use tracing::debug;

/// Reshape `candidates` into at most `k` items honoring the tier mix
///
/// Under-filled shortlists are topped up with the best remaining candidates
/// by score. Output is ordered by descending score.
pub fn sample_by_bucket(
    candidates: Vec<Candidate>,
    lookup: &impl MetadataLookup,
    k: usize,
    bias: f32,
    seed: u64,
) -> Vec<Candidate> {
    if k == 0 {
        return Vec::new();
    }
    if candidates.len() <= k {
        return candidates;
    }

    // Indices into `candidates`, in input order within each bucket
    let mut buckets: BTreeMap<Option<u8>, Vec<usize>> = BTreeMap::new();
    for (idx, candidate) in candidates.iter().enumerate() {
        let tier = lookup.metadata_or_empty(&candidate.id).pop_bucket;
        buckets.entry(tier).or_default().push(idx);
    }

    let weights = bucket_weights(buckets.values().map(Vec::len), bias);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut selected = vec![false; candidates.len()];
    let mut taken = 0usize;
    for (members, weight) in buckets.values().zip(&weights) {
        let slots = ((weight * k as f64).round() as usize).min(members.len());
        for &idx in members.choose_multiple(&mut rng, slots) {
            selected[idx] = true;
            taken += 1;
        }
    }

    let mut shortlist: Vec<usize> = (0..candidates.len()).filter(|&i| selected[i]).collect();
    sort_by_score(&mut shortlist, &candidates);

    if shortlist.len() < k {
        let mut rest: Vec<usize> = (0..candidates.len()).filter(|&i| !selected[i]).collect();
        sort_by_score(&mut rest, &candidates);
        rest.truncate(k - shortlist.len());
        shortlist.extend(rest);
        sort_by_score(&mut shortlist, &candidates);
    }
    shortlist.truncate(k);

    debug!(
        "Bucket sampler: {} buckets, {} sampled, {} in shortlist (k={}, bias={})",
        buckets.len(),
        taken,
        shortlist.len(),
        k,
        bias
    );

    let mut pool: Vec<Option<Candidate>> = candidates.into_iter().map(Some).collect();
    shortlist
        .into_iter()
        .filter_map(|idx| pool[idx].take())
        .collect()
}

/// Normalized `size^bias` weights
///
/// Computed in log space so large |bias| cannot overflow.
fn bucket_weights(sizes: impl Iterator<Item = usize>, bias: f32) -> Vec<f64> {
    let logs: Vec<f64> = sizes.map(|size| f64::from(bias) * (size as f64).ln()).collect();
    let max = logs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let raw: Vec<f64> = logs.iter().map(|l| (l - max).exp()).collect();
    let total: f64 = raw.iter().sum();
    raw.into_iter().map(|w| w / total).collect()
}

/// Descending score, input order on ties
fn sort_by_score(indices: &mut [usize], candidates: &[Candidate]) {
    indices.sort_by(|&a, &b| {
        candidates[b]
            .score
            .total_cmp(&candidates[a].score)
            .then(a.cmp(&b))
    });
}
