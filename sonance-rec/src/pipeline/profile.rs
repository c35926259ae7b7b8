//! Seed profile aggregation
//!
//! Medians rather than means so one outlier seed cannot drag a multi-seed
//! profile away from the rest.

use crate::store::TrackMetadata;
use std::collections::BTreeSet;

/// Request-scoped aggregate of seed metadata
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    /// Median release year of the seeds
    pub year: Option<i32>,
    /// Median popularity tier of the seeds
    pub pop_bucket: Option<u8>,
    /// Primary contributors of the seeds
    pub seed_artists: BTreeSet<String>,
}

/// Aggregate one or more seed records into a profile
pub fn build_profile<'a>(seeds: impl IntoIterator<Item = &'a TrackMetadata>) -> Profile {
    let mut years = Vec::new();
    let mut pops = Vec::new();
    let mut seed_artists = BTreeSet::new();

    for meta in seeds {
        if let Some(year) = meta.year {
            years.push(i64::from(year));
        }
        if let Some(pop) = meta.pop_bucket {
            pops.push(i64::from(pop));
        }
        if let Some(artist) = meta.primary_artist() {
            seed_artists.insert(artist.to_string());
        }
    }

    Profile {
        year: median_rounded(&mut years).and_then(|y| i32::try_from(y).ok()),
        pop_bucket: median_rounded(&mut pops).and_then(|p| u8::try_from(p).ok()),
        seed_artists,
    }
}

/// Integer median; an even count averages the middle pair, rounding half up
fn median_rounded(values: &mut [i64]) -> Option<i64> {
    if values.is_empty() {
        return None;
    }
    values.sort_unstable();
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        let sum = values[mid - 1] + values[mid];
        Some(sum.div_euclid(2) + sum.rem_euclid(2))
    }
}
