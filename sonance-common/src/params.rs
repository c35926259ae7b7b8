//! Recommendation tuning parameters
//!
//! Defaults are compiled in; the `[recommend]` table of the TOML config may
//! override any subset of them. Values are validated once at load, the
//! pipeline stages assume a validated set.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Tunables for the retrieval and reranking pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendParams {
    /// Recall size per requested result (recall = max(k * multiplier, floor))
    pub recall_multiplier: usize,

    /// Minimum recall size regardless of k
    pub recall_floor: usize,

    /// Shortlist size per requested result, input size for final reranking
    pub shortlist_multiplier: usize,

    /// Minimum shortlist size regardless of k
    pub shortlist_floor: usize,

    /// Scale applied to the summed soft priors
    pub prior_boost: f32,

    /// Weight of the Gaussian release-year prior
    pub year_weight: f32,

    /// Weight of the popularity-tier closeness prior
    pub pop_weight: f32,

    /// Standard deviation (years) of the release-year prior
    pub year_sigma: f32,

    /// Penalty for candidates sharing a primary contributor with a seed
    pub seed_artist_penalty: f32,

    /// Score demotion for repeated primary contributors in the ranked list
    pub repeat_artist_penalty: f32,

    /// Ascending finite half-window widths (years) tried by the era filter.
    /// An unbounded window is always tried last.
    pub era_widths: Vec<u32>,

    /// Lower bound of the era filter's keep target before capping by
    /// the shortlist size
    pub era_min_keep: usize,

    /// Seed of the per-call bucket sampler RNG
    pub sampler_seed: u64,
}

impl Default for RecommendParams {
    fn default() -> Self {
        Self {
            recall_multiplier: 64,
            recall_floor: 300,
            shortlist_multiplier: 4,
            shortlist_floor: 50,
            prior_boost: 1.0,
            year_weight: 0.15,
            pop_weight: 0.05,
            year_sigma: 3.5,
            seed_artist_penalty: 0.06,
            repeat_artist_penalty: 0.02,
            era_widths: vec![4, 6, 8, 10, 12, 20],
            era_min_keep: 50,
            sampler_seed: 42,
        }
    }
}

impl RecommendParams {
    /// Number of nearest neighbors fetched in the recall stage for `k` results
    pub fn recall_size(&self, k: usize) -> usize {
        k.saturating_mul(self.recall_multiplier).max(self.recall_floor)
    }

    /// Number of candidates kept by era filtering and bucket sampling for `k` results
    pub fn shortlist_size(&self, k: usize) -> usize {
        k.saturating_mul(self.shortlist_multiplier)
            .max(self.shortlist_floor)
            .max(k)
    }

    /// Check every parameter for range and consistency
    pub fn validate(&self) -> Result<()> {
        if self.recall_multiplier == 0 {
            return Err(Error::InvalidInput("recall_multiplier: must be at least 1".to_string()));
        }
        if self.shortlist_multiplier == 0 {
            return Err(Error::InvalidInput("shortlist_multiplier: must be at least 1".to_string()));
        }

        let floats = [
            ("prior_boost", self.prior_boost),
            ("year_weight", self.year_weight),
            ("pop_weight", self.pop_weight),
            ("year_sigma", self.year_sigma),
            ("seed_artist_penalty", self.seed_artist_penalty),
            ("repeat_artist_penalty", self.repeat_artist_penalty),
        ];
        for (key, value) in floats {
            if !value.is_finite() {
                return Err(Error::InvalidInput(format!("{}: value {} is not finite", key, value)));
            }
        }
        if self.year_sigma <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "year_sigma: value {} must be positive",
                self.year_sigma
            )));
        }
        if self.seed_artist_penalty < 0.0 || self.repeat_artist_penalty < 0.0 {
            return Err(Error::InvalidInput("artist penalties must be non-negative".to_string()));
        }
        if self.era_widths.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::InvalidInput(format!(
                "era_widths: {:?} must be strictly ascending",
                self.era_widths
            )));
        }

        Ok(())
    }
}
