//! Track metadata records and their coercion rules
//!
//! The metadata file is produced by an offline job and is loosely typed:
//! years arrive as integers, floats or date strings, popularity tiers as
//! integers or digit strings, contributor lists as arrays or delimited
//! strings. Every field is coerced once at load; anything that does not fit
//! becomes "unknown" (`None` / empty) instead of an error.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;
use std::ops::RangeInclusive;

/// Highest popularity tier
pub const MAX_POP_BUCKET: u8 = 10;

/// Release years outside this range are treated as unknown
pub const VALID_YEARS: RangeInclusive<i32> = 1000..=9999;

/// Metadata for one catalog track
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TrackMetadata {
    /// Display title
    #[serde(default, deserialize_with = "coerce_title")]
    pub title: Option<String>,

    /// Contributor names; the first entry is the primary contributor
    #[serde(default, alias = "artists", deserialize_with = "coerce_string_list")]
    pub artist_names: Vec<String>,

    /// Release year
    #[serde(default, deserialize_with = "coerce_year")]
    pub year: Option<i32>,

    /// Popularity tier (0-10)
    #[serde(default, deserialize_with = "coerce_pop_bucket")]
    pub pop_bucket: Option<u8>,

    /// Tag list, frequently empty upstream
    #[serde(default, rename = "genres", alias = "tags", deserialize_with = "coerce_string_list")]
    pub tags: Vec<String>,
}

/// Shared record for tracks without metadata
pub static EMPTY_METADATA: TrackMetadata = TrackMetadata {
    title: None,
    artist_names: Vec::new(),
    year: None,
    pop_bucket: None,
    tags: Vec::new(),
};

impl TrackMetadata {
    /// First listed contributor, used as the diversity key
    pub fn primary_artist(&self) -> Option<&str> {
        self.artist_names.first().map(String::as_str)
    }

    /// Case-insensitive, trimmed tag membership
    pub fn has_tag(&self, tag: &str) -> bool {
        let needle = tag.trim().to_lowercase();
        self.tags.iter().any(|t| t.trim().to_lowercase() == needle)
    }
}

/// Read-only metadata access used by the pipeline stages
pub trait MetadataLookup {
    /// Metadata for `id`, if the catalog has any
    fn metadata(&self, id: &str) -> Option<&TrackMetadata>;

    /// Metadata for `id`, or the shared empty record
    fn metadata_or_empty(&self, id: &str) -> &TrackMetadata {
        self.metadata(id).unwrap_or(&EMPTY_METADATA)
    }
}

impl MetadataLookup for HashMap<String, TrackMetadata> {
    fn metadata(&self, id: &str) -> Option<&TrackMetadata> {
        self.get(id)
    }
}

// ============================================================================
// Coercion helpers
// ============================================================================

/// Integer view of a JSON number or digit string
fn value_to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        Value::String(s) => {
            let s = s.trim();
            if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
                s.parse().ok()
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Year from an integer, integral float, or date-like string ("1999-05-01")
///
/// Values outside [`VALID_YEARS`] are unknown.
pub fn year_from_value(value: &Value) -> Option<i32> {
    let year = match value {
        Value::String(s) => value_to_i64(&Value::String(s.split('-').next().unwrap_or("").to_string())),
        other => value_to_i64(other),
    }?;
    i32::try_from(year).ok().filter(|y| VALID_YEARS.contains(y))
}

/// Popularity tier within 0..=10
pub fn pop_bucket_from_value(value: &Value) -> Option<u8> {
    value_to_i64(value)
        .filter(|p| (0..=MAX_POP_BUCKET as i64).contains(p))
        .map(|p| p as u8)
}

/// String list from an array (non-strings skipped) or a `,`/`;` delimited string
pub fn string_list_from_value(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Value::String(s) => s
            .split([',', ';'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn coerce_title<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn coerce_year<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i32>, D::Error> {
    Ok(year_from_value(&Value::deserialize(deserializer)?))
}

fn coerce_pop_bucket<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u8>, D::Error> {
    Ok(pop_bucket_from_value(&Value::deserialize(deserializer)?))
}

fn coerce_string_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(string_list_from_value(&Value::deserialize(deserializer)?))
}
