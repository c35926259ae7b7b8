//! Track reference normalization
//!
//! Callers hand us track references in three shapes:
//! - bare id: `4uLU6hMCjMI75M1A2tKUQC`
//! - catalog URI: `spotify:track:4uLU6hMCjMI75M1A2tKUQC`
//! - web URL: `https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC?si=abc`
//!
//! All of them collapse to the bare id. Normalization never fails: anything
//! that does not parse falls back to the trimmed input.

use url::Url;

/// URI scheme prefix of the catalog provider
pub const CATALOG_URI_SCHEME: &str = "spotify:";

/// Web host marker of the catalog provider
pub const CATALOG_WEB_HOST: &str = "open.spotify.com";

/// Path component that precedes the id in web URLs
const TRACK_PATH_COMPONENT: &str = "track";

/// Canonicalize a raw track reference to a bare id.
///
/// Returns an empty string for empty or whitespace-only input.
pub fn normalize_track_id(raw: &str) -> String {
    let s = raw.trim();
    if s.is_empty() {
        return String::new();
    }

    if s.starts_with(CATALOG_URI_SCHEME) {
        return s.rsplit(':').next().unwrap_or(s).to_string();
    }

    if s.contains(CATALOG_WEB_HOST) {
        if let Some(id) = track_id_from_url(s) {
            return id;
        }
    }

    s.to_string()
}

/// Segment following `track` in a URL path; scheme-less input is read as https
fn track_id_from_url(raw: &str) -> Option<String> {
    let url = if raw.contains("://") {
        Url::parse(raw)
    } else {
        Url::parse(&format!("https://{}", raw))
    }
    .ok()?;

    let mut segments = url.path_segments()?.filter(|seg| !seg.is_empty());
    segments.by_ref().find(|seg| *seg == TRACK_PATH_COMPONENT)?;
    segments.next().map(str::to_string)
}
