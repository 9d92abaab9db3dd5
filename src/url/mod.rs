//! URL handling module for Surface-Scout
//!
//! This module provides URL canonicalization, deduplication, origin
//! comparison, and include/exclude filtering.

mod filter;
mod normalize;

pub use filter::UrlFilter;
pub use normalize::{deduplicate, normalize};

use crate::{UrlError, UrlResult};
use url::Url;

/// Returns the ASCII origin (scheme + host + port) of a URL
///
/// # Arguments
///
/// * `url_str` - The URL to extract the origin from
///
/// # Returns
///
/// * `Ok(String)` - The origin, e.g. "https://example.com"
/// * `Err(UrlError)` - The URL is malformed, non-HTTP(S), or has no host
pub fn origin_of(url_str: &str) -> UrlResult<String> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if !url.has_host() {
        return Err(UrlError::MissingHost);
    }

    Ok(url.origin().ascii_serialization())
}

/// Checks whether two URLs share the same origin (scheme, host, and port)
///
/// Malformed input on either side is treated as a different origin.
pub fn same_origin(a: &str, b: &str) -> bool {
    match (Url::parse(a), Url::parse(b)) {
        (Ok(left), Ok(right)) => left.origin() == right.origin(),
        _ => false,
    }
}
