use std::collections::HashSet;
use url::Url;

/// Canonicalizes a URL string into its identity form for deduplication
///
/// # Normalization Steps
///
/// 1. Remove the fragment (everything after #)
/// 2. Preserve the query string verbatim
/// 3. Normalize the path's trailing slash:
///    - A final segment with a file-extension-like suffix (".html", ".php")
///      never carries a trailing slash
///    - A final segment without such a suffix always carries one
///    - The root path is always "/"
///
/// Malformed input is returned unchanged; validating URLs is the caller's
/// responsibility, not this function's.
///
/// The function is pure and idempotent: `normalize(normalize(x)) == normalize(x)`.
///
/// # Examples
///
/// ```
/// use surface_scout::url::normalize;
///
/// assert_eq!(normalize("https://example.com/page#section"), "https://example.com/page/");
/// assert_eq!(normalize("https://example.com/page.html/"), "https://example.com/page.html");
/// assert_eq!(normalize("https://example.com"), "https://example.com/");
/// ```
pub fn normalize(url_str: &str) -> String {
    let mut url = match Url::parse(url_str) {
        Ok(u) => u,
        Err(_) => return url_str.to_string(),
    };

    // Opaque URLs (mailto:, data:) have no host and no path to normalize
    if !url.has_host() {
        return url_str.to_string();
    }

    url.set_fragment(None);

    let normalized_path = normalize_trailing_slash(url.path());
    url.set_path(&normalized_path);

    url.to_string()
}

/// Applies the trailing-slash rule to a URL path
fn normalize_trailing_slash(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');

    // Root path (or only slashes) collapses to "/"
    if trimmed.is_empty() {
        return "/".to_string();
    }

    let last_segment = trimmed.rsplit('/').next().unwrap_or("");

    if has_file_extension(last_segment) {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    }
}

/// Checks whether a path segment ends in a file-extension-like suffix:
/// a dot followed by one or more ASCII alphanumeric characters
fn has_file_extension(segment: &str) -> bool {
    match segment.rsplit_once('.') {
        Some((_, ext)) => !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()),
        None => false,
    }
}

/// Canonicalizes a list of URLs and removes duplicates, preserving
/// first-seen order
///
/// # Examples
///
/// ```
/// use surface_scout::url::deduplicate;
///
/// let urls = vec![
///     "https://a.com/x".to_string(),
///     "https://a.com/x/".to_string(),
///     "https://a.com/x#s".to_string(),
/// ];
/// assert_eq!(deduplicate(&urls).len(), 1);
/// ```
pub fn deduplicate(urls: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut result = Vec::new();

    for url in urls {
        let canonical = normalize(url);
        if seen.insert(canonical.clone()) {
            result.push(canonical);
        }
    }

    result
}
