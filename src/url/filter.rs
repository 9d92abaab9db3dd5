//! Include/exclude URL filtering
//!
//! Patterns are either globs (e.g. `**/products/**`) or `/regex/`-delimited
//! literals. Include patterns are evaluated first: when any are configured,
//! a URL must match at least one to proceed. Exclude patterns are evaluated
//! second and reject on any match, regardless of include status.

use crate::UrlError;
use glob::Pattern;
use regex::Regex;

/// A single compiled filter pattern
#[derive(Debug, Clone)]
enum UrlPattern {
    Glob(Pattern),
    Regex(Regex),
}

impl UrlPattern {
    /// Compiles a raw pattern string
    ///
    /// A string wrapped in forward slashes (`/admin.*/`) is treated as a
    /// regular expression; anything else is treated as a glob.
    fn parse(raw: &str) -> Result<Self, UrlError> {
        if raw.len() >= 2 && raw.starts_with('/') && raw.ends_with('/') {
            let body = &raw[1..raw.len() - 1];
            Regex::new(body)
                .map(Self::Regex)
                .map_err(|e| UrlError::InvalidPattern {
                    pattern: raw.to_string(),
                    message: e.to_string(),
                })
        } else {
            Pattern::new(raw)
                .map(Self::Glob)
                .map_err(|e| UrlError::InvalidPattern {
                    pattern: raw.to_string(),
                    message: e.to_string(),
                })
        }
    }

    fn matches(&self, url: &str) -> bool {
        match self {
            Self::Glob(pattern) => pattern.matches(url),
            Self::Regex(regex) => regex.is_match(url),
        }
    }
}

/// Immutable, stateless URL filter built from include/exclude pattern lists
///
/// # Examples
///
/// ```
/// use surface_scout::url::UrlFilter;
///
/// let filter = UrlFilter::new(
///     &["**/products/**".to_string()],
///     &["**/products/hidden/**".to_string()],
/// )
/// .unwrap();
///
/// assert!(filter.should_crawl("https://shop.example/products/x"));
/// assert!(!filter.should_crawl("https://shop.example/products/hidden/y"));
/// ```
#[derive(Debug, Clone)]
pub struct UrlFilter {
    include: Vec<UrlPattern>,
    exclude: Vec<UrlPattern>,
}

impl UrlFilter {
    /// Builds a filter from raw pattern lists, compiling each entry
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self, UrlError> {
        let include = include
            .iter()
            .map(|p| UrlPattern::parse(p))
            .collect::<Result<Vec<_>, _>>()?;
        let exclude = exclude
            .iter()
            .map(|p| UrlPattern::parse(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { include, exclude })
    }

    /// A filter with no patterns, which accepts everything
    pub fn permissive() -> Self {
        Self {
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }

    /// Decides whether a URL is admitted by this filter
    pub fn should_crawl(&self, url: &str) -> bool {
        if !self.include.is_empty() && !self.include.iter().any(|p| p.matches(url)) {
            return false;
        }

        !self.exclude.iter().any(|p| p.matches(url))
    }
}
