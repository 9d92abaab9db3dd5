//! Robots.txt compliance
//!
//! A checker is constructed per base origin and fetches `{origin}/robots.txt`
//! once. Any retrieval or parse problem degrades to a permissive checker
//! (allow-all) with an observable warning: the crawl is never blocked on
//! robots.txt unavailability.

mod parser;

pub use parser::ParsedRobots;

use reqwest::Client;

/// Per-origin robots.txt compliance checker
#[derive(Debug, Clone)]
pub struct RobotsChecker {
    robots: ParsedRobots,
    user_agent: String,
    warning: Option<String>,
}

impl RobotsChecker {
    /// Fetches and parses robots.txt for an origin, failing open
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP transport for the single robots.txt GET
    /// * `origin` - Base origin, e.g. "https://example.com"
    /// * `user_agent` - User agent string used for permission checks
    ///
    /// Never fails: transport errors, non-2xx responses, and unreadable
    /// bodies all produce a permissive checker carrying a warning.
    pub async fn for_origin(client: &Client, origin: &str, user_agent: &str) -> Self {
        let robots_url = format!("{}/robots.txt", origin.trim_end_matches('/'));

        match client.get(&robots_url).send().await {
            Ok(response) if response.status().is_success() => match response.text().await {
                Ok(content) => {
                    tracing::debug!("Loaded robots.txt from {}", robots_url);
                    Self {
                        robots: ParsedRobots::from_content(&content),
                        user_agent: user_agent.to_string(),
                        warning: None,
                    }
                }
                Err(e) => Self::permissive_with_warning(
                    user_agent,
                    format!("Failed to read robots.txt body from {}: {}", robots_url, e),
                ),
            },
            Ok(response) => Self::permissive_with_warning(
                user_agent,
                format!(
                    "robots.txt at {} returned HTTP {}",
                    robots_url,
                    response.status().as_u16()
                ),
            ),
            Err(e) => Self::permissive_with_warning(
                user_agent,
                format!("Failed to fetch robots.txt from {}: {}", robots_url, e),
            ),
        }
    }

    /// A checker that allows every URL
    pub fn permissive(user_agent: &str) -> Self {
        Self {
            robots: ParsedRobots::allow_all(),
            user_agent: user_agent.to_string(),
            warning: None,
        }
    }

    fn permissive_with_warning(user_agent: &str, warning: String) -> Self {
        tracing::warn!("{}; continuing with allow-all", warning);
        Self {
            robots: ParsedRobots::allow_all(),
            user_agent: user_agent.to_string(),
            warning: Some(warning),
        }
    }

    /// The degraded-mode warning, if robots.txt could not be used
    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    /// Checks if a URL is allowed for the configured user agent
    pub fn is_allowed(&self, url: &str) -> bool {
        self.robots.is_allowed(url, &self.user_agent)
    }
}
