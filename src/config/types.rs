use serde::Deserialize;

/// Main configuration structure for Surface-Scout
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// URL the crawl starts from
    #[serde(rename = "start-url")]
    pub start_url: String,

    #[serde(default)]
    pub crawler: CrawlerConfig,

    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Formats the full user agent string sent with every request
    pub fn user_agent_string(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.user_agent.crawler_name,
            self.user_agent.crawler_version,
            self.user_agent.contact_url,
            self.user_agent.contact_email
        )
    }
}

/// Crawler behavior configuration
///
/// Absent limits mean unbounded: `max-pages` and `max-depth` are optional on
/// purpose, and a configured value of zero for `max-depth` is a real limit
/// (crawl only the start page), not "unset".
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of page records before the crawl stops
    #[serde(rename = "max-pages")]
    pub max_pages: Option<u64>,

    /// Maximum BFS depth from the start URL (0 = start page only)
    #[serde(rename = "max-depth")]
    pub max_depth: Option<u32>,

    /// Minimum time between consecutive requests (milliseconds)
    #[serde(rename = "rate-interval-ms", default = "default_rate_interval_ms")]
    pub rate_interval_ms: u64,

    /// URL patterns a URL must match to be crawled (glob or /regex/)
    #[serde(rename = "include-patterns", default)]
    pub include_patterns: Vec<String>,

    /// URL patterns that reject a URL even when included (glob or /regex/)
    #[serde(rename = "exclude-patterns", default)]
    pub exclude_patterns: Vec<String>,
}

fn default_rate_interval_ms() -> u64 {
    1000
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: None,
            max_depth: None,
            rate_interval_ms: default_rate_interval_ms(),
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default = "default_contact_url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email", default = "default_contact_email")]
    pub contact_email: String,
}

fn default_crawler_name() -> String {
    "surface-scout".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_contact_url() -> String {
    "https://example.com/surface-scout".to_string()
}

fn default_contact_email() -> String {
    "crawler@example.com".to_string()
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: default_contact_url(),
            contact_email: default_contact_email(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the JSON results file
    #[serde(rename = "results-path", default = "default_results_path")]
    pub results_path: String,
}

fn default_results_path() -> String {
    "./crawl-results.json".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_path: default_results_path(),
        }
    }
}
