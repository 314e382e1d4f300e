//! Engine tuning parameters
//!
//! The heuristic thresholds here (price pattern, ancestor depth, name
//! length) are empirical; they are configuration rather than contract so
//! callers and tests can tighten or loosen them per site.

use std::time::Duration;

/// Desktop browser identity sent with every request; bare client agents get
/// blocked or served stripped markup without JSON-LD.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Forwarding services tried after (or instead of) the direct fetch. The
/// percent-encoded target URL is appended to each.
pub const DEFAULT_RELAYS: &[&str] = &[
    "https://corsproxy.io/?",
    "https://api.allorigins.win/raw?url=",
];

/// Symbol-prefixed amount ($1,200.00, € 50) or amount followed by a 2-3
/// letter currency code (1200 MXN).
pub const DEFAULT_PRICE_PATTERN: &str =
    r"[$€£]\s?\d{1,3}(?:,\d{3})*(?:\.\d{2})?|\b\d+(?:[.,]\d+)?\s?[A-Z]{2,3}\b";

/// Tuning parameters for one [`Engine`](crate::Engine) instance.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub user_agent: String,
    /// Try fetching the target directly before falling back to relays.
    pub allow_direct: bool,
    /// Relay endpoints, tried in order after the direct path.
    pub relays: Vec<String>,
    /// Issue every retrieval path at once and take the first validated
    /// body instead of falling through sequentially.
    pub race_paths: bool,
    pub attempt_timeout: Duration,
    /// Deadline for the whole fetch phase; expiry fails the run.
    pub overall_deadline: Duration,
    /// Bodies shorter than this are treated as error pages masquerading as
    /// 200 OK.
    pub min_content_length: usize,
    /// Catalog size cap applied before serialization.
    pub max_products: usize,
    /// Description field truncation in the catalog document, in characters.
    pub description_limit: usize,
    /// Ancestor elements examined when hunting for price text near a link.
    pub max_ancestor_depth: usize,
    /// Candidates with shorter names are rejected as implausible.
    pub min_name_length: usize,
    /// Regex source for price-like text; falls back to
    /// [`DEFAULT_PRICE_PATTERN`] if it does not compile.
    pub price_pattern: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            allow_direct: true,
            relays: DEFAULT_RELAYS.iter().map(|r| r.to_string()).collect(),
            race_paths: false,
            attempt_timeout: Duration::from_secs(15),
            overall_deadline: Duration::from_secs(45),
            min_content_length: 500,
            max_products: 80,
            description_limit: 300,
            max_ancestor_depth: 5,
            min_name_length: 3,
            price_pattern: DEFAULT_PRICE_PATTERN.to_string(),
        }
    }
}
