//! Request and result types exchanged with the orchestration layer
//!
//! Wire names are camelCase to match the consuming layer; match modes
//! travel as SCREAMING_SNAKE_CASE tokens.

use serde::{Deserialize, Serialize};

/// Comparison semantics applied when filtering candidate URLs against a
/// user-supplied pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchMode {
    #[default]
    Contains,
    StartsWith,
    EndsWith,
}

/// One extraction run over a single site. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRequest {
    /// Domain or full URL of the target site.
    pub domain: String,
    /// Candidate URLs must match this pattern under `match_mode`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_pattern: Option<String>,
    #[serde(default)]
    pub match_mode: MatchMode,
}

impl ScrapeRequest {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            url_pattern: None,
            match_mode: MatchMode::default(),
        }
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>, mode: MatchMode) -> Self {
        self.url_pattern = Some(pattern.into());
        self.match_mode = mode;
        self
    }
}

/// Preview of the most recently discovered product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPreview {
    pub name: String,
    /// Price joined with its currency by a single space, trimmed.
    pub price: String,
    pub image: String,
    pub link: String,
}

/// The sole externally visible outcome of one extraction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteScrapeResult {
    pub success: bool,
    /// Host component of the resolved target.
    pub site_name: String,
    pub product_count: usize,
    /// Escaped catalog document; absent on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xml: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_product: Option<ProductPreview>,
}

impl SiteScrapeResult {
    /// Failure shape shared by every error path: no catalog, no preview.
    pub(crate) fn failure(site_name: impl Into<String>) -> Self {
        Self {
            success: false,
            site_name: site_name.into(),
            product_count: 0,
            xml: None,
            last_product: None,
        }
    }
}
