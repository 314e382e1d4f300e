//! Extraction strategies and the ordered pipeline over them
//!
//! Each stage produces zero or more candidates; the pipeline exits at the
//! first stage that yields anything, so a cheap reliable match pre-empts
//! the expensive guesswork of the later stages.

mod heuristic_dom;
mod open_graph;
mod structured_data;

use std::collections::HashSet;

use regex::Regex;
use scraper::Html;
use serde::Serialize;
use tracing::debug;

use crate::config::{ScrapeConfig, DEFAULT_PRICE_PATTERN};
use crate::matcher::url_matches;
use crate::types::MatchMode;

/// Which stage produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    StructuredData,
    OpenGraph,
    HeuristicDom,
}

impl Strategy {
    /// Pipeline order: cheapest and most reliable first.
    pub const ORDERED: [Strategy; 3] = [
        Strategy::StructuredData,
        Strategy::OpenGraph,
        Strategy::HeuristicDom,
    ];

    /// Trust rank used when merging candidates; lower sorts first.
    pub fn rank(self) -> u8 {
        match self {
            Strategy::StructuredData => 0,
            Strategy::OpenGraph => 1,
            Strategy::HeuristicDom => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Strategy::StructuredData => "structured-data",
            Strategy::OpenGraph => "open-graph",
            Strategy::HeuristicDom => "heuristic-dom",
        }
    }

    fn run(self, document: &Html, ctx: &mut ExtractionContext) -> Vec<Candidate> {
        match self {
            Strategy::StructuredData => structured_data::extract(document, ctx),
            Strategy::OpenGraph => open_graph::extract(document, ctx),
            Strategy::HeuristicDom => heuristic_dom::extract(document, ctx),
        }
    }
}

/// An unconfirmed product record produced by a stage, prior to
/// deduplication and serialization. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub name: String,
    pub price: String,
    pub currency: Option<String>,
    pub description: String,
    /// Resolved, absolute image URL; may be empty for structured data.
    pub image: String,
    /// Resolved, absolute detail-page URL; candidate identity.
    pub url: String,
    pub source: Strategy,
}

/// Per-run state passed explicitly into every stage.
pub struct ExtractionContext<'a> {
    /// Resolution base for every relative link in the document.
    pub base: String,
    pattern: Option<&'a str>,
    mode: MatchMode,
    /// Resolved URLs already claimed by an earlier candidate.
    pub seen: HashSet<String>,
    pub config: &'a ScrapeConfig,
    price_pattern: Regex,
}

impl<'a> ExtractionContext<'a> {
    pub fn new(
        base: String,
        pattern: Option<&'a str>,
        mode: MatchMode,
        config: &'a ScrapeConfig,
    ) -> Self {
        let price_pattern = Regex::new(&config.price_pattern)
            .unwrap_or_else(|_| Regex::new(DEFAULT_PRICE_PATTERN).unwrap());
        Self {
            base,
            pattern: pattern.filter(|p| !p.trim().is_empty()),
            mode,
            seen: HashSet::new(),
            config,
            price_pattern,
        }
    }

    /// Pattern filter applied by every stage before promoting a candidate.
    pub fn url_allowed(&self, url: &str) -> bool {
        url_matches(url, self.pattern, self.mode)
    }

    pub fn price_pattern(&self) -> &Regex {
        &self.price_pattern
    }
}

/// Run the stages in order, stopping at the first that yields candidates.
pub fn run_pipeline(document: &Html, ctx: &mut ExtractionContext) -> Vec<Candidate> {
    for strategy in Strategy::ORDERED {
        let found = strategy.run(document, ctx);
        if !found.is_empty() {
            debug!(stage = strategy.name(), count = found.len(), "stage yielded candidates");
            return found;
        }
        debug!(stage = strategy.name(), "stage yielded nothing");
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HYBRID_PAGE: &str = r#"
    <html>
    <head>
        <script type="application/ld+json">
        {"@type": "Product", "name": "Wireless Mouse",
         "offers": {"price": "19.99", "priceCurrency": "USD"},
         "url": "/p/mouse-1"}
        </script>
    </head>
    <body>
        <div class="card">
            <a href="/p/keyboard-2"><img src="/kb.jpg" alt="Mechanical Keyboard"></a>
            <span>$59.99</span>
        </div>
    </body>
    </html>
    "#;

    #[test]
    fn structured_data_preempts_the_heuristic_stage() {
        let config = ScrapeConfig::default();
        let mut ctx = ExtractionContext::new(
            "https://shop.test".to_string(),
            None,
            MatchMode::Contains,
            &config,
        );
        let document = Html::parse_document(HYBRID_PAGE);
        let found = run_pipeline(&document, &mut ctx);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].source, Strategy::StructuredData);
        assert_eq!(found[0].url, "https://shop.test/p/mouse-1");
    }

    #[test]
    fn empty_page_exhausts_every_stage() {
        let config = ScrapeConfig::default();
        let mut ctx = ExtractionContext::new(
            "https://shop.test".to_string(),
            None,
            MatchMode::Contains,
            &config,
        );
        let document = Html::parse_document("<html><body><p>nothing here</p></body></html>");
        assert!(run_pipeline(&document, &mut ctx).is_empty());
    }

    #[test]
    fn blank_pattern_is_treated_as_absent() {
        let config = ScrapeConfig::default();
        let ctx = ExtractionContext::new(
            "https://shop.test".to_string(),
            Some("  "),
            MatchMode::Contains,
            &config,
        );
        // The default filter applies, not a substring test against "  ".
        assert!(ctx.url_allowed("https://shop.test/p/1"));
        assert!(!ctx.url_allowed("https://shop.test/cart"));
    }

    #[test]
    fn invalid_price_pattern_falls_back_to_default() {
        let config = ScrapeConfig {
            price_pattern: "([unclosed".to_string(),
            ..ScrapeConfig::default()
        };
        let ctx = ExtractionContext::new(
            "https://shop.test".to_string(),
            None,
            MatchMode::Contains,
            &config,
        );
        assert!(ctx.price_pattern().is_match("$19.99"));
    }

    #[test]
    fn strategy_ranks_follow_pipeline_order() {
        assert!(Strategy::StructuredData.rank() < Strategy::OpenGraph.rank());
        assert!(Strategy::OpenGraph.rank() < Strategy::HeuristicDom.rank());
    }
}
