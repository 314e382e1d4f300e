//! Run orchestration: transport, pipeline, catalog
//!
//! Everything a run touches is created here and dropped when the result is
//! returned; nothing is shared across runs, so one engine instance can
//! serve any number of concurrent scrapes.

use reqwest::Client;
use scraper::Html;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::config::ScrapeConfig;
use crate::error::ScrapeError;
use crate::extractors::{run_pipeline, ExtractionContext};
use crate::transport;
use crate::types::{ScrapeRequest, SiteScrapeResult};
use crate::urls::{resolve_target, site_host};

/// Product extraction engine; holds the HTTP client and tuning parameters.
pub struct Engine {
    config: ScrapeConfig,
    client: Client,
}

impl Engine {
    pub fn new() -> Self {
        Self::with_config(ScrapeConfig::default())
    }

    pub fn with_config(config: ScrapeConfig) -> Self {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .expect("HTTP client construction");
        Self { config, client }
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    /// Run one extraction. Every failure collapses into a `success: false`
    /// result carrying the site name; partial catalogs are never emitted.
    pub async fn scrape(&self, request: &ScrapeRequest) -> SiteScrapeResult {
        let site_name = if request.domain.trim().is_empty() {
            String::new()
        } else {
            site_host(&resolve_target(&request.domain))
        };
        match self.try_scrape(request).await {
            Ok(result) => result,
            Err(err) => {
                warn!(site = %site_name, "scrape failed: {err}");
                SiteScrapeResult::failure(site_name)
            }
        }
    }

    async fn try_scrape(&self, request: &ScrapeRequest) -> Result<SiteScrapeResult, ScrapeError> {
        if request.domain.trim().is_empty() {
            return Err(ScrapeError::EmptyTarget);
        }
        let target = resolve_target(&request.domain);
        let fetch = transport::fetch_markup(&self.client, &self.config, &target);
        let html = match timeout(self.config.overall_deadline, fetch).await {
            Ok(fetched) => fetched?,
            Err(_) => {
                return Err(ScrapeError::DeadlineExceeded {
                    limit: self.config.overall_deadline,
                })
            }
        };
        self.extract_from_html(&html, request)
    }

    /// The transport-free half of a run: pipeline, dedup, serialization.
    /// Public for callers (and tests) that bring their own markup.
    pub fn extract_from_html(
        &self,
        html: &str,
        request: &ScrapeRequest,
    ) -> Result<SiteScrapeResult, ScrapeError> {
        let target = resolve_target(&request.domain);
        let document = Html::parse_document(html);
        let mut ctx = ExtractionContext::new(
            target.clone(),
            request.url_pattern.as_deref(),
            request.match_mode,
            &self.config,
        );

        let candidates = run_pipeline(&document, &mut ctx);
        if candidates.is_empty() {
            return Err(ScrapeError::NoCandidates);
        }

        let catalog = Catalog::from_candidates(candidates, self.config.max_products);
        debug!(site = %target, count = catalog.len(), "catalog assembled");
        let (xml, last_product) = catalog.serialize(&target, self.config.description_limit);

        Ok(SiteScrapeResult {
            success: true,
            site_name: site_host(&target),
            product_count: catalog.len(),
            xml: Some(xml),
            last_product,
        })
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot convenience over a default engine.
pub async fn scrape_site(request: &ScrapeRequest) -> SiteScrapeResult {
    Engine::new().scrape(request).await
}
