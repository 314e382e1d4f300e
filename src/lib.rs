//! Product catalog extraction from arbitrary e-commerce HTML
//!
//! Given a site identifier and an optional URL-pattern filter, fetches the
//! page through an ordered chain of retrieval paths and recovers product
//! listings via three extraction strategies, cheapest first:
//! - JSON-LD structured data (Product / ProductGroup, with @graph support)
//! - OpenGraph meta tags (single-product pages)
//! - Heuristic DOM scan (image-bearing links with nearby price text)
//!
//! The result is an escaped XML catalog document plus a preview record.

pub mod catalog;
pub mod config;
pub mod dom;
pub mod engine;
pub mod error;
pub mod extractors;
pub mod matcher;
pub mod transport;
pub mod types;
pub mod urls;

pub use catalog::Catalog;
pub use config::ScrapeConfig;
pub use engine::{scrape_site, Engine};
pub use error::ScrapeError;
pub use extractors::{Candidate, ExtractionContext, Strategy};
pub use matcher::url_matches;
pub use types::{MatchMode, ProductPreview, ScrapeRequest, SiteScrapeResult};
pub use urls::{resolve_target, resolve_url};
