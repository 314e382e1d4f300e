//! OpenGraph single-product page extraction
//!
//! Applies only when the page-level type marker is `product`. Title and
//! price are both required; there are no partial records.

use std::collections::HashMap;

use scraper::{Html, Selector};

use super::{Candidate, ExtractionContext, Strategy};
use crate::urls::resolve_url;

pub(super) fn extract(document: &Html, ctx: &mut ExtractionContext) -> Vec<Candidate> {
    let selector = Selector::parse("meta[property]").unwrap();
    let mut tags: HashMap<&str, &str> = HashMap::new();
    for element in document.select(&selector) {
        if let (Some(property), Some(content)) = (
            element.value().attr("property"),
            element.value().attr("content"),
        ) {
            tags.entry(property).or_insert(content);
        }
    }

    if tags.get("og:type").copied() != Some("product") {
        return Vec::new();
    }
    let (Some(title), Some(price)) = (
        tags.get("og:title").copied(),
        tags.get("product:price:amount").copied(),
    ) else {
        return Vec::new();
    };

    let url = resolve_url(tags.get("og:url").copied().unwrap_or(""), &ctx.base);
    let url = if url.is_empty() { ctx.base.clone() } else { url };
    if !ctx.url_allowed(&url) || ctx.seen.contains(&url) {
        return Vec::new();
    }

    let candidate = Candidate {
        name: title.to_string(),
        price: price.to_string(),
        currency: tags
            .get("product:price:currency")
            .map(|currency| currency.to_string()),
        description: String::new(),
        image: resolve_url(tags.get("og:image").copied().unwrap_or(""), &ctx.base),
        url,
        source: Strategy::OpenGraph,
    };
    ctx.seen.insert(candidate.url.clone());
    vec![candidate]
}
