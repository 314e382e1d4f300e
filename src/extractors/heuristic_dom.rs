//! Heuristic DOM scan for listing pages
//!
//! The minimal signal of a product card is a link wrapping an image with
//! price-like text nearby. The upward walk is depth-bounded so a price in
//! an unrelated page region never claims the link.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::{Candidate, ExtractionContext, Strategy};
use crate::dom;
use crate::urls::resolve_url;

pub(super) fn extract(document: &Html, ctx: &mut ExtractionContext) -> Vec<Candidate> {
    let selector = Selector::parse("a[href]").unwrap();
    let mut found = Vec::new();

    for link in document.select(&selector) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let href = href.trim();
        if href.is_empty() || href == "#" || href.starts_with("javascript:") {
            continue;
        }
        let url = resolve_url(href, &ctx.base);
        if url.is_empty() || url == ctx.base {
            continue;
        }
        if !ctx.url_allowed(&url) || ctx.seen.contains(&url) {
            continue;
        }

        let Some(image) = dom::first_image(link) else {
            continue;
        };
        let Some(price) = price_near(link, ctx.price_pattern(), ctx.config.max_ancestor_depth)
        else {
            continue;
        };
        let Some(name) = candidate_name(link, image, ctx.config.min_name_length) else {
            continue;
        };
        let Some(image_url) = image_source(image)
            .map(|src| resolve_url(&src, &ctx.base))
            .filter(|resolved| !resolved.is_empty())
        else {
            continue;
        };

        ctx.seen.insert(url.clone());
        found.push(Candidate {
            name,
            price,
            currency: None,
            description: String::new(),
            image: image_url,
            url,
            source: Strategy::HeuristicDom,
        });
    }

    found
}

/// Price text on the link itself or on one of its nearest ancestors. The
/// first ancestor whose text matches becomes the card container; beyond
/// `max_depth` the link is not a product card.
fn price_near(link: ElementRef, pattern: &Regex, max_depth: usize) -> Option<String> {
    let own = dom::element_text(link);
    if let Some(hit) = pattern.find(&own) {
        return Some(hit.as_str().to_string());
    }
    for ancestor in dom::ancestor_elements(link).take(max_depth) {
        let text = dom::element_text(ancestor);
        if let Some(hit) = pattern.find(&text) {
            return Some(hit.as_str().to_string());
        }
    }
    None
}

/// Name priority: image alt text, heading-like descendant, link title,
/// link text. Implausibly short names reject the candidate.
fn candidate_name(link: ElementRef, image: ElementRef, min_length: usize) -> Option<String> {
    let raw = image
        .value()
        .attr("alt")
        .filter(|alt| !alt.trim().is_empty())
        .map(str::to_string)
        .or_else(|| dom::first_heading_text(link))
        .or_else(|| {
            link.value()
                .attr("title")
                .filter(|title| !title.trim().is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| dom::element_text(link));
    let name = dom::collapse_whitespace(&raw);
    if name.chars().count() < min_length {
        return None;
    }
    Some(name)
}

/// The lazy-load attribute wins over the eager src, which is frequently a
/// placeholder; `data:` URIs are never usable sources.
fn image_source(image: ElementRef) -> Option<String> {
    let usable = |src: &&str| !src.is_empty() && !src.starts_with("data:");
    if let Some(lazy) = image.value().attr("data-src").map(str::trim).filter(usable) {
        return Some(lazy.to_string());
    }
    if let Some(eager) = image.value().attr("src").map(str::trim).filter(usable) {
        return Some(eager.to_string());
    }
    image
        .value()
        .attr("srcset")
        .and_then(|srcset| srcset.split_whitespace().next())
        .filter(usable)
        .map(str::to_string)
}
