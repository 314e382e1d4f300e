//! JSON-LD Product / ProductGroup extraction
//!
//! Scans every `script[type="application/ld+json"]` block, including
//! `@graph` wrappers and top-level arrays. A malformed block is skipped on
//! its own; the remaining blocks still contribute.

use scraper::{Html, Selector};
use serde_json::Value;
use tracing::debug;

use super::{Candidate, ExtractionContext, Strategy};
use crate::urls::resolve_url;

pub(super) fn extract(document: &Html, ctx: &mut ExtractionContext) -> Vec<Candidate> {
    let selector = Selector::parse(r#"script[type="application/ld+json"]"#).unwrap();
    let mut found = Vec::new();

    for element in document.select(&selector) {
        let raw = element.text().collect::<String>();
        let cleaned = sanitize(&raw);
        if cleaned.trim().is_empty() {
            continue;
        }
        let data: Value = match serde_json::from_str(&cleaned) {
            Ok(value) => value,
            Err(err) => {
                debug!("skipping malformed structured-data block: {err}");
                continue;
            }
        };
        visit(&data, ctx, &mut found);
    }

    found
}

/// Strip control characters that break JSON parsing in the wild.
fn sanitize(raw: &str) -> String {
    raw.chars()
        .filter(|&c| !matches!(c, '\u{0000}'..='\u{001f}' | '\u{007f}'..='\u{009f}'))
        .collect()
}

/// Walk top-level arrays, `@graph` wrappers and plain nodes.
fn visit(value: &Value, ctx: &mut ExtractionContext, found: &mut Vec<Candidate>) {
    match value {
        Value::Array(items) => {
            for item in items {
                visit(item, ctx, found);
            }
        }
        Value::Object(object) => {
            if let Some(Value::Array(graph)) = object.get("@graph") {
                for item in graph {
                    visit(item, ctx, found);
                }
            }
            if let Some(candidate) = promote(value, ctx) {
                ctx.seen.insert(candidate.url.clone());
                found.push(candidate);
            }
        }
        _ => {}
    }
}

/// Promote a node to a candidate once name, price and URL check out.
/// Shape is never trusted at parse time: every field is optional until
/// validated here.
fn promote(node: &Value, ctx: &ExtractionContext) -> Option<Candidate> {
    let node_type = match node.get("@type") {
        Some(Value::String(single)) => single.clone(),
        Some(Value::Array(types)) => types.first()?.as_str()?.to_string(),
        _ => return None,
    };
    if node_type != "Product" && node_type != "ProductGroup" {
        return None;
    }

    let offer = first_offer(node);

    // The offer URL is the most specific (variant-level) location.
    let raw_url = offer
        .and_then(|o| text_field(o, "url"))
        .or_else(|| text_field(node, "url"))
        .or_else(|| text_field(node, "mainEntityOfPage"))?;
    let url = resolve_url(&raw_url, &ctx.base);
    if url.is_empty() || url == ctx.base {
        return None;
    }
    if !ctx.url_allowed(&url) || ctx.seen.contains(&url) {
        return None;
    }

    let name = text_field(node, "name")
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())?;
    let price = offer
        .and_then(|o| scalar_field(o, "price").or_else(|| scalar_field(o, "highPrice")))
        .unwrap_or_else(|| "N/A".to_string());
    let currency = offer.and_then(|o| text_field(o, "priceCurrency"));
    let image = first_string(node.get("image"))
        .map(|raw| resolve_url(&raw, &ctx.base))
        .unwrap_or_default();
    let description = text_field(node, "description").unwrap_or_default();

    Some(Candidate {
        name,
        price,
        currency,
        description,
        image,
        url,
        source: Strategy::StructuredData,
    })
}

/// First offer, whether `offers` is a single object or an array.
fn first_offer(node: &Value) -> Option<&Value> {
    match node.get("offers") {
        Some(Value::Array(offers)) => offers.first(),
        Some(offer @ Value::Object(_)) => Some(offer),
        _ => None,
    }
}

fn text_field(node: &Value, key: &str) -> Option<String> {
    node.get(key)?.as_str().map(String::from)
}

/// String or number; prices appear as both in the wild.
fn scalar_field(node: &Value, key: &str) -> Option<String> {
    match node.get(key)? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// First string from a value that is either a string or an array of them.
fn first_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(single) => Some(single.clone()),
        Value::Array(items) => items.first()?.as_str().map(String::from),
        _ => None,
    }
}
