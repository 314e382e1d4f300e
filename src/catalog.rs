//! Candidate merging and catalog document rendering
//!
//! The catalog document is the hand-off artifact consumed downstream as
//! trusted inventory context; its element layout must stay stable.

use std::collections::HashSet;

use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::escape::escape;

use crate::extractors::Candidate;
use crate::types::ProductPreview;

/// Final, deduplicated, capped product list for one run. Owns its
/// candidates exclusively; serialized once, then the run ends.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<Candidate>,
}

impl Catalog {
    /// Merge candidates: structured data outranks later stages (stable
    /// sort, so discovery order is kept within a stage), first seen wins
    /// among URL duplicates, and the list is capped.
    pub fn from_candidates(candidates: Vec<Candidate>, cap: usize) -> Self {
        let mut ordered = candidates;
        ordered.sort_by_key(|candidate| candidate.source.rank());

        let mut claimed = HashSet::new();
        let mut items = Vec::new();
        for candidate in ordered {
            if !claimed.insert(candidate.url.clone()) {
                continue;
            }
            items.push(candidate);
            if items.len() == cap {
                break;
            }
        }
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Candidate] {
        &self.items
    }

    /// Escaped catalog document plus the preview entry, stamped with the
    /// current time.
    pub fn serialize(&self, source: &str, description_limit: usize) -> (String, Option<ProductPreview>) {
        (
            self.render(source, Utc::now(), description_limit),
            self.preview(),
        )
    }

    /// Deterministic rendering; only the timestamp varies between calls.
    pub fn render(
        &self,
        source: &str,
        scraped_at: DateTime<Utc>,
        description_limit: usize,
    ) -> String {
        let mut xml = String::new();
        xml.push_str("<catalog>\n");
        xml.push_str("    <meta>\n");
        xml.push_str(&format!("        <source>{}</source>\n", escape(source)));
        xml.push_str(&format!(
            "        <scraped_at>{}</scraped_at>\n",
            scraped_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        ));
        xml.push_str("    </meta>\n");
        xml.push_str("    <products>\n");
        for item in &self.items {
            let description: String = item.description.chars().take(description_limit).collect();
            xml.push_str("        <product>\n");
            xml.push_str(&format!(
                "            <name>{}</name>\n",
                escape(item.name.as_str())
            ));
            xml.push_str(&format!(
                "            <price currency=\"{}\">{}</price>\n",
                escape(item.currency.as_deref().unwrap_or("")),
                escape(item.price.as_str())
            ));
            xml.push_str(&format!(
                "            <description>{}</description>\n",
                escape(description.as_str())
            ));
            xml.push_str(&format!(
                "            <link>{}</link>\n",
                escape(item.url.as_str())
            ));
            xml.push_str(&format!(
                "            <image>{}</image>\n",
                escape(item.image.as_str())
            ));
            xml.push_str("        </product>\n");
        }
        xml.push_str("    </products>\n");
        xml.push_str("</catalog>");
        xml
    }

    /// The most recently discovered entry in final order -- a deliberate
    /// "latest" indicator rather than a ranked best pick.
    pub fn preview(&self) -> Option<ProductPreview> {
        self.items.last().map(|item| ProductPreview {
            name: item.name.clone(),
            price: format!("{} {}", item.price, item.currency.as_deref().unwrap_or(""))
                .trim()
                .to_string(),
            image: item.image.clone(),
            link: item.url.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::Strategy;
    use chrono::TimeZone;

    fn candidate(name: &str, url: &str, source: Strategy) -> Candidate {
        Candidate {
            name: name.to_string(),
            price: "9.99".to_string(),
            currency: Some("USD".to_string()),
            description: String::new(),
            image: format!("https://shop.test/img/{name}.jpg"),
            url: url.to_string(),
            source,
        }
    }

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn structured_data_wins_url_ties_across_stages() {
        let merged = Catalog::from_candidates(
            vec![
                candidate("guess", "https://shop.test/p/1", Strategy::HeuristicDom),
                candidate("known", "https://shop.test/p/1", Strategy::StructuredData),
            ],
            80,
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(merged.items()[0].name, "known");
        assert_eq!(merged.items()[0].source, Strategy::StructuredData);
    }

    #[test]
    fn first_seen_wins_within_a_stage() {
        let merged = Catalog::from_candidates(
            vec![
                candidate("first", "https://shop.test/p/1", Strategy::StructuredData),
                candidate("second", "https://shop.test/p/1", Strategy::StructuredData),
                candidate("third", "https://shop.test/p/2", Strategy::StructuredData),
            ],
            80,
        );
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.items()[0].name, "first");
    }

    #[test]
    fn catalog_is_capped_before_serialization() {
        let many: Vec<Candidate> = (0..100)
            .map(|i| {
                candidate(
                    &format!("item-{i}"),
                    &format!("https://shop.test/p/{i}"),
                    Strategy::StructuredData,
                )
            })
            .collect();
        let merged = Catalog::from_candidates(many, 80);
        assert_eq!(merged.len(), 80);
        let xml = merged.render("https://shop.test", fixed_time(), 300);
        assert_eq!(xml.matches("<product>").count(), 80);
    }

    #[test]
    fn rendering_is_deterministic_for_a_fixed_timestamp() {
        let merged = Catalog::from_candidates(
            vec![candidate("only", "https://shop.test/p/1", Strategy::OpenGraph)],
            80,
        );
        let first = merged.render("https://shop.test", fixed_time(), 300);
        let second = merged.render("https://shop.test", fixed_time(), 300);
        assert_eq!(first, second);
        assert!(first.contains("<scraped_at>2024-05-01T12:00:00Z</scraped_at>"));
        assert!(first.contains("<source>https://shop.test</source>"));
    }

    #[test]
    fn metacharacters_escape_and_round_trip() {
        let mut spiky = candidate("x", "https://shop.test/p/1", Strategy::StructuredData);
        spiky.name = r#"Cable <3m> & "plug" 'EU'"#.to_string();
        let merged = Catalog::from_candidates(vec![spiky], 80);
        let xml = merged.render("https://shop.test", fixed_time(), 300);

        let start = xml.find("<name>").unwrap() + "<name>".len();
        let end = xml.find("</name>").unwrap();
        let escaped = &xml[start..end];
        assert_eq!(escaped, "Cable &lt;3m&gt; &amp; &quot;plug&quot; &apos;EU&apos;");
        assert_eq!(
            quick_xml::escape::unescape(escaped).unwrap(),
            r#"Cable <3m> & "plug" 'EU'"#
        );
    }

    #[test]
    fn description_is_truncated_before_escaping() {
        let mut wordy = candidate("x", "https://shop.test/p/1", Strategy::StructuredData);
        wordy.description = "d".repeat(400);
        let merged = Catalog::from_candidates(vec![wordy], 80);
        let xml = merged.render("https://shop.test", fixed_time(), 300);
        assert!(xml.contains(&format!("<description>{}</description>", "d".repeat(300))));
    }

    #[test]
    fn preview_is_the_last_entry_with_joined_price() {
        let mut bare = candidate("tail", "https://shop.test/p/2", Strategy::HeuristicDom);
        bare.currency = None;
        bare.price = "$5.00".to_string();
        let merged = Catalog::from_candidates(
            vec![
                candidate("head", "https://shop.test/p/1", Strategy::HeuristicDom),
                bare,
            ],
            80,
        );
        let preview = merged.preview().unwrap();
        assert_eq!(preview.name, "tail");
        assert_eq!(preview.price, "$5.00");
        assert_eq!(preview.link, "https://shop.test/p/2");

        let with_currency = Catalog::from_candidates(
            vec![candidate("solo", "https://shop.test/p/9", Strategy::StructuredData)],
            80,
        );
        assert_eq!(with_currency.preview().unwrap().price, "9.99 USD");
    }

    #[test]
    fn empty_catalog_has_no_preview() {
        let empty = Catalog::from_candidates(Vec::new(), 80);
        assert!(empty.is_empty());
        assert!(empty.preview().is_none());
    }
}
