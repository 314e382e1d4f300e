//! Ordered retrieval paths with first-validated-response-wins semantics
//!
//! A direct fetch is tried first when permitted, then each relay endpoint.
//! Every path gets exactly one attempt; resilience comes from the ordered
//! fallback list, not retries.

use futures::stream::{FuturesUnordered, StreamExt};
use reqwest::Client;
use tracing::{debug, warn};
use url::form_urlencoded;

use crate::config::ScrapeConfig;
use crate::error::ScrapeError;

const ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "es-419,es;q=0.9,en;q=0.8";

/// One way of obtaining the target's markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchPath {
    /// Plain GET against the resolved target.
    Direct,
    /// GET through a forwarding service that proxies the target on the
    /// caller's behalf.
    Relay { endpoint: String },
}

impl FetchPath {
    /// Full request URL for this path.
    pub fn request_url(&self, target: &str) -> String {
        match self {
            FetchPath::Direct => target.to_string(),
            FetchPath::Relay { endpoint } => {
                let encoded: String =
                    form_urlencoded::byte_serialize(target.as_bytes()).collect();
                format!("{endpoint}{encoded}")
            }
        }
    }
}

/// Build the ordered path list for a run.
pub fn fetch_paths(config: &ScrapeConfig) -> Vec<FetchPath> {
    let mut paths = Vec::new();
    if config.allow_direct {
        paths.push(FetchPath::Direct);
    }
    paths.extend(config.relays.iter().map(|endpoint| FetchPath::Relay {
        endpoint: endpoint.clone(),
    }));
    paths
}

/// Reject error pages masquerading as 200 OK: sub-threshold bodies and
/// proxy block pages.
pub fn body_is_usable(body: &str, min_length: usize) -> bool {
    body.len() >= min_length && !body.to_lowercase().contains("access denied")
}

/// Fetch markup for `target`, trying each path once in order, or racing
/// them all when configured. Returns the first body that passes validation.
pub async fn fetch_markup(
    client: &Client,
    config: &ScrapeConfig,
    target: &str,
) -> Result<String, ScrapeError> {
    let paths = fetch_paths(config);
    if config.race_paths {
        let mut attempts: FuturesUnordered<_> = paths
            .iter()
            .map(|path| try_path(client, config, path, target))
            .collect();
        while let Some(outcome) = attempts.next().await {
            match outcome {
                Ok(html) => return Ok(html),
                Err(reason) => warn!("retrieval path failed: {reason}"),
            }
        }
    } else {
        for path in &paths {
            match try_path(client, config, path, target).await {
                Ok(html) => return Ok(html),
                Err(reason) => warn!("retrieval path failed: {reason}"),
            }
        }
    }
    Err(ScrapeError::TransportExhausted {
        target: target.to_string(),
    })
}

async fn try_path(
    client: &Client,
    config: &ScrapeConfig,
    path: &FetchPath,
    target: &str,
) -> Result<String, String> {
    let request_url = path.request_url(target);
    debug!(url = %request_url, "trying retrieval path");
    let response = client
        .get(&request_url)
        .header("Accept", ACCEPT)
        .header("Accept-Language", ACCEPT_LANGUAGE)
        .header("Cache-Control", "no-cache")
        .timeout(config.attempt_timeout)
        .send()
        .await
        .map_err(|err| format!("{request_url}: {err}"))?;

    let status = response.status();
    if !status.is_success() {
        return Err(format!("{request_url}: HTTP {status}"));
    }

    let body = response
        .text()
        .await
        .map_err(|err| format!("{request_url}: {err}"))?;
    if !body_is_usable(&body, config.min_content_length) {
        return Err(format!(
            "{request_url}: body failed validation ({} bytes)",
            body.len()
        ));
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_keep_direct_first_then_relays_in_order() {
        let config = ScrapeConfig::default();
        let paths = fetch_paths(&config);
        assert_eq!(paths[0], FetchPath::Direct);
        assert_eq!(
            paths[1],
            FetchPath::Relay {
                endpoint: "https://corsproxy.io/?".to_string()
            }
        );
        assert_eq!(paths.len(), 3);
    }

    #[test]
    fn direct_path_can_be_disallowed() {
        let config = ScrapeConfig {
            allow_direct: false,
            ..ScrapeConfig::default()
        };
        assert!(fetch_paths(&config)
            .iter()
            .all(|p| matches!(p, FetchPath::Relay { .. })));
    }

    #[test]
    fn relay_url_percent_encodes_the_target() {
        let path = FetchPath::Relay {
            endpoint: "https://api.allorigins.win/raw?url=".to_string(),
        };
        assert_eq!(
            path.request_url("https://shop.test/p?a=1&b=2"),
            "https://api.allorigins.win/raw?url=https%3A%2F%2Fshop.test%2Fp%3Fa%3D1%26b%3D2"
        );
    }

    #[test]
    fn body_validation_rejects_short_and_blocked_bodies() {
        assert!(!body_is_usable("<html></html>", 500));
        let blocked = format!("<html>{}Access Denied</html>", "x".repeat(600));
        assert!(!body_is_usable(&blocked, 500));
        let fine = format!("<html>{}</html>", "x".repeat(600));
        assert!(body_is_usable(&fine, 500));
    }
}
