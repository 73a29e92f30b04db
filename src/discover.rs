use crate::error::{CharFreqError, Result};
use crate::model::RepoId;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// The search API never returns more than this many results for one query.
pub const SEARCH_RESULT_CAP: usize = 1000;

pub const MAX_PER_PAGE: usize = 100;

/// Where and how to reach the repository search API.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    pub api_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    clone_url: Option<String>,
    #[serde(default)]
    full_name: Option<String>,
}

/// Clone URLs of recently updated repositories with at least one star.
pub fn list_recently_updated(config: &DiscoveryConfig, page_count: usize, per_page: usize) -> Result<BTreeSet<RepoId>> {
    validate_paging(page_count, per_page)?;

    let requested = page_count * per_page;
    if requested > SEARCH_RESULT_CAP {
        warn!(
            "Search API limit: only the first {} of {} requested results are available",
            SEARCH_RESULT_CAP, requested
        );
    }
    info!("Fetching {} recently updated repository urls...", requested);

    let agent = ureq::AgentBuilder::new().timeout(config.timeout).build();
    let endpoint = format!("{}/search/repositories", config.api_url.trim_end_matches('/'));

    let mut urls = BTreeSet::new();
    for page in 1..=page_count {
        let mut request = agent
            .get(&endpoint)
            .set("User-Agent", concat!("charfreq/", env!("CARGO_PKG_VERSION")))
            .set("Accept", "application/vnd.github+json")
            .query("q", "stars:>0")
            .query("sort", "updated")
            .query("per_page", &per_page.to_string())
            .query("page", &page.to_string());
        if let Some(token) = &config.token {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }

        let body: serde_json::Value = request.call()?.into_json()?;
        urls.extend(clone_urls(body)?);
    }

    Ok(urls)
}

/// Ten pages of one hundred, the most a single search can return.
pub fn list_recently_updated_max(config: &DiscoveryConfig) -> Result<BTreeSet<RepoId>> {
    list_recently_updated(config, SEARCH_RESULT_CAP / MAX_PER_PAGE, MAX_PER_PAGE)
}

fn validate_paging(page_count: usize, per_page: usize) -> Result<()> {
    if page_count < 1 {
        return Err(CharFreqError::InvalidArgument(
            "page count must be at least 1".to_string(),
        ));
    }
    if !(1..=MAX_PER_PAGE).contains(&per_page) {
        return Err(CharFreqError::InvalidArgument(format!(
            "per-page must be between 1 and {MAX_PER_PAGE}, got {per_page}"
        )));
    }
    Ok(())
}

/// Clone URLs of one search response page; items without one are dropped.
fn clone_urls(body: serde_json::Value) -> Result<Vec<RepoId>> {
    let response: SearchResponse = serde_json::from_value(body)?;
    let mut urls = Vec::with_capacity(response.items.len());
    for item in response.items {
        match item.clone_url {
            Some(url) if !url.is_empty() => urls.push(url),
            _ => warn!(
                "Skipping search result without clone url: {}",
                item.full_name.as_deref().unwrap_or("<unnamed>")
            ),
        }
    }
    Ok(urls)
}
