use reqwest::blocking::Client;

use crate::config::Config;
use crate::error::Result;
use crate::models::{HackerNewsItem, SearchResponse};

const PATH_SEARCH: &str = "/search";

/// Thin blocking client for the Algolia Hacker News search API.
/// Cloning is cheap; every clone shares the same connection pool.
#[derive(Debug, Clone)]
pub struct HackerNewsClient {
    client: Client,
    base_url: String,
    hits_per_page: u32,
}

/// One page of hits, already converted to display items.
#[derive(Debug)]
pub struct SearchPage {
    pub hits: Vec<HackerNewsItem>,
    pub page: u32,
}

impl HackerNewsClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("hn_search/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            hits_per_page: config.hits_per_page,
        })
    }

    pub fn search_url(&self, term: &str, page: u32) -> String {
        format!(
            "{}{}?query={}&page={}&hitsPerPage={}",
            self.base_url,
            PATH_SEARCH,
            urlencoding::encode(term),
            page,
            self.hits_per_page
        )
    }

    pub fn search(&self, term: &str, page: u32) -> Result<SearchPage> {
        let url = self.search_url(term, page);
        tracing::debug!(%url, "fetching search page");

        let response = self
            .client
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.json::<SearchResponse>());

        match response {
            Ok(body) => {
                let hits: Vec<HackerNewsItem> = body.hits.into_iter().map(Into::into).collect();
                tracing::info!(term, page = body.page, hits = hits.len(), "search page loaded");
                Ok(SearchPage { hits, page: body.page })
            }
            Err(e) => {
                tracing::warn!(term, page, error = %e, "search request failed");
                Err(e.into())
            }
        }
    }
}
