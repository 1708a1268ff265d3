use chrono::Utc;
use std::collections::HashMap;

use crate::models::{HackerNewsItem, SearchResult};

/// A page request handed out by [`SearchState`]. The view runs it on a worker
/// and passes it back together with the outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub term: String,
    pub page: u32,
    generation: u64,
}

/// Per-session search results keyed by term, plus the bits of UI state that
/// decide what gets shown. All mutation goes through the methods below.
#[derive(Debug, Default)]
pub struct SearchState {
    results: HashMap<String, SearchResult>,
    search_key: String,
    is_loading: bool,
    error: Option<String>,
    // Bumped on teardown; tickets from an older generation are ignored.
    generation: u64,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search_key(&self) -> &str {
        &self.search_key
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_cached(&self, term: &str) -> bool {
        self.results.contains_key(term)
    }

    pub fn result(&self, term: &str) -> Option<&SearchResult> {
        self.results.get(term)
    }

    pub fn active_result(&self) -> Option<&SearchResult> {
        self.result(&self.search_key)
    }

    pub fn active_hits(&self) -> &[HackerNewsItem] {
        self.active_result().map(|r| r.hits.as_slice()).unwrap_or(&[])
    }

    pub fn active_page(&self) -> Option<u32> {
        self.active_result().map(|r| r.page)
    }

    /// Makes `term` the displayed query. Only terms never fetched before
    /// produce a request; cached terms are shown as they are.
    pub fn submit_query(&mut self, term: &str) -> Option<FetchTicket> {
        self.search_key = term.to_string();
        if self.is_cached(term) {
            tracing::debug!(term, "term already cached, skipping fetch");
            return None;
        }
        Some(self.start_fetch(term.to_string(), 0))
    }

    pub fn load_more(&mut self) -> FetchTicket {
        let page = self.active_page().map_or(0, |p| p.saturating_add(1));
        self.start_fetch(self.search_key.clone(), page)
    }

    fn start_fetch(&mut self, term: String, page: u32) -> FetchTicket {
        self.is_loading = true;
        FetchTicket {
            term,
            page,
            generation: self.generation,
        }
    }

    fn is_stale(&self, ticket: &FetchTicket) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(term = %ticket.term, page = ticket.page, "discarding response after teardown");
            return true;
        }
        false
    }

    /// Appends a fetched page to the bucket of the term it was requested for.
    /// Duplicate ids across pages are kept.
    pub fn on_fetch_success(&mut self, ticket: &FetchTicket, hits: Vec<HackerNewsItem>, page: u32) {
        if self.is_stale(ticket) {
            return;
        }

        let entry = self
            .results
            .entry(ticket.term.clone())
            .or_insert_with(|| SearchResult {
                hits: Vec::new(),
                page,
                fetched_at: Utc::now(),
            });
        entry.hits.extend(hits);
        entry.page = entry.page.max(page);
        entry.fetched_at = Utc::now();

        self.is_loading = false;
        self.error = None;
    }

    /// A failed page leaves every cached entry as it was.
    pub fn on_fetch_failure(&mut self, ticket: &FetchTicket, error: impl std::fmt::Display) {
        if self.is_stale(ticket) {
            return;
        }
        self.error = Some(error.to_string());
        self.is_loading = false;
    }

    pub fn dismiss(&mut self, id: &str) {
        let Some(result) = self.results.get_mut(&self.search_key) else {
            return;
        };
        let before = result.hits.len();
        result.hits.retain(|item| item.id != id);
        tracing::debug!(id, removed = before - result.hits.len(), "dismissed item");
    }

    pub fn teardown(&mut self) {
        self.generation += 1;
        self.is_loading = false;
    }
}
