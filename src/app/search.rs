//! Search, pagination and selection state machine.
//!
//! [`SearchSession`] owns everything the home view knows about the current
//! search: the pending input, the committed term with its page counts, every
//! image received so far, and the selected ids. It never performs requests;
//! it returns the [`ApiRequest`] to send and is told how it went.
//!
//! # Invariants
//!
//! - `images` holds exactly the images of pages `1..=current_page` of the
//!   committed term, in arrival order.
//! - `current_page <= total_pages` once a search has been committed.
//! - Every selected id belongs to an image in `images`; a new search clears
//!   the selection.
//!
//! Responses are matched by `generation`: a new search bumps it, so a page
//! that arrives for an older search is dropped instead of being appended to
//! the wrong result set.

use crate::api::ApiRequest;
use crate::domain::{ApiError, Image, SearchPage};
use std::collections::HashSet;

/// Shown when a fresh search fails.
pub const SEARCH_FAILED: &str = "Failed to search images. Please try again.";
/// Shown when fetching a further page fails.
pub const LOAD_MORE_FAILED: &str = "Failed to load more images.";

/// Kind of fetch currently awaiting a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Search,
    LoadMore,
}

/// The term whose results are on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedSearch {
    pub term: String,
    pub total: u64,
    pub total_pages: u32,
}

/// How a settled fetch changed the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled {
    /// Page 1 of a new term replaced the results.
    Searched,
    /// A further page was appended.
    LoadedMore { appended: usize },
    /// The fetch failed; prior results are untouched.
    Failed(FetchKind),
    /// The response belongs to an older search and was ignored.
    Stale,
}

/// Search state for one mount of the home view.
#[derive(Debug, Clone, Default)]
pub struct SearchSession {
    /// Text in the search bar, not yet submitted.
    pub input: String,
    committed: Option<CommittedSearch>,
    images: Vec<Image>,
    current_page: u32,
    selection: HashSet<String>,
    in_flight: Option<FetchKind>,
    generation: u64,
    error: Option<String>,
}

impl SearchSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fresh search for `term`.
    ///
    /// Returns `None` without touching any state when the trimmed term is
    /// empty or another search is still pending. Otherwise bumps the
    /// generation and returns the page-1 request.
    ///
    /// # Example
    ///
    /// ```
    /// use zsplash::app::search::SearchSession;
    ///
    /// let mut search = SearchSession::new();
    /// assert!(search.submit_search("   ").is_none());
    /// assert!(search.submit_search(" cats ").is_some());
    /// assert!(search.is_searching());
    /// ```
    pub fn submit_search(&mut self, term: &str) -> Option<ApiRequest> {
        let term = term.trim();
        if term.is_empty() {
            tracing::debug!("empty search term, skipping");
            return None;
        }
        if self.in_flight == Some(FetchKind::Search) {
            tracing::debug!("search already pending, skipping");
            return None;
        }

        self.generation += 1;
        self.in_flight = Some(FetchKind::Search);
        self.error = None;

        tracing::debug!(term = %term, generation = self.generation, "search submitted");
        Some(ApiRequest::Search {
            term: term.to_string(),
            page: 1,
        })
    }

    /// Requests the next page when the end of the list is in view.
    ///
    /// Fires only if `sentinel_visible`, more pages exist, and nothing is in
    /// flight.
    pub fn load_more(&mut self, sentinel_visible: bool) -> Option<ApiRequest> {
        if !sentinel_visible || !self.has_more() || self.in_flight.is_some() {
            return None;
        }

        let term = self.committed.as_ref()?.term.clone();
        let page = self.current_page + 1;
        self.in_flight = Some(FetchKind::LoadMore);

        tracing::debug!(term = %term, page = page, "loading more images");
        Some(ApiRequest::Search { term, page })
    }

    /// Applies the response to a search request of `generation`.
    pub fn settle(&mut self, generation: u64, result: Result<SearchPage, ApiError>) -> Settled {
        if generation != self.generation {
            tracing::debug!(
                generation = generation,
                current = self.generation,
                "discarding stale search response"
            );
            return Settled::Stale;
        }

        let Some(kind) = self.in_flight.take() else {
            tracing::debug!("search response with nothing in flight");
            return Settled::Stale;
        };

        match (kind, result) {
            (FetchKind::Search, Ok(page)) => {
                tracing::debug!(
                    term = %page.term,
                    images = page.images.len(),
                    total_pages = page.total_pages,
                    "search results received"
                );
                self.committed = Some(CommittedSearch {
                    term: page.term,
                    total: page.total,
                    total_pages: page.total_pages,
                });
                self.images = page.images;
                self.current_page = page.total_pages.min(1);
                self.selection.clear();
                self.input.clear();
                Settled::Searched
            }
            (FetchKind::LoadMore, Ok(page)) => {
                let appended = page.images.len();
                let total_pages = self.total_pages();
                self.images.extend(page.images);
                // the counter only moves forward; a missing or lower page number
                // in the reply must not re-request a page already held
                self.current_page = (self.current_page + 1).max(page.current_page).min(total_pages);
                tracing::debug!(
                    appended = appended,
                    current_page = self.current_page,
                    "page appended"
                );
                Settled::LoadedMore { appended }
            }
            (kind, Err(e)) => {
                tracing::debug!(kind = ?kind, error = %e, "search fetch failed");
                self.error = Some(
                    match kind {
                        FetchKind::Search => SEARCH_FAILED,
                        FetchKind::LoadMore => LOAD_MORE_FAILED,
                    }
                    .to_string(),
                );
                Settled::Failed(kind)
            }
        }
    }

    /// Flips membership of `id` in the selection. Unknown ids are ignored.
    pub fn toggle_selection(&mut self, id: &str) {
        if !self.images.iter().any(|image| image.id == id) {
            return;
        }
        if !self.selection.remove(id) {
            self.selection.insert(id.to_string());
        }
    }

    /// Copies a history term into the input without searching.
    pub fn history_click(&mut self, term: &str) {
        self.input = term.to_string();
    }

    /// Copies a top-search term into the input without searching.
    pub fn top_search_click(&mut self, term: &str) {
        self.input = term.to_string();
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.committed.is_some() && self.current_page < self.total_pages()
    }

    #[must_use]
    pub const fn committed(&self) -> Option<&CommittedSearch> {
        self.committed.as_ref()
    }

    #[must_use]
    pub fn images(&self) -> &[Image] {
        &self.images
    }

    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    #[must_use]
    pub fn total_pages(&self) -> u32 {
        self.committed.as_ref().map_or(0, |c| c.total_pages)
    }

    #[must_use]
    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.contains(id)
    }

    #[must_use]
    pub fn selection_len(&self) -> usize {
        self.selection.len()
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.in_flight == Some(FetchKind::Search)
    }

    #[must_use]
    pub fn is_loading_more(&self) -> bool {
        self.in_flight == Some(FetchKind::LoadMore)
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn images(prefix: &str, count: usize) -> Vec<Image> {
        (0..count)
            .map(|i| Image {
                id: format!("{prefix}-{i}"),
                thumb: format!("https://img.test/{prefix}/{i}.jpg"),
                alt: format!("{prefix} {i}"),
                author: "Ann".into(),
            })
            .collect()
    }

    fn page(term: &str, number: u32, total_pages: u32, count: usize) -> SearchPage {
        SearchPage {
            term: term.into(),
            images: images(&format!("{term}{number}"), count),
            total: 50,
            current_page: number,
            total_pages,
        }
    }

    fn searched(term: &str, total_pages: u32, count: usize) -> SearchSession {
        let mut search = SearchSession::new();
        search.submit_search(term).unwrap();
        let generation = search.generation();
        assert_eq!(search.settle(generation, Ok(page(term, 1, total_pages, count))), Settled::Searched);
        search
    }

    #[test]
    fn submit_trims_and_requests_first_page() {
        let mut search = SearchSession::new();
        assert_eq!(
            search.submit_search("  cats \t"),
            Some(ApiRequest::Search {
                term: "cats".into(),
                page: 1
            })
        );
    }

    #[test]
    fn blank_or_pending_submit_is_skipped() {
        let mut search = SearchSession::new();
        assert_eq!(search.submit_search(""), None);
        assert_eq!(search.submit_search(" \n "), None);
        assert_eq!(search.generation(), 0);

        search.submit_search("cats").unwrap();
        assert_eq!(search.submit_search("dogs"), None);
        assert_eq!(search.generation(), 1);
    }

    #[test]
    fn search_success_replaces_results_and_clears_input() {
        let mut search = searched("cats", 3, 20);
        search.input = "dog".into();
        search.toggle_selection("cats1-0");

        search.submit_search("dogs").unwrap();
        let generation = search.generation();
        search.settle(generation, Ok(page("dogs", 1, 2, 5)));

        assert_eq!(search.current_page(), 1);
        assert_eq!(search.images(), page("dogs", 1, 2, 5).images.as_slice());
        assert_eq!(search.selection_len(), 0);
        assert!(search.input.is_empty());
        assert_eq!(search.committed().unwrap().term, "dogs");
    }

    #[test]
    fn cats_scenario_accumulates_three_pages() {
        let mut search = searched("cats", 3, 20);
        assert_eq!(search.images().len(), 20);
        assert!(search.has_more());

        let request = search.load_more(true).unwrap();
        assert_eq!(
            request,
            ApiRequest::Search {
                term: "cats".into(),
                page: 2
            }
        );
        search.settle(search.generation(), Ok(page("cats", 2, 3, 20)));
        assert_eq!(search.images().len(), 40);
        assert!(search.has_more());

        search.load_more(true).unwrap();
        search.settle(search.generation(), Ok(page("cats", 3, 3, 10)));
        assert_eq!(search.images().len(), 50);
        assert!(!search.has_more());
        assert_eq!(search.load_more(true), None);

        let ids: Vec<&str> = search.images().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids[0], "cats1-0");
        assert_eq!(ids[20], "cats2-0");
        assert_eq!(ids[49], "cats3-9");
    }

    #[test]
    fn load_more_requires_sentinel_and_idle() {
        let mut search = searched("cats", 3, 20);
        assert_eq!(search.load_more(false), None);

        assert!(search.load_more(true).is_some());
        assert_eq!(search.load_more(true), None);
        assert!(search.is_loading_more());
    }

    #[test]
    fn load_more_never_fires_on_last_page() {
        let mut search = searched("cats", 1, 20);
        assert!(!search.has_more());
        assert_eq!(search.load_more(true), None);

        let mut empty = SearchSession::new();
        assert_eq!(empty.load_more(true), None);
    }

    #[test]
    fn received_page_is_clamped_to_total() {
        let mut search = searched("cats", 2, 20);
        search.load_more(true).unwrap();
        search.settle(search.generation(), Ok(page("cats", 9, 2, 3)));
        assert_eq!(search.current_page(), 2);
        assert!(!search.has_more());
    }

    #[test]
    fn missing_or_stale_page_number_still_advances() {
        let mut search = searched("cats", 3, 20);
        search.load_more(true).unwrap();
        let reply: SearchPage =
            serde_json::from_str(r#"{"term":"cats","images":[{"id":"b-0"}],"totalPages":3}"#).unwrap();
        search.settle(search.generation(), Ok(reply));

        assert_eq!(search.images().len(), 21);
        assert_eq!(search.current_page(), 2);
        assert_eq!(
            search.load_more(true),
            Some(ApiRequest::Search {
                term: "cats".into(),
                page: 3
            })
        );

        search.settle(search.generation(), Ok(page("cats", 1, 3, 4)));
        assert_eq!(search.current_page(), 3);
        assert_eq!(search.load_more(true), None);
    }

    #[test]
    fn empty_result_keeps_page_within_total() {
        let search = searched("zzz", 0, 0);
        assert_eq!(search.current_page(), 0);
        assert_eq!(search.total_pages(), 0);
        assert!(!search.has_more());
        assert!(search.images().is_empty());
    }

    #[test]
    fn toggle_twice_is_identity_and_unknown_ids_are_ignored() {
        let mut search = searched("cats", 1, 3);
        search.toggle_selection("cats1-1");
        assert!(search.is_selected("cats1-1"));
        search.toggle_selection("cats1-1");
        assert!(!search.is_selected("cats1-1"));

        search.toggle_selection("nope");
        assert_eq!(search.selection_len(), 0);
    }

    #[test]
    fn failures_keep_results_and_set_message() {
        let mut search = searched("cats", 3, 20);

        search.load_more(true).unwrap();
        let outcome = search.settle(search.generation(), Err(ApiError::failed(Some(500), "boom")));
        assert_eq!(outcome, Settled::Failed(FetchKind::LoadMore));
        assert_eq!(search.images().len(), 20);
        assert_eq!(search.error(), Some(LOAD_MORE_FAILED));

        search.submit_search("dogs").unwrap();
        assert_eq!(search.error(), None);
        search.settle(search.generation(), Err(ApiError::failed(None, "offline")));
        assert_eq!(search.error(), Some(SEARCH_FAILED));
        assert_eq!(search.committed().unwrap().term, "cats");
        assert!(!search.is_searching());
    }

    #[test]
    fn stale_generation_is_discarded() {
        let mut search = searched("cats", 3, 20);
        search.load_more(true).unwrap();
        let old = search.generation();

        search.submit_search("dogs").unwrap();
        assert_eq!(search.settle(old, Ok(page("cats", 2, 3, 20))), Settled::Stale);
        assert_eq!(search.images().len(), 20);
        assert!(search.is_searching());
    }

    #[test]
    fn clicks_only_fill_the_input() {
        let mut search = SearchSession::new();
        search.history_click("sunset");
        assert_eq!(search.input, "sunset");
        search.top_search_click("forest");
        assert_eq!(search.input, "forest");
        assert!(!search.is_searching());
        assert!(search.committed().is_none());
    }
}
