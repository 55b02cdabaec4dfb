//! Paginated Lists
//!
//! Every list screen (books, a book's events, notifications, subscriptions,
//! attendance history) follows one pattern, implemented once here:
//!
//! - `fetch_page(n, reset)` requests page `n`. With `reset` the reply
//!   replaces the collection; otherwise it is appended.
//! - `load_more()` requests the next page unless a fetch is in flight or the
//!   backend said there is nothing more.
//! - `refresh()` always requests page 1 with `reset`.
//!
//! The in-flight flag is a gate, not a queue. A `refresh` does not cancel a
//! `load_more` that is already running, and whichever reply lands last is
//! applied last. Failures leave the collection as it was so the user can
//! retry by scrolling or refreshing.
//!
//! Each endpoint is described by a [`PageSource`]: where to send the request,
//! how to decode the reply, and how records are identified for de-duplication.

pub mod sources;

use crate::client::api::ApiClient;
use crate::client::auth::AuthContext;
use crate::client::notice::Notice;
use crate::shared::config::PageSizes;
use crate::shared::error::ClientError;
use crate::shared::models::book::SortOrder;
use std::collections::HashSet;
use std::future::Future;
use std::hash::Hash;
use tokio::sync::RwLock;

pub use sources::{BookEventsSource, BooksSource, HistorySource, NotificationsSource, SubscriptionsSource};

/// How appended pages treat records already in the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DedupPolicy {
    /// Drop incoming records whose key is already present
    #[default]
    ById,
    /// Append everything the backend returns
    AppendAll,
}

/// Search and sort parameters sent with every page request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub search: String,
    pub sort_by: Option<String>,
    pub sort_order: SortOrder,
}

/// What a source needs to build one request
#[derive(Debug, Clone, Copy)]
pub struct PageRequest<'a> {
    pub user_id: &'a str,
    pub page: u32,
    pub per_page: u32,
    pub filters: &'a Filters,
}

/// One decoded page
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub records: Vec<T>,
    /// Page number as reported by the backend, 0 when it did not say
    pub current_page: u32,
    pub has_more: bool,
}

/// A paginated backend endpoint
pub trait PageSource {
    type Item: Clone + Send + Sync;
    type Key: Eq + Hash;

    /// Used in logs
    const NAME: &'static str;
    /// Shown when a page cannot be loaded and the backend gave no message
    const FAILURE_MESSAGE: &'static str;

    fn key(item: &Self::Item) -> Self::Key;

    fn page_size(sizes: &PageSizes) -> u32;

    fn dedup(&self) -> DedupPolicy {
        DedupPolicy::ById
    }

    fn fetch(
        &self,
        api: &ApiClient,
        request: PageRequest<'_>,
    ) -> impl Future<Output = Result<Page<Self::Item>, ClientError>> + Send;
}

/// Loaded records plus paging state
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    pub items: Vec<T>,
    /// Last page applied; 0 until the first page arrives
    pub page: u32,
    pub has_more: bool,
    pub is_loading: bool,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            page: 0,
            has_more: true,
            is_loading: false,
        }
    }
}

/// Result of a fetch request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A page was applied
    Applied { received: usize, added: usize },
    /// Nothing was requested (already loading, or no more pages)
    Skipped,
}

impl<T: Clone> Collection<T> {
    /// Merge a page into the collection
    pub fn apply<K, F>(
        &mut self,
        page: Page<T>,
        requested: u32,
        reset: bool,
        policy: DedupPolicy,
        key: F,
    ) -> FetchOutcome
    where
        K: Eq + Hash,
        F: Fn(&T) -> K,
    {
        let received = page.records.len();
        if reset {
            self.items.clear();
        }

        let before = self.items.len();
        match policy {
            DedupPolicy::AppendAll => self.items.extend(page.records),
            DedupPolicy::ById => {
                let mut seen: HashSet<K> = self.items.iter().map(&key).collect();
                self.items
                    .extend(page.records.into_iter().filter(|item| seen.insert(key(item))));
            }
        }

        self.page = if page.current_page > 0 {
            page.current_page
        } else {
            requested
        };
        self.has_more = page.has_more;

        FetchOutcome::Applied {
            received,
            added: self.items.len() - before,
        }
    }
}

#[derive(Debug)]
struct PagerState<T> {
    collection: Collection<T>,
    filters: Filters,
    notice: Option<Notice>,
}

/// Paginated, token-authenticated view over one [`PageSource`]
pub struct Paginator<S: PageSource> {
    api: ApiClient,
    auth: AuthContext,
    source: S,
    per_page: u32,
    state: RwLock<PagerState<S::Item>>,
}

impl<S: PageSource> Paginator<S> {
    pub fn new(api: ApiClient, auth: AuthContext, source: S) -> Self {
        let per_page = S::page_size(&api.config().page_sizes());
        Self {
            api,
            auth,
            source,
            per_page,
            state: RwLock::new(PagerState {
                collection: Collection::default(),
                filters: Filters::default(),
                notice: None,
            }),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Copy of the current collection
    pub async fn snapshot(&self) -> Collection<S::Item> {
        self.state.read().await.collection.clone()
    }

    pub async fn items(&self) -> Vec<S::Item> {
        self.state.read().await.collection.items.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.collection.is_loading
    }

    pub async fn notice(&self) -> Option<Notice> {
        self.state.read().await.notice.clone()
    }

    pub async fn set_notice(&self, notice: Notice) {
        self.state.write().await.notice = Some(notice);
    }

    pub async fn dismiss_notice(&self) {
        self.state.write().await.notice = None;
    }

    pub async fn filters(&self) -> Filters {
        self.state.read().await.filters.clone()
    }

    /// Edit loaded records in place (mark read, remove a deleted record, ...)
    pub async fn update_items<F>(&self, f: F)
    where
        F: FnOnce(&mut Vec<S::Item>),
    {
        f(&mut self.state.write().await.collection.items);
    }

    /// Request `page`; `reset` replaces the collection instead of appending
    pub async fn fetch_page(&self, page: u32, reset: bool) -> Result<FetchOutcome, ClientError> {
        let filters = {
            let mut state = self.state.write().await;
            state.collection.is_loading = true;
            state.filters.clone()
        };
        self.complete(page.max(1), reset, filters).await
    }

    /// Next page, unless loading or exhausted
    pub async fn load_more(&self) -> Result<FetchOutcome, ClientError> {
        let (page, filters) = {
            let mut guard = self.state.write().await;
            let state = &mut *guard;
            let collection = &mut state.collection;
            if collection.is_loading || !collection.has_more {
                tracing::trace!(source = S::NAME, loading = collection.is_loading, "load_more skipped");
                return Ok(FetchOutcome::Skipped);
            }
            collection.is_loading = true;
            (collection.page + 1, state.filters.clone())
        };
        // the first page replaces whatever placeholder state exists
        self.complete(page, page == 1, filters).await
    }

    /// Reload from page 1
    pub async fn refresh(&self) -> Result<FetchOutcome, ClientError> {
        self.fetch_page(1, true).await
    }

    /// Replace search/sort parameters and reload from page 1
    pub async fn apply_filters(&self, filters: Filters) -> Result<FetchOutcome, ClientError> {
        self.state.write().await.filters = filters;
        self.refresh().await
    }

    async fn complete(
        &self,
        page: u32,
        reset: bool,
        filters: Filters,
    ) -> Result<FetchOutcome, ClientError> {
        tracing::debug!(source = S::NAME, page, reset, "fetching page");
        let result = match self.auth.require_token() {
            Ok(user_id) => {
                self.source
                    .fetch(
                        &self.api,
                        PageRequest {
                            user_id: &user_id,
                            page,
                            per_page: self.per_page,
                            filters: &filters,
                        },
                    )
                    .await
            }
            Err(err) => Err(err),
        };

        let mut state = self.state.write().await;
        state.collection.is_loading = false;
        match result {
            Ok(fetched) => {
                let outcome =
                    state
                        .collection
                        .apply(fetched, page, reset, self.source.dedup(), S::key);
                tracing::debug!(source = S::NAME, page, ?outcome, "page applied");
                Ok(outcome)
            }
            Err(err) => {
                err.log(S::NAME);
                state.notice = Some(Notice::from_error(&err, S::FAILURE_MESSAGE, S::FAILURE_MESSAGE));
                Err(err)
            }
        }
    }
}
