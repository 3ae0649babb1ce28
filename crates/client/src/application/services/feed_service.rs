//! Feed service - cache-first paginated feeds keyed by category.
//!
//! One service instance owns the page state for every category. UI
//! screens push "refresh" and "load more" events in and render the
//! returned lists; screens that stay mounted subscribe to the feed
//! event bus so silent refreshes reach them too.

use std::sync::Arc;

use gamerhub_domain::{FeedCategory, Post};
use tracing::{debug, warn};

use crate::infrastructure::messaging::{FeedEvent, FeedEventBus};
use crate::ports::outbound::{ApiError, FeedApiPort};

use super::feed_pages::{FeedPages, InitialDecision, MoreDecision};

/// Outcome of [`FeedService::load_initial`].
#[derive(Debug, Clone, PartialEq)]
pub enum FeedRefresh {
    /// Served from the category cache; a silent refresh may be
    /// running and will arrive on the event bus.
    Cached(Vec<Post>),
    /// Fetched fresh from the backend.
    Fetched(Vec<Post>),
    /// A fetch for this category is already in flight; nothing was
    /// issued.
    InFlight,
    /// The response lost a race against a reset or a newer fetch and
    /// was dropped.
    Superseded,
}

/// Outcome of [`FeedService::load_more`].
#[derive(Debug, Clone, PartialEq)]
pub enum FeedAppend {
    /// Newly appended items (already de-duplicated by post id; may be
    /// empty when the whole page was already cached).
    Appended(Vec<Post>),
    /// The category is exhausted; no request was issued.
    Exhausted,
    /// A fetch for this category is already in flight; nothing was
    /// issued.
    InFlight,
    /// The response lost a race against a reset or a newer fetch and
    /// was dropped.
    Superseded,
}

/// Serves a consistent, incrementally-loadable view of posts per
/// category while preventing redundant concurrent fetches.
pub struct FeedService {
    api: Arc<dyn FeedApiPort>,
    events: FeedEventBus,
    pages: Arc<FeedPages>,
    page_size: usize,
}

impl FeedService {
    pub fn new(api: Arc<dyn FeedApiPort>, events: FeedEventBus, page_size: usize) -> Self {
        Self {
            api,
            events,
            pages: Arc::new(FeedPages::new()),
            page_size,
        }
    }

    /// The bus carrying every cache replacement and append.
    pub fn events(&self) -> &FeedEventBus {
        &self.events
    }

    /// Load the first page of a category.
    ///
    /// With `force_refresh` unset and a warm page-1 cache, the cached
    /// list is returned immediately and a silent page-1 refresh runs
    /// in the background (failures there are logged, never surfaced,
    /// so the just-shown list stays put). Otherwise the cursor is
    /// reset and a foreground fetch runs; its errors propagate. At
    /// most one fetch per category is in flight at a time; a call
    /// that would start a second one returns [`FeedRefresh::InFlight`].
    pub async fn load_initial(
        &self,
        category: &FeedCategory,
        force_refresh: bool,
    ) -> Result<FeedRefresh, ApiError> {
        match self.pages.begin_initial(category, force_refresh).await {
            InitialDecision::Busy => Ok(FeedRefresh::InFlight),
            InitialDecision::ServeCache { items, refresh } => {
                if let Some(ticket) = refresh {
                    self.spawn_silent_refresh(category.clone(), ticket);
                }
                Ok(FeedRefresh::Cached(items))
            }
            InitialDecision::Fetch { ticket } => {
                debug!(feed = %category, "fetching first page");
                let fetched = match self.api.fetch_page(category, 1, self.page_size).await {
                    Ok(items) => items,
                    Err(err) => {
                        if self.pages.fail_fetch(category, ticket, false).await {
                            return Err(err);
                        }
                        return Ok(FeedRefresh::Superseded);
                    }
                };
                let has_more = page_has_more(category, fetched.len(), self.page_size);
                if !self
                    .pages
                    .complete_replace(category, ticket, fetched.clone(), has_more)
                    .await
                {
                    return Ok(FeedRefresh::Superseded);
                }
                self.events
                    .dispatch(FeedEvent::Replaced {
                        category: category.clone(),
                        items: fetched.clone(),
                    })
                    .await;
                Ok(FeedRefresh::Fetched(fetched))
            }
        }
    }

    /// Load the next page of a category and append it to the cache.
    ///
    /// A no-op when the category is exhausted or a fetch is already
    /// in flight. On failure the page cursor rolls back to its
    /// pre-call value so a retry re-requests the same page; the cache
    /// is left untouched.
    pub async fn load_more(&self, category: &FeedCategory) -> Result<FeedAppend, ApiError> {
        match self.pages.begin_more(category).await {
            MoreDecision::Busy => Ok(FeedAppend::InFlight),
            MoreDecision::Exhausted => Ok(FeedAppend::Exhausted),
            MoreDecision::Fetch { page, ticket } => {
                debug!(feed = %category, page, "fetching next page");
                let fetched = match self.api.fetch_page(category, page, self.page_size).await {
                    Ok(items) => items,
                    Err(err) => {
                        if self.pages.fail_fetch(category, ticket, true).await {
                            return Err(err);
                        }
                        return Ok(FeedAppend::Superseded);
                    }
                };
                let has_more = page_has_more(category, fetched.len(), self.page_size);
                match self
                    .pages
                    .complete_append(category, ticket, fetched, has_more)
                    .await
                {
                    Some(appended) => {
                        if !appended.is_empty() {
                            self.events
                                .dispatch(FeedEvent::Appended {
                                    category: category.clone(),
                                    items: appended.clone(),
                                })
                                .await;
                        }
                        Ok(FeedAppend::Appended(appended))
                    }
                    None => Ok(FeedAppend::Superseded),
                }
            }
        }
    }

    /// Reset cursor and flags for a category. The cache is kept until
    /// the next successful page-1 fetch replaces it, so the UI never
    /// flashes empty between a pull-to-refresh and its response.
    pub async fn reset(&self, category: &FeedCategory) {
        self.pages.reset(category).await;
    }

    /// Whether more pages likely exist (defaults to `true` for
    /// categories never fetched).
    pub async fn has_more(&self, category: &FeedCategory) -> bool {
        self.pages.has_more(category).await
    }

    /// Whether a fetch is in flight for the category.
    pub async fn is_loading(&self, category: &FeedCategory) -> bool {
        self.pages.is_loading(category).await
    }

    /// The cached materialized view (empty for categories never
    /// fetched).
    pub async fn cached(&self, category: &FeedCategory) -> Vec<Post> {
        self.pages.snapshot(category).await
    }

    fn spawn_silent_refresh(&self, category: FeedCategory, ticket: u64) {
        let api = Arc::clone(&self.api);
        let pages = Arc::clone(&self.pages);
        let events = self.events.clone();
        let page_size = self.page_size;
        tokio::spawn(async move {
            match api.fetch_page(&category, 1, page_size).await {
                Ok(fetched) => {
                    let has_more = page_has_more(&category, fetched.len(), page_size);
                    if pages
                        .complete_replace(&category, ticket, fetched.clone(), has_more)
                        .await
                    {
                        events
                            .dispatch(FeedEvent::Replaced {
                                category,
                                items: fetched,
                            })
                            .await;
                    }
                }
                Err(err) => {
                    // The just-served cache stays on screen.
                    warn!(feed = %category, error = %err, "silent refresh failed");
                    pages.fail_fetch(&category, ticket, false).await;
                }
            }
        });
    }
}

impl Clone for FeedService {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            events: self.events.clone(),
            pages: Arc::clone(&self.pages),
            page_size: self.page_size,
        }
    }
}

/// A full page means more may exist; a short page means the source is
/// exhausted. Recommendation responses may over-fill, so they count
/// as full at page size or beyond.
fn page_has_more(category: &FeedCategory, fetched: usize, page_size: usize) -> bool {
    match category {
        FeedCategory::Recommend => fetched >= page_size,
        _ => fetched == page_size,
    }
}
