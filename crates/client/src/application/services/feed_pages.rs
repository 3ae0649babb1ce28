//! Per-category feed page bookkeeping.
//!
//! One `FeedPage` per category: a 1-based page cursor, a structural
//! `has_more` flag, a cooperative `is_loading` flag, and the cached
//! materialized view. The table hands out fetch "tickets" (category
//! generation at fetch start) and rejects completions whose ticket no
//! longer matches, so a response that lands after a reset or after a
//! newer fetch took over cannot clobber newer state.
//!
//! Every decision (check `is_loading`, flip it, move the cursor)
//! happens inside a single write-lock critical section with no await
//! points, which is what makes the cooperative flag race-free. The
//! lock is never held across a network call.

use std::collections::HashMap;

use gamerhub_domain::{FeedCategory, Post};
use tokio::sync::RwLock;

/// State for one feed category.
///
/// Created lazily with these defaults on first access and never
/// destroyed, only reset.
#[derive(Debug, Clone)]
struct FeedPage {
    current_page: u32,
    has_more: bool,
    is_loading: bool,
    generation: u64,
    items: Vec<Post>,
}

impl Default for FeedPage {
    fn default() -> Self {
        Self {
            current_page: 1,
            has_more: true,
            is_loading: false,
            generation: 0,
            items: Vec::new(),
        }
    }
}

/// What `begin_initial` decided under the lock.
#[derive(Debug)]
pub(crate) enum InitialDecision {
    /// Serve the cached page-1 view now. When `refresh` carries a
    /// ticket, a silent page-1 refresh was admitted and must run;
    /// `None` means a fetch is already in flight for this category.
    ServeCache {
        items: Vec<Post>,
        refresh: Option<u64>,
    },
    /// No usable cache: the cursor was reset and a foreground page-1
    /// fetch was admitted.
    Fetch { ticket: u64 },
    /// A fetch is already in flight and there is no cache to serve.
    Busy,
}

/// What `begin_more` decided under the lock.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum MoreDecision {
    /// The cursor was advanced tentatively; fetch `page`.
    Fetch { page: u32, ticket: u64 },
    /// A fetch is already in flight for this category.
    Busy,
    /// The category is exhausted; nothing to fetch.
    Exhausted,
}

/// The per-category state table. Owned exclusively by `FeedService`.
#[derive(Default)]
pub(crate) struct FeedPages {
    entries: RwLock<HashMap<FeedCategory, FeedPage>>,
}

impl FeedPages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached items for a category (empty for unknown categories).
    pub async fn snapshot(&self, category: &FeedCategory) -> Vec<Post> {
        let guard = self.entries.read().await;
        guard
            .get(category)
            .map(|page| page.items.clone())
            .unwrap_or_default()
    }

    /// `has_more` flag (defaults to `true` for unknown categories).
    pub async fn has_more(&self, category: &FeedCategory) -> bool {
        let guard = self.entries.read().await;
        guard.get(category).map_or(true, |page| page.has_more)
    }

    /// `is_loading` flag (defaults to `false` for unknown categories).
    pub async fn is_loading(&self, category: &FeedCategory) -> bool {
        let guard = self.entries.read().await;
        guard.get(category).map_or(false, |page| page.is_loading)
    }

    /// Reset cursor and flags; the cache stays until the next
    /// successful page-1 fetch replaces it, so the UI never flashes
    /// empty. In-flight fetches are invalidated via the generation
    /// bump.
    pub async fn reset(&self, category: &FeedCategory) {
        let mut guard = self.entries.write().await;
        let page = guard.entry(category.clone()).or_default();
        page.current_page = 1;
        page.has_more = true;
        page.is_loading = false;
        page.generation += 1;
    }

    /// Admission decision for `load_initial`.
    pub async fn begin_initial(
        &self,
        category: &FeedCategory,
        force_refresh: bool,
    ) -> InitialDecision {
        let mut guard = self.entries.write().await;
        let page = guard.entry(category.clone()).or_default();

        if !force_refresh && page.current_page == 1 && !page.items.is_empty() {
            // Cache hit: serve immediately, refresh silently unless a
            // fetch is already running.
            let refresh = if page.is_loading {
                None
            } else {
                page.is_loading = true;
                Some(page.generation)
            };
            return InitialDecision::ServeCache {
                items: page.items.clone(),
                refresh,
            };
        }

        if page.is_loading {
            return InitialDecision::Busy;
        }

        page.current_page = 1;
        page.has_more = true;
        page.generation += 1;
        page.is_loading = true;
        InitialDecision::Fetch {
            ticket: page.generation,
        }
    }

    /// Admission decision for `load_more`.
    pub async fn begin_more(&self, category: &FeedCategory) -> MoreDecision {
        let mut guard = self.entries.write().await;
        let page = guard.entry(category.clone()).or_default();

        if page.is_loading {
            return MoreDecision::Busy;
        }
        if !page.has_more {
            return MoreDecision::Exhausted;
        }

        page.current_page += 1;
        page.is_loading = true;
        MoreDecision::Fetch {
            page: page.current_page,
            ticket: page.generation,
        }
    }

    /// Apply a successful page-1 fetch. Returns `false` (state
    /// untouched) when the ticket is stale.
    pub async fn complete_replace(
        &self,
        category: &FeedCategory,
        ticket: u64,
        items: Vec<Post>,
        has_more: bool,
    ) -> bool {
        let mut guard = self.entries.write().await;
        let page = guard.entry(category.clone()).or_default();
        if page.generation != ticket {
            return false;
        }
        page.current_page = 1;
        page.has_more = has_more;
        page.is_loading = false;
        page.items = items;
        true
    }

    /// Apply a successful further-page fetch: drop items whose id is
    /// already cached, append the rest. Returns the appended items,
    /// or `None` (state untouched) when the ticket is stale.
    pub async fn complete_append(
        &self,
        category: &FeedCategory,
        ticket: u64,
        fetched: Vec<Post>,
        has_more: bool,
    ) -> Option<Vec<Post>> {
        let mut guard = self.entries.write().await;
        let page = guard.entry(category.clone()).or_default();
        if page.generation != ticket {
            return None;
        }

        let appended: Vec<Post> = fetched
            .into_iter()
            .filter(|post| page.items.iter().all(|seen| seen.post_id != post.post_id))
            .collect();
        page.items.extend(appended.iter().cloned());
        page.has_more = has_more;
        page.is_loading = false;
        Some(appended)
    }

    /// Record a failed fetch. `rollback_cursor` undoes the tentative
    /// increment of `begin_more` so a retry re-requests the same
    /// page. Returns `false` (state untouched) when the ticket is
    /// stale.
    pub async fn fail_fetch(
        &self,
        category: &FeedCategory,
        ticket: u64,
        rollback_cursor: bool,
    ) -> bool {
        let mut guard = self.entries.write().await;
        let page = guard.entry(category.clone()).or_default();
        if page.generation != ticket {
            return false;
        }
        page.is_loading = false;
        if rollback_cursor && page.current_page > 1 {
            page.current_page -= 1;
        }
        true
    }

    /// Current page cursor (1 for unknown categories; tests only).
    #[cfg(test)]
    pub async fn current_page(&self, category: &FeedCategory) -> u32 {
        let guard = self.entries.read().await;
        guard.get(category).map_or(1, |page| page.current_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamerhub_domain::PostId;

    fn post(id: i64) -> Post {
        serde_json::from_str(&format!(r#"{{"postId": {id}}}"#)).expect("minimal post")
    }

    #[tokio::test]
    async fn unknown_category_has_defaults() {
        let pages = FeedPages::new();
        let cat = FeedCategory::Hot;
        assert!(pages.has_more(&cat).await);
        assert!(!pages.is_loading(&cat).await);
        assert!(pages.snapshot(&cat).await.is_empty());
        assert_eq!(pages.current_page(&cat).await, 1);
    }

    #[tokio::test]
    async fn begin_initial_without_cache_admits_a_fetch() {
        let pages = FeedPages::new();
        let cat = FeedCategory::Hot;
        let decision = pages.begin_initial(&cat, false).await;
        assert!(matches!(decision, InitialDecision::Fetch { .. }));
        assert!(pages.is_loading(&cat).await);
    }

    #[tokio::test]
    async fn begin_initial_is_a_noop_while_loading() {
        let pages = FeedPages::new();
        let cat = FeedCategory::Hot;
        let _ = pages.begin_initial(&cat, true).await;
        assert!(matches!(
            pages.begin_initial(&cat, true).await,
            InitialDecision::Busy
        ));
    }

    #[tokio::test]
    async fn cache_hit_serves_and_admits_one_silent_refresh() {
        let pages = FeedPages::new();
        let cat = FeedCategory::Hot;
        let InitialDecision::Fetch { ticket } = pages.begin_initial(&cat, false).await else {
            panic!("expected fetch");
        };
        assert!(
            pages
                .complete_replace(&cat, ticket, vec![post(1), post(2)], true)
                .await
        );

        let first = pages.begin_initial(&cat, false).await;
        let InitialDecision::ServeCache { items, refresh } = first else {
            panic!("expected cache hit");
        };
        assert_eq!(items.len(), 2);
        assert!(refresh.is_some());

        // While the silent refresh runs, further cache hits are
        // served but no second refresh is admitted.
        let second = pages.begin_initial(&cat, false).await;
        let InitialDecision::ServeCache { refresh, .. } = second else {
            panic!("expected cache hit");
        };
        assert!(refresh.is_none());
    }

    #[tokio::test]
    async fn begin_more_advances_cursor_tentatively() {
        let pages = FeedPages::new();
        let cat = FeedCategory::Latest;
        let decision = pages.begin_more(&cat).await;
        assert!(matches!(decision, MoreDecision::Fetch { page: 2, .. }));
        assert_eq!(pages.current_page(&cat).await, 2);
    }

    #[tokio::test]
    async fn begin_more_respects_loading_and_exhaustion() {
        let pages = FeedPages::new();
        let cat = FeedCategory::Latest;

        let MoreDecision::Fetch { ticket, .. } = pages.begin_more(&cat).await else {
            panic!("expected fetch");
        };
        assert_eq!(pages.begin_more(&cat).await, MoreDecision::Busy);

        // A short page exhausts the category.
        let appended = pages
            .complete_append(&cat, ticket, vec![post(1)], false)
            .await;
        assert_eq!(appended.map(|items| items.len()), Some(1));
        assert_eq!(pages.begin_more(&cat).await, MoreDecision::Exhausted);
    }

    #[tokio::test]
    async fn append_dedupes_by_post_id() {
        let pages = FeedPages::new();
        let cat = FeedCategory::Hot;
        let InitialDecision::Fetch { ticket } = pages.begin_initial(&cat, false).await else {
            panic!("expected fetch");
        };
        assert!(
            pages
                .complete_replace(&cat, ticket, vec![post(1), post(2)], true)
                .await
        );

        let MoreDecision::Fetch { ticket, .. } = pages.begin_more(&cat).await else {
            panic!("expected fetch");
        };
        let appended = pages
            .complete_append(&cat, ticket, vec![post(2), post(3)], true)
            .await
            .expect("fresh ticket");
        assert_eq!(
            appended.iter().map(|p| p.post_id).collect::<Vec<_>>(),
            vec![PostId::new(3)]
        );
        assert_eq!(pages.snapshot(&cat).await.len(), 3);
    }

    #[tokio::test]
    async fn fail_fetch_rolls_the_cursor_back() {
        let pages = FeedPages::new();
        let cat = FeedCategory::Latest;
        let MoreDecision::Fetch { ticket, .. } = pages.begin_more(&cat).await else {
            panic!("expected fetch");
        };
        assert_eq!(pages.current_page(&cat).await, 2);

        assert!(pages.fail_fetch(&cat, ticket, true).await);
        assert_eq!(pages.current_page(&cat).await, 1);
        assert!(!pages.is_loading(&cat).await);
    }

    #[tokio::test]
    async fn reset_keeps_cache_and_invalidates_tickets() {
        let pages = FeedPages::new();
        let cat = FeedCategory::Hot;
        let InitialDecision::Fetch { ticket } = pages.begin_initial(&cat, false).await else {
            panic!("expected fetch");
        };
        assert!(
            pages
                .complete_replace(&cat, ticket, vec![post(1)], true)
                .await
        );

        let MoreDecision::Fetch { ticket, .. } = pages.begin_more(&cat).await else {
            panic!("expected fetch");
        };
        pages.reset(&cat).await;

        // Cache survives the reset; the stale completion is rejected
        // and leaves post-reset state untouched.
        assert_eq!(pages.snapshot(&cat).await.len(), 1);
        assert_eq!(
            pages
                .complete_append(&cat, ticket, vec![post(9)], true)
                .await,
            None
        );
        assert_eq!(pages.snapshot(&cat).await.len(), 1);
        assert_eq!(pages.current_page(&cat).await, 1);
        assert!(!pages.is_loading(&cat).await);
        assert!(!pages.fail_fetch(&cat, ticket, true).await);
    }
}
