//! Feed API port - paged post retrieval

use async_trait::async_trait;
use gamerhub_domain::{FeedCategory, Post};

use super::ApiError;

/// Port for fetching one page of a feed.
///
/// Pages are 1-based and preserve server order. The backend returns
/// no total count; callers infer exhaustion from the page length.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait FeedApiPort: Send + Sync {
    async fn fetch_page(
        &self,
        category: &FeedCategory,
        page: u32,
        page_size: usize,
    ) -> Result<Vec<Post>, ApiError>;
}
