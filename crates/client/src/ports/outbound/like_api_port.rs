//! Like API port - like-status check and like/unlike actions

use async_trait::async_trait;
use gamerhub_domain::PostId;

use super::ApiError;

/// Port for the like/unlike flow.
///
/// `like_post` and `unlike_post` resolve to the backend's accepted
/// flag: `Ok(false)` means the server answered but refused the
/// action.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait LikeApiPort: Send + Sync {
    /// Ask the backend whether the current session has liked the post.
    async fn check_like_status(&self, post: PostId) -> Result<bool, ApiError>;

    async fn like_post(&self, post: PostId) -> Result<bool, ApiError>;

    async fn unlike_post(&self, post: PostId) -> Result<bool, ApiError>;
}
