//! Like toggle service - optimistic-safe like/unlike.

use std::sync::Arc;

use gamerhub_domain::{LikeUpdate, PostId};
use tracing::debug;

use crate::ports::outbound::{ApiError, LikeApiPort};

/// Check-then-act like toggling.
///
/// List endpoints do not carry per-user like status, so the cached
/// `has_liked` may be stale. The toggle therefore asks the server
/// first and only then applies the matching action; counters change
/// strictly after the action is confirmed. Concurrent toggles for the
/// same post are not serialized here; the UI disables the control
/// while one is in flight.
pub struct LikeToggleService {
    api: Arc<dyn LikeApiPort>,
}

impl LikeToggleService {
    pub fn new(api: Arc<dyn LikeApiPort>) -> Self {
        Self { api }
    }

    /// Toggle the like state of `post`.
    ///
    /// `current_like_count` is the caller's displayed counter; the
    /// returned update is what the caller should render once the
    /// server has confirmed. Any failure leaves the caller's state
    /// untouched: a failed status check aborts the whole toggle, and
    /// a failed action is reported without a retry.
    pub async fn toggle(
        &self,
        post: PostId,
        current_like_count: u32,
    ) -> Result<LikeUpdate, ApiError> {
        if self.api.check_like_status(post).await? {
            if !self.api.unlike_post(post).await? {
                return Err(ApiError::Server {
                    status: 200,
                    message: "unlike was not applied".to_string(),
                });
            }
            debug!(%post, "unliked");
            Ok(LikeUpdate {
                has_liked: false,
                like_count: current_like_count.saturating_sub(1),
            })
        } else {
            if !self.api.like_post(post).await? {
                return Err(ApiError::Server {
                    status: 200,
                    message: "like was not applied".to_string(),
                });
            }
            debug!(%post, "liked");
            Ok(LikeUpdate {
                has_liked: true,
                like_count: current_like_count.saturating_add(1),
            })
        }
    }
}

impl Clone for LikeToggleService {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ports::outbound::MockLikeApiPort;

    use super::*;

    const POST: PostId = PostId::new(7);

    #[tokio::test]
    async fn likes_when_not_yet_liked() {
        let mut mock = MockLikeApiPort::new();
        mock.expect_check_like_status()
            .times(1)
            .returning(|_| Ok(false));
        mock.expect_like_post().times(1).returning(|_| Ok(true));
        mock.expect_unlike_post().never();

        let service = LikeToggleService::new(Arc::new(mock));
        let update = service.toggle(POST, 5).await.expect("toggle");
        assert_eq!(
            update,
            LikeUpdate {
                has_liked: true,
                like_count: 6
            }
        );
    }

    #[tokio::test]
    async fn unlikes_when_already_liked_and_floors_at_zero() {
        let mut mock = MockLikeApiPort::new();
        mock.expect_check_like_status()
            .times(1)
            .returning(|_| Ok(true));
        mock.expect_unlike_post().times(1).returning(|_| Ok(true));
        mock.expect_like_post().never();

        let service = LikeToggleService::new(Arc::new(mock));
        let update = service.toggle(POST, 0).await.expect("toggle");
        assert_eq!(
            update,
            LikeUpdate {
                has_liked: false,
                like_count: 0
            }
        );
    }

    #[tokio::test]
    async fn failed_status_check_aborts_without_acting() {
        let mut mock = MockLikeApiPort::new();
        mock.expect_check_like_status()
            .times(1)
            .returning(|_| Err(ApiError::Network("timeout".to_string())));
        mock.expect_like_post().never();
        mock.expect_unlike_post().never();

        let service = LikeToggleService::new(Arc::new(mock));
        assert_eq!(
            service.toggle(POST, 5).await,
            Err(ApiError::Network("timeout".to_string()))
        );
    }

    #[tokio::test]
    async fn failed_like_action_reports_and_changes_nothing() {
        let mut mock = MockLikeApiPort::new();
        mock.expect_check_like_status()
            .times(1)
            .returning(|_| Ok(false));
        mock.expect_like_post()
            .times(1)
            .returning(|_| Err(ApiError::Network("connection reset".to_string())));

        let service = LikeToggleService::new(Arc::new(mock));
        assert!(service.toggle(POST, 5).await.is_err());
    }

    #[tokio::test]
    async fn server_refusal_is_a_server_error() {
        let mut mock = MockLikeApiPort::new();
        mock.expect_check_like_status()
            .times(1)
            .returning(|_| Ok(true));
        mock.expect_unlike_post().times(1).returning(|_| Ok(false));

        let service = LikeToggleService::new(Arc::new(mock));
        assert!(matches!(
            service.toggle(POST, 3).await,
            Err(ApiError::Server { .. })
        ));
    }
}
