//! Forum post entity.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::ids::{PostId, SectionId, UserId};

/// A confirmed like-toggle outcome, ready to fold into a cached post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeUpdate {
    pub has_liked: bool,
    pub like_count: u32,
}

/// A forum post as served by the backend's list and detail endpoints.
///
/// Identity (`post_id`) never changes. Engagement counters and
/// `has_liked` are updated in place when a like toggle is confirmed
/// or when a fresh page replaces the cached view. List endpoints do
/// not carry per-user like status, so `has_liked` stays `None` until
/// a status check resolves it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub post_id: PostId,
    #[serde(default)]
    pub section_id: Option<SectionId>,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub post_title: String,
    #[serde(default)]
    pub post_content: String,
    /// Media reference, resolved by the UI's image loader.
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub nick_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub create_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub view_count: u32,
    #[serde(default)]
    pub like_count: u32,
    #[serde(default)]
    pub comment_count: u32,
    #[serde(default)]
    pub top_flag: i32,
    #[serde(default)]
    pub hot_flag: i32,
    #[serde(default)]
    pub has_liked: Option<bool>,
}

impl Post {
    /// Fold a confirmed toggle result into this post.
    pub fn apply_like(&mut self, update: LikeUpdate) {
        self.has_liked = Some(update.has_liked);
        self.like_count = update.like_count;
    }

    pub fn is_pinned(&self) -> bool {
        self.top_flag == 1
    }

    pub fn is_hot(&self) -> bool {
        self.hot_flag == 1
    }
}
