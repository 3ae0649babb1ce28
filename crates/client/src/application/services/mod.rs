//! Application services - use case implementations over the outbound ports

mod feed_pages;
mod feed_service;
mod like_service;

pub use feed_service::{FeedAppend, FeedRefresh, FeedService};
pub use like_service::LikeToggleService;
