pub mod services;

pub use services::{FeedAppend, FeedRefresh, FeedService, LikeToggleService};
