//! Gamerhub client core.
//!
//! UI-toolkit-agnostic building blocks for the forum app's feed
//! screens: per-category paginated feeds backed by an in-memory
//! cache, and an optimistic-safe like toggle. Rendering, image
//! loading, and credential storage stay outside this crate; screens
//! talk to it through the application services and subscribe to the
//! feed event bus for updates.

pub mod application;
pub mod config;
pub mod infrastructure;
pub mod ports;

pub use application::services::{FeedAppend, FeedRefresh, FeedService, LikeToggleService};
pub use config::ClientConfig;
pub use infrastructure::http::HttpApiClient;
pub use infrastructure::messaging::{FeedEvent, FeedEventBus};
pub use ports::outbound::{ApiError, FeedApiPort, LikeApiPort, SessionPort};
