//! Outbound ports - contracts for the network and session collaborators
//!
//! These ports define what the client core needs from the outside
//! world. Infrastructure adapters implement them; application
//! services depend only on the trait objects, which keeps the
//! services testable without a backend.

pub mod api_error;
pub mod feed_api_port;
pub mod like_api_port;
pub mod session_port;

pub use api_error::ApiError;
pub use feed_api_port::FeedApiPort;
pub use like_api_port::LikeApiPort;
pub use session_port::SessionPort;

#[cfg(any(test, feature = "testing"))]
pub use feed_api_port::MockFeedApiPort;
#[cfg(any(test, feature = "testing"))]
pub use like_api_port::MockLikeApiPort;
#[cfg(any(test, feature = "testing"))]
pub use session_port::MockSessionPort;
