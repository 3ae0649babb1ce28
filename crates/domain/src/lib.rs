//! Domain types for the gamerhub client core.
//!
//! Plain data shared by the client services and their UI consumers:
//! forum entities, typed ids, and the feed category keys used to
//! partition client-side feed state. No I/O lives here.

pub mod category;
pub mod error;
pub mod ids;
pub mod post;

pub use category::FeedCategory;
pub use error::DomainError;
pub use ids::{PostId, SectionId, UserId};
pub use post::{LikeUpdate, Post};
