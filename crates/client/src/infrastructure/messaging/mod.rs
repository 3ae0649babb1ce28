//! In-process messaging between the client core and UI surfaces.

pub mod event_bus;

pub use event_bus::{FeedEvent, FeedEventBus};
