//! Feed event bus for pushing feed updates to UI subscribers.
//!
//! Push-based: subscribers register callbacks that are invoked when a
//! category's materialized view changes. Every screen showing a
//! category observes the same updates, so lists and counters cannot
//! diverge between surfaces. The bus holds strong references to
//! subscribers, so they persist until explicitly cleared or the bus
//! is dropped.

use std::sync::Arc;

use gamerhub_domain::{FeedCategory, Post};
use tokio::sync::Mutex;

/// A change to one category's materialized view.
#[derive(Debug, Clone)]
pub enum FeedEvent {
    /// Page 1 was (re)fetched; the whole list was replaced.
    Replaced {
        category: FeedCategory,
        items: Vec<Post>,
    },
    /// A further page was fetched; `items` were appended.
    Appended {
        category: FeedCategory,
        items: Vec<Post>,
    },
}

impl FeedEvent {
    pub fn category(&self) -> &FeedCategory {
        match self {
            Self::Replaced { category, .. } | Self::Appended { category, .. } => category,
        }
    }
}

/// Event bus for feed updates.
#[derive(Clone)]
pub struct FeedEventBus {
    subscribers: Arc<Mutex<Vec<Box<dyn FnMut(FeedEvent) + Send + 'static>>>>,
}

impl FeedEventBus {
    /// Create a new bus with no subscribers.
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Subscribe to all feed updates.
    ///
    /// The callback is invoked for every event dispatched after
    /// registration, in dispatch order.
    pub async fn subscribe(&self, callback: impl FnMut(FeedEvent) + Send + 'static) {
        self.subscribers.lock().await.push(Box::new(callback));
    }

    /// Dispatch an event to all subscribers.
    ///
    /// Called by the feed service after every successful cache
    /// replacement or append. Each subscriber receives a clone of the
    /// event.
    pub async fn dispatch(&self, event: FeedEvent) {
        let mut subscribers = self.subscribers.lock().await;
        for subscriber in subscribers.iter_mut() {
            subscriber(event.clone());
        }
    }

    /// Get the number of subscribers.
    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.lock().await.len()
    }

    /// Clear all subscribers.
    pub async fn clear(&self) {
        self.subscribers.lock().await.clear();
    }
}

impl Default for FeedEventBus {
    fn default() -> Self {
        Self::new()
    }
}
