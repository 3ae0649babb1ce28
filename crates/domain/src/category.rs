//! Feed category keys.
//!
//! A category names one feed partition (a home tab, a section's post
//! list, a search-result tab). It is the sole key under which the
//! client keeps page cursors, loading flags, and cached items.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{SectionId, UserId};

/// A named feed partition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedCategory {
    /// Trending posts across the whole forum
    Hot,
    /// Personalized recommendations (requires a signed-in session)
    Recommend,
    /// Newest posts, forum-wide
    Latest,
    /// The signed-in user's own posts
    Mine,
    /// Posts in one section
    Section(SectionId),
    /// Posts by one user
    User(UserId),
    /// Full-text search results for a keyword
    Search(String),
}

impl FeedCategory {
    /// Build a search category, rejecting blank keywords.
    pub fn search(keyword: impl Into<String>) -> Result<Self, DomainError> {
        let keyword = keyword.into();
        if keyword.trim().is_empty() {
            return Err(DomainError::validation("search keyword cannot be blank"));
        }
        Ok(Self::Search(keyword))
    }

    /// Whether fetching this category needs a signed-in session.
    pub fn requires_auth(&self) -> bool {
        matches!(self, Self::Recommend | Self::Mine)
    }
}

impl fmt::Display for FeedCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hot => write!(f, "hot"),
            Self::Recommend => write!(f, "recommend"),
            Self::Latest => write!(f, "latest"),
            Self::Mine => write!(f, "mine"),
            Self::Section(id) => write!(f, "section:{id}"),
            Self::User(id) => write!(f, "user:{id}"),
            Self::Search(keyword) => write!(f, "search:{keyword}"),
        }
    }
}

impl FromStr for FeedCategory {
    type Err = DomainError;

    /// Parse the tab slugs used by the home and profile screens.
    /// Section, user, and search feeds carry parameters and have no
    /// slug form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hot" => Ok(Self::Hot),
            "recommend" => Ok(Self::Recommend),
            "latest" | "new" => Ok(Self::Latest),
            "mine" => Ok(Self::Mine),
            other => Err(DomainError::parse(format!("unknown feed tab: {other}"))),
        }
    }
}
