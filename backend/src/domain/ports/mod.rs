//! Driving ports for portal use-cases.
//!
//! Inbound adapters (HTTP handlers) depend on these traits rather than on
//! outbound persistence concerns. Production backs them with Diesel
//! repositories; tests and database-less deployments use the in-memory
//! fixture implementations that live alongside each port.

mod achievements;
mod announcements;
mod comments;
mod forum;
mod library;
mod posts;
mod suggestions;
mod users;

pub use achievements::{AchievementsRepository, FixtureAchievementsRepository};
pub use announcements::{AnnouncementsRepository, FixtureAnnouncementsRepository};
pub use comments::{CommentsRepository, FixtureCommentsRepository};
pub use forum::{FixtureForumRepository, ForumRepository, ThreadPage};
pub use library::{FixtureLibraryRepository, LibraryRepository};
pub use posts::{FixturePostsRepository, PostListFilter, PostPage, PostsRepository, Viewer};
pub use suggestions::{FixtureSuggestionsRepository, SuggestionsRepository};
pub use users::{FixtureLoginService, FixtureUserRepository, LoginService, UserPage, UserRepository};

use crate::domain::Error;

/// Failures surfaced by persistence adapters.
///
/// Connection problems are transient and map to `503`; query failures are
/// bugs or schema drift and map to `500`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistenceError {
    /// The backing store could not be reached.
    #[error("persistence connection failed: {message}")]
    Connection { message: String },
    /// A query failed or returned malformed data.
    #[error("persistence query failed: {message}")]
    Query { message: String },
}

impl PersistenceError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

impl From<PersistenceError> for Error {
    fn from(error: PersistenceError) -> Self {
        match error {
            PersistenceError::Connection { message } => Error::service_unavailable(message),
            PersistenceError::Query { message } => Error::internal(message),
        }
    }
}

/// Case-insensitive substring match used by fixture search filters.
pub(crate) fn matches_search(haystacks: &[&str], term: Option<&str>) -> bool {
    match term {
        None => true,
        Some(term) => {
            let needle = term.to_lowercase();
            haystacks
                .iter()
                .any(|hay| hay.to_lowercase().contains(&needle))
        }
    }
}

/// Slice one page out of an already-filtered fixture result set.
pub(crate) fn page_slice<T: Clone>(items: &[T], page: &pagination::PageRequest) -> (Vec<T>, u64) {
    let total = items.len() as u64;
    let start = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let data = items
        .iter()
        .skip(start)
        .take(page.per_page() as usize)
        .cloned()
        .collect();
    (data, total)
}
