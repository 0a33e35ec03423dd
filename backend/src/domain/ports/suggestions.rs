//! Driving port for member suggestions.

use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::suggestion::Suggestion;

use super::PersistenceError;

/// Repository port for suggestions.
#[async_trait]
pub trait SuggestionsRepository: Send + Sync {
    /// List suggestions, newest first.
    async fn list(&self) -> Result<Vec<Suggestion>, PersistenceError>;

    /// Store a new suggestion.
    async fn insert(&self, suggestion: &Suggestion) -> Result<(), PersistenceError>;

    /// Delete a suggestion. Returns `false` when absent.
    async fn delete(&self, id: Uuid) -> Result<bool, PersistenceError>;
}

/// In-memory suggestions repository for tests and database-less deployments.
#[derive(Default)]
pub struct FixtureSuggestionsRepository {
    state: Mutex<Vec<Suggestion>>,
}

impl FixtureSuggestionsRepository {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Suggestion>>, PersistenceError> {
        self.state
            .lock()
            .map_err(|_| PersistenceError::query("fixture state poisoned"))
    }
}

#[async_trait]
impl SuggestionsRepository for FixtureSuggestionsRepository {
    async fn list(&self) -> Result<Vec<Suggestion>, PersistenceError> {
        let mut suggestions = self.lock()?.clone();
        suggestions.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(suggestions)
    }

    async fn insert(&self, suggestion: &Suggestion) -> Result<(), PersistenceError> {
        self.lock()?.push(suggestion.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, PersistenceError> {
        let mut suggestions = self.lock()?;
        let before = suggestions.len();
        suggestions.retain(|suggestion| suggestion.id() != id);
        Ok(suggestions.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::UserId;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn suggestions_list_newest_first() {
        let repo = FixtureSuggestionsRepository::default();
        let author = UserId::random();
        let now = Utc::now();
        let older = Suggestion::new(
            author.clone(),
            "More beanbags",
            "The lab needs them.",
            now - Duration::hours(1),
        )
        .expect("valid suggestion");
        let newer = Suggestion::new(author, "Longer lab hours", "Until midnight.", now)
            .expect("valid suggestion");
        repo.insert(&older).await.expect("insert");
        repo.insert(&newer).await.expect("insert");

        let listed = repo.list().await.expect("list");
        assert_eq!(listed[0].title(), "Longer lab hours");

        assert!(repo.delete(older.id()).await.expect("delete"));
        assert_eq!(repo.list().await.expect("list").len(), 1);
    }
}
