//! Driving port for post comments.

use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::comment::Comment;

use super::PersistenceError;

/// Repository port for comments.
#[async_trait]
pub trait CommentsRepository: Send + Sync {
    /// List a post's comments, oldest first.
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, PersistenceError>;

    /// Fetch a single comment.
    async fn find(&self, id: Uuid) -> Result<Option<Comment>, PersistenceError>;

    /// Store a new comment.
    async fn insert(&self, comment: &Comment) -> Result<(), PersistenceError>;

    /// Delete a comment. Returns `false` when absent.
    async fn delete(&self, id: Uuid) -> Result<bool, PersistenceError>;
}

/// In-memory comments repository for tests and database-less deployments.
#[derive(Default)]
pub struct FixtureCommentsRepository {
    state: Mutex<Vec<Comment>>,
}

impl FixtureCommentsRepository {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Comment>>, PersistenceError> {
        self.state
            .lock()
            .map_err(|_| PersistenceError::query("fixture state poisoned"))
    }
}

#[async_trait]
impl CommentsRepository for FixtureCommentsRepository {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, PersistenceError> {
        let mut comments: Vec<Comment> = self
            .lock()?
            .iter()
            .filter(|comment| comment.post_id() == post_id)
            .cloned()
            .collect();
        comments.sort_by_key(Comment::created_at);
        Ok(comments)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Comment>, PersistenceError> {
        Ok(self.lock()?.iter().find(|c| c.id() == id).cloned())
    }

    async fn insert(&self, comment: &Comment) -> Result<(), PersistenceError> {
        self.lock()?.push(comment.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, PersistenceError> {
        let mut comments = self.lock()?;
        let before = comments.len();
        comments.retain(|comment| comment.id() != id);
        Ok(comments.len() < before)
    }
}
