//! Driving port for forum threads and replies.

use std::sync::Mutex;

use async_trait::async_trait;
use pagination::PageRequest;
use uuid::Uuid;

use crate::domain::forum::{ForumReply, ForumThread};

use super::{PersistenceError, matches_search, page_slice};

/// One page of threads plus the total match count.
#[derive(Debug, Clone)]
pub struct ThreadPage {
    /// The threads on this page, most recently active first.
    pub items: Vec<ForumThread>,
    /// Total threads matching the filter.
    pub total: u64,
}

/// Repository port for the forum.
#[async_trait]
pub trait ForumRepository: Send + Sync {
    /// List threads ordered by last activity, optionally filtered by search.
    async fn list(
        &self,
        search: Option<&str>,
        page: &PageRequest,
    ) -> Result<ThreadPage, PersistenceError>;

    /// Fetch a single thread.
    async fn find(&self, id: Uuid) -> Result<Option<ForumThread>, PersistenceError>;

    /// List a thread's replies, oldest first.
    async fn replies(&self, thread_id: Uuid) -> Result<Vec<ForumReply>, PersistenceError>;

    /// Store a new thread.
    async fn insert_thread(&self, thread: &ForumThread) -> Result<(), PersistenceError>;

    /// Store a reply and bump the thread's activity.
    ///
    /// Returns `false` when the thread is absent.
    async fn insert_reply(&self, reply: &ForumReply) -> Result<bool, PersistenceError>;

    /// Delete a thread and its replies. Returns `false` when absent.
    async fn delete_thread(&self, id: Uuid) -> Result<bool, PersistenceError>;
}

#[derive(Default)]
struct FixtureState {
    threads: Vec<ForumThread>,
    replies: Vec<ForumReply>,
}

/// In-memory forum repository for tests and database-less deployments.
#[derive(Default)]
pub struct FixtureForumRepository {
    state: Mutex<FixtureState>,
}

impl FixtureForumRepository {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, FixtureState>, PersistenceError> {
        self.state
            .lock()
            .map_err(|_| PersistenceError::query("fixture state poisoned"))
    }
}

#[async_trait]
impl ForumRepository for FixtureForumRepository {
    async fn list(
        &self,
        search: Option<&str>,
        page: &PageRequest,
    ) -> Result<ThreadPage, PersistenceError> {
        let state = self.lock()?;
        let mut threads: Vec<ForumThread> = state
            .threads
            .iter()
            .filter(|thread| matches_search(&[thread.title(), thread.body()], search))
            .cloned()
            .collect();
        threads.sort_by(|a, b| b.last_activity_at().cmp(&a.last_activity_at()));
        let (items, total) = page_slice(&threads, page);
        Ok(ThreadPage { items, total })
    }

    async fn find(&self, id: Uuid) -> Result<Option<ForumThread>, PersistenceError> {
        Ok(self.lock()?.threads.iter().find(|t| t.id() == id).cloned())
    }

    async fn replies(&self, thread_id: Uuid) -> Result<Vec<ForumReply>, PersistenceError> {
        let mut replies: Vec<ForumReply> = self
            .lock()?
            .replies
            .iter()
            .filter(|reply| reply.thread_id() == thread_id)
            .cloned()
            .collect();
        replies.sort_by_key(ForumReply::created_at);
        Ok(replies)
    }

    async fn insert_thread(&self, thread: &ForumThread) -> Result<(), PersistenceError> {
        self.lock()?.threads.push(thread.clone());
        Ok(())
    }

    async fn insert_reply(&self, reply: &ForumReply) -> Result<bool, PersistenceError> {
        let mut state = self.lock()?;
        let Some(thread) = state
            .threads
            .iter_mut()
            .find(|thread| thread.id() == reply.thread_id())
        else {
            return Ok(false);
        };
        thread.record_reply(reply.created_at());
        state.replies.push(reply.clone());
        Ok(true)
    }

    async fn delete_thread(&self, id: Uuid) -> Result<bool, PersistenceError> {
        let mut state = self.lock()?;
        let before = state.threads.len();
        state.threads.retain(|thread| thread.id() != id);
        state.replies.retain(|reply| reply.thread_id() != id);
        Ok(state.threads.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::UserId;
    use chrono::{Duration, Utc};

    async fn stored_thread(repo: &FixtureForumRepository, title: &str) -> ForumThread {
        let thread =
            ForumThread::new(UserId::random(), title, "Opening post.", Utc::now())
                .expect("valid thread");
        repo.insert_thread(&thread).await.expect("insert");
        thread
    }

    #[tokio::test]
    async fn replies_bump_threads_to_the_top() {
        let repo = FixtureForumRepository::default();
        let first = stored_thread(&repo, "First thread").await;
        let _second = stored_thread(&repo, "Second thread").await;

        let reply = ForumReply::new(
            first.id(),
            UserId::random(),
            "Bumping this.",
            Utc::now() + Duration::minutes(1),
        )
        .expect("valid reply");
        assert!(repo.insert_reply(&reply).await.expect("reply"));

        let page = repo
            .list(None, &PageRequest::first_page())
            .await
            .expect("list");
        assert_eq!(page.items[0].title(), "First thread");
        assert_eq!(page.items[0].reply_count(), 1);
    }

    #[tokio::test]
    async fn reply_to_missing_thread_reports_absence() {
        let repo = FixtureForumRepository::default();
        let reply = ForumReply::new(Uuid::new_v4(), UserId::random(), "Hello?", Utc::now())
            .expect("valid reply");
        assert!(!repo.insert_reply(&reply).await.expect("reply"));
    }

    #[tokio::test]
    async fn deleting_a_thread_removes_its_replies() {
        let repo = FixtureForumRepository::default();
        let thread = stored_thread(&repo, "Doomed thread").await;
        let reply = ForumReply::new(thread.id(), UserId::random(), "So long.", Utc::now())
            .expect("valid reply");
        repo.insert_reply(&reply).await.expect("reply");

        assert!(repo.delete_thread(thread.id()).await.expect("delete"));
        assert!(repo.replies(thread.id()).await.expect("replies").is_empty());
    }
}
