//! Driving port for official announcements.

use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::announcement::Announcement;

use super::PersistenceError;

/// Repository port for announcements.
#[async_trait]
pub trait AnnouncementsRepository: Send + Sync {
    /// List announcements, most recently published first.
    async fn list(&self) -> Result<Vec<Announcement>, PersistenceError>;

    /// Store a new announcement.
    async fn insert(&self, announcement: &Announcement) -> Result<(), PersistenceError>;

    /// Delete an announcement. Returns `false` when absent.
    async fn delete(&self, id: Uuid) -> Result<bool, PersistenceError>;
}

/// In-memory announcements repository for tests and database-less deployments.
#[derive(Default)]
pub struct FixtureAnnouncementsRepository {
    state: Mutex<Vec<Announcement>>,
}

impl FixtureAnnouncementsRepository {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Announcement>>, PersistenceError> {
        self.state
            .lock()
            .map_err(|_| PersistenceError::query("fixture state poisoned"))
    }
}

#[async_trait]
impl AnnouncementsRepository for FixtureAnnouncementsRepository {
    async fn list(&self) -> Result<Vec<Announcement>, PersistenceError> {
        let mut announcements = self.lock()?.clone();
        announcements.sort_by(|a, b| b.published_at().cmp(&a.published_at()));
        Ok(announcements)
    }

    async fn insert(&self, announcement: &Announcement) -> Result<(), PersistenceError> {
        self.lock()?.push(announcement.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, PersistenceError> {
        let mut announcements = self.lock()?;
        let before = announcements.len();
        announcements.retain(|announcement| announcement.id() != id);
        Ok(announcements.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::UserId;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn announcements_list_latest_first() {
        let repo = FixtureAnnouncementsRepository::default();
        let author = UserId::random();
        let now = Utc::now();
        let older = Announcement::new(
            author.clone(),
            "Exam week",
            "Library open late.",
            now - Duration::days(1),
        )
        .expect("valid announcement");
        let newer = Announcement::new(author, "Hack night", "Friday at six.", now)
            .expect("valid announcement");
        repo.insert(&older).await.expect("insert");
        repo.insert(&newer).await.expect("insert");

        let listed = repo.list().await.expect("list");
        assert_eq!(listed[0].title(), "Hack night");
    }
}
