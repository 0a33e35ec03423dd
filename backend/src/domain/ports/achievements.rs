//! Driving port for community achievements.

use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::achievement::Achievement;

use super::PersistenceError;

/// Repository port for achievements.
#[async_trait]
pub trait AchievementsRepository: Send + Sync {
    /// List achievements, most recently awarded first.
    async fn list(&self) -> Result<Vec<Achievement>, PersistenceError>;

    /// Store a new achievement.
    async fn insert(&self, achievement: &Achievement) -> Result<(), PersistenceError>;

    /// Delete an achievement. Returns `false` when absent.
    async fn delete(&self, id: Uuid) -> Result<bool, PersistenceError>;
}

/// In-memory achievements repository for tests and database-less deployments.
#[derive(Default)]
pub struct FixtureAchievementsRepository {
    state: Mutex<Vec<Achievement>>,
}

impl FixtureAchievementsRepository {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Achievement>>, PersistenceError> {
        self.state
            .lock()
            .map_err(|_| PersistenceError::query("fixture state poisoned"))
    }
}

#[async_trait]
impl AchievementsRepository for FixtureAchievementsRepository {
    async fn list(&self) -> Result<Vec<Achievement>, PersistenceError> {
        let mut achievements = self.lock()?.clone();
        achievements.sort_by(|a, b| b.awarded_at().cmp(&a.awarded_at()));
        Ok(achievements)
    }

    async fn insert(&self, achievement: &Achievement) -> Result<(), PersistenceError> {
        self.lock()?.push(achievement.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, PersistenceError> {
        let mut achievements = self.lock()?;
        let before = achievements.len();
        achievements.retain(|achievement| achievement.id() != id);
        Ok(achievements.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::UserId;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn achievements_list_latest_first() {
        let repo = FixtureAchievementsRepository::default();
        let moderator = UserId::random();
        let now = Utc::now();
        let older = Achievement::new(
            moderator.clone(),
            "Regional winners",
            "Placed first at the regional hackathon.",
            "Team Ferrous",
            now - Duration::days(30),
        )
        .expect("valid achievement");
        let newer = Achievement::new(
            moderator,
            "Published paper",
            "Accepted at a student research track.",
            "Priya N",
            now,
        )
        .expect("valid achievement");
        repo.insert(&older).await.expect("insert");
        repo.insert(&newer).await.expect("insert");

        let listed = repo.list().await.expect("list");
        assert_eq!(listed[0].title(), "Published paper");
    }
}
