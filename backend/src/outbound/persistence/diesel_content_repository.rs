//! Diesel-backed repository for suggestions, announcements, achievements,
//! and the library shelves.
//!
//! The three shelf tables share one column layout, so the library operations
//! dispatch on [`LibraryKind`] through small macros rather than duplicating
//! each query three times.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{
    AchievementsRepository, AnnouncementsRepository, LibraryRepository, PersistenceError,
    SuggestionsRepository,
};
use crate::domain::{Achievement, Announcement, LibraryItem, LibraryKind, Suggestion};

use super::error_mapping::{like_pattern, map_diesel_error, map_pool_error};
use super::models::{
    AchievementRow, AnnouncementRow, CareerResourceRow, NewAchievementRow, NewAnnouncementRow,
    NewCareerResourceRow, NewStudyResourceRow, NewSuggestionRow, NewTutorialRow, StudyResourceRow,
    SuggestionRow, TutorialRow,
};
use super::pool::DbPool;
use super::schema::{
    achievements, announcements, career_resources, study_resources, suggestions, tutorials,
};

/// PostgreSQL adapter for the content boards and library shelves.
pub struct DieselContentRepository {
    pool: DbPool,
}

impl DieselContentRepository {
    /// Create a repository backed by the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SuggestionsRepository for DieselContentRepository {
    async fn list(&self) -> Result<Vec<Suggestion>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<SuggestionRow> = suggestions::table
            .order(suggestions::created_at.desc())
            .select(SuggestionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(SuggestionRow::into_domain).collect())
    }

    async fn insert(&self, suggestion: &Suggestion) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewSuggestionRow {
            id: suggestion.id(),
            author_id: *suggestion.author_id().as_uuid(),
            title: suggestion.title(),
            body: suggestion.body(),
            created_at: suggestion.created_at(),
        };
        diesel::insert_into(suggestions::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(suggestions::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}

#[async_trait]
impl AnnouncementsRepository for DieselContentRepository {
    async fn list(&self) -> Result<Vec<Announcement>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AnnouncementRow> = announcements::table
            .order(announcements::published_at.desc())
            .select(AnnouncementRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(AnnouncementRow::into_domain).collect())
    }

    async fn insert(&self, announcement: &Announcement) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewAnnouncementRow {
            id: announcement.id(),
            author_id: *announcement.author_id().as_uuid(),
            title: announcement.title(),
            body: announcement.body(),
            published_at: announcement.published_at(),
        };
        diesel::insert_into(announcements::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(announcements::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}

#[async_trait]
impl AchievementsRepository for DieselContentRepository {
    async fn list(&self) -> Result<Vec<Achievement>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AchievementRow> = achievements::table
            .order(achievements::awarded_at.desc())
            .select(AchievementRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(AchievementRow::into_domain).collect())
    }

    async fn insert(&self, achievement: &Achievement) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewAchievementRow {
            id: achievement.id(),
            submitted_by: *achievement.submitted_by().as_uuid(),
            title: achievement.title(),
            description: achievement.description(),
            recipient: achievement.recipient(),
            awarded_at: achievement.awarded_at(),
        };
        diesel::insert_into(achievements::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(achievements::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}

#[async_trait]
impl LibraryRepository for DieselContentRepository {
    async fn list(
        &self,
        kind: LibraryKind,
        search: Option<&str>,
    ) -> Result<Vec<LibraryItem>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        macro_rules! shelf {
            ($table:ident, $row:ident) => {{
                let mut query = $table::table.into_boxed();
                if let Some(term) = search {
                    let pattern = like_pattern(term);
                    query = query.filter(
                        $table::title
                            .ilike(pattern.clone())
                            .or($table::description.ilike(pattern.clone()))
                            .or($table::category.ilike(pattern)),
                    );
                }
                let rows: Vec<$row> = query
                    .order($table::created_at.desc())
                    .select($row::as_select())
                    .load(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;
                rows.into_iter().map(|row| row.into_domain(kind)).collect()
            }};
        }
        Ok(match kind {
            LibraryKind::Career => shelf!(career_resources, CareerResourceRow),
            LibraryKind::Study => shelf!(study_resources, StudyResourceRow),
            LibraryKind::Tutorial => shelf!(tutorials, TutorialRow),
        })
    }

    async fn insert(&self, item: &LibraryItem) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        macro_rules! shelf {
            ($table:ident, $new:ident) => {
                diesel::insert_into($table::table)
                    .values(&$new::from_item(item))
                    .execute(&mut conn)
                    .await
                    .map_err(map_diesel_error)?
            };
        }
        match item.kind() {
            LibraryKind::Career => shelf!(career_resources, NewCareerResourceRow),
            LibraryKind::Study => shelf!(study_resources, NewStudyResourceRow),
            LibraryKind::Tutorial => shelf!(tutorials, NewTutorialRow),
        };
        Ok(())
    }

    async fn delete(&self, kind: LibraryKind, id: Uuid) -> Result<bool, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        macro_rules! shelf {
            ($table:ident) => {
                diesel::delete($table::table.find(id))
                    .execute(&mut conn)
                    .await
                    .map_err(map_diesel_error)?
            };
        }
        let deleted = match kind {
            LibraryKind::Career => shelf!(career_resources),
            LibraryKind::Study => shelf!(study_resources),
            LibraryKind::Tutorial => shelf!(tutorials),
        };
        Ok(deleted > 0)
    }
}
