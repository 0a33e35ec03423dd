//! Diesel row structs used by the persistence adapters.
//!
//! Rows are internal to the persistence layer; adapters convert them into
//! validated domain types via the `from_parts` constructors and never leak
//! them across the port boundary.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::ports::PersistenceError;
use crate::domain::{
    Achievement, Announcement, Comment, DisplayName, Email, ForumReply, ForumThread, LibraryItem,
    LibraryKind, ModerationStatus, Post, PostKind, Role, Suggestion, Tag, User, UserId,
};

use super::schema::{
    achievements, announcements, career_resources, comments, forum_replies, forum_threads, posts,
    study_resources, suggestions, tutorials, users,
};

fn invalid_column(table: &str, column: &str, err: impl std::fmt::Display) -> PersistenceError {
    PersistenceError::query(format!("{table}.{column} holds invalid data: {err}"))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub role: String,
}

impl UserRow {
    pub(crate) fn into_domain(self) -> Result<User, PersistenceError> {
        let display_name = DisplayName::new(self.display_name)
            .map_err(|err| invalid_column("users", "display_name", err))?;
        let email = Email::new(self.email).map_err(|err| invalid_column("users", "email", err))?;
        let role = Role::parse(&self.role).map_err(|err| invalid_column("users", "role", err))?;
        Ok(User::new(UserId::from_uuid(self.id), display_name, email, role))
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub display_name: &'a str,
    pub email: &'a str,
    pub role: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Posts and comments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PostRow {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub body: String,
    pub kind: String,
    pub status: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostRow {
    pub(crate) fn into_domain(self, like_count: u64) -> Result<Post, PersistenceError> {
        let kind =
            PostKind::parse(&self.kind).map_err(|err| invalid_column("posts", "kind", err))?;
        let status = ModerationStatus::parse(&self.status)
            .map_err(|err| invalid_column("posts", "status", err))?;
        let tags = self
            .tags
            .into_iter()
            .map(Tag::new)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| invalid_column("posts", "tags", err))?;
        Ok(Post::from_parts(
            self.id,
            UserId::from_uuid(self.author_id),
            self.title,
            self.body,
            kind,
            status,
            tags,
            like_count,
            self.created_at,
            self.updated_at,
        ))
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = posts)]
pub(crate) struct NewPostRow<'a> {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: &'a str,
    pub body: &'a str,
    pub kind: &'a str,
    pub status: &'a str,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = posts)]
pub(crate) struct PostUpdate<'a> {
    pub title: &'a str,
    pub body: &'a str,
    pub kind: &'a str,
    pub status: &'a str,
    pub tags: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommentRow {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl CommentRow {
    pub(crate) fn into_domain(self) -> Comment {
        Comment::from_parts(
            self.id,
            self.post_id,
            UserId::from_uuid(self.author_id),
            self.body,
            self.created_at,
        )
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = comments)]
pub(crate) struct NewCommentRow<'a> {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub body: &'a str,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Boards: suggestions, announcements, achievements
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = suggestions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SuggestionRow {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl SuggestionRow {
    pub(crate) fn into_domain(self) -> Suggestion {
        Suggestion::from_parts(
            self.id,
            UserId::from_uuid(self.author_id),
            self.title,
            self.body,
            self.created_at,
        )
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = suggestions)]
pub(crate) struct NewSuggestionRow<'a> {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: &'a str,
    pub body: &'a str,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = announcements)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AnnouncementRow {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub body: String,
    pub published_at: DateTime<Utc>,
}

impl AnnouncementRow {
    pub(crate) fn into_domain(self) -> Announcement {
        Announcement::from_parts(
            self.id,
            UserId::from_uuid(self.author_id),
            self.title,
            self.body,
            self.published_at,
        )
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = announcements)]
pub(crate) struct NewAnnouncementRow<'a> {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: &'a str,
    pub body: &'a str,
    pub published_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = achievements)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AchievementRow {
    pub id: Uuid,
    pub submitted_by: Uuid,
    pub title: String,
    pub description: String,
    pub recipient: String,
    pub awarded_at: DateTime<Utc>,
}

impl AchievementRow {
    pub(crate) fn into_domain(self) -> Achievement {
        Achievement::from_parts(
            self.id,
            UserId::from_uuid(self.submitted_by),
            self.title,
            self.description,
            self.recipient,
            self.awarded_at,
        )
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = achievements)]
pub(crate) struct NewAchievementRow<'a> {
    pub id: Uuid,
    pub submitted_by: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub recipient: &'a str,
    pub awarded_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Library shelves
// ---------------------------------------------------------------------------

/// The three shelf tables share one column layout, so one macro stamps out
/// the row and insert structs per table.
macro_rules! library_rows {
    ($table:ident, $row:ident, $new:ident) => {
        #[derive(Debug, Clone, Queryable, Selectable)]
        #[diesel(table_name = $table)]
        #[diesel(check_for_backend(diesel::pg::Pg))]
        pub(crate) struct $row {
            pub id: Uuid,
            pub submitted_by: Uuid,
            pub title: String,
            pub description: String,
            pub link: String,
            pub category: String,
            pub created_at: DateTime<Utc>,
        }

        impl $row {
            pub(crate) fn into_domain(self, kind: LibraryKind) -> LibraryItem {
                LibraryItem::from_parts(
                    self.id,
                    kind,
                    UserId::from_uuid(self.submitted_by),
                    self.title,
                    self.description,
                    self.link,
                    self.category,
                    self.created_at,
                )
            }
        }

        #[derive(Debug, Insertable)]
        #[diesel(table_name = $table)]
        pub(crate) struct $new<'a> {
            pub id: Uuid,
            pub submitted_by: Uuid,
            pub title: &'a str,
            pub description: &'a str,
            pub link: &'a str,
            pub category: &'a str,
            pub created_at: DateTime<Utc>,
        }

        impl<'a> $new<'a> {
            pub(crate) fn from_item(item: &'a LibraryItem) -> Self {
                Self {
                    id: item.id(),
                    submitted_by: *item.submitted_by().as_uuid(),
                    title: item.title(),
                    description: item.description(),
                    link: item.link(),
                    category: item.category(),
                    created_at: item.created_at(),
                }
            }
        }
    };
}

library_rows!(career_resources, CareerResourceRow, NewCareerResourceRow);
library_rows!(study_resources, StudyResourceRow, NewStudyResourceRow);
library_rows!(tutorials, TutorialRow, NewTutorialRow);

// ---------------------------------------------------------------------------
// Forum
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = forum_threads)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ThreadRow {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub body: String,
    pub reply_count: i64,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
}

impl ThreadRow {
    pub(crate) fn into_domain(self) -> ForumThread {
        ForumThread::from_parts(
            self.id,
            UserId::from_uuid(self.author_id),
            self.title,
            self.body,
            u64::try_from(self.reply_count).unwrap_or_default(),
            self.created_at,
            self.last_activity_at,
        )
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = forum_threads)]
pub(crate) struct NewThreadRow<'a> {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: &'a str,
    pub body: &'a str,
    pub reply_count: i64,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = forum_replies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReplyRow {
    pub id: Uuid,
    pub thread_id: Uuid,
    pub author_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl ReplyRow {
    pub(crate) fn into_domain(self) -> ForumReply {
        ForumReply::from_parts(
            self.id,
            self.thread_id,
            UserId::from_uuid(self.author_id),
            self.body,
            self.created_at,
        )
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = forum_replies)]
pub(crate) struct NewReplyRow<'a> {
    pub id: Uuid,
    pub thread_id: Uuid,
    pub author_id: Uuid,
    pub body: &'a str,
    pub created_at: DateTime<Utc>,
}
