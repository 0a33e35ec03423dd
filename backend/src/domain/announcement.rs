//! Official announcements published by moderators.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::user::UserId;

/// Maximum announcement title length.
pub const ANNOUNCEMENT_TITLE_MAX: usize = 120;
/// Maximum announcement body length.
pub const ANNOUNCEMENT_BODY_MAX: usize = 8_000;

/// Validation errors for announcement submissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnouncementValidationError {
    EmptyTitle,
    TitleTooLong { max: usize },
    EmptyBody,
    BodyTooLong { max: usize },
}

impl fmt::Display for AnnouncementValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::EmptyBody => write!(f, "body must not be empty"),
            Self::BodyTooLong { max } => write!(f, "body must be at most {max} characters"),
        }
    }
}

impl std::error::Error for AnnouncementValidationError {}

/// An official announcement, visible to all members once published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    id: Uuid,
    author_id: UserId,
    title: String,
    body: String,
    published_at: DateTime<Utc>,
}

impl Announcement {
    /// Validate and construct a new announcement.
    pub fn new(
        author_id: UserId,
        title: impl Into<String>,
        body: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, AnnouncementValidationError> {
        let title = title.into().trim().to_owned();
        if title.is_empty() {
            return Err(AnnouncementValidationError::EmptyTitle);
        }
        if title.chars().count() > ANNOUNCEMENT_TITLE_MAX {
            return Err(AnnouncementValidationError::TitleTooLong {
                max: ANNOUNCEMENT_TITLE_MAX,
            });
        }
        let body = body.into().trim().to_owned();
        if body.is_empty() {
            return Err(AnnouncementValidationError::EmptyBody);
        }
        if body.chars().count() > ANNOUNCEMENT_BODY_MAX {
            return Err(AnnouncementValidationError::BodyTooLong {
                max: ANNOUNCEMENT_BODY_MAX,
            });
        }
        Ok(Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            body,
            published_at: now,
        })
    }

    /// Reassemble an announcement from persisted parts.
    pub fn from_parts(
        id: Uuid,
        author_id: UserId,
        title: String,
        body: String,
        published_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            author_id,
            title,
            body,
            published_at,
        }
    }

    /// Announcement identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Publishing moderator.
    pub fn author_id(&self) -> &UserId {
        &self.author_id
    }

    /// Announcement title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Announcement body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Publish timestamp.
    pub fn published_at(&self) -> DateTime<Utc> {
        self.published_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_title_is_rejected() {
        let err = Announcement::new(UserId::random(), "  ", "body", Utc::now())
            .expect_err("blank title");
        assert_eq!(err, AnnouncementValidationError::EmptyTitle);
    }
}
