//! Forum discussion threads and replies.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::user::UserId;

/// Maximum thread title length.
pub const THREAD_TITLE_MAX: usize = 120;
/// Maximum thread or reply body length.
pub const FORUM_BODY_MAX: usize = 10_000;

/// Validation errors for forum submissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForumValidationError {
    EmptyTitle,
    TitleTooLong { max: usize },
    EmptyBody,
    BodyTooLong { max: usize },
}

impl fmt::Display for ForumValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::EmptyBody => write!(f, "body must not be empty"),
            Self::BodyTooLong { max } => write!(f, "body must be at most {max} characters"),
        }
    }
}

impl std::error::Error for ForumValidationError {}

fn validate_body(raw: String) -> Result<String, ForumValidationError> {
    let body = raw.trim().to_owned();
    if body.is_empty() {
        return Err(ForumValidationError::EmptyBody);
    }
    if body.chars().count() > FORUM_BODY_MAX {
        return Err(ForumValidationError::BodyTooLong {
            max: FORUM_BODY_MAX,
        });
    }
    Ok(body)
}

/// A forum discussion thread.
///
/// `last_activity_at` orders the thread list; it starts at creation and is
/// bumped by every reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForumThread {
    id: Uuid,
    author_id: UserId,
    title: String,
    body: String,
    reply_count: u64,
    created_at: DateTime<Utc>,
    last_activity_at: DateTime<Utc>,
}

impl ForumThread {
    /// Validate and construct a new thread.
    pub fn new(
        author_id: UserId,
        title: impl Into<String>,
        body: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, ForumValidationError> {
        let title = title.into().trim().to_owned();
        if title.is_empty() {
            return Err(ForumValidationError::EmptyTitle);
        }
        if title.chars().count() > THREAD_TITLE_MAX {
            return Err(ForumValidationError::TitleTooLong {
                max: THREAD_TITLE_MAX,
            });
        }
        let body = validate_body(body.into())?;
        Ok(Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            body,
            reply_count: 0,
            created_at: now,
            last_activity_at: now,
        })
    }

    /// Reassemble a thread from persisted parts.
    #[expect(clippy::too_many_arguments, reason = "row mapping constructor")]
    pub fn from_parts(
        id: Uuid,
        author_id: UserId,
        title: String,
        body: String,
        reply_count: u64,
        created_at: DateTime<Utc>,
        last_activity_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            author_id,
            title,
            body,
            reply_count,
            created_at,
            last_activity_at,
        }
    }

    /// Record a new reply, bumping activity.
    pub fn record_reply(&mut self, at: DateTime<Utc>) {
        self.reply_count += 1;
        self.last_activity_at = at;
    }

    /// Thread identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Author identifier.
    pub fn author_id(&self) -> &UserId {
        &self.author_id
    }

    /// Thread title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Opening post body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Number of replies.
    pub fn reply_count(&self) -> u64 {
        self.reply_count
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Timestamp of the latest reply (or creation when unanswered).
    pub fn last_activity_at(&self) -> DateTime<Utc> {
        self.last_activity_at
    }
}

/// A reply within a forum thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForumReply {
    id: Uuid,
    thread_id: Uuid,
    author_id: UserId,
    body: String,
    created_at: DateTime<Utc>,
}

impl ForumReply {
    /// Validate and construct a new reply.
    pub fn new(
        thread_id: Uuid,
        author_id: UserId,
        body: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, ForumValidationError> {
        let body = validate_body(body.into())?;
        Ok(Self {
            id: Uuid::new_v4(),
            thread_id,
            author_id,
            body,
            created_at: now,
        })
    }

    /// Reassemble a reply from persisted parts.
    pub fn from_parts(
        id: Uuid,
        thread_id: Uuid,
        author_id: UserId,
        body: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            thread_id,
            author_id,
            body,
            created_at,
        }
    }

    /// Reply identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Owning thread.
    pub fn thread_id(&self) -> Uuid {
        self.thread_id
    }

    /// Author identifier.
    pub fn author_id(&self) -> &UserId {
        &self.author_id
    }

    /// Reply body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn replies_bump_thread_activity() {
        let created = Utc::now();
        let mut thread = ForumThread::new(UserId::random(), "Exam prep", "Anyone up?", created)
            .expect("valid thread");
        assert_eq!(thread.reply_count(), 0);
        assert_eq!(thread.last_activity_at(), created);

        let later = created + Duration::minutes(5);
        thread.record_reply(later);
        assert_eq!(thread.reply_count(), 1);
        assert_eq!(thread.last_activity_at(), later);
    }

    #[test]
    fn blank_reply_is_rejected() {
        let err = ForumReply::new(Uuid::new_v4(), UserId::random(), "  ", Utc::now())
            .expect_err("blank reply");
        assert_eq!(err, ForumValidationError::EmptyBody);
    }
}
