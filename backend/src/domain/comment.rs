//! Comments attached to community posts.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::user::UserId;

/// Maximum comment length in characters.
pub const COMMENT_MAX: usize = 2_000;

/// Validation errors for comment bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentValidationError {
    EmptyBody,
    BodyTooLong { max: usize },
}

impl fmt::Display for CommentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBody => write!(f, "comment must not be empty"),
            Self::BodyTooLong { max } => write!(f, "comment must be at most {max} characters"),
        }
    }
}

impl std::error::Error for CommentValidationError {}

/// A comment left under a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    id: Uuid,
    post_id: Uuid,
    author_id: UserId,
    body: String,
    created_at: DateTime<Utc>,
}

impl Comment {
    /// Validate and construct a new comment.
    pub fn new(
        post_id: Uuid,
        author_id: UserId,
        body: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, CommentValidationError> {
        let body = body.into().trim().to_owned();
        if body.is_empty() {
            return Err(CommentValidationError::EmptyBody);
        }
        if body.chars().count() > COMMENT_MAX {
            return Err(CommentValidationError::BodyTooLong { max: COMMENT_MAX });
        }
        Ok(Self {
            id: Uuid::new_v4(),
            post_id,
            author_id,
            body,
            created_at: now,
        })
    }

    /// Reassemble a comment from persisted parts.
    pub fn from_parts(
        id: Uuid,
        post_id: Uuid,
        author_id: UserId,
        body: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            post_id,
            author_id,
            body,
            created_at,
        }
    }

    /// Comment identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The post this comment belongs to.
    pub fn post_id(&self) -> Uuid {
        self.post_id
    }

    /// Author identifier.
    pub fn author_id(&self) -> &UserId {
        &self.author_id
    }

    /// Comment body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
