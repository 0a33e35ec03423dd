//! Suggestions submitted through the community feedback box.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::user::UserId;

/// Maximum suggestion title length.
pub const SUGGESTION_TITLE_MAX: usize = 120;
/// Maximum suggestion body length.
pub const SUGGESTION_BODY_MAX: usize = 4_000;

/// Validation errors for suggestion submissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionValidationError {
    EmptyTitle,
    TitleTooLong { max: usize },
    EmptyBody,
    BodyTooLong { max: usize },
}

impl fmt::Display for SuggestionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::EmptyBody => write!(f, "body must not be empty"),
            Self::BodyTooLong { max } => write!(f, "body must be at most {max} characters"),
        }
    }
}

impl std::error::Error for SuggestionValidationError {}

/// A member-submitted suggestion for the community.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    id: Uuid,
    author_id: UserId,
    title: String,
    body: String,
    created_at: DateTime<Utc>,
}

impl Suggestion {
    /// Validate and construct a new suggestion.
    pub fn new(
        author_id: UserId,
        title: impl Into<String>,
        body: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, SuggestionValidationError> {
        let title = title.into().trim().to_owned();
        if title.is_empty() {
            return Err(SuggestionValidationError::EmptyTitle);
        }
        if title.chars().count() > SUGGESTION_TITLE_MAX {
            return Err(SuggestionValidationError::TitleTooLong {
                max: SUGGESTION_TITLE_MAX,
            });
        }
        let body = body.into().trim().to_owned();
        if body.is_empty() {
            return Err(SuggestionValidationError::EmptyBody);
        }
        if body.chars().count() > SUGGESTION_BODY_MAX {
            return Err(SuggestionValidationError::BodyTooLong {
                max: SUGGESTION_BODY_MAX,
            });
        }
        Ok(Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            body,
            created_at: now,
        })
    }

    /// Reassemble a suggestion from persisted parts.
    pub fn from_parts(
        id: Uuid,
        author_id: UserId,
        title: String,
        body: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            author_id,
            title,
            body,
            created_at,
        }
    }

    /// Suggestion identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Author identifier.
    pub fn author_id(&self) -> &UserId {
        &self.author_id
    }

    /// Suggestion title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Suggestion body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
