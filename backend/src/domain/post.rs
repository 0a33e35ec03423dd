//! Community post aggregate and its moderation lifecycle.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::user::UserId;

/// Validation errors returned by the post constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostValidationError {
    EmptyTitle,
    TitleTooLong { max: usize },
    EmptyBody,
    BodyTooLong { max: usize },
    InvalidTag { value: String },
    TooManyTags { max: usize },
    UnknownKind { value: String },
    UnknownStatus { value: String },
}

impl fmt::Display for PostValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::EmptyBody => write!(f, "body must not be empty"),
            Self::BodyTooLong { max } => write!(f, "body must be at most {max} characters"),
            Self::InvalidTag { value } => write!(
                f,
                "tag {value:?} must be 1-32 lowercase letters, digits, or hyphens"
            ),
            Self::TooManyTags { max } => write!(f, "a post may carry at most {max} tags"),
            Self::UnknownKind { value } => write!(f, "unknown post kind: {value}"),
            Self::UnknownStatus { value } => write!(f, "unknown moderation status: {value}"),
        }
    }
}

impl std::error::Error for PostValidationError {}

/// Maximum title length in characters.
pub const TITLE_MAX: usize = 120;
/// Maximum body length in characters.
pub const BODY_MAX: usize = 10_000;
/// Maximum number of tags per post.
pub const TAGS_MAX: usize = 5;

/// What a community post announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PostKind {
    /// A shared learning resource.
    Resource,
    /// A hackathon call for participants.
    Hackathon,
    /// A student project looking for collaborators.
    Project,
    /// A community announcement submitted by a member.
    Announcement,
}

impl PostKind {
    /// Stable string form used in persistence and query filters.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Resource => "resource",
            Self::Hackathon => "hackathon",
            Self::Project => "project",
            Self::Announcement => "announcement",
        }
    }

    /// Parse the stable string form.
    pub fn parse(value: &str) -> Result<Self, PostValidationError> {
        match value {
            "resource" => Ok(Self::Resource),
            "hackathon" => Ok(Self::Hackathon),
            "project" => Ok(Self::Project),
            "announcement" => Ok(Self::Announcement),
            other => Err(PostValidationError::UnknownKind {
                value: other.to_owned(),
            }),
        }
    }
}

/// Moderation state gating a post's visibility.
///
/// Pending and rejected posts are visible only to their author and to
/// moderators; approved posts are visible to everyone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ModerationStatus {
    /// Awaiting moderator review.
    Pending,
    /// Approved for the general population.
    Approved,
    /// Rejected by a moderator.
    Rejected,
}

impl ModerationStatus {
    /// Stable string form used in persistence.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parse the stable string form.
    pub fn parse(value: &str) -> Result<Self, PostValidationError> {
        match value {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(PostValidationError::UnknownStatus {
                value: other.to_owned(),
            }),
        }
    }
}

/// Validated lowercase tag slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tag(String);

impl Tag {
    /// Validate and construct a [`Tag`].
    pub fn new(value: impl Into<String>) -> Result<Self, PostValidationError> {
        let value = value.into();
        let valid = !value.is_empty()
            && value.chars().count() <= 32
            && value
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if valid {
            Ok(Self(value))
        } else {
            Err(PostValidationError::InvalidTag { value })
        }
    }
}

impl AsRef<str> for Tag {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Tag> for String {
    fn from(value: Tag) -> Self {
        value.0
    }
}

impl TryFrom<String> for Tag {
    type Error = PostValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Draft fields accepted from a create or update form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    title: String,
    body: String,
    kind: PostKind,
    tags: Vec<Tag>,
}

impl PostDraft {
    /// Validate form input into a draft.
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        kind: PostKind,
        tags: Vec<String>,
    ) -> Result<Self, PostValidationError> {
        let title = validate_text(title.into(), TITLE_MAX, true)?;
        let body = validate_text(body.into(), BODY_MAX, false)?;
        if tags.len() > TAGS_MAX {
            return Err(PostValidationError::TooManyTags { max: TAGS_MAX });
        }
        let tags = tags.into_iter().map(Tag::new).collect::<Result<_, _>>()?;
        Ok(Self {
            title,
            body,
            kind,
            tags,
        })
    }

    /// Validated title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Validated body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Post kind.
    pub fn kind(&self) -> PostKind {
        self.kind
    }

    /// Validated tags.
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }
}

fn validate_text(
    raw: String,
    max: usize,
    is_title: bool,
) -> Result<String, PostValidationError> {
    let trimmed = raw.trim().to_owned();
    if trimmed.is_empty() {
        return Err(if is_title {
            PostValidationError::EmptyTitle
        } else {
            PostValidationError::EmptyBody
        });
    }
    if trimmed.chars().count() > max {
        return Err(if is_title {
            PostValidationError::TitleTooLong { max }
        } else {
            PostValidationError::BodyTooLong { max }
        });
    }
    Ok(trimmed)
}

/// A unit of user-submitted community content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    id: Uuid,
    author_id: UserId,
    title: String,
    body: String,
    kind: PostKind,
    status: ModerationStatus,
    tags: Vec<Tag>,
    like_count: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Post {
    /// Assemble a post from a validated draft.
    ///
    /// Posts submitted by moderators skip the review queue.
    pub fn from_draft(
        author_id: UserId,
        draft: PostDraft,
        author_can_moderate: bool,
        now: DateTime<Utc>,
    ) -> Self {
        let status = if author_can_moderate {
            ModerationStatus::Approved
        } else {
            ModerationStatus::Pending
        };
        let PostDraft {
            title,
            body,
            kind,
            tags,
        } = draft;
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            body,
            kind,
            status,
            tags,
            like_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reassemble a post from persisted parts.
    #[expect(clippy::too_many_arguments, reason = "row mapping constructor")]
    pub fn from_parts(
        id: Uuid,
        author_id: UserId,
        title: String,
        body: String,
        kind: PostKind,
        status: ModerationStatus,
        tags: Vec<Tag>,
        like_count: u64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            author_id,
            title,
            body,
            kind,
            status,
            tags,
            like_count,
            created_at,
            updated_at,
        }
    }

    /// Apply an edit from the author or a moderator.
    ///
    /// Edits by regular members send an approved post back to review.
    pub fn apply_edit(&mut self, draft: PostDraft, editor_can_moderate: bool, now: DateTime<Utc>) {
        let PostDraft {
            title,
            body,
            kind,
            tags,
        } = draft;
        self.title = title;
        self.body = body;
        self.kind = kind;
        self.tags = tags;
        self.updated_at = now;
        if !editor_can_moderate {
            self.status = ModerationStatus::Pending;
        }
    }

    /// Mark the post approved.
    pub fn approve(&mut self, now: DateTime<Utc>) {
        self.status = ModerationStatus::Approved;
        self.updated_at = now;
    }

    /// Mark the post rejected.
    pub fn reject(&mut self, now: DateTime<Utc>) {
        self.status = ModerationStatus::Rejected;
        self.updated_at = now;
    }

    /// Whether `viewer` may see this post in lists and detail pages.
    pub fn visible_to(&self, viewer: Option<&UserId>, viewer_can_moderate: bool) -> bool {
        matches!(self.status, ModerationStatus::Approved)
            || viewer_can_moderate
            || viewer == Some(&self.author_id)
    }

    /// Post identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Author identifier.
    pub fn author_id(&self) -> &UserId {
        &self.author_id
    }

    /// Post title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Post body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Post kind.
    pub fn kind(&self) -> PostKind {
        self.kind
    }

    /// Moderation status.
    pub fn status(&self) -> ModerationStatus {
        self.status
    }

    /// Tags attached to the post.
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Number of likes.
    pub fn like_count(&self) -> u64 {
        self.like_count
    }

    /// Set the like count (maintained by repositories).
    pub fn set_like_count(&mut self, count: u64) {
        self.like_count = count;
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last modification timestamp.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
