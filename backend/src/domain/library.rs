//! Curated library listings: career guidance, study resources, tutorials.
//!
//! The three collections share one shape and differ only in which shelf
//! they sit on, so a single entity carries a [`LibraryKind`] discriminant.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::user::UserId;

/// Which library shelf a listing belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LibraryKind {
    /// Career-guidance listings (internships, job boards, mentoring).
    Career,
    /// Study resources (notes, past papers, reading lists).
    Study,
    /// Tutorials (walkthroughs and how-to guides).
    Tutorial,
}

impl LibraryKind {
    /// Stable string form used in persistence and URL paths.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Career => "career",
            Self::Study => "study",
            Self::Tutorial => "tutorial",
        }
    }

    /// URL path segment for the collection ("career-resources" etc.).
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::Career => "career-resources",
            Self::Study => "study-resources",
            Self::Tutorial => "tutorials",
        }
    }

    /// Parse the stable string form.
    pub fn parse(value: &str) -> Result<Self, LibraryValidationError> {
        match value {
            "career" => Ok(Self::Career),
            "study" => Ok(Self::Study),
            "tutorial" => Ok(Self::Tutorial),
            other => Err(LibraryValidationError::UnknownKind {
                value: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for LibraryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors for library listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryValidationError {
    EmptyTitle,
    EmptyDescription,
    InvalidLink { value: String },
    EmptyCategory,
    UnknownKind { value: String },
}

impl fmt::Display for LibraryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::EmptyDescription => write!(f, "description must not be empty"),
            Self::InvalidLink { value } => {
                write!(f, "link {value:?} must start with http:// or https://")
            }
            Self::EmptyCategory => write!(f, "category must not be empty"),
            Self::UnknownKind { value } => write!(f, "unknown library kind: {value}"),
        }
    }
}

impl std::error::Error for LibraryValidationError {}

/// One listing on a library shelf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryItem {
    id: Uuid,
    kind: LibraryKind,
    submitted_by: UserId,
    title: String,
    description: String,
    link: String,
    category: String,
    created_at: DateTime<Utc>,
}

impl LibraryItem {
    /// Validate and construct a new listing.
    pub fn new(
        kind: LibraryKind,
        submitted_by: UserId,
        title: impl Into<String>,
        description: impl Into<String>,
        link: impl Into<String>,
        category: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, LibraryValidationError> {
        let title = title.into().trim().to_owned();
        if title.is_empty() {
            return Err(LibraryValidationError::EmptyTitle);
        }
        let description = description.into().trim().to_owned();
        if description.is_empty() {
            return Err(LibraryValidationError::EmptyDescription);
        }
        let link = link.into().trim().to_owned();
        if !(link.starts_with("http://") || link.starts_with("https://")) {
            return Err(LibraryValidationError::InvalidLink { value: link });
        }
        let category = category.into().trim().to_owned();
        if category.is_empty() {
            return Err(LibraryValidationError::EmptyCategory);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            kind,
            submitted_by,
            title,
            description,
            link,
            category,
            created_at: now,
        })
    }

    /// Reassemble a listing from persisted parts.
    #[expect(clippy::too_many_arguments, reason = "row mapping constructor")]
    pub fn from_parts(
        id: Uuid,
        kind: LibraryKind,
        submitted_by: UserId,
        title: String,
        description: String,
        link: String,
        category: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            kind,
            submitted_by,
            title,
            description,
            link,
            category,
            created_at,
        }
    }

    /// Listing identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The shelf this listing sits on.
    pub fn kind(&self) -> LibraryKind {
        self.kind
    }

    /// Submitting user.
    pub fn submitted_by(&self) -> &UserId {
        &self.submitted_by
    }

    /// Listing title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Listing description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// External link.
    pub fn link(&self) -> &str {
        &self.link
    }

    /// Free-form category label.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
