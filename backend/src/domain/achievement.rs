//! Community achievements celebrated on the portal.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::user::UserId;

/// Validation errors for achievement submissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AchievementValidationError {
    EmptyTitle,
    EmptyDescription,
    EmptyRecipient,
}

impl fmt::Display for AchievementValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::EmptyDescription => write!(f, "description must not be empty"),
            Self::EmptyRecipient => write!(f, "recipient must not be empty"),
        }
    }
}

impl std::error::Error for AchievementValidationError {}

/// A celebrated community achievement.
///
/// The recipient is a free-form display string rather than a user
/// reference; achievements often name teams or alumni without accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Achievement {
    id: Uuid,
    submitted_by: UserId,
    title: String,
    description: String,
    recipient: String,
    awarded_at: DateTime<Utc>,
}

impl Achievement {
    /// Validate and construct a new achievement entry.
    pub fn new(
        submitted_by: UserId,
        title: impl Into<String>,
        description: impl Into<String>,
        recipient: impl Into<String>,
        awarded_at: DateTime<Utc>,
    ) -> Result<Self, AchievementValidationError> {
        let title = title.into().trim().to_owned();
        if title.is_empty() {
            return Err(AchievementValidationError::EmptyTitle);
        }
        let description = description.into().trim().to_owned();
        if description.is_empty() {
            return Err(AchievementValidationError::EmptyDescription);
        }
        let recipient = recipient.into().trim().to_owned();
        if recipient.is_empty() {
            return Err(AchievementValidationError::EmptyRecipient);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            submitted_by,
            title,
            description,
            recipient,
            awarded_at,
        })
    }

    /// Reassemble an achievement from persisted parts.
    pub fn from_parts(
        id: Uuid,
        submitted_by: UserId,
        title: String,
        description: String,
        recipient: String,
        awarded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            submitted_by,
            title,
            description,
            recipient,
            awarded_at,
        }
    }

    /// Achievement identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Submitting moderator.
    pub fn submitted_by(&self) -> &UserId {
        &self.submitted_by
    }

    /// Achievement title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Achievement description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Who earned the achievement.
    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    /// When the achievement was awarded.
    pub fn awarded_at(&self) -> DateTime<Utc> {
        self.awarded_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_recipient_is_rejected() {
        let err = Achievement::new(UserId::random(), "Hack win", "First place", " ", Utc::now())
            .expect_err("blank recipient");
        assert_eq!(err, AchievementValidationError::EmptyRecipient);
    }
}
