//! Server-computed view models returned as page props.
//!
//! The portal sends display-ready values: author initials and avatar colours
//! are computed here, and timestamps are rendered as relative "time ago"
//! strings so pages never format dates themselves. Raw RFC 3339 timestamps
//! travel alongside for clients that need exact ordering.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ports::UserRepository;
use crate::domain::presentation::{avatar_color, initials, time_ago};
use crate::domain::{
    Achievement, Announcement, Comment, Error, ForumReply, ForumThread, LibraryItem, Post,
    Suggestion, User, UserId,
};

/// Display name shown when an author's account no longer exists.
const DELETED_AUTHOR_NAME: &str = "Former member";

/// Display-ready author block attached to every authored record.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorView {
    /// Author's user id.
    pub id: String,
    /// Display name, or a placeholder for deleted accounts.
    pub name: String,
    /// Up to two uppercase initials for the avatar badge.
    pub initials: String,
    /// Stable hex colour for the avatar background.
    pub avatar_color: String,
}

impl AuthorView {
    fn from_name(id: &UserId, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_owned(),
            initials: initials(name),
            avatar_color: avatar_color(name).to_owned(),
        }
    }

    /// Author block for the given user.
    #[must_use]
    pub fn for_user(user: &User) -> Self {
        Self::from_name(user.id(), user.display_name().as_ref())
    }

    /// Placeholder block for an author whose account was deleted.
    #[must_use]
    pub fn deleted(id: &UserId) -> Self {
        Self::from_name(id, DELETED_AUTHOR_NAME)
    }
}

/// Resolve author blocks for a batch of user ids in one repository call.
pub struct AuthorDirectory {
    names: HashMap<UserId, AuthorView>,
}

impl AuthorDirectory {
    /// Look up display names for every distinct id in `ids`.
    pub async fn resolve(
        users: &Arc<dyn UserRepository>,
        ids: impl IntoIterator<Item = UserId>,
    ) -> Result<Self, Error> {
        let distinct: HashSet<UserId> = ids.into_iter().collect();
        let distinct: Vec<UserId> = distinct.into_iter().collect();
        let names = users.display_names(&distinct).await?;
        let views = names
            .into_iter()
            .map(|(id, name)| {
                let view = AuthorView::from_name(&id, name.as_ref());
                (id, view)
            })
            .collect();
        Ok(Self { names: views })
    }

    /// The author block for `id`, falling back to the deleted placeholder.
    #[must_use]
    pub fn get(&self, id: &UserId) -> AuthorView {
        self.names
            .get(id)
            .cloned()
            .unwrap_or_else(|| AuthorView::deleted(id))
    }
}

fn stamp(at: DateTime<Utc>, now: DateTime<Utc>) -> (String, String) {
    (at.to_rfc3339(), time_ago(at, now))
}

/// A community post as rendered in the feed and detail pages.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PostView {
    pub id: String,
    pub title: String,
    pub body: String,
    pub kind: String,
    pub status: String,
    pub tags: Vec<String>,
    pub like_count: u64,
    pub author: AuthorView,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// Relative timestamp, e.g. "2 hours ago".
    pub posted: String,
}

impl PostView {
    /// Build the view for one post.
    #[must_use]
    pub fn render(post: &Post, author: AuthorView, now: DateTime<Utc>) -> Self {
        let (created_at, posted) = stamp(post.created_at(), now);
        Self {
            id: post.id().to_string(),
            title: post.title().to_owned(),
            body: post.body().to_owned(),
            kind: post.kind().as_str().to_owned(),
            status: post.status().as_str().to_owned(),
            tags: post.tags().iter().map(ToString::to_string).collect(),
            like_count: post.like_count(),
            author,
            created_at,
            posted,
        }
    }
}

/// A comment under a post.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CommentView {
    pub id: String,
    pub body: String,
    pub author: AuthorView,
    pub posted: String,
}

impl CommentView {
    #[must_use]
    pub fn render(comment: &Comment, author: AuthorView, now: DateTime<Utc>) -> Self {
        Self {
            id: comment.id().to_string(),
            body: comment.body().to_owned(),
            author,
            posted: time_ago(comment.created_at(), now),
        }
    }
}

/// A member suggestion.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SuggestionView {
    pub id: String,
    pub title: String,
    pub body: String,
    pub author: AuthorView,
    pub posted: String,
}

impl SuggestionView {
    #[must_use]
    pub fn render(suggestion: &Suggestion, author: AuthorView, now: DateTime<Utc>) -> Self {
        Self {
            id: suggestion.id().to_string(),
            title: suggestion.title().to_owned(),
            body: suggestion.body().to_owned(),
            author,
            posted: time_ago(suggestion.created_at(), now),
        }
    }
}

/// An official announcement.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AnnouncementView {
    pub id: String,
    pub title: String,
    pub body: String,
    pub author: AuthorView,
    pub published: String,
}

impl AnnouncementView {
    #[must_use]
    pub fn render(announcement: &Announcement, author: AuthorView, now: DateTime<Utc>) -> Self {
        Self {
            id: announcement.id().to_string(),
            title: announcement.title().to_owned(),
            body: announcement.body().to_owned(),
            author,
            published: time_ago(announcement.published_at(), now),
        }
    }
}

/// A celebrated achievement.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AchievementView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub recipient: String,
    /// Avatar block derived from the recipient's free-form name.
    pub recipient_initials: String,
    pub recipient_avatar_color: String,
    pub awarded: String,
}

impl AchievementView {
    #[must_use]
    pub fn render(achievement: &Achievement, now: DateTime<Utc>) -> Self {
        Self {
            id: achievement.id().to_string(),
            title: achievement.title().to_owned(),
            description: achievement.description().to_owned(),
            recipient: achievement.recipient().to_owned(),
            recipient_initials: initials(achievement.recipient()),
            recipient_avatar_color: avatar_color(achievement.recipient()).to_owned(),
            awarded: time_ago(achievement.awarded_at(), now),
        }
    }
}

/// One entry in a resource library listing.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LibraryItemView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub link: String,
    pub category: String,
    pub added: String,
}

impl LibraryItemView {
    #[must_use]
    pub fn render(item: &LibraryItem, now: DateTime<Utc>) -> Self {
        Self {
            id: item.id().to_string(),
            title: item.title().to_owned(),
            description: item.description().to_owned(),
            link: item.link().to_owned(),
            category: item.category().to_owned(),
            added: time_ago(item.created_at(), now),
        }
    }
}

/// A forum thread row in the listing.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ThreadSummaryView {
    pub id: String,
    pub title: String,
    pub author: AuthorView,
    pub reply_count: u64,
    pub started: String,
    pub last_activity: String,
}

impl ThreadSummaryView {
    #[must_use]
    pub fn render(thread: &ForumThread, author: AuthorView, now: DateTime<Utc>) -> Self {
        Self {
            id: thread.id().to_string(),
            title: thread.title().to_owned(),
            author,
            reply_count: thread.reply_count(),
            started: time_ago(thread.created_at(), now),
            last_activity: time_ago(thread.last_activity_at(), now),
        }
    }
}

/// A reply within a thread.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReplyView {
    pub id: String,
    pub body: String,
    pub author: AuthorView,
    pub posted: String,
}

impl ReplyView {
    #[must_use]
    pub fn render(reply: &ForumReply, author: AuthorView, now: DateTime<Utc>) -> Self {
        Self {
            id: reply.id().to_string(),
            body: reply.body().to_owned(),
            author,
            posted: time_ago(reply.created_at(), now),
        }
    }
}

/// Full thread page: the opening post plus all replies.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ThreadView {
    pub id: String,
    pub title: String,
    pub body: String,
    pub author: AuthorView,
    pub reply_count: u64,
    pub started: String,
    pub replies: Vec<ReplyView>,
}

impl ThreadView {
    #[must_use]
    pub fn render(
        thread: &ForumThread,
        author: AuthorView,
        replies: Vec<ReplyView>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: thread.id().to_string(),
            title: thread.title().to_owned(),
            body: thread.body().to_owned(),
            author,
            reply_count: thread.reply_count(),
            started: time_ago(thread.created_at(), now),
            replies,
        }
    }
}

/// The signed-in user as returned by login and `/me`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionUserView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub initials: String,
    pub avatar_color: String,
}

impl SessionUserView {
    #[must_use]
    pub fn render(user: &User) -> Self {
        let name = user.display_name().as_ref();
        Self {
            id: user.id().to_string(),
            name: name.to_owned(),
            email: user.email().as_ref().to_owned(),
            role: user.role().as_str().to_owned(),
            initials: initials(name),
            avatar_color: avatar_color(name).to_owned(),
        }
    }
}

/// A user row on the admin management page.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserAdminView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub initials: String,
    pub avatar_color: String,
}

impl UserAdminView {
    #[must_use]
    pub fn render(user: &User) -> Self {
        let name = user.display_name().as_ref();
        Self {
            id: user.id().to_string(),
            name: name.to_owned(),
            email: user.email().as_ref().to_owned(),
            role: user.role().as_str().to_owned(),
            initials: initials(name),
            avatar_color: avatar_color(name).to_owned(),
        }
    }
}
