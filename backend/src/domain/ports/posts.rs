//! Driving port for community posts.

use std::sync::Mutex;

use async_trait::async_trait;
use pagination::PageRequest;
use uuid::Uuid;

use crate::domain::post::{ModerationStatus, Post, PostKind};
use crate::domain::user::UserId;

use super::{PersistenceError, matches_search, page_slice};

/// Who is looking at the list, for moderation-aware filtering.
#[derive(Debug, Clone, Default)]
pub struct Viewer {
    /// The authenticated user, if any.
    pub user_id: Option<UserId>,
    /// Whether the viewer can see unapproved content.
    pub can_moderate: bool,
}

impl Viewer {
    /// A viewer for the given user and moderation flag.
    pub fn new(user_id: UserId, can_moderate: bool) -> Self {
        Self {
            user_id: Some(user_id),
            can_moderate,
        }
    }
}

/// Server-computed filters for the posts list.
#[derive(Debug, Clone, Default)]
pub struct PostListFilter {
    /// Case-insensitive substring over title and body.
    pub search: Option<String>,
    /// Restrict to a single post kind.
    pub kind: Option<PostKind>,
    /// Visibility context.
    pub viewer: Viewer,
}

/// One page of posts plus the total match count.
#[derive(Debug, Clone)]
pub struct PostPage {
    /// The posts on this page, newest first.
    pub items: Vec<Post>,
    /// Total posts matching the filter.
    pub total: u64,
}

/// Repository port for the post aggregate.
#[async_trait]
pub trait PostsRepository: Send + Sync {
    /// List visible posts, newest first.
    async fn list(
        &self,
        filter: &PostListFilter,
        page: &PageRequest,
    ) -> Result<PostPage, PersistenceError>;

    /// Fetch a single post.
    async fn find(&self, id: Uuid) -> Result<Option<Post>, PersistenceError>;

    /// Store a new post.
    async fn insert(&self, post: &Post) -> Result<(), PersistenceError>;

    /// Replace a stored post.
    async fn update(&self, post: &Post) -> Result<(), PersistenceError>;

    /// Delete a post and its comments/likes. Returns `false` when absent.
    async fn delete(&self, id: Uuid) -> Result<bool, PersistenceError>;

    /// Toggle the viewer's like on a post.
    ///
    /// Returns the new like count, or `None` when the post is absent.
    async fn toggle_like(&self, id: Uuid, user: &UserId) -> Result<Option<u64>, PersistenceError>;

    /// List posts awaiting review, oldest first.
    async fn list_pending(&self, page: &PageRequest) -> Result<PostPage, PersistenceError>;
}

#[derive(Default)]
struct FixtureState {
    posts: Vec<Post>,
    likes: Vec<(Uuid, UserId)>,
}

/// In-memory posts repository for tests and database-less deployments.
#[derive(Default)]
pub struct FixturePostsRepository {
    state: Mutex<FixtureState>,
}

impl FixturePostsRepository {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, FixtureState>, PersistenceError> {
        self.state
            .lock()
            .map_err(|_| PersistenceError::query("fixture state poisoned"))
    }

    fn with_counted_likes(state: &FixtureState, post: &Post) -> Post {
        let mut counted = post.clone();
        let count = state
            .likes
            .iter()
            .filter(|(post_id, _)| *post_id == post.id())
            .count() as u64;
        counted.set_like_count(count);
        counted
    }
}

#[async_trait]
impl PostsRepository for FixturePostsRepository {
    async fn list(
        &self,
        filter: &PostListFilter,
        page: &PageRequest,
    ) -> Result<PostPage, PersistenceError> {
        let state = self.lock()?;
        let mut visible: Vec<Post> = state
            .posts
            .iter()
            .filter(|post| {
                post.visible_to(filter.viewer.user_id.as_ref(), filter.viewer.can_moderate)
            })
            .filter(|post| filter.kind.is_none_or(|kind| post.kind() == kind))
            .filter(|post| {
                matches_search(&[post.title(), post.body()], filter.search.as_deref())
            })
            .map(|post| Self::with_counted_likes(&state, post))
            .collect();
        visible.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        let (items, total) = page_slice(&visible, page);
        Ok(PostPage { items, total })
    }

    async fn find(&self, id: Uuid) -> Result<Option<Post>, PersistenceError> {
        let state = self.lock()?;
        Ok(state
            .posts
            .iter()
            .find(|post| post.id() == id)
            .map(|post| Self::with_counted_likes(&state, post)))
    }

    async fn insert(&self, post: &Post) -> Result<(), PersistenceError> {
        self.lock()?.posts.push(post.clone());
        Ok(())
    }

    async fn update(&self, post: &Post) -> Result<(), PersistenceError> {
        let mut state = self.lock()?;
        if let Some(slot) = state.posts.iter_mut().find(|p| p.id() == post.id()) {
            *slot = post.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, PersistenceError> {
        let mut state = self.lock()?;
        let before = state.posts.len();
        state.posts.retain(|post| post.id() != id);
        state.likes.retain(|(post_id, _)| *post_id != id);
        Ok(state.posts.len() < before)
    }

    async fn toggle_like(&self, id: Uuid, user: &UserId) -> Result<Option<u64>, PersistenceError> {
        let mut state = self.lock()?;
        if !state.posts.iter().any(|post| post.id() == id) {
            return Ok(None);
        }
        let existing = state
            .likes
            .iter()
            .position(|(post_id, liker)| *post_id == id && liker == user);
        match existing {
            Some(index) => {
                state.likes.remove(index);
            }
            None => state.likes.push((id, user.clone())),
        }
        let count = state
            .likes
            .iter()
            .filter(|(post_id, _)| *post_id == id)
            .count() as u64;
        Ok(Some(count))
    }

    async fn list_pending(&self, page: &PageRequest) -> Result<PostPage, PersistenceError> {
        let state = self.lock()?;
        let mut pending: Vec<Post> = state
            .posts
            .iter()
            .filter(|post| post.status() == ModerationStatus::Pending)
            .map(|post| Self::with_counted_likes(&state, post))
            .collect();
        pending.sort_by_key(Post::created_at);
        let (items, total) = page_slice(&pending, page);
        Ok(PostPage { items, total })
    }
}
