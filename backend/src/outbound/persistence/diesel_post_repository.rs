//! Diesel-backed repository for posts, likes, and comments.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use pagination::PageRequest;
use uuid::Uuid;

use crate::domain::ports::{
    CommentsRepository, PersistenceError, PostListFilter, PostPage, PostsRepository,
};
use crate::domain::{Comment, ModerationStatus, Post, UserId};

use super::error_mapping::{like_pattern, map_diesel_error, map_pool_error};
use super::models::{CommentRow, NewCommentRow, NewPostRow, PostRow, PostUpdate};
use super::pool::DbPool;
use super::schema::{comments, post_likes, posts};

type BoxedPostsQuery = posts::BoxedQuery<'static, diesel::pg::Pg>;

/// PostgreSQL adapter for the post aggregate, including likes and comments.
pub struct DieselPostRepository {
    pool: DbPool,
}

impl DieselPostRepository {
    /// Create a repository backed by the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Apply visibility, kind, and search filters to the posts table.
    fn filtered(filter: &PostListFilter) -> BoxedPostsQuery {
        let mut query = posts::table.into_boxed();
        if !filter.viewer.can_moderate {
            query = match &filter.viewer.user_id {
                Some(user) => query.filter(
                    posts::status
                        .eq(ModerationStatus::Approved.as_str())
                        .or(posts::author_id.eq(*user.as_uuid())),
                ),
                None => query.filter(posts::status.eq(ModerationStatus::Approved.as_str())),
            };
        }
        if let Some(kind) = filter.kind {
            query = query.filter(posts::kind.eq(kind.as_str()));
        }
        if let Some(term) = filter.search.as_deref() {
            let pattern = like_pattern(term);
            query = query
                .filter(posts::title.ilike(pattern.clone()).or(posts::body.ilike(pattern)));
        }
        query
    }

    /// Like counts for a batch of posts in one grouped query.
    async fn like_counts(
        conn: &mut AsyncPgConnection,
        ids: &[Uuid],
    ) -> Result<HashMap<Uuid, u64>, PersistenceError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows: Vec<(Uuid, i64)> = post_likes::table
            .filter(post_likes::post_id.eq_any(ids))
            .group_by(post_likes::post_id)
            .select((post_likes::post_id, diesel::dsl::count_star()))
            .load(conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows
            .into_iter()
            .map(|(id, count)| (id, u64::try_from(count).unwrap_or_default()))
            .collect())
    }

    async fn page_of(
        conn: &mut AsyncPgConnection,
        rows: Vec<PostRow>,
        total: i64,
    ) -> Result<PostPage, PersistenceError> {
        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let counts = Self::like_counts(conn, &ids).await?;
        let items = rows
            .into_iter()
            .map(|row| {
                let likes = counts.get(&row.id).copied().unwrap_or_default();
                row.into_domain(likes)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PostPage {
            items,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }
}

#[async_trait]
impl PostsRepository for DieselPostRepository {
    async fn list(
        &self,
        filter: &PostListFilter,
        page: &PageRequest,
    ) -> Result<PostPage, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = Self::filtered(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<PostRow> = Self::filtered(filter)
            .order(posts::created_at.desc())
            .offset(page.offset())
            .limit(page.limit())
            .select(PostRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Self::page_of(&mut conn, rows, total).await
    }

    async fn find(&self, id: Uuid) -> Result<Option<Post>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<PostRow> = posts::table
            .find(id)
            .select(PostRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(row) = row else {
            return Ok(None);
        };
        let counts = Self::like_counts(&mut conn, &[row.id]).await?;
        let likes = counts.get(&row.id).copied().unwrap_or_default();
        row.into_domain(likes).map(Some)
    }

    async fn insert(&self, post: &Post) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewPostRow {
            id: post.id(),
            author_id: *post.author_id().as_uuid(),
            title: post.title(),
            body: post.body(),
            kind: post.kind().as_str(),
            status: post.status().as_str(),
            tags: post.tags().iter().map(|tag| tag.as_ref().to_owned()).collect(),
            created_at: post.created_at(),
            updated_at: post.updated_at(),
        };
        diesel::insert_into(posts::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn update(&self, post: &Post) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = PostUpdate {
            title: post.title(),
            body: post.body(),
            kind: post.kind().as_str(),
            status: post.status().as_str(),
            tags: post.tags().iter().map(|tag| tag.as_ref().to_owned()).collect(),
            updated_at: post.updated_at(),
        };
        diesel::update(posts::table.find(post.id()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(post_likes::table.filter(post_likes::post_id.eq(id)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        diesel::delete(comments::table.filter(comments::post_id.eq(id)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let deleted = diesel::delete(posts::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn toggle_like(&self, id: Uuid, user: &UserId) -> Result<Option<u64>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let known: i64 = posts::table
            .filter(posts::id.eq(id))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if known == 0 {
            return Ok(None);
        }
        let removed = diesel::delete(
            post_likes::table
                .filter(post_likes::post_id.eq(id))
                .filter(post_likes::user_id.eq(*user.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        if removed == 0 {
            diesel::insert_into(post_likes::table)
                .values((
                    post_likes::post_id.eq(id),
                    post_likes::user_id.eq(*user.as_uuid()),
                ))
                .on_conflict_do_nothing()
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error)?;
        }
        let count: i64 = post_likes::table
            .filter(post_likes::post_id.eq(id))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(Some(u64::try_from(count).unwrap_or_default()))
    }

    async fn list_pending(&self, page: &PageRequest) -> Result<PostPage, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let pending = posts::status.eq(ModerationStatus::Pending.as_str());
        let total: i64 = posts::table
            .filter(pending)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<PostRow> = posts::table
            .filter(pending)
            .order(posts::created_at.asc())
            .offset(page.offset())
            .limit(page.limit())
            .select(PostRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Self::page_of(&mut conn, rows, total).await
    }
}

#[async_trait]
impl CommentsRepository for DieselPostRepository {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CommentRow> = comments::table
            .filter(comments::post_id.eq(post_id))
            .order(comments::created_at.asc())
            .select(CommentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(CommentRow::into_domain).collect())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Comment>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CommentRow> = comments::table
            .find(id)
            .select(CommentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(CommentRow::into_domain))
    }

    async fn insert(&self, comment: &Comment) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewCommentRow {
            id: comment.id(),
            post_id: comment.post_id(),
            author_id: *comment.author_id().as_uuid(),
            body: comment.body(),
            created_at: comment.created_at(),
        };
        diesel::insert_into(comments::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(comments::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PostKind;
    use crate::domain::ports::Viewer;
    use rstest::rstest;

    fn sql_for(filter: &PostListFilter) -> String {
        diesel::debug_query::<diesel::pg::Pg, _>(&DieselPostRepository::filtered(filter))
            .to_string()
    }

    #[rstest]
    fn anonymous_listing_restricts_to_approved() {
        let sql = sql_for(&PostListFilter::default());
        // Every column appears in the SELECT list, so assert on the
        // predicates (column plus operator) rather than bare column names.
        assert!(sql.contains("\"posts\".\"status\" ="));
        assert!(!sql.contains("\"posts\".\"author_id\" ="));
    }

    #[rstest]
    fn members_also_see_their_own_unapproved_posts() {
        let filter = PostListFilter {
            viewer: Viewer::new(UserId::random(), false),
            ..PostListFilter::default()
        };
        let sql = sql_for(&filter);
        assert!(sql.contains("\"posts\".\"author_id\" ="));
    }

    #[rstest]
    fn moderators_skip_the_visibility_filter() {
        let filter = PostListFilter {
            viewer: Viewer::new(UserId::random(), true),
            ..PostListFilter::default()
        };
        let sql = sql_for(&filter);
        assert!(!sql.contains("\"posts\".\"status\" ="));
        assert!(!sql.contains("\"posts\".\"author_id\" ="));
    }

    #[rstest]
    fn search_and_kind_filters_compose() {
        let filter = PostListFilter {
            search: Some("rust".to_owned()),
            kind: Some(PostKind::Hackathon),
            ..PostListFilter::default()
        };
        let sql = sql_for(&filter);
        assert!(sql.contains("ILIKE"));
        assert!(sql.contains("\"posts\".\"kind\" ="));
    }
}
