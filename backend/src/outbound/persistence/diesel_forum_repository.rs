//! Diesel-backed repository for forum threads and replies.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageRequest;
use uuid::Uuid;

use crate::domain::ports::{ForumRepository, PersistenceError, ThreadPage};
use crate::domain::{ForumReply, ForumThread};

use super::error_mapping::{like_pattern, map_diesel_error, map_pool_error};
use super::models::{NewReplyRow, NewThreadRow, ReplyRow, ThreadRow};
use super::pool::DbPool;
use super::schema::{forum_replies, forum_threads};

type BoxedThreadsQuery = forum_threads::BoxedQuery<'static, diesel::pg::Pg>;

/// PostgreSQL adapter for the forum.
pub struct DieselForumRepository {
    pool: DbPool,
}

impl DieselForumRepository {
    /// Create a repository backed by the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn filtered(search: Option<&str>) -> BoxedThreadsQuery {
        let mut query = forum_threads::table.into_boxed();
        if let Some(term) = search {
            let pattern = like_pattern(term);
            query = query.filter(
                forum_threads::title
                    .ilike(pattern.clone())
                    .or(forum_threads::body.ilike(pattern)),
            );
        }
        query
    }
}

#[async_trait]
impl ForumRepository for DieselForumRepository {
    async fn list(
        &self,
        search: Option<&str>,
        page: &PageRequest,
    ) -> Result<ThreadPage, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = Self::filtered(search)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<ThreadRow> = Self::filtered(search)
            .order(forum_threads::last_activity_at.desc())
            .offset(page.offset())
            .limit(page.limit())
            .select(ThreadRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(ThreadPage {
            items: rows.into_iter().map(ThreadRow::into_domain).collect(),
            total: u64::try_from(total).unwrap_or_default(),
        })
    }

    async fn find(&self, id: Uuid) -> Result<Option<ForumThread>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ThreadRow> = forum_threads::table
            .find(id)
            .select(ThreadRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(ThreadRow::into_domain))
    }

    async fn replies(&self, thread_id: Uuid) -> Result<Vec<ForumReply>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ReplyRow> = forum_replies::table
            .filter(forum_replies::thread_id.eq(thread_id))
            .order(forum_replies::created_at.asc())
            .select(ReplyRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(ReplyRow::into_domain).collect())
    }

    async fn insert_thread(&self, thread: &ForumThread) -> Result<(), PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewThreadRow {
            id: thread.id(),
            author_id: *thread.author_id().as_uuid(),
            title: thread.title(),
            body: thread.body(),
            reply_count: i64::try_from(thread.reply_count()).unwrap_or_default(),
            created_at: thread.created_at(),
            last_activity_at: thread.last_activity_at(),
        };
        diesel::insert_into(forum_threads::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn insert_reply(&self, reply: &ForumReply) -> Result<bool, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // The bump doubles as the existence check: zero rows means no thread.
        let bumped = diesel::update(forum_threads::table.find(reply.thread_id()))
            .set((
                forum_threads::reply_count.eq(forum_threads::reply_count + 1),
                forum_threads::last_activity_at.eq(reply.created_at()),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if bumped == 0 {
            return Ok(false);
        }
        let row = NewReplyRow {
            id: reply.id(),
            thread_id: reply.thread_id(),
            author_id: *reply.author_id().as_uuid(),
            body: reply.body(),
            created_at: reply.created_at(),
        };
        diesel::insert_into(forum_replies::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(true)
    }

    async fn delete_thread(&self, id: Uuid) -> Result<bool, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(forum_replies::table.filter(forum_replies::thread_id.eq(id)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let deleted = diesel::delete(forum_threads::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn thread_search_covers_title_and_body() {
        let sql =
            diesel::debug_query::<diesel::pg::Pg, _>(&DieselForumRepository::filtered(Some("rust")))
                .to_string();
        assert!(sql.contains("\"forum_threads\".\"title\" ILIKE"));
        assert!(sql.contains("\"forum_threads\".\"body\" ILIKE"));
    }
}
