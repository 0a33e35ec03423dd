//! Diesel-backed repository for user accounts.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageRequest;
use uuid::Uuid;

use crate::domain::ports::{PersistenceError, UserPage, UserRepository};
use crate::domain::{DisplayName, Role, User, UserId};

use super::error_mapping::{like_pattern, map_diesel_error, map_pool_error};
use super::models::UserRow;
use super::pool::DbPool;
use super::schema::users;

type BoxedUsersQuery = users::BoxedQuery<'static, diesel::pg::Pg>;

/// PostgreSQL adapter for user accounts.
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a repository backed by the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn filtered(search: Option<&str>) -> BoxedUsersQuery {
        let mut query = users::table.into_boxed();
        if let Some(term) = search {
            let pattern = like_pattern(term);
            query = query.filter(
                users::display_name
                    .ilike(pattern.clone())
                    .or(users::email.ilike(pattern)),
            );
        }
        query
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(*id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(UserRow::into_domain).transpose()
    }

    async fn list(
        &self,
        search: Option<&str>,
        page: &PageRequest,
    ) -> Result<UserPage, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = Self::filtered(search)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<UserRow> = Self::filtered(search)
            .order(users::display_name.asc())
            .offset(page.offset())
            .limit(page.limit())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let items = rows
            .into_iter()
            .map(UserRow::into_domain)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(UserPage {
            items,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }

    async fn set_role(&self, id: &UserId, role: Role) -> Result<Option<User>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = diesel::update(users::table.find(*id.as_uuid()))
            .set((
                users::role.eq(role.as_str()),
                users::updated_at.eq(Utc::now()),
            ))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(UserRow::into_domain).transpose()
    }

    async fn delete(&self, id: &UserId) -> Result<bool, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(users::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn display_names(
        &self,
        ids: &[UserId],
    ) -> Result<HashMap<UserId, DisplayName>, PersistenceError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let rows: Vec<(Uuid, String)> = users::table
            .filter(users::id.eq_any(&uuids))
            .select((users::id, users::display_name))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|(id, name)| {
                let name = DisplayName::new(name).map_err(|err| {
                    PersistenceError::query(format!("users.display_name holds invalid data: {err}"))
                })?;
                Ok((UserId::from_uuid(id), name))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn user_search_covers_name_and_email() {
        let sql =
            diesel::debug_query::<diesel::pg::Pg, _>(&DieselUserRepository::filtered(Some("ada")))
                .to_string();
        assert!(sql.contains("\"users\".\"display_name\" ILIKE"));
        assert!(sql.contains("\"users\".\"email\" ILIKE"));
    }
}
