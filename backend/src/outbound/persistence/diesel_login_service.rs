//! Diesel-backed `LoginService` that preserves the fixture login contract.
//!
//! Credential checks stay against the seeded fixture accounts (the campus
//! identity provider is out of scope); a successful sign-in upserts the
//! account row so the rest of the portal reads users from PostgreSQL. The
//! conflict target is the e-mail address, so account ids stay stable across
//! restarts and role changes made by administrators survive later sign-ins.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{LoginService, PersistenceError};
use crate::domain::{Email, User};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// PostgreSQL adapter for sign-in.
pub struct DieselLoginService {
    pool: DbPool,
    accounts: Vec<(User, String)>,
}

impl DieselLoginService {
    /// Create a service seeded with `(account, password)` fixture pairs.
    pub fn new(pool: DbPool, accounts: Vec<(User, String)>) -> Self {
        Self { pool, accounts }
    }
}

fn matching_account<'a>(
    accounts: &'a [(User, String)],
    email: &Email,
    password: &str,
) -> Option<&'a User> {
    accounts
        .iter()
        .find(|(user, stored)| user.email() == email && stored == password)
        .map(|(user, _)| user)
}

#[async_trait]
impl LoginService for DieselLoginService {
    async fn authenticate(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<Option<User>, PersistenceError> {
        let Some(account) = matching_account(&self.accounts, email, password) else {
            return Ok(None);
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let now = Utc::now();
        let row = NewUserRow {
            id: *account.id().as_uuid(),
            display_name: account.display_name().as_ref(),
            email: account.email().as_ref(),
            role: account.role().as_str(),
            created_at: now,
            updated_at: now,
        };
        // On conflict the stored role wins; sign-in must not undo promotions.
        let stored: UserRow = diesel::insert_into(users::table)
            .values(&row)
            .on_conflict(users::email)
            .do_update()
            .set((
                users::display_name.eq(account.display_name().as_ref()),
                users::updated_at.eq(now),
            ))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        stored.into_domain().map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DisplayName, Role, UserId};
    use rstest::rstest;

    fn account(email: &str, password: &str) -> (User, String) {
        let user = User::new(
            UserId::random(),
            DisplayName::new("Ada Member").expect("valid name"),
            Email::new(email).expect("valid email"),
            Role::Member,
        );
        (user, password.to_owned())
    }

    #[rstest]
    #[case("ada@campus.edu", "letmein", true)]
    #[case("ada@campus.edu", "wrong", false)]
    #[case("someone@campus.edu", "letmein", false)]
    fn credential_checks_match_email_and_password(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: bool,
    ) {
        let accounts = vec![account("ada@campus.edu", "letmein")];
        let email = Email::new(email).expect("valid email");
        assert_eq!(
            matching_account(&accounts, &email, password).is_some(),
            expected
        );
    }
}
