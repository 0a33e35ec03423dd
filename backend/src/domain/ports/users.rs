//! Driving ports for user accounts and sign-in.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::user::{DisplayName, Email, Role, User, UserId};

use super::{PersistenceError, matches_search, page_slice};

/// One page of users plus the total match count.
#[derive(Debug, Clone)]
pub struct UserPage {
    /// The users on this page, ordered by display name.
    pub items: Vec<User>,
    /// Total users matching the filter.
    pub total: u64,
}

/// Repository port for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, PersistenceError>;

    /// List users ordered by display name, optionally filtered by search.
    async fn list(
        &self,
        search: Option<&str>,
        page: &PageRequest,
    ) -> Result<UserPage, PersistenceError>;

    /// Replace a user's role. Returns the updated user, or `None` when absent.
    async fn set_role(&self, id: &UserId, role: Role) -> Result<Option<User>, PersistenceError>;

    /// Delete a user account. Returns `false` when absent.
    async fn delete(&self, id: &UserId) -> Result<bool, PersistenceError>;

    /// Resolve display names for a batch of users in one round trip.
    ///
    /// Absent identifiers are simply missing from the returned map; callers
    /// render a placeholder for authors whose accounts have been deleted.
    async fn display_names(
        &self,
        ids: &[UserId],
    ) -> Result<HashMap<UserId, DisplayName>, PersistenceError>;
}

/// Port for verifying credentials at sign-in.
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Check credentials, returning the account when they match.
    async fn authenticate(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<Option<User>, PersistenceError>;
}

/// In-memory user repository for tests and database-less deployments.
#[derive(Default)]
pub struct FixtureUserRepository {
    state: Mutex<Vec<User>>,
}

impl FixtureUserRepository {
    /// Seed the repository with the given accounts.
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            state: Mutex::new(users),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<User>>, PersistenceError> {
        self.state
            .lock()
            .map_err(|_| PersistenceError::query("fixture state poisoned"))
    }
}

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, PersistenceError> {
        Ok(self.lock()?.iter().find(|user| user.id() == id).cloned())
    }

    async fn list(
        &self,
        search: Option<&str>,
        page: &PageRequest,
    ) -> Result<UserPage, PersistenceError> {
        let mut users: Vec<User> = self
            .lock()?
            .iter()
            .filter(|user| {
                matches_search(
                    &[user.display_name().as_ref(), user.email().as_ref()],
                    search,
                )
            })
            .cloned()
            .collect();
        users.sort_by(|a, b| a.display_name().as_ref().cmp(b.display_name().as_ref()));
        let (items, total) = page_slice(&users, page);
        Ok(UserPage { items, total })
    }

    async fn set_role(&self, id: &UserId, role: Role) -> Result<Option<User>, PersistenceError> {
        let mut users = self.lock()?;
        let Some(user) = users.iter_mut().find(|user| user.id() == id) else {
            return Ok(None);
        };
        *user = user.clone().with_role(role);
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: &UserId) -> Result<bool, PersistenceError> {
        let mut users = self.lock()?;
        let before = users.len();
        users.retain(|user| user.id() != id);
        Ok(users.len() < before)
    }

    async fn display_names(
        &self,
        ids: &[UserId],
    ) -> Result<HashMap<UserId, DisplayName>, PersistenceError> {
        let users = self.lock()?;
        Ok(users
            .iter()
            .filter(|user| ids.contains(user.id()))
            .map(|user| (user.id().clone(), user.display_name().clone()))
            .collect())
    }
}

/// In-memory credential checker seeded with plain-text fixtures.
///
/// Only for tests and demos; production deployments delegate credential
/// checks to the campus identity provider.
#[derive(Default)]
pub struct FixtureLoginService {
    accounts: Vec<(User, String)>,
}

impl FixtureLoginService {
    /// Seed the service with `(account, password)` pairs.
    pub fn with_accounts(accounts: Vec<(User, String)>) -> Self {
        Self { accounts }
    }
}

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<Option<User>, PersistenceError> {
        Ok(self
            .accounts
            .iter()
            .find(|(user, stored)| user.email() == email && stored == password)
            .map(|(user, _)| user.clone()))
    }
}
