//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AchievementsRepository, AnnouncementsRepository, CommentsRepository,
    FixtureAchievementsRepository, FixtureAnnouncementsRepository, FixtureCommentsRepository,
    FixtureForumRepository, FixtureLibraryRepository, FixtureLoginService, FixturePostsRepository,
    FixtureSuggestionsRepository, FixtureUserRepository, ForumRepository, LibraryRepository,
    LoginService, PostsRepository, SuggestionsRepository, UserRepository,
};
use crate::domain::{DisplayName, Email, Role, User, UserId};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostsRepository>,
    pub comments: Arc<dyn CommentsRepository>,
    pub suggestions: Arc<dyn SuggestionsRepository>,
    pub announcements: Arc<dyn AnnouncementsRepository>,
    pub achievements: Arc<dyn AchievementsRepository>,
    pub library: Arc<dyn LibraryRepository>,
    pub forum: Arc<dyn ForumRepository>,
}

/// Seed accounts for the fixture state, one per role.
///
/// Credentials are plain fixtures for tests and local demos.
pub const FIXTURE_ACCOUNTS: [(&str, &str, &str, Role); 3] = [
    ("Ada Member", "ada@campus.edu", "member-pass", Role::Member),
    (
        "Grace Moderator",
        "grace@campus.edu",
        "moderator-pass",
        Role::Moderator,
    ),
    ("Alan Admin", "alan@campus.edu", "admin-pass", Role::Admin),
];

/// Materialise [`FIXTURE_ACCOUNTS`] into `(account, password)` pairs.
///
/// Used both by the fixture login service and, when a database is attached,
/// to seed the Diesel-backed sign-in with the same credential contract.
#[must_use]
pub fn fixture_accounts() -> Vec<(User, String)> {
    FIXTURE_ACCOUNTS
        .iter()
        .map(|(name, email, password, role)| {
            let user = User::new(
                UserId::random(),
                DisplayName::new(*name).unwrap_or_else(|err| {
                    panic!("fixture display name {name:?} is invalid: {err}")
                }),
                Email::new(*email)
                    .unwrap_or_else(|err| panic!("fixture email {email:?} is invalid: {err}")),
                *role,
            );
            (user, (*password).to_owned())
        })
        .collect()
}

impl HttpState {
    /// A fully fixture-backed state seeded with [`FIXTURE_ACCOUNTS`].
    ///
    /// Used by tests and database-less deployments.
    #[must_use]
    pub fn fixture() -> Self {
        let accounts = fixture_accounts();
        let users: Vec<User> = accounts.iter().map(|(user, _)| user.clone()).collect();
        Self {
            login: Arc::new(FixtureLoginService::with_accounts(accounts)),
            users: Arc::new(FixtureUserRepository::with_users(users)),
            posts: Arc::new(FixturePostsRepository::default()),
            comments: Arc::new(FixtureCommentsRepository::default()),
            suggestions: Arc::new(FixtureSuggestionsRepository::default()),
            announcements: Arc::new(FixtureAnnouncementsRepository::default()),
            achievements: Arc::new(FixtureAchievementsRepository::default()),
            library: Arc::new(FixtureLibraryRepository::default()),
            forum: Arc::new(FixtureForumRepository::default()),
        }
    }
}
