//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations such as persisting or retrieving a user id,
//! plus role-gate helpers that resolve the session user against the user
//! repository.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, User, UserId};
use crate::inbound::http::state::HttpState;

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated user's id in the session cookie.
    pub fn persist_user(&self, user_id: &UserId) -> Result<(), Error> {
        self.0
            .insert(USER_ID_KEY, user_id.as_ref())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Drop the session, ending the login.
    pub fn forget(&self) {
        self.0.purge();
    }

    /// Fetch the current user id from the session, if present.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let id = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        match id {
            Some(raw) => match UserId::new(raw) {
                Ok(id) => Ok(Some(id)),
                Err(error) => {
                    tracing::warn!("invalid user id in session cookie: {error}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Require an authenticated user id or return `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

/// Resolve the session's user id to an account.
///
/// A session pointing at a deleted account is treated as unauthenticated
/// rather than an internal error.
pub async fn require_user(state: &HttpState, session: &SessionContext) -> Result<User, Error> {
    let user_id = session.require_user_id()?;
    state
        .users
        .find_by_id(&user_id)
        .await?
        .ok_or_else(|| Error::unauthorized("login required"))
}

/// Resolve the session user if one exists; anonymous sessions yield `None`.
pub async fn current_user(
    state: &HttpState,
    session: &SessionContext,
) -> Result<Option<User>, Error> {
    let Some(user_id) = session.user_id()? else {
        return Ok(None);
    };
    Ok(state.users.find_by_id(&user_id).await?)
}

/// Require a user whose role can moderate content, or `403 Forbidden`.
pub async fn require_moderator(
    state: &HttpState,
    session: &SessionContext,
) -> Result<User, Error> {
    let user = require_user(state, session).await?;
    if user.role().can_moderate() {
        Ok(user)
    } else {
        Err(Error::forbidden("moderator access required"))
    }
}

/// Require an administrator, or `403 Forbidden`.
pub async fn require_admin(state: &HttpState, session: &SessionContext) -> Result<User, Error> {
    let user = require_user(state, session).await?;
    if user.role().is_admin() {
        Ok(user)
    } else {
        Err(Error::forbidden("administrator access required"))
    }
}
