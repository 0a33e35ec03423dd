//! Builders assembling the shared HTTP state from configured ports.

use std::sync::Arc;

use actix_web::web;

use crate::inbound::http::state::{HttpState, fixture_accounts};
use crate::outbound::persistence::{
    DieselContentRepository, DieselForumRepository, DieselLoginService, DieselPostRepository,
    DieselUserRepository,
};

use super::ServerConfig;

/// Build the shared HTTP state: Diesel-backed ports when a pool is attached,
/// fixtures otherwise.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let Some(pool) = &config.db_pool else {
        return web::Data::new(HttpState::fixture());
    };

    let posts = Arc::new(DieselPostRepository::new(pool.clone()));
    let content = Arc::new(DieselContentRepository::new(pool.clone()));
    web::Data::new(HttpState {
        login: Arc::new(DieselLoginService::new(pool.clone(), fixture_accounts())),
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        posts: posts.clone(),
        comments: posts,
        suggestions: content.clone(),
        announcements: content.clone(),
        achievements: content.clone(),
        library: content,
        forum: Arc::new(DieselForumRepository::new(pool.clone())),
    })
}
