//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use crate::inbound::http::achievements::{
    create_achievement, delete_achievement, list_achievements,
};
use crate::inbound::http::admin::{
    approve_post, delete_user, demote_user, list_pending_posts, list_users, promote_user,
    reject_post,
};
use crate::inbound::http::announcements::{
    create_announcement, delete_announcement, list_announcements,
};
use crate::inbound::http::forum::{
    create_reply, create_thread, delete_thread, get_thread, list_threads,
};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::library::{create_library_item, delete_library_item, list_library_items};
use crate::inbound::http::posts::{
    create_comment, create_post, delete_comment, delete_post, get_post, list_comments, list_posts,
    toggle_like, update_post,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::suggestions::{create_suggestion, delete_suggestion, list_suggestions};
use crate::inbound::http::users::{login, logout, me};
use crate::middleware::Trace;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let api = web::scope("/api/v1")
        .wrap(session)
        .service(login)
        .service(logout)
        .service(me)
        .service(list_posts)
        .service(create_post)
        .service(get_post)
        .service(update_post)
        .service(delete_post)
        .service(toggle_like)
        .service(list_comments)
        .service(create_comment)
        .service(delete_comment)
        .service(list_suggestions)
        .service(create_suggestion)
        .service(delete_suggestion)
        .service(list_announcements)
        .service(create_announcement)
        .service(delete_announcement)
        .service(list_achievements)
        .service(create_achievement)
        .service(delete_achievement)
        .service(list_library_items)
        .service(create_library_item)
        .service(delete_library_item)
        .service(list_threads)
        .service(create_thread)
        .service(get_thread)
        .service(create_reply)
        .service(delete_thread)
        .service(list_pending_posts)
        .service(approve_post)
        .service(reject_post)
        .service(list_users)
        .service(promote_user)
        .service(demote_user)
        .service(delete_user);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config);
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        db_pool: _,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
