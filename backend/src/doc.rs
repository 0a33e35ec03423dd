//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] gathers every annotated endpoint and schema into one OpenAPI
//! document. Swagger UI serves it in debug builds under `/docs`.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, ModerationStatus, PostKind, Role};
use crate::inbound::http::achievements::AchievementRequest;
use crate::inbound::http::announcements::AnnouncementRequest;
use crate::inbound::http::forum::{ReplyRequest, ThreadRequest};
use crate::inbound::http::library::LibraryItemRequest;
use crate::inbound::http::posts::{CommentRequest, LikeResponse, PostRequest};
use crate::inbound::http::suggestions::SuggestionRequest;
use crate::inbound::http::users::LoginRequest;
use crate::inbound::http::views::{
    AchievementView, AnnouncementView, AuthorView, CommentView, LibraryItemView, PostView,
    ReplyView, SessionUserView, SuggestionView, ThreadSummaryView, ThreadView, UserAdminView,
};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "DEV-CRAFT portal API",
        description = "Server-rendered page props and form endpoints for the \
                       university community portal."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::me,
        crate::inbound::http::posts::list_posts,
        crate::inbound::http::posts::create_post,
        crate::inbound::http::posts::get_post,
        crate::inbound::http::posts::update_post,
        crate::inbound::http::posts::delete_post,
        crate::inbound::http::posts::toggle_like,
        crate::inbound::http::posts::list_comments,
        crate::inbound::http::posts::create_comment,
        crate::inbound::http::posts::delete_comment,
        crate::inbound::http::suggestions::list_suggestions,
        crate::inbound::http::suggestions::create_suggestion,
        crate::inbound::http::suggestions::delete_suggestion,
        crate::inbound::http::announcements::list_announcements,
        crate::inbound::http::announcements::create_announcement,
        crate::inbound::http::announcements::delete_announcement,
        crate::inbound::http::achievements::list_achievements,
        crate::inbound::http::achievements::create_achievement,
        crate::inbound::http::achievements::delete_achievement,
        crate::inbound::http::library::list_library_items,
        crate::inbound::http::library::create_library_item,
        crate::inbound::http::library::delete_library_item,
        crate::inbound::http::forum::list_threads,
        crate::inbound::http::forum::create_thread,
        crate::inbound::http::forum::get_thread,
        crate::inbound::http::forum::create_reply,
        crate::inbound::http::forum::delete_thread,
        crate::inbound::http::admin::list_pending_posts,
        crate::inbound::http::admin::approve_post,
        crate::inbound::http::admin::reject_post,
        crate::inbound::http::admin::list_users,
        crate::inbound::http::admin::promote_user,
        crate::inbound::http::admin::demote_user,
        crate::inbound::http::admin::delete_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Role,
        PostKind,
        ModerationStatus,
        LoginRequest,
        PostRequest,
        CommentRequest,
        LikeResponse,
        SuggestionRequest,
        AnnouncementRequest,
        AchievementRequest,
        LibraryItemRequest,
        ThreadRequest,
        ReplyRequest,
        AuthorView,
        PostView,
        CommentView,
        SuggestionView,
        AnnouncementView,
        AchievementView,
        LibraryItemView,
        ThreadSummaryView,
        ThreadView,
        ReplyView,
        SessionUserView,
        UserAdminView,
    )),
    tags(
        (name = "users", description = "Sign-in, sign-out, and the current session"),
        (name = "posts", description = "Community feed posts, likes, and comments"),
        (name = "suggestions", description = "Member suggestion box"),
        (name = "announcements", description = "Official staff announcements"),
        (name = "achievements", description = "Community achievement wall"),
        (name = "library", description = "Career, study, and tutorial shelves"),
        (name = "forum", description = "Discussion threads and replies"),
        (name = "admin", description = "Moderation queue and user management"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
