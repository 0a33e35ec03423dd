//! Administration HTTP handlers: the moderation queue and user management.
//!
//! ```text
//! GET    /api/v1/admin/posts/pending      (moderator)
//! POST   /api/v1/admin/posts/{id}/approve (moderator)
//! POST   /api/v1/admin/posts/{id}/reject  (moderator)
//! GET    /api/v1/admin/users              (admin)
//! POST   /api/v1/admin/users/{id}/promote (admin)
//! POST   /api/v1/admin/users/{id}/demote  (admin)
//! DELETE /api/v1/admin/users/{id}         (admin)
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use chrono::Utc;
use pagination::Paginated;

use crate::domain::{Error, Post, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::{SessionContext, require_admin, require_moderator};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, PageQuery, parse_uuid};
use crate::inbound::http::views::{AuthorDirectory, PostView, UserAdminView};

const PENDING_BASE_PATH: &str = "/admin/posts/pending";
const USERS_BASE_PATH: &str = "/admin/users";

async fn moderate_post(
    state: &HttpState,
    session: &SessionContext,
    id: &str,
    decide: impl FnOnce(&mut Post),
) -> Result<web::Json<PostView>, Error> {
    let id = parse_uuid(id, FieldName::new("id"))?;
    require_moderator(state, session).await?;
    let mut post = state
        .posts
        .find(id)
        .await?
        .ok_or_else(|| Error::not_found("post not found"))?;
    decide(&mut post);
    state.posts.update(&post).await?;

    let authors = AuthorDirectory::resolve(&state.users, [post.author_id().clone()]).await?;
    let now = Utc::now();
    Ok(web::Json(PostView::render(
        &post,
        authors.get(post.author_id()),
        now,
    )))
}

/// List posts awaiting review, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/admin/posts/pending",
    params(
        ("page" = Option<String>, Query, description = "1-based page number"),
        ("per_page" = Option<String>, Query, description = "Records per page, capped at 50")
    ),
    responses(
        (status = 200, description = "One page of pending posts"),
        (status = 403, description = "Moderator access required", body = Error)
    ),
    tags = ["admin"],
    operation_id = "listPendingPosts"
)]
#[get("/admin/posts/pending")]
pub async fn list_pending_posts(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Paginated<PostView>>> {
    require_moderator(&state, &session).await?;
    let page = query.page_request()?;
    let result = state.posts.list_pending(&page).await?;
    let authors = AuthorDirectory::resolve(
        &state.users,
        result.items.iter().map(|post| post.author_id().clone()),
    )
    .await?;

    let now = Utc::now();
    let envelope = Paginated::build(result.items, result.total, &page, PENDING_BASE_PATH)
        .map(|post| PostView::render(&post, authors.get(post.author_id()), now));
    Ok(web::Json(envelope))
}

/// Approve a pending post, publishing it to the feed.
#[utoipa::path(
    post,
    path = "/api/v1/admin/posts/{id}/approve",
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "Approved post", body = PostView),
        (status = 403, description = "Moderator access required", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["admin"],
    operation_id = "approvePost"
)]
#[post("/admin/posts/{id}/approve")]
pub async fn approve_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<PostView>> {
    moderate_post(&state, &session, &path, |post| post.approve(Utc::now())).await
}

/// Reject a pending post, hiding it from everyone but its author.
#[utoipa::path(
    post,
    path = "/api/v1/admin/posts/{id}/reject",
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "Rejected post", body = PostView),
        (status = 403, description = "Moderator access required", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["admin"],
    operation_id = "rejectPost"
)]
#[post("/admin/posts/{id}/reject")]
pub async fn reject_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<PostView>> {
    moderate_post(&state, &session, &path, |post| post.reject(Utc::now())).await
}

/// List user accounts ordered by display name.
#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    params(
        ("page" = Option<String>, Query, description = "1-based page number"),
        ("per_page" = Option<String>, Query, description = "Records per page, capped at 50"),
        ("search" = Option<String>, Query, description = "Case-insensitive name/email filter")
    ),
    responses(
        (status = 200, description = "One page of users"),
        (status = 403, description = "Administrator access required", body = Error)
    ),
    tags = ["admin"],
    operation_id = "listUsers"
)]
#[get("/admin/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Paginated<UserAdminView>>> {
    require_admin(&state, &session).await?;
    let page = query.page_request()?;
    let result = state.users.list(page.search(), &page).await?;
    let envelope = Paginated::build(result.items, result.total, &page, USERS_BASE_PATH)
        .map(|user| UserAdminView::render(&user));
    Ok(web::Json(envelope))
}

async fn shift_role(
    state: &HttpState,
    session: &SessionContext,
    id: &str,
    up: bool,
) -> Result<web::Json<UserAdminView>, Error> {
    let id = parse_uuid(id, FieldName::new("id"))?;
    require_admin(state, session).await?;
    let id = UserId::from_uuid(id);
    let user = state
        .users
        .find_by_id(&id)
        .await?
        .ok_or_else(|| Error::not_found("user not found"))?;
    let next = if up {
        user.role()
            .promoted()
            .ok_or_else(|| Error::conflict("user already holds the highest role"))?
    } else {
        user.role()
            .demoted()
            .ok_or_else(|| Error::conflict("user already holds the lowest role"))?
    };
    let updated = state
        .users
        .set_role(&id, next)
        .await?
        .ok_or_else(|| Error::not_found("user not found"))?;
    Ok(web::Json(UserAdminView::render(&updated)))
}

/// Promote a user one step up the role ladder.
#[utoipa::path(
    post,
    path = "/api/v1/admin/users/{id}/promote",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Updated user", body = UserAdminView),
        (status = 403, description = "Administrator access required", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Already at the highest role", body = Error)
    ),
    tags = ["admin"],
    operation_id = "promoteUser"
)]
#[post("/admin/users/{id}/promote")]
pub async fn promote_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserAdminView>> {
    shift_role(&state, &session, &path, true).await
}

/// Demote a user one step down the role ladder.
#[utoipa::path(
    post,
    path = "/api/v1/admin/users/{id}/demote",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Updated user", body = UserAdminView),
        (status = 403, description = "Administrator access required", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Already at the lowest role", body = Error)
    ),
    tags = ["admin"],
    operation_id = "demoteUser"
)]
#[post("/admin/users/{id}/demote")]
pub async fn demote_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserAdminView>> {
    shift_role(&state, &session, &path, false).await
}

/// Delete a user account. Administrators cannot delete themselves.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 403, description = "Administrator access required", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Cannot delete your own account", body = Error)
    ),
    tags = ["admin"],
    operation_id = "deleteUser"
)]
#[delete("/admin/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_uuid(&path, FieldName::new("id"))?;
    let admin = require_admin(&state, &session).await?;
    let id = UserId::from_uuid(id);
    if admin.id() == &id {
        return Err(Error::conflict("cannot delete your own account"));
    }
    if !state.users.delete(&id).await? {
        return Err(Error::not_found("user not found"));
    }
    Ok(HttpResponse::NoContent().finish())
}
