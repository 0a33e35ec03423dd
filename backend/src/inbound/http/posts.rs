//! Community feed HTTP handlers: posts, likes, and comments.
//!
//! ```text
//! GET    /api/v1/posts?page&per_page&search&kind
//! POST   /api/v1/posts
//! GET    /api/v1/posts/{id}
//! PUT    /api/v1/posts/{id}
//! DELETE /api/v1/posts/{id}
//! POST   /api/v1/posts/{id}/like
//! GET    /api/v1/posts/{id}/comments
//! POST   /api/v1/posts/{id}/comments
//! DELETE /api/v1/posts/{id}/comments/{comment_id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::Utc;
use pagination::Paginated;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ports::{PostListFilter, Viewer};
use crate::domain::{Comment, Error, Post, PostDraft, PostKind, PostValidationError, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::{SessionContext, current_user, require_user};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, PageQuery, field_error, parse_uuid};
use crate::inbound::http::views::{AuthorDirectory, AuthorView, CommentView, PostView};

/// Base path used when rendering pagination links for the feed.
const POSTS_BASE_PATH: &str = "/posts";

/// Query parameters accepted by the feed listing.
#[derive(Debug, Default, Deserialize)]
pub struct PostListQuery {
    #[serde(flatten)]
    pub page: PageQuery,
    pub kind: Option<String>,
}

/// Request body for creating or editing a post.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct PostRequest {
    pub title: String,
    pub body: String,
    pub kind: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

pub(crate) fn map_post_validation_error(err: PostValidationError) -> Error {
    let (field, code) = match &err {
        PostValidationError::EmptyTitle => ("title", "empty_title"),
        PostValidationError::TitleTooLong { .. } => ("title", "title_too_long"),
        PostValidationError::EmptyBody => ("body", "empty_body"),
        PostValidationError::BodyTooLong { .. } => ("body", "body_too_long"),
        PostValidationError::InvalidTag { .. } => ("tags", "invalid_tag"),
        PostValidationError::TooManyTags { .. } => ("tags", "too_many_tags"),
        PostValidationError::UnknownKind { .. } => ("kind", "unknown_kind"),
        PostValidationError::UnknownStatus { .. } => ("status", "unknown_status"),
    };
    field_error(FieldName::new(field), code, err.to_string())
}

fn parse_draft(payload: PostRequest) -> Result<PostDraft, Error> {
    let kind = PostKind::parse(&payload.kind).map_err(map_post_validation_error)?;
    PostDraft::new(payload.title, payload.body, kind, payload.tags)
        .map_err(map_post_validation_error)
}

fn viewer_for(user: Option<&User>) -> Viewer {
    match user {
        Some(user) => Viewer::new(user.id().clone(), user.role().can_moderate()),
        None => Viewer::default(),
    }
}

async fn find_visible_post(
    state: &HttpState,
    id: Uuid,
    viewer: &Viewer,
) -> Result<Post, Error> {
    let post = state
        .posts
        .find(id)
        .await?
        .ok_or_else(|| Error::not_found("post not found"))?;
    if !post.visible_to(viewer.user_id.as_ref(), viewer.can_moderate) {
        // Hide the existence of unapproved posts from other members.
        return Err(Error::not_found("post not found"));
    }
    Ok(post)
}

fn can_touch_post(user: &User, post: &Post) -> bool {
    user.role().can_moderate() || post.author_id() == user.id()
}

/// List the community feed, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/posts",
    params(
        ("page" = Option<String>, Query, description = "1-based page number"),
        ("per_page" = Option<String>, Query, description = "Records per page, capped at 50"),
        ("search" = Option<String>, Query, description = "Case-insensitive title/body filter"),
        ("kind" = Option<String>, Query, description = "Restrict to one post kind")
    ),
    responses(
        (status = 200, description = "One page of posts"),
        (status = 400, description = "Invalid paging or kind", body = Error)
    ),
    tags = ["posts"],
    operation_id = "listPosts",
    security([])
)]
#[get("/posts")]
pub async fn list_posts(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<PostListQuery>,
) -> ApiResult<web::Json<Paginated<PostView>>> {
    let page = query.page.page_request()?;
    let kind = query
        .kind
        .as_deref()
        .map(PostKind::parse)
        .transpose()
        .map_err(map_post_validation_error)?;
    let user = current_user(&state, &session).await?;
    let filter = PostListFilter {
        search: page.search().map(str::to_owned),
        kind,
        viewer: viewer_for(user.as_ref()),
    };

    let result = state.posts.list(&filter, &page).await?;
    let authors = AuthorDirectory::resolve(
        &state.users,
        result.items.iter().map(|post| post.author_id().clone()),
    )
    .await?;

    let now = Utc::now();
    let envelope = Paginated::build(result.items, result.total, &page, POSTS_BASE_PATH)
        .map(|post| PostView::render(&post, authors.get(post.author_id()), now));
    Ok(web::Json(envelope))
}

/// Submit a new post.
///
/// Posts from regular members enter the review queue; moderators and
/// administrators publish immediately.
#[utoipa::path(
    post,
    path = "/api/v1/posts",
    request_body = PostRequest,
    responses(
        (status = 201, description = "Post created", body = PostView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["posts"],
    operation_id = "createPost"
)]
#[post("/posts")]
pub async fn create_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PostRequest>,
) -> ApiResult<HttpResponse> {
    let user = require_user(&state, &session).await?;
    let draft = parse_draft(payload.into_inner())?;
    let now = Utc::now();
    let post = Post::from_draft(user.id().clone(), draft, user.role().can_moderate(), now);
    state.posts.insert(&post).await?;
    let view = PostView::render(&post, AuthorView::for_user(&user), now);
    Ok(HttpResponse::Created().json(view))
}

/// Fetch one post with its comments.
#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}",
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post detail"),
        (status = 404, description = "Not found or not visible", body = Error)
    ),
    tags = ["posts"],
    operation_id = "getPost",
    security([])
)]
#[get("/posts/{id}")]
pub async fn get_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_uuid(&path, FieldName::new("id"))?;
    let user = current_user(&state, &session).await?;
    let viewer = viewer_for(user.as_ref());
    let post = find_visible_post(&state, id, &viewer).await?;
    let comments = state.comments.list_for_post(id).await?;

    let authors = AuthorDirectory::resolve(
        &state.users,
        comments
            .iter()
            .map(|comment| comment.author_id().clone())
            .chain(std::iter::once(post.author_id().clone())),
    )
    .await?;

    let now = Utc::now();
    let comment_views: Vec<CommentView> = comments
        .iter()
        .map(|comment| CommentView::render(comment, authors.get(comment.author_id()), now))
        .collect();
    let view = PostView::render(&post, authors.get(post.author_id()), now);
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "post": view,
        "comments": comment_views,
    })))
}

/// Edit a post.
///
/// Authors may edit their own posts; edits by regular members send the post
/// back to review. Moderators may edit anything without losing approval.
#[utoipa::path(
    put,
    path = "/api/v1/posts/{id}",
    request_body = PostRequest,
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "Updated post", body = PostView),
        (status = 403, description = "Not the author or a moderator", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["posts"],
    operation_id = "updatePost"
)]
#[put("/posts/{id}")]
pub async fn update_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<PostRequest>,
) -> ApiResult<web::Json<PostView>> {
    let id = parse_uuid(&path, FieldName::new("id"))?;
    let user = require_user(&state, &session).await?;
    let viewer = viewer_for(Some(&user));
    let mut post = find_visible_post(&state, id, &viewer).await?;
    if !can_touch_post(&user, &post) {
        return Err(Error::forbidden("only the author or a moderator may edit"));
    }
    let draft = parse_draft(payload.into_inner())?;
    let now = Utc::now();
    post.apply_edit(draft, user.role().can_moderate(), now);
    state.posts.update(&post).await?;

    let authors =
        AuthorDirectory::resolve(&state.users, [post.author_id().clone()]).await?;
    Ok(web::Json(PostView::render(
        &post,
        authors.get(post.author_id()),
        now,
    )))
}

/// Delete a post along with its comments and likes.
#[utoipa::path(
    delete,
    path = "/api/v1/posts/{id}",
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 403, description = "Not the author or a moderator", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["posts"],
    operation_id = "deletePost"
)]
#[delete("/posts/{id}")]
pub async fn delete_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_uuid(&path, FieldName::new("id"))?;
    let user = require_user(&state, &session).await?;
    let viewer = viewer_for(Some(&user));
    let post = find_visible_post(&state, id, &viewer).await?;
    if !can_touch_post(&user, &post) {
        return Err(Error::forbidden(
            "only the author or a moderator may delete",
        ));
    }
    state.posts.delete(id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Like payload returned after toggling.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LikeResponse {
    /// The post's like count after the toggle.
    pub like_count: u64,
}

/// Toggle the signed-in user's like on a post.
#[utoipa::path(
    post,
    path = "/api/v1/posts/{id}/like",
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "New like count", body = LikeResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["posts"],
    operation_id = "togglePostLike"
)]
#[post("/posts/{id}/like")]
pub async fn toggle_like(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<LikeResponse>> {
    let id = parse_uuid(&path, FieldName::new("id"))?;
    let user = require_user(&state, &session).await?;
    let viewer = viewer_for(Some(&user));
    find_visible_post(&state, id, &viewer).await?;
    let like_count = state
        .posts
        .toggle_like(id, user.id())
        .await?
        .ok_or_else(|| Error::not_found("post not found"))?;
    Ok(web::Json(LikeResponse { like_count }))
}

/// Request body for adding a comment.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CommentRequest {
    pub body: String,
}

/// List a post's comments, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}/comments",
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "Comments", body = [CommentView]),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["posts"],
    operation_id = "listComments",
    security([])
)]
#[get("/posts/{id}/comments")]
pub async fn list_comments(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<CommentView>>> {
    let id = parse_uuid(&path, FieldName::new("id"))?;
    let user = current_user(&state, &session).await?;
    let viewer = viewer_for(user.as_ref());
    find_visible_post(&state, id, &viewer).await?;

    let comments = state.comments.list_for_post(id).await?;
    let authors = AuthorDirectory::resolve(
        &state.users,
        comments.iter().map(|comment| comment.author_id().clone()),
    )
    .await?;
    let now = Utc::now();
    let views = comments
        .iter()
        .map(|comment| CommentView::render(comment, authors.get(comment.author_id()), now))
        .collect();
    Ok(web::Json(views))
}

/// Add a comment to a post.
#[utoipa::path(
    post,
    path = "/api/v1/posts/{id}/comments",
    request_body = CommentRequest,
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 201, description = "Comment created", body = CommentView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["posts"],
    operation_id = "createComment"
)]
#[post("/posts/{id}/comments")]
pub async fn create_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CommentRequest>,
) -> ApiResult<HttpResponse> {
    let id = parse_uuid(&path, FieldName::new("id"))?;
    let user = require_user(&state, &session).await?;
    let viewer = viewer_for(Some(&user));
    find_visible_post(&state, id, &viewer).await?;

    let now = Utc::now();
    let comment = Comment::new(id, user.id().clone(), payload.into_inner().body, now)
        .map_err(|err| field_error(FieldName::new("body"), "invalid_body", err.to_string()))?;
    state.comments.insert(&comment).await?;
    let view = CommentView::render(&comment, AuthorView::for_user(&user), now);
    Ok(HttpResponse::Created().json(view))
}

/// Remove a comment.
///
/// Comment authors may remove their own comments; moderators may remove any.
#[utoipa::path(
    delete,
    path = "/api/v1/posts/{id}/comments/{comment_id}",
    params(
        ("id" = String, Path, description = "Post id"),
        ("comment_id" = String, Path, description = "Comment id")
    ),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 403, description = "Not the author or a moderator", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["posts"],
    operation_id = "deleteComment"
)]
#[delete("/posts/{id}/comments/{comment_id}")]
pub async fn delete_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let post_id = parse_uuid(&post_id, FieldName::new("id"))?;
    let comment_id = parse_uuid(&comment_id, FieldName::new("comment_id"))?;
    let user = require_user(&state, &session).await?;

    let comment = state
        .comments
        .find(comment_id)
        .await?
        .filter(|comment| comment.post_id() == post_id)
        .ok_or_else(|| Error::not_found("comment not found"))?;
    if !user.role().can_moderate() && comment.author_id() != user.id() {
        return Err(Error::forbidden(
            "only the author or a moderator may delete",
        ));
    }
    state.comments.delete(comment_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use serde_json::{Value, json};

    use crate::inbound::http::test_utils::{fixture_state, test_session_middleware};
    use crate::inbound::http::users::{LoginRequest, login};

    fn test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new().app_data(fixture_state()).service(
            web::scope("/api/v1")
                .wrap(test_session_middleware())
                .service(login)
                .service(list_posts)
                .service(create_post)
                .service(get_post)
                .service(update_post)
                .service(delete_post)
                .service(toggle_like)
                .service(list_comments)
                .service(create_comment)
                .service(delete_comment),
        )
    }

    async fn login_as(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
        email: &str,
        password: &str,
    ) -> actix_web::cookie::Cookie<'static> {
        let request = actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(&LoginRequest {
                email: email.into(),
                password: password.into(),
            })
            .to_request();
        let response = actix_test::call_service(app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        response
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie")
            .into_owned()
    }

    async fn create_sample_post(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
        cookie: &actix_web::cookie::Cookie<'static>,
        title: &str,
    ) -> Value {
        let request = actix_test::TestRequest::post()
            .uri("/api/v1/posts")
            .cookie(cookie.clone())
            .set_json(&json!({
                "title": title,
                "body": "A body with enough substance.",
                "kind": "resource",
                "tags": ["rust"],
            }))
            .to_request();
        let response = actix_test::call_service(app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = actix_test::read_body(response).await;
        serde_json::from_slice(&body).expect("post payload")
    }

    #[actix_web::test]
    async fn member_posts_enter_the_review_queue() {
        let app = actix_test::init_service(test_app()).await;
        let member = login_as(&app, "ada@campus.edu", "member-pass").await;

        let created = create_sample_post(&app, &member, "Rust study circle").await;
        assert_eq!(created["status"], "pending");
        assert_eq!(created["author"]["initials"], "AM");

        // The feed hides the pending post from anonymous readers.
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/posts")
                .to_request(),
        )
        .await;
        let body = actix_test::read_body(response).await;
        let value: Value = serde_json::from_slice(&body).expect("feed payload");
        assert_eq!(value["total"], 0);
        assert_eq!(value["current_page"], 1);
        assert_eq!(value["last_page"], 1);
        assert!(value["links"].is_array());
    }

    #[actix_web::test]
    async fn moderator_posts_publish_immediately() {
        let app = actix_test::init_service(test_app()).await;
        let moderator = login_as(&app, "grace@campus.edu", "moderator-pass").await;

        let created = create_sample_post(&app, &moderator, "Welcome week").await;
        assert_eq!(created["status"], "approved");

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/posts")
                .to_request(),
        )
        .await;
        let body = actix_test::read_body(response).await;
        let value: Value = serde_json::from_slice(&body).expect("feed payload");
        assert_eq!(value["total"], 1);
        assert_eq!(value["data"][0]["title"], "Welcome week");
    }

    #[actix_web::test]
    async fn moderator_edits_keep_approval() {
        let app = actix_test::init_service(test_app()).await;
        let moderator = login_as(&app, "grace@campus.edu", "moderator-pass").await;

        let created = create_sample_post(&app, &moderator, "Welcome week").await;
        let id = created["id"].as_str().expect("post id").to_owned();

        let edit = actix_test::TestRequest::put()
            .uri(&format!("/api/v1/posts/{id}"))
            .cookie(moderator)
            .set_json(&json!({
                "title": "Welcome week (updated)",
                "body": "A body with enough substance.",
                "kind": "resource",
            }))
            .to_request();
        let response = actix_test::call_service(&app, edit).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = actix_test::read_body(response).await;
        let value: Value = serde_json::from_slice(&body).expect("post payload");
        assert_eq!(value["status"], "approved");
        assert_eq!(value["title"], "Welcome week (updated)");
    }

    #[actix_web::test]
    async fn member_edits_return_to_review() {
        let app = actix_test::init_service(test_app()).await;
        let member = login_as(&app, "ada@campus.edu", "member-pass").await;

        let created = create_sample_post(&app, &member, "Draft notes").await;
        let id = created["id"].as_str().expect("post id").to_owned();

        let edit = actix_test::TestRequest::put()
            .uri(&format!("/api/v1/posts/{id}"))
            .cookie(member)
            .set_json(&json!({
                "title": "Draft notes v2",
                "body": "A body with enough substance.",
                "kind": "resource",
            }))
            .to_request();
        let response = actix_test::call_service(&app, edit).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = actix_test::read_body(response).await;
        let value: Value = serde_json::from_slice(&body).expect("post payload");
        assert_eq!(value["status"], "pending");
    }

    #[actix_web::test]
    async fn likes_toggle_and_count() {
        let app = actix_test::init_service(test_app()).await;
        let moderator = login_as(&app, "grace@campus.edu", "moderator-pass").await;
        let created = create_sample_post(&app, &moderator, "Likeable").await;
        let id = created["id"].as_str().expect("post id").to_owned();

        for expected in [1_u64, 0] {
            let request = actix_test::TestRequest::post()
                .uri(&format!("/api/v1/posts/{id}/like"))
                .cookie(moderator.clone())
                .to_request();
            let response = actix_test::call_service(&app, request).await;
            assert_eq!(response.status(), StatusCode::OK);
            let body = actix_test::read_body(response).await;
            let value: Value = serde_json::from_slice(&body).expect("like payload");
            assert_eq!(value["like_count"], expected);
        }
    }

    #[actix_web::test]
    async fn comments_round_trip_with_author_blocks() {
        let app = actix_test::init_service(test_app()).await;
        let moderator = login_as(&app, "grace@campus.edu", "moderator-pass").await;
        let member = login_as(&app, "ada@campus.edu", "member-pass").await;
        let created = create_sample_post(&app, &moderator, "Open thread").await;
        let id = created["id"].as_str().expect("post id").to_owned();

        let request = actix_test::TestRequest::post()
            .uri(&format!("/api/v1/posts/{id}/comments"))
            .cookie(member)
            .set_json(&json!({ "body": "First!" }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let request = actix_test::TestRequest::get()
            .uri(&format!("/api/v1/posts/{id}/comments"))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        let body = actix_test::read_body(response).await;
        let value: Value = serde_json::from_slice(&body).expect("comments payload");
        assert_eq!(value[0]["body"], "First!");
        assert_eq!(value[0]["author"]["name"], "Ada Member");
        assert_eq!(value[0]["posted"], "just now");
    }

    #[actix_web::test]
    async fn strangers_cannot_delete_posts() {
        let app = actix_test::init_service(test_app()).await;
        let moderator = login_as(&app, "grace@campus.edu", "moderator-pass").await;
        let member = login_as(&app, "ada@campus.edu", "member-pass").await;
        let created = create_sample_post(&app, &moderator, "Protected").await;
        let id = created["id"].as_str().expect("post id").to_owned();

        let request = actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/posts/{id}"))
            .cookie(member)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn invalid_kind_is_a_field_error() {
        let app = actix_test::init_service(test_app()).await;
        let member = login_as(&app, "ada@campus.edu", "member-pass").await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/posts")
            .cookie(member)
            .set_json(&json!({
                "title": "A title",
                "body": "A body.",
                "kind": "mixtape",
            }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = actix_test::read_body(response).await;
        let value: Value = serde_json::from_slice(&body).expect("error payload");
        assert_eq!(value["details"]["field"], "kind");
        assert_eq!(value["details"]["code"], "unknown_kind");
    }
}
