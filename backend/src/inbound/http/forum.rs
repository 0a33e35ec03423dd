//! Forum HTTP handlers: threads and replies.
//!
//! ```text
//! GET    /api/v1/forum?page&per_page&search
//! POST   /api/v1/forum
//! GET    /api/v1/forum/{id}
//! POST   /api/v1/forum/{id}/replies
//! DELETE /api/v1/forum/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use chrono::Utc;
use pagination::Paginated;
use serde::{Deserialize, Serialize};

use crate::domain::{Error, ForumReply, ForumThread, ForumValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::{SessionContext, require_moderator, require_user};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, PageQuery, field_error, parse_uuid};
use crate::inbound::http::views::{AuthorDirectory, AuthorView, ReplyView, ThreadSummaryView, ThreadView};

/// Base path used when rendering pagination links for the thread list.
const FORUM_BASE_PATH: &str = "/forum";

/// Request body for opening a thread.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ThreadRequest {
    pub title: String,
    pub body: String,
}

/// Request body for replying to a thread.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ReplyRequest {
    pub body: String,
}

fn map_forum_validation_error(err: ForumValidationError) -> Error {
    let (field, code) = match &err {
        ForumValidationError::EmptyTitle => ("title", "empty_title"),
        ForumValidationError::TitleTooLong { .. } => ("title", "title_too_long"),
        ForumValidationError::EmptyBody => ("body", "empty_body"),
        ForumValidationError::BodyTooLong { .. } => ("body", "body_too_long"),
    };
    field_error(FieldName::new(field), code, err.to_string())
}

/// List forum threads, most recently active first.
#[utoipa::path(
    get,
    path = "/api/v1/forum",
    params(
        ("page" = Option<String>, Query, description = "1-based page number"),
        ("per_page" = Option<String>, Query, description = "Records per page, capped at 50"),
        ("search" = Option<String>, Query, description = "Case-insensitive title/body filter")
    ),
    responses(
        (status = 200, description = "One page of threads"),
        (status = 400, description = "Invalid paging", body = Error)
    ),
    tags = ["forum"],
    operation_id = "listThreads",
    security([])
)]
#[get("/forum")]
pub async fn list_threads(
    state: web::Data<HttpState>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Paginated<ThreadSummaryView>>> {
    let page = query.page_request()?;
    let result = state.forum.list(page.search(), &page).await?;
    let authors = AuthorDirectory::resolve(
        &state.users,
        result.items.iter().map(|thread| thread.author_id().clone()),
    )
    .await?;

    let now = Utc::now();
    let envelope = Paginated::build(result.items, result.total, &page, FORUM_BASE_PATH)
        .map(|thread| ThreadSummaryView::render(&thread, authors.get(thread.author_id()), now));
    Ok(web::Json(envelope))
}

/// Open a new discussion thread.
#[utoipa::path(
    post,
    path = "/api/v1/forum",
    request_body = ThreadRequest,
    responses(
        (status = 201, description = "Thread created", body = ThreadSummaryView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["forum"],
    operation_id = "createThread"
)]
#[post("/forum")]
pub async fn create_thread(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ThreadRequest>,
) -> ApiResult<HttpResponse> {
    let user = require_user(&state, &session).await?;
    let now = Utc::now();
    let payload = payload.into_inner();
    let thread = ForumThread::new(user.id().clone(), payload.title, payload.body, now)
        .map_err(map_forum_validation_error)?;
    state.forum.insert_thread(&thread).await?;
    let view = ThreadSummaryView::render(&thread, AuthorView::for_user(&user), now);
    Ok(HttpResponse::Created().json(view))
}

/// Fetch a thread with all of its replies.
#[utoipa::path(
    get,
    path = "/api/v1/forum/{id}",
    params(("id" = String, Path, description = "Thread id")),
    responses(
        (status = 200, description = "Thread detail", body = ThreadView),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["forum"],
    operation_id = "getThread",
    security([])
)]
#[get("/forum/{id}")]
pub async fn get_thread(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ThreadView>> {
    let id = parse_uuid(&path, FieldName::new("id"))?;
    let thread = state
        .forum
        .find(id)
        .await?
        .ok_or_else(|| Error::not_found("thread not found"))?;
    let replies = state.forum.replies(id).await?;

    let authors = AuthorDirectory::resolve(
        &state.users,
        replies
            .iter()
            .map(|reply| reply.author_id().clone())
            .chain(std::iter::once(thread.author_id().clone())),
    )
    .await?;

    let now = Utc::now();
    let reply_views = replies
        .iter()
        .map(|reply| ReplyView::render(reply, authors.get(reply.author_id()), now))
        .collect();
    Ok(web::Json(ThreadView::render(
        &thread,
        authors.get(thread.author_id()),
        reply_views,
        now,
    )))
}

/// Reply to a thread, bumping it in the listing.
#[utoipa::path(
    post,
    path = "/api/v1/forum/{id}/replies",
    request_body = ReplyRequest,
    params(("id" = String, Path, description = "Thread id")),
    responses(
        (status = 201, description = "Reply created", body = ReplyView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Thread not found", body = Error)
    ),
    tags = ["forum"],
    operation_id = "createReply"
)]
#[post("/forum/{id}/replies")]
pub async fn create_reply(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ReplyRequest>,
) -> ApiResult<HttpResponse> {
    let id = parse_uuid(&path, FieldName::new("id"))?;
    let user = require_user(&state, &session).await?;
    let now = Utc::now();
    let reply = ForumReply::new(id, user.id().clone(), payload.into_inner().body, now)
        .map_err(map_forum_validation_error)?;
    if !state.forum.insert_reply(&reply).await? {
        return Err(Error::not_found("thread not found"));
    }
    let view = ReplyView::render(&reply, AuthorView::for_user(&user), now);
    Ok(HttpResponse::Created().json(view))
}

/// Remove a thread and its replies. Moderators only.
#[utoipa::path(
    delete,
    path = "/api/v1/forum/{id}",
    params(("id" = String, Path, description = "Thread id")),
    responses(
        (status = 204, description = "Thread deleted"),
        (status = 403, description = "Moderator access required", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["forum"],
    operation_id = "deleteThread"
)]
#[delete("/forum/{id}")]
pub async fn delete_thread(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_uuid(&path, FieldName::new("id"))?;
    require_moderator(&state, &session).await?;
    if !state.forum.delete_thread(id).await? {
        return Err(Error::not_found("thread not found"));
    }
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
                .service(list_threads)
                .service(create_thread)
                .service(get_thread)
                .service(create_reply)
                .service(delete_thread),
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

    async fn open_thread(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
        cookie: &actix_web::cookie::Cookie<'static>,
        title: &str,
    ) -> String {
        let request = actix_test::TestRequest::post()
            .uri("/api/v1/forum")
            .cookie(cookie.clone())
            .set_json(&json!({ "title": title, "body": "Opening post." }))
            .to_request();
        let response = actix_test::call_service(app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = actix_test::read_body(response).await;
        let value: Value = serde_json::from_slice(&body).expect("thread payload");
        value["id"].as_str().expect("thread id").to_owned()
    }

    #[actix_web::test]
    async fn replies_bump_threads_in_the_listing() {
        let app = actix_test::init_service(test_app()).await;
        let member = login_as(&app, "ada@campus.edu", "member-pass").await;

        let first = open_thread(&app, &member, "Exam prep").await;
        let _second = open_thread(&app, &member, "Society fair").await;

        let request = actix_test::TestRequest::post()
            .uri(&format!("/api/v1/forum/{first}/replies"))
            .cookie(member)
            .set_json(&json!({ "body": "Library, 6pm?" }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/forum")
                .to_request(),
        )
        .await;
        let body = actix_test::read_body(response).await;
        let value: Value = serde_json::from_slice(&body).expect("forum payload");
        assert_eq!(value["total"], 2);
        assert_eq!(value["data"][0]["title"], "Exam prep");
        assert_eq!(value["data"][0]["reply_count"], 1);
    }

    #[actix_web::test]
    async fn thread_detail_includes_replies() {
        let app = actix_test::init_service(test_app()).await;
        let member = login_as(&app, "ada@campus.edu", "member-pass").await;
        let id = open_thread(&app, &member, "Exam prep").await;

        let request = actix_test::TestRequest::post()
            .uri(&format!("/api/v1/forum/{id}/replies"))
            .cookie(member)
            .set_json(&json!({ "body": "Library, 6pm?" }))
            .to_request();
        actix_test::call_service(&app, request).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/forum/{id}"))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = actix_test::read_body(response).await;
        let value: Value = serde_json::from_slice(&body).expect("thread payload");
        assert_eq!(value["replies"][0]["body"], "Library, 6pm?");
        assert_eq!(value["replies"][0]["author"]["name"], "Ada Member");
    }

    #[actix_web::test]
    async fn replying_to_a_missing_thread_is_not_found() {
        let app = actix_test::init_service(test_app()).await;
        let member = login_as(&app, "ada@campus.edu", "member-pass").await;

        let request = actix_test::TestRequest::post()
            .uri(&format!("/api/v1/forum/{}/replies", uuid::Uuid::new_v4()))
            .cookie(member)
            .set_json(&json!({ "body": "Anyone here?" }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn only_moderators_delete_threads() {
        let app = actix_test::init_service(test_app()).await;
        let member = login_as(&app, "ada@campus.edu", "member-pass").await;
        let moderator = login_as(&app, "grace@campus.edu", "moderator-pass").await;
        let id = open_thread(&app, &member, "Doomed thread").await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&format!("/api/v1/forum/{id}"))
                .cookie(member)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&format!("/api/v1/forum/{id}"))
                .cookie(moderator)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn blank_titles_are_field_errors() {
        let app = actix_test::init_service(test_app()).await;
        let member = login_as(&app, "ada@campus.edu", "member-pass").await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/forum")
            .cookie(member)
            .set_json(&json!({ "title": "   ", "body": "Some body." }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = actix_test::read_body(response).await;
        let value: Value = serde_json::from_slice(&body).expect("error payload");
        assert_eq!(value["details"]["field"], "title");
        assert_eq!(value["details"]["code"], "empty_title");
    }
}
