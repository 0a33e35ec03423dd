//! Official announcement HTTP handlers.
//!
//! Announcements are a public notice board: anyone may read them, and only
//! moderators and administrators may publish or retract them.

use actix_web::{HttpResponse, delete, get, post, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::{Announcement, AnnouncementValidationError, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::{SessionContext, require_moderator};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, field_error, parse_uuid};
use crate::inbound::http::views::{AnnouncementView, AuthorDirectory, AuthorView};

/// Request body for publishing an announcement.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct AnnouncementRequest {
    pub title: String,
    pub body: String,
}

fn map_announcement_validation_error(err: AnnouncementValidationError) -> Error {
    let (field, code) = match &err {
        AnnouncementValidationError::EmptyTitle => ("title", "empty_title"),
        AnnouncementValidationError::TitleTooLong { .. } => ("title", "title_too_long"),
        AnnouncementValidationError::EmptyBody => ("body", "empty_body"),
        AnnouncementValidationError::BodyTooLong { .. } => ("body", "body_too_long"),
    };
    field_error(FieldName::new(field), code, err.to_string())
}

/// List announcements, newest first. Readable without a session.
#[utoipa::path(
    get,
    path = "/api/v1/announcements",
    responses(
        (status = 200, description = "All announcements", body = [AnnouncementView])
    ),
    tags = ["announcements"],
    operation_id = "listAnnouncements",
    security([])
)]
#[get("/announcements")]
pub async fn list_announcements(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<AnnouncementView>>> {
    let announcements = state.announcements.list().await?;
    let authors = AuthorDirectory::resolve(
        &state.users,
        announcements.iter().map(|a| a.author_id().clone()),
    )
    .await?;
    let now = Utc::now();
    let views = announcements
        .iter()
        .map(|a| AnnouncementView::render(a, authors.get(a.author_id()), now))
        .collect();
    Ok(web::Json(views))
}

/// Publish an announcement. Moderators only.
#[utoipa::path(
    post,
    path = "/api/v1/announcements",
    request_body = AnnouncementRequest,
    responses(
        (status = 201, description = "Announcement published", body = AnnouncementView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Moderator access required", body = Error)
    ),
    tags = ["announcements"],
    operation_id = "createAnnouncement"
)]
#[post("/announcements")]
pub async fn create_announcement(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AnnouncementRequest>,
) -> ApiResult<HttpResponse> {
    let user = require_moderator(&state, &session).await?;
    let now = Utc::now();
    let payload = payload.into_inner();
    let announcement = Announcement::new(user.id().clone(), payload.title, payload.body, now)
        .map_err(map_announcement_validation_error)?;
    state.announcements.insert(&announcement).await?;
    let view = AnnouncementView::render(&announcement, AuthorView::for_user(&user), now);
    Ok(HttpResponse::Created().json(view))
}

/// Retract an announcement. Moderators only.
#[utoipa::path(
    delete,
    path = "/api/v1/announcements/{id}",
    params(("id" = String, Path, description = "Announcement id")),
    responses(
        (status = 204, description = "Announcement deleted"),
        (status = 403, description = "Moderator access required", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["announcements"],
    operation_id = "deleteAnnouncement"
)]
#[delete("/announcements/{id}")]
pub async fn delete_announcement(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_uuid(&path, FieldName::new("id"))?;
    require_moderator(&state, &session).await?;
    if !state.announcements.delete(id).await? {
        return Err(Error::not_found("announcement not found"));
    }
    Ok(HttpResponse::NoContent().finish())
}
