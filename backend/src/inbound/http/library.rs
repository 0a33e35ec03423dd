//! Library HTTP handlers.
//!
//! Career resources, study resources and tutorials share one listing shape,
//! so a single set of handlers serves all three shelves:
//!
//! ```text
//! GET    /api/v1/{career-resources|study-resources|tutorials}?search
//! POST   /api/v1/{career-resources|study-resources|tutorials}
//! DELETE /api/v1/{career-resources|study-resources|tutorials}/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::{Error, LibraryItem, LibraryKind, LibraryValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::{SessionContext, require_moderator, require_user};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, field_error, parse_uuid};
use crate::inbound::http::views::LibraryItemView;

/// Request body for adding a listing.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct LibraryItemRequest {
    pub title: String,
    pub description: String,
    pub link: String,
    pub category: String,
}

/// Optional search filter on the listing query string.
#[derive(Debug, Default, Deserialize)]
pub struct LibrarySearchQuery {
    pub search: Option<String>,
}

fn map_library_validation_error(err: LibraryValidationError) -> Error {
    let (field, code) = match &err {
        LibraryValidationError::EmptyTitle => ("title", "empty_title"),
        LibraryValidationError::EmptyDescription => ("description", "empty_description"),
        LibraryValidationError::InvalidLink { .. } => ("link", "invalid_link"),
        LibraryValidationError::EmptyCategory => ("category", "empty_category"),
        LibraryValidationError::UnknownKind { .. } => ("kind", "unknown_kind"),
    };
    field_error(FieldName::new(field), code, err.to_string())
}

/// Map a matched path segment back to its shelf.
///
/// The route regex only admits the three known segments, so a mismatch is a
/// routing bug rather than client error.
fn kind_from_segment(segment: &str) -> Result<LibraryKind, Error> {
    [LibraryKind::Career, LibraryKind::Study, LibraryKind::Tutorial]
        .into_iter()
        .find(|kind| kind.path_segment() == segment)
        .ok_or_else(|| Error::not_found("unknown library collection"))
}

/// List one shelf, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/{kind}",
    params(
        ("kind" = String, Path, description = "career-resources, study-resources or tutorials"),
        ("search" = Option<String>, Query, description = "Case-insensitive title/description/category filter")
    ),
    responses(
        (status = 200, description = "Shelf listings", body = [LibraryItemView]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["library"],
    operation_id = "listLibraryItems"
)]
#[get("/{kind:career-resources|study-resources|tutorials}")]
pub async fn list_library_items(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<LibrarySearchQuery>,
) -> ApiResult<web::Json<Vec<LibraryItemView>>> {
    require_user(&state, &session).await?;
    let kind = kind_from_segment(&path)?;
    let search = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let items = state.library.list(kind, search).await?;
    let now = Utc::now();
    let views = items.iter().map(|item| LibraryItemView::render(item, now)).collect();
    Ok(web::Json(views))
}

/// Add a listing to a shelf. Moderators only.
#[utoipa::path(
    post,
    path = "/api/v1/{kind}",
    request_body = LibraryItemRequest,
    params(("kind" = String, Path, description = "career-resources, study-resources or tutorials")),
    responses(
        (status = 201, description = "Listing added", body = LibraryItemView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Moderator access required", body = Error)
    ),
    tags = ["library"],
    operation_id = "createLibraryItem"
)]
#[post("/{kind:career-resources|study-resources|tutorials}")]
pub async fn create_library_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<LibraryItemRequest>,
) -> ApiResult<HttpResponse> {
    let user = require_moderator(&state, &session).await?;
    let kind = kind_from_segment(&path)?;
    let now = Utc::now();
    let payload = payload.into_inner();
    let item = LibraryItem::new(
        kind,
        user.id().clone(),
        payload.title,
        payload.description,
        payload.link,
        payload.category,
        now,
    )
    .map_err(map_library_validation_error)?;
    state.library.insert(&item).await?;
    Ok(HttpResponse::Created().json(LibraryItemView::render(&item, now)))
}

/// Remove a listing from a shelf. Moderators only.
#[utoipa::path(
    delete,
    path = "/api/v1/{kind}/{id}",
    params(
        ("kind" = String, Path, description = "career-resources, study-resources or tutorials"),
        ("id" = String, Path, description = "Listing id")
    ),
    responses(
        (status = 204, description = "Listing deleted"),
        (status = 403, description = "Moderator access required", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["library"],
    operation_id = "deleteLibraryItem"
)]
#[delete("/{kind:career-resources|study-resources|tutorials}/{id}")]
pub async fn delete_library_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (segment, id) = path.into_inner();
    require_moderator(&state, &session).await?;
    let kind = kind_from_segment(&segment)?;
    let id = parse_uuid(&id, FieldName::new("id"))?;
    if !state.library.delete(kind, id).await? {
        return Err(Error::not_found("listing not found"));
    }
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
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
                .service(list_library_items)
                .service(create_library_item)
                .service(delete_library_item),
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

    #[rstest]
    #[case("career-resources")]
    #[case("study-resources")]
    #[case("tutorials")]
    fn every_shelf_maps_to_a_kind(#[case] segment: &str) {
        let kind = kind_from_segment(segment).expect("known shelf");
        assert_eq!(kind.path_segment(), segment);
    }

    #[actix_web::test]
    async fn shelves_are_isolated_from_each_other() {
        let app = actix_test::init_service(test_app()).await;
        let moderator = login_as(&app, "grace@campus.edu", "moderator-pass").await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/tutorials")
            .cookie(moderator.clone())
            .set_json(&json!({
                "title": "Intro to Git",
                "description": "Branching basics.",
                "link": "https://example.edu/git",
                "category": "Version control",
            }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/tutorials")
                .cookie(moderator.clone())
                .to_request(),
        )
        .await;
        let body = actix_test::read_body(response).await;
        let value: Value = serde_json::from_slice(&body).expect("tutorials payload");
        assert_eq!(value.as_array().expect("array").len(), 1);

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/study-resources")
                .cookie(moderator)
                .to_request(),
        )
        .await;
        let body = actix_test::read_body(response).await;
        let value: Value = serde_json::from_slice(&body).expect("study payload");
        assert!(value.as_array().expect("array").is_empty());
    }

    #[actix_web::test]
    async fn search_covers_category_labels() {
        let app = actix_test::init_service(test_app()).await;
        let moderator = login_as(&app, "grace@campus.edu", "moderator-pass").await;

        for (title, category) in [
            ("CV workshop recording", "Careers"),
            ("Grad scheme tracker", "Applications"),
        ] {
            let request = actix_test::TestRequest::post()
                .uri("/api/v1/career-resources")
                .cookie(moderator.clone())
                .set_json(&json!({
                    "title": title,
                    "description": "Useful material.",
                    "link": "https://example.edu/resource",
                    "category": category,
                }))
                .to_request();
            let response = actix_test::call_service(&app, request).await;
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/career-resources?search=applications")
                .cookie(moderator)
                .to_request(),
        )
        .await;
        let body = actix_test::read_body(response).await;
        let value: Value = serde_json::from_slice(&body).expect("career payload");
        let items = value.as_array().expect("array");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["title"], "Grad scheme tracker");
    }

    #[actix_web::test]
    async fn members_cannot_add_listings() {
        let app = actix_test::init_service(test_app()).await;
        let member = login_as(&app, "ada@campus.edu", "member-pass").await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/study-resources")
            .cookie(member)
            .set_json(&json!({
                "title": "My notes",
                "description": "Handwritten.",
                "link": "https://example.edu/notes",
                "category": "Notes",
            }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn bad_links_are_field_errors() {
        let app = actix_test::init_service(test_app()).await;
        let moderator = login_as(&app, "grace@campus.edu", "moderator-pass").await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/tutorials")
            .cookie(moderator)
            .set_json(&json!({
                "title": "Dodgy link",
                "description": "Not a URL.",
                "link": "ftp://example.edu/file",
                "category": "Misc",
            }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = actix_test::read_body(response).await;
        let value: Value = serde_json::from_slice(&body).expect("error payload");
        assert_eq!(value["details"]["field"], "link");
        assert_eq!(value["details"]["code"], "invalid_link");
    }
}
