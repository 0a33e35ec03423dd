//! Suggestion box HTTP handlers.
//!
//! Any signed-in member may read and submit suggestions; only moderators may
//! remove them.

use actix_web::{HttpResponse, delete, get, post, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::{Error, Suggestion, SuggestionValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::{SessionContext, require_moderator, require_user};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, field_error, parse_uuid};
use crate::inbound::http::views::{AuthorDirectory, AuthorView, SuggestionView};

/// Request body for submitting a suggestion.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct SuggestionRequest {
    pub title: String,
    pub body: String,
}

fn map_suggestion_validation_error(err: SuggestionValidationError) -> Error {
    let (field, code) = match &err {
        SuggestionValidationError::EmptyTitle => ("title", "empty_title"),
        SuggestionValidationError::TitleTooLong { .. } => ("title", "title_too_long"),
        SuggestionValidationError::EmptyBody => ("body", "empty_body"),
        SuggestionValidationError::BodyTooLong { .. } => ("body", "body_too_long"),
    };
    field_error(FieldName::new(field), code, err.to_string())
}

/// List suggestions, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/suggestions",
    responses(
        (status = 200, description = "All suggestions", body = [SuggestionView]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["suggestions"],
    operation_id = "listSuggestions"
)]
#[get("/suggestions")]
pub async fn list_suggestions(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<SuggestionView>>> {
    require_user(&state, &session).await?;
    let suggestions = state.suggestions.list().await?;
    let authors = AuthorDirectory::resolve(
        &state.users,
        suggestions.iter().map(|s| s.author_id().clone()),
    )
    .await?;
    let now = Utc::now();
    let views = suggestions
        .iter()
        .map(|s| SuggestionView::render(s, authors.get(s.author_id()), now))
        .collect();
    Ok(web::Json(views))
}

/// Submit a suggestion.
#[utoipa::path(
    post,
    path = "/api/v1/suggestions",
    request_body = SuggestionRequest,
    responses(
        (status = 201, description = "Suggestion created", body = SuggestionView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["suggestions"],
    operation_id = "createSuggestion"
)]
#[post("/suggestions")]
pub async fn create_suggestion(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SuggestionRequest>,
) -> ApiResult<HttpResponse> {
    let user = require_user(&state, &session).await?;
    let now = Utc::now();
    let payload = payload.into_inner();
    let suggestion = Suggestion::new(user.id().clone(), payload.title, payload.body, now)
        .map_err(map_suggestion_validation_error)?;
    state.suggestions.insert(&suggestion).await?;
    let view = SuggestionView::render(&suggestion, AuthorView::for_user(&user), now);
    Ok(HttpResponse::Created().json(view))
}

/// Remove a suggestion. Moderators only.
#[utoipa::path(
    delete,
    path = "/api/v1/suggestions/{id}",
    params(("id" = String, Path, description = "Suggestion id")),
    responses(
        (status = 204, description = "Suggestion deleted"),
        (status = 403, description = "Moderator access required", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["suggestions"],
    operation_id = "deleteSuggestion"
)]
#[delete("/suggestions/{id}")]
pub async fn delete_suggestion(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_uuid(&path, FieldName::new("id"))?;
    require_moderator(&state, &session).await?;
    if !state.suggestions.delete(id).await? {
        return Err(Error::not_found("suggestion not found"));
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
                .service(list_suggestions)
                .service(create_suggestion)
                .service(delete_suggestion),
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

    #[actix_web::test]
    async fn suggestions_require_a_session() {
        let app = actix_test::init_service(test_app()).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/suggestions")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn members_submit_and_read_suggestions() {
        let app = actix_test::init_service(test_app()).await;
        let member = login_as(&app, "ada@campus.edu", "member-pass").await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/suggestions")
            .cookie(member.clone())
            .set_json(&json!({
                "title": "More beanbags",
                "body": "The common room needs them.",
            }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/suggestions")
                .cookie(member)
                .to_request(),
        )
        .await;
        let body = actix_test::read_body(response).await;
        let value: Value = serde_json::from_slice(&body).expect("suggestions payload");
        assert_eq!(value[0]["title"], "More beanbags");
        assert_eq!(value[0]["author"]["name"], "Ada Member");
    }

    #[actix_web::test]
    async fn only_moderators_delete_suggestions() {
        let app = actix_test::init_service(test_app()).await;
        let member = login_as(&app, "ada@campus.edu", "member-pass").await;
        let moderator = login_as(&app, "grace@campus.edu", "moderator-pass").await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/suggestions")
            .cookie(member.clone())
            .set_json(&json!({ "title": "Quiet room", "body": "Please." }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        let body = actix_test::read_body(response).await;
        let value: Value = serde_json::from_slice(&body).expect("suggestion payload");
        let id = value["id"].as_str().expect("id").to_owned();

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&format!("/api/v1/suggestions/{id}"))
                .cookie(member)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&format!("/api/v1/suggestions/{id}"))
                .cookie(moderator)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
