//! Achievement wall HTTP handlers.
//!
//! The wall celebrates members, teams and alumni. Everyone signed in can
//! browse it; moderators curate it.

use actix_web::{HttpResponse, delete, get, post, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::{Achievement, AchievementValidationError, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::{SessionContext, require_moderator, require_user};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, field_error, parse_uuid};
use crate::inbound::http::views::AchievementView;

/// Request body for adding an achievement.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct AchievementRequest {
    pub title: String,
    pub description: String,
    /// Free-form recipient name; teams and alumni have no account.
    pub recipient: String,
}

fn map_achievement_validation_error(err: AchievementValidationError) -> Error {
    let (field, code) = match &err {
        AchievementValidationError::EmptyTitle => ("title", "empty_title"),
        AchievementValidationError::EmptyDescription => ("description", "empty_description"),
        AchievementValidationError::EmptyRecipient => ("recipient", "empty_recipient"),
    };
    field_error(FieldName::new(field), code, err.to_string())
}

/// List achievements, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/achievements",
    responses(
        (status = 200, description = "All achievements", body = [AchievementView]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["achievements"],
    operation_id = "listAchievements"
)]
#[get("/achievements")]
pub async fn list_achievements(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<AchievementView>>> {
    require_user(&state, &session).await?;
    let achievements = state.achievements.list().await?;
    let now = Utc::now();
    let views = achievements
        .iter()
        .map(|achievement| AchievementView::render(achievement, now))
        .collect();
    Ok(web::Json(views))
}

/// Add an achievement to the wall. Moderators only.
#[utoipa::path(
    post,
    path = "/api/v1/achievements",
    request_body = AchievementRequest,
    responses(
        (status = 201, description = "Achievement added", body = AchievementView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Moderator access required", body = Error)
    ),
    tags = ["achievements"],
    operation_id = "createAchievement"
)]
#[post("/achievements")]
pub async fn create_achievement(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AchievementRequest>,
) -> ApiResult<HttpResponse> {
    let user = require_moderator(&state, &session).await?;
    let now = Utc::now();
    let payload = payload.into_inner();
    let achievement = Achievement::new(
        user.id().clone(),
        payload.title,
        payload.description,
        payload.recipient,
        now,
    )
    .map_err(map_achievement_validation_error)?;
    state.achievements.insert(&achievement).await?;
    Ok(HttpResponse::Created().json(AchievementView::render(&achievement, now)))
}

/// Remove an achievement. Moderators only.
#[utoipa::path(
    delete,
    path = "/api/v1/achievements/{id}",
    params(("id" = String, Path, description = "Achievement id")),
    responses(
        (status = 204, description = "Achievement deleted"),
        (status = 403, description = "Moderator access required", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["achievements"],
    operation_id = "deleteAchievement"
)]
#[delete("/achievements/{id}")]
pub async fn delete_achievement(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_uuid(&path, FieldName::new("id"))?;
    require_moderator(&state, &session).await?;
    if !state.achievements.delete(id).await? {
        return Err(Error::not_found("achievement not found"));
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
                .service(list_achievements)
                .service(create_achievement)
                .service(delete_achievement),
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
    async fn achievements_carry_recipient_avatar_blocks() {
        let app = actix_test::init_service(test_app()).await;
        let moderator = login_as(&app, "grace@campus.edu", "moderator-pass").await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/achievements")
            .cookie(moderator.clone())
            .set_json(&json!({
                "title": "Regional hackathon winners",
                "description": "First place at HackTheMidlands.",
                "recipient": "Team Ferris",
            }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = actix_test::read_body(response).await;
        let value: Value = serde_json::from_slice(&body).expect("achievement payload");
        assert_eq!(value["recipient"], "Team Ferris");
        assert_eq!(value["recipient_initials"], "TF");
        assert!(
            value["recipient_avatar_color"]
                .as_str()
                .expect("colour")
                .starts_with('#')
        );
    }

    #[actix_web::test]
    async fn members_cannot_curate_the_wall() {
        let app = actix_test::init_service(test_app()).await;
        let member = login_as(&app, "ada@campus.edu", "member-pass").await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/achievements")
            .cookie(member.clone())
            .set_json(&json!({
                "title": "Self-award",
                "description": "I did a thing.",
                "recipient": "Me",
            }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&format!("/api/v1/achievements/{}", uuid::Uuid::new_v4()))
                .cookie(member)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn blank_recipient_is_a_field_error() {
        let app = actix_test::init_service(test_app()).await;
        let moderator = login_as(&app, "grace@campus.edu", "moderator-pass").await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/achievements")
            .cookie(moderator)
            .set_json(&json!({
                "title": "Ghost award",
                "description": "For nobody.",
                "recipient": "  ",
            }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = actix_test::read_body(response).await;
        let value: Value = serde_json::from_slice(&body).expect("error payload");
        assert_eq!(value["details"]["field"], "recipient");
        assert_eq!(value["details"]["code"], "empty_recipient");
    }
}
