//! Sign-in and session HTTP handlers.
//!
//! ```text
//! POST /api/v1/login {"email":"ada@campus.edu","password":"..."}
//! POST /api/v1/logout
//! GET  /api/v1/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{Email, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::{SessionContext, require_user};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, field_error};
use crate::inbound::http::views::SessionUserView;

/// Login request body for `POST /api/v1/login`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

fn parse_credentials(payload: LoginRequest) -> Result<(Email, String), Error> {
    if payload.email.trim().is_empty() {
        return Err(field_error(
            FieldName::new("email"),
            "empty_email",
            "email must not be empty",
        ));
    }
    if payload.password.is_empty() {
        return Err(field_error(
            FieldName::new("password"),
            "empty_password",
            "password must not be empty",
        ));
    }
    let email = Email::new(payload.email).map_err(|_| {
        field_error(
            FieldName::new("email"),
            "invalid_email",
            "email address is not valid",
        )
    })?;
    Ok((email, payload.password))
}

/// Authenticate a user and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = SessionUserView,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<SessionUserView>> {
    let (email, password) = parse_credentials(payload.into_inner())?;
    let user = state
        .login
        .authenticate(&email, &password)
        .await?
        .ok_or_else(|| Error::unauthorized("invalid credentials"))?;
    session.persist_user(user.id())?;
    Ok(web::Json(SessionUserView::render(&user)))
}

/// End the current session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Session ended")),
    tags = ["users"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.forget();
    HttpResponse::NoContent().finish()
}

/// Return the signed-in user's profile.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Current user", body = SessionUserView),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/me")]
pub async fn me(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<SessionUserView>> {
    let user = require_user(&state, &session).await?;
    Ok(web::Json(SessionUserView::render(&user)))
}
