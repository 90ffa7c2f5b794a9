//! Authentication endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::user::{LoginRequest, RegisterRequest, User},
};

use super::{AuthenticatedUser, DataResponse};

/// Login response: `{status, token, data}`
#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    /// Always "success"
    pub status: &'static str,
    /// Signed bearer token
    pub token: String,
    pub data: User,
}

/// Register a new user account (role is always USER)
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = DataResponse<User>),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn register(
    State(state): State<crate::AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<User>>)> {
    payload.validate()?;

    let user = state
        .services
        .auth
        .register(&payload.name, &payload.email, &payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse::new(user))))
}

/// Verify credentials and issue a bearer token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    payload.validate()?;

    let (user, token) = state
        .services
        .auth
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(LoginResponse {
        status: "success",
        token,
        data: user,
    }))
}

/// Return the authenticated caller's profile
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user profile", body = DataResponse<User>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<DataResponse<User>>> {
    let user = state
        .services
        .auth
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| {
            AppError::Authentication("User associated with this token no longer exists".to_string())
        })?;

    Ok(Json(DataResponse::new(user)))
}
