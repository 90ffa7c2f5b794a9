//! Author management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    models::author::{Author, AuthorWithBooks, CreateAuthor, UpdateAuthor},
};

use super::{AuthenticatedUser, DataResponse, ListResponse};

/// List all authors ordered by name
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of authors", body = ListResponse<Author>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_authors(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<ListResponse<Author>>> {
    let authors = state.services.catalog.list_authors().await?;
    Ok(Json(ListResponse::new(authors)))
}

/// Get author details with associated books
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Author details", body = DataResponse<AuthorWithBooks>),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DataResponse<AuthorWithBooks>>> {
    let author = state.services.catalog.get_author(id).await?;
    Ok(Json(DataResponse::new(author)))
}

/// Create a new author (admin only)
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    security(("bearer_auth" = [])),
    request_body = CreateAuthor,
    responses(
        (status = 201, description = "Author created", body = DataResponse<Author>),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Administrator privileges required")
    )
)]
pub async fn create_author(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(payload): Json<CreateAuthor>,
) -> AppResult<(StatusCode, Json<DataResponse<Author>>)> {
    claims.require_admin()?;
    payload.validate()?;

    let author = state.services.catalog.create_author(payload).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(author))))
}

/// Update an existing author (admin only)
#[utoipa::path(
    put,
    path = "/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Author ID")
    ),
    request_body = UpdateAuthor,
    responses(
        (status = 200, description = "Author updated", body = DataResponse<Author>),
        (status = 403, description = "Administrator privileges required"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn update_author(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAuthor>,
) -> AppResult<Json<DataResponse<Author>>> {
    claims.require_admin()?;
    payload.validate()?;

    let author = state.services.catalog.update_author(id, payload).await?;
    Ok(Json(DataResponse::new(author)))
}

/// Delete an author (admin only; rejected while books remain associated)
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Author ID")
    ),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 403, description = "Administrator privileges required"),
        (status = 404, description = "Author not found"),
        (status = 409, description = "Author has associated books")
    )
)]
pub async fn delete_author(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;

    state.services.catalog.delete_author(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
