//! Book catalog endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    models::book::{BookDetail, BookWithAuthors, CreateBook, UpdateBook},
};

use super::{AuthenticatedUser, DataResponse, ListResponse};

/// List all books ordered by title, each with authors and reviews attached
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "List of books", body = ListResponse<BookDetail>)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
) -> AppResult<Json<ListResponse<BookDetail>>> {
    let books = state.services.catalog.list_books().await?;
    Ok(Json(ListResponse::new(books)))
}

/// Get book details with authors and reviews (review users are safe users)
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = Uuid, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = DataResponse<BookDetail>),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DataResponse<BookDetail>>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(DataResponse::new(book)))
}

/// Create a new book with its author set (admin only)
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = DataResponse<BookWithAuthors>),
        (status = 400, description = "Invalid input or unresolved author IDs"),
        (status = 403, description = "Administrator privileges required"),
        (status = 409, description = "Duplicate ISBN")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(payload): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<DataResponse<BookWithAuthors>>)> {
    claims.require_admin()?;
    payload.validate()?;

    let book = state.services.catalog.create_book(payload).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(book))))
}

/// Update a book; a supplied authorIds fully replaces the author set (admin only)
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Book ID")
    ),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = DataResponse<BookWithAuthors>),
        (status = 400, description = "Invalid input or unresolved author IDs"),
        (status = 403, description = "Administrator privileges required"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBook>,
) -> AppResult<Json<DataResponse<BookWithAuthors>>> {
    claims.require_admin()?;
    payload.validate()?;

    let book = state.services.catalog.update_book(id, payload).await?;
    Ok(Json(DataResponse::new(book)))
}

/// Delete a book; cascades its reviews and author associations (admin only)
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 403, description = "Administrator privileges required"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;

    state.services.catalog.delete_book(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
