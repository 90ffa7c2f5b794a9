//! Review endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    models::review::{CreateReview, ReviewDetail, ReviewQuery, UpdateReview},
};

use super::{AuthenticatedUser, DataResponse, ListResponse};

/// List reviews, optionally filtered by bookId and/or userId, paginated
#[utoipa::path(
    get,
    path = "/reviews",
    tag = "reviews",
    params(ReviewQuery),
    responses(
        (status = 200, description = "Paginated list of reviews", body = ListResponse<ReviewDetail>)
    )
)]
pub async fn list_reviews(
    State(state): State<crate::AppState>,
    Query(query): Query<ReviewQuery>,
) -> AppResult<Json<ListResponse<ReviewDetail>>> {
    let (reviews, total) = state.services.reviews.list_reviews(&query).await?;
    Ok(Json(ListResponse::paginated(reviews, total)))
}

/// Get a review with user and book relations
#[utoipa::path(
    get,
    path = "/reviews/{id}",
    tag = "reviews",
    params(
        ("id" = Uuid, Path, description = "Review ID")
    ),
    responses(
        (status = 200, description = "Review details", body = DataResponse<ReviewDetail>),
        (status = 404, description = "Review not found")
    )
)]
pub async fn get_review(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DataResponse<ReviewDetail>>> {
    let review = state.services.reviews.get_review(id).await?;
    Ok(Json(DataResponse::new(review)))
}

/// Create a review for a book as the authenticated user
#[utoipa::path(
    post,
    path = "/reviews",
    tag = "reviews",
    security(("bearer_auth" = [])),
    request_body = CreateReview,
    responses(
        (status = 201, description = "Review created", body = DataResponse<ReviewDetail>),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Book already reviewed by this user")
    )
)]
pub async fn create_review(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(payload): Json<CreateReview>,
) -> AppResult<(StatusCode, Json<DataResponse<ReviewDetail>>)> {
    payload.validate()?;

    let review = state
        .services
        .reviews
        .create_review(claims.sub, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse::new(review))))
}

/// Update a review (owner or admin)
#[utoipa::path(
    put,
    path = "/reviews/{id}",
    tag = "reviews",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Review ID")
    ),
    request_body = UpdateReview,
    responses(
        (status = 200, description = "Review updated", body = DataResponse<ReviewDetail>),
        (status = 403, description = "Not the owner and not an admin"),
        (status = 404, description = "Review not found")
    )
)]
pub async fn update_review(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateReview>,
) -> AppResult<Json<DataResponse<ReviewDetail>>> {
    payload.validate()?;

    let review = state
        .services
        .reviews
        .update_review(id, payload, claims.actor())
        .await?;

    Ok(Json(DataResponse::new(review)))
}

/// Delete a review (owner or admin)
#[utoipa::path(
    delete,
    path = "/reviews/{id}",
    tag = "reviews",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Review ID")
    ),
    responses(
        (status = 204, description = "Review deleted"),
        (status = 403, description = "Not the owner and not an admin"),
        (status = 404, description = "Review not found")
    )
)]
pub async fn delete_review(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state
        .services
        .reviews
        .delete_review(id, claims.actor())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
