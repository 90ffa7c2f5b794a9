//! Review service: CRUD with ownership-based authorization and
//! one-review-per-user-per-book uniqueness

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        review::{CreateReview, Review, ReviewDetail, ReviewQuery, UpdateReview},
        user::Actor,
    },
    repository::Repository,
};

/// Ownership-or-admin is the sole authorization rule for mutating a review,
/// applied identically to update and delete.
fn ensure_can_modify(review: &Review, actor: &Actor) -> AppResult<()> {
    if review.user_id == actor.id || actor.is_admin() {
        Ok(())
    } else {
        Err(AppError::Authorization(
            "You are not authorized to modify this review".to_string(),
        ))
    }
}

#[derive(Clone)]
pub struct ReviewService {
    repository: Repository,
}

impl ReviewService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a review for a book on behalf of the authenticated user.
    ///
    /// The duplicate pre-check exists for a friendlier message; the unique
    /// index over (user_id, book_id) is the authoritative guard and a
    /// concurrent duplicate insert still surfaces as Conflict.
    pub async fn create_review(&self, actor_id: Uuid, data: CreateReview) -> AppResult<ReviewDetail> {
        if !self.repository.books_exists(data.book_id).await? {
            return Err(AppError::NotFound(format!(
                "Book with id {} not found",
                data.book_id
            )));
        }

        if self
            .repository
            .reviews_exists_for_user_book(actor_id, data.book_id)
            .await?
        {
            return Err(AppError::Conflict(
                "You have already submitted a review for this book".to_string(),
            ));
        }

        let id = self
            .repository
            .reviews_create(actor_id, data.book_id, data.rating, data.comment.as_deref())
            .await?;

        self.repository.reviews_get_detail(id).await
    }

    /// List reviews with optional conjunctive filters, newest first.
    /// `total` counts all matching rows regardless of the page.
    pub async fn list_reviews(&self, query: &ReviewQuery) -> AppResult<(Vec<ReviewDetail>, i64)> {
        self.repository.reviews_list(query).await
    }

    /// Get a review with relations attached
    pub async fn get_review(&self, id: Uuid) -> AppResult<ReviewDetail> {
        self.repository.reviews_get_detail(id).await
    }

    /// Update a review. Only the owner or an admin may mutate it; merges
    /// only supplied fields and returns refreshed relations.
    pub async fn update_review(
        &self,
        id: Uuid,
        data: UpdateReview,
        actor: Actor,
    ) -> AppResult<ReviewDetail> {
        let review = self.repository.reviews_get_by_id(id).await?;
        ensure_can_modify(&review, &actor)?;

        self.repository
            .reviews_update(id, data.rating, data.comment.as_deref())
            .await?;

        self.repository.reviews_get_detail(id).await
    }

    /// Delete a review. Same authorization rule as update.
    pub async fn delete_review(&self, id: Uuid, actor: Actor) -> AppResult<()> {
        let review = self.repository.reviews_get_by_id(id).await?;
        ensure_can_modify(&review, &actor)?;

        self.repository.reviews_delete(id).await
    }
}
