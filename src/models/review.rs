//! Review model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::book::Book;
use super::user::User;

/// Review row from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Review {
    pub id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Review with its (safe) user attached, as embedded under a book detail
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReviewWithUser {
    #[serde(flatten)]
    pub review: Review,
    pub user: User,
}

/// Full review detail with user and book relations attached
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReviewDetail {
    #[serde(flatten)]
    pub review: Review,
    pub user: User,
    pub book: Book,
}

/// Create review request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReview {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,
    pub comment: Option<String>,
    pub book_id: Uuid,
}

/// Update review request (partial: only supplied fields are merged)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateReview {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<i32>,
    pub comment: Option<String>,
}

/// Review listing query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewQuery {
    pub book_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl ReviewQuery {
    /// Normalized (page, limit, offset) with defaults page=1, limit=10.
    /// The limit is capped at 100 rows per page.
    pub fn pagination(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(10).clamp(1, 100);
        (page, limit, (page - 1) * limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_and_offset_math() {
        let q = ReviewQuery::default();
        assert_eq!(q.pagination(), (1, 10, 0));

        let q = ReviewQuery {
            page: Some(3),
            limit: Some(25),
            ..Default::default()
        };
        assert_eq!(q.pagination(), (3, 25, 50));
    }

    #[test]
    fn pagination_clamps_nonsense_values() {
        let q = ReviewQuery {
            page: Some(0),
            limit: Some(-5),
            ..Default::default()
        };
        let (page, limit, offset) = q.pagination();
        assert_eq!(page, 1);
        assert_eq!(limit, 1);
        assert_eq!(offset, 0);
    }

    #[test]
    fn pagination_caps_oversized_limit() {
        let q = ReviewQuery {
            page: Some(2),
            limit: Some(10_000_000),
            ..Default::default()
        };
        assert_eq!(q.pagination(), (2, 100, 100));
    }

    #[test]
    fn rating_bounds_are_validated() {
        use validator::Validate;

        let ok = CreateReview {
            rating: 5,
            comment: None,
            book_id: Uuid::new_v4(),
        };
        assert!(ok.validate().is_ok());

        let too_high = CreateReview {
            rating: 6,
            comment: None,
            book_id: Uuid::new_v4(),
        };
        assert!(too_high.validate().is_err());

        let too_low = UpdateReview {
            rating: Some(0),
            comment: None,
        };
        assert!(too_low.validate().is_err());
    }
}
