//! Review domain methods on Repository

use chrono::Utc;
use sqlx::Row;
use uuid::Uuid;

use super::Repository;
use crate::{
    error::{AppError, AppResult},
    models::{
        book::Book,
        review::{Review, ReviewDetail, ReviewQuery},
        user::User,
    },
};

const DETAIL_SELECT: &str = r#"
    SELECT r.id, r.rating, r.comment, r.user_id, r.book_id,
           r.created_at, r.updated_at,
           u.name AS u_name, u.email AS u_email, u.role AS u_role,
           u.created_at AS u_created_at, u.updated_at AS u_updated_at,
           b.title AS b_title, b.isbn AS b_isbn,
           b.created_at AS b_created_at, b.updated_at AS b_updated_at
    FROM reviews r
    JOIN users u ON u.id = r.user_id
    JOIN books b ON b.id = r.book_id
"#;

fn detail_from_row(row: &sqlx::postgres::PgRow) -> ReviewDetail {
    let review = Review {
        id: row.get("id"),
        rating: row.get("rating"),
        comment: row.get("comment"),
        user_id: row.get("user_id"),
        book_id: row.get("book_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    };
    let user = User {
        id: review.user_id,
        name: row.get("u_name"),
        email: row.get("u_email"),
        // never serialized; not selected from the database
        password: String::new(),
        role: row.get("u_role"),
        created_at: row.get("u_created_at"),
        updated_at: row.get("u_updated_at"),
    };
    let book = Book {
        id: review.book_id,
        title: row.get("b_title"),
        isbn: row.get("b_isbn"),
        created_at: row.get("b_created_at"),
        updated_at: row.get("b_updated_at"),
    };
    ReviewDetail { review, user, book }
}

impl Repository {
    /// Get review row by ID, failing with NotFound when absent
    pub async fn reviews_get_by_id(&self, id: Uuid) -> AppResult<Review> {
        sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Review with id {} not found", id)))
    }

    /// Get review by ID with user and book relations attached
    pub async fn reviews_get_detail(&self, id: Uuid) -> AppResult<ReviewDetail> {
        let query = format!("{} WHERE r.id = $1", DETAIL_SELECT);

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Review with id {} not found", id)))?;

        Ok(detail_from_row(&row))
    }

    /// List reviews with conjunctive bookId/userId filters, newest first.
    /// Returns the page of reviews plus the total count of matching rows.
    pub async fn reviews_list(&self, query: &ReviewQuery) -> AppResult<(Vec<ReviewDetail>, i64)> {
        let (_, limit, offset) = query.pagination();

        let mut conditions = Vec::new();
        let mut params: Vec<Uuid> = Vec::new();

        if let Some(book_id) = query.book_id {
            params.push(book_id);
            conditions.push(format!("r.book_id = ${}", params.len()));
        }

        if let Some(user_id) = query.user_id {
            params.push(user_id);
            conditions.push(format!("r.user_id = ${}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        // Count total matching rows regardless of page
        let count_query = format!("SELECT COUNT(*) FROM reviews r {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        for param in &params {
            count_builder = count_builder.bind(param);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        let select_query = format!(
            "{} {} ORDER BY r.created_at DESC LIMIT {} OFFSET {}",
            DETAIL_SELECT, where_clause, limit, offset
        );

        let mut select_builder = sqlx::query(&select_query);
        for param in &params {
            select_builder = select_builder.bind(param);
        }
        let rows = select_builder.fetch_all(&self.pool).await?;

        let reviews = rows.iter().map(detail_from_row).collect();

        Ok((reviews, total))
    }

    /// Check whether a user already reviewed a book
    pub async fn reviews_exists_for_user_book(
        &self,
        user_id: Uuid,
        book_id: Uuid,
    ) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM reviews WHERE user_id = $1 AND book_id = $2)",
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Insert a review. The unique index over (user_id, book_id) is the
    /// authoritative duplicate guard; a violation here surfaces as Conflict
    /// through the error boundary.
    pub async fn reviews_create(
        &self,
        user_id: Uuid,
        book_id: Uuid,
        rating: i32,
        comment: Option<&str>,
    ) -> AppResult<Uuid> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO reviews (rating, comment, user_id, book_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(rating)
        .bind(comment)
        .bind(user_id)
        .bind(book_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    /// Update a review, merging only supplied fields
    pub async fn reviews_update(
        &self,
        id: Uuid,
        rating: Option<i32>,
        comment: Option<&str>,
    ) -> AppResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE reviews
            SET rating = COALESCE($1, rating),
                comment = COALESCE($2, comment),
                updated_at = $3
            WHERE id = $4
            "#,
        )
        .bind(rating)
        .bind(comment)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Review with id {} not found", id)));
        }

        Ok(())
    }

    /// Delete a review permanently
    pub async fn reviews_delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Review with id {} not found", id)));
        }

        Ok(())
    }
}
