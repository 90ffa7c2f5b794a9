//! Author domain methods on Repository

use chrono::Utc;
use uuid::Uuid;

use super::Repository;
use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, AuthorWithBooks, CreateAuthor, UpdateAuthor},
        book::Book,
    },
};

impl Repository {
    /// List all authors ordered by name
    pub async fn authors_list(&self) -> AppResult<Vec<Author>> {
        let authors = sqlx::query_as::<_, Author>("SELECT * FROM authors ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(authors)
    }

    /// Get author by ID, failing with NotFound when absent
    pub async fn authors_get_by_id(&self, id: Uuid) -> AppResult<Author> {
        sqlx::query_as::<_, Author>("SELECT * FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author with id {} not found", id)))
    }

    /// Get author by ID with associated books attached
    pub async fn authors_get_with_books(&self, id: Uuid) -> AppResult<AuthorWithBooks> {
        let author = self.authors_get_by_id(id).await?;

        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT b.*
            FROM books b
            JOIN book_authors ba ON ba.book_id = b.id
            WHERE ba.author_id = $1
            ORDER BY b.title ASC
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(AuthorWithBooks { author, books })
    }

    /// Resolve a set of author IDs to existing authors
    pub async fn authors_find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Author>> {
        let authors = sqlx::query_as::<_, Author>("SELECT * FROM authors WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(authors)
    }

    /// Number of books associated with an author
    pub async fn authors_book_count(&self, id: Uuid) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM book_authors WHERE author_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Create a new author
    pub async fn authors_create(&self, data: &CreateAuthor) -> AppResult<Author> {
        let author = sqlx::query_as::<_, Author>(
            "INSERT INTO authors (name) VALUES ($1) RETURNING *",
        )
        .bind(&data.name)
        .fetch_one(&self.pool)
        .await?;

        Ok(author)
    }

    /// Update an author, merging only supplied fields
    pub async fn authors_update(&self, id: Uuid, data: &UpdateAuthor) -> AppResult<Author> {
        let now = Utc::now();

        let author = sqlx::query_as::<_, Author>(
            r#"
            UPDATE authors
            SET name = COALESCE($1, name), updated_at = $2
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Author with id {} not found", id)))?;

        Ok(author)
    }

    /// Delete an author. Junction rows are not touched here; the service
    /// rejects the delete while books remain associated.
    pub async fn authors_delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Author with id {} not found", id)));
        }

        Ok(())
    }
}
