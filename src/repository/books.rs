//! Book domain methods on Repository.
//!
//! Multi-row mutations (book + junction rows) run inside a single transaction
//! so a failure mid-operation cannot leave a book with a partial author set.

use chrono::Utc;
use sqlx::Row;
use uuid::Uuid;

use super::Repository;
use crate::{
    error::{AppError, AppResult},
    models::{
        author::Author,
        book::{Book, BookDetail},
        review::{Review, ReviewWithUser},
        user::User,
    },
};

impl Repository {
    /// Check whether a book exists
    pub async fn books_exists(&self, id: Uuid) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Get book row by ID, failing with NotFound when absent
    pub async fn books_get_by_id(&self, id: Uuid) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// List all books ordered by title, each with its author set and its
    /// reviews (review users carry no password column)
    pub async fn books_list_with_relations(&self) -> AppResult<Vec<BookDetail>> {
        let books = sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY title ASC")
            .fetch_all(&self.pool)
            .await?;

        let mut result = Vec::with_capacity(books.len());
        for book in books {
            let authors = self.books_get_authors(book.id).await?;
            let reviews = self.books_get_reviews_with_users(book.id).await?;
            result.push(BookDetail {
                book,
                authors,
                reviews,
            });
        }

        Ok(result)
    }

    /// Full book detail: authors plus reviews with their users attached
    pub async fn books_get_detail(&self, id: Uuid) -> AppResult<BookDetail> {
        let book = self.books_get_by_id(id).await?;
        let authors = self.books_get_authors(id).await?;
        let reviews = self.books_get_reviews_with_users(id).await?;

        Ok(BookDetail {
            book,
            authors,
            reviews,
        })
    }

    /// Load the author set for a book via the junction table
    pub async fn books_get_authors(&self, book_id: Uuid) -> AppResult<Vec<Author>> {
        let authors = sqlx::query_as::<_, Author>(
            r#"
            SELECT a.*
            FROM book_authors ba
            JOIN authors a ON a.id = ba.author_id
            WHERE ba.book_id = $1
            ORDER BY a.name ASC
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(authors)
    }

    /// Load all reviews for a book with their users, newest first
    async fn books_get_reviews_with_users(&self, book_id: Uuid) -> AppResult<Vec<ReviewWithUser>> {
        let rows = sqlx::query(
            r#"
            SELECT r.id, r.rating, r.comment, r.user_id, r.book_id,
                   r.created_at, r.updated_at,
                   u.name AS u_name, u.email AS u_email, u.role AS u_role,
                   u.created_at AS u_created_at, u.updated_at AS u_updated_at
            FROM reviews r
            JOIN users u ON u.id = r.user_id
            WHERE r.book_id = $1
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        let reviews = rows
            .into_iter()
            .map(|row| {
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
                ReviewWithUser { review, user }
            })
            .collect();

        Ok(reviews)
    }

    /// Create a book and its author associations atomically.
    /// Author IDs must already be validated against existing authors.
    pub async fn books_create(
        &self,
        title: &str,
        isbn: Option<&str>,
        author_ids: &[Uuid],
    ) -> AppResult<Uuid> {
        let mut tx = self.pool.begin().await?;

        let book_id: Uuid = sqlx::query_scalar(
            "INSERT INTO books (title, isbn) VALUES ($1, $2) RETURNING id",
        )
        .bind(title)
        .bind(isbn)
        .fetch_one(&mut *tx)
        .await?;

        for author_id in author_ids {
            sqlx::query("INSERT INTO book_authors (book_id, author_id) VALUES ($1, $2)")
                .bind(book_id)
                .bind(author_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(book_id)
    }

    /// Update a book. Scalar fields merge only when supplied; a supplied
    /// author set fully replaces the existing junction rows. Runs in one
    /// transaction so the replace is all-or-nothing.
    pub async fn books_update(
        &self,
        id: Uuid,
        title: Option<&str>,
        isbn: Option<&str>,
        author_ids: Option<&[Uuid]>,
    ) -> AppResult<()> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE books
            SET title = COALESCE($1, title),
                isbn = COALESCE($2, isbn),
                updated_at = $3
            WHERE id = $4
            "#,
        )
        .bind(title)
        .bind(isbn)
        .bind(now)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }

        if let Some(author_ids) = author_ids {
            sqlx::query("DELETE FROM book_authors WHERE book_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            for author_id in author_ids {
                sqlx::query("INSERT INTO book_authors (book_id, author_id) VALUES ($1, $2)")
                    .bind(id)
                    .bind(author_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;

        Ok(())
    }

    /// Delete a book. The database cascades the junction rows and all
    /// reviews referencing the book.
    pub async fn books_delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }

        Ok(())
    }
}
