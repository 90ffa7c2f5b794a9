//! Catalog service: authors, books and their association rules

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, AuthorWithBooks, CreateAuthor, UpdateAuthor},
        book::{BookDetail, BookWithAuthors, CreateBook, UpdateBook},
    },
    repository::Repository,
};

/// IDs from `requested` that did not resolve to an existing author,
/// in request order. The error must list every missing ID, not just
/// the first one.
fn missing_author_ids(requested: &[Uuid], found: &[Author]) -> Vec<Uuid> {
    requested
        .iter()
        .filter(|id| !found.iter().any(|a| a.id == **id))
        .copied()
        .collect()
}

fn join_ids(ids: &[Uuid]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    // =========================================================================
    // AUTHORS
    // =========================================================================

    /// Create a new author. No uniqueness constraint on the name.
    pub async fn create_author(&self, data: CreateAuthor) -> AppResult<Author> {
        self.repository.authors_create(&data).await
    }

    /// List all authors ordered by name
    pub async fn list_authors(&self) -> AppResult<Vec<Author>> {
        self.repository.authors_list().await
    }

    /// Get an author with associated books
    pub async fn get_author(&self, id: Uuid) -> AppResult<AuthorWithBooks> {
        self.repository.authors_get_with_books(id).await
    }

    /// Update an author, merging only supplied fields
    pub async fn update_author(&self, id: Uuid, data: UpdateAuthor) -> AppResult<Author> {
        self.repository.authors_update(id, &data).await
    }

    /// Delete an author. Rejected with Conflict while books remain
    /// associated; the caller must detach associations first.
    pub async fn delete_author(&self, id: Uuid) -> AppResult<()> {
        self.repository.authors_get_by_id(id).await?;

        let book_count = self.repository.authors_book_count(id).await?;
        if book_count > 0 {
            return Err(AppError::Conflict(
                "Cannot delete author with associated books. Please remove book associations first."
                    .to_string(),
            ));
        }

        self.repository.authors_delete(id).await
    }

    // =========================================================================
    // BOOKS
    // =========================================================================

    /// Create a book with its author set. All requested author IDs must
    /// resolve; otherwise fails Validation listing every missing ID and
    /// persists nothing.
    pub async fn create_book(&self, data: CreateBook) -> AppResult<BookWithAuthors> {
        let authors = self.repository.authors_find_by_ids(&data.author_ids).await?;

        let missing = missing_author_ids(&data.author_ids, &authors);
        if !missing.is_empty() {
            return Err(AppError::Validation(format!(
                "Author(s) not found: {}",
                join_ids(&missing)
            )));
        }

        let book_id = self
            .repository
            .books_create(&data.title, data.isbn.as_deref(), &data.author_ids)
            .await?;

        let book = self.repository.books_get_by_id(book_id).await?;
        let authors = self.repository.books_get_authors(book_id).await?;

        Ok(BookWithAuthors { book, authors })
    }

    /// List all books ordered by title, each carrying its authors and its
    /// reviews (with safe users), same relation shape as `get_book`
    pub async fn list_books(&self) -> AppResult<Vec<BookDetail>> {
        self.repository.books_list_with_relations().await
    }

    /// Get full book detail (authors, reviews, review users).
    /// Embedded users carry no password: the model strips it on
    /// serialization and the repository never selects it here.
    pub async fn get_book(&self, id: Uuid) -> AppResult<BookDetail> {
        self.repository.books_get_detail(id).await
    }

    /// Update a book. Scalar fields merge only when supplied; a supplied
    /// author set fully replaces the existing one under the same
    /// all-or-nothing resolution rule as creation.
    pub async fn update_book(&self, id: Uuid, data: UpdateBook) -> AppResult<BookWithAuthors> {
        self.repository.books_get_by_id(id).await?;

        if let Some(ref author_ids) = data.author_ids {
            let authors = self.repository.authors_find_by_ids(author_ids).await?;
            let missing = missing_author_ids(author_ids, &authors);
            if !missing.is_empty() {
                return Err(AppError::Validation(format!(
                    "Author(s) not found for update: {}",
                    join_ids(&missing)
                )));
            }
        }

        self.repository
            .books_update(
                id,
                data.title.as_deref(),
                data.isbn.as_deref(),
                data.author_ids.as_deref(),
            )
            .await?;

        let book = self.repository.books_get_by_id(id).await?;
        let authors = self.repository.books_get_authors(id).await?;

        Ok(BookWithAuthors { book, authors })
    }

    /// Delete a book. Cascades its junction rows and reviews; authors
    /// are never cascade-deleted.
    pub async fn delete_book(&self, id: Uuid) -> AppResult<()> {
        self.repository.books_delete(id).await
    }
}
