//! Repository layer: the document store the catalog reads from and writes to

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod genres;
pub mod memory;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        Author, Book, BookInstance, BookListing, BookSummary, Genre, InstanceStatus, NewAuthor,
        NewBook, PopulatedBook,
    },
};

pub use memory::MemoryStore;

/// Operations the handlers need from the document store.
///
/// Reads are independent of one another, so callers may run any number of
/// them concurrently.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn count_books(&self) -> AppResult<i64>;

    /// Count copies, optionally only those with the given status
    async fn count_book_instances(&self, status: Option<InstanceStatus>) -> AppResult<i64>;

    async fn count_authors(&self) -> AppResult<i64>;

    async fn count_genres(&self) -> AppResult<i64>;

    /// All books (title and author), ordered by title
    async fn list_books(&self) -> AppResult<Vec<BookListing>>;

    async fn find_book(&self, id: i32) -> AppResult<Option<PopulatedBook>>;

    async fn list_book_instances(&self, book_id: i32) -> AppResult<Vec<BookInstance>>;

    async fn find_author(&self, id: i32) -> AppResult<Option<Author>>;

    /// Books written by an author (title and summary), ordered by title
    async fn list_books_by_author(&self, author_id: i32) -> AppResult<Vec<BookSummary>>;

    /// All authors, ordered by family name
    async fn list_authors(&self) -> AppResult<Vec<Author>>;

    /// All genres, ordered by name
    async fn list_genres(&self) -> AppResult<Vec<Genre>>;

    async fn create_author(&self, author: &NewAuthor) -> AppResult<Author>;

    async fn create_book(&self, book: &NewBook) -> AppResult<Book>;
}

/// PostgreSQL-backed store holding the connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for Repository {
    async fn count_books(&self) -> AppResult<i64> {
        self.books_count().await
    }

    async fn count_book_instances(&self, status: Option<InstanceStatus>) -> AppResult<i64> {
        self.book_instances_count(status).await
    }

    async fn count_authors(&self) -> AppResult<i64> {
        self.authors_count().await
    }

    async fn count_genres(&self) -> AppResult<i64> {
        self.genres_count().await
    }

    async fn list_books(&self) -> AppResult<Vec<BookListing>> {
        self.books_list().await
    }

    async fn find_book(&self, id: i32) -> AppResult<Option<PopulatedBook>> {
        self.books_get_by_id(id).await
    }

    async fn list_book_instances(&self, book_id: i32) -> AppResult<Vec<BookInstance>> {
        self.book_instances_list_for_book(book_id).await
    }

    async fn find_author(&self, id: i32) -> AppResult<Option<Author>> {
        self.authors_get_by_id(id).await
    }

    async fn list_books_by_author(&self, author_id: i32) -> AppResult<Vec<BookSummary>> {
        self.books_list_by_author(author_id).await
    }

    async fn list_authors(&self) -> AppResult<Vec<Author>> {
        self.authors_list().await
    }

    async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        self.genres_list().await
    }

    async fn create_author(&self, author: &NewAuthor) -> AppResult<Author> {
        self.authors_create(author).await
    }

    async fn create_book(&self, book: &NewBook) -> AppResult<Book> {
        self.books_create(book).await
    }
}
