//! Catalog service: the read views and writes behind the catalog pages

use std::sync::Arc;

use indexmap::IndexMap;

use super::aggregate::{both, Aggregate};
use crate::{
    error::{AppError, AppResult},
    models::{
        Author, Book, BookInstance, BookListing, BookSummary, Genre, InstanceStatus, NewAuthor,
        NewBook,
    },
    repository::CatalogStore,
};

/// Dashboard counts keyed by name, in display order
pub type DashboardCounts = IndexMap<&'static str, i64>;

/// A book with everything its detail page shows
#[derive(Debug, Clone)]
pub struct BookDetail {
    pub book: Book,
    pub author: Author,
    pub genres: Vec<Genre>,
    pub copies: Vec<BookInstance>,
}

#[derive(Debug, Clone)]
pub struct AuthorDetail {
    pub author: Author,
    pub books: Vec<BookSummary>,
}

/// Options offered by the book form
#[derive(Debug, Clone, Default)]
pub struct BookFormChoices {
    pub authors: Vec<Author>,
    pub genres: Vec<Genre>,
}

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Count books, copies, available copies, authors and genres concurrently
    pub async fn dashboard_counts(&self) -> AppResult<DashboardCounts> {
        let store = self.store.as_ref();

        Aggregate::new()
            .read("book_count", store.count_books())
            .read("book_instance_count", store.count_book_instances(None))
            .read(
                "book_instance_available_count",
                store.count_book_instances(Some(InstanceStatus::Available)),
            )
            .read("author_count", store.count_authors())
            .read("genre_count", store.count_genres())
            .join()
            .await
    }

    pub async fn list_books(&self) -> AppResult<Vec<BookListing>> {
        self.store.list_books().await
    }

    /// Book with author, genres and copies. A missing book, or a book whose
    /// author does not resolve, is reported as not found.
    pub async fn book_detail(&self, id: i32) -> AppResult<BookDetail> {
        let (book, copies) = both(
            self.store.find_book(id),
            self.store.list_book_instances(id),
        )
        .await?;

        let book = book.ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;
        let author = book.author.ok_or_else(|| {
            tracing::warn!(
                "Book {} references missing author {}",
                book.book.id,
                book.book.author_id
            );
            AppError::NotFound("Book not found".to_string())
        })?;

        Ok(BookDetail {
            book: book.book,
            author,
            genres: book.genres,
            copies,
        })
    }

    /// Author with the books they wrote
    pub async fn author_detail(&self, id: i32) -> AppResult<AuthorDetail> {
        let (author, books) = both(
            self.store.find_author(id),
            self.store.list_books_by_author(id),
        )
        .await?;

        let author = author.ok_or_else(|| AppError::NotFound("Author not found".to_string()))?;
        Ok(AuthorDetail { author, books })
    }

    pub async fn book_form_choices(&self) -> AppResult<BookFormChoices> {
        let (authors, genres) = both(self.store.list_authors(), self.store.list_genres()).await?;
        Ok(BookFormChoices { authors, genres })
    }

    pub async fn create_author(&self, author: NewAuthor) -> AppResult<Author> {
        let created = self.store.create_author(&author).await?;
        tracing::info!("Created author id={} ({})", created.id, created.name());
        Ok(created)
    }

    /// Persist a book. The author reference must resolve.
    pub async fn create_book(&self, book: NewBook) -> AppResult<Book> {
        if self.store.find_author(book.author_id).await?.is_none() {
            return Err(AppError::BadRequest(format!(
                "Author {} does not exist",
                book.author_id
            )));
        }

        let created = self.store.create_book(&book).await?;
        tracing::info!("Created book id={} ({})", created.id, created.title);
        Ok(created)
    }
}
