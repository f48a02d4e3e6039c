//! In-memory document store, used for local development and tests.
//!
//! Entities live in id-keyed maps behind a single `RwLock`; ids come from a
//! per-collection counter starting at 1.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use super::CatalogStore;
use crate::{
    error::{AppError, AppResult},
    models::{
        Author, Book, BookInstance, BookListing, BookSummary, Genre, InstanceStatus, NewAuthor,
        NewBook, PopulatedBook,
    },
};

struct Collection<T> {
    rows: BTreeMap<i32, T>,
    next_id: i32,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T> Collection<T> {
    fn insert_with(&mut self, build: impl FnOnce(i32) -> T) -> &T {
        let id = self.next_id;
        self.next_id += 1;
        self.rows.entry(id).or_insert_with(|| build(id))
    }
}

#[derive(Default)]
struct Tables {
    authors: Collection<Author>,
    books: Collection<Book>,
    book_genres: Vec<(i32, i32)>,
    genres: Collection<Genre>,
    book_instances: Collection<BookInstance>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_genre(&self, name: &str) -> Genre {
        let mut tables = self.tables.write().await;
        tables
            .genres
            .insert_with(|id| Genre {
                id,
                name: name.to_string(),
            })
            .clone()
    }

    pub async fn add_book_instance(
        &self,
        book_id: i32,
        imprint: &str,
        status: InstanceStatus,
        due_back: Option<NaiveDate>,
    ) -> BookInstance {
        let mut tables = self.tables.write().await;
        tables
            .book_instances
            .insert_with(|id| BookInstance {
                id,
                book_id,
                imprint: imprint.to_string(),
                status: status.as_str().to_string(),
                due_back,
            })
            .clone()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn count_books(&self) -> AppResult<i64> {
        Ok(self.tables.read().await.books.rows.len() as i64)
    }

    async fn count_book_instances(&self, status: Option<InstanceStatus>) -> AppResult<i64> {
        let tables = self.tables.read().await;
        let count = tables
            .book_instances
            .rows
            .values()
            .filter(|bi| status.map_or(true, |s| bi.status == s.as_str()))
            .count();
        Ok(count as i64)
    }

    async fn count_authors(&self) -> AppResult<i64> {
        Ok(self.tables.read().await.authors.rows.len() as i64)
    }

    async fn count_genres(&self) -> AppResult<i64> {
        Ok(self.tables.read().await.genres.rows.len() as i64)
    }

    async fn list_books(&self) -> AppResult<Vec<BookListing>> {
        let tables = self.tables.read().await;
        let mut books: Vec<BookListing> = tables
            .books
            .rows
            .values()
            .map(|b| BookListing {
                id: b.id,
                title: b.title.clone(),
                author: tables.authors.rows.get(&b.author_id).cloned(),
            })
            .collect();
        books.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(books)
    }

    async fn find_book(&self, id: i32) -> AppResult<Option<PopulatedBook>> {
        let tables = self.tables.read().await;
        let Some(book) = tables.books.rows.get(&id) else {
            return Ok(None);
        };

        let mut genres: Vec<Genre> = tables
            .book_genres
            .iter()
            .filter(|(book_id, _)| *book_id == id)
            .filter_map(|(_, genre_id)| tables.genres.rows.get(genre_id).cloned())
            .collect();
        genres.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(Some(PopulatedBook {
            book: book.clone(),
            author: tables.authors.rows.get(&book.author_id).cloned(),
            genres,
        }))
    }

    async fn list_book_instances(&self, book_id: i32) -> AppResult<Vec<BookInstance>> {
        let tables = self.tables.read().await;
        Ok(tables
            .book_instances
            .rows
            .values()
            .filter(|bi| bi.book_id == book_id)
            .cloned()
            .collect())
    }

    async fn find_author(&self, id: i32) -> AppResult<Option<Author>> {
        Ok(self.tables.read().await.authors.rows.get(&id).cloned())
    }

    async fn list_books_by_author(&self, author_id: i32) -> AppResult<Vec<BookSummary>> {
        let tables = self.tables.read().await;
        let mut books: Vec<BookSummary> = tables
            .books
            .rows
            .values()
            .filter(|b| b.author_id == author_id)
            .map(|b| BookSummary {
                id: b.id,
                title: b.title.clone(),
                summary: b.summary.clone(),
            })
            .collect();
        books.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(books)
    }

    async fn list_authors(&self) -> AppResult<Vec<Author>> {
        let tables = self.tables.read().await;
        let mut authors: Vec<Author> = tables.authors.rows.values().cloned().collect();
        authors.sort_by(|a, b| {
            (&a.family_name, &a.first_name).cmp(&(&b.family_name, &b.first_name))
        });
        Ok(authors)
    }

    async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        let tables = self.tables.read().await;
        let mut genres: Vec<Genre> = tables.genres.rows.values().cloned().collect();
        genres.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(genres)
    }

    async fn create_author(&self, data: &NewAuthor) -> AppResult<Author> {
        let mut tables = self.tables.write().await;
        let author = tables
            .authors
            .insert_with(|id| Author {
                id,
                first_name: data.first_name.clone(),
                family_name: data.family_name.clone(),
                date_of_birth: data.date_of_birth,
                date_of_death: data.date_of_death,
            })
            .clone();
        Ok(author)
    }

    async fn create_book(&self, data: &NewBook) -> AppResult<Book> {
        let mut tables = self.tables.write().await;
        if !tables.authors.rows.contains_key(&data.author_id) {
            return Err(AppError::Store(format!(
                "book references missing author {}",
                data.author_id
            )));
        }
        if let Some(missing) = data
            .genre_ids
            .iter()
            .find(|g| !tables.genres.rows.contains_key(*g))
        {
            return Err(AppError::Store(format!(
                "book references missing genre {}",
                missing
            )));
        }

        let book = tables
            .books
            .insert_with(|id| Book {
                id,
                title: data.title.clone(),
                author_id: data.author_id,
                summary: data.summary.clone(),
                isbn: data.isbn.clone(),
            })
            .clone();
        for genre_id in &data.genre_ids {
            tables.book_genres.push((book.id, *genre_id));
        }
        Ok(book)
    }
}
