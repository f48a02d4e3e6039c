//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{author::Author, author::AuthorView, genre::Genre};

/// Full book model from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author_id: i32,
    pub summary: String,
    pub isbn: String,
}

impl Book {
    pub fn url(&self) -> String {
        book_url(self.id)
    }
}

pub fn book_url(id: i32) -> String {
    format!("/catalog/book/{}", id)
}

/// Book with its author and genres resolved
#[derive(Debug, Clone, PartialEq)]
pub struct PopulatedBook {
    pub book: Book,
    /// `None` when the author reference does not resolve
    pub author: Option<Author>,
    pub genres: Vec<Genre>,
}

/// Title/author projection used by the book list
#[derive(Debug, Clone, PartialEq)]
pub struct BookListing {
    pub id: i32,
    pub title: String,
    pub author: Option<Author>,
}

/// Title/summary projection used on an author's page
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct BookSummary {
    pub id: i32,
    pub title: String,
    pub summary: String,
}

/// Create book request, built from a sanitized form submission
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub author_id: i32,
    pub summary: String,
    pub isbn: String,
    pub genre_ids: Vec<i32>,
}

/// Book row as shown in the list template
#[derive(Debug, Clone, Serialize)]
pub struct BookListEntry {
    pub title: String,
    pub url: String,
    pub author: Option<AuthorView>,
}

impl From<&BookListing> for BookListEntry {
    fn from(b: &BookListing) -> Self {
        Self {
            title: b.title.clone(),
            url: book_url(b.id),
            author: b.author.as_ref().map(AuthorView::from),
        }
    }
}

/// Link to a book with its summary, as shown on an author page
#[derive(Debug, Clone, Serialize)]
pub struct BookSummaryView {
    pub title: String,
    pub summary: String,
    pub url: String,
}

impl From<&BookSummary> for BookSummaryView {
    fn from(b: &BookSummary) -> Self {
        Self {
            title: b.title.clone(),
            summary: b.summary.clone(),
            url: book_url(b.id),
        }
    }
}
