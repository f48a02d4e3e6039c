//! Book domain methods on Repository

use sqlx::Row;

use super::Repository;
use crate::{
    error::AppResult,
    models::{Author, Book, BookListing, BookSummary, NewBook, PopulatedBook},
};

impl Repository {
    pub async fn books_count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Title and author of every book, author joined in the same query
    pub async fn books_list(&self) -> AppResult<Vec<BookListing>> {
        let rows = sqlx::query(
            r#"
            SELECT b.id, b.title,
                   a.id AS author_id, a.first_name, a.family_name,
                   a.date_of_birth, a.date_of_death
            FROM books b
            LEFT JOIN authors a ON a.id = b.author_id
            ORDER BY b.title
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| {
                let author_id: Option<i32> = r.get("author_id");
                BookListing {
                    id: r.get("id"),
                    title: r.get("title"),
                    author: author_id.map(|id| Author {
                        id,
                        first_name: r.get("first_name"),
                        family_name: r.get("family_name"),
                        date_of_birth: r.get("date_of_birth"),
                        date_of_death: r.get("date_of_death"),
                    }),
                }
            })
            .collect())
    }

    /// Get a book with its author and genres
    pub async fn books_get_by_id(&self, id: i32) -> AppResult<Option<PopulatedBook>> {
        let book = sqlx::query_as::<_, Book>(
            "SELECT id, title, author_id, summary, isbn FROM books WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(book) = book else {
            return Ok(None);
        };

        let author = self.authors_get_by_id(book.author_id).await?;
        let genres = self.genres_for_book(book.id).await?;

        Ok(Some(PopulatedBook {
            book,
            author,
            genres,
        }))
    }

    pub async fn books_list_by_author(&self, author_id: i32) -> AppResult<Vec<BookSummary>> {
        let rows = sqlx::query_as::<_, BookSummary>(
            "SELECT id, title, summary FROM books WHERE author_id = $1 ORDER BY title",
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Insert a book and its genre links in one transaction
    pub async fn books_create(&self, data: &NewBook) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let book = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author_id, summary, isbn)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, author_id, summary, isbn
            "#,
        )
        .bind(&data.title)
        .bind(data.author_id)
        .bind(&data.summary)
        .bind(&data.isbn)
        .fetch_one(&mut *tx)
        .await?;

        for genre_id in &data.genre_ids {
            sqlx::query("INSERT INTO book_genres (book_id, genre_id) VALUES ($1, $2)")
                .bind(book.id)
                .bind(genre_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::debug!("Created book id={} ({} genres)", book.id, data.genre_ids.len());
        Ok(book)
    }
}
