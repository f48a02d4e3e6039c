//! Author domain methods on Repository

use super::Repository;
use crate::{
    error::AppResult,
    models::{Author, NewAuthor},
};

impl Repository {
    pub async fn authors_count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Get author by ID
    pub async fn authors_get_by_id(&self, id: i32) -> AppResult<Option<Author>> {
        let author = sqlx::query_as::<_, Author>(
            r#"
            SELECT id, first_name, family_name, date_of_birth, date_of_death
            FROM authors
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(author)
    }

    /// List all authors by family name
    pub async fn authors_list(&self) -> AppResult<Vec<Author>> {
        let rows = sqlx::query_as::<_, Author>(
            r#"
            SELECT id, first_name, family_name, date_of_birth, date_of_death
            FROM authors
            ORDER BY family_name, first_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Create author
    pub async fn authors_create(&self, data: &NewAuthor) -> AppResult<Author> {
        let row = sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (first_name, family_name, date_of_birth, date_of_death)
            VALUES ($1, $2, $3, $4)
            RETURNING id, first_name, family_name, date_of_birth, date_of_death
            "#,
        )
        .bind(&data.first_name)
        .bind(&data.family_name)
        .bind(data.date_of_birth)
        .bind(data.date_of_death)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created author id={}", row.id);
        Ok(row)
    }
}
