//! Book instance (copy) domain methods on Repository

use super::Repository;
use crate::{
    error::AppResult,
    models::{BookInstance, InstanceStatus},
};

impl Repository {
    /// Count copies, optionally filtered by status
    pub async fn book_instances_count(&self, status: Option<InstanceStatus>) -> AppResult<i64> {
        let count: i64 = match status {
            Some(status) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE status = $1")
                    .bind(status.as_str())
                    .fetch_one(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM book_instances")
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        Ok(count)
    }

    pub async fn book_instances_list_for_book(
        &self,
        book_id: i32,
    ) -> AppResult<Vec<BookInstance>> {
        let rows = sqlx::query_as::<_, BookInstance>(
            r#"
            SELECT id, book_id, imprint, status, due_back
            FROM book_instances
            WHERE book_id = $1
            ORDER BY id
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
