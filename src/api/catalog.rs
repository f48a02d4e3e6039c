//! Catalog home page

use axum::{
    extract::State,
    response::{Html, Redirect},
};
use tera::Context;

use crate::{error::AppResult, views, AppState};

/// Site root forwards to the catalog
pub async fn home() -> Redirect {
    Redirect::to("/catalog")
}

/// Dashboard with record counts.
///
/// A failed count does not fail the page: it is rendered with an error
/// message and no counts.
pub async fn index(State(state): State<AppState>) -> AppResult<Html<String>> {
    let mut context = Context::new();
    context.insert("title", "Local Library Home");

    match state.services.catalog.dashboard_counts().await {
        Ok(counts) => context.insert("data", &counts),
        Err(e) => {
            tracing::error!("Failed to load dashboard counts: {}", e);
            context.insert("error", "Unable to load the library record counts.");
        }
    }

    views::render("index.html", &context)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;

    use crate::{
        api::test_support::{app, get},
        error::AppError,
        models::{InstanceStatus, NewAuthor},
        repository::{CatalogStore, MemoryStore, MockCatalogStore},
    };

    #[tokio::test]
    async fn test_home_redirects_to_catalog() {
        let response = get(app(Arc::new(MemoryStore::new())), "/").await;
        assert_eq!(response.status, StatusCode::SEE_OTHER);
        assert_eq!(response.location.as_deref(), Some("/catalog"));
    }

    #[tokio::test]
    async fn test_index_renders_counts() {
        let store = MemoryStore::new();
        store
            .create_author(&NewAuthor {
                first_name: "Mary".into(),
                family_name: "Shelley".into(),
                date_of_birth: None,
                date_of_death: None,
            })
            .await
            .unwrap();
        store.add_genre("Gothic").await;
        store.add_genre("Horror").await;
        store.add_book_instance(1, "Lackington, 1818", InstanceStatus::Available, None).await;
        store.add_book_instance(1, "Colburn, 1831", InstanceStatus::Loaned, None).await;

        let response = get(app(Arc::new(store)), "/catalog").await;
        assert_eq!(response.status, StatusCode::OK);
        assert!(response.body.contains("<strong>Books:</strong> 0"));
        assert!(response.body.contains("<strong>Copies:</strong> 2"));
        assert!(response.body.contains("<strong>Copies available:</strong> 1"));
        assert!(response.body.contains("<strong>Authors:</strong> 1"));
        assert!(response.body.contains("<strong>Genres:</strong> 2"));
    }

    #[tokio::test]
    async fn test_index_with_failed_count_shows_error_only() {
        let mut store = MockCatalogStore::new();
        store.expect_count_books().returning(|| Ok(1));
        store.expect_count_book_instances().returning(|_| Ok(1));
        store.expect_count_authors().returning(|| Ok(1));
        store
            .expect_count_genres()
            .returning(|| Err(AppError::Store("genre collection offline".into())));

        let response = get(app(Arc::new(store)), "/catalog").await;
        assert_eq!(response.status, StatusCode::OK);
        assert!(response.body.contains("Unable to load the library record counts."));
        assert!(!response.body.contains("<strong>Books:</strong>"));
        assert!(!response.body.contains("genre collection offline"));
    }
}
