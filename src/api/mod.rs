//! HTTP handlers for the catalog pages

pub mod authors;
pub mod books;
pub mod catalog;
pub mod health;

use axum::{routing::get, Router};

use crate::AppState;

/// All application routes, with state attached
pub fn router(state: AppState) -> Router {
    let catalog = Router::new()
        .route("/", get(catalog::index))
        // Books
        .route("/books", get(books::book_list))
        .route(
            "/book/create",
            get(books::book_create_get).post(books::book_create_post),
        )
        .route("/book/:id", get(books::book_detail))
        .route(
            "/book/:id/delete",
            get(books::book_delete_get).post(books::book_delete_post),
        )
        .route(
            "/book/:id/update",
            get(books::book_update_get).post(books::book_update_post),
        )
        // Authors
        .route(
            "/author/create",
            get(authors::author_create_get).post(authors::author_create_post),
        )
        .route("/author/:id", get(authors::author_detail));

    Router::new()
        .route("/", get(catalog::home))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest("/catalog", catalog)
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        Router,
    };
    use tower::ServiceExt;

    use crate::{config::AppConfig, repository::CatalogStore, services::Services, AppState};

    pub fn app(store: Arc<dyn CatalogStore>) -> Router {
        super::router(AppState {
            config: Arc::new(AppConfig::default()),
            services: Arc::new(Services::new(store)),
        })
    }

    pub struct TestResponse {
        pub status: StatusCode,
        pub location: Option<String>,
        pub body: String,
    }

    async fn send(app: Router, request: Request<Body>) -> TestResponse {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        TestResponse {
            status,
            location,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    pub async fn get(app: Router, uri: &str) -> TestResponse {
        send(app, Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post_form(app: Router, uri: &str, body: &str) -> TestResponse {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(app, request).await
    }
}
