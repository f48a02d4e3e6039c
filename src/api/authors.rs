//! Author pages: detail and create form

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use tera::Context;

use crate::{
    error::{AppError, AppResult},
    forms::{self, Outcome, RawForm},
    models::{author::AuthorView, book::BookSummaryView},
    views, AppState,
};

/// Author page with the books they wrote
pub async fn author_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let id: i32 = id
        .parse()
        .map_err(|_| AppError::NotFound("Author not found".to_string()))?;
    let detail = state.services.catalog.author_detail(id).await?;
    let books: Vec<BookSummaryView> = detail.books.iter().map(BookSummaryView::from).collect();

    let mut context = Context::new();
    context.insert("title", "Author Detail");
    context.insert("author", &AuthorView::from(&detail.author));
    context.insert("author_books", &books);
    views::render("author_detail.html", &context)
}

/// Empty author form
pub async fn author_create_get() -> AppResult<Html<String>> {
    let mut context = Context::new();
    context.insert("title", "Create Author");
    views::render("author_form.html", &context)
}

/// Validate, sanitize and persist a new author
pub async fn author_create_post(
    State(state): State<AppState>,
    Form(fields): Form<Vec<(String, String)>>,
) -> AppResult<Response> {
    let submission = forms::author::schema().process(&RawForm::from(fields));

    match submission.gate() {
        Outcome::Rejected(submission) => {
            tracing::debug!(
                "Author form rejected with {} violation(s)",
                submission.violations().len()
            );
            let mut context = Context::new();
            context.insert("title", "Create Author");
            context.insert("author", submission.values());
            context.insert("errors", submission.violations());
            Ok(views::render("author_form.html", &context)?.into_response())
        }
        Outcome::Accepted(submission) => {
            let author = state
                .services
                .catalog
                .create_author(forms::author::new_author(&submission))
                .await?;
            Ok(Redirect::to(&author.url()).into_response())
        }
    }
}
