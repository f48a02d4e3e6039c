//! Book pages: list, detail, create form and the unimplemented delete/update

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Serialize;
use tera::Context;

use crate::{
    error::{AppError, AppResult},
    forms::{self, Outcome, RawForm, Submission},
    models::{author::AuthorView, book::BookListEntry, book_instance::BookInstanceView},
    services::catalog::BookFormChoices,
    views, AppState,
};

/// Author option in the book form's select
#[derive(Serialize)]
struct AuthorChoice {
    id: i32,
    name: String,
    selected: bool,
}

/// Genre checkbox in the book form
#[derive(Serialize)]
struct GenreChoice {
    id: i32,
    name: String,
    checked: bool,
}

/// List all books with their authors
pub async fn book_list(State(state): State<AppState>) -> AppResult<Html<String>> {
    let books = state.services.catalog.list_books().await?;
    let book_list: Vec<BookListEntry> = books.iter().map(BookListEntry::from).collect();

    let mut context = Context::new();
    context.insert("title", "Book List");
    context.insert("book_list", &book_list);
    views::render("book_list.html", &context)
}

/// Book detail page with its copies. An id that is not a valid key names no
/// book, so it is reported as not found like any other unknown id.
pub async fn book_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let id: i32 = id
        .parse()
        .map_err(|_| AppError::NotFound("Book not found".to_string()))?;
    let detail = state.services.catalog.book_detail(id).await?;
    let copies: Vec<BookInstanceView> =
        detail.copies.iter().map(BookInstanceView::from).collect();

    let mut context = Context::new();
    context.insert("title", &detail.book.title);
    context.insert("book", &detail.book);
    context.insert("author", &AuthorView::from(&detail.author));
    context.insert("genres", &detail.genres);
    context.insert("copies", &copies);
    views::render("book_detail.html", &context)
}

fn render_book_form(
    choices: &BookFormChoices,
    submission: Option<&Submission>,
) -> AppResult<Html<String>> {
    let selected_author = submission.map(|s| s.text("author")).unwrap_or("");
    let checked_genres = submission.map(|s| s.list("genre")).unwrap_or(&[]);

    let authors: Vec<AuthorChoice> = choices
        .authors
        .iter()
        .map(|a| AuthorChoice {
            id: a.id,
            name: a.name(),
            selected: a.id.to_string() == selected_author,
        })
        .collect();
    let genres: Vec<GenreChoice> = choices
        .genres
        .iter()
        .map(|g| GenreChoice {
            id: g.id,
            name: g.name.clone(),
            checked: checked_genres.iter().any(|c| *c == g.id.to_string()),
        })
        .collect();

    let mut context = Context::new();
    context.insert("title", "Create Book");
    context.insert("authors", &authors);
    context.insert("genres", &genres);
    if let Some(submission) = submission {
        context.insert("book", submission.values());
        context.insert("errors", submission.violations());
    }
    views::render("book_form.html", &context)
}

/// Empty book form
pub async fn book_create_get(State(state): State<AppState>) -> AppResult<Html<String>> {
    let choices = state.services.catalog.book_form_choices().await?;
    render_book_form(&choices, None)
}

/// Validate, sanitize and persist a new book
pub async fn book_create_post(
    State(state): State<AppState>,
    Form(fields): Form<Vec<(String, String)>>,
) -> AppResult<Response> {
    let submission = forms::book::schema().process(&RawForm::from(fields));

    match submission.gate() {
        Outcome::Rejected(submission) => {
            tracing::debug!(
                "Book form rejected with {} violation(s)",
                submission.violations().len()
            );
            let choices = state.services.catalog.book_form_choices().await?;
            Ok(render_book_form(&choices, Some(&submission))?.into_response())
        }
        Outcome::Accepted(submission) => {
            let book = forms::book::new_book(&submission)?;
            let created = state.services.catalog.create_book(book).await?;
            Ok(Redirect::to(&created.url()).into_response())
        }
    }
}

pub async fn book_delete_get() -> &'static str {
    "NOT IMPLEMENTED: Book delete GET"
}

pub async fn book_delete_post() -> &'static str {
    "NOT IMPLEMENTED: Book delete POST"
}

pub async fn book_update_get() -> &'static str {
    "NOT IMPLEMENTED: Book update GET"
}

pub async fn book_update_post() -> &'static str {
    "NOT IMPLEMENTED: Book update POST"
}
