//! Book create form

use once_cell::sync::Lazy;

use super::{Field, FormSchema, Rule, Sanitizer, Submission};
use crate::{
    error::{AppError, AppResult},
    models::NewBook,
};

static BOOK_FORM: Lazy<FormSchema> = Lazy::new(|| {
    FormSchema::new()
        .field(
            Field::new("title")
                .check(Rule::Required, "Title must not be empty.")
                .sanitize(Sanitizer::Trim)
                .sanitize(Sanitizer::Escape),
        )
        .field(
            Field::new("author")
                .check(Rule::Required, "Author must not be empty.")
                .check(Rule::Integer, "Author must be chosen from the list.")
                .sanitize(Sanitizer::Trim)
                .sanitize(Sanitizer::Escape),
        )
        .field(
            Field::new("summary")
                .check(Rule::Required, "Summary must not be empty.")
                .sanitize(Sanitizer::Trim)
                .sanitize(Sanitizer::Escape),
        )
        .field(
            Field::new("isbn")
                .check(Rule::Required, "ISBN must not be empty.")
                .sanitize(Sanitizer::Trim)
                .sanitize(Sanitizer::Escape),
        )
        .field(
            Field::multiple("genre")
                .optional()
                .check(Rule::Integer, "Genre must be chosen from the list.")
                .sanitize(Sanitizer::Trim)
                .sanitize(Sanitizer::Escape),
        )
});

pub fn schema() -> &'static FormSchema {
    &BOOK_FORM
}

/// Build the book from an accepted submission
pub fn new_book(form: &Submission) -> AppResult<NewBook> {
    let author_id = form
        .text("author")
        .parse::<i32>()
        .map_err(|_| AppError::BadRequest("Author must be chosen from the list.".to_string()))?;

    let genre_ids = form
        .list("genre")
        .iter()
        .map(|id| {
            id.parse::<i32>().map_err(|_| {
                AppError::BadRequest("Genre must be chosen from the list.".to_string())
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    Ok(NewBook {
        title: form.text("title").to_string(),
        author_id,
        summary: form.text("summary").to_string(),
        isbn: form.text("isbn").to_string(),
        genre_ids,
    })
}
