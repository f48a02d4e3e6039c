//! Author create form

use once_cell::sync::Lazy;

use super::{Field, FormSchema, Rule, Sanitizer, Submission};
use crate::models::NewAuthor;

static AUTHOR_FORM: Lazy<FormSchema> = Lazy::new(|| {
    FormSchema::new()
        .field(
            Field::new("first_name")
                .check(Rule::Required, "First name must be specified.")
                .check(Rule::MaxLength(100), "First name must be at most 100 characters.")
                .check(Rule::Alphanumeric, "First name has non-alphanumeric characters.")
                .sanitize(Sanitizer::Trim)
                .sanitize(Sanitizer::Escape),
        )
        .field(
            Field::new("family_name")
                .check(Rule::Required, "Family name must be specified.")
                .check(Rule::MaxLength(100), "Family name must be at most 100 characters.")
                .check(Rule::Alphanumeric, "Family name has non-alphanumeric characters.")
                .sanitize(Sanitizer::Trim)
                .sanitize(Sanitizer::Escape),
        )
        .field(
            Field::new("date_of_birth")
                .optional()
                .check(Rule::IsoDate, "Invalid date of birth")
                .sanitize(Sanitizer::ToDate),
        )
        .field(
            Field::new("date_of_death")
                .optional()
                .check(Rule::IsoDate, "Invalid date of death")
                .sanitize(Sanitizer::ToDate),
        )
});

pub fn schema() -> &'static FormSchema {
    &AUTHOR_FORM
}

/// Build the author from an accepted submission
pub fn new_author(form: &Submission) -> NewAuthor {
    NewAuthor {
        first_name: form.text("first_name").to_string(),
        family_name: form.text("family_name").to_string(),
        date_of_birth: form.date("date_of_birth"),
        date_of_death: form.date("date_of_death"),
    }
}
