//! HTML rendering with Tera.
//!
//! Templates are compiled into the binary and parsed once, on first use.

use std::collections::HashMap;

use axum::{http::StatusCode, response::Html};
use once_cell::sync::OnceCell;
use tera::{Context, Filter, Tera, Value};

use crate::{error::AppResult, forms::rules::escape};

static TEMPLATES: OnceCell<Tera> = OnceCell::new();

/// `sanitized` filter for text that was escaped when it was submitted.
///
/// Escaping is idempotent, so stored entities pass through unchanged while
/// anything still raw is escaped once. The output is marked safe so
/// autoescape does not encode the entities a second time.
struct Sanitized;

impl Filter for Sanitized {
    fn filter(&self, value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
        let text = match value {
            Value::String(s) => escape(s),
            Value::Null => String::new(),
            other => escape(&other.to_string()),
        };
        Ok(Value::String(text))
    }

    fn is_safe(&self) -> bool {
        true
    }
}

fn load() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.register_filter("sanitized", Sanitized);
    tera.add_raw_templates(vec![
        ("layout.html", include_str!("../templates/layout.html")),
        ("index.html", include_str!("../templates/index.html")),
        ("book_list.html", include_str!("../templates/book_list.html")),
        ("book_detail.html", include_str!("../templates/book_detail.html")),
        ("book_form.html", include_str!("../templates/book_form.html")),
        ("author_detail.html", include_str!("../templates/author_detail.html")),
        ("author_form.html", include_str!("../templates/author_form.html")),
        ("error.html", include_str!("../templates/error.html")),
    ])?;
    tracing::debug!("Loaded {} templates", tera.get_template_names().count());
    Ok(tera)
}

fn templates() -> Result<&'static Tera, tera::Error> {
    TEMPLATES.get_or_try_init(load)
}

/// Render a page template
pub fn render(name: &str, context: &Context) -> AppResult<Html<String>> {
    Ok(Html(templates()?.render(name, context)?))
}

/// Render the generic error page
pub fn render_error(status: StatusCode, message: &str) -> Result<String, tera::Error> {
    let mut context = Context::new();
    context.insert("title", status.canonical_reason().unwrap_or("Error"));
    context.insert("status", &status.as_u16());
    context.insert("message", message);
    templates()?.render("error.html", &context)
}
