//! Author model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full author model from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Author {
    pub id: i32,
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl Author {
    /// "Family, First", or empty when either part is missing
    pub fn name(&self) -> String {
        if self.first_name.is_empty() || self.family_name.is_empty() {
            return String::new();
        }
        format!("{}, {}", self.family_name, self.first_name)
    }

    /// Human readable life span, e.g. "Jan 1, 1920 - Mar 4, 1992"
    pub fn lifespan(&self) -> String {
        let fmt = |d: &Option<NaiveDate>| {
            d.map(|d| d.format("%b %-d, %Y").to_string())
                .unwrap_or_default()
        };
        match (&self.date_of_birth, &self.date_of_death) {
            (None, None) => String::new(),
            (birth, death) => format!("{} - {}", fmt(birth), fmt(death)),
        }
    }

    pub fn url(&self) -> String {
        author_url(self.id)
    }
}

pub fn author_url(id: i32) -> String {
    format!("/catalog/author/{}", id)
}

/// Create author request, built from a sanitized form submission
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuthor {
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

/// Author as shown in templates
#[derive(Debug, Clone, Serialize)]
pub struct AuthorView {
    pub id: i32,
    pub name: String,
    pub first_name: String,
    pub family_name: String,
    pub lifespan: String,
    pub url: String,
}

impl From<&Author> for AuthorView {
    fn from(a: &Author) -> Self {
        Self {
            id: a.id,
            name: a.name(),
            first_name: a.first_name.clone(),
            family_name: a.family_name.clone(),
            lifespan: a.lifespan(),
            url: a.url(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author(first: &str, family: &str) -> Author {
        Author {
            id: 7,
            first_name: first.to_string(),
            family_name: family.to_string(),
            date_of_birth: None,
            date_of_death: None,
        }
    }

    #[test]
    fn test_name_requires_both_parts() {
        assert_eq!(author("Isaac", "Asimov").name(), "Asimov, Isaac");
        assert_eq!(author("", "Asimov").name(), "");
        assert_eq!(author("Isaac", "").name(), "");
    }

    #[test]
    fn test_lifespan() {
        let mut a = author("Isaac", "Asimov");
        assert_eq!(a.lifespan(), "");
        a.date_of_birth = NaiveDate::from_ymd_opt(1920, 1, 2);
        assert_eq!(a.lifespan(), "Jan 2, 1920 - ");
        a.date_of_death = NaiveDate::from_ymd_opt(1992, 4, 6);
        assert_eq!(a.lifespan(), "Jan 2, 1920 - Apr 6, 1992");
    }

    #[test]
    fn test_url() {
        assert_eq!(author("Isaac", "Asimov").url(), "/catalog/author/7");
    }
}
