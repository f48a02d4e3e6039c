//! Book instance (physical copy) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

/// Copy availability, stored as text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum InstanceStatus {
    Available,
    #[default]
    Maintenance,
    Loaned,
    Reserved,
}

impl InstanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceStatus::Available => "Available",
            InstanceStatus::Maintenance => "Maintenance",
            InstanceStatus::Loaned => "Loaned",
            InstanceStatus::Reserved => "Reserved",
        }
    }
}

impl FromStr for InstanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Available" => Ok(InstanceStatus::Available),
            "Maintenance" => Ok(InstanceStatus::Maintenance),
            "Loaned" => Ok(InstanceStatus::Loaned),
            "Reserved" => Ok(InstanceStatus::Reserved),
            other => Err(format!("Unknown book instance status: {}", other)),
        }
    }
}

impl std::fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full book instance model from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct BookInstance {
    pub id: i32,
    pub book_id: i32,
    pub imprint: String,
    pub status: String, // Available, Maintenance, Loaned, Reserved
    pub due_back: Option<NaiveDate>,
}

impl BookInstance {
    /// Unknown status strings read back as the default
    pub fn status(&self) -> InstanceStatus {
        self.status.parse().unwrap_or_default()
    }

    pub fn url(&self) -> String {
        format!("/catalog/bookinstance/{}", self.id)
    }
}

/// Copy as shown on the book detail page
#[derive(Debug, Clone, Serialize)]
pub struct BookInstanceView {
    pub id: i32,
    pub imprint: String,
    pub status: String,
    pub available: bool,
    pub due_back: Option<String>,
    pub url: String,
}

impl From<&BookInstance> for BookInstanceView {
    fn from(bi: &BookInstance) -> Self {
        let status = bi.status();
        Self {
            id: bi.id,
            imprint: bi.imprint.clone(),
            status: status.to_string(),
            available: status == InstanceStatus::Available,
            due_back: bi.due_back.map(|d| d.format("%b %-d, %Y").to_string()),
            url: bi.url(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip_and_default() {
        assert_eq!("Loaned".parse::<InstanceStatus>(), Ok(InstanceStatus::Loaned));
        assert!("loaned".parse::<InstanceStatus>().is_err());

        let copy = BookInstance {
            id: 1,
            book_id: 1,
            imprint: "Gollancz, 2011".into(),
            status: "Lost".into(),
            due_back: None,
        };
        assert_eq!(copy.status(), InstanceStatus::Maintenance);
    }

    #[test]
    fn test_view_marks_available() {
        let copy = BookInstance {
            id: 3,
            book_id: 1,
            imprint: "Gollancz, 2011".into(),
            status: "Available".into(),
            due_back: NaiveDate::from_ymd_opt(2024, 5, 1),
        };
        let view = BookInstanceView::from(&copy);
        assert!(view.available);
        assert_eq!(view.due_back.as_deref(), Some("May 1, 2024"));
        assert_eq!(view.url, "/catalog/bookinstance/3");
    }
}
