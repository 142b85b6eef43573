//! Today's-devotion lookup: the total composition of date resolution and
//! catalog access.
//!
//! Every branch returns a value. Catalog failures and unscheduled dates are
//! converted into `DevotionLookup` variants here and never propagate to the
//! caller as errors.

use crate::catalog::{Catalog, CatalogError, DevotionPassage};
use crate::schedule::{self, SchedulingStatus};
use chrono::{DateTime, Local, NaiveDate};
use serde::Serialize;
use std::path::Path;

/// Result of a daily lookup.
///
/// `NoDevotionScheduled` is expected behavior (Feb 29), not a failure; a
/// valid day with nothing in the catalog is an `Error`, because the catalog
/// is supposed to cover every slot of the cycle.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DevotionLookup {
    Success {
        date: String,
        day_of_year: u16,
        passages: Vec<DevotionPassage>,
        message: String,
    },
    #[serde(rename = "no_devotion")]
    NoDevotionScheduled { date: String, message: String },
    Error {
        date: String,
        day_of_year: Option<u16>,
        message: String,
    },
}

impl DevotionLookup {
    pub fn is_error(&self) -> bool {
        matches!(self, DevotionLookup::Error { .. })
    }
}

/// Resolve `date` and fetch its scheduled passages from the catalog at
/// `path`.
pub fn retrieve_for_date(path: &Path, date: NaiveDate) -> DevotionLookup {
    let resolved = schedule::resolve(date);
    let iso_date = resolved.iso_date;
    if resolved.status == SchedulingStatus::Unscheduled {
        return DevotionLookup::NoDevotionScheduled {
            date: iso_date,
            message: "No devotion scheduled for February 29 in this 365-day schedule".to_string(),
        };
    }
    let Some(day) = resolved.day_of_year else {
        return DevotionLookup::Error {
            date: iso_date,
            day_of_year: None,
            message: "date resolved without a cycle slot".to_string(),
        };
    };
    let catalog = match Catalog::load(path) {
        Ok(catalog) => catalog,
        Err(err) => {
            tracing::warn!(day, error = %err, "catalog load failed");
            return DevotionLookup::Error {
                date: iso_date,
                day_of_year: Some(day),
                message: load_error_message(&err, path),
            };
        }
    };
    let passages = catalog.passages_for_day(day);
    if passages.is_empty() {
        return DevotionLookup::Error {
            date: iso_date,
            day_of_year: Some(day),
            message: format!("No devotions found for day {day}. The catalog may be incomplete."),
        };
    }
    DevotionLookup::Success {
        date: iso_date,
        day_of_year: day,
        message: format!(
            "Successfully retrieved {} devotion(s) for today",
            passages.len()
        ),
        passages: passages.to_vec(),
    }
}

/// Lookup for the current wall-clock day.
pub fn retrieve_today(path: &Path, now: DateTime<Local>) -> DevotionLookup {
    retrieve_for_date(path, now.date_naive())
}

/// One distinct human-readable message per failure kind, so "source
/// unreadable" never reads like "source readable but missing an entry".
fn load_error_message(err: &CatalogError, path: &Path) -> String {
    match err {
        CatalogError::EmptySourcePath => "Catalog file path cannot be empty".to_string(),
        CatalogError::NotFound { .. } => format!(
            "Catalog file not found at '{}'. Please check the file path.",
            path.display()
        ),
        CatalogError::PermissionDenied { .. } => format!(
            "Permission denied when accessing '{}'. Check file permissions.",
            path.display()
        ),
        CatalogError::Parse { detail } => format!("Catalog parsing failed: {detail}"),
    }
}
