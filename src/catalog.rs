//! Passage catalog loading and formatting.
//!
//! The catalog is a static JSON schedule mapping each day of a 365-day cycle
//! to an ordered list of scripture passages. It is parsed once at startup and
//! read-only afterwards; day 366 never exists, callers normalize leap dates
//! before lookup (see `schedule`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use thiserror::Error;

/// Number of slots in the devotional cycle. Feb 29 has no slot.
pub const CYCLE_DAYS: u16 = 365;

/// Category of a scheduled passage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PassageKind {
    Psalm,
    #[serde(alias = "Old Testament")]
    OldTestament,
    #[serde(alias = "New Testament")]
    NewTestament,
    Proverbs,
}

impl PassageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PassageKind::Psalm => "Psalm",
            PassageKind::OldTestament => "Old Testament",
            PassageKind::NewTestament => "New Testament",
            PassageKind::Proverbs => "Proverbs",
        }
    }
}

impl fmt::Display for PassageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scheduled reading. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevotionPassage {
    pub book: String,
    pub start_chapter: u32,
    pub start_verse: u32,
    pub end_chapter: u32,
    pub end_verse: u32,
    #[serde(rename = "type")]
    pub kind: PassageKind,
    pub order: u32,
}

/// Why a catalog could not be loaded.
///
/// These are recoverable: the lookup boundary converts each kind into a
/// status value instead of propagating a hard failure.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog source path is empty")]
    EmptySourcePath,
    #[error("catalog file not found at '{path}'")]
    NotFound { path: String },
    #[error("permission denied reading '{path}'")]
    PermissionDenied { path: String },
    #[error("catalog parse failed: {detail}")]
    Parse { detail: String },
}

/// Raw day-entry as it appears in the catalog source.
#[derive(Debug, Deserialize)]
struct CatalogEntry {
    day: u16,
    book: String,
    start_chapter: u32,
    start_verse: u32,
    end_chapter: u32,
    end_verse: u32,
    #[serde(rename = "type")]
    kind: PassageKind,
    order: u32,
}

/// Day-of-year to ordered passages, built once from a JSON source.
#[derive(Debug, Default)]
pub struct Catalog {
    days: BTreeMap<u16, Vec<DevotionPassage>>,
}

impl Catalog {
    /// Load and index a catalog from a JSON file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        if path.as_os_str().is_empty() {
            return Err(CatalogError::EmptySourcePath);
        }
        let bytes = fs::read(path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => CatalogError::NotFound {
                path: path.display().to_string(),
            },
            ErrorKind::PermissionDenied => CatalogError::PermissionDenied {
                path: path.display().to_string(),
            },
            _ => CatalogError::Parse {
                detail: format!("read '{}': {err}", path.display()),
            },
        })?;
        let entries: Vec<CatalogEntry> =
            serde_json::from_slice(&bytes).map_err(|err| CatalogError::Parse {
                detail: err.to_string(),
            })?;
        let catalog = Self::from_entries(entries)?;
        tracing::debug!(days = catalog.days.len(), "catalog loaded");
        Ok(catalog)
    }

    fn from_entries(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        let mut days: BTreeMap<u16, Vec<DevotionPassage>> = BTreeMap::new();
        for (index, entry) in entries.into_iter().enumerate() {
            if entry.day == 0 || entry.day > CYCLE_DAYS {
                return Err(CatalogError::Parse {
                    detail: format!(
                        "entry {index}: day {} outside 1..={CYCLE_DAYS}",
                        entry.day
                    ),
                });
            }
            let ordered_range = entry.end_chapter > entry.start_chapter
                || (entry.end_chapter == entry.start_chapter
                    && entry.end_verse >= entry.start_verse);
            if !ordered_range {
                return Err(CatalogError::Parse {
                    detail: format!(
                        "entry {index}: range {}:{} - {}:{} ends before it starts",
                        entry.start_chapter, entry.start_verse, entry.end_chapter, entry.end_verse
                    ),
                });
            }
            days.entry(entry.day).or_default().push(DevotionPassage {
                book: entry.book,
                start_chapter: entry.start_chapter,
                start_verse: entry.start_verse,
                end_chapter: entry.end_chapter,
                end_verse: entry.end_verse,
                kind: entry.kind,
                order: entry.order,
            });
        }
        for passages in days.values_mut() {
            // Stable sort: entries sharing an order keep declaration order.
            passages.sort_by_key(|passage| passage.order);
        }
        Ok(Self { days })
    }

    /// Ordered passages scheduled for a day in [1,365].
    ///
    /// An empty slice is a valid state (a day with nothing scheduled) and is
    /// distinct from a load error.
    pub fn passages_for_day(&self, day: u16) -> &[DevotionPassage] {
        self.days.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Render a passage reference, collapsing the chapter when the range stays
/// within one.
pub fn format_passage(passage: &DevotionPassage) -> String {
    if passage.start_chapter == passage.end_chapter {
        format!(
            "{} {}:{}-{}",
            passage.book, passage.start_chapter, passage.start_verse, passage.end_verse
        )
    } else {
        format!(
            "{} {}:{} - {}:{}",
            passage.book,
            passage.start_chapter,
            passage.start_verse,
            passage.end_chapter,
            passage.end_verse
        )
    }
}

/// Render the full reading list grouped by category, used as prompt input
/// for the summary stage.
pub fn format_passage_list(passages: &[DevotionPassage]) -> String {
    if passages.is_empty() {
        return "No devotions found.".to_string();
    }
    let mut text = String::from("Today's Devotion Passages:\n");
    for passage in passages {
        text.push_str(&format!("\n{}: {}\n", passage.kind, format_passage(passage)));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(day: u16, order: u32, book: &str) -> String {
        format!(
            r#"{{"day":{day},"book":"{book}","start_chapter":1,"start_verse":1,"end_chapter":1,"end_verse":5,"type":"Psalm","order":{order}}}"#
        )
    }

    fn load_entries(entries: &[String]) -> Result<Catalog, CatalogError> {
        let json = format!("[{}]", entries.join(","));
        let parsed: Vec<CatalogEntry> = serde_json::from_str(&json).expect("parse test entries");
        Catalog::from_entries(parsed)
    }

    #[test]
    fn passages_sort_by_order_with_stable_ties() {
        let catalog = load_entries(&[
            entry(1, 2, "Second"),
            entry(1, 1, "FirstA"),
            entry(1, 1, "FirstB"),
        ])
        .expect("valid catalog");
        let books: Vec<&str> = catalog
            .passages_for_day(1)
            .iter()
            .map(|p| p.book.as_str())
            .collect();
        assert_eq!(books, ["FirstA", "FirstB", "Second"]);
    }

    #[test]
    fn day_outside_cycle_is_a_parse_error() {
        for day in [0, 366] {
            let err = load_entries(&[entry(day, 1, "Psalm")]).expect_err("day must be rejected");
            assert!(matches!(err, CatalogError::Parse { .. }), "day {day}: {err}");
        }
    }

    #[test]
    fn inverted_verse_range_is_a_parse_error() {
        let json = r#"[{"day":1,"book":"Psalm","start_chapter":3,"start_verse":4,"end_chapter":3,"end_verse":2,"type":"Psalm","order":1}]"#;
        let parsed: Vec<CatalogEntry> = serde_json::from_str(json).expect("parse test entry");
        let err = Catalog::from_entries(parsed).expect_err("range must be rejected");
        assert!(matches!(err, CatalogError::Parse { .. }));
    }

    #[test]
    fn range_crossing_chapters_is_valid() {
        let json = r#"[{"day":1,"book":"Genesis","start_chapter":2,"start_verse":10,"end_chapter":3,"end_verse":1,"type":"OldTestament","order":1}]"#;
        let parsed: Vec<CatalogEntry> = serde_json::from_str(json).expect("parse test entry");
        assert!(Catalog::from_entries(parsed).is_ok());
    }

    #[test]
    fn kind_accepts_spaced_spellings() {
        let kind: PassageKind = serde_json::from_str(r#""Old Testament""#).expect("parse alias");
        assert_eq!(kind, PassageKind::OldTestament);
        let kind: PassageKind = serde_json::from_str(r#""NewTestament""#).expect("parse plain");
        assert_eq!(kind, PassageKind::NewTestament);
    }

    #[test]
    fn unscheduled_day_yields_empty_slice() {
        let catalog = load_entries(&[entry(10, 1, "Psalm")]).expect("valid catalog");
        assert!(catalog.passages_for_day(11).is_empty());
    }

    #[test]
    fn missing_file_classifies_as_not_found() {
        let err = Catalog::load(Path::new("/definitely/not/here.json"))
            .expect_err("load must fail");
        assert!(matches!(err, CatalogError::NotFound { .. }));
    }

    #[test]
    fn empty_path_classifies_as_empty_source() {
        let err = Catalog::load(Path::new("")).expect_err("load must fail");
        assert!(matches!(err, CatalogError::EmptySourcePath));
    }

    #[test]
    fn format_collapses_single_chapter_ranges() {
        let passage = DevotionPassage {
            book: "Psalm".to_string(),
            start_chapter: 23,
            start_verse: 1,
            end_chapter: 23,
            end_verse: 6,
            kind: PassageKind::Psalm,
            order: 1,
        };
        assert_eq!(format_passage(&passage), "Psalm 23:1-6");
    }

    #[test]
    fn format_spells_out_multi_chapter_ranges() {
        let passage = DevotionPassage {
            book: "Genesis".to_string(),
            start_chapter: 1,
            start_verse: 1,
            end_chapter: 2,
            end_verse: 25,
            kind: PassageKind::OldTestament,
            order: 1,
        };
        assert_eq!(format_passage(&passage), "Genesis 1:1 - 2:25");
    }

    #[test]
    fn passage_list_groups_by_category() {
        let catalog = load_entries(&[entry(1, 1, "Psalm")]).expect("valid catalog");
        let text = format_passage_list(catalog.passages_for_day(1));
        assert!(text.starts_with("Today's Devotion Passages:"));
        assert!(text.contains("Psalm: Psalm 1:1-5"));
    }

    #[test]
    fn empty_passage_list_renders_fallback() {
        assert_eq!(format_passage_list(&[]), "No devotions found.");
    }
}
