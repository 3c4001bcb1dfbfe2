//! Document-level types.

use super::Section;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Where a metadata field's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldOrigin {
    /// No value was found
    #[default]
    Missing,
    /// Regex/heuristic extraction
    Pattern,
    /// Supplied by the language-model collaborator
    Assisted,
}

/// Per-field provenance of the bibliographic fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOrigins {
    pub title: FieldOrigin,
    pub authors: FieldOrigin,
    pub abstract_text: FieldOrigin,
    pub keywords: FieldOrigin,
}

/// Structured record extracted from one academic paper.
///
/// Built once per parse and not mutated afterwards. Every field is
/// best-effort: a field that could not be found is empty, never an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// Paper title
    pub title: String,

    /// Author names in document order (at most 10)
    pub authors: Vec<String>,

    /// Abstract, collapsed to a single line (at most 2000 chars)
    #[serde(rename = "abstract")]
    pub abstract_text: String,

    /// Keywords in document order
    pub keywords: Vec<String>,

    /// Sections in document order
    pub sections: Vec<Section>,

    /// Publication date literal as it appeared in the text
    pub publish_date: String,

    /// Venue (journal, proceedings, conference)
    pub source: String,

    /// Provenance of title/authors/abstract/keywords
    #[serde(default)]
    pub origins: FieldOrigins,
}

impl ParsedDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether nothing at all was extracted.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
            && self.authors.is_empty()
            && self.abstract_text.is_empty()
            && self.keywords.is_empty()
            && self.sections.is_empty()
            && self.publish_date.is_empty()
            && self.source.is_empty()
    }

    /// Look up a section by canonical number.
    pub fn section(&self, number: &str) -> Option<&Section> {
        self.sections
            .iter()
            .find(|s| s.number_str() == Some(number))
    }

    /// Direct children of the section numbered `number`.
    pub fn children_of<'a>(&'a self, number: &'a str) -> impl Iterator<Item = &'a Section> + 'a {
        self.sections
            .iter()
            .filter(move |s| s.parent_str() == Some(number))
    }

    /// Top-level sections (no parent).
    pub fn root_sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(|s| s.parent.is_none())
    }

    /// Publication date parsed into a calendar date, when the literal is
    /// one of the recognized shapes.
    pub fn publish_date_parsed(&self) -> Option<NaiveDate> {
        parse_date_literal(&self.publish_date)
    }
}

/// Parse a date literal produced by the metadata extractor.
pub(crate) fn parse_date_literal(literal: &str) -> Option<NaiveDate> {
    let s = literal.trim();
    if s.is_empty() {
        return None;
    }

    // 2024年1月15日
    if s.contains('年') {
        let digits: Vec<u32> = s
            .split(|c: char| !c.is_ascii_digit())
            .filter(|p| !p.is_empty())
            .filter_map(|p| p.parse().ok())
            .collect();
        if let [year, month, day] = digits[..] {
            return NaiveDate::from_ymd_opt(year as i32, month, day);
        }
        return None;
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    // English month names: "January 5, 2023", "Jan. 5 2023"
    let normalized = s.replace(['.', ','], " ");
    let parts: Vec<&str> = normalized.split_whitespace().collect();
    if let [month, day, year] = parts[..] {
        let month = month_number(month)?;
        let day: u32 = day.parse().ok()?;
        let year: i32 = year.parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    None
}

fn month_number(name: &str) -> Option<u32> {
    let prefix: String = name.chars().take(3).collect::<String>().to_lowercase();
    let month = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}
