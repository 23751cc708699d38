//! # Core Type Definitions
//!
//! This module contains the shared vocabulary of the survey engine:
//! - Content categories (`Section`)
//! - Spreadsheet cell values (`Cell`)
//! - Error types (`SurveyError`)
//!
//! Every other module speaks in these types, so they carry no behavior beyond
//! coercion and display.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// SECTION
// =============================================================================

/// Content category of an uploaded file, derived from its filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    /// Per-theme scores.
    Themes,
    /// One row per question/affirmation with theme and score.
    Questions,
    /// Free-text feedback.
    Comments,
    /// No category keyword in the filename. Never stored.
    General,
}

impl Section {
    /// Sections that are stored and analyzed, in display order.
    pub const ANALYZED: [Section; 3] = [Section::Themes, Section::Questions, Section::Comments];

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Themes => "Themes",
            Self::Questions => "Questions",
            Self::Comments => "Comments",
            Self::General => "General",
        }
    }

    /// Parse a section from user input (`themes`, `Questions`, ...).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "themes" | "theme" => Some(Self::Themes),
            "questions" | "question" => Some(Self::Questions),
            "comments" | "comment" => Some(Self::Comments),
            _ => None,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// CELL
// =============================================================================

/// A single spreadsheet cell after parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Cell {
    /// Missing value.
    #[default]
    Empty,
    /// Numeric value.
    Number(f64),
    /// Boolean value.
    Bool(bool),
    /// Free text.
    Text(String),
}

impl Cell {
    /// Build a cell from raw text. Empty strings become `Cell::Empty`.
    #[must_use]
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.is_empty() {
            Self::Empty
        } else {
            Self::Text(s)
        }
    }

    /// True for missing values and whitespace-only text.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::Number(_) | Self::Bool(_) => false,
        }
    }

    /// True when the cell holds text (the column type used by comment fallbacks).
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Numeric coercion: numbers pass through, text is trimmed and parsed,
    /// anything else (or a non-finite parse) yields `None`.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// Text rendering of the cell. Blank cells render as an empty string.
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Number(n) => format_number(*n),
            Self::Bool(b) => if *b { "True" } else { "False" }.to_string(),
            Self::Text(s) => s.clone(),
        }
    }

    /// Trimmed text, or `None` for blank cells.
    #[must_use]
    pub fn non_blank(&self) -> Option<String> {
        if self.is_blank() {
            None
        } else {
            Some(self.display().trim().to_string())
        }
    }
}

/// Render a number the way survey exports show it: integral values keep one
/// decimal (`5.0`), everything else uses the shortest exact representation.
#[must_use]
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 {
        format!("{:.1}", n)
    } else {
        format!("{}", n)
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the survey engine.
///
/// Ingestion catches these per file and turns them into warnings; everything
/// else propagates them with `?`.
#[derive(Debug, Error)]
pub enum SurveyError {
    /// The file could not be interpreted as survey data.
    #[error("Invalid file: {0}")]
    InvalidFile(String),

    /// The file extension is not a supported spreadsheet format.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// The spreadsheet reader rejected the workbook.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// The CSV reader rejected the file.
    #[error("CSV error: {0}")]
    Csv(String),

    /// PDF rendering failed.
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Configuration is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The named team is not part of the team directory.
    #[error("Unknown team: {0}")]
    UnknownTeam(String),

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_coercion() {
        assert_eq!(Cell::Number(4.5).as_number(), Some(4.5));
        assert_eq!(Cell::text(" 3.25 ").as_number(), Some(3.25));
        assert_eq!(Cell::text("n/a").as_number(), None);
        assert_eq!(Cell::Bool(true).as_number(), None);
        assert_eq!(Cell::Empty.as_number(), None);
        assert_eq!(Cell::Number(f64::NAN).as_number(), None);
    }

    #[test]
    fn blank_detection() {
        assert!(Cell::Empty.is_blank());
        assert!(Cell::text("   ").is_blank());
        assert!(!Cell::Number(0.0).is_blank());
        assert_eq!(Cell::text(""), Cell::Empty);
    }

    #[test]
    fn number_formatting() {
        assert_eq!(format_number(5.0), "5.0");
        assert_eq!(format_number(4.25), "4.25");
        assert_eq!(Cell::Number(3.0).display(), "3.0");
    }

    #[test]
    fn section_parsing() {
        assert_eq!(Section::parse("Themes"), Some(Section::Themes));
        assert_eq!(Section::parse(" comment "), Some(Section::Comments));
        assert_eq!(Section::parse("general"), None);
        assert_eq!(Section::Questions.to_string(), "Questions");
    }
}
