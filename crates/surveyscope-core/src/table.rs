//! # Survey Tables
//!
//! A minimal column-addressed table: enough for cleaning uploads, locating
//! columns by header keywords, and stacking files of the same section.

use crate::Cell;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A parsed sheet: named columns over rows of cells.
///
/// Every row has exactly `headers.len()` cells.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SurveyTable {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl SurveyTable {
    /// Build a table, padding or truncating rows to the header width.
    #[must_use]
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Empty);
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Column headers in order.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// All rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the column with exactly this header.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// True when a column with exactly this header exists.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cells of the named column, top to bottom.
    pub fn column<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Cell> + 'a {
        let idx = self.column_index(name);
        self.rows
            .iter()
            .filter_map(move |row| idx.and_then(|i| row.get(i)))
    }

    /// Cell at `row` in the named column (`Empty` when absent).
    #[must_use]
    pub fn cell(&self, row: usize, name: &str) -> &Cell {
        const EMPTY: &Cell = &Cell::Empty;
        self.column_index(name)
            .and_then(|i| self.rows.get(row).and_then(|r| r.get(i)))
            .unwrap_or(EMPTY)
    }

    /// True when the named column is missing or every cell in it is blank.
    #[must_use]
    pub fn column_is_blank(&self, name: &str) -> bool {
        self.column(name).all(Cell::is_blank)
    }

    /// First header (in column order) whose lowercase form contains any of
    /// `keywords`. With `skip_internal`, headers starting with `_` are ignored.
    #[must_use]
    pub fn find_column(&self, keywords: &[&str], skip_internal: bool) -> Option<String> {
        self.headers
            .iter()
            .find(|h| {
                let lower = h.to_lowercase();
                keywords.iter().any(|k| lower.contains(k)) && !(skip_internal && h.starts_with('_'))
            })
            .cloned()
    }

    /// All headers matching any of `keywords` (internal headers skipped).
    #[must_use]
    pub fn find_columns(&self, keywords: &[&str]) -> Vec<String> {
        self.headers
            .iter()
            .filter(|h| {
                let lower = h.to_lowercase();
                !h.starts_with('_') && keywords.iter().any(|k| lower.contains(k))
            })
            .cloned()
            .collect()
    }

    /// Drop blank rows, then blank columns, and trim header names.
    ///
    /// Repeated header names get `.1`, `.2`, ... suffixes so every column
    /// stays addressable by name.
    #[must_use]
    pub fn clean(self) -> Self {
        let rows: Vec<Vec<Cell>> = self
            .rows
            .into_iter()
            .filter(|row| !row.iter().all(Cell::is_blank))
            .collect();

        let keep: Vec<usize> = (0..self.headers.len())
            .filter(|&i| rows.iter().any(|row| !row[i].is_blank()))
            .collect();

        let headers = unique_headers(keep.iter().map(|&i| self.headers[i].trim().to_string()));
        let rows = rows
            .into_iter()
            .map(|row| keep.iter().map(|&i| row[i].clone()).collect())
            .collect();

        Self { headers, rows }
    }

    /// Stack tables vertically. Headers are the union in first-seen order;
    /// cells missing from a source table are `Empty`.
    #[must_use]
    pub fn concat<'a>(tables: impl IntoIterator<Item = &'a SurveyTable>) -> Self {
        let tables: Vec<&SurveyTable> = tables.into_iter().collect();
        let mut headers: Vec<String> = Vec::new();
        for table in &tables {
            for h in &table.headers {
                if !headers.contains(h) {
                    headers.push(h.clone());
                }
            }
        }

        let mut rows = Vec::new();
        for table in &tables {
            let mapping: Vec<Option<usize>> =
                headers.iter().map(|h| table.column_index(h)).collect();
            for row in &table.rows {
                rows.push(
                    mapping
                        .iter()
                        .map(|idx| idx.map(|i| row[i].clone()).unwrap_or_default())
                        .collect(),
                );
            }
        }

        Self { headers, rows }
    }
}

fn unique_headers(names: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut headers = Vec::new();
    for name in names {
        let mut candidate = name.clone();
        let mut n = 0;
        while seen.contains(&candidate) {
            n += 1;
            candidate = format!("{}.{}", name, n);
        }
        seen.insert(candidate.clone());
        headers.push(candidate);
    }
    headers
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> Cell {
        Cell::text(s)
    }

    #[test]
    fn clean_drops_blank_rows_and_columns() {
        let table = SurveyTable::new(
            vec![" Theme ".into(), "Unused".into(), "Score".into()],
            vec![
                vec![t("Growth"), Cell::Empty, Cell::Number(4.0)],
                vec![Cell::Empty, t("  "), Cell::Empty],
                vec![t("Culture"), Cell::Empty, t("3.5")],
            ],
        )
        .clean();

        assert_eq!(table.headers(), &["Theme".to_string(), "Score".to_string()]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(1, "Score").as_number(), Some(3.5));
    }

    #[test]
    fn clean_suffixes_repeated_headers() {
        let table = SurveyTable::new(
            vec!["Score".into(), " Score".into(), "Score.1".into(), "Theme".into()],
            vec![vec![Cell::Number(4.0), Cell::Number(2.0), Cell::Number(1.0), t("Growth")]],
        )
        .clean();

        assert_eq!(
            table.headers(),
            &["Score", "Score.1", "Score.1.1", "Theme"].map(String::from)
        );
        assert_eq!(table.cell(0, "Score").as_number(), Some(4.0));
        assert_eq!(table.cell(0, "Score.1").as_number(), Some(2.0));
        assert_eq!(table.cell(0, "Score.1.1").as_number(), Some(1.0));
        assert_eq!(table.find_columns(&["score"]).len(), 3);
    }

    #[test]
    fn rows_are_padded_to_header_width() {
        let table = SurveyTable::new(vec!["A".into(), "B".into()], vec![vec![t("x")]]);
        assert_eq!(table.rows()[0].len(), 2);
        assert!(table.cell(0, "B").is_blank());
        assert!(table.cell(5, "A").is_blank());
    }

    #[test]
    fn find_column_respects_order_and_internal_prefix() {
        let table = SurveyTable::new(
            vec!["_score_raw".into(), "Rating".into(), "Score".into()],
            Vec::new(),
        );
        assert_eq!(
            table.find_column(&["score", "rating"], true).as_deref(),
            Some("Rating")
        );
        assert_eq!(
            table.find_column(&["score", "rating"], false).as_deref(),
            Some("_score_raw")
        );
        assert_eq!(table.find_column(&["comment"], true), None);
    }

    #[test]
    fn concat_unions_headers() {
        let a = SurveyTable::new(
            vec!["Theme".into(), "Score".into()],
            vec![vec![t("Growth"), Cell::Number(4.0)]],
        );
        let b = SurveyTable::new(
            vec!["Score".into(), "Note".into()],
            vec![vec![Cell::Number(2.0), t("late")]],
        );

        let c = SurveyTable::concat([&a, &b]);
        assert_eq!(c.headers().len(), 3);
        assert_eq!(c.len(), 2);
        assert!(c.cell(1, "Theme").is_blank());
        assert_eq!(c.cell(1, "Score").as_number(), Some(2.0));
        assert!(c.cell(0, "Note").is_blank());
    }

    #[test]
    fn column_blankness() {
        let table = SurveyTable::new(
            vec!["Comment".into()],
            vec![vec![Cell::Empty], vec![t(" ")]],
        );
        assert!(table.column_is_blank("Comment"));
        assert!(table.column_is_blank("Missing"));
    }
}
