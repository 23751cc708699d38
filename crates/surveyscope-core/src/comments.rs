//! # Comments Extraction
//!
//! Two layouts are recognized. Row-based: one comment per row, with the
//! affirmation and theme it refers to. Column-based: free text spread over
//! one or more comment-like columns. The row-based layout wins when both
//! apply.

use crate::primitives::{
    COMMENT_COLUMN_KEYWORDS, FALLBACK_COMMENT_COLUMN_KEYWORDS, NON_COMMENT_COLUMNS, NOT_SPECIFIED,
    QUESTION_COLUMN_KEYWORDS, THEME_COLUMN_KEYWORDS,
};
use crate::SurveyTable;
use serde::{Deserialize, Serialize};

/// A comment with the affirmation and theme it answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    /// Affirmation text, or "Not specified".
    pub affirmation: String,
    /// Theme label, or "Not specified".
    pub theme: String,
    /// Trimmed comment text.
    pub comment: String,
}

/// Row-based comment records plus the columns they were read from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommentsExtraction {
    pub records: Vec<CommentRecord>,
    pub question_column: Option<String>,
    pub theme_column: Option<String>,
    pub comment_column: Option<String>,
}

impl CommentsExtraction {
    /// The comment texts, in row order.
    #[must_use]
    pub fn comments(&self) -> Vec<String> {
        self.records.iter().map(|r| r.comment.clone()).collect()
    }
}

/// Read row-based comments. Produces no records when the comment column is
/// missing or entirely blank.
#[must_use]
pub fn analyze_comments(table: &SurveyTable) -> CommentsExtraction {
    let question_column = table.find_column(QUESTION_COLUMN_KEYWORDS, false);
    let theme_column = table.find_column(THEME_COLUMN_KEYWORDS, false);
    let comment_column = table.find_column(COMMENT_COLUMN_KEYWORDS, true);

    let mut records = Vec::new();
    if let Some(c_col) = comment_column.as_deref().filter(|c| !table.column_is_blank(c)) {
        let text_or_default = |row: usize, col: Option<&str>| {
            col.and_then(|c| table.cell(row, c).non_blank())
                .unwrap_or_else(|| NOT_SPECIFIED.to_string())
        };
        for i in 0..table.len() {
            let Some(comment) = table.cell(i, c_col).non_blank() else {
                continue;
            };
            records.push(CommentRecord {
                affirmation: text_or_default(i, question_column.as_deref()),
                theme: text_or_default(i, theme_column.as_deref()),
                comment,
            });
        }
    }

    CommentsExtraction {
        records,
        question_column,
        theme_column,
        comment_column,
    }
}

/// Columns used by the column-based layout.
///
/// Keyword-matched columns first; failing that, every text column except
/// identifying ones like `team`, `name` and `id`.
#[must_use]
pub fn fallback_comment_columns(table: &SurveyTable) -> Vec<String> {
    let by_keyword = table.find_columns(FALLBACK_COMMENT_COLUMN_KEYWORDS);
    if !by_keyword.is_empty() {
        return by_keyword;
    }

    table
        .headers()
        .iter()
        .filter(|h| !h.starts_with('_'))
        .filter(|h| !NON_COMMENT_COLUMNS.contains(&h.to_lowercase().as_str()))
        .filter(|h| table.column(h).any(|c| c.is_text()))
        .cloned()
        .collect()
}

/// Non-blank cells of the column-based layout, column by column.
#[must_use]
pub fn fallback_comments(table: &SurveyTable) -> Vec<String> {
    fallback_comment_columns(table)
        .iter()
        .flat_map(|col| table.column(col).filter_map(|c| c.non_blank()))
        .collect()
}

/// Comments grouped by theme, themes in first-seen order.
#[must_use]
pub fn comments_by_theme(records: &[CommentRecord]) -> Vec<(String, Vec<String>)> {
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();
    for record in records {
        match groups.iter_mut().find(|(theme, _)| *theme == record.theme) {
            Some((_, comments)) => comments.push(record.comment.clone()),
            None => groups.push((record.theme.clone(), vec![record.comment.clone()])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Cell;

    fn t(s: &str) -> Cell {
        Cell::text(s)
    }

    #[test]
    fn row_based_comments() {
        let table = SurveyTable::new(
            vec!["Statement".into(), "Theme".into(), "Comment".into()],
            vec![
                vec![t("Goals are clear"), t("Vision"), t("  Great roadmap  ")],
                vec![t("Tools work"), Cell::Empty, t("Laptops are slow")],
                vec![Cell::Empty, t("Vision"), Cell::Empty],
                vec![Cell::Empty, t("Vision"), t("Need more updates")],
            ],
        );
        let extraction = analyze_comments(&table);
        assert_eq!(extraction.comment_column.as_deref(), Some("Comment"));
        assert_eq!(extraction.records.len(), 3);
        assert_eq!(extraction.records[0].comment, "Great roadmap");
        assert_eq!(extraction.records[1].theme, NOT_SPECIFIED);
        assert_eq!(extraction.records[2].affirmation, NOT_SPECIFIED);

        let grouped = comments_by_theme(&extraction.records);
        assert_eq!(grouped[0].0, "Vision");
        assert_eq!(grouped[0].1.len(), 2);
        assert_eq!(grouped[1].0, NOT_SPECIFIED);
    }

    #[test]
    fn blank_comment_column_yields_no_records() {
        let table = SurveyTable::new(
            vec!["Question".into(), "Feedback".into()],
            vec![vec![t("Q1"), Cell::Empty]],
        );
        let extraction = analyze_comments(&table);
        assert_eq!(extraction.comment_column.as_deref(), Some("Feedback"));
        assert!(extraction.records.is_empty());
    }

    #[test]
    fn fallback_uses_keyword_columns() {
        let table = SurveyTable::new(
            vec!["Team".into(), "Notes".into(), "Open Feedback".into()],
            vec![
                vec![t("Build"), t("note one"), t("fb one")],
                vec![t("Build"), Cell::Empty, t("fb two")],
            ],
        );
        assert_eq!(
            fallback_comment_columns(&table),
            vec!["Notes".to_string(), "Open Feedback".to_string()]
        );
        assert_eq!(fallback_comments(&table), vec!["note one", "fb one", "fb two"]);
    }

    #[test]
    fn fallback_uses_text_columns_without_keywords() {
        let table = SurveyTable::new(
            vec!["Name".into(), "Thoughts".into(), "Rating".into(), "_source".into()],
            vec![vec![t("Ana"), t("Love it"), Cell::Number(5.0), t("a.csv")]],
        );
        assert_eq!(fallback_comment_columns(&table), vec!["Thoughts".to_string()]);
    }
}
