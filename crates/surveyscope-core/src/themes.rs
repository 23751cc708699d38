//! # Themes Analysis
//!
//! Per-theme score aggregation: group valid rows by theme, average the
//! numeric scores, rank.

use crate::primitives::{
    SCORE_COLUMN_KEYWORDS, THEME_COLUMN_KEYWORDS, THEME_TABLE_ROWS, TOP_THEME_BARS,
};
use crate::stats::round_to;
use crate::{Cell, SurveyTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Column header used by themes exports.
pub const THEME_COLUMN: &str = "Theme";

/// Column header used by themes exports.
pub const SCORE_COLUMN: &str = "Score";

/// Average score of one theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeScore {
    /// Theme label.
    pub theme: String,
    /// Mean score, rounded to two places.
    pub mean: f64,
    /// Number of valid responses.
    pub count: usize,
}

/// One row of the themes overview table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeRow {
    /// Theme label.
    pub theme: String,
    /// Numeric score when coercible, otherwise the raw text (blank when absent).
    pub score: Option<Cell>,
}

/// Result of analyzing a themes table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ThemesAnalysis {
    /// First rows of the table with display scores.
    pub rows: Vec<ThemeRow>,
    /// Highest average scores, for the bar chart.
    pub top_scores: Vec<ThemeScore>,
    /// True when the table has no `Theme` column.
    pub missing_theme_column: bool,
}

/// Build the themes overview for a (possibly multi-file) themes table.
///
/// Uses the literal `Theme` and `Score` headers.
#[must_use]
pub fn analyze_themes(table: &SurveyTable) -> ThemesAnalysis {
    if !table.has_column(THEME_COLUMN) {
        return ThemesAnalysis {
            missing_theme_column: true,
            ..ThemesAnalysis::default()
        };
    }
    let has_score = table.has_column(SCORE_COLUMN);

    let rows = (0..table.len())
        .filter_map(|i| {
            let theme = table.cell(i, THEME_COLUMN).non_blank()?;
            let score = has_score.then(|| {
                let raw = table.cell(i, SCORE_COLUMN);
                raw.as_number().map_or_else(|| raw.clone(), Cell::Number)
            });
            Some(ThemeRow { theme, score })
        })
        .take(THEME_TABLE_ROWS)
        .collect();

    let top_scores = if has_score {
        let mut scores = group_scores(table, THEME_COLUMN, SCORE_COLUMN);
        scores.truncate(TOP_THEME_BARS);
        scores
    } else {
        Vec::new()
    };

    ThemesAnalysis {
        rows,
        top_scores,
        missing_theme_column: false,
    }
}

/// Average score per theme using keyword-detected columns, best first.
///
/// Returns an empty list when either column cannot be found.
#[must_use]
pub fn theme_score_summary(table: &SurveyTable) -> Vec<ThemeScore> {
    let theme_col = table.find_column(THEME_COLUMN_KEYWORDS, false);
    let score_col = table.find_column(SCORE_COLUMN_KEYWORDS, true);
    match (theme_col, score_col) {
        (Some(theme), Some(score)) => group_scores(table, &theme, &score),
        _ => Vec::new(),
    }
}

/// Number of rows with both a theme and a numeric score.
#[must_use]
pub fn valid_response_count(scores: &[ThemeScore]) -> usize {
    scores.iter().map(|s| s.count).sum()
}

/// Group rows with a non-blank theme and numeric score; mean per theme,
/// sorted by mean descending. Ties keep alphabetical theme order.
fn group_scores(table: &SurveyTable, theme_col: &str, score_col: &str) -> Vec<ThemeScore> {
    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for i in 0..table.len() {
        let Some(score) = table.cell(i, score_col).as_number() else {
            continue;
        };
        let Some(theme) = table.cell(i, theme_col).non_blank() else {
            continue;
        };
        groups.entry(theme).or_default().push(score);
    }

    let mut scores: Vec<ThemeScore> = groups
        .into_iter()
        .map(|(theme, values)| ThemeScore {
            theme,
            mean: round_to(values.iter().sum::<f64>() / values.len() as f64, 2),
            count: values.len(),
        })
        .collect();
    scores.sort_by(|a, b| b.mean.total_cmp(&a.mean));
    scores
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn themes_table() -> SurveyTable {
        SurveyTable::new(
            vec!["Theme".into(), "Score".into()],
            vec![
                vec![Cell::text("Growth"), Cell::Number(4.0)],
                vec![Cell::text("Culture"), Cell::text("3.5")],
                vec![Cell::text("Growth"), Cell::Number(5.0)],
                vec![Cell::text("Vision"), Cell::text("n/a")],
                vec![Cell::Empty, Cell::Number(1.0)],
            ],
        )
    }

    #[test]
    fn groups_and_ranks() {
        let summary = theme_score_summary(&themes_table());
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].theme, "Growth");
        assert_eq!(summary[0].mean, 4.5);
        assert_eq!(summary[0].count, 2);
        assert_eq!(summary[1].theme, "Culture");
        assert_eq!(valid_response_count(&summary), 3);
    }

    #[test]
    fn overview_rows_keep_raw_scores() {
        let analysis = analyze_themes(&themes_table());
        assert!(!analysis.missing_theme_column);
        assert_eq!(analysis.rows.len(), 4);
        assert_eq!(analysis.rows[1].score, Some(Cell::Number(3.5)));
        assert_eq!(analysis.rows[3].score, Some(Cell::text("n/a")));
        assert_eq!(analysis.top_scores[0].theme, "Growth");
    }

    #[test]
    fn missing_theme_column_is_flagged() {
        let table = SurveyTable::new(vec!["Topic".into()], vec![vec![Cell::text("x")]]);
        assert!(analyze_themes(&table).missing_theme_column);
    }

    #[test]
    fn ties_keep_alphabetical_order() {
        let table = SurveyTable::new(
            vec!["Category".into(), "Rating".into()],
            vec![
                vec![Cell::text("Zeta"), Cell::Number(3.0)],
                vec![Cell::text("Alpha"), Cell::Number(3.0)],
            ],
        );
        let summary = theme_score_summary(&table);
        assert_eq!(summary[0].theme, "Alpha");
        assert_eq!(summary[1].theme, "Zeta");
    }
}
