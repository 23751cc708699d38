//! # Questions Analysis
//!
//! Row-per-question tables: each row is an affirmation with an optional
//! theme and score. Columns are located by header keywords.

use crate::primitives::{
    HIGH_SCORE_THRESHOLD, LOW_SCORE_THRESHOLD, NO_SCORE, NOT_SPECIFIED, QUESTION_COLUMN_KEYWORDS,
    SCORE_COLUMN_KEYWORDS, THEME_COLUMN_KEYWORDS,
};
use crate::stats::round_to;
use crate::SurveyTable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// =============================================================================
// RECORDS
// =============================================================================

/// Score of a single question as shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ScoreValue {
    /// Numeric score, displayed with two decimals.
    Numeric(f64),
    /// Non-numeric score text, displayed verbatim.
    Raw(String),
    /// No score recorded.
    Missing,
}

impl ScoreValue {
    /// The numeric value as displayed (two decimals), if any.
    #[must_use]
    pub fn numeric(&self) -> Option<f64> {
        match self {
            Self::Numeric(n) => Some(round_to(*n, 2)),
            Self::Raw(_) | Self::Missing => None,
        }
    }
}

impl fmt::Display for ScoreValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{:.2}", n),
            Self::Raw(s) => f.write_str(s),
            Self::Missing => f.write_str(NO_SCORE),
        }
    }
}

/// Visual band of a question score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    /// Score ≥ 4.0.
    High,
    /// Score ≤ 2.5.
    Low,
    /// Anything else, including non-numeric scores.
    Neutral,
}

impl ScoreBand {
    /// Band for an optional numeric score.
    #[must_use]
    pub fn of(score: Option<f64>) -> Self {
        match score {
            Some(s) if s >= HIGH_SCORE_THRESHOLD => Self::High,
            Some(s) if s <= LOW_SCORE_THRESHOLD => Self::Low,
            _ => Self::Neutral,
        }
    }
}

/// One affirmation with its theme and score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// The question or affirmation text (trimmed).
    pub affirmation: String,
    /// Theme, or "Not specified".
    pub theme: String,
    /// Score as displayed.
    pub score: ScoreValue,
}

impl QuestionRecord {
    /// Display band for this record.
    #[must_use]
    pub fn band(&self) -> ScoreBand {
        ScoreBand::of(self.score.numeric())
    }
}

// =============================================================================
// ANALYSIS
// =============================================================================

/// Detected structure and extracted records of a questions table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuestionsAnalysis {
    /// Extracted records in row order.
    pub records: Vec<QuestionRecord>,
    /// Detected question column.
    pub question_column: Option<String>,
    /// Detected theme column.
    pub theme_column: Option<String>,
    /// Detected score column.
    pub score_column: Option<String>,
    /// Non-internal headers, shown when nothing could be extracted.
    pub available_columns: Vec<String>,
}

impl QuestionsAnalysis {
    /// Distinct specified themes, sorted.
    #[must_use]
    pub fn themes(&self) -> Vec<String> {
        self.records
            .iter()
            .filter(|r| r.theme != NOT_SPECIFIED)
            .map(|r| r.theme.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Records belonging to one theme.
    #[must_use]
    pub fn filter_theme(&self, theme: &str) -> Vec<QuestionRecord> {
        self.records
            .iter()
            .filter(|r| r.theme == theme)
            .cloned()
            .collect()
    }

    /// Records sorted alphabetically by affirmation (stable).
    #[must_use]
    pub fn sorted_by_affirmation(records: &[QuestionRecord]) -> Vec<QuestionRecord> {
        let mut sorted = records.to_vec();
        sorted.sort_by(|a, b| a.affirmation.cmp(&b.affirmation));
        sorted
    }

    /// Consecutive runs of the same theme in `records`, as (theme, records).
    ///
    /// Feed this the affirmation-sorted list to get the card grouping.
    #[must_use]
    pub fn grouped_by_theme(records: &[QuestionRecord]) -> Vec<(String, Vec<QuestionRecord>)> {
        let mut groups: Vec<(String, Vec<QuestionRecord>)> = Vec::new();
        for record in records {
            match groups.last_mut() {
                Some((theme, items)) if *theme == record.theme => items.push(record.clone()),
                _ => groups.push((record.theme.clone(), vec![record.clone()])),
            }
        }
        groups
    }
}

/// Extract question records from a questions table.
#[must_use]
pub fn analyze_questions(table: &SurveyTable) -> QuestionsAnalysis {
    let question_column = table.find_column(QUESTION_COLUMN_KEYWORDS, false);
    let theme_column = table.find_column(THEME_COLUMN_KEYWORDS, false);
    let score_column = table.find_column(SCORE_COLUMN_KEYWORDS, true);

    let mut records = Vec::new();
    if let Some(q_col) = question_column.as_deref().filter(|c| !table.column_is_blank(c)) {
        for i in 0..table.len() {
            let Some(affirmation) = table.cell(i, q_col).non_blank() else {
                continue;
            };
            let theme = theme_column
                .as_deref()
                .and_then(|c| table.cell(i, c).non_blank())
                .unwrap_or_else(|| NOT_SPECIFIED.to_string());
            let score = score_column
                .as_deref()
                .map(|c| table.cell(i, c))
                .filter(|c| !c.is_blank())
                .map_or(ScoreValue::Missing, |cell| match cell.as_number() {
                    Some(n) => ScoreValue::Numeric(n),
                    None => ScoreValue::Raw(cell.display()),
                });
            records.push(QuestionRecord {
                affirmation,
                theme,
                score,
            });
        }
    }

    QuestionsAnalysis {
        records,
        question_column,
        theme_column,
        score_column,
        available_columns: table
            .headers()
            .iter()
            .filter(|h| !h.starts_with('_'))
            .cloned()
            .collect(),
    }
}

// =============================================================================
// THEME SUMMARY
// =============================================================================

/// Question count and average score of one theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionThemeSummary {
    /// Theme label.
    pub theme: String,
    /// Number of questions.
    pub count: usize,
    /// Average of numeric scores; `None` when no question had one.
    pub average: Option<f64>,
}

impl QuestionThemeSummary {
    /// Average with two decimals, or `fallback` when there is no positive
    /// average.
    #[must_use]
    pub fn score_text(&self, fallback: &str) -> String {
        self.average
            .filter(|a| *a > 0.0)
            .map_or_else(|| fallback.to_string(), |a| format!("{:.2}", a))
    }
}

/// Group records by theme (first-seen order), then order by average score
/// ascending with unscored themes last.
#[must_use]
pub fn question_theme_summary(records: &[QuestionRecord]) -> Vec<QuestionThemeSummary> {
    let mut groups: Vec<(String, usize, Vec<f64>)> = Vec::new();
    for record in records {
        let idx = match groups.iter().position(|(t, _, _)| *t == record.theme) {
            Some(idx) => idx,
            None => {
                groups.push((record.theme.clone(), 0, Vec::new()));
                groups.len() - 1
            }
        };
        let (_, count, scores) = &mut groups[idx];
        *count += 1;
        if let Some(n) = record.score.numeric() {
            scores.push(n);
        }
    }

    let mut summary: Vec<QuestionThemeSummary> = groups
        .into_iter()
        .map(|(theme, count, scores)| QuestionThemeSummary {
            theme,
            count,
            average: crate::stats::mean(&scores),
        })
        .collect();

    // Unscored and zero-average themes sort last.
    summary.sort_by(|a, b| {
        let key = |s: &QuestionThemeSummary| {
            s.average.filter(|avg| *avg > 0.0).unwrap_or(f64::INFINITY)
        };
        key(a).total_cmp(&key(b))
    });
    summary
}

// =============================================================================
// TESTS
// =============================================================================
