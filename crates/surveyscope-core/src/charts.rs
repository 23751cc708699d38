//! # Chart Data
//!
//! Series for the dashboard charts. Rendering belongs to whatever consumes
//! the JSON; this module only decides what is plotted.

use crate::overview::{PARTICIPATION_COLUMN, SCORE_COLUMN, THEME_COLUMN, participation_percent};
use crate::primitives::TOP_THEME_BARS;
use crate::themes::ThemeScore;
use crate::{Cell, SurveyTable};
use serde::{Deserialize, Serialize};

/// Maximum number of histogram bins.
const MAX_BINS: usize = 10;

// =============================================================================
// TYPES
// =============================================================================

/// One histogram bin. The last bin includes its upper edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// One scatter point with its theme label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub label: String,
    pub x: f64,
    pub y: f64,
}

/// One horizontal bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

/// Plotted data of a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartData {
    Histogram { bins: Vec<Bin> },
    Scatter { points: Vec<ScatterPoint> },
    Bars { bars: Vec<Bar> },
}

/// A chart ready to be drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    /// Short identifier ("Score Distribution").
    pub name: String,
    /// Display title.
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub data: ChartData,
}

impl Chart {
    fn new(name: &str, title: String, x_label: &str, y_label: &str, data: ChartData) -> Self {
        Self {
            name: name.to_string(),
            title,
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            data,
        }
    }
}

// =============================================================================
// HISTOGRAMS
// =============================================================================

/// Equal-width bins over `[min, max]`, `min(10, distinct values)` of them.
///
/// A single distinct value gets one bin of width 1 centred on it.
#[must_use]
pub fn histogram(values: &[f64]) -> Vec<Bin> {
    let (Some(lo), Some(hi)) = (crate::stats::min(values), crate::stats::max(values)) else {
        return Vec::new();
    };

    let mut distinct = values.to_vec();
    distinct.sort_by(f64::total_cmp);
    distinct.dedup();
    let n = distinct.len().min(MAX_BINS);

    let (lo, hi) = if lo == hi { (lo - 0.5, hi + 0.5) } else { (lo, hi) };
    let width = (hi - lo) / n as f64;

    let mut bins: Vec<Bin> = (0..n)
        .map(|i| Bin {
            start: lo + width * i as f64,
            end: if i + 1 == n { hi } else { lo + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();

    for v in values {
        let idx = (((v - lo) / width).floor() as usize).min(n - 1);
        bins[idx].count += 1;
    }
    bins
}

/// Distribution of numeric scores.
#[must_use]
pub fn score_histogram(table: &SurveyTable) -> Option<Chart> {
    let scores: Vec<f64> = table.column(SCORE_COLUMN).filter_map(Cell::as_number).collect();
    if scores.is_empty() {
        return None;
    }
    Some(Chart::new(
        "Score Distribution",
        "📊 Score Distribution".to_string(),
        "Score",
        "Number of Themes",
        ChartData::Histogram {
            bins: histogram(&scores),
        },
    ))
}

/// Distribution of participation rates, in percent.
#[must_use]
pub fn participation_histogram(table: &SurveyTable) -> Option<Chart> {
    let rates: Vec<f64> = table
        .column(PARTICIPATION_COLUMN)
        .filter_map(participation_percent)
        .collect();
    if rates.is_empty() {
        return None;
    }
    Some(Chart::new(
        "Participation Distribution",
        "👥 Participation Rate Distribution".to_string(),
        "Participation Rate (%)",
        "Number of Themes",
        ChartData::Histogram {
            bins: histogram(&rates),
        },
    ))
}

// =============================================================================
// SCATTER AND BARS
// =============================================================================

/// Score against participation (percent) for every complete row.
#[must_use]
pub fn score_vs_participation(table: &SurveyTable) -> Option<Chart> {
    if !table.has_column(THEME_COLUMN) || !table.has_column(PARTICIPATION_COLUMN) {
        return None;
    }
    let points: Vec<ScatterPoint> = (0..table.len())
        .filter_map(|i| {
            Some(ScatterPoint {
                label: table.cell(i, THEME_COLUMN).non_blank()?,
                x: participation_percent(table.cell(i, PARTICIPATION_COLUMN))?,
                y: table.cell(i, SCORE_COLUMN).as_number()?,
            })
        })
        .collect();
    if points.is_empty() {
        return None;
    }
    Some(Chart::new(
        "Score vs Participation",
        "🎯 Score vs Participation Rate by Theme".to_string(),
        "Participation Rate (%)",
        "Score",
        ChartData::Scatter { points },
    ))
}

/// Highest-scoring rows, best first. Needs at least three scored rows.
#[must_use]
pub fn top_themes_by_score(table: &SurveyTable) -> Option<Chart> {
    let mut bars: Vec<Bar> = (0..table.len())
        .filter_map(|i| {
            Some(Bar {
                label: table.cell(i, THEME_COLUMN).non_blank()?,
                value: table.cell(i, SCORE_COLUMN).as_number()?,
            })
        })
        .collect();
    if bars.len() < 3 {
        return None;
    }
    bars.sort_by(|a, b| b.value.total_cmp(&a.value));
    bars.truncate(TOP_THEME_BARS);
    Some(Chart::new(
        "Top Themes",
        format!("🏆 Top {} Themes by Score", bars.len()),
        "Score",
        "Theme",
        ChartData::Bars { bars },
    ))
}

/// Bars of per-theme averages. `team` goes into the title when given.
#[must_use]
pub fn theme_average_bars(scores: &[ThemeScore], team: Option<&str>) -> Option<Chart> {
    if scores.is_empty() {
        return None;
    }
    let bars = scores
        .iter()
        .take(TOP_THEME_BARS)
        .map(|s| Bar {
            label: s.theme.clone(),
            value: s.mean,
        })
        .collect();
    let title = match team {
        Some(team) => format!("🏆 Top 10 Themes by Average Score - {}", team),
        None => "🏆 Top 10 Themes by Average Score".to_string(),
    };
    Some(Chart::new(
        "Top Themes by Average",
        title,
        "Average Score",
        "Theme",
        ChartData::Bars { bars },
    ))
}

/// Every chart that applies to a survey table, in display order.
#[must_use]
pub fn survey_charts(table: &SurveyTable) -> Vec<Chart> {
    [
        score_histogram(table),
        participation_histogram(table),
        score_vs_participation(table),
        top_themes_by_score(table),
    ]
    .into_iter()
    .flatten()
    .collect()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn t(s: &str) -> Cell {
        Cell::text(s)
    }

    #[test]
    fn histogram_bins_cover_every_value() {
        let values = [1.0, 2.0, 2.0, 3.0, 5.0];
        let bins = histogram(&values);
        assert_eq!(bins.len(), 4);
        assert_eq!(bins[0].start, 1.0);
        assert_eq!(bins[3].end, 5.0);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
        assert_eq!(bins[3].count, 1);
    }

    #[test]
    fn histogram_single_value() {
        let bins = histogram(&[4.0, 4.0]);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 2);
        assert_eq!(bins[0].start, 3.5);
        assert!(histogram(&[]).is_empty());
    }

    #[test]
    fn survey_charts_in_order() {
        let table = SurveyTable::new(
            vec!["Theme".into(), "Score".into(), "Participation_Rate".into()],
            vec![
                vec![t("A"), Cell::Number(5.0), t("80%")],
                vec![t("B"), Cell::Number(9.0), Cell::Number(0.5)],
                vec![t("C"), Cell::Number(7.0), Cell::Empty],
            ],
        );
        let charts = survey_charts(&table);
        let names: Vec<&str> = charts.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Score Distribution", "Participation Distribution", "Score vs Participation", "Top Themes"]
        );

        let ChartData::Scatter { points } = &charts[2].data else {
            panic!("expected scatter");
        };
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].x, 50.0);

        let ChartData::Bars { bars } = &charts[3].data else {
            panic!("expected bars");
        };
        assert_eq!(bars[0].label, "B");
        assert_eq!(charts[3].title, "🏆 Top 3 Themes by Score");
    }

    #[test]
    fn top_themes_needs_three_rows() {
        let table = SurveyTable::new(
            vec!["Theme".into(), "Score".into()],
            vec![vec![t("A"), Cell::Number(5.0)], vec![t("B"), Cell::Number(4.0)]],
        );
        assert!(top_themes_by_score(&table).is_none());
        assert_eq!(survey_charts(&table).len(), 1);
    }

    #[test]
    fn average_bars_title() {
        let scores = vec![ThemeScore {
            theme: "Growth".into(),
            mean: 4.5,
            count: 2,
        }];
        let chart = theme_average_bars(&scores, Some("Build Team")).expect("chart");
        assert_eq!(chart.title, "🏆 Top 10 Themes by Average Score - Build Team");
        assert!(theme_average_bars(&[], None).is_none());
    }
}
