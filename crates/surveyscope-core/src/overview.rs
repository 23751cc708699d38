//! # Survey Insights
//!
//! Single-table analysis of a theme/score/participation export.
//!
//! The table is expected to use the literal headers `Theme`, `Score` and
//! `Participation_Rate`; any of them may be missing, in which case the
//! corresponding part of [`SurveyInsights`] is `None`.
//!
//! Participation values come in two shapes. Strings with a `%` are
//! percentages; bare numbers above 1 are treated as percentages as well,
//! everything else as a fraction.

use crate::primitives::{HIGH_PARTICIPATION, LOW_PARTICIPATION};
use crate::stats::{self, round_to};
use crate::types::format_number;
use crate::{Cell, SurveyTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Theme column header.
pub const THEME_COLUMN: &str = "Theme";
/// Score column header.
pub const SCORE_COLUMN: &str = "Score";
/// Participation column header.
pub const PARTICIPATION_COLUMN: &str = "Participation_Rate";

// =============================================================================
// TYPES
// =============================================================================

/// Descriptive statistics of the numeric scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreStats {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub std: f64,
    pub count: usize,
    /// Scores at or above the 75th percentile.
    pub high_scores: usize,
    /// Scores at or below the 25th percentile.
    pub low_scores: usize,
}

/// Descriptive statistics of participation rates (fractions in `[0, 1]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipationStats {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
    /// Rates ≥ 0.75.
    pub high: usize,
    /// Rates ≤ 0.5.
    pub low: usize,
}

/// One highlighted theme row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeHighlight {
    pub name: String,
    pub score: f64,
    /// Participation as it appears in the file.
    pub participation: String,
}

/// Best and worst scoring complete rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlights {
    pub best: ThemeHighlight,
    pub worst: ThemeHighlight,
}

/// Everything derived from one survey table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SurveyInsights {
    /// Number of rows, blank themes included.
    pub total_rows: usize,
    /// Non-blank theme labels in row order.
    pub themes: Vec<String>,
    pub unique_themes: usize,
    pub score: Option<ScoreStats>,
    pub participation: Option<ParticipationStats>,
    pub highlights: Option<Highlights>,
}

/// Overall verdict combining average score and participation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Strong,
    Moderate,
    ImprovementNeeded,
}

impl Verdict {
    /// Verdict for an average score and mean participation fraction.
    #[must_use]
    pub fn of(score_mean: f64, participation_mean: f64) -> Self {
        if score_mean >= 7.0 && participation_mean >= 0.7 {
            Self::Strong
        } else if score_mean >= 6.0 && participation_mean >= 0.6 {
            Self::Moderate
        } else {
            Self::ImprovementNeeded
        }
    }
}

impl SurveyInsights {
    /// The verdict, when both scores and participation are available.
    #[must_use]
    pub fn verdict(&self) -> Option<Verdict> {
        match (&self.score, &self.participation) {
            (Some(s), Some(p)) => Some(Verdict::of(s.mean, p.mean)),
            _ => None,
        }
    }
}

// =============================================================================
// PARSING
// =============================================================================

/// Participation as a fraction (`"85%"` → 0.85, `85` → 0.85, `0.85` → 0.85).
#[must_use]
pub fn parse_participation(cell: &Cell) -> Option<f64> {
    let (value, is_percent) = participation_value(cell)?;
    Some(if is_percent || value > 1.0 { value / 100.0 } else { value })
}

/// Participation in percent (`"85%"` → 85, `0.85` → 85, `85` → 85).
#[must_use]
pub fn participation_percent(cell: &Cell) -> Option<f64> {
    let (value, is_percent) = participation_value(cell)?;
    Some(if is_percent || value > 1.0 { value } else { value * 100.0 })
}

/// The numeric part of a participation cell and whether it carried a `%`.
fn participation_value(cell: &Cell) -> Option<(f64, bool)> {
    if cell.is_blank() {
        return None;
    }
    let raw = cell.display();
    let is_percent = raw.contains('%');
    let value = raw
        .replace('%', "")
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())?;
    Some((value, is_percent))
}

/// Display form of a participation cell.
#[must_use]
pub fn format_participation(cell: &Cell) -> String {
    if cell.is_blank() {
        return "N/A".to_string();
    }
    let raw = cell.display();
    if raw.contains('%') {
        return raw;
    }
    match raw.trim().parse::<f64>() {
        Ok(v) if v <= 1.0 => format!("{:.1}%", v * 100.0),
        Ok(v) => format!("{:.1}%", v),
        Err(_) => "N/A".to_string(),
    }
}

// =============================================================================
// ANALYSIS
// =============================================================================

/// Analyze a theme/score/participation table.
#[must_use]
pub fn analyze_survey(table: &SurveyTable) -> SurveyInsights {
    let themes: Vec<String> = table
        .column(THEME_COLUMN)
        .filter_map(Cell::non_blank)
        .collect();
    let unique_themes = themes.iter().collect::<BTreeSet<_>>().len();

    let scores: Vec<f64> = table
        .column(SCORE_COLUMN)
        .filter_map(Cell::as_number)
        .collect();
    let participation: Vec<f64> = table
        .column(PARTICIPATION_COLUMN)
        .filter_map(parse_participation)
        .collect();

    SurveyInsights {
        total_rows: table.len(),
        themes,
        unique_themes,
        score: score_stats(&scores),
        participation: participation_stats(&participation),
        highlights: highlights(table),
    }
}

fn score_stats(scores: &[f64]) -> Option<ScoreStats> {
    let mean = stats::mean(scores)?;
    let q75 = stats::quantile(scores, 0.75)?;
    let q25 = stats::quantile(scores, 0.25)?;
    Some(ScoreStats {
        mean: round_to(mean, 2),
        median: round_to(stats::median(scores)?, 2),
        min: stats::min(scores)?,
        max: stats::max(scores)?,
        std: round_to(stats::std_dev(scores)?, 2),
        count: scores.len(),
        high_scores: scores.iter().filter(|s| **s >= q75).count(),
        low_scores: scores.iter().filter(|s| **s <= q25).count(),
    })
}

fn participation_stats(values: &[f64]) -> Option<ParticipationStats> {
    Some(ParticipationStats {
        mean: round_to(stats::mean(values)?, 3),
        median: round_to(stats::median(values)?, 3),
        min: round_to(stats::min(values)?, 3),
        max: round_to(stats::max(values)?, 3),
        count: values.len(),
        high: values.iter().filter(|v| **v >= HIGH_PARTICIPATION).count(),
        low: values.iter().filter(|v| **v <= LOW_PARTICIPATION).count(),
    })
}

fn highlights(table: &SurveyTable) -> Option<Highlights> {
    if !table.has_column(SCORE_COLUMN) || !table.has_column(PARTICIPATION_COLUMN) {
        return None;
    }

    let complete: Vec<ThemeHighlight> = (0..table.len())
        .filter_map(|i| {
            let name = table.cell(i, THEME_COLUMN).non_blank()?;
            let participation = table.cell(i, PARTICIPATION_COLUMN).non_blank()?;
            let score = table.cell(i, SCORE_COLUMN).as_number()?;
            Some(ThemeHighlight {
                name,
                score,
                participation,
            })
        })
        .collect();

    // First occurrence wins on ties.
    let mut best = complete.first()?;
    let mut worst = best;
    for row in &complete {
        if row.score > best.score {
            best = row;
        }
        if row.score < worst.score {
            worst = row;
        }
    }
    Some(Highlights {
        best: best.clone(),
        worst: worst.clone(),
    })
}

// =============================================================================
// NARRATIVE
// =============================================================================

fn share(part: usize, total: usize) -> String {
    format_number(round_to(stats::percent(part, total), 1))
}

/// Markdown narrative for the insights screen and the Markdown download.
#[must_use]
pub fn survey_narrative(insights: &SurveyInsights) -> String {
    let mut lines: Vec<String> = vec![
        "## Survey Theme Analysis Report".into(),
        String::new(),
        format!(
            "This analysis examines **{} survey themes** with their corresponding scores and participation rates.",
            insights.total_rows
        ),
        String::new(),
    ];

    if let Some(s) = &insights.score {
        lines.extend([
            "### 📊 Score Performance Analysis".into(),
            String::new(),
            "**Overall Score Metrics:**".into(),
            format!(
                "- Average Score: **{}** (out of {})",
                format_number(s.mean),
                format_number(s.max)
            ),
            format!("- Score Range: {} to {}", format_number(s.min), format_number(s.max)),
            format!("- Median Score: {}", format_number(s.median)),
            String::new(),
            "**Performance Distribution:**".into(),
            format!(
                "- High-performing themes (top 25%): **{} themes** ({}%)",
                s.high_scores,
                share(s.high_scores, s.count)
            ),
            format!(
                "- Low-performing themes (bottom 25%): **{} themes** ({}%)",
                s.low_scores,
                share(s.low_scores, s.count)
            ),
            String::new(),
        ]);
    }

    if let Some(p) = &insights.participation {
        lines.extend([
            "### 👥 Participation Rate Analysis".into(),
            String::new(),
            "**Participation Metrics:**".into(),
            format!("- Average Participation: **{:.1}%**", p.mean * 100.0),
            format!(
                "- Participation Range: {:.1}% to {:.1}%",
                p.min * 100.0,
                p.max * 100.0
            ),
            format!("- Median Participation: {:.1}%", p.median * 100.0),
            String::new(),
            "**Engagement Levels:**".into(),
            format!(
                "- High engagement themes (≥75% participation): **{} themes** ({}%)",
                p.high,
                share(p.high, p.count)
            ),
            format!(
                "- Low engagement themes (≤50% participation): **{} themes** ({}%)",
                p.low,
                share(p.low, p.count)
            ),
            String::new(),
        ]);
    }

    if let Some(h) = &insights.highlights {
        lines.extend(["### 🏆 Theme Performance Highlights".into(), String::new()]);
        for (label, theme) in [
            ("Top Performing Theme", &h.best),
            ("Lowest Performing Theme", &h.worst),
        ] {
            lines.extend([
                format!("**{}:**", label),
                format!("- **{}**", theme.name),
                format!("- Score: {}", format_number(theme.score)),
                format!("- Participation: {}", theme.participation),
                String::new(),
            ]);
        }
    }

    lines.extend(["### 🎯 Key Insights & Recommendations".into(), String::new()]);

    if let (Some(verdict), Some(s), Some(p)) =
        (insights.verdict(), &insights.score, &insights.participation)
    {
        lines.push(
            match verdict {
                Verdict::Strong => "🟢 **Strong Performance:** Both scores and participation rates show positive trends.",
                Verdict::Moderate => "🟡 **Moderate Performance:** Scores and participation are at acceptable levels with room for improvement.",
                Verdict::ImprovementNeeded => "🔴 **Improvement Needed:** Focus on strategies to boost both scores and engagement.",
            }
            .to_string(),
        );
        lines.extend([String::new(), "**Recommendations:**".into()]);
        if p.mean < 0.6 {
            lines.push("- **Increase Engagement:** Focus on themes with low participation rates".into());
        }
        if s.mean < 6.0 {
            lines.push("- **Improve Content Quality:** Address low-scoring themes".into());
        }
        lines.push("- **Monitor Trends:** Track performance over time to identify patterns".into());
    }

    lines.join("\n")
}

/// Numbered recommendations for the PDF report, in order.
#[must_use]
pub fn recommendations(insights: &SurveyInsights) -> Vec<&'static str> {
    let mut recs = Vec::new();

    if let (Some(verdict), Some(s), Some(p)) =
        (insights.verdict(), &insights.score, &insights.participation)
    {
        recs.extend(match verdict {
            Verdict::Strong => [
                "Continue current strategies as both scores and participation show strong performance.",
                "Consider scaling successful approaches to other survey initiatives.",
            ],
            Verdict::Moderate => [
                "Focus on incremental improvements to elevate performance from moderate to strong levels.",
                "Identify and replicate best practices from top-performing themes.",
            ],
            Verdict::ImprovementNeeded => [
                "Implement comprehensive improvement strategies to address both content quality and engagement.",
                "Consider redesigning low-performing themes based on high-performer analysis.",
            ],
        });
        if p.mean < 0.6 {
            recs.extend([
                "Develop targeted engagement strategies for themes with low participation rates.",
                "Investigate barriers to participation and implement solutions.",
            ]);
        }
        if s.mean < 6.0 {
            recs.extend([
                "Conduct content review and enhancement for low-scoring themes.",
                "Implement quality assurance processes for future theme development.",
            ]);
        }
    }

    recs.extend([
        "Establish regular monitoring and evaluation cycles to track performance trends over time.",
        "Create feedback mechanisms to understand participant preferences and experiences.",
        "Consider A/B testing different approaches for underperforming themes.",
    ]);
    recs
}

// =============================================================================
// DASHBOARD
// =============================================================================

/// Headline numbers for the dashboard cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_responses: usize,
    /// Mean numeric score, 0 when there is none.
    pub average_score: f64,
    pub unique_themes: usize,
}

/// Dashboard card values for any table.
#[must_use]
pub fn dashboard_stats(table: &SurveyTable) -> DashboardStats {
    let scores: Vec<f64> = table
        .column(SCORE_COLUMN)
        .filter_map(Cell::as_number)
        .collect();
    DashboardStats {
        total_responses: table.len(),
        average_score: stats::mean(&scores).unwrap_or(0.0),
        unique_themes: table
            .column(THEME_COLUMN)
            .filter_map(Cell::non_blank)
            .collect::<BTreeSet<_>>()
            .len(),
    }
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

    fn survey() -> SurveyTable {
        SurveyTable::new(
            vec!["Theme".into(), "Score".into(), "Participation_Rate".into()],
            vec![
                vec![t("Growth"), Cell::Number(8.0), t("85%")],
                vec![t("Culture"), Cell::Number(6.0), Cell::Number(0.4)],
                vec![t("Vision"), Cell::Number(7.0), Cell::Number(70.0)],
                vec![t("Tools"), Cell::Number(5.0), Cell::Empty],
            ],
        )
    }

    #[test]
    fn participation_parsing() {
        assert_eq!(parse_participation(&t("85%")), Some(0.85));
        assert_eq!(parse_participation(&Cell::Number(85.0)), Some(0.85));
        assert_eq!(parse_participation(&Cell::Number(0.85)), Some(0.85));
        assert_eq!(parse_participation(&t("n/a")), None);
        assert_eq!(parse_participation(&Cell::Empty), None);
    }

    #[test]
    fn participation_display() {
        assert_eq!(format_participation(&t("85%")), "85%");
        assert_eq!(format_participation(&Cell::Number(0.85)), "85.0%");
        assert_eq!(format_participation(&Cell::Number(85.0)), "85.0%");
        assert_eq!(format_participation(&Cell::Empty), "N/A");
    }

    #[test]
    fn score_and_participation_stats() {
        let insights = analyze_survey(&survey());
        assert_eq!(insights.total_rows, 4);
        assert_eq!(insights.unique_themes, 4);

        let s = insights.score.as_ref().expect("scores");
        assert_eq!(s.mean, 6.5);
        assert_eq!(s.median, 6.5);
        assert_eq!(s.min, 5.0);
        assert_eq!(s.max, 8.0);
        assert_eq!(s.std, 1.29);
        // q75 = 7.25, q25 = 5.75
        assert_eq!(s.high_scores, 1);
        assert_eq!(s.low_scores, 1);

        let p = insights.participation.as_ref().expect("participation");
        assert_eq!(p.count, 3);
        assert_eq!(p.mean, 0.65);
        assert_eq!(p.high, 1);
        assert_eq!(p.low, 1);
    }

    #[test]
    fn highlights_use_complete_rows() {
        let insights = analyze_survey(&survey());
        let h = insights.highlights.expect("highlights");
        assert_eq!(h.best.name, "Growth");
        assert_eq!(h.best.participation, "85%");
        assert_eq!(h.worst.name, "Culture");
        assert_eq!(h.worst.participation, "0.4");
    }

    #[test]
    fn narrative_sections_and_verdict() {
        let insights = analyze_survey(&survey());
        assert_eq!(insights.verdict(), Some(Verdict::Moderate));
        let text = survey_narrative(&insights);
        assert!(text.starts_with("## Survey Theme Analysis Report"));
        assert!(text.contains("- Average Score: **6.5** (out of 8.0)"));
        assert!(text.contains("- High-performing themes (top 25%): **1 themes** (25.0%)"));
        assert!(text.contains("- Average Participation: **65.0%**"));
        assert!(text.contains("🟡 **Moderate Performance:**"));
        assert!(!text.contains("Increase Engagement"));
        assert!(text.ends_with("- **Monitor Trends:** Track performance over time to identify patterns"));
    }

    #[test]
    fn recommendations_always_end_with_general_items() {
        let recs = recommendations(&analyze_survey(&survey()));
        assert_eq!(recs.len(), 5);
        assert!(recs[0].starts_with("Focus on incremental improvements"));

        let empty = recommendations(&SurveyInsights::default());
        assert_eq!(empty.len(), 3);
    }

    #[test]
    fn scores_only_table_has_no_verdict() {
        let table = SurveyTable::new(
            vec!["Theme".into(), "Score".into()],
            vec![vec![t("A"), Cell::Number(3.0)]],
        );
        let insights = analyze_survey(&table);
        assert!(insights.participation.is_none());
        assert!(insights.highlights.is_none());
        assert!(survey_narrative(&insights).ends_with("### 🎯 Key Insights & Recommendations\n"));
    }

    #[test]
    fn dashboard_defaults() {
        let stats = dashboard_stats(&SurveyTable::new(vec!["Comment".into()], vec![vec![t("x")]]));
        assert_eq!(stats.total_responses, 1);
        assert_eq!(stats.average_score, 0.0);
        assert_eq!(stats.unique_themes, 0);
    }
}
