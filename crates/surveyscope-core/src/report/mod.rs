//! # Markdown Reports
//!
//! Downloadable text reports built from stored uploads.
//!
//! - [`team_report`]: one team, one narrative per uploaded file
//! - [`company_report`]: every team's files combined per section
//! - [`survey_report_markdown`]: the single-table insights download
//!
//! The generation date is passed in, so a report is a pure function of
//! its inputs.

mod survey;

pub use survey::survey_report_markdown;

use crate::classify::slugify;
use crate::comments::analyze_comments;
use crate::ingest::{TeamData, Workspace};
use crate::narrative::{company_insights, strip_emphasis, team_narrative_points};
use crate::questions::{analyze_questions, question_theme_summary};
use crate::sentiment::analyze_sentiment;
use crate::themes::{ThemeScore, theme_score_summary, valid_response_count};
use crate::{Section, SurveyTable};
use chrono::NaiveDate;

// =============================================================================
// FILE NAMES AND TITLES
// =============================================================================

/// Long date used in report headers ("March 05, 2025").
#[must_use]
pub fn long_date(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}

/// `{slug}_analysis_{YYYYMMDD}.txt`
#[must_use]
pub fn team_report_filename(team: &str, date: NaiveDate) -> String {
    format!("{}_analysis_{}.txt", slugify(team), date.format("%Y%m%d"))
}

/// `company_wide_analysis_{YYYYMMDD}.txt`
#[must_use]
pub fn company_report_filename(date: NaiveDate) -> String {
    format!("company_wide_analysis_{}.txt", date.format("%Y%m%d"))
}

/// File name of the survey insights Markdown download.
pub const SURVEY_REPORT_FILENAME: &str = "survey_theme_analysis_report.md";

/// `survey_narrative_report_{YYYYMMDD}.pdf`
#[must_use]
pub fn survey_pdf_filename(date: NaiveDate) -> String {
    format!("survey_narrative_report_{}.pdf", date.format("%Y%m%d"))
}

/// Document title for a published team report.
#[must_use]
pub fn team_report_title(team: &str, date: NaiveDate) -> String {
    format!("{} Survey Analysis - {}", team, long_date(date))
}

/// Document title for a published company report.
#[must_use]
pub fn company_report_title(date: NaiveDate) -> String {
    format!("Company-Wide Survey Analysis - {}", long_date(date))
}

// =============================================================================
// TEAM REPORT
// =============================================================================

/// Narrative report for one team.
#[must_use]
pub fn team_report(team: &TeamData, date: NaiveDate) -> String {
    let mut report = format!("# {} - Survey Analysis Report\n\n", team.name);
    report.push_str(&format!("Generated on: {}\n\n", long_date(date)));

    for section in team.available_sections() {
        report.push_str(&format!("## {} Analysis\n\n", section));
        for file in team.files(section) {
            if file.table.is_empty() {
                continue;
            }
            report.push_str(&match section {
                Section::Themes => themes_narrative(&file.table, &team.name),
                Section::Questions => questions_narrative(&file.table, &team.name),
                Section::Comments => comments_narrative(&file.table, &team.name),
                Section::General => String::new(),
            });
        }
    }
    report
}

fn theme_line(score: &ThemeScore, suffix: (&str, &str)) -> String {
    format!("- {}: {:.2} {} ({} {})\n", score.theme, score.mean, suffix.0, score.count, suffix.1)
}

fn themes_narrative(table: &SurveyTable, team: &str) -> String {
    let mut text = format!("### {} - Themes Overview\n\n", team);
    let scores = theme_score_summary(table);
    if scores.is_empty() {
        return text;
    }

    text.push_str(&format!(
        "Analysis of {} theme responses reveals the following patterns:\n\n",
        valid_response_count(&scores)
    ));
    text.push_str("**Top Performing Themes:**\n");
    for s in head(&scores, 3) {
        text.push_str(&theme_line(s, ("average score", "responses")));
    }
    text.push_str("\n**Areas for Improvement:**\n");
    for s in tail(&scores, 3) {
        text.push_str(&theme_line(s, ("average score", "responses")));
    }
    text.push('\n');
    text
}

fn questions_narrative(table: &SurveyTable, team: &str) -> String {
    let mut text = format!("### {} - Questions Analysis\n\n", team);
    let analysis = analyze_questions(table);
    if analysis.records.is_empty() {
        return text;
    }

    text.push_str(&format!(
        "Analysis of {} questions reveals key insights about team perceptions:\n\n",
        analysis.records.len()
    ));
    text.push_str("**Theme Performance (ordered by score):**\n");
    for s in question_theme_summary(&analysis.records) {
        text.push_str(&format!(
            "- {}: {} ({} questions)\n",
            s.theme,
            s.score_text("No scores"),
            s.count
        ));
    }
    text.push('\n');
    text
}

fn comments_narrative(table: &SurveyTable, team: &str) -> String {
    let mut text = format!("### {} - Comments Analysis\n\n", team);
    let comments = analyze_comments(table).comments();
    if comments.is_empty() {
        return text;
    }

    let summary = analyze_sentiment(&comments);
    text.push_str(&format!(
        "Analysis of {} comments from {}:\n\n",
        comments.len(),
        team
    ));
    text.push_str(&format!(
        "**Overall Sentiment:** {:.0}% positive sentiment across {} comments\n\n",
        summary.percentages().positive,
        summary.total_comments
    ));
    text.push_str("**Key Insights:**\n");
    for point in team_narrative_points(&summary, team).iter().take(3) {
        text.push_str(&format!("- {}\n", strip_emphasis(point)));
    }
    text.push('\n');
    text
}

// =============================================================================
// COMPANY REPORT
// =============================================================================

/// Company-wide narrative report across every team.
#[must_use]
pub fn company_report(workspace: &Workspace, date: NaiveDate) -> String {
    let mut report = String::from("# Company-Wide Survey Analysis Report\n\n");
    report.push_str(&format!("Generated on: {}\n\n", long_date(date)));
    report.push_str("## Executive Summary\n\n");

    if !workspace.company_files(Section::Themes).is_empty() {
        report.push_str("## Themes Analysis\n\n");
        report.push_str(&company_themes(&workspace.company_table(Section::Themes)));
    }
    if !workspace.company_files(Section::Questions).is_empty() {
        report.push_str("## Questions Analysis\n\n");
        report.push_str(&company_questions(&workspace.company_table(Section::Questions)));
    }
    if !workspace.company_files(Section::Comments).is_empty() {
        report.push_str("## Comments Analysis\n\n");
        report.push_str(&company_comments(&workspace.company_table(Section::Comments)));
    }
    report
}

fn company_themes(table: &SurveyTable) -> String {
    let scores = theme_score_summary(table);
    if scores.is_empty() {
        return String::new();
    }

    let mut text = format!(
        "Company-wide theme analysis across {} responses from all teams:\n\n",
        valid_response_count(&scores)
    );
    text.push_str("**Top Performing Themes:**\n");
    for s in head(&scores, 5) {
        text.push_str(&theme_line(s, ("average", "total responses")));
    }
    text.push_str("\n**Areas Needing Attention:**\n");
    for s in tail(&scores, 5) {
        text.push_str(&theme_line(s, ("average", "total responses")));
    }
    text.push('\n');
    text
}

fn company_questions(table: &SurveyTable) -> String {
    let analysis = analyze_questions(table);
    if analysis.records.is_empty() {
        return String::new();
    }

    let mut text = format!(
        "Company-wide questions analysis covering {} questions across all teams:\n\n",
        analysis.records.len()
    );
    text.push_str("**Theme Performance Summary:**\n");
    for s in question_theme_summary(&analysis.records) {
        text.push_str(&format!(
            "- {}: {} ({} questions)\n",
            s.theme,
            s.score_text("No scores available"),
            s.count
        ));
    }
    text.push('\n');
    text
}

fn company_comments(table: &SurveyTable) -> String {
    let comments = analyze_comments(table).comments();
    if comments.is_empty() {
        return String::new();
    }

    let summary = analyze_sentiment(&comments);
    let mut text = format!(
        "Company-wide comment analysis across {} comments from all teams:\n\n",
        comments.len()
    );
    text.push_str(&format!(
        "**Overall Sentiment:** {:.0}% positive sentiment company-wide\n\n",
        summary.percentages().positive
    ));
    text.push_str("**Key Organizational Insights:**\n");
    for insight in company_insights(&summary, &comments) {
        text.push_str(&format!("**{}:** {}\n\n", insight.title, insight.description));
    }
    text
}

fn head<T>(items: &[T], n: usize) -> &[T] {
    &items[..n.min(items.len())]
}

fn tail<T>(items: &[T], n: usize) -> &[T] {
    &items[items.len().saturating_sub(n)..]
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::UploadedFile;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 5).unwrap_or_default()
    }

    const THEMES: &str = "Theme,Score\nGrowth,4\nGrowth,5\nCulture,3\nVision,2\nTools,4\n";
    const QUESTIONS: &str = "Question,Theme,Score\nI feel heard,Voice,4\nGoals clear,Vision,2.5\nTools work,Tools,\n";
    const COMMENTS: &str = "Question,Theme,Comment\nQ1,Voice,Great team and great support\nQ2,Tools,Laptops are slow and frustrating\n";

    fn workspace() -> Workspace {
        let mut ws = Workspace::default();
        ws.ingest(&[
            UploadedFile::new("build_themes.csv", THEMES),
            UploadedFile::new("build_questions.csv", QUESTIONS),
            UploadedFile::new("build_comments.csv", COMMENTS),
            UploadedFile::new("andrew_themes.csv", "Theme,Score\nGrowth,2\n"),
        ]);
        ws
    }

    #[test]
    fn file_names() {
        assert_eq!(
            team_report_filename("Andrew's Team", date()),
            "andrews_team_analysis_20250305.txt"
        );
        assert_eq!(company_report_filename(date()), "company_wide_analysis_20250305.txt");
        assert_eq!(survey_pdf_filename(date()), "survey_narrative_report_20250305.pdf");
        assert_eq!(long_date(date()), "March 05, 2025");
    }

    #[test]
    fn team_report_sections() {
        let ws = workspace();
        let report = team_report(ws.team("Build Team").expect("team"), date());
        assert!(report.starts_with("# Build Team - Survey Analysis Report\n\nGenerated on: March 05, 2025\n\n"));
        assert!(report.contains("## Themes Analysis\n\n### Build Team - Themes Overview\n\n"));
        assert!(report.contains("Analysis of 5 theme responses reveals the following patterns:"));
        assert!(report.contains("- Growth: 4.50 average score (2 responses)\n"));
        assert!(report.contains("\n**Areas for Improvement:**\n- Tools: 4.00 average score (1 responses)\n- Culture:"));
        assert!(report.contains("- Voice: 4.00 (1 questions)\n"));
        assert!(report.contains("- Tools: No scores (1 questions)\n"));
        assert!(report.contains("**Overall Sentiment:** 50% positive sentiment across 2 comments"));
        assert!(report.contains("**Key Insights:**\n- Areas of Concern: 50% of feedback"));
    }

    #[test]
    fn team_report_skips_empty_sections() {
        let ws = workspace();
        let report = team_report(ws.team("andrews_team").expect("team"), date());
        assert!(report.contains("## Themes Analysis"));
        assert!(!report.contains("## Questions Analysis"));
        assert!(!report.contains("## Comments Analysis"));
    }

    #[test]
    fn company_report_combines_teams() {
        let ws = workspace();
        let report = company_report(&ws, date());
        assert!(report.starts_with("# Company-Wide Survey Analysis Report\n\n"));
        assert!(report.contains("## Executive Summary\n\n## Themes Analysis\n\n"));
        assert!(report.contains("across 6 responses from all teams"));
        assert!(report.contains("- Growth: 3.67 average (3 total responses)\n"));
        assert!(report.contains("- Tools: No scores available (1 questions)\n"));
        assert!(report.contains("**Key Organizational Insights:**\n**Overall Comment Analysis:**"));
    }

    #[test]
    fn empty_workspace_company_report() {
        let report = company_report(&Workspace::default(), date());
        assert_eq!(
            report,
            "# Company-Wide Survey Analysis Report\n\nGenerated on: March 05, 2025\n\n## Executive Summary\n\n"
        );
    }
}
