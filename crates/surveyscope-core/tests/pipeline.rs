//! # Pipeline Scenarios
//!
//! End-to-end runs over inline CSV uploads: classification, ingestion,
//! analysis and report output.

use chrono::NaiveDate;
use surveyscope_core::{
    Section, UploadedFile, Workspace, analyze_survey, company_report, markdown_to_doc_requests,
    survey_charts, survey_report_markdown, team_report,
};

fn csv(name: &str, body: &str) -> UploadedFile {
    UploadedFile::new(name, body.as_bytes().to_vec())
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 5).unwrap_or_default()
}

// =============================================================================
// INGESTION
// =============================================================================

mod ingestion {
    use super::*;

    #[test]
    fn bad_files_become_warnings() {
        let mut workspace = Workspace::default();
        let outcome = workspace.ingest(&[
            csv("build_themes.csv", "Theme,Score\nGrowth,4\n"),
            csv("notes.txt", "hello"),
            csv("random_themes.csv", "Theme,Score\nA,1\n"),
            csv("build_data.csv", "Theme,Score\nA,1\n"),
            csv("finance_themes.csv", "Theme,Score\n"),
        ]);

        assert_eq!(outcome.total, 5);
        assert_eq!(outcome.processed.len(), 1);
        assert_eq!(outcome.summary(), "1/5 files processed successfully!");

        let messages: Vec<&str> = outcome.warnings.iter().map(|w| w.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Error processing notes.txt: Unsupported file format: notes.txt",
                "Could not detect team from filename: random_themes.csv",
                "No category keyword found in filename: build_data.csv",
                "File contains no data: finance_themes.csv",
            ]
        );
    }

    #[test]
    fn uploads_are_grouped_per_team() {
        let mut workspace = Workspace::default();
        workspace.ingest(&[
            csv("Andrew_Themes.csv", "Theme,Score\nGrowth,4\n"),
            csv("andrew_comments.csv", "Comment\nGreat support\n"),
            csv("HR_feedback.csv", "Feedback\nToo much pressure\n"),
        ]);

        let andrew = workspace.team("andrews_team").expect("team");
        assert_eq!(andrew.available_sections(), vec![Section::Themes, Section::Comments]);

        let people = workspace.team("People and Marketing Team").expect("team");
        assert_eq!(people.files(Section::Comments).len(), 1);

        let overview = workspace.overview();
        assert_eq!(overview.active_teams, 2);
        assert_eq!(overview.comment_files, 2);
        assert_eq!(overview.theme_files, 1);

        workspace.clear();
        assert!(workspace.is_empty());
    }

    #[test]
    fn unknown_team_lookup_fails() {
        let workspace = Workspace::default();
        assert!(workspace.team("nobody").is_err());
    }
}

// =============================================================================
// REPORTS
// =============================================================================

mod reports {
    use super::*;

    fn workspace() -> Workspace {
        let mut workspace = Workspace::default();
        workspace.ingest(&[
            csv("build_themes.csv", "Theme,Score\nGrowth,5\nCulture,3\n"),
            csv("operations_themes.csv", "Theme,Score\nGrowth,4\n"),
            csv("build_comments.csv", "Comment\nGreat team\n\nToo slow\n"),
        ]);
        workspace
    }

    #[test]
    fn team_report_has_header_and_sections() {
        let workspace = workspace();
        let team = workspace.team("build_team").expect("team");
        let report = team_report(team, date());

        assert!(report.starts_with("# Build Team - Survey Analysis Report\n\nGenerated on: March 05, 2025\n"));
        assert!(report.contains("## Themes Analysis"));
        assert!(report.contains("## Comments Analysis"));
        assert!(report.contains("- Growth: 5.00 average score (1 responses)"));
        assert!(!report.contains("## Questions Analysis"));
    }

    #[test]
    fn company_table_stacks_every_team() {
        let workspace = workspace();
        let themes = workspace.company_table(Section::Themes);
        assert_eq!(themes.len(), 3);

        let report = company_report(&workspace, date());
        assert!(report.contains("## Themes Analysis"));
        assert!(report.contains("## Comments Analysis"));
        assert!(!report.contains("## Questions Analysis"));
    }

    #[test]
    fn reports_are_deterministic() {
        let a = company_report(&workspace(), date());
        let b = company_report(&workspace(), date());
        assert_eq!(a, b);
    }
}

// =============================================================================
// SINGLE-TABLE INSIGHTS
// =============================================================================

mod insights {
    use super::*;
    use surveyscope_core::read_table;

    const SURVEY_CSV: &str = "Theme,Score,Participation_Rate\n\
        Growth,8,85%\n\
        Culture,6,0.4\n\
        Vision,7,70\n\
        Tools,5,\n";

    #[test]
    fn insights_report_and_export() {
        let table = read_table("survey.csv", SURVEY_CSV.as_bytes()).expect("table");
        let insights = analyze_survey(&table);
        assert_eq!(insights.total_rows, 4);
        assert!(insights.highlights.is_some());

        let markdown = survey_report_markdown(&insights, &table);
        assert!(markdown.contains("### Tools\n- Score: 5.0\n"));

        let charts = survey_charts(&table);
        assert_eq!(charts.len(), 4);

        let requests = markdown_to_doc_requests(&markdown);
        assert_eq!(requests[0]["insertText"]["text"], "Survey Theme Analysis Report\n");
        assert_eq!(
            requests[1]["updateParagraphStyle"]["paragraphStyle"]["namedStyleType"],
            "TITLE"
        );
    }
}
