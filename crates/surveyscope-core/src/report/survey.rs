use crate::overview::{
    PARTICIPATION_COLUMN, SCORE_COLUMN, SurveyInsights, THEME_COLUMN, survey_narrative,
};
use crate::types::format_number;
use crate::SurveyTable;

/// The "Survey Theme Analysis Report" Markdown download.
#[must_use]
pub fn survey_report_markdown(insights: &SurveyInsights, table: &SurveyTable) -> String {
    let mut report = format!(
        "# Survey Theme Analysis Report\n\n{}\n\n## Data Summary\n- Total Themes Analyzed: {}\n",
        survey_narrative(insights),
        insights.total_rows
    );

    if let Some(s) = &insights.score {
        report.push_str(&format!(
            "\n## Score Analysis\n- Average Score: {}\n- Score Range: {} - {}\n- High-performing Themes: {}\n- Low-performing Themes: {}\n",
            format_number(s.mean),
            format_number(s.min),
            format_number(s.max),
            s.high_scores,
            s.low_scores
        ));
    }

    if let Some(p) = &insights.participation {
        report.push_str(&format!(
            "\n## Participation Analysis\n- Average Participation: {:.1}%\n- Participation Range: {:.1}% - {:.1}%\n- High-engagement Themes: {}\n- Low-engagement Themes: {}\n",
            p.mean * 100.0,
            p.min * 100.0,
            p.max * 100.0,
            p.high,
            p.low
        ));
    }

    report.push_str("\n## Theme Details\n");
    for i in 0..table.len() {
        let Some(theme) = table.cell(i, THEME_COLUMN).non_blank() else {
            continue;
        };
        report.push_str(&format!("\n### {}\n", theme));
        if let Some(score) = table.cell(i, SCORE_COLUMN).non_blank() {
            report.push_str(&format!("- Score: {}\n", score));
        }
        if let Some(rate) = table.cell(i, PARTICIPATION_COLUMN).non_blank() {
            report.push_str(&format!("- Participation Rate: {}\n", rate));
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Cell;
    use crate::overview::analyze_survey;

    #[test]
    fn markdown_download_layout() {
        let table = SurveyTable::new(
            vec!["Theme".into(), "Score".into(), "Participation_Rate".into()],
            vec![
                vec![Cell::text("Growth"), Cell::Number(8.0), Cell::text("85%")],
                vec![Cell::text("Culture"), Cell::Number(6.5), Cell::Empty],
                vec![Cell::Empty, Cell::Number(1.0), Cell::Empty],
            ],
        );
        let insights = analyze_survey(&table);
        let md = survey_report_markdown(&insights, &table);

        assert!(md.starts_with("# Survey Theme Analysis Report\n\n## Survey Theme Analysis Report\n"));
        assert!(md.contains("## Data Summary\n- Total Themes Analyzed: 3\n"));
        assert!(md.contains("- Score Range: 1.0 - 8.0\n"));
        assert!(md.contains("- Average Participation: 85.0%\n"));
        assert!(md.ends_with(
            "## Theme Details\n\n### Growth\n- Score: 8.0\n- Participation Rate: 85%\n\n### Culture\n- Score: 6.5\n"
        ));
    }
}
