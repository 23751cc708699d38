//! # PDF Report
//!
//! Flowing-text PDF rendition of the survey insights report: Letter pages,
//! built-in Helvetica, word-wrapped paragraphs and explicit page breaks.
//!
//! Layout happens in two passes. [`survey_pdf_blocks`] decides the content
//! and is pure; rendering wraps and paginates it with `printpdf`.

use crate::overview::{
    PARTICIPATION_COLUMN, SCORE_COLUMN, SurveyInsights, THEME_COLUMN, format_participation,
    recommendations,
};
use crate::stats::{self, round_to};
use crate::types::format_number;
use crate::{SurveyError, SurveyTable};
use chrono::NaiveDateTime;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

const PAGE_WIDTH: f32 = 215.9;
const PAGE_HEIGHT: f32 = 279.4;
const MARGIN: f32 = 25.4;
const BOTTOM_MARGIN: f32 = 20.0;
const PT_TO_MM: f32 = 0.3528;
/// Average Helvetica glyph width as a fraction of the font size.
const GLYPH_WIDTH: f32 = 0.5;

const TITLE_SIZE: f32 = 24.0;
const HEADING_SIZE: f32 = 16.0;
const BODY_SIZE: f32 = 11.0;

// =============================================================================
// BLOCKS
// =============================================================================

/// One unit of PDF content.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Title(String),
    Heading(String),
    /// Bold single line.
    Label(String),
    Paragraph(String),
    /// Vertical gap in millimetres.
    Space(f32),
    PageBreak,
}

fn pct(part: usize, total: usize) -> String {
    format_number(round_to(stats::percent(part, total), 1))
}

/// Content of the survey PDF in reading order.
#[must_use]
pub fn survey_pdf_blocks(
    insights: &SurveyInsights,
    table: &SurveyTable,
    generated_at: NaiveDateTime,
) -> Vec<Block> {
    let mut blocks = vec![
        Block::Title("Survey Theme Analysis Report".into()),
        Block::Space(12.0),
        Block::Paragraph(format!("Generated on: {}", generated_at.format("%B %d, %Y"))),
        Block::Space(8.0),
        Block::Paragraph(format!("Total Themes Analyzed: {}", insights.total_rows)),
        Block::PageBreak,
        Block::Heading("Executive Summary".into()),
        Block::Paragraph(format!(
            "This comprehensive analysis examines {} survey themes, evaluating their performance \
             through score metrics and participation rates. The report provides insights into theme \
             effectiveness, engagement levels, and actionable recommendations for improvement.",
            insights.total_rows
        )),
        Block::Space(8.0),
    ];

    if let Some(s) = &insights.score {
        let distribution = if s.median >= 6.0 { "positive" } else { "moderate" };
        let variability = if s.std < 1.0 {
            "low"
        } else if s.std < 2.0 {
            "moderate"
        } else {
            "high"
        };
        blocks.extend([
            Block::Heading("Score Performance Analysis".into()),
            Block::Paragraph(format!(
                "The overall performance metrics reveal an average score of {} across all themes, \
                 with scores ranging from {} to {}. The median score of {} indicates a {} \
                 distribution of theme performance.",
                format_number(s.mean),
                format_number(s.min),
                format_number(s.max),
                format_number(s.median),
                distribution
            )),
            Block::Label("Performance Distribution:".into()),
            Block::Paragraph(format!(
                "- High-performing themes (top 25%): {} themes ({}%)",
                s.high_scores,
                pct(s.high_scores, s.count)
            )),
            Block::Paragraph(format!(
                "- Low-performing themes (bottom 25%): {} themes ({}%)",
                s.low_scores,
                pct(s.low_scores, s.count)
            )),
            Block::Paragraph(format!(
                "- Standard deviation: {}, indicating {} variability in scores",
                format_number(s.std),
                variability
            )),
            Block::Space(5.0),
        ]);
    }

    if let Some(p) = &insights.participation {
        let engagement = if p.median >= 0.7 {
            "strong"
        } else if p.median >= 0.5 {
            "moderate"
        } else {
            "low"
        };
        blocks.extend([
            Block::Heading("Participation Rate Analysis".into()),
            Block::Paragraph(format!(
                "Engagement analysis shows an average participation rate of {:.1}%, with \
                 participation ranging from {:.1}% to {:.1}%. The median participation rate of \
                 {:.1}% suggests {} overall engagement.",
                p.mean * 100.0,
                p.min * 100.0,
                p.max * 100.0,
                p.median * 100.0,
                engagement
            )),
            Block::Label("Engagement Distribution:".into()),
            Block::Paragraph(format!(
                "- High engagement themes (>=75% participation): {} themes ({}%)",
                p.high,
                pct(p.high, p.count)
            )),
            Block::Paragraph(format!(
                "- Low engagement themes (<=50% participation): {} themes ({}%)",
                p.low,
                pct(p.low, p.count)
            )),
            Block::Paragraph("- Remaining themes show moderate engagement levels".into()),
            Block::Space(5.0),
        ]);
    }

    if let Some(h) = &insights.highlights {
        blocks.extend([
            Block::Heading("Theme Performance Highlights".into()),
            Block::Label("Top Performing Theme:".into()),
            Block::Label(h.best.name.clone()),
            Block::Paragraph(format!(
                "Score: {} | Participation: {}",
                format_number(h.best.score),
                h.best.participation
            )),
            Block::Paragraph(
                "This theme demonstrates excellent performance with high scores and strong engagement."
                    .into(),
            ),
            Block::Space(3.0),
            Block::Label("Area for Improvement:".into()),
            Block::Label(h.worst.name.clone()),
            Block::Paragraph(format!(
                "Score: {} | Participation: {}",
                format_number(h.worst.score),
                h.worst.participation
            )),
            Block::Paragraph(
                "This theme requires attention to improve both content quality and engagement levels."
                    .into(),
            ),
            Block::Space(5.0),
        ]);
    }

    if !table.is_empty() {
        blocks.extend([
            Block::PageBreak,
            Block::Heading("Detailed Theme Breakdown".into()),
        ]);
        for i in 0..table.len() {
            let theme = table
                .cell(i, THEME_COLUMN)
                .non_blank()
                .unwrap_or_else(|| "N/A".to_string());
            let score = table
                .cell(i, SCORE_COLUMN)
                .non_blank()
                .unwrap_or_else(|| "N/A".to_string());
            let participation = format_participation(table.cell(i, PARTICIPATION_COLUMN));
            blocks.push(Block::Paragraph(format!(
                "{} | Score: {} | Participation Rate: {}",
                theme, score, participation
            )));
        }
        blocks.push(Block::Space(8.0));
    }

    blocks.extend([
        Block::PageBreak,
        Block::Heading("Strategic Recommendations".into()),
    ]);
    for (i, rec) in recommendations(insights).iter().enumerate() {
        blocks.push(Block::Paragraph(format!("{}. {}", i + 1, rec)));
        blocks.push(Block::Space(2.5));
    }

    blocks.extend([
        Block::Space(12.0),
        Block::Paragraph(format!(
            "This report was automatically generated by the Survey Narrative Generator on {}. \
             For questions or additional analysis, please consult with your survey administration team.",
            generated_at.format("%B %d, %Y at %I:%M %p")
        )),
    ]);
    blocks
}

// =============================================================================
// TEXT HELPERS
// =============================================================================

/// Replace glyphs the built-in fonts cannot show.
#[must_use]
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '≥' => out.push_str(">="),
            '≤' => out.push_str("<="),
            '•' => out.push('-'),
            '–' | '—' => out.push('-'),
            '‘' | '’' => out.push('\''),
            '“' | '”' => out.push('"'),
            c if c.is_ascii() => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

/// Greedy word wrap to at most `width` characters per line.
///
/// Words longer than `width` get a line of their own.
#[must_use]
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn chars_per_line(size: f32) -> usize {
    let usable = PAGE_WIDTH - 2.0 * MARGIN;
    (usable / (size * GLYPH_WIDTH * PT_TO_MM)).floor().max(1.0) as usize
}

fn line_height(size: f32) -> f32 {
    size * PT_TO_MM * 1.4
}

// =============================================================================
// RENDERING
// =============================================================================

struct Cursor {
    layer: PdfLayerReference,
    y: f32,
}

/// Render the survey insights report to PDF bytes.
pub fn render_survey_pdf(
    insights: &SurveyInsights,
    table: &SurveyTable,
    generated_at: NaiveDateTime,
) -> Result<Vec<u8>, SurveyError> {
    let blocks = survey_pdf_blocks(insights, table, generated_at);

    let (doc, page, layer) = PdfDocument::new(
        "Survey Theme Analysis Report",
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Layer 1",
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| SurveyError::Pdf(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| SurveyError::Pdf(e.to_string()))?;

    let top = PAGE_HEIGHT - MARGIN;
    let mut cursor = Cursor {
        layer: doc.get_page(page).get_layer(layer),
        y: top,
    };
    let new_page = |cursor: &mut Cursor| {
        let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        cursor.layer = doc.get_page(page).get_layer(layer);
        cursor.y = top;
    };

    for block in &blocks {
        let (text, size, font, before, after): (&str, f32, &IndirectFontRef, f32, f32) =
            match block {
                Block::Title(t) => (t, TITLE_SIZE, &bold, 0.0, 10.0),
                Block::Heading(t) => (t, HEADING_SIZE, &bold, 7.0, 4.0),
                Block::Label(t) => (t, BODY_SIZE, &bold, 0.0, 1.0),
                Block::Paragraph(t) => (t, BODY_SIZE, &regular, 0.0, 2.8),
                Block::Space(mm) => {
                    cursor.y -= *mm;
                    continue;
                }
                Block::PageBreak => {
                    new_page(&mut cursor);
                    continue;
                }
            };

        if cursor.y < top {
            cursor.y -= before;
        }
        let height = line_height(size);
        for line in wrap(&sanitize(text), chars_per_line(size)) {
            if cursor.y - height < BOTTOM_MARGIN {
                new_page(&mut cursor);
            }
            cursor.y -= height;
            cursor
                .layer
                .use_text(line, size, Mm(MARGIN), Mm(cursor.y), font);
        }
        cursor.y -= after;
    }

    tracing::debug!(blocks = blocks.len(), "rendering survey PDF");
    doc.save_to_bytes()
        .map_err(|e| SurveyError::Pdf(e.to_string()))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::Cell;
    use crate::overview::analyze_survey;
    use chrono::NaiveDate;

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 5)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap()
    }

    fn survey() -> SurveyTable {
        SurveyTable::new(
            vec!["Theme".into(), "Score".into(), "Participation_Rate".into()],
            vec![
                vec![Cell::text("Growth"), Cell::Number(8.0), Cell::text("85%")],
                vec![Cell::text("Culture"), Cell::Number(5.0), Cell::Number(0.4)],
                vec![Cell::Empty, Cell::Empty, Cell::Empty],
            ],
        )
    }

    #[test]
    fn wrap_respects_width() {
        let lines = wrap("one two three four five", 9);
        assert_eq!(lines, vec!["one two", "three", "four five"]);
        assert_eq!(wrap("averyveryverylongword x", 4), vec!["averyveryverylongword", "x"]);
        assert!(wrap("   ", 10).is_empty());
    }

    #[test]
    fn sanitize_replaces_symbols() {
        assert_eq!(sanitize("• ≥75% ≤50%"), "- >=75% <=50%");
        assert_eq!(sanitize("café"), "caf?");
    }

    #[test]
    fn blocks_follow_report_order() {
        let table = survey();
        let insights = analyze_survey(&table);
        let blocks = survey_pdf_blocks(&insights, &table, generated_at());

        assert_eq!(blocks[0], Block::Title("Survey Theme Analysis Report".into()));
        assert!(blocks.contains(&Block::Paragraph("Generated on: March 05, 2025".into())));
        assert!(blocks.contains(&Block::Paragraph(
            "N/A | Score: N/A | Participation Rate: N/A".into()
        )));
        assert!(blocks.contains(&Block::Paragraph(
            "Culture | Score: 5.0 | Participation Rate: 40.0%".into()
        )));

        let headings: Vec<&str> = blocks
            .iter()
            .filter_map(|b| match b {
                Block::Heading(h) => Some(h.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(
            headings,
            vec![
                "Executive Summary",
                "Score Performance Analysis",
                "Participation Rate Analysis",
                "Theme Performance Highlights",
                "Detailed Theme Breakdown",
                "Strategic Recommendations",
            ]
        );

        let Some(Block::Paragraph(footer)) = blocks.last() else {
            unreachable!("footer is always last");
        };
        assert!(footer.contains("on March 05, 2025 at 02:30 PM."));
    }

    #[test]
    fn recommendations_are_numbered() {
        let table = survey();
        let insights = analyze_survey(&table);
        let blocks = survey_pdf_blocks(&insights, &table, generated_at());
        assert!(blocks.iter().any(|b| matches!(
            b,
            Block::Paragraph(p) if p.starts_with("1. Focus on incremental improvements")
        )));
    }

    #[test]
    fn renders_pdf_bytes() {
        let table = survey();
        let insights = analyze_survey(&table);
        let bytes = render_survey_pdf(&insights, &table, generated_at()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
