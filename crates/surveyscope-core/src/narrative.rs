//! # Narrative Generation
//!
//! Turns a [`SentimentSummary`] into prose.
//!
//! - [`team_narrative_points`]: bold-prefixed bullet points for one team
//! - [`company_insights`]: titled organizational insights derived from
//!   keyword categories and the sentiment words that surround them
//!
//! Both are deterministic: the same comments always yield the same text.

use crate::primitives::{INSIGHT_CATEGORIES, NEGATIVE_CONTEXT_WORDS, POSITIVE_CONTEXT_WORDS};
use crate::sentiment::SentimentSummary;
use serde::{Deserialize, Serialize};

// =============================================================================
// TEAM NARRATIVE
// =============================================================================

/// Narrative bullet points for one team's comments.
///
/// Returns an empty list when there are no comments.
#[must_use]
pub fn team_narrative_points(summary: &SentimentSummary, team: &str) -> Vec<String> {
    if summary.is_empty() {
        return Vec::new();
    }

    let pct = summary.percentages();
    let (pos, neg) = (pct.positive, pct.negative);
    let has = |topic: &str| summary.has_key_theme(topic);
    let mut points = Vec::new();

    points.push(if pos > 70.0 {
        format!(
            "**Strong Positive Climate:** The team demonstrates exceptional satisfaction with {:.0}% of feedback being positive, indicating a healthy and motivated work environment.",
            pos
        )
    } else if pos > 50.0 {
        format!(
            "**Generally Positive Outlook:** With {:.0}% positive sentiment, the team shows good overall satisfaction, though there's room for addressing concerns.",
            pos
        )
    } else if neg > 40.0 {
        format!(
            "**Areas of Concern:** {:.0}% of feedback expresses dissatisfaction, suggesting significant challenges that require immediate attention and action.",
            neg
        )
    } else {
        format!(
            "**Mixed Perspectives:** The team shows balanced viewpoints with {:.0}% positive and {:.0}% negative sentiment, indicating diverse experiences.",
            pos, neg
        )
    });

    let avg = summary.avg_length;
    points.push(if avg > 150.0 {
        format!(
            "**High Engagement:** Detailed responses (avg {:.0} characters) show team members are deeply invested and willing to provide comprehensive feedback.",
            avg
        )
    } else if avg > 80.0 {
        "**Moderate Engagement:** Responses show thoughtful consideration with meaningful detail, indicating good participation in the feedback process.".to_string()
    } else {
        format!(
            "**Concise Feedback:** Brief responses (avg {:.0} characters) suggest either efficiency in communication or potential hesitancy to elaborate.",
            avg
        )
    });

    if summary.key_themes.len() >= 2 {
        points.push(if has("communication") && has("leadership") {
            "**Leadership & Communication Focus:** Comments frequently address leadership effectiveness and communication clarity, indicating these are priority areas for the team.".to_string()
        } else if has("teamwork") && has("culture") {
            "**Team Dynamics Emphasis:** Strong focus on collaborative relationships and workplace culture suggests team cohesion is a key concern.".to_string()
        } else if has("workload") && has("resources") {
            "**Operational Challenges:** Recurring mentions of workload and resource availability point to potential capacity or support issues.".to_string()
        } else if has("growth") {
            "**Development-Oriented:** Significant attention to professional growth and development opportunities shows a forward-thinking, ambitious team culture.".to_string()
        } else {
            format!(
                "**Key Focus Areas:** Team discussions center around {}, highlighting the primary concerns and interests of {}.",
                summary.key_themes.join(", "),
                team
            )
        });
    }

    if pos > 30.0 {
        let strengths: Vec<&str> = [
            (has("teamwork"), "collaborative relationships"),
            (has("leadership") && pos > 50.0, "leadership support"),
            (has("growth"), "development opportunities"),
            (has("culture") && pos > 50.0, "positive work environment"),
        ]
        .into_iter()
        .filter_map(|(hit, label)| hit.then_some(label))
        .collect();

        points.push(if strengths.is_empty() {
            "**Positive Momentum:** Despite challenges, team members recognize and value several aspects of their current work experience.".to_string()
        } else {
            format!(
                "**Strengths Highlighted:** Team members particularly appreciate {}, representing core strengths to build upon.",
                strengths.join(", ")
            )
        });
    }

    if neg > 20.0 {
        let concerns: Vec<&str> = [
            (has("communication") && neg > 30.0, "communication clarity and frequency"),
            (has("workload"), "workload management and balance"),
            (has("resources"), "resource availability and support"),
            (has("processes") && neg > 25.0, "workflow efficiency and procedures"),
        ]
        .into_iter()
        .filter_map(|(hit, label)| hit.then_some(label))
        .collect();

        points.push(if concerns.is_empty() {
            format!(
                "**Challenge Areas:** With {:.0}% of feedback indicating concerns, there are clear opportunities for enhancing the team experience.",
                neg
            )
        } else {
            format!(
                "**Improvement Opportunities:** Feedback consistently points to {} as areas requiring attention and strategic improvement.",
                concerns.join(", ")
            )
        });
    }

    if pct.neutral > 40.0 {
        points.push("**Observational Feedback:** A significant portion of responses are neutral, suggesting either satisfaction with status quo or a wait-and-see approach to changes.".to_string());
    }

    points
}

/// Remove Markdown emphasis markers (every `*`) from a narrative point.
#[must_use]
pub fn strip_emphasis(point: &str) -> String {
    point.replace('*', "")
}

// =============================================================================
// COMPANY INSIGHTS
// =============================================================================

/// A titled organizational insight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub title: String,
    pub description: String,
}

impl Insight {
    fn new(title: &str, description: String) -> Self {
        Self {
            title: title.to_string(),
            description,
        }
    }
}

/// Contextual mentions of one insight category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CategoryMentions {
    category: &'static str,
    positive: usize,
    negative: usize,
}

impl CategoryMentions {
    fn total(&self) -> usize {
        self.positive + self.negative
    }

    fn positive_ratio(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.positive as f64 / total as f64,
        }
    }
}

/// Score every category that appears at least once in the joined text.
fn score_categories(comments: &[String]) -> Vec<CategoryMentions> {
    let joined = comments.join(" ").to_lowercase();
    let lowered: Vec<String> = comments.iter().map(|c| c.to_lowercase()).collect();

    INSIGHT_CATEGORIES
        .iter()
        .filter(|(_, keywords)| keywords.iter().map(|k| joined.matches(k).count()).sum::<usize>() > 0)
        .map(|(category, keywords)| {
            let mentions: Vec<&String> = lowered
                .iter()
                .filter(|c| keywords.iter().any(|k| c.contains(k)))
                .collect();
            let with_any = |words: &[&str]| {
                mentions
                    .iter()
                    .filter(|c| words.iter().any(|w| c.contains(w)))
                    .count()
            };
            CategoryMentions {
                category: *category,
                positive: with_any(POSITIVE_CONTEXT_WORDS),
                negative: with_any(NEGATIVE_CONTEXT_WORDS),
            }
        })
        .collect()
}

fn insight_for(m: &CategoryMentions) -> Option<Insight> {
    let total = m.total();
    if total < 2 {
        return None;
    }
    let ratio = m.positive_ratio();
    let insight = match m.category {
        "workload_time" if ratio < 0.3 => Insight::new(
            "Workload & Time Management",
            format!(
                "Analysis of {} workload-related comments reveals significant concerns about time constraints and capacity. The predominantly negative sentiment ({} negative vs {} positive mentions) suggests this is impacting productivity and employee well-being.",
                total, m.negative, m.positive
            ),
        ),
        "workload_time" => Insight::new(
            "Workload Balance",
            format!(
                "Comments about workload and time management show mixed sentiment across {} mentions. While some challenges exist, there's recognition of efforts to manage capacity effectively.",
                total
            ),
        ),
        "clarity_vision" if ratio < 0.4 => Insight::new(
            "Organizational Clarity & Direction",
            format!(
                "Feedback indicates uncertainty about organizational direction appears in {} comments. The pattern suggests employees are seeking clearer communication about company vision, priorities, and strategic direction.",
                total
            ),
        ),
        "clarity_vision" => Insight::new(
            "Strategic Alignment",
            format!(
                "Comments about vision and direction show {} mentions with generally positive sentiment, indicating good alignment with organizational goals.",
                total
            ),
        ),
        "culture_engagement" if ratio < 0.5 => Insight::new(
            "Culture & Employee Engagement",
            format!(
                "Cultural and engagement themes appear in {} comments with mixed sentiment. Feedback suggests opportunities to enhance team connection, workplace atmosphere, and engagement initiatives.",
                total
            ),
        ),
        "culture_engagement" => Insight::new(
            "Positive Culture Momentum",
            format!(
                "Culture and engagement feedback across {} mentions shows predominantly positive sentiment, indicating strong team dynamics and workplace satisfaction.",
                total
            ),
        ),
        "communication" if ratio < 0.4 => Insight::new(
            "Communication & Information Sharing",
            format!(
                "Communication patterns emerge in {} comments, primarily highlighting needs for improved transparency, feedback mechanisms, and information flow across the organization.",
                total
            ),
        ),
        "communication" => Insight::new(
            "Communication Strengths",
            format!(
                "Communication feedback shows positive patterns across {} mentions, indicating effective information sharing and feedback processes.",
                total
            ),
        ),
        "growth_development" => Insight::new(
            "Professional Development Focus",
            format!(
                "Development and growth themes appear in {} comments, showing employee interest in career advancement, skill building, and learning opportunities within the organization.",
                total
            ),
        ),
        // leadership, resources and process categories rank but never
        // produce an insight of their own
        _ => return None,
    };
    Some(insight)
}

/// Organizational insights for a company-wide comment set.
///
/// Categories are ranked by contextual mentions (stable); the top four are
/// considered. Falls back to a single "Overall Comment Analysis" insight.
#[must_use]
pub fn company_insights(summary: &SentimentSummary, comments: &[String]) -> Vec<Insight> {
    let mut ranked = score_categories(comments);
    ranked.sort_by(|a, b| b.total().cmp(&a.total()));

    let insights: Vec<Insight> = ranked
        .iter()
        .take(4)
        .filter(|m| m.total() > 0)
        .filter_map(insight_for)
        .collect();

    if !insights.is_empty() {
        return insights;
    }

    let avg_length = if comments.is_empty() {
        0.0
    } else {
        comments.iter().map(|c| c.chars().count()).sum::<usize>() as f64 / comments.len() as f64
    };
    vec![Insight::new(
        "Overall Comment Analysis",
        format!(
            "Across {} comments with an average length of {:.0} characters, {:.0}% express positive sentiment. The feedback indicates engaged employees providing thoughtful input on their work experience.",
            comments.len(),
            avg_length,
            summary.percentages().positive
        ),
    )]
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::analyze_sentiment;

    fn summary(p: usize, n: usize, u: usize, avg: f64, themes: &[&str]) -> SentimentSummary {
        SentimentSummary {
            total_comments: p + n + u,
            positive_count: p,
            negative_count: n,
            neutral_count: u,
            avg_length: avg,
            key_themes: themes.iter().map(|t| (*t).to_string()).collect(),
            theme_distribution: Vec::new(),
        }
    }

    #[test]
    fn no_comments_no_points() {
        assert!(team_narrative_points(&SentimentSummary::default(), "Build Team").is_empty());
    }

    #[test]
    fn strong_positive_team() {
        let s = summary(8, 1, 1, 200.0, &["teamwork", "culture"]);
        let points = team_narrative_points(&s, "Build Team");
        assert!(points[0].starts_with("**Strong Positive Climate:**"));
        assert!(points[0].contains("80% of feedback"));
        assert!(points[1].contains("avg 200 characters"));
        assert!(points[2].starts_with("**Team Dynamics Emphasis:**"));
        assert_eq!(
            points[3],
            "**Strengths Highlighted:** Team members particularly appreciate collaborative relationships, positive work environment, representing core strengths to build upon."
        );
        assert_eq!(points.len(), 4);
    }

    #[test]
    fn concerning_team_with_generic_focus() {
        let s = summary(1, 5, 5, 40.0, &["processes", "communication"]);
        let points = team_narrative_points(&s, "Finance and Operations Team");
        assert!(points[0].starts_with("**Areas of Concern:** 45%"));
        assert!(points[1].starts_with("**Concise Feedback:**"));
        assert_eq!(
            points[2],
            "**Key Focus Areas:** Team discussions center around processes, communication, highlighting the primary concerns and interests of Finance and Operations Team."
        );
        assert!(points[3].contains("communication clarity and frequency, workflow efficiency and procedures"));
        assert!(points[4].starts_with("**Observational Feedback:**"));
    }

    #[test]
    fn challenge_areas_without_matching_topics() {
        let s = summary(4, 3, 3, 100.0, &["growth"]);
        let points = team_narrative_points(&s, "Build Team");
        assert!(points[0].starts_with("**Mixed Perspectives:**"));
        assert!(points[1].starts_with("**Moderate Engagement:**"));
        assert!(points[2].contains("development opportunities"));
        assert!(points[3].starts_with("**Challenge Areas:** With 30%"));
        assert_eq!(strip_emphasis(&points[3]).find('*'), None);
    }

    #[test]
    fn workload_insight_from_negative_context() {
        let comments: Vec<String> = [
            "Workload is a problem every sprint",
            "We need more time before each deadline",
            "The deadline pressure is a concern",
        ]
        .iter()
        .map(|s| (*s).to_string())
        .collect();
        let s = analyze_sentiment(&comments);
        let insights = company_insights(&s, &comments);
        assert_eq!(insights[0].title, "Workload & Time Management");
        assert!(insights[0].description.contains("(3 negative vs 0 positive mentions)"));
    }

    #[test]
    fn fallback_insight() {
        let comments = vec!["ok".to_string(), "fine".to_string()];
        let s = analyze_sentiment(&comments);
        let insights = company_insights(&s, &comments);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].title, "Overall Comment Analysis");
        assert!(insights[0].description.starts_with("Across 2 comments with an average length of 3 characters, 0%"));
    }
}
