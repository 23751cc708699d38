//! # Fixed Vocabularies and Limits
//!
//! Hardcoded keyword lists and constants for the survey engine.
//!
//! These are compiled into the binary. Only the team directory is
//! configurable (see [`crate::classify::TeamDirectory`]); everything here is
//! fixed so that two runs over the same files produce the same analysis.

// =============================================================================
// FILENAME KEYWORDS
// =============================================================================

/// Filename keywords that mark a comments file. Checked first.
pub const COMMENT_FILE_KEYWORDS: &[&str] = &["comment", "feedback", "response"];

/// Filename keywords that mark a themes file. Checked second.
pub const THEME_FILE_KEYWORDS: &[&str] = &["theme", "topic", "category"];

/// Filename keywords that mark a questions file. Checked last.
pub const QUESTION_FILE_KEYWORDS: &[&str] = &["question", "survey", "form"];

// =============================================================================
// COLUMN DETECTION KEYWORDS
// =============================================================================

/// Header keywords for the question/affirmation column.
pub const QUESTION_COLUMN_KEYWORDS: &[&str] = &["question", "affirmation", "statement", "item"];

/// Header keywords for the theme column.
pub const THEME_COLUMN_KEYWORDS: &[&str] = &["theme", "category", "domain"];

/// Header keywords for the score column. Internal (`_`) headers are skipped.
pub const SCORE_COLUMN_KEYWORDS: &[&str] = &["score", "rating", "value"];

/// Header keywords for the row-based comment column.
pub const COMMENT_COLUMN_KEYWORDS: &[&str] = &["comment", "feedback", "response", "text", "opinion"];

/// Header keywords for the column-based comment fallback.
pub const FALLBACK_COMMENT_COLUMN_KEYWORDS: &[&str] =
    &["comment", "feedback", "response", "text", "opinion", "note"];

/// Text columns never treated as comments by the fallback.
pub const NON_COMMENT_COLUMNS: &[&str] = &["team", "name", "id"];

/// Placeholder used for missing themes and affirmations.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Display value for a question without a score.
pub const NO_SCORE: &str = "No score";

// =============================================================================
// SENTIMENT LEXICONS
// =============================================================================

/// Words that count toward positive sentiment.
pub const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "excellent", "amazing", "wonderful", "fantastic", "outstanding", "perfect",
    "love", "like", "appreciate", "satisfied", "happy", "pleased", "impressed", "positive",
    "strong", "effective", "successful", "helpful", "supportive", "clear", "transparent",
    "collaborative", "innovative", "efficient", "smooth", "well", "better", "improved",
    "progress", "growth", "success", "achievement", "opportunity", "benefit",
];

/// Words that count toward negative sentiment.
pub const NEGATIVE_WORDS: &[&str] = &[
    "bad", "terrible", "awful", "horrible", "disappointing", "frustrating", "annoying",
    "hate", "dislike", "unsatisfied", "unhappy", "disappointed", "concerned", "worried",
    "problem", "issue", "challenge", "difficulty", "confusion", "unclear", "poor",
    "ineffective", "unsuccessful", "lacking", "missing", "insufficient", "inadequate",
    "slow", "delayed", "complicated", "confusing", "overwhelming", "stressful",
];

/// Topic groups tracked per comment, in ranking order.
pub const TOPIC_KEYWORDS: &[(&str, &[&str])] = &[
    ("communication", &["communication", "communicate", "talk", "discuss", "meeting", "update"]),
    ("leadership", &["leadership", "leader", "management", "manager", "direction", "guidance"]),
    ("teamwork", &["team", "collaboration", "together", "support", "help", "cooperation"]),
    ("processes", &["process", "procedure", "workflow", "system", "method", "approach"]),
    ("growth", &["growth", "development", "learning", "training", "skill", "improve"]),
    ("workload", &["workload", "busy", "time", "deadline", "pressure", "stress"]),
    ("resources", &["resource", "tool", "equipment", "budget", "funding", "support"]),
    ("culture", &["culture", "environment", "atmosphere", "morale", "values", "mission"]),
];

// =============================================================================
// ORGANIZATIONAL INSIGHT CATEGORIES
// =============================================================================

/// Keyword categories for company-wide insights, in ranking order.
pub const INSIGHT_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "workload_time",
        &[
            "time", "hours", "workload", "overload", "busy", "deadline", "pressure", "stress",
            "overwhelmed", "capacity", "bandwidth",
        ],
    ),
    (
        "clarity_vision",
        &[
            "uncertainty", "unclear", "vision", "direction", "confused", "clarity", "priorities",
            "goals", "strategy", "roadmap", "purpose",
        ],
    ),
    (
        "culture_engagement",
        &[
            "culture", "events", "engagement", "fun", "team", "connection", "balance", "office",
            "workplace", "morale", "atmosphere",
        ],
    ),
    (
        "communication",
        &[
            "communication", "feedback", "transparent", "updates", "information", "know",
            "understand", "listening", "sharing",
        ],
    ),
    (
        "growth_development",
        &[
            "growth", "development", "learning", "career", "skills", "opportunities",
            "advancement", "training", "mentorship",
        ],
    ),
    (
        "leadership_management",
        &[
            "leadership", "management", "support", "guidance", "decision", "leader", "manager",
            "supervisor",
        ],
    ),
    (
        "resources_tools",
        &["resources", "tools", "budget", "equipment", "technology", "support", "infrastructure"],
    ),
    (
        "process_efficiency",
        &["process", "efficiency", "workflow", "procedures", "systems", "organization", "structure"],
    ),
];

/// Words that mark a category mention as positive context.
pub const POSITIVE_CONTEXT_WORDS: &[&str] =
    &["good", "great", "excellent", "positive", "love", "appreciate", "satisfied"];

/// Words that mark a category mention as negative context.
pub const NEGATIVE_CONTEXT_WORDS: &[&str] =
    &["bad", "poor", "lack", "need", "problem", "issue", "concern", "difficult"];

// =============================================================================
// SCORE BANDS
// =============================================================================

/// Scores at or above this are highlighted as strong.
pub const HIGH_SCORE_THRESHOLD: f64 = 4.0;

/// Scores at or below this are highlighted as weak.
pub const LOW_SCORE_THRESHOLD: f64 = 2.5;

/// Participation at or above this is high engagement.
pub const HIGH_PARTICIPATION: f64 = 0.75;

/// Participation at or below this is low engagement.
pub const LOW_PARTICIPATION: f64 = 0.5;

// =============================================================================
// INPUT LIMITS
// =============================================================================

/// Maximum size of a single uploaded file (25 MB).
pub const MAX_FILE_SIZE: usize = 25 * 1024 * 1024;

/// Number of rows shown in the themes overview table.
pub const THEME_TABLE_ROWS: usize = 20;

/// Number of bars in top-theme charts.
pub const TOP_THEME_BARS: usize = 10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexicon_sizes() {
        assert_eq!(POSITIVE_WORDS.len(), 36);
        assert_eq!(NEGATIVE_WORDS.len(), 33);
        assert_eq!(TOPIC_KEYWORDS.len(), 8);
        assert!(TOPIC_KEYWORDS.iter().all(|(_, words)| words.len() == 6));
    }

    #[test]
    fn lexicons_are_lowercase() {
        for word in POSITIVE_WORDS.iter().chain(NEGATIVE_WORDS) {
            assert_eq!(*word, word.to_lowercase());
        }
    }
}
