//! # Keyword Sentiment
//!
//! Lexicon-based classification of free-text comments.
//!
//! A comment is positive when it contains more distinct positive words than
//! negative ones, negative in the opposite case, neutral otherwise. Matching
//! is lowercase substring containment, so "unclear" also counts as "clear".
//! Topic mentions use the same containment test against [`TOPIC_KEYWORDS`].

use crate::primitives::{NEGATIVE_WORDS, NOT_SPECIFIED, POSITIVE_WORDS, TOPIC_KEYWORDS};
use crate::stats::percent;
use serde::{Deserialize, Serialize};

// =============================================================================
// CLASSIFICATION
// =============================================================================

/// Sentiment of a single comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Positive,
    Negative,
    Neutral,
}

/// Classify one lowercase comment.
#[must_use]
pub fn classify_comment(lower: &str) -> Polarity {
    let pos = POSITIVE_WORDS.iter().filter(|w| lower.contains(*w)).count();
    let neg = NEGATIVE_WORDS.iter().filter(|w| lower.contains(*w)).count();
    match pos.cmp(&neg) {
        std::cmp::Ordering::Greater => Polarity::Positive,
        std::cmp::Ordering::Less => Polarity::Negative,
        std::cmp::Ordering::Equal => Polarity::Neutral,
    }
}

// =============================================================================
// SUMMARY
// =============================================================================

/// Aggregate sentiment over a set of comments.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SentimentSummary {
    /// Non-blank comments analyzed. Always `positive + negative + neutral`.
    pub total_comments: usize,
    pub positive_count: usize,
    pub negative_count: usize,
    pub neutral_count: usize,
    /// Mean comment length in characters.
    pub avg_length: f64,
    /// Up to three most mentioned topics with at least one mention.
    pub key_themes: Vec<String>,
    /// Mentions per topic, in lexicon order.
    pub theme_distribution: Vec<(String, usize)>,
}

/// Share of each polarity, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SentimentPercentages {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

/// Overall tone of a comment set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    PredominantlyPositive,
    Concerning,
    Neutral,
    Balanced,
}

impl Tone {
    /// Sentence fragment used in summaries ("Overall sentiment is ...").
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::PredominantlyPositive => "predominantly positive",
            Self::Concerning => "concerning with notable negative feedback",
            Self::Neutral => "neutral with mixed feelings",
            Self::Balanced => "balanced with varied perspectives",
        }
    }
}

impl SentimentSummary {
    /// True when there was nothing to analyze.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_comments == 0
    }

    /// Polarity shares in percent (all zero when empty).
    #[must_use]
    pub fn percentages(&self) -> SentimentPercentages {
        SentimentPercentages {
            positive: percent(self.positive_count, self.total_comments),
            negative: percent(self.negative_count, self.total_comments),
            neutral: percent(self.neutral_count, self.total_comments),
        }
    }

    /// Overall tone, checked in order: positive, concerning, neutral.
    #[must_use]
    pub fn tone(&self) -> Tone {
        let pct = self.percentages();
        if pct.positive > 60.0 {
            Tone::PredominantlyPositive
        } else if pct.negative > 40.0 {
            Tone::Concerning
        } else if pct.neutral > 50.0 {
            Tone::Neutral
        } else {
            Tone::Balanced
        }
    }

    /// True when `topic` is among the key themes.
    #[must_use]
    pub fn has_key_theme(&self, topic: &str) -> bool {
        self.key_themes.iter().any(|t| t == topic)
    }
}

/// Analyze a set of comments. Blank comments are ignored entirely.
#[must_use]
pub fn analyze_sentiment<S: AsRef<str>>(comments: &[S]) -> SentimentSummary {
    let mut summary = SentimentSummary {
        theme_distribution: TOPIC_KEYWORDS
            .iter()
            .map(|(topic, _)| ((*topic).to_string(), 0))
            .collect(),
        ..SentimentSummary::default()
    };
    let mut total_length = 0usize;

    for comment in comments {
        let comment = comment.as_ref();
        if comment.trim().is_empty() {
            continue;
        }
        let lower = comment.to_lowercase();
        summary.total_comments += 1;
        total_length += lower.chars().count();

        match classify_comment(&lower) {
            Polarity::Positive => summary.positive_count += 1,
            Polarity::Negative => summary.negative_count += 1,
            Polarity::Neutral => summary.neutral_count += 1,
        }

        for ((_, keywords), (_, mentions)) in
            TOPIC_KEYWORDS.iter().zip(summary.theme_distribution.iter_mut())
        {
            if keywords.iter().any(|k| lower.contains(k)) {
                *mentions += 1;
            }
        }
    }

    if summary.total_comments > 0 {
        summary.avg_length = total_length as f64 / summary.total_comments as f64;
    }

    let mut ranked = summary.theme_distribution.clone();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    summary.key_themes = ranked
        .into_iter()
        .take(3)
        .filter(|(_, count)| *count > 0)
        .map(|(topic, _)| topic)
        .collect();

    summary
}

// =============================================================================
// PER-THEME BREAKDOWN
// =============================================================================

/// Status of a theme by its positive share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThemeStatus {
    Positive,
    Mixed,
    NeedsAttention,
}

impl ThemeStatus {
    /// Classify a positive percentage.
    #[must_use]
    pub fn of(positive_pct: f64) -> Self {
        if positive_pct > 60.0 {
            Self::Positive
        } else if positive_pct < 40.0 {
            Self::NeedsAttention
        } else {
            Self::Mixed
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Mixed => "Mixed",
            Self::NeedsAttention => "Needs Attention",
        }
    }
}

/// Sentiment of the comments under one theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeSentiment {
    pub theme: String,
    pub total: usize,
    pub positive_pct: f64,
    pub status: ThemeStatus,
}

/// Per-theme sentiment for grouped comments.
///
/// Empty unless there is more than one theme; "Not specified" and themes
/// whose comments are all blank are skipped.
#[must_use]
pub fn theme_breakdown(by_theme: &[(String, Vec<String>)]) -> Vec<ThemeSentiment> {
    if by_theme.len() <= 1 {
        return Vec::new();
    }
    by_theme
        .iter()
        .filter(|(theme, _)| theme != NOT_SPECIFIED)
        .filter_map(|(theme, comments)| {
            let summary = analyze_sentiment(comments);
            if summary.is_empty() {
                return None;
            }
            let positive_pct = summary.percentages().positive;
            Some(ThemeSentiment {
                theme: theme.clone(),
                total: summary.total_comments,
                positive_pct,
                status: ThemeStatus::of(positive_pct),
            })
        })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================
