//! # Classification Module
//!
//! Filename heuristics that route each upload to a team and a section.
//!
//! - Matching is case-insensitive substring containment
//! - The first matching team keyword wins, in directory order
//! - Section keywords are checked comments → themes → questions
//! - No content sniffing: the filename alone decides

use crate::primitives::{COMMENT_FILE_KEYWORDS, QUESTION_FILE_KEYWORDS, THEME_FILE_KEYWORDS};
use crate::{Section, SurveyError};
use serde::{Deserialize, Serialize};

// =============================================================================
// TEAM DIRECTORY
// =============================================================================

/// A team and the filename keywords that identify it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSpec {
    /// Display name, e.g. "Build Team".
    pub name: String,
    /// Lowercase filename keywords, checked in order.
    pub keywords: Vec<String>,
}

impl TeamSpec {
    /// Create a team spec.
    #[must_use]
    pub fn new(name: impl Into<String>, keywords: &[&str]) -> Self {
        Self {
            name: name.into(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// URL- and filename-safe identifier for this team.
    #[must_use]
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }
}

/// Ordered keyword → team mapping.
///
/// Order is significant: a filename containing keywords of two teams is
/// assigned to the team listed first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamDirectory {
    teams: Vec<TeamSpec>,
}

impl Default for TeamDirectory {
    fn default() -> Self {
        Self {
            teams: vec![
                TeamSpec::new("Andrew's Team", &["andrew"]),
                TeamSpec::new("Build Team", &["build"]),
                TeamSpec::new("People and Marketing Team", &["people", "marketing", "hr"]),
                TeamSpec::new("Finance and Operations Team", &["operations", "finance"]),
            ],
        }
    }
}

impl TeamDirectory {
    /// Build a directory from explicit team specs.
    ///
    /// Rejects empty directories, duplicate names, and teams without keywords.
    pub fn new(teams: Vec<TeamSpec>) -> Result<Self, SurveyError> {
        if teams.is_empty() {
            return Err(SurveyError::Config("team directory is empty".to_string()));
        }
        for (i, team) in teams.iter().enumerate() {
            if team.name.trim().is_empty() {
                return Err(SurveyError::Config("team name must not be empty".to_string()));
            }
            if team.keywords.iter().all(|k| k.trim().is_empty()) {
                return Err(SurveyError::Config(format!(
                    "team '{}' has no filename keywords",
                    team.name
                )));
            }
            if teams[..i].iter().any(|t| t.name == team.name) {
                return Err(SurveyError::Config(format!(
                    "team '{}' is listed twice",
                    team.name
                )));
            }
        }
        let teams = teams
            .into_iter()
            .map(|t| TeamSpec {
                keywords: t
                    .keywords
                    .iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect(),
                name: t.name,
            })
            .collect();
        Ok(Self { teams })
    }

    /// Teams in directory order.
    #[must_use]
    pub fn teams(&self) -> &[TeamSpec] {
        &self.teams
    }

    /// Team names in directory order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.teams.iter().map(|t| t.name.as_str())
    }

    /// Detect the team a filename belongs to.
    #[must_use]
    pub fn detect_team(&self, filename: &str) -> Option<&TeamSpec> {
        let lower = filename.to_lowercase();
        self.teams
            .iter()
            .find(|team| team.keywords.iter().any(|k| lower.contains(k.as_str())))
    }

    /// Resolve a team by exact name, slug, or case-insensitive name.
    #[must_use]
    pub fn resolve(&self, query: &str) -> Option<&TeamSpec> {
        let query = query.trim();
        self.teams
            .iter()
            .find(|t| t.name == query)
            .or_else(|| self.teams.iter().find(|t| t.slug() == query))
            .or_else(|| {
                self.teams
                    .iter()
                    .find(|t| t.name.eq_ignore_ascii_case(query))
            })
    }

    /// Classify an uploaded file by its name.
    #[must_use]
    pub fn categorize(&self, filename: &str) -> FileCategory {
        FileCategory {
            filename: filename.to_string(),
            team: self.detect_team(filename).map(|t| t.name.clone()),
            section: detect_section(filename),
        }
    }
}

// =============================================================================
// FILE CATEGORY
// =============================================================================

/// Result of classifying one filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCategory {
    /// The original filename.
    pub filename: String,
    /// Detected team name, if any keyword matched.
    pub team: Option<String>,
    /// Detected section (`General` when no keyword matched).
    pub section: Section,
}

impl FileCategory {
    /// True when the file can be stored: team known and section analyzed.
    #[must_use]
    pub fn is_routable(&self) -> bool {
        self.team.is_some() && self.section != Section::General
    }
}

/// Detect the section from filename keywords.
#[must_use]
pub fn detect_section(filename: &str) -> Section {
    let lower = filename.to_lowercase();
    let has_any = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if has_any(COMMENT_FILE_KEYWORDS) {
        Section::Comments
    } else if has_any(THEME_FILE_KEYWORDS) {
        Section::Themes
    } else if has_any(QUESTION_FILE_KEYWORDS) {
        Section::Questions
    } else {
        Section::General
    }
}

/// Turn a team name into a lowercase identifier: spaces become `_`,
/// apostrophes are dropped.
#[must_use]
pub fn slugify(name: &str) -> String {
    name.replace(' ', "_").replace('\'', "").to_lowercase()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_directory_routes_examples() {
        let dir = TeamDirectory::default();

        let cat = dir.categorize("andrew_themes.xlsx");
        assert_eq!(cat.team.as_deref(), Some("Andrew's Team"));
        assert_eq!(cat.section, Section::Themes);

        let cat = dir.categorize("Build_Comments.xlsx");
        assert_eq!(cat.team.as_deref(), Some("Build Team"));
        assert_eq!(cat.section, Section::Comments);

        let cat = dir.categorize("people_questions.xlsx");
        assert_eq!(cat.team.as_deref(), Some("People and Marketing Team"));
        assert_eq!(cat.section, Section::Questions);

        let cat = dir.categorize("finance_themes.xlsx");
        assert_eq!(cat.team.as_deref(), Some("Finance and Operations Team"));
    }

    #[test]
    fn comments_win_over_other_sections() {
        assert_eq!(detect_section("themes_feedback.csv"), Section::Comments);
        assert_eq!(detect_section("survey_topics.csv"), Section::Themes);
        assert_eq!(detect_section("form.csv"), Section::Questions);
        assert_eq!(detect_section("results.csv"), Section::General);
    }

    #[test]
    fn first_team_in_directory_order_wins() {
        let dir = TeamDirectory::default();
        let cat = dir.categorize("people_build_themes.xlsx");
        assert_eq!(cat.team.as_deref(), Some("Build Team"));
    }

    #[test]
    fn unknown_team_is_not_routable() {
        let dir = TeamDirectory::default();
        let cat = dir.categorize("sales_themes.xlsx");
        assert!(cat.team.is_none());
        assert!(!cat.is_routable());

        let cat = dir.categorize("build_results.xlsx");
        assert_eq!(cat.section, Section::General);
        assert!(!cat.is_routable());
    }

    #[test]
    fn slugs_and_resolution() {
        let dir = TeamDirectory::default();
        assert_eq!(slugify("Andrew's Team"), "andrews_team");
        assert_eq!(
            dir.resolve("people_and_marketing_team").map(|t| t.name.as_str()),
            Some("People and Marketing Team")
        );
        assert_eq!(
            dir.resolve("build team").map(|t| t.name.as_str()),
            Some("Build Team")
        );
        assert!(dir.resolve("sales").is_none());
    }

    #[test]
    fn directory_validation() {
        assert!(TeamDirectory::new(Vec::new()).is_err());
        assert!(TeamDirectory::new(vec![TeamSpec::new("A", &[])]).is_err());
        assert!(
            TeamDirectory::new(vec![TeamSpec::new("A", &["a"]), TeamSpec::new("A", &["b"])])
                .is_err()
        );
        let dir = TeamDirectory::new(vec![TeamSpec::new("Sales", &[" SALES "])])
            .expect("valid directory");
        assert_eq!(
            dir.categorize("q3_sales_survey.xlsx").team.as_deref(),
            Some("Sales")
        );
    }
}
