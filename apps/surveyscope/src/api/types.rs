//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use base64::Engine;
use serde::{Deserialize, Serialize};
use surveyscope_core::comments::fallback_comments;
use surveyscope_core::overview::dashboard_stats;
use surveyscope_core::sentiment::theme_breakdown;
use surveyscope_core::{
    Chart, DashboardStats, FileCategory, IngestOutcome, IngestWarning, Insight,
    QuestionRecord, QuestionThemeSummary, QuestionsAnalysis, Section, SentimentSummary,
    SurveyInsights, SurveyTable, TeamData, ThemeScore, ThemeSentiment, ThemesAnalysis,
    UploadedFile, Workspace, analyze_comments, analyze_questions, analyze_sentiment,
    analyze_survey, analyze_themes, comments_by_theme, company_insights, question_theme_summary,
    survey_charts, survey_narrative, team_narrative_points, theme_score_summary,
};

/// Theme filter value meaning "no filter".
pub const ALL_THEMES: &str = "All Themes";

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// ERROR RESPONSE
// =============================================================================

/// Body of every failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: msg.into(),
        }
    }
}

// =============================================================================
// UPLOAD REQUEST/RESPONSE
// =============================================================================

/// One file of an upload, contents base64-encoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilePayload {
    pub name: String,
    pub content_base64: String,
}

impl FilePayload {
    /// Build a payload from raw bytes.
    pub fn from_bytes(name: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            name: name.into(),
            content_base64: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }

    /// Decode into an uploaded file.
    pub fn decode(&self) -> Result<UploadedFile, String> {
        base64::engine::general_purpose::STANDARD
            .decode(self.content_base64.trim())
            .map(|bytes| UploadedFile::new(self.name.clone(), bytes))
            .map_err(|e| format!("Error processing {}: invalid base64 content: {}", self.name, e))
    }
}

/// Batch upload request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadRequest {
    pub files: Vec<FilePayload>,
}

/// Batch upload response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    pub processed: Vec<FileCategory>,
    pub warnings: Vec<IngestWarning>,
    /// "{n}/{total} files processed successfully!"
    pub message: String,
}

impl From<IngestOutcome> for UploadResponse {
    fn from(outcome: IngestOutcome) -> Self {
        Self {
            success: !outcome.processed.is_empty(),
            message: outcome.summary(),
            processed: outcome.processed,
            warnings: outcome.warnings,
        }
    }
}

/// Response of mutations without a payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResponse {
    pub success: bool,
}

// =============================================================================
// TEAM VIEWS
// =============================================================================

/// Themes view of one team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemesResponse {
    pub team: String,
    pub sources: Vec<String>,
    pub analysis: ThemesAnalysis,
}

impl ThemesResponse {
    /// Themes view, or `None` when the team has no themes files.
    pub fn for_team(team: &TeamData) -> Option<Self> {
        if team.files(Section::Themes).is_empty() {
            return None;
        }
        Some(Self {
            team: team.name.clone(),
            sources: team.sources(Section::Themes),
            analysis: analyze_themes(&team.section_table(Section::Themes)),
        })
    }
}

/// Query string of the questions view.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionsQuery {
    pub theme: Option<String>,
}

/// Questions view of one team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionsResponse {
    pub team: String,
    pub sources: Vec<String>,
    /// Distinct themes available for filtering.
    pub themes: Vec<String>,
    /// Active theme filter, if any.
    pub theme: Option<String>,
    /// Records sorted by affirmation.
    pub records: Vec<QuestionRecord>,
    pub summary: Vec<QuestionThemeSummary>,
    /// Headers to show when no question column was found.
    pub available_columns: Vec<String>,
}

impl QuestionsResponse {
    /// Questions view, optionally filtered to one theme. `None` when the
    /// team has no questions files.
    pub fn for_team(team: &TeamData, theme: Option<&str>) -> Option<Self> {
        if team.files(Section::Questions).is_empty() {
            return None;
        }
        let analysis = analyze_questions(&team.section_table(Section::Questions));
        let theme = theme
            .map(str::trim)
            .filter(|t| !t.is_empty() && *t != ALL_THEMES)
            .map(str::to_string);
        let selected = match &theme {
            Some(t) => analysis.filter_theme(t),
            None => analysis.records.clone(),
        };

        Some(Self {
            team: team.name.clone(),
            sources: team.sources(Section::Questions),
            themes: analysis.themes(),
            theme,
            records: QuestionsAnalysis::sorted_by_affirmation(&selected),
            summary: question_theme_summary(&analysis.records),
            available_columns: analysis.available_columns,
        })
    }
}

/// Comments view of one team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentsResponse {
    pub team: String,
    pub sources: Vec<String>,
    pub comments: Vec<String>,
    pub sentiment: SentimentSummary,
    pub narrative: Vec<String>,
    pub theme_breakdown: Vec<ThemeSentiment>,
}

impl CommentsResponse {
    /// Comments view, or `None` when the team has no comments files.
    ///
    /// Row-based files are read first; when they yield nothing, every
    /// comment-like column is used instead.
    pub fn for_team(team: &TeamData) -> Option<Self> {
        if team.files(Section::Comments).is_empty() {
            return None;
        }
        let table = team.section_table(Section::Comments);
        let extraction = analyze_comments(&table);
        let comments = if extraction.records.is_empty() {
            fallback_comments(&table)
        } else {
            extraction.comments()
        };
        let sentiment = analyze_sentiment(&comments);

        Some(Self {
            team: team.name.clone(),
            sources: team.sources(Section::Comments),
            narrative: team_narrative_points(&sentiment, &team.name),
            theme_breakdown: theme_breakdown(&comments_by_theme(&extraction.records)),
            comments,
            sentiment,
        })
    }
}

// =============================================================================
// COMPANY VIEW
// =============================================================================

/// Company-wide view across every team.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyResponse {
    pub themes: Vec<ThemeScore>,
    pub questions: Vec<QuestionThemeSummary>,
    pub sentiment: Option<SentimentSummary>,
    pub insights: Vec<Insight>,
}

impl CompanyResponse {
    /// Combine every team's files per section.
    pub fn from_workspace(workspace: &Workspace) -> Self {
        let themes = theme_score_summary(&workspace.company_table(Section::Themes));
        let questions =
            question_theme_summary(&analyze_questions(&workspace.company_table(Section::Questions)).records);

        let comments = analyze_comments(&workspace.company_table(Section::Comments)).comments();
        let (sentiment, insights) = if comments.is_empty() {
            (None, Vec::new())
        } else {
            let summary = analyze_sentiment(&comments);
            let insights = company_insights(&summary, &comments);
            (Some(summary), insights)
        };

        Self {
            themes,
            questions,
            sentiment,
            insights,
        }
    }
}

// =============================================================================
// INSIGHTS
// =============================================================================

/// Single-table insights response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightsResponse {
    pub insights: SurveyInsights,
    pub narrative: String,
    pub charts: Vec<Chart>,
    pub dashboard: DashboardStats,
}

impl InsightsResponse {
    /// Analyze one theme/score/participation table.
    pub fn from_table(table: &SurveyTable) -> Self {
        let insights = analyze_survey(table);
        Self {
            narrative: survey_narrative(&insights),
            charts: survey_charts(table),
            dashboard: dashboard_stats(table),
            insights,
        }
    }
}

// =============================================================================
// PUBLISH
// =============================================================================

/// Publish request; a missing team publishes the company report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublishRequest {
    pub team: Option<String>,
    pub title: Option<String>,
}

/// Publish response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishResponse {
    pub success: bool,
    pub title: String,
    pub url: String,
}
