//! # surveyscope-core
//!
//! The survey results engine for Surveyscope - THE LOGIC.
//!
//! Uploaded spreadsheets are routed to a team and a section by filename,
//! parsed into cleaned [`SurveyTable`]s and stored in a team-first
//! [`Workspace`]. Everything downstream (aggregation, keyword sentiment,
//! narratives, reports) is a pure function of those tables.
//!
//! ## Architectural Constraints
//!
//! - No async, no network dependencies (pure Rust)
//! - Deterministic: the same uploads and report date give byte-identical output
//! - A bad file is a warning, never a failed batch
//! - The document-service integration stops at request building; sending is
//!   the application's job

// =============================================================================
// MODULES
// =============================================================================

pub mod charts;
pub mod classify;
pub mod comments;
pub mod docs;
pub mod ingest;
pub mod narrative;
pub mod overview;
#[cfg(feature = "pdf")]
pub mod pdf;
pub mod primitives;
pub mod questions;
pub mod report;
pub mod sentiment;
pub mod stats;
pub mod table;
pub mod themes;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use table::SurveyTable;
pub use types::{Cell, Section, SurveyError, format_number};

// =============================================================================
// RE-EXPORTS: Ingestion
// =============================================================================

pub use classify::{FileCategory, TeamDirectory, TeamSpec, detect_section, slugify};
pub use ingest::{
    FileFormat, IngestOutcome, IngestWarning, SourceTable, TeamData, TeamOverview, UploadedFile,
    Workspace, WorkspaceOverview, read_table,
};

// =============================================================================
// RE-EXPORTS: Analysis
// =============================================================================

pub use comments::{CommentRecord, CommentsExtraction, analyze_comments, comments_by_theme};
pub use narrative::{Insight, company_insights, team_narrative_points};
pub use overview::{DashboardStats, SurveyInsights, Verdict, analyze_survey, survey_narrative};
pub use questions::{
    QuestionRecord, QuestionThemeSummary, QuestionsAnalysis, ScoreBand, ScoreValue,
    analyze_questions, question_theme_summary,
};
pub use sentiment::{SentimentSummary, ThemeSentiment, ThemeStatus, Tone, analyze_sentiment};
pub use themes::{ThemeScore, ThemesAnalysis, analyze_themes, theme_score_summary};

// =============================================================================
// RE-EXPORTS: Output
// =============================================================================

pub use charts::{Chart, ChartData, survey_charts};
pub use docs::{document_url, markdown_to_doc_requests};
#[cfg(feature = "pdf")]
pub use pdf::render_survey_pdf;
pub use report::{company_report, survey_report_markdown, team_report};
