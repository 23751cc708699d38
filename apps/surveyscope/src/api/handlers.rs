//! # API Endpoint Handlers
//!
//! Every handler takes the workspace lock only for as long as it reads or
//! mutates tables; the Docs round-trip in [`publish_handler`] runs unlocked.

use super::{
    AppState,
    types::{
        AckResponse, CommentsResponse, CompanyResponse, ErrorResponse, FilePayload,
        HealthResponse, InsightsResponse, PublishRequest, PublishResponse, QuestionsQuery,
        QuestionsResponse, ThemesResponse, UploadRequest, UploadResponse,
    },
};
use crate::docs_client::{DocsClient, DocsError};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::{Local, NaiveDate};
use surveyscope_core::report::{
    SURVEY_REPORT_FILENAME, company_report_filename, company_report_title, survey_pdf_filename,
    team_report_filename, team_report_title,
};
use surveyscope_core::{
    IngestWarning, Section, SurveyError, SurveyTable, TeamData, Workspace, analyze_survey,
    company_report, read_table, render_survey_pdf, survey_report_markdown, team_report,
};

// =============================================================================
// HELPERS
// =============================================================================

fn error(status: StatusCode, msg: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(msg))).into_response()
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// 404 for teams outside the directory.
fn find_team<'a>(workspace: &'a Workspace, slug: &str) -> Result<&'a TeamData, Response> {
    workspace
        .team(slug)
        .map_err(|e| error(StatusCode::NOT_FOUND, e.to_string()))
}

fn no_section_data(team: &TeamData, section: Section) -> Response {
    error(
        StatusCode::NOT_FOUND,
        format!(
            "No {} data available for {}",
            section.name().to_lowercase(),
            team.name
        ),
    )
}

/// Decode and parse a single-table upload.
fn payload_table(payload: &FilePayload) -> Result<SurveyTable, Response> {
    let file = payload
        .decode()
        .map_err(|msg| error(StatusCode::BAD_REQUEST, msg))?;
    read_table(&file.name, &file.bytes).map_err(|e| {
        error(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("Error processing {}: {}", file.name, e),
        )
    })
}

fn attachment(content_type: &'static str, filename: &str, body: impl IntoResponse) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response()
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// WORKSPACE HANDLERS
// =============================================================================

/// Ingest a batch of files. Undecodable payloads become warnings like any
/// other rejected file.
pub async fn upload_handler(
    State(state): State<AppState>,
    Json(request): Json<UploadRequest>,
) -> impl IntoResponse {
    let mut files = Vec::with_capacity(request.files.len());
    let mut decode_warnings = Vec::new();
    for payload in &request.files {
        match payload.decode() {
            Ok(file) => files.push(file),
            Err(message) => {
                tracing::warn!(file = %payload.name, "{}", message);
                decode_warnings.push(IngestWarning {
                    filename: payload.name.clone(),
                    message,
                });
            }
        }
    }

    let mut outcome = state.workspace.write().await.ingest(&files);
    outcome.total += decode_warnings.len();
    outcome.warnings.splice(0..0, decode_warnings);

    (StatusCode::OK, Json(UploadResponse::from(outcome)))
}

/// Drop all stored uploads.
pub async fn clear_handler(State(state): State<AppState>) -> impl IntoResponse {
    state.workspace.write().await.clear();
    tracing::info!("Workspace cleared");
    Json(AckResponse { success: true })
}

/// Per-team availability and company counts.
pub async fn overview_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.workspace.read().await.overview())
}

// =============================================================================
// TEAM HANDLERS
// =============================================================================

/// Themes view of one team.
pub async fn themes_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Response {
    let workspace = state.workspace.read().await;
    let team = match find_team(&workspace, &slug) {
        Ok(t) => t,
        Err(resp) => return resp,
    };
    match ThemesResponse::for_team(team) {
        Some(view) => Json(view).into_response(),
        None => no_section_data(team, Section::Themes),
    }
}

/// Questions view of one team, optionally filtered by `?theme=`.
pub async fn questions_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<QuestionsQuery>,
) -> Response {
    let workspace = state.workspace.read().await;
    let team = match find_team(&workspace, &slug) {
        Ok(t) => t,
        Err(resp) => return resp,
    };
    match QuestionsResponse::for_team(team, query.theme.as_deref()) {
        Some(view) => Json(view).into_response(),
        None => no_section_data(team, Section::Questions),
    }
}

/// Comments view of one team.
pub async fn comments_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Response {
    let workspace = state.workspace.read().await;
    let team = match find_team(&workspace, &slug) {
        Ok(t) => t,
        Err(resp) => return resp,
    };
    match CommentsResponse::for_team(team) {
        Some(view) => Json(view).into_response(),
        None => no_section_data(team, Section::Comments),
    }
}

/// Company-wide view.
pub async fn company_handler(State(state): State<AppState>) -> impl IntoResponse {
    let workspace = state.workspace.read().await;
    Json(CompanyResponse::from_workspace(&workspace))
}

// =============================================================================
// REPORT HANDLERS
// =============================================================================

const MARKDOWN: &str = "text/markdown; charset=utf-8";

/// Team report download.
pub async fn team_report_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Response {
    let workspace = state.workspace.read().await;
    let team = match find_team(&workspace, &slug) {
        Ok(t) => t,
        Err(resp) => return resp,
    };
    let date = today();
    attachment(
        MARKDOWN,
        &team_report_filename(&team.name, date),
        team_report(team, date),
    )
}

/// Company report download.
pub async fn company_report_handler(State(state): State<AppState>) -> Response {
    let workspace = state.workspace.read().await;
    let date = today();
    attachment(
        MARKDOWN,
        &company_report_filename(date),
        company_report(&workspace, date),
    )
}

// =============================================================================
// INSIGHTS HANDLERS
// =============================================================================

/// Insights, narrative, charts and dashboard numbers for one table.
pub async fn insights_handler(Json(payload): Json<FilePayload>) -> Response {
    match payload_table(&payload) {
        Ok(table) => Json(InsightsResponse::from_table(&table)).into_response(),
        Err(resp) => resp,
    }
}

/// Markdown report for one table.
pub async fn insights_report_handler(Json(payload): Json<FilePayload>) -> Response {
    match payload_table(&payload) {
        Ok(table) => attachment(
            MARKDOWN,
            SURVEY_REPORT_FILENAME,
            survey_report_markdown(&analyze_survey(&table), &table),
        ),
        Err(resp) => resp,
    }
}

/// PDF report for one table.
pub async fn insights_pdf_handler(Json(payload): Json<FilePayload>) -> Response {
    let table = match payload_table(&payload) {
        Ok(t) => t,
        Err(resp) => return resp,
    };
    let now = Local::now().naive_local();
    match render_survey_pdf(&analyze_survey(&table), &table, now) {
        Ok(bytes) => attachment("application/pdf", &survey_pdf_filename(now.date()), bytes),
        Err(e) => {
            tracing::error!("PDF rendering failed: {}", e);
            error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

// =============================================================================
// PUBLISH HANDLER
// =============================================================================

/// Push a team or company report to Google Docs.
pub async fn publish_handler(
    State(state): State<AppState>,
    Json(request): Json<PublishRequest>,
) -> Response {
    let client = match DocsClient::from_config(&state.config.docs) {
        Ok(c) => c,
        Err(e) => return error(StatusCode::SERVICE_UNAVAILABLE, e.to_string()),
    };

    let date = today();
    let built: Result<(String, String), SurveyError> = {
        let workspace = state.workspace.read().await;
        match request.team.as_deref() {
            Some(slug) => workspace
                .team(slug)
                .map(|team| (team_report_title(&team.name, date), team_report(team, date))),
            None => Ok((company_report_title(date), company_report(&workspace, date))),
        }
    };
    let (default_title, markdown) = match built {
        Ok(b) => b,
        Err(e) => return error(StatusCode::NOT_FOUND, e.to_string()),
    };

    let title = request
        .title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(default_title);

    match client.create_document(&title, &markdown).await {
        Ok(url) => Json(PublishResponse {
            success: true,
            title,
            url,
        })
        .into_response(),
        Err(e @ DocsError::MissingToken) => error(StatusCode::SERVICE_UNAVAILABLE, e.to_string()),
        Err(e) => {
            tracing::error!("Publishing failed: {}", e);
            error(StatusCode::BAD_GATEWAY, e.to_string())
        }
    }
}
