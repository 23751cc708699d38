//! # CLI Command Implementations
//!
//! Every command that takes survey files reads them from disk, ingests them
//! into a fresh workspace and prints the same views the HTTP API serves.

use crate::api::{
    self, AppState, CommentsResponse, CompanyResponse, InsightsResponse, QuestionsResponse,
    ThemesResponse,
};
use crate::cli::ReportTarget;
use crate::config::AppConfig;
use crate::docs_client::DocsClient;
use chrono::Local;
use serde::Serialize;
use std::path::{Path, PathBuf};
use surveyscope_core::primitives::MAX_FILE_SIZE;
use surveyscope_core::report::{company_report_title, team_report_title};
use surveyscope_core::{
    IngestOutcome, QuestionsAnalysis, Section, SurveyError, TeamData, UploadedFile, Workspace,
    company_report, format_number, read_table, render_survey_pdf, survey_report_markdown,
    team_report,
};

// =============================================================================
// FILE VALIDATION
// =============================================================================

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), SurveyError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| SurveyError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(SurveyError::InvalidFile(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Canonicalize an input path and make sure it is a regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, SurveyError> {
    let canonical = path.canonicalize().map_err(|e| {
        SurveyError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(SurveyError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Canonicalize the parent of an output path.
fn validate_output_path(path: &Path) -> Result<PathBuf, SurveyError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        SurveyError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(SurveyError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| SurveyError::IoError("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

fn write_output(path: &Path, contents: &[u8]) -> Result<PathBuf, SurveyError> {
    let validated = validate_output_path(path)?;
    std::fs::write(&validated, contents)
        .map_err(|e| SurveyError::IoError(format!("Write '{}': {}", validated.display(), e)))?;
    Ok(validated)
}

/// File name as the user uploaded it, without directories.
fn upload_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// =============================================================================
// LOADING
// =============================================================================

/// Read one file from disk as an upload.
pub fn read_upload(path: &Path) -> Result<UploadedFile, SurveyError> {
    let validated = validate_file_path(path)?;
    validate_file_size(&validated, MAX_FILE_SIZE as u64)?;
    let bytes = std::fs::read(&validated)
        .map_err(|e| SurveyError::IoError(format!("Read '{}': {}", path.display(), e)))?;
    Ok(UploadedFile::new(upload_name(path), bytes))
}

/// Ingest files into a fresh workspace.
///
/// Unreadable paths become warnings, like files the engine rejects.
pub fn load_workspace(
    config: &AppConfig,
    files: &[PathBuf],
) -> Result<(Workspace, IngestOutcome), SurveyError> {
    let mut workspace = Workspace::new(config.directory()?);
    let mut uploads = Vec::with_capacity(files.len());
    let mut read_failures = Vec::new();

    for path in files {
        match read_upload(path) {
            Ok(upload) => uploads.push(upload),
            Err(e) => read_failures.push(surveyscope_core::IngestWarning {
                filename: upload_name(path),
                message: format!("Error processing {}: {}", upload_name(path), e),
            }),
        }
    }

    let mut outcome = workspace.ingest(&uploads);
    outcome.total += read_failures.len();
    outcome.warnings.splice(0..0, read_failures);
    Ok((workspace, outcome))
}

fn print_json<T: Serialize>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

fn print_outcome(outcome: &IngestOutcome) {
    for warning in &outcome.warnings {
        eprintln!("Warning: {}", warning.message);
    }
    println!("{}", outcome.summary());
    println!();
}

// =============================================================================
// CLASSIFY COMMAND
// =============================================================================

/// Show the team and section each filename maps to.
pub fn cmd_classify(config: &AppConfig, json_mode: bool, files: &[PathBuf]) -> Result<(), SurveyError> {
    let directory = config.directory()?;
    let categories: Vec<_> = files
        .iter()
        .map(|f| directory.categorize(&upload_name(f)))
        .collect();

    if json_mode {
        print_json(&categories);
        return Ok(());
    }

    println!("{:<40} {:<32} Section", "Filename", "Team");
    println!("{}", "-".repeat(84));
    for cat in &categories {
        println!(
            "{:<40} {:<32} {}",
            cat.filename,
            cat.team.as_deref().unwrap_or("(unknown)"),
            cat.section
        );
    }
    Ok(())
}

// =============================================================================
// OVERVIEW COMMAND
// =============================================================================

/// Ingest files and show per-team availability.
pub fn cmd_overview(config: &AppConfig, json_mode: bool, files: &[PathBuf]) -> Result<(), SurveyError> {
    let (workspace, outcome) = load_workspace(config, files)?;
    let overview = workspace.overview();

    if json_mode {
        print_json(&serde_json::json!({ "ingest": outcome, "overview": overview }));
        return Ok(());
    }

    print_outcome(&outcome);
    println!("Survey Overview");
    println!("===============");
    for team in &overview.teams {
        if team.file_count == 0 {
            println!("  {:<32} no data", team.name);
            continue;
        }
        let sections: Vec<&str> = team.sections.iter().map(|s| s.name()).collect();
        println!(
            "  {:<32} {} file(s): {}",
            team.name,
            team.file_count,
            sections.join(", ")
        );
    }
    println!();
    println!("Active teams:   {}", overview.active_teams);
    println!("Theme files:    {}", overview.theme_files);
    println!("Question files: {}", overview.question_files);
    println!("Comment files:  {}", overview.comment_files);
    Ok(())
}

// =============================================================================
// TEAM COMMAND
// =============================================================================

fn print_themes(view: &ThemesResponse) {
    println!("## Themes");
    println!("Sources: {}", view.sources.join(", "));
    if view.analysis.missing_theme_column {
        println!("No theme column found; showing raw rows.");
    }
    for row in &view.analysis.rows {
        let score = row.score.as_ref().map(|c| c.display()).unwrap_or_default();
        println!("  {:<40} {}", row.theme, score);
    }
    if !view.analysis.top_scores.is_empty() {
        println!("Top themes by average score:");
        for score in &view.analysis.top_scores {
            println!("  {:<40} {:.2} ({} responses)", score.theme, score.mean, score.count);
        }
    }
    println!();
}

fn print_questions(view: &QuestionsResponse) {
    println!("## Questions");
    println!("Sources: {}", view.sources.join(", "));
    if view.records.is_empty() && !view.available_columns.is_empty() {
        println!(
            "No question column found. Available columns: {}",
            view.available_columns.join(", ")
        );
    }
    if let Some(theme) = &view.theme {
        println!("Theme filter: {}", theme);
    }
    for (theme, records) in QuestionsAnalysis::grouped_by_theme(&view.records) {
        println!("  {}", theme);
        for record in &records {
            println!("    {} | {}", record.affirmation, record.score);
        }
    }
    if !view.summary.is_empty() {
        println!("Theme performance:");
        for s in &view.summary {
            println!(
                "  {:<40} {} ({} questions)",
                s.theme,
                s.score_text("No numeric scores"),
                s.count
            );
        }
    }
    println!();
}

fn print_comments(view: &CommentsResponse) {
    println!("## Comments");
    println!("Sources: {}", view.sources.join(", "));
    let pct = view.sentiment.percentages();
    println!(
        "{} comments: {}% positive, {}% negative, {}% neutral",
        view.sentiment.total_comments,
        format_number(pct.positive),
        format_number(pct.negative),
        format_number(pct.neutral)
    );
    for point in &view.narrative {
        println!("  - {}", point);
    }
    if !view.theme_breakdown.is_empty() {
        println!("By theme:");
        for t in &view.theme_breakdown {
            println!(
                "  {:<32} {} comments, {}% positive ({})",
                t.theme,
                t.total,
                format_number(t.positive_pct),
                t.status.label()
            );
        }
    }
    println!();
}

/// Analyze one team's uploads.
pub fn cmd_team(
    config: &AppConfig,
    json_mode: bool,
    team: &str,
    section: Option<&str>,
    theme: Option<&str>,
    files: &[PathBuf],
) -> Result<(), SurveyError> {
    let sections = match section {
        Some(s) => vec![Section::parse(s).ok_or_else(|| {
            SurveyError::Config(format!(
                "unknown section '{}' (expected themes, questions or comments)",
                s
            ))
        })?],
        None => Section::ANALYZED.to_vec(),
    };

    let (workspace, outcome) = load_workspace(config, files)?;
    let team = workspace.team(team)?;

    let themes = sections
        .contains(&Section::Themes)
        .then(|| ThemesResponse::for_team(team))
        .flatten();
    let questions = sections
        .contains(&Section::Questions)
        .then(|| QuestionsResponse::for_team(team, theme))
        .flatten();
    let comments = sections
        .contains(&Section::Comments)
        .then(|| CommentsResponse::for_team(team))
        .flatten();

    if json_mode {
        print_json(&serde_json::json!({
            "team": team.name,
            "ingest": outcome,
            "themes": themes,
            "questions": questions,
            "comments": comments,
        }));
        return Ok(());
    }

    print_outcome(&outcome);
    println!("# {}", team.name);
    println!();
    for section in &sections {
        match section {
            Section::Themes => match &themes {
                Some(view) => print_themes(view),
                None => print_missing(team, *section),
            },
            Section::Questions => match &questions {
                Some(view) => print_questions(view),
                None => print_missing(team, *section),
            },
            Section::Comments => match &comments {
                Some(view) => print_comments(view),
                None => print_missing(team, *section),
            },
            Section::General => {}
        }
    }
    Ok(())
}

fn print_missing(team: &TeamData, section: Section) {
    println!(
        "No {} data available for {}",
        section.name().to_lowercase(),
        team.name
    );
    println!();
}

// =============================================================================
// COMPANY COMMAND
// =============================================================================

/// Company-wide themes, questions and comments summaries.
pub fn cmd_company(config: &AppConfig, json_mode: bool, files: &[PathBuf]) -> Result<(), SurveyError> {
    let (workspace, outcome) = load_workspace(config, files)?;
    let view = CompanyResponse::from_workspace(&workspace);

    if json_mode {
        print_json(&serde_json::json!({ "ingest": outcome, "company": view }));
        return Ok(());
    }

    print_outcome(&outcome);
    println!("# Company-Wide Analysis");
    println!();

    println!("## Themes");
    if view.themes.is_empty() {
        println!("No theme scores available.");
    }
    for t in &view.themes {
        println!("  {:<40} {:.2} ({} responses)", t.theme, t.mean, t.count);
    }
    println!();

    println!("## Questions");
    if view.questions.is_empty() {
        println!("No question data available.");
    }
    for q in &view.questions {
        println!(
            "  {:<40} {} ({} questions)",
            q.theme,
            q.score_text("No numeric scores"),
            q.count
        );
    }
    println!();

    println!("## Comments");
    match &view.sentiment {
        Some(summary) => {
            let pct = summary.percentages();
            println!(
                "{} comments, sentiment is {} ({}% positive, {}% negative)",
                summary.total_comments,
                summary.tone().describe(),
                format_number(pct.positive),
                format_number(pct.negative)
            );
            for insight in &view.insights {
                println!("  {}: {}", insight.title, insight.description);
            }
        }
        None => println!("No comments available."),
    }
    Ok(())
}

// =============================================================================
// REPORT COMMAND
// =============================================================================

/// Build the Markdown for a report target, with its default document title.
fn build_report(workspace: &Workspace, target: &ReportTarget) -> Result<(String, String), SurveyError> {
    let date = Local::now().date_naive();
    match target {
        ReportTarget::Team(query) => {
            let team = workspace.team(query)?;
            Ok((team_report_title(&team.name, date), team_report(team, date)))
        }
        ReportTarget::Company => Ok((company_report_title(date), company_report(workspace, date))),
    }
}

/// Write a team or company Markdown report.
pub fn cmd_report(
    config: &AppConfig,
    target: &ReportTarget,
    output: &Path,
    files: &[PathBuf],
) -> Result<(), SurveyError> {
    let (workspace, outcome) = load_workspace(config, files)?;
    print_outcome(&outcome);

    let (_, markdown) = build_report(&workspace, target)?;
    let written = write_output(output, markdown.as_bytes())?;

    tracing::info!(path = %written.display(), "Report written");
    println!("Report written to {}", written.display());
    Ok(())
}

// =============================================================================
// INSIGHTS COMMAND
// =============================================================================

/// Single-table insights with optional Markdown and PDF downloads.
pub fn cmd_insights(
    json_mode: bool,
    file: &Path,
    markdown: Option<&Path>,
    pdf: Option<&Path>,
) -> Result<(), SurveyError> {
    let upload = read_upload(file)?;
    let table = read_table(&upload.name, &upload.bytes)?;
    let view = InsightsResponse::from_table(&table);

    if let Some(path) = markdown {
        let written = write_output(path, survey_report_markdown(&view.insights, &table).as_bytes())?;
        tracing::info!(path = %written.display(), "Markdown report written");
    }
    if let Some(path) = pdf {
        let bytes = render_survey_pdf(&view.insights, &table, Local::now().naive_local())?;
        let written = write_output(path, &bytes)?;
        tracing::info!(path = %written.display(), "PDF report written");
    }

    if json_mode {
        print_json(&view);
        return Ok(());
    }

    println!("Survey Insights: {}", upload.name);
    println!("================");
    println!("Total responses: {}", view.dashboard.total_responses);
    println!("Average score:   {:.2}", view.dashboard.average_score);
    println!("Unique themes:   {}", view.dashboard.unique_themes);
    println!();
    println!("{}", view.narrative);
    Ok(())
}

// =============================================================================
// PUBLISH COMMAND
// =============================================================================

/// Push a team or company report to Google Docs.
pub async fn cmd_publish(
    config: &AppConfig,
    json_mode: bool,
    target: &ReportTarget,
    title: Option<String>,
    files: &[PathBuf],
) -> Result<(), SurveyError> {
    let client = DocsClient::from_config(&config.docs)?;

    let (workspace, outcome) = load_workspace(config, files)?;
    if !json_mode {
        print_outcome(&outcome);
    }

    let (default_title, markdown) = build_report(&workspace, target)?;
    let title = title.filter(|t| !t.trim().is_empty()).unwrap_or(default_title);
    let url = client.create_document(&title, &markdown).await?;

    if json_mode {
        print_json(&serde_json::json!({ "success": true, "title": title, "url": url }));
    } else {
        println!("Published \"{}\"", title);
        println!("{}", url);
    }
    Ok(())
}

// =============================================================================
// SERVE COMMAND
// =============================================================================

/// Start the HTTP dashboard API.
pub async fn cmd_serve(
    mut config: AppConfig,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), SurveyError> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let publishing = config.docs_token().is_some();
    let team_count = config.teams.len();

    println!("Surveyscope Dashboard API Starting...");
    println!();
    println!("Configuration:");
    println!("  Address:    {}", addr);
    println!("  Teams:      {}", team_count);
    println!(
        "  Publishing: {}",
        if publishing { "enabled" } else { "disabled (no Docs token)" }
    );
    println!();
    println!("Endpoints:");
    println!("  POST   /upload              - Ingest base64-encoded files");
    println!("  DELETE /workspace           - Clear uploads");
    println!("  GET    /overview            - Team availability");
    println!("  GET    /teams/{{slug}}/...    - themes | questions | comments");
    println!("  GET    /company             - Company-wide view");
    println!("  GET    /reports/...         - Markdown report downloads");
    println!("  POST   /insights[/pdf]      - Single-table insights");
    println!("  POST   /publish             - Push a report to Google Docs");
    println!("  GET    /health              - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let state = AppState::new(config)?;
    api::run_server(&addr, state).await
}
