//! # Ingest Module
//!
//! Parses uploaded files and stores them in a team-first [`Workspace`].
//!
//! - Spreadsheets (xlsx, xlsm, xls, xlsb, ods) are read with calamine,
//!   first worksheet only, first row as headers
//! - CSV files are read with the csv crate, ragged rows allowed
//! - Every file is handled independently: a failure becomes an
//!   [`IngestWarning`] and the batch continues

use crate::classify::{FileCategory, TeamDirectory};
use crate::primitives::MAX_FILE_SIZE;
use crate::{Cell, Section, SurveyError, SurveyTable};
use calamine::{Data, Reader};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

// =============================================================================
// PARSING
// =============================================================================

/// Supported upload formats, by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Any workbook format calamine understands.
    Spreadsheet,
    /// Comma-separated values.
    Csv,
}

impl FileFormat {
    /// Detect the format from a filename extension.
    pub fn from_filename(filename: &str) -> Result<Self, SurveyError> {
        let ext = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Ok(Self::Spreadsheet),
            "csv" => Ok(Self::Csv),
            _ => Err(SurveyError::UnsupportedFormat(filename.to_string())),
        }
    }
}

/// Parse one uploaded file into a cleaned table.
pub fn read_table(filename: &str, bytes: &[u8]) -> Result<SurveyTable, SurveyError> {
    if bytes.len() > MAX_FILE_SIZE {
        return Err(SurveyError::InvalidFile(format!(
            "file size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            MAX_FILE_SIZE
        )));
    }

    let table = match FileFormat::from_filename(filename)? {
        FileFormat::Spreadsheet => read_spreadsheet(bytes)?,
        FileFormat::Csv => read_csv(bytes)?,
    };
    Ok(table.clean())
}

fn read_spreadsheet(bytes: &[u8]) -> Result<SurveyTable, SurveyError> {
    let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| SurveyError::Spreadsheet(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SurveyError::Spreadsheet("workbook has no worksheets".to_string()))?
        .map_err(|e| SurveyError::Spreadsheet(e.to_string()))?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(SurveyTable::default());
    };

    let headers = header_row.iter().map(header_name).collect();
    let rows = rows.map(|row| row.iter().map(data_to_cell).collect()).collect();
    Ok(SurveyTable::new(headers, rows))
}

fn header_name(data: &Data) -> String {
    match data {
        Data::Empty => String::new(),
        other => data_to_cell(other).display(),
    }
}

fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::String(s) => Cell::text(s.clone()),
        Data::Error(_) => Cell::Empty,
        other => Cell::text(other.to_string()),
    }
}

fn read_csv(bytes: &[u8]) -> Result<SurveyTable, SurveyError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| SurveyError::Csv(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| SurveyError::Csv(e.to_string()))?;
        rows.push(record.iter().map(csv_cell).collect());
    }
    Ok(SurveyTable::new(headers, rows))
}

/// CSV fields are untyped; numeric-looking fields become numbers so that
/// text-column detection treats them like spreadsheet numbers.
fn csv_cell(field: &str) -> Cell {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return Cell::Empty;
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => Cell::Number(n),
        _ => Cell::text(field),
    }
}

// =============================================================================
// WORKSPACE
// =============================================================================

/// One stored upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceTable {
    /// Original filename.
    pub filename: String,
    /// Cleaned contents.
    pub table: SurveyTable,
}

/// All uploads of a single team, grouped by section.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TeamData {
    /// Team display name.
    pub name: String,
    /// Themes files.
    pub themes: Vec<SourceTable>,
    /// Questions files.
    pub questions: Vec<SourceTable>,
    /// Comments files.
    pub comments: Vec<SourceTable>,
}

impl TeamData {
    /// Empty data for a team.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Files stored for a section (`General` is always empty).
    #[must_use]
    pub fn files(&self, section: Section) -> &[SourceTable] {
        match section {
            Section::Themes => &self.themes,
            Section::Questions => &self.questions,
            Section::Comments => &self.comments,
            Section::General => &[],
        }
    }

    fn files_mut(&mut self, section: Section) -> Option<&mut Vec<SourceTable>> {
        match section {
            Section::Themes => Some(&mut self.themes),
            Section::Questions => Some(&mut self.questions),
            Section::Comments => Some(&mut self.comments),
            Section::General => None,
        }
    }

    /// Total number of stored files.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.themes.len() + self.questions.len() + self.comments.len()
    }

    /// True when at least one file is stored.
    #[must_use]
    pub fn has_data(&self) -> bool {
        self.file_count() > 0
    }

    /// Sections with at least one file, in display order.
    #[must_use]
    pub fn available_sections(&self) -> Vec<Section> {
        Section::ANALYZED
            .into_iter()
            .filter(|s| !self.files(*s).is_empty())
            .collect()
    }

    /// All rows of a section stacked into one table.
    #[must_use]
    pub fn section_table(&self, section: Section) -> SurveyTable {
        SurveyTable::concat(self.files(section).iter().map(|f| &f.table))
    }

    /// Distinct source filenames of a section, in upload order.
    #[must_use]
    pub fn sources(&self, section: Section) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for file in self.files(section) {
            if !names.contains(&file.filename) {
                names.push(file.filename.clone());
            }
        }
        names
    }
}

/// An uploaded file in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Original filename (used for classification).
    pub name: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Create an uploaded file.
    #[must_use]
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// A user-visible problem with one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestWarning {
    /// The file the warning is about.
    pub filename: String,
    /// Human-readable message.
    pub message: String,
}

/// Result of ingesting a batch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IngestOutcome {
    /// Files that were stored, with their classification.
    pub processed: Vec<FileCategory>,
    /// Files that were rejected, with reasons.
    pub warnings: Vec<IngestWarning>,
    /// Number of files submitted.
    pub total: usize,
}

impl IngestOutcome {
    /// "{processed}/{total} files processed successfully!"
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{}/{} files processed successfully!",
            self.processed.len(),
            self.total
        )
    }
}

/// Per-team availability for the overview screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamOverview {
    /// Team display name.
    pub name: String,
    /// URL-safe identifier.
    pub slug: String,
    /// Number of stored files.
    pub file_count: usize,
    /// Sections with data.
    pub sections: Vec<Section>,
}

/// Company-wide counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceOverview {
    /// Per-team availability, in directory order.
    pub teams: Vec<TeamOverview>,
    /// Teams with at least one file.
    pub active_teams: usize,
    /// Number of themes files across teams.
    pub theme_files: usize,
    /// Number of questions files across teams.
    pub question_files: usize,
    /// Number of comments files across teams.
    pub comment_files: usize,
}

/// Team-first store of every upload in a session.
#[derive(Debug, Clone)]
pub struct Workspace {
    directory: TeamDirectory,
    teams: Vec<TeamData>,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(TeamDirectory::default())
    }
}

impl Workspace {
    /// Create an empty workspace with one bucket per directory team.
    #[must_use]
    pub fn new(directory: TeamDirectory) -> Self {
        let teams = directory.names().map(TeamData::new).collect();
        Self { directory, teams }
    }

    /// The team directory used for classification.
    #[must_use]
    pub fn directory(&self) -> &TeamDirectory {
        &self.directory
    }

    /// All teams, in directory order.
    #[must_use]
    pub fn teams(&self) -> &[TeamData] {
        &self.teams
    }

    /// Look up a team by name or slug.
    pub fn team(&self, query: &str) -> Result<&TeamData, SurveyError> {
        let spec = self
            .directory
            .resolve(query)
            .ok_or_else(|| SurveyError::UnknownTeam(query.to_string()))?;
        self.teams
            .iter()
            .find(|t| t.name == spec.name)
            .ok_or_else(|| SurveyError::UnknownTeam(query.to_string()))
    }

    /// True when no team has any data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.teams.iter().all(|t| !t.has_data())
    }

    /// Drop all stored uploads.
    pub fn clear(&mut self) {
        for team in &mut self.teams {
            *team = TeamData::new(team.name.clone());
        }
    }

    /// Parse, classify and store a batch of files.
    pub fn ingest(&mut self, files: &[UploadedFile]) -> IngestOutcome {
        let mut outcome = IngestOutcome {
            total: files.len(),
            ..IngestOutcome::default()
        };

        for file in files {
            match self.ingest_one(file) {
                Ok(category) => {
                    tracing::info!(
                        file = %category.filename,
                        team = category.team.as_deref().unwrap_or_default(),
                        section = %category.section,
                        "File ingested"
                    );
                    outcome.processed.push(category);
                }
                Err(message) => {
                    tracing::warn!(file = %file.name, "{}", message);
                    outcome.warnings.push(IngestWarning {
                        filename: file.name.clone(),
                        message,
                    });
                }
            }
        }

        outcome
    }

    fn ingest_one(&mut self, file: &UploadedFile) -> Result<FileCategory, String> {
        let table = read_table(&file.name, &file.bytes)
            .map_err(|e| format!("Error processing {}: {}", file.name, e))?;

        let category = self.directory.categorize(&file.name);
        let Some(team_name) = category.team.as_deref() else {
            return Err(format!("Could not detect team from filename: {}", file.name));
        };
        if category.section == Section::General {
            return Err(format!(
                "No category keyword found in filename: {}",
                file.name
            ));
        }
        if table.is_empty() {
            return Err(format!("File contains no data: {}", file.name));
        }

        let files = self
            .teams
            .iter_mut()
            .find(|t| t.name == team_name)
            .and_then(|t| t.files_mut(category.section))
            .ok_or_else(|| format!("Unrecognized team '{}' in file: {}", team_name, file.name))?;

        files.push(SourceTable {
            filename: file.name.clone(),
            table,
        });
        Ok(category)
    }

    /// Every team's files for a section, paired with the team name.
    #[must_use]
    pub fn company_files(&self, section: Section) -> Vec<(&str, &SourceTable)> {
        self.teams
            .iter()
            .flat_map(|t| t.files(section).iter().map(move |f| (t.name.as_str(), f)))
            .collect()
    }

    /// All teams' rows for a section stacked into one table.
    #[must_use]
    pub fn company_table(&self, section: Section) -> SurveyTable {
        SurveyTable::concat(self.company_files(section).into_iter().map(|(_, f)| &f.table))
    }

    /// Availability summary for the overview screen.
    #[must_use]
    pub fn overview(&self) -> WorkspaceOverview {
        let teams = self
            .teams
            .iter()
            .map(|t| TeamOverview {
                name: t.name.clone(),
                slug: crate::classify::slugify(&t.name),
                file_count: t.file_count(),
                sections: t.available_sections(),
            })
            .collect();

        WorkspaceOverview {
            teams,
            active_teams: self.teams.iter().filter(|t| t.has_data()).count(),
            theme_files: self.company_files(Section::Themes).len(),
            question_files: self.company_files(Section::Questions).len(),
            comment_files: self.company_files(Section::Comments).len(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const THEMES_CSV: &str = "Theme,Score\nGrowth,4.5\nCulture,3\n,\n";

    #[test]
    fn csv_is_parsed_and_cleaned() {
        let table = read_table("build_themes.csv", THEMES_CSV.as_bytes()).expect("parse");
        assert_eq!(table.headers(), &["Theme".to_string(), "Score".to_string()]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(0, "Score"), &Cell::Number(4.5));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = read_table("notes.txt", b"hello").expect_err("should fail");
        assert!(matches!(err, SurveyError::UnsupportedFormat(_)));
    }

    #[test]
    fn corrupt_workbook_is_an_error() {
        let err = read_table("build_themes.xlsx", b"not a zip").expect_err("should fail");
        assert!(matches!(err, SurveyError::Spreadsheet(_)));
    }

    #[test]
    fn ingest_routes_and_warns() {
        let mut ws = Workspace::default();
        let outcome = ws.ingest(&[
            UploadedFile::new("build_themes.csv", THEMES_CSV),
            UploadedFile::new("sales_themes.csv", THEMES_CSV),
            UploadedFile::new("build_results.csv", THEMES_CSV),
            UploadedFile::new("finance_comments.xlsx", "garbage"),
            UploadedFile::new("people_themes.csv", "Theme,Score\n,\n"),
        ]);

        assert_eq!(outcome.total, 5);
        assert_eq!(outcome.processed.len(), 1);
        assert_eq!(outcome.summary(), "1/5 files processed successfully!");
        assert_eq!(outcome.warnings.len(), 4);
        assert_eq!(
            outcome.warnings[0].message,
            "Could not detect team from filename: sales_themes.csv"
        );
        assert!(outcome.warnings[1].message.starts_with("No category keyword"));
        assert!(outcome.warnings[2].message.starts_with("Error processing finance_comments.xlsx"));
        assert_eq!(outcome.warnings[3].message, "File contains no data: people_themes.csv");

        let build = ws.team("build_team").expect("team");
        assert_eq!(build.themes.len(), 1);
        assert_eq!(build.available_sections(), vec![Section::Themes]);
    }

    #[test]
    fn overview_counts_files() {
        let mut ws = Workspace::default();
        ws.ingest(&[
            UploadedFile::new("build_themes.csv", THEMES_CSV),
            UploadedFile::new("build_themes_q2.csv", THEMES_CSV),
            UploadedFile::new("andrew_themes.csv", THEMES_CSV),
        ]);

        let overview = ws.overview();
        assert_eq!(overview.active_teams, 2);
        assert_eq!(overview.theme_files, 3);
        assert_eq!(overview.comment_files, 0);
        assert_eq!(overview.teams[1].file_count, 2);
        assert_eq!(ws.company_table(Section::Themes).len(), 6);

        ws.clear();
        assert!(ws.is_empty());
        assert_eq!(ws.teams().len(), 4);
    }

    #[test]
    fn unknown_team_lookup_fails() {
        let ws = Workspace::default();
        assert!(matches!(ws.team("sales"), Err(SurveyError::UnknownTeam(_))));
    }
}
