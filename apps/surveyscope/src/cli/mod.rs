//! # Surveyscope CLI Module
//!
//! ## Available Commands
//!
//! - `classify` - Show how filenames are routed to teams and sections
//! - `overview` - Ingest files and show per-team availability
//! - `team` - Themes, questions and comments analysis for one team
//! - `company` - Company-wide summaries
//! - `report` - Write a team or company Markdown report
//! - `insights` - Single-table survey insights with Markdown/PDF downloads
//! - `publish` - Push a report to Google Docs
//! - `serve` - Start the HTTP dashboard API

mod commands;

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use surveyscope_core::SurveyError;

pub use commands::*;

use crate::config::AppConfig;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Surveyscope - survey results dashboard
///
/// Routes survey spreadsheets to teams by filename, then summarizes scores,
/// questions and free-text comments per team and company-wide.
#[derive(Parser, Debug)]
#[command(name = "surveyscope")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the team and section each file would be routed to
    Classify {
        /// Files to classify (only names are inspected)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Ingest files and show per-team availability
    Overview {
        /// Survey files (.xlsx, .xls, .csv)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Analyze one team's uploads
    Team {
        /// Team name or slug
        #[arg(short, long)]
        team: String,

        /// Limit output to one section (themes, questions, comments)
        #[arg(short, long)]
        section: Option<String>,

        /// Filter questions by theme
        #[arg(long)]
        theme: Option<String>,

        /// Survey files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Company-wide themes, questions and comments summaries
    Company {
        /// Survey files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Write a Markdown report
    Report {
        /// Team name or slug
        #[arg(short, long, conflicts_with = "company")]
        team: Option<String>,

        /// Write the company-wide report
        #[arg(long)]
        company: bool,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Survey files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Analyze a single theme/score/participation table
    Insights {
        /// Survey table (.xlsx, .xls, .csv)
        file: PathBuf,

        /// Also write the Markdown report here
        #[arg(long)]
        markdown: Option<PathBuf>,

        /// Also write the PDF report here
        #[arg(long)]
        pdf: Option<PathBuf>,
    },

    /// Publish a team or company report to Google Docs
    Publish {
        /// Team name or slug
        #[arg(short, long, conflicts_with = "company")]
        team: Option<String>,

        /// Publish the company-wide report
        #[arg(long)]
        company: bool,

        /// Document title
        #[arg(long)]
        title: Option<String>,

        /// Survey files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Start the HTTP dashboard API
    Serve {
        /// Host to bind to (overrides `server.host`)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides `server.port`)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

/// Which report a `report`/`publish` invocation targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportTarget {
    Team(String),
    Company,
}

impl ReportTarget {
    fn from_flags(team: Option<String>, company: bool) -> Result<Self, SurveyError> {
        match (team, company) {
            (Some(team), false) => Ok(Self::Team(team)),
            (None, true) => Ok(Self::Company),
            _ => Err(SurveyError::Config(
                "specify exactly one of --team <name> or --company".to_string(),
            )),
        }
    }
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), SurveyError> {
    let json_mode = cli.json_mode;
    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Classify { files }) => cmd_classify(&config, json_mode, &files),
        Some(Commands::Overview { files }) => cmd_overview(&config, json_mode, &files),
        Some(Commands::Team {
            team,
            section,
            theme,
            files,
        }) => cmd_team(
            &config,
            json_mode,
            &team,
            section.as_deref(),
            theme.as_deref(),
            &files,
        ),
        Some(Commands::Company { files }) => cmd_company(&config, json_mode, &files),
        Some(Commands::Report {
            team,
            company,
            output,
            files,
        }) => {
            let target = ReportTarget::from_flags(team, company)?;
            cmd_report(&config, &target, &output, &files)
        }
        Some(Commands::Insights {
            file,
            markdown,
            pdf,
        }) => cmd_insights(json_mode, &file, markdown.as_deref(), pdf.as_deref()),
        Some(Commands::Publish {
            team,
            company,
            title,
            files,
        }) => {
            let target = ReportTarget::from_flags(team, company)?;
            cmd_publish(&config, json_mode, &target, title, &files).await
        }
        Some(Commands::Serve { host, port }) => cmd_serve(config, host, port).await,
        None => Cli::command()
            .print_help()
            .map_err(|e| SurveyError::IoError(e.to_string())),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn report_requires_one_target() {
        let cli = Cli::try_parse_from(["surveyscope", "report", "--company", "-o", "out.txt", "a.csv"])
            .unwrap();
        match cli.command {
            Some(Commands::Report { team, company, .. }) => {
                assert_eq!(
                    ReportTarget::from_flags(team, company).unwrap(),
                    ReportTarget::Company
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }

        assert!(ReportTarget::from_flags(None, false).is_err());
        assert!(
            Cli::try_parse_from([
                "surveyscope", "report", "--team", "build", "--company", "-o", "x", "a.csv"
            ])
            .is_err()
        );
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["surveyscope", "classify", "a.csv", "--json-mode", "-q"])
            .unwrap();
        assert!(cli.json_mode);
        assert!(cli.quiet);
    }
}
