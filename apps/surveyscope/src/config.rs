//! # Application Configuration
//!
//! TOML configuration for the binary: the team directory, HTTP server
//! settings and the Google Docs integration.
//!
//! ## Resolution
//!
//! 1. `--config <path>` flag
//! 2. `SURVEYSCOPE_CONFIG` environment variable
//! 3. Built-in defaults
//!
//! `SURVEYSCOPE_DOCS_TOKEN` overrides `docs.access_token` in every case.
//!
//! ```toml
//! [[teams]]
//! name = "Build Team"
//! keywords = ["build"]
//!
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [docs]
//! access_token = "ya29..."
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use surveyscope_core::{SurveyError, TeamDirectory, TeamSpec};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "SURVEYSCOPE_CONFIG";

/// Environment variable holding the Docs OAuth access token.
pub const DOCS_TOKEN_ENV: &str = "SURVEYSCOPE_DOCS_TOKEN";

/// Configuration files larger than this are rejected.
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

// =============================================================================
// SECTIONS
// =============================================================================

/// `[server]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Request body limit. Uploads arrive base64-encoded, so this must
    /// leave room for the encoding overhead.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            max_upload_bytes: 64 * 1024 * 1024,
        }
    }
}

/// `[docs]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocsConfig {
    /// Base URL of the Docs REST API.
    pub api_base: String,
    /// OAuth access token. Publishing is disabled without one.
    pub access_token: Option<String>,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            api_base: "https://docs.googleapis.com".to_string(),
            access_token: None,
        }
    }
}

// =============================================================================
// APP CONFIG
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Team directory, in matching order.
    pub teams: Vec<TeamSpec>,
    pub server: ServerConfig,
    pub docs: DocsConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            teams: TeamDirectory::default().teams().to_vec(),
            server: ServerConfig::default(),
            docs: DocsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration using the resolution order above.
    pub fn load(path: Option<&Path>) -> Result<Self, SurveyError> {
        let env_path = std::env::var(CONFIG_ENV)
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let mut config = match path.map(Path::to_path_buf).or(env_path) {
            Some(path) => {
                tracing::info!(path = %path.display(), "Loading configuration");
                Self::from_file(&path)?
            }
            None => Self::default(),
        };

        if let Some(token) = std::env::var(DOCS_TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty())
        {
            config.docs.access_token = Some(token);
        }
        Ok(config)
    }

    /// Read and validate a configuration file.
    pub fn from_file(path: &Path) -> Result<Self, SurveyError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            SurveyError::Config(format!("Cannot read '{}': {}", path.display(), e))
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(SurveyError::Config(format!(
                "Config file '{}' exceeds {} bytes",
                path.display(),
                MAX_CONFIG_FILE_SIZE
            )));
        }
        let content = std::fs::read_to_string(path).map_err(|e| {
            SurveyError::Config(format!("Cannot read '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate TOML text.
    pub fn from_toml(content: &str) -> Result<Self, SurveyError> {
        let config: Self =
            toml::from_str(content).map_err(|e| SurveyError::Config(e.to_string()))?;
        config.directory()?;
        Ok(config)
    }

    /// The validated team directory.
    pub fn directory(&self) -> Result<TeamDirectory, SurveyError> {
        TeamDirectory::new(self.teams.clone())
    }

    /// The Docs access token, when publishing is possible.
    #[must_use]
    pub fn docs_token(&self) -> Option<&str> {
        self.docs
            .access_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_reproduce_builtin_directory() {
        let config = AppConfig::default();
        assert_eq!(config.teams.len(), 4);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.docs.api_base, "https://docs.googleapis.com");
        assert!(config.docs_token().is_none());
        assert_eq!(config.directory().unwrap(), TeamDirectory::default());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [server]
            port = 9000

            [docs]
            access_token = "token"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.teams.len(), 4);
        assert_eq!(config.docs_token(), Some("token"));
    }

    #[test]
    fn custom_teams_replace_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [[teams]]
            name = "Platform"
            keywords = ["PLATFORM", "infra"]
            "#,
        )
        .unwrap();
        let directory = config.directory().unwrap();
        assert_eq!(directory.teams().len(), 1);
        assert_eq!(
            directory.detect_team("platform_themes.xlsx").map(|t| t.name.as_str()),
            Some("Platform")
        );
    }

    #[test]
    fn invalid_teams_are_rejected() {
        let err = AppConfig::from_toml("teams = []").unwrap_err();
        assert!(matches!(err, SurveyError::Config(_)));
        assert!(AppConfig::from_toml("[server]\nport = \"x\"").is_err());
    }

    #[test]
    fn reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("surveyscope.toml");
        std::fs::write(&path, "[server]\nhost = \"0.0.0.0\"\n").unwrap();
        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(AppConfig::from_file(&dir.path().join("missing.toml")).is_err());
    }
}
