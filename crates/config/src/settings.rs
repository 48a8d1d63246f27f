// Settings file (TOML)

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug)]
pub enum ConfigError {
    /// File exists but could not be read, or an explicit path is missing.
    Io(String),
    /// TOML parse / deserialization error.
    Parse(String),
    /// Values parsed but are out of range.
    Validation(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "config I/O error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "config parse error: {}", msg),
            ConfigError::Validation(msg) => write!(f, "config validation error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub source: SourceSettings,
    pub report: ReportSettings,
    pub rows: RowSettings,
}

/// Where tile rows come from when no `--csv` is given.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    pub sheet_id: Option<String>,
    pub table: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Environment variable holding the sheet id.
    pub sheet_id_env: String,
    pub api_base: Option<String>,
    /// First retry delay; doubled on each further retry.
    pub retry_backoff_ms: u64,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            sheet_id: None,
            table: "Main".to_string(),
            api_key_env: "GOOGLE_SHEET_KEY".to_string(),
            sheet_id_env: "GOOGLE_SHEET_ID".to_string(),
            api_base: None,
            retry_backoff_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    pub path: PathBuf,
    pub min_cluster_size: usize,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("output/clusters.txt"),
            min_cluster_size: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RowSettings {
    /// Substring the first cell must contain for a row to be a tile.
    pub url_marker: String,
}

impl Default for RowSettings {
    fn default() -> Self {
        Self {
            url_marker: "https".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl Settings {
    /// `<config dir>/hexlink/config.toml`
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hexlink")
            .join("config.toml")
    }

    /// Load from an explicit path (must exist) or from the default path
    /// (defaults when absent).
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) if !path.exists() => Err(ConfigError::Io(format!(
                "{} does not exist",
                path.display()
            ))),
            Some(path) => Self::load_from(path),
            None => Self::load_from(&Self::config_path()),
        }
    }

    /// Missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let settings: Settings =
            toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.report.min_cluster_size == 0 {
            return Err(ConfigError::Validation(
                "report.min_cluster_size must be at least 1".into(),
            ));
        }
        if self.source.table.trim().is_empty() {
            return Err(ConfigError::Validation("source.table must not be empty".into()));
        }
        if self.rows.url_marker.is_empty() {
            return Err(ConfigError::Validation("rows.url_marker must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.source.table, "Main");
        assert_eq!(settings.report.path, PathBuf::from("output/clusters.txt"));
        assert_eq!(settings.report.min_cluster_size, 2);
        assert_eq!(settings.rows.url_marker, "https");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let settings = Settings::from_toml(
            r#"
[source]
sheet_id = "abc123"

[report]
min_cluster_size = 3
"#,
        )
        .unwrap();
        assert_eq!(settings.source.sheet_id.as_deref(), Some("abc123"));
        assert_eq!(settings.source.api_key_env, "GOOGLE_SHEET_KEY");
        assert_eq!(settings.source.retry_backoff_ms, 1000);
        assert_eq!(settings.report.min_cluster_size, 3);
        assert_eq!(settings.report.path, PathBuf::from("output/clusters.txt"));
    }

    #[test]
    fn invalid_toml_is_parse_error() {
        let err = Settings::from_toml("[report\nmin_cluster_size = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        let err = Settings::from_toml("[report]\nmin_cluster_size = \"two\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_min_size_fails_validation() {
        let err = Settings::from_toml("[report]\nmin_cluster_size = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("min_cluster_size"));
    }

    #[test]
    fn empty_marker_fails_validation() {
        let err = Settings::from_toml("[rows]\nurl_marker = \"\"").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn missing_default_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = Settings::load(Some(missing.as_path())).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn load_reads_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hexlink.toml");
        fs::write(&path, "[rows]\nurl_marker = \"tile-\"\n").unwrap();
        let settings = Settings::load(Some(path.as_path())).unwrap();
        assert_eq!(settings.rows.url_marker, "tile-");
    }

    #[test]
    fn config_path_is_under_hexlink_dir() {
        let path = Settings::config_path();
        assert!(path.ends_with("hexlink/config.toml"));
    }
}
