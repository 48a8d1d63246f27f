//! Tile table sources: a local CSV/TSV file or a Google Sheet.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;
use hexlink_config::{ConfigError, Settings};
use hexlink_io::Table;
use hexlink_sheets::{SheetsClient, SheetsError};

use crate::exit_codes::{sheets_exit_code, EXIT_FETCH_NOT_AUTH, EXIT_IO, EXIT_PARSE};
use crate::CliError;

#[derive(Args, Debug, Clone)]
pub struct SheetArgs {
    /// Google Sheet id [default: $GOOGLE_SHEET_ID, then config]
    #[arg(long)]
    pub sheet_id: Option<String>,

    /// Sheet tab holding the tiles [default: config, then "Main"]
    #[arg(long)]
    pub table: Option<String>,

    /// Sheets API key [default: $GOOGLE_SHEET_KEY]
    #[arg(long)]
    pub api_key: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Read tiles from a CSV/TSV file instead of Google Sheets
    #[arg(long, conflicts_with = "sheet_id")]
    pub csv: Option<PathBuf>,

    #[command(flatten)]
    pub sheet: SheetArgs,

    /// Settings file [default: <config dir>/hexlink/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn load_settings(path: Option<&Path>) -> Result<Settings, CliError> {
    Settings::load(path).map_err(|e| {
        let code = match e {
            ConfigError::Io(_) => EXIT_IO,
            ConfigError::Parse(_) | ConfigError::Validation(_) => EXIT_PARSE,
        };
        CliError { code, message: e.to_string(), hint: None }
            .with_hint(format!("default location: {}", Settings::config_path().display()))
    })
}

/// Load the whole table from whichever source the arguments select.
/// Returns the rows and a label for messages.
pub fn load_table(args: &SourceArgs, settings: &Settings) -> Result<(Table, String), CliError> {
    match &args.csv {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::io(format!("{} does not exist", path.display())));
            }
            tracing::debug!("reading tiles from {}", path.display());
            let table = hexlink_io::table::import(path).map_err(CliError::parse)?;
            Ok((table, path.display().to_string()))
        }
        None => fetch_table(&args.sheet, settings),
    }
}

pub fn fetch_table(args: &SheetArgs, settings: &Settings) -> Result<(Table, String), CliError> {
    let sheet_id = resolve_sheet_id(args.sheet_id.clone(), settings)?;
    let api_key = resolve_api_key(args.api_key.clone(), settings)?;
    let table = args
        .table
        .clone()
        .unwrap_or_else(|| settings.source.table.clone());

    let mut client = SheetsClient::new(&api_key).map_err(sheets_error)?;
    if let Some(base) = &settings.source.api_base {
        client = client.with_api_base(base);
    }
    client = client.with_backoff(Duration::from_millis(settings.source.retry_backoff_ms));

    tracing::debug!("fetching sheet {} table {}", sheet_id, table);
    let rows = client.fetch_values(&sheet_id, &table).map_err(sheets_error)?;
    Ok((rows, format!("sheet {} ({})", sheet_id, table)))
}

fn sheets_error(err: SheetsError) -> CliError {
    let hint = match &err {
        SheetsError::Auth(..) => {
            Some("check the API key and that the sheet is shared with \"anyone with the link\"")
        }
        SheetsError::Rejected(..) => Some("check --table; it must name an existing tab"),
        _ => None,
    };
    CliError {
        code: sheets_exit_code(&err),
        message: err.to_string(),
        hint: hint.map(String::from),
    }
}

/// Sheet id: flag > env var named in config > config value.
pub fn resolve_sheet_id(flag: Option<String>, settings: &Settings) -> Result<String, CliError> {
    let env_var = &settings.source.sheet_id_env;
    first_non_empty([flag, std::env::var(env_var).ok(), settings.source.sheet_id.clone()])
        .ok_or_else(|| CliError {
            code: EXIT_FETCH_NOT_AUTH,
            message: format!("missing sheet id (use --sheet-id, set {}, or [source] sheet_id)", env_var),
            hint: Some("or read a local file with --csv".into()),
        })
}

/// API key: flag > env var named in config.
pub fn resolve_api_key(flag: Option<String>, settings: &Settings) -> Result<String, CliError> {
    let env_var = &settings.source.api_key_env;
    first_non_empty([flag, std::env::var(env_var).ok()]).ok_or_else(|| CliError {
        code: EXIT_FETCH_NOT_AUTH,
        message: format!("missing Google Sheets API key (use --api-key or set {})", env_var),
        hint: None,
    })
}

fn first_non_empty<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_with_env(key_env: &str, id_env: &str) -> Settings {
        let mut settings = Settings::default();
        settings.source.api_key_env = key_env.into();
        settings.source.sheet_id_env = id_env.into();
        settings
    }

    #[test]
    fn flag_wins_over_config() {
        let mut settings = settings_with_env("HEXLINK_TEST_UNSET_KEY_1", "HEXLINK_TEST_UNSET_ID_1");
        settings.source.sheet_id = Some("from-config".into());
        let id = resolve_sheet_id(Some(" from-flag ".into()), &settings).unwrap();
        assert_eq!(id, "from-flag");
    }

    #[test]
    fn config_sheet_id_is_last_resort() {
        let mut settings = settings_with_env("HEXLINK_TEST_UNSET_KEY_2", "HEXLINK_TEST_UNSET_ID_2");
        settings.source.sheet_id = Some("from-config".into());
        assert_eq!(resolve_sheet_id(None, &settings).unwrap(), "from-config");
    }

    #[test]
    fn blank_flag_falls_through() {
        let mut settings = settings_with_env("HEXLINK_TEST_UNSET_KEY_3", "HEXLINK_TEST_UNSET_ID_3");
        settings.source.sheet_id = Some("from-config".into());
        assert_eq!(resolve_sheet_id(Some("  ".into()), &settings).unwrap(), "from-config");
    }

    #[test]
    fn missing_key_is_exit_50() {
        let settings = settings_with_env("HEXLINK_TEST_UNSET_KEY_4", "HEXLINK_TEST_UNSET_ID_4");
        let err = resolve_api_key(None, &settings).unwrap_err();
        assert_eq!(err.code, EXIT_FETCH_NOT_AUTH);
        assert!(err.message.contains("HEXLINK_TEST_UNSET_KEY_4"));
    }
}
