//! `hexlink fetch`: download the tile sheet and save it as CSV.

use std::path::PathBuf;

use crate::source::{fetch_table, load_settings, SheetArgs};
use crate::CliError;

pub fn cmd_fetch(
    sheet: SheetArgs,
    out: Option<PathBuf>,
    config: Option<PathBuf>,
    quiet: bool,
) -> Result<(), CliError> {
    let settings = load_settings(config.as_deref())?;
    let (table, label) = fetch_table(&sheet, &settings)?;

    let out_label = match &out {
        Some(path) => {
            hexlink_io::table::export_csv(&table, path).map_err(CliError::io)?;
            path.display().to_string()
        }
        None => {
            let stdout = std::io::stdout();
            hexlink_io::table::write_csv(&table, stdout.lock()).map_err(CliError::io)?;
            "stdout".to_string()
        }
    };

    if !quiet {
        eprintln!("fetched {} rows from {} to {}", table.len(), label, out_label);
    }
    Ok(())
}
