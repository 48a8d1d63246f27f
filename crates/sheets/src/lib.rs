//! Google Sheets values client.
//!
//! Blocking reqwest client (no Tokio runtime required). Fetches one sheet
//! range and returns it as rows of text cells, the same shape the CSV
//! importer produces.

mod client;
mod values;

pub use client::{SheetsClient, SheetsError, DEFAULT_API_BASE, MAX_RETRIES};
pub use values::rows_from_values;
