//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args)               |
//! | 3       | validate         | Data issues found in the tile table      |
//! | 4-5     | Universal        | I/O and parse/config failures            |
//! | 50-59   | fetch            | Google Sheets source                     |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use hexlink_sheets::SheetsError;

// =============================================================================
// Universal (0-5)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// `validate` found invalid rows, duplicates or edge conflicts.
pub const EXIT_DATA_ISSUES: u8 = 3;

/// File could not be read or written.
pub const EXIT_IO: u8 = 4;

/// Input table or config file could not be parsed.
pub const EXIT_PARSE: u8 = 5;

// =============================================================================
// Fetch (50-59): Google Sheets source
// =============================================================================

/// No API key or sheet id (neither flag, env var, nor config).
pub const EXIT_FETCH_NOT_AUTH: u8 = 50;

/// Auth rejected by upstream (401/403).
pub const EXIT_FETCH_AUTH: u8 = 51;

/// Bad request rejected by upstream (400).
pub const EXIT_FETCH_VALIDATION: u8 = 52;

/// Rate limited after retries (429).
pub const EXIT_FETCH_RATE_LIMIT: u8 = 53;

/// Upstream error (5xx, other 4xx, bad body) or network failure after retries.
pub const EXIT_FETCH_UPSTREAM: u8 = 54;

/// Map a SheetsError to its exit code.
pub fn sheets_exit_code(err: &SheetsError) -> u8 {
    match err {
        SheetsError::Client(_) => EXIT_ERROR,
        SheetsError::Auth(..) => EXIT_FETCH_AUTH,
        SheetsError::Rejected(..) => EXIT_FETCH_VALIDATION,
        SheetsError::RateLimited(_) => EXIT_FETCH_RATE_LIMIT,
        SheetsError::Http(..) | SheetsError::Upstream(_) | SheetsError::Parse(_) => {
            EXIT_FETCH_UPSTREAM
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheets_errors_map_to_fetch_range() {
        assert_eq!(sheets_exit_code(&SheetsError::Auth(403, "x".into())), 51);
        assert_eq!(sheets_exit_code(&SheetsError::Rejected(400, "x".into())), 52);
        assert_eq!(sheets_exit_code(&SheetsError::RateLimited(4)), 53);
        assert_eq!(sheets_exit_code(&SheetsError::Http(404, "x".into())), 54);
        assert_eq!(sheets_exit_code(&SheetsError::Parse("x".into())), 54);
    }
}
