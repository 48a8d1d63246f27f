//! Log output for the binary. Library crates log through `log`; the
//! subscriber's log bridge picks those records up.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{fmt, EnvFilter};

use crate::exit_codes::EXIT_ERROR;
use crate::CliError;

/// `RUST_LOG` wins when set and no `-v` was given.
pub fn init(verbose: u8, log_file: Option<&Path>) -> Result<(), CliError> {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let builder = fmt().with_env_filter(filter).with_target(false);
    let result = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| CliError::io(format!("cannot open log file {}: {}", path.display(), e)))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    result.map_err(|e| CliError {
        code: EXIT_ERROR,
        message: format!("cannot initialise logging: {}", e),
        hint: None,
    })
}
