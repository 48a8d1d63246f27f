// hexlink CLI - cluster hex tiles by matching edge symbols

mod cluster;
mod exit_codes;
mod fetch;
mod logging;
mod source;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{EXIT_IO, EXIT_PARSE, EXIT_SUCCESS, EXIT_USAGE};
use source::{SheetArgs, SourceArgs};

#[derive(Parser)]
#[command(name = "hexlink")]
#[command(about = "Find clusters of hex tiles whose edges match")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Append log output to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match tile edges and write the cluster report
    #[command(after_help = "\
Examples:
  hexlink cluster --csv tiles.csv
  hexlink cluster --sheet-id 1AbC... --table Main --out output/clusters.txt
  hexlink cluster --csv tiles.csv --min-size 1 --json-out report.json
  GOOGLE_SHEET_KEY=... GOOGLE_SHEET_ID=... hexlink cluster")]
    Cluster {
        #[command(flatten)]
        source: SourceArgs,

        /// Report file [default: config, then output/clusters.txt]
        #[arg(long)]
        out: Option<PathBuf>,

        /// Smallest cluster written to the report [default: config, then 2]
        #[arg(long)]
        min_size: Option<usize>,

        /// Print the JSON report to stdout
        #[arg(long)]
        json: bool,

        /// Write the JSON report to a file
        #[arg(long)]
        json_out: Option<PathBuf>,

        /// Suppress the summary on stderr
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Check rows, duplicates and edge conflicts without writing a report
    #[command(after_help = "\
Examples:
  hexlink validate --csv tiles.csv
  hexlink validate --sheet-id 1AbC... --json

Exits 3 when any issue is found.")]
    Validate {
        #[command(flatten)]
        source: SourceArgs,

        /// Print issues as JSON
        #[arg(long)]
        json: bool,

        /// Suppress the summary on stderr
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Download the tile sheet as CSV
    #[command(after_help = "\
Examples:
  hexlink fetch --sheet-id 1AbC... > tiles.csv
  hexlink fetch --sheet-id 1AbC... --table Main --out tiles.csv")]
    Fetch {
        #[command(flatten)]
        sheet: SheetArgs,

        /// Output file [default: stdout]
        #[arg(long)]
        out: Option<PathBuf>,

        /// Settings file [default: <config dir>/hexlink/config.toml]
        #[arg(long)]
        config: Option<PathBuf>,

        /// Suppress the summary on stderr
        #[arg(long, short = 'q')]
        quiet: bool,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  hexlink-graph ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("TARGET"),
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = logging::init(cli.verbose, cli.log_file.as_deref()).and_then(|()| match cli.command {
        Commands::Cluster {
            source,
            out,
            min_size,
            json,
            json_out,
            quiet,
        } => cluster::cmd_cluster(cluster::ClusterArgs {
            source,
            out,
            min_size,
            json,
            json_out,
            quiet,
        }),
        Commands::Validate { source, json, quiet } => cluster::cmd_validate(source, json, quiet),
        Commands::Fetch {
            sheet,
            out,
            config,
            quiet,
        } => fetch::cmd_fetch(sheet, out, config, quiet),
    });

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            eprintln!("error: {}", message);
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self { code: EXIT_PARSE, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
