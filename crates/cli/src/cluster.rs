//! `hexlink cluster` and `hexlink validate`.

use std::path::PathBuf;

use hexlink_graph::report::RowErrorReport;
use hexlink_graph::summary::RunSummary;
use hexlink_graph::{EngineOptions, GraphReport, TileGraph, Warning};
use serde::Serialize;

use crate::exit_codes::{EXIT_DATA_ISSUES, EXIT_ERROR};
use crate::source::{load_settings, load_table, SourceArgs};
use crate::CliError;

pub struct ClusterArgs {
    pub source: SourceArgs,
    pub out: Option<PathBuf>,
    pub min_size: Option<usize>,
    pub json: bool,
    pub json_out: Option<PathBuf>,
    pub quiet: bool,
}

pub fn cmd_cluster(args: ClusterArgs) -> Result<(), CliError> {
    let settings = load_settings(args.source.config.as_deref())?;
    let min_size = args.min_size.unwrap_or(settings.report.min_cluster_size);
    if min_size == 0 {
        return Err(CliError::args("--min-size must be at least 1"));
    }

    let (table, label) = load_table(&args.source, &settings)?;
    let graph = build(&table, &settings.rows.url_marker);

    let out = args.out.unwrap_or_else(|| settings.report.path.clone());
    let written = hexlink_io::report::write_report(&out, &graph, min_size).map_err(CliError::io)?;

    if args.json || args.json_out.is_some() {
        let report = GraphReport::from_graph(&graph, min_size);
        if let Some(ref path) = args.json_out {
            hexlink_io::report::write_json(path, &report).map_err(CliError::io)?;
            if !args.quiet {
                eprintln!("wrote {}", path.display());
            }
        }
        if args.json {
            println!("{}", to_json(&report)?);
        }
    }

    if !args.quiet {
        print_summary(&label, graph.summary());
        eprintln!("wrote {} clusters to {}", written, out.display());
    }
    Ok(())
}

/// Issues only: rows that failed validation plus duplicate and conflict
/// warnings.
#[derive(Serialize)]
struct ValidationReport<'a> {
    summary: &'a RunSummary,
    row_errors: Vec<RowErrorReport>,
    warnings: &'a [Warning],
}

pub fn cmd_validate(source: SourceArgs, json: bool, quiet: bool) -> Result<(), CliError> {
    let settings = load_settings(source.config.as_deref())?;
    let (table, label) = load_table(&source, &settings)?;
    let graph = build(&table, &settings.rows.url_marker);

    if json {
        let report = ValidationReport {
            summary: graph.summary(),
            row_errors: graph
                .row_errors()
                .iter()
                .map(|e| RowErrorReport { row: e.row(), message: e.to_string() })
                .collect(),
            warnings: graph.warnings(),
        };
        println!("{}", to_json(&report)?);
    } else {
        for err in graph.row_errors() {
            println!("error: {}", err);
        }
        for warning in graph.warnings() {
            println!("warning: {}", warning);
        }
    }

    if !quiet {
        print_summary(&label, graph.summary());
    }

    let issues = graph.row_errors().len() + graph.warnings().len();
    if issues > 0 {
        return Err(CliError {
            code: EXIT_DATA_ISSUES,
            message: format!("{} issue{} found", issues, if issues == 1 { "" } else { "s" }),
            hint: None,
        });
    }
    Ok(())
}

fn build(table: &hexlink_io::Table, url_marker: &str) -> TileGraph {
    let options = EngineOptions {
        url_marker: url_marker.to_string(),
    };
    hexlink_graph::run(table, &options)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value).map_err(|e| CliError {
        code: EXIT_ERROR,
        message: format!("JSON serialization error: {e}"),
        hint: None,
    })
}

/// Human summary to stderr.
fn print_summary(label: &str, s: &RunSummary) {
    eprintln!(
        "{}: {} rows, {} tiles, {} links, {} clusters (largest {}, {} singletons)",
        label, s.rows_seen, s.tiles_retained, s.links, s.clusters, s.largest_cluster, s.singletons,
    );
    let issues = s.rows_invalid + s.duplicate_ids + s.duplicate_contents + s.duplicate_edges + s.edge_conflicts;
    if issues > 0 {
        eprintln!(
            "issues: {} invalid rows, {} duplicate ids, {} duplicate tiles, {} duplicate edges, {} edge conflicts",
            s.rows_invalid, s.duplicate_ids, s.duplicate_contents, s.duplicate_edges, s.edge_conflicts,
        );
    }
}
