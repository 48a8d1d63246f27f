// Cluster report output

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use hexlink_graph::{render_report, GraphReport, TileGraph};

/// Create `path`'s parent directory when it does not exist yet.
pub(crate) fn ensure_parent(path: &Path) -> Result<(), String> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir)
            .map_err(|e| format!("cannot create {}: {}", dir.display(), e)),
        _ => Ok(()),
    }
}

/// Write the text report for clusters of at least `min_size` tiles.
/// Returns the number of clusters written.
pub fn write_report(path: &Path, graph: &TileGraph, min_size: usize) -> Result<usize, String> {
    ensure_parent(path)?;
    let file = File::create(path).map_err(|e| format!("cannot create {}: {}", path.display(), e))?;
    let mut out = BufWriter::new(file);
    out.write_all(render_report(graph, min_size).as_bytes())
        .and_then(|_| out.flush())
        .map_err(|e| format!("cannot write {}: {}", path.display(), e))?;
    Ok(hexlink_graph::reportable_clusters(graph, min_size).len())
}

/// Write the JSON report.
pub fn write_json(path: &Path, report: &GraphReport) -> Result<(), String> {
    ensure_parent(path)?;
    let file = File::create(path).map_err(|e| format!("cannot create {}: {}", path.display(), e))?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, report).map_err(|e| e.to_string())?;
    out.write_all(b"\n")
        .and_then(|_| out.flush())
        .map_err(|e| format!("cannot write {}: {}", path.display(), e))
}
