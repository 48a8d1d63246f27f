use serde::Serialize;

use crate::engine::TileGraph;
use crate::model::{Cluster, EdgeRef, TileIdx, Warning};
use crate::summary::RunSummary;

// ---------------------------------------------------------------------------
// Text report
// ---------------------------------------------------------------------------

/// One report line: `row: <row> | <id> | <center> | <e0> | ... | <e5>`.
/// Matched symbols are wrapped in `**`, open ones in `-`.
pub fn render_tile(graph: &TileGraph, idx: TileIdx) -> String {
    let tile = graph.tile(idx);
    let edges: Vec<String> = tile
        .edges
        .iter()
        .map(|edge| {
            let mut value = edge.symbol.clone();
            if graph.is_linked(EdgeRef::new(idx, edge.index)) {
                value = format!("**{value}**");
            }
            if edge.is_open {
                value = format!("-{value}-");
            }
            value
        })
        .collect();
    format!(
        "row: {} | {} | {} | {}",
        tile.row_number,
        tile.id,
        tile.center,
        edges.join(" | ")
    )
}

/// Clusters with at least `min_size` tiles, largest first. Equal sizes keep
/// the order of their earliest row.
pub fn reportable_clusters(graph: &TileGraph, min_size: usize) -> Vec<&Cluster> {
    let mut clusters: Vec<&Cluster> = graph
        .clusters()
        .iter()
        .filter(|c| c.len() >= min_size)
        .collect();
    clusters.sort_by_key(|c| {
        let first_row = c
            .members
            .iter()
            .map(|&m| graph.tile(m).row_number)
            .min()
            .unwrap_or(usize::MAX);
        (std::cmp::Reverse(c.len()), first_row)
    });
    clusters
}

/// Render the full report: one line per tile, each cluster followed by a
/// blank line.
pub fn render_report(graph: &TileGraph, min_size: usize) -> String {
    let mut out = String::new();
    for cluster in reportable_clusters(graph, min_size) {
        for &member in &cluster.members {
            out.push_str(&render_tile(graph, member));
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

// ---------------------------------------------------------------------------
// JSON report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct GraphReport {
    pub meta: ReportMeta,
    pub summary: RunSummary,
    pub clusters: Vec<ClusterReport>,
    pub warnings: Vec<Warning>,
    pub row_errors: Vec<RowErrorReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub engine_version: String,
    pub run_at: String,
    pub min_cluster_size: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClusterReport {
    pub size: usize,
    pub root: String,
    pub tiles: Vec<TileReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TileReport {
    pub row: usize,
    pub id: String,
    pub center: String,
    pub edges: Vec<EdgeReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EdgeReport {
    pub symbol: String,
    pub open: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linked_to: Option<LinkTarget>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkTarget {
    pub id: String,
    /// 1-based edge number on the partner tile.
    pub edge: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct RowErrorReport {
    pub row: usize,
    pub message: String,
}

impl GraphReport {
    pub fn from_graph(graph: &TileGraph, min_size: usize) -> Self {
        let clusters = reportable_clusters(graph, min_size)
            .into_iter()
            .map(|c| ClusterReport {
                size: c.len(),
                root: graph.tile(c.root).id.clone(),
                tiles: c.members.iter().map(|&m| tile_report(graph, m)).collect(),
            })
            .collect();

        Self {
            meta: ReportMeta {
                engine_version: env!("CARGO_PKG_VERSION").to_string(),
                run_at: chrono::Utc::now().to_rfc3339(),
                min_cluster_size: min_size,
            },
            summary: graph.summary().clone(),
            clusters,
            warnings: graph.warnings().to_vec(),
            row_errors: graph
                .row_errors()
                .iter()
                .map(|e| RowErrorReport {
                    row: e.row(),
                    message: e.to_string(),
                })
                .collect(),
        }
    }
}

fn tile_report(graph: &TileGraph, idx: TileIdx) -> TileReport {
    let tile = graph.tile(idx);
    TileReport {
        row: tile.row_number,
        id: tile.id.clone(),
        center: tile.center.clone(),
        edges: tile
            .edges
            .iter()
            .map(|edge| EdgeReport {
                symbol: edge.symbol.clone(),
                open: edge.is_open,
                linked_to: graph
                    .linked_edge(EdgeRef::new(idx, edge.index))
                    .map(|partner| LinkTarget {
                        id: graph.tile(partner.tile).id.clone(),
                        edge: partner.index + 1,
                    }),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{run, EngineOptions};

    const W: &str = "BBBBBB";

    fn row(id: &str, center: &str, open: &str, edges: [&str; 6]) -> Vec<String> {
        let mut cells = vec![id.to_string(), center.to_string(), open.to_string()];
        cells.extend(edges.iter().map(|e| e.to_string()));
        cells
    }

    fn sample() -> TileGraph {
        let rows = vec![
            row("https://t/1", "Snake", "1,2", ["AAAAAAA", "CCCCCCC", W, W, W, W]),
            row("https://t/2", "moon", "", [W, W, W, "AAAAAAA", W, "EEEEEEE"]),
            row("https://t/3", "", "", [W, W, "EEEEEEE", W, W, W]),
            row("https://t/4", "sun", "", ["GGGGGGG", W, W, W, W, W]),
            row("https://t/5", "star", "", [W, W, W, "GGGGGGG", W, W]),
            row("https://t/6", "lonely", "", ["HHHHHHH", W, W, W, W, W]),
        ];
        run(&rows, &EngineOptions::default())
    }

    #[test]
    fn tile_line_marks_matched_and_open_edges() {
        let graph = sample();
        let line = render_tile(&graph, graph.find("https://t/1").unwrap());
        assert_eq!(
            line,
            "row: 1 | https://t/1 | snake | -**AAAAAAA**- | -CCCCCCC- | BBBBBB | BBBBBB | BBBBBB | BBBBBB"
        );
    }

    #[test]
    fn report_orders_by_size_and_drops_singletons() {
        let graph = sample();
        let report = render_report(&graph, 2);
        let blocks: Vec<&str> = report.trim_end().split("\n\n").collect();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].lines().count(), 3);
        assert_eq!(blocks[1].lines().count(), 2);
        assert!(blocks[1].starts_with("row: 4 |"));
        assert!(!report.contains("https://t/6"));
        assert!(report.ends_with("\n\n"));
    }

    #[test]
    fn min_size_one_includes_singletons() {
        let graph = sample();
        assert_eq!(reportable_clusters(&graph, 1).len(), 3);
    }

    #[test]
    fn json_report_carries_links() {
        let graph = sample();
        let report = GraphReport::from_graph(&graph, 2);
        assert_eq!(report.clusters.len(), 2);
        assert_eq!(report.clusters[0].size, 3);
        assert_eq!(report.clusters[0].root, "https://t/1");
        let first = &report.clusters[0].tiles[0];
        let link = first.edges[0].linked_to.as_ref().unwrap();
        assert_eq!(link.id, "https://t/2");
        assert_eq!(link.edge, 4);
        assert!(first.edges[1].linked_to.is_none());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["summary"]["clusters"], 3);
        assert!(json["clusters"][0]["tiles"][0]["edges"][1].get("linked_to").is_none());
    }
}
