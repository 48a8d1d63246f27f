use std::collections::HashMap;

use log::{info, warn};

use crate::cluster::find_clusters;
use crate::error::RowError;
use crate::index::TileIndex;
use crate::matcher::match_edges;
use crate::model::{Cluster, EdgePair, EdgeRef, Tile, TileIdx, Warning};
use crate::parse::{is_candidate_row, parse_tile};
use crate::summary::{compute_summary, RowStats, RunSummary};

/// Default marker a tile row's first cell must contain.
pub const DEFAULT_URL_MARKER: &str = "https";

#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub url_marker: String,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            url_marker: DEFAULT_URL_MARKER.to_string(),
        }
    }
}

/// Result of a full build: retained tiles, confirmed matches and clusters.
#[derive(Debug)]
pub struct TileGraph {
    tiles: Vec<Tile>,
    pairs: Vec<EdgePair>,
    links: HashMap<EdgeRef, EdgeRef>,
    clusters: Vec<Cluster>,
    warnings: Vec<Warning>,
    row_errors: Vec<RowError>,
    summary: RunSummary,
}

/// Run the whole pipeline over a fully loaded table. Row numbers are
/// 1-based positions in `rows`.
///
/// Data problems never fail the run: bad rows are dropped and reported in
/// `row_errors`, duplicates and conflicts in `warnings`.
pub fn run<S: AsRef<str>>(rows: &[Vec<S>], options: &EngineOptions) -> TileGraph {
    let mut stats = RowStats::default();
    let mut tiles = Vec::new();
    let mut row_errors = Vec::new();

    for (i, cells) in rows.iter().enumerate() {
        stats.seen += 1;
        if !is_candidate_row(cells, &options.url_marker) {
            stats.skipped += 1;
            continue;
        }
        match parse_tile(cells, i + 1) {
            Ok(tile) => tiles.push(tile),
            Err(e) => {
                warn!("{e}");
                stats.invalid += 1;
                row_errors.push(e);
            }
        }
    }

    build(tiles, row_errors, stats)
}

/// Run matching and clustering over tiles that were validated elsewhere.
pub fn run_tiles(tiles: Vec<Tile>) -> TileGraph {
    let stats = RowStats {
        seen: tiles.len(),
        ..RowStats::default()
    };
    build(tiles, Vec::new(), stats)
}

fn build(tiles: Vec<Tile>, row_errors: Vec<RowError>, stats: RowStats) -> TileGraph {
    let index = TileIndex::build(tiles);
    info!("Found {} unique tiles", index.tiles().len());

    let matches = match_edges(&index);
    let (tiles, mut warnings) = index.into_parts();
    warnings.extend(matches.conflicts);

    let clusters = find_clusters(&tiles, &matches.pairs);
    let summary = compute_summary(stats, tiles.len(), matches.pairs.len(), &warnings, &clusters);
    info!(
        "{} links, {} clusters (largest {})",
        summary.links, summary.clusters, summary.largest_cluster
    );

    TileGraph {
        tiles,
        pairs: matches.pairs,
        links: matches.links,
        clusters,
        warnings,
        row_errors,
        summary,
    }
}

impl TileGraph {
    /// Retained tiles in row order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, idx: TileIdx) -> &Tile {
        &self.tiles[idx.0]
    }

    pub fn find(&self, id: &str) -> Option<TileIdx> {
        self.tiles.iter().position(|t| t.id == id).map(TileIdx)
    }

    pub fn pairs(&self) -> &[EdgePair] {
        &self.pairs
    }

    /// Partner of a matched edge.
    pub fn linked_edge(&self, edge: EdgeRef) -> Option<EdgeRef> {
        self.links.get(&edge).copied()
    }

    pub fn is_linked(&self, edge: EdgeRef) -> bool {
        self.links.contains_key(&edge)
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn cluster_of(&self, idx: TileIdx) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.contains(idx))
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn row_errors(&self) -> &[RowError] {
        &self.row_errors
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    /// True when ingestion or indexing reported anything.
    pub fn has_issues(&self) -> bool {
        !self.row_errors.is_empty() || !self.warnings.is_empty()
    }
}
