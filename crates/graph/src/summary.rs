use serde::Serialize;

use crate::model::{Cluster, Warning};

/// Row counters gathered during ingestion.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowStats {
    pub seen: usize,
    /// Header, note and blank rows.
    pub skipped: usize,
    pub invalid: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub rows_seen: usize,
    pub rows_skipped: usize,
    pub rows_invalid: usize,
    pub tiles_retained: usize,
    pub duplicate_ids: usize,
    pub duplicate_contents: usize,
    pub duplicate_edges: usize,
    pub edge_conflicts: usize,
    pub links: usize,
    pub clusters: usize,
    pub largest_cluster: usize,
    pub singletons: usize,
}

/// Compute summary statistics for a finished run.
pub fn compute_summary(
    rows: RowStats,
    tiles_retained: usize,
    links: usize,
    warnings: &[Warning],
    clusters: &[Cluster],
) -> RunSummary {
    let mut summary = RunSummary {
        rows_seen: rows.seen,
        rows_skipped: rows.skipped,
        rows_invalid: rows.invalid,
        tiles_retained,
        links,
        clusters: clusters.len(),
        ..RunSummary::default()
    };

    for w in warnings {
        match w {
            Warning::DuplicateId { .. } => summary.duplicate_ids += 1,
            Warning::DuplicateContent { .. } => summary.duplicate_contents += 1,
            Warning::DuplicateEdge { .. } => summary.duplicate_edges += 1,
            Warning::EdgeConflict { .. } => summary.edge_conflicts += 1,
        }
    }

    for c in clusters {
        summary.largest_cluster = summary.largest_cluster.max(c.len());
        if c.len() == 1 {
            summary.singletons += 1;
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TileIdx;

    fn cluster(members: &[usize]) -> Cluster {
        Cluster {
            root: TileIdx(members[0]),
            members: members.iter().copied().map(TileIdx).collect(),
        }
    }

    #[test]
    fn summary_counts() {
        let warnings = vec![
            Warning::DuplicateId { id: "a".into(), row: 3, first_row: 1 },
            Warning::DuplicateEdge {
                id: "b".into(),
                row: 4,
                edge: 0,
                symbol: "AAAAAAA".into(),
                existing_id: "c".into(),
                existing_row: 2,
            },
            Warning::DuplicateEdge {
                id: "b".into(),
                row: 4,
                edge: 1,
                symbol: "CCCCCCC".into(),
                existing_id: "c".into(),
                existing_row: 2,
            },
        ];
        let clusters = vec![cluster(&[0, 1, 2]), cluster(&[3]), cluster(&[4])];
        let rows = RowStats { seen: 9, skipped: 2, invalid: 1 };
        let s = compute_summary(rows, 5, 2, &warnings, &clusters);
        assert_eq!(s.rows_seen, 9);
        assert_eq!(s.rows_invalid, 1);
        assert_eq!(s.tiles_retained, 5);
        assert_eq!(s.duplicate_ids, 1);
        assert_eq!(s.duplicate_edges, 2);
        assert_eq!(s.duplicate_contents, 0);
        assert_eq!(s.clusters, 3);
        assert_eq!(s.largest_cluster, 3);
        assert_eq!(s.singletons, 2);
    }
}
