use crate::model::{Cluster, EdgePair, Tile, TileIdx};

/// Partition tiles into connected components of the match graph.
///
/// Traversal starts from non-blank tiles first, then blank ones, each group
/// in arena order. Start order only decides each cluster's `root`;
/// membership depends on connectivity alone. Every tile ends up in exactly
/// one cluster, unmatched tiles as singletons.
pub fn find_clusters(tiles: &[Tile], pairs: &[EdgePair]) -> Vec<Cluster> {
    let adjacency = build_adjacency(tiles.len(), pairs);

    let mut order: Vec<TileIdx> = (0..tiles.len()).map(TileIdx).collect();
    order.sort_by_key(|idx| tiles[idx.0].is_blank());

    let mut visited = vec![false; tiles.len()];
    let mut clusters = Vec::new();
    let mut stack = Vec::new();

    for root in order {
        if visited[root.0] {
            continue;
        }
        visited[root.0] = true;
        stack.push(root);

        let mut members = Vec::new();
        while let Some(current) = stack.pop() {
            members.push(current);
            for &next in &adjacency[current.0] {
                if !visited[next.0] {
                    visited[next.0] = true;
                    stack.push(next);
                }
            }
        }

        members.sort();
        clusters.push(Cluster { root, members });
    }

    clusters
}

fn build_adjacency(len: usize, pairs: &[EdgePair]) -> Vec<Vec<TileIdx>> {
    let mut adjacency = vec![Vec::new(); len];
    for pair in pairs {
        let (a, b) = pair.tiles();
        adjacency[a.0].push(b);
        adjacency[b.0].push(a);
    }
    adjacency
}
