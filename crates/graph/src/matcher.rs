use std::collections::{HashMap, HashSet};

use log::{debug, warn};

use crate::index::TileIndex;
use crate::model::{EdgePair, EdgeRef, TileIdx, Warning};

/// Confirmed edge matches.
#[derive(Debug, Default)]
pub struct Matches {
    /// Every physical match in discovery order. These connect tiles for
    /// clustering, including matches whose edges were already linked.
    pub pairs: Vec<EdgePair>,
    /// One-to-one partner lookup, first link wins. Holds both directions.
    pub links: HashMap<EdgeRef, EdgeRef>,
    pub conflicts: Vec<Warning>,
}

impl Matches {
    pub fn linked_edge(&self, edge: EdgeRef) -> Option<EdgeRef> {
        self.links.get(&edge).copied()
    }
}

/// Pair every non-wall edge with the edge whose match key equals its
/// complement key, across distinct retained tiles.
///
/// Tiles are walked in row order and edges in index order, so the outcome
/// is deterministic. Every match is recorded as a pair. An edge is linked
/// at most once: when a match would relink an already linked edge, the
/// existing link is kept and an `EdgeConflict` warning is recorded.
pub fn match_edges(index: &TileIndex) -> Matches {
    let mut matches = Matches::default();
    let mut seen: HashSet<EdgePair> = HashSet::new();

    for (ti, tile) in index.tiles().iter().enumerate() {
        let here_tile = TileIdx(ti);
        for edge in tile.edges.iter().filter(|e| !e.is_wall()) {
            let key = edge.complement_key();
            let Some(owner) = index.owner_of(&key) else {
                continue;
            };
            if owner == here_tile {
                continue;
            }

            let here = EdgeRef::new(here_tile, edge.index);
            let there = EdgeRef::new(owner, key.index);
            let pair = EdgePair::new(here, there);
            if seen.contains(&pair) {
                continue;
            }

            seen.insert(pair);
            matches.pairs.push(pair);

            if let Some(conflict) = existing_link(&matches.links, here, there)
                .or_else(|| existing_link(&matches.links, there, here))
            {
                let (wanting, wanted, linked) = conflict;
                let warning = Warning::EdgeConflict {
                    id: index.tile(wanting.tile).id.clone(),
                    edge: wanting.index,
                    partner_id: index.tile(wanted.tile).id.clone(),
                    partner_edge: wanted.index,
                    linked_id: index.tile(linked.tile).id.clone(),
                    linked_edge: linked.index,
                };
                warn!("{warning}");
                matches.conflicts.push(warning);
                continue;
            }

            debug!(
                "link {} edge {} <-> {} edge {} ({})",
                tile.id,
                edge.number(),
                index.tile(owner).id,
                key.index + 1,
                edge.symbol
            );
            matches.links.insert(here, there);
            matches.links.insert(there, here);
        }
    }

    matches
}

/// `Some((edge, wanted, current))` when `edge` is already linked to
/// something other than `wanted`.
fn existing_link(
    links: &HashMap<EdgeRef, EdgeRef>,
    edge: EdgeRef,
    wanted: EdgeRef,
) -> Option<(EdgeRef, EdgeRef, EdgeRef)> {
    match links.get(&edge) {
        Some(&current) if current != wanted => Some((edge, wanted, current)),
        _ => None,
    }
}
