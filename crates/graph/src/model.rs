use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Serialize;

/// Number of edges on every tile.
pub const EDGE_COUNT: usize = 6;

/// Length of a regular edge symbol.
pub const SYMBOL_LEN: usize = 7;

/// Solid border symbols. Either spelling marks an edge as non-matchable.
pub const WALL_SHORT: &str = "BBBBBB";
pub const WALL_LONG: &str = "BBBBBBB";

/// Edge index on a neighboring tile that faces `index`.
pub fn opposite_index(index: u8) -> u8 {
    (index + 3) % EDGE_COUNT as u8
}

pub fn is_wall_symbol(symbol: &str) -> bool {
    symbol == WALL_SHORT || symbol == WALL_LONG
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Position of a retained tile in the graph's tile arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TileIdx(pub usize);

/// Address of one edge: owning tile plus edge index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeRef {
    pub tile: TileIdx,
    pub index: u8,
}

impl EdgeRef {
    pub fn new(tile: TileIdx, index: u8) -> Self {
        Self { tile, index }
    }
}

/// (symbol, index) signature used for the edge index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchKey {
    pub symbol: String,
    pub index: u8,
}

/// Content key: same center and same six symbols in order means same tile.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AltId {
    pub center: String,
    pub symbols: [String; EDGE_COUNT],
}

// ---------------------------------------------------------------------------
// Edge
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub index: u8,
    pub symbol: String,
    pub is_open: bool,
    pub owner_id: String,
}

impl Edge {
    /// 1-based edge number, as used in the open-edge list.
    pub fn number(&self) -> u8 {
        self.index + 1
    }

    pub fn opposite_index(&self) -> u8 {
        opposite_index(self.index)
    }

    pub fn is_wall(&self) -> bool {
        is_wall_symbol(&self.symbol)
    }

    pub fn match_key(&self) -> MatchKey {
        MatchKey {
            symbol: self.symbol.clone(),
            index: self.index,
        }
    }

    /// The match key a facing edge on a neighbor would carry.
    pub fn complement_key(&self) -> MatchKey {
        MatchKey {
            symbol: self.symbol.clone(),
            index: self.opposite_index(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tile
// ---------------------------------------------------------------------------

/// One validated input row. Equality and hashing use `id` only.
#[derive(Debug, Clone)]
pub struct Tile {
    pub id: String,
    pub row_number: usize,
    pub center: String,
    pub edges: [Edge; EDGE_COUNT],
}

impl Tile {
    /// Blank tiles are placeholders with no center label.
    pub fn is_blank(&self) -> bool {
        self.center.is_empty() || self.center == "blank"
    }

    pub fn symbols(&self) -> [String; EDGE_COUNT] {
        std::array::from_fn(|i| self.edges[i].symbol.clone())
    }

    pub fn alt_id(&self) -> AltId {
        AltId {
            center: self.center.clone(),
            symbols: self.symbols(),
        }
    }

    pub fn edge(&self, index: u8) -> &Edge {
        &self.edges[index as usize]
    }
}

impl PartialEq for Tile {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Tile {}

impl Hash for Tile {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Tile row={} id={}>", self.row_number, self.id)
    }
}

// ---------------------------------------------------------------------------
// EdgePair
// ---------------------------------------------------------------------------

/// Two matched edges, stored in canonical order (edge index ascending) so
/// that the same connection found from either side compares equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgePair {
    first: EdgeRef,
    second: EdgeRef,
}

impl EdgePair {
    pub fn new(a: EdgeRef, b: EdgeRef) -> Self {
        if (a.index, a.tile) <= (b.index, b.tile) {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    pub fn first(&self) -> EdgeRef {
        self.first
    }

    pub fn second(&self) -> EdgeRef {
        self.second
    }

    pub fn tiles(&self) -> (TileIdx, TileIdx) {
        (self.first.tile, self.second.tile)
    }
}

// ---------------------------------------------------------------------------
// Cluster
// ---------------------------------------------------------------------------

/// Tiles connected, directly or transitively, through confirmed matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    /// Tile the traversal started from.
    pub root: TileIdx,
    /// Members in arena (row) order.
    pub members: Vec<TileIdx>,
}

impl Cluster {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, tile: TileIdx) -> bool {
        self.members.binary_search(&tile).is_ok()
    }
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

/// Recoverable duplicate or conflict found while indexing and matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// A later row reused an id; the later tile was dropped.
    DuplicateId { id: String, row: usize, first_row: usize },
    /// Same center and symbols as an earlier tile under another id.
    DuplicateContent {
        id: String,
        row: usize,
        existing_id: String,
        existing_row: usize,
    },
    /// Edge signature already claimed by another tile; first registrant wins.
    DuplicateEdge {
        id: String,
        row: usize,
        edge: u8,
        symbol: String,
        existing_id: String,
        existing_row: usize,
    },
    /// Edge wanted a partner that is already linked to a different edge.
    EdgeConflict {
        id: String,
        edge: u8,
        partner_id: String,
        partner_edge: u8,
        linked_id: String,
        linked_edge: u8,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateId { id, row, first_row } => {
                write!(f, "row {row}: tile '{id}' is a duplicate of row {first_row}")
            }
            Self::DuplicateContent { id, row, existing_id, existing_row } => write!(
                f,
                "row {row}: tile '{id}' has the same content as '{existing_id}' (row {existing_row})"
            ),
            Self::DuplicateEdge { id, row, edge, symbol, existing_id, existing_row } => write!(
                f,
                "row {row}: tile '{id}' edge {} {symbol} duplicates '{existing_id}' (row {existing_row}): \
                 potential duplicate or incorrect transcription",
                edge + 1
            ),
            Self::EdgeConflict { id, edge, partner_id, partner_edge, linked_id, linked_edge } => write!(
                f,
                "tile '{id}' edge {} cannot link to '{partner_id}' edge {}: already linked to '{linked_id}' edge {}",
                edge + 1,
                partner_edge + 1,
                linked_edge + 1
            ),
        }
    }
}
