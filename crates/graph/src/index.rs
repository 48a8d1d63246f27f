use std::collections::HashMap;

use log::warn;

use crate::model::{AltId, MatchKey, Tile, TileIdx, Warning};

/// Working index over validated tiles.
///
/// Tiles are registered in row order through three checks, each with a
/// first-registrant-wins policy:
/// 1. `by_id`: a repeated id drops the later tile entirely.
/// 2. `by_alt`: repeated content under a new id keeps the id registered but
///    drops the tile from matching and clustering.
/// 3. `by_match_key`: a non-wall edge signature already claimed by another
///    tile is not registered for the later tile. The tile itself is kept.
#[derive(Debug, Default)]
pub struct TileIndex {
    tiles: Vec<Tile>,
    by_id: HashMap<String, usize>,
    by_alt: HashMap<AltId, TileIdx>,
    by_match_key: HashMap<MatchKey, TileIdx>,
    warnings: Vec<Warning>,
}

impl TileIndex {
    pub fn build(tiles: impl IntoIterator<Item = Tile>) -> Self {
        let mut index = Self::default();
        for tile in tiles {
            index.insert(tile);
        }
        index
    }

    /// Register one tile. Returns its arena position when it was retained.
    pub fn insert(&mut self, tile: Tile) -> Option<TileIdx> {
        if let Some(&first_row) = self.by_id.get(&tile.id) {
            warn!("tile {} is a duplicate of row {}", tile, first_row);
            self.warnings.push(Warning::DuplicateId {
                id: tile.id,
                row: tile.row_number,
                first_row,
            });
            return None;
        }
        self.by_id.insert(tile.id.clone(), tile.row_number);

        let alt_id = tile.alt_id();
        if let Some(&existing) = self.by_alt.get(&alt_id) {
            let found = &self.tiles[existing.0];
            warn!("tile {} has the same content as {}", tile, found);
            self.warnings.push(Warning::DuplicateContent {
                id: tile.id,
                row: tile.row_number,
                existing_id: found.id.clone(),
                existing_row: found.row_number,
            });
            return None;
        }

        let idx = TileIdx(self.tiles.len());
        self.by_alt.insert(alt_id, idx);

        for edge in tile.edges.iter().filter(|e| !e.is_wall()) {
            let key = edge.match_key();
            if let Some(&owner) = self.by_match_key.get(&key) {
                let found = &self.tiles[owner.0];
                warn!(
                    "{} and {} have dup sides: potential duplicate or incorrect transcription",
                    tile, found
                );
                self.warnings.push(Warning::DuplicateEdge {
                    id: tile.id.clone(),
                    row: tile.row_number,
                    edge: edge.index,
                    symbol: edge.symbol.clone(),
                    existing_id: found.id.clone(),
                    existing_row: found.row_number,
                });
            } else {
                self.by_match_key.insert(key, idx);
            }
        }

        self.tiles.push(tile);
        Some(idx)
    }

    /// Retained tiles in row order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, idx: TileIdx) -> &Tile {
        &self.tiles[idx.0]
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Retained tile owning the given edge signature.
    pub fn owner_of(&self, key: &MatchKey) -> Option<TileIdx> {
        self.by_match_key.get(key).copied()
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn into_parts(self) -> (Vec<Tile>, Vec<Warning>) {
        (self.tiles, self.warnings)
    }
}
