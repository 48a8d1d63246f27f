use std::collections::HashSet;

use crate::error::RowError;
use crate::model::{is_wall_symbol, Edge, Tile, EDGE_COUNT, SYMBOL_LEN};

/// Cells before the first edge: id, center, open-edge list.
const META_CELLS: usize = 3;

/// Header, note and blank rows are skipped silently. A tile row has more than
/// four filled cells and a link in its first cell.
pub fn is_candidate_row<S: AsRef<str>>(cells: &[S], url_marker: &str) -> bool {
    let filled = cells.iter().filter(|c| !c.as_ref().is_empty()).count();
    filled > 4
        && cells
            .first()
            .map(|c| c.as_ref().contains(url_marker))
            .unwrap_or(false)
}

/// Build a tile from one row: `[id, center, open_edges, edge0..edge5, ...]`.
/// Cells after the sixth edge are ignored.
pub fn parse_tile<S: AsRef<str>>(cells: &[S], row_number: usize) -> Result<Tile, RowError> {
    if cells.len() < META_CELLS + EDGE_COUNT {
        return Err(RowError::MissingCells {
            row: row_number,
            found: cells.len(),
        });
    }

    let id = cells[0].as_ref().trim().to_string();
    let center = cells[1].as_ref().trim().to_lowercase();
    let open = parse_open_edges(cells[2].as_ref()).map_err(|value| RowError::OpenEdges {
        row: row_number,
        id: id.clone(),
        value,
    })?;

    let mut edges = Vec::with_capacity(EDGE_COUNT);
    for (i, raw) in cells[META_CELLS..META_CELLS + EDGE_COUNT].iter().enumerate() {
        let index = i as u8;
        let symbol = raw.as_ref().to_uppercase();
        if !is_valid_symbol(&symbol) {
            return Err(RowError::EdgeSymbol {
                row: row_number,
                id,
                index,
                value: symbol,
            });
        }
        edges.push(Edge {
            index,
            is_open: open.contains(&(i64::from(index) + 1)),
            symbol,
            owner_id: id.clone(),
        });
    }

    let edges: [Edge; EDGE_COUNT] = edges
        .try_into()
        .map_err(|v: Vec<Edge>| RowError::MissingCells { row: row_number, found: META_CELLS + v.len() })?;

    Ok(Tile {
        id,
        row_number,
        center,
        edges,
    })
}

fn is_valid_symbol(symbol: &str) -> bool {
    !symbol.is_empty() && (symbol.chars().count() == SYMBOL_LEN || is_wall_symbol(symbol))
}

/// Parse a comma-separated list of 1-based edge numbers. Returns the
/// offending input on failure.
fn parse_open_edges(raw: &str) -> Result<HashSet<i64>, String> {
    let mut open = HashSet::new();
    if raw.trim().is_empty() {
        return Ok(open);
    }
    for token in raw.split(',') {
        let n: i64 = token.trim().parse().map_err(|_| raw.to_string())?;
        open.insert(n);
    }
    Ok(open)
}
