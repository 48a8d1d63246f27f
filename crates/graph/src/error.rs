use std::fmt;

/// Why a candidate row could not become a tile.
///
/// Scoped to one row: the row is dropped and the run continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    /// Row is too short to hold id, center, open list and six edges.
    MissingCells { row: usize, found: usize },
    /// The open-edge list has a token that is not an integer.
    OpenEdges { row: usize, id: String, value: String },
    /// An edge cell is empty, or neither 7 characters nor the wall sentinel.
    EdgeSymbol { row: usize, id: String, index: u8, value: String },
}

impl RowError {
    pub fn row(&self) -> usize {
        match self {
            Self::MissingCells { row, .. }
            | Self::OpenEdges { row, .. }
            | Self::EdgeSymbol { row, .. } => *row,
        }
    }
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCells { row, found } => {
                write!(f, "row {row}: expected at least 9 cells, found {found}")
            }
            Self::OpenEdges { row, id, value } => {
                write!(f, "row {row}, tile '{id}': open edges have incorrect format {value:?}")
            }
            Self::EdgeSymbol { row, id, index, value } => {
                write!(f, "row {row}, tile '{id}': incorrect edge {} {value:?}", index + 1)
            }
        }
    }
}

impl std::error::Error for RowError {}
