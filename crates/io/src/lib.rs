// File I/O operations

pub mod report;
pub mod table;

/// A fully loaded tile table: rows of cells, row widths may differ.
pub type Table = Vec<Vec<String>>;
