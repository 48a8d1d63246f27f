//! `hexlink-graph`: hex tile edge matching and clustering engine.
//!
//! Pure engine crate: receives a fully loaded table of rows, returns the
//! match graph and its clusters. No CLI, network or file IO dependencies.

pub mod cluster;
pub mod engine;
pub mod error;
pub mod index;
pub mod matcher;
pub mod model;
pub mod parse;
pub mod report;
pub mod summary;

pub use engine::{run, run_tiles, EngineOptions, TileGraph};
pub use error::RowError;
pub use model::{Cluster, Edge, EdgePair, EdgeRef, MatchKey, Tile, TileIdx, Warning};
pub use report::{render_report, reportable_clusters, GraphReport};
