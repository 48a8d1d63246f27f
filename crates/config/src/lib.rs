// Configuration loading

pub mod settings;

pub use settings::{ConfigError, ReportSettings, RowSettings, Settings, SourceSettings};
