pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use crate::core::{etl::ReportEngine, pipeline::RpPipeline};
pub use domain::layer::{Layer, LayerSet};
pub use domain::model::{AnalysisMode, Condition, ImpactSheet, RawReading, Report};
pub use utils::error::{Result, RmspError};
