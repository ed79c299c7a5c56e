pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::domain::layer::LayerSet;
use crate::domain::model::AnalysisMode;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_POINTS: usize = 20;
pub const MAX_POINTS_LIMIT: usize = 1000;
pub const TIP_WIDTH_RANGE_CM: (f64, f64) = (1.0, 30.0);

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "rmsp-etl")]
#[command(about = "Soil penetration resistance (RP) report from impact penetrometer counts")]
pub struct CliConfig {
    /// CSV with point,layer,impacts and an optional condition column
    #[arg(short, long)]
    pub input: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// profile (single condition) or comparison (before/after subsoiling)
    #[arg(long, default_value = "profile")]
    pub mode: AnalysisMode,

    /// Layer labels in depth order, e.g. 0-10,10-20. Defaults to 5 cm layers down to 50 cm
    #[arg(long, value_delimiter = ',')]
    pub layers: Vec<String>,

    #[arg(long, default_value_t = DEFAULT_MAX_POINTS)]
    pub max_points: usize,

    #[arg(long, value_delimiter = ',', default_value = "csv,json,txt,chart")]
    pub output_formats: Vec<String>,

    /// Write plain files instead of a ZIP bundle
    #[arg(long)]
    pub no_zip: bool,

    #[arg(long, default_value = "Soil penetration resistance survey")]
    pub title: String,

    /// Subsoiler tine tip width, used for the working depth range
    #[arg(long)]
    pub tip_width_cm: Option<f64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn mode(&self) -> AnalysisMode {
        self.mode
    }

    fn layers(&self) -> Result<LayerSet> {
        if self.layers.is_empty() {
            Ok(LayerSet::default())
        } else {
            LayerSet::new(&self.layers)
        }
    }

    fn max_points(&self) -> usize {
        self.max_points
    }

    fn output_formats(&self) -> &[String] {
        &self.output_formats
    }

    fn compress(&self) -> bool {
        !self.no_zip
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn tip_width_cm(&self) -> Option<f64> {
        self.tip_width_cm
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input", &self.input)?;
        validation::validate_file_extension("input", &self.input, &["csv"])?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_range("max_points", self.max_points, 1, MAX_POINTS_LIMIT)?;
        validation::validate_output_formats("output_formats", &self.output_formats)?;
        validation::validate_non_empty_string("title", &self.title)?;
        if let Some(width) = self.tip_width_cm {
            validation::validate_range(
                "tip_width_cm",
                width,
                TIP_WIDTH_RANGE_CM.0,
                TIP_WIDTH_RANGE_CM.1,
            )?;
        }
        self.layers()?;
        Ok(())
    }
}
