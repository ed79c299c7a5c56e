use crate::core::advice::SubsoilingAdvice;
use crate::domain::layer::Layer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Field condition a reading was taken under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Before,
    After,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Before => "before",
            Condition::After => "after",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Condition {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "before" | "antes" => Ok(Condition::Before),
            "after" | "depois" => Ok(Condition::After),
            other => Err(format!("unknown condition '{}', expected before or after", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    /// One condition, mean RP per layer plus the peak layer.
    #[default]
    Profile,
    /// Paired before/after subsoiling readings.
    Comparison,
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisMode::Profile => f.write_str("profile"),
            AnalysisMode::Comparison => f.write_str("comparison"),
        }
    }
}

impl FromStr for AnalysisMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "profile" => Ok(AnalysisMode::Profile),
            "comparison" => Ok(AnalysisMode::Comparison),
            other => Err(format!(
                "unknown mode '{}', expected profile or comparison",
                other
            )),
        }
    }
}

/// One row as collected in the field, before any validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawReading {
    pub point: String,
    pub layer: String,
    #[serde(default)]
    pub condition: Option<String>,
    pub impacts: String,
}

/// Layer → impact mapping for one sampling point, in the order it was entered.
#[derive(Debug, Clone, Default)]
pub struct ImpactSheet {
    pub point: String,
    pub condition: Option<Condition>,
    pub impacts: Vec<(String, String)>,
}

impl ImpactSheet {
    pub fn new(point: impl Into<String>, condition: Option<Condition>) -> Self {
        Self {
            point: point.into(),
            condition,
            impacts: Vec::new(),
        }
    }

    pub fn with(mut self, layer: impl Into<String>, impacts: impl ToString) -> Self {
        self.impacts.push((layer.into(), impacts.to_string()));
        self
    }

    pub fn into_readings(self) -> Vec<RawReading> {
        let condition = self.condition.map(|c| c.as_str().to_string());
        self.impacts
            .into_iter()
            .map(|(layer, impacts)| RawReading {
                point: self.point.clone(),
                layer,
                condition: condition.clone(),
                impacts,
            })
            .collect()
    }
}

/// A validated reading with its RP already converted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    pub point: String,
    pub layer: Layer,
    pub condition: Option<Condition>,
    pub impacts: u32,
    pub rp_mpa: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedLayerResult {
    pub layer: Layer,
    pub mean_rp_mpa: f64,
    pub readings: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReductionResult {
    pub layer: Layer,
    pub rp_before_mpa: f64,
    pub rp_after_mpa: f64,
    pub reduction_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extremum {
    pub layer: Layer,
    pub rp_mpa: f64,
}

/// RP per layer for a single sampling point, in canonical order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointProfile {
    pub point: String,
    pub values: Vec<(Layer, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileRow {
    pub layer: String,
    pub depth_cm: u32,
    pub mean_rp_mpa: f64,
    pub points: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileReport {
    pub rows: Vec<ProfileRow>,
    pub max: Extremum,
    pub overall_mean_rp_mpa: f64,
    pub points: Vec<PointProfile>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub layer: String,
    pub depth_cm: u32,
    pub mean_rp_before_mpa: f64,
    pub mean_rp_after_mpa: f64,
    pub reduction_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub rows: Vec<ComparisonRow>,
    pub overall_mean_rp_before_mpa: f64,
    pub overall_mean_rp_after_mpa: f64,
    pub max_before: Extremum,
    pub unpaired_layers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Report {
    Profile(ProfileReport),
    Comparison(ComparisonReport),
}

impl Report {
    pub fn mode(&self) -> AnalysisMode {
        match self {
            Report::Profile(_) => AnalysisMode::Profile,
            Report::Comparison(_) => AnalysisMode::Comparison,
        }
    }

    /// Layer carrying the highest mean RP, before subsoiling in comparison mode.
    pub fn peak(&self) -> &Extremum {
        match self {
            Report::Profile(report) => &report.max,
            Report::Comparison(report) => &report.max_before,
        }
    }

    pub fn row_count(&self) -> usize {
        match self {
            Report::Profile(report) => report.rows.len(),
            Report::Comparison(report) => report.rows.len(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub report: Report,
    pub advice: SubsoilingAdvice,
    pub csv_output: String,
    pub json_output: String,
    pub text_output: String,
    pub chart_output: String,
}
