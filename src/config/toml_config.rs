use crate::config::{DEFAULT_MAX_POINTS, MAX_POINTS_LIMIT, TIP_WIDTH_RANGE_CM};
use crate::core::ConfigProvider;
use crate::domain::layer::LayerSet;
use crate::domain::model::AnalysisMode;
use crate::utils::error::{Result, RmspError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub report: ReportConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    pub load: LoadConfig,
    pub advice: Option<AdviceConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub input: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub mode: Option<AnalysisMode>,
    /// 明確列出的深度區間，優先於 layer_step_cm
    pub layers: Option<Vec<String>>,
    pub layer_step_cm: Option<u32>,
    pub max_depth_cm: Option<u32>,
    pub max_points: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub compress: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdviceConfig {
    pub tip_width_cm: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RmspError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RmspError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SURVEY_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RmspError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("report.title", &self.report.title)?;

        let input = self
            .source
            .input
            .as_deref()
            .ok_or_else(|| RmspError::MissingConfigError {
                field: "source.input".to_string(),
            })?;
        validation::validate_path("source.input", input)?;
        validation::validate_file_extension("source.input", input, &["csv"])?;

        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_output_formats("load.output_formats", &self.load.output_formats)?;

        if let Some(max_points) = self.analysis.max_points {
            validation::validate_range("analysis.max_points", max_points, 1, MAX_POINTS_LIMIT)?;
        }

        if let Some(width) = self.tip_width_cm() {
            validation::validate_range(
                "advice.tip_width_cm",
                width,
                TIP_WIDTH_RANGE_CM.0,
                TIP_WIDTH_RANGE_CM.1,
            )?;
        }

        if self.analysis.layers.is_some()
            && (self.analysis.layer_step_cm.is_some() || self.analysis.max_depth_cm.is_some())
        {
            tracing::warn!("analysis.layers is set; layer_step_cm and max_depth_cm are ignored");
        }
        self.layers()?;

        Ok(())
    }

    pub fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        self.source.input.as_deref().unwrap_or_default()
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn mode(&self) -> AnalysisMode {
        self.analysis.mode.unwrap_or_default()
    }

    fn layers(&self) -> Result<LayerSet> {
        match (
            &self.analysis.layers,
            self.analysis.layer_step_cm,
            self.analysis.max_depth_cm,
        ) {
            (Some(labels), _, _) => LayerSet::new(labels),
            (None, None, None) => Ok(LayerSet::default()),
            (None, step, depth) => LayerSet::uniform(
                step.unwrap_or(LayerSet::DEFAULT_STEP_CM),
                depth.unwrap_or(LayerSet::DEFAULT_MAX_DEPTH_CM),
            ),
        }
    }

    fn max_points(&self) -> usize {
        self.analysis.max_points.unwrap_or(DEFAULT_MAX_POINTS)
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn compress(&self) -> bool {
        self.load.compress.unwrap_or(true)
    }

    fn title(&self) -> &str {
        &self.report.title
    }

    fn tip_width_cm(&self) -> Option<f64> {
        self.advice.as_ref().and_then(|a| a.tip_width_cm)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[report]
title = "Talhao 3"

[source]
input = "data/readings.csv"

[analysis]
mode = "comparison"
layers = ["0-10", "10-20", "20-30"]
max_points = 4

[load]
output_path = "./output"
output_formats = ["csv", "txt"]
compress = false

[advice]
tip_width_cm = 7.0
"#;

    #[test]
    fn test_parse_basic_toml_config() {
        let config = TomlConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.title(), "Talhao 3");
        assert_eq!(config.input_path(), "data/readings.csv");
        assert_eq!(config.mode(), AnalysisMode::Comparison);
        assert_eq!(config.layers().unwrap().len(), 3);
        assert_eq!(config.max_points(), 4);
        assert!(!config.compress());
        assert_eq!(config.tip_width_cm(), Some(7.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_when_analysis_missing() {
        let config = TomlConfig::from_toml_str(
            r#"
[report]
title = "Defaults"

[source]
input = "readings.csv"

[load]
output_path = "./output"
output_formats = ["json"]
"#,
        )
        .unwrap();

        assert_eq!(config.mode(), AnalysisMode::Profile);
        assert_eq!(config.layers().unwrap(), LayerSet::default());
        assert_eq!(config.max_points(), DEFAULT_MAX_POINTS);
        assert!(config.compress());
        assert!(!config.verbose());
    }

    #[test]
    fn test_uniform_layers_from_step() {
        let config = TomlConfig::from_toml_str(
            r#"
[report]
title = "Step"

[source]
input = "readings.csv"

[analysis]
layer_step_cm = 10
max_depth_cm = 40

[load]
output_path = "./output"
output_formats = ["csv"]
"#,
        )
        .unwrap();

        let layers = config.layers().unwrap();
        assert_eq!(layers.labels(), vec!["0-10", "10-20", "20-30", "30-40"]);

        let uneven = TomlConfig::from_toml_str(
            r#"
[report]
title = "Uneven"

[source]
input = "readings.csv"

[analysis]
layer_step_cm = 7
max_depth_cm = 50

[load]
output_path = "./output"
output_formats = ["csv"]
"#,
        )
        .unwrap();
        assert!(uneven.layers().is_err());
        assert!(matches!(
            uneven.validate(),
            Err(RmspError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("RMSP_TEST_SURVEY_DIR", "/data/field-7");

        let config = TomlConfig::from_toml_str(
            r#"
[report]
title = "Env"

[source]
input = "${RMSP_TEST_SURVEY_DIR}/readings.csv"

[load]
output_path = "./output"
output_formats = ["csv"]
"#,
        )
        .unwrap();
        assert_eq!(config.input_path(), "/data/field-7/readings.csv");

        std::env::remove_var("RMSP_TEST_SURVEY_DIR");
    }

    #[test]
    fn test_config_validation() {
        let missing_input = TomlConfig::from_toml_str(
            r#"
[report]
title = "Missing"

[source]

[load]
output_path = "./output"
output_formats = ["csv"]
"#,
        )
        .unwrap();
        assert!(matches!(
            missing_input.validate(),
            Err(RmspError::MissingConfigError { .. })
        ));

        let bad_format = BASIC.replace(r#"["csv", "txt"]"#, r#"["pdf"]"#);
        let config = TomlConfig::from_toml_str(&bad_format).unwrap();
        assert!(config.validate().is_err());

        let no_points = BASIC.replace("max_points = 4", "max_points = 0");
        let config = TomlConfig::from_toml_str(&no_points).unwrap();
        assert!(config.validate().is_err());

        let bad_layers = BASIC.replace(r#""10-20", "20-30""#, r#""5-20", "20-30""#);
        let config = TomlConfig::from_toml_str(&bad_layers).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.report.title, "Talhao 3");
    }
}
