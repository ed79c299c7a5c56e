use crate::app::export;
use crate::core::advice::SubsoilingAdvice;
use crate::core::ingest::convert_readings;
use crate::core::report::assemble;
use crate::core::{ConfigProvider, Pipeline, RawReading, Storage, TransformResult};
use crate::utils::error::Result;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const ARCHIVE_NAME: &str = "rmsp_report.zip";
pub const CSV_NAME: &str = "rp_report.csv";
pub const JSON_NAME: &str = "rp_report.json";
pub const TEXT_NAME: &str = "rp_report.txt";
pub const CHART_NAME: &str = "rp_chart.csv";

/// 讀取現場量測 CSV，計算 RP 並輸出報表
pub struct RpPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> RpPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    /// Parses readings from CSV text with a `point,layer,impacts[,condition]` header.
    pub fn parse_readings(content: &str) -> Result<Vec<RawReading>> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let mut records = Vec::new();
        for row in reader.deserialize() {
            let record: RawReading = row?;
            records.push(record);
        }
        Ok(records)
    }

    fn selected_outputs(&self, result: &TransformResult) -> Vec<(&'static str, String)> {
        let mut files = Vec::new();
        for format in self.config.output_formats() {
            match format.as_str() {
                "csv" => files.push((CSV_NAME, result.csv_output.clone())),
                "json" => files.push((JSON_NAME, result.json_output.clone())),
                "txt" => files.push((TEXT_NAME, result.text_output.clone())),
                "chart" => files.push((CHART_NAME, result.chart_output.clone())),
                other => tracing::warn!("Skipping unsupported output format: {}", other),
            }
        }
        files
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for RpPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<RawReading>> {
        tracing::debug!("Reading impact counts from: {}", self.config.input_path());
        let content = tokio::fs::read_to_string(self.config.input_path()).await?;
        let records = Self::parse_readings(&content)?;
        tracing::debug!("Parsed {} rows", records.len());
        Ok(records)
    }

    async fn transform(&self, data: Vec<RawReading>) -> Result<TransformResult> {
        let layers = self.config.layers()?;
        let mode = self.config.mode();
        tracing::debug!("Analysis mode: {}, {} layers", mode, layers.len());

        let readings = convert_readings(data, &layers, mode, self.config.max_points())?;
        let report = assemble(mode, &layers, &readings)?;
        let advice = SubsoilingAdvice::for_peak(report.peak(), self.config.tip_width_cm());

        tracing::info!(
            "Peak RP {:.2} MPa at {} cm",
            report.peak().rp_mpa,
            report.peak().layer
        );

        let exported_on = chrono::Local::now().date_naive();
        Ok(TransformResult {
            csv_output: export::render_csv(&report)?,
            json_output: export::render_json(&report, &advice)?,
            text_output: export::render_text(&report, &advice, self.config.title(), exported_on),
            chart_output: export::render_chart(&report)?,
            report,
            advice,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let files = self.selected_outputs(&result);

        if !self.config.compress() {
            for (name, content) in &files {
                tracing::debug!("Writing {} ({} bytes)", name, content.len());
                self.storage.write_file(name, content.as_bytes()).await?;
            }
            return Ok(self.config.output_path().to_string());
        }

        tracing::debug!("Creating ZIP file with {} files", files.len());

        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
            for (name, content) in &files {
                zip.start_file::<_, ()>(*name, FileOptions::default())?;
                zip.write_all(content.as_bytes())?;
            }
            let cursor = zip.finish()?;
            cursor.into_inner()
        };

        tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
        self.storage.write_file(ARCHIVE_NAME, &zip_data).await?;

        Ok(format!("{}/{}", self.config.output_path(), ARCHIVE_NAME))
    }
}
