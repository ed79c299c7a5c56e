use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

pub struct ReportEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ReportEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("Starting RP report run");

        // Extract
        let raw_data = self.pipeline.extract().await?;
        tracing::info!("Extracted {} readings", raw_data.len());

        // Transform
        let transformed = self.pipeline.transform(raw_data).await?;
        tracing::info!(
            "Computed {} report rows ({} mode)",
            transformed.report.row_count(),
            transformed.report.mode()
        );

        // Load
        let output_path = self.pipeline.load(transformed).await?;
        tracing::info!("Output saved to: {} in {:?}", output_path, started.elapsed());

        Ok(output_path)
    }
}
