use crate::domain::layer::LayerSet;
use crate::domain::model::{AnalysisMode, RawReading, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn mode(&self) -> AnalysisMode;
    fn layers(&self) -> Result<LayerSet>;
    fn max_points(&self) -> usize;
    fn output_formats(&self) -> &[String];
    fn compress(&self) -> bool;
    fn title(&self) -> &str;
    fn tip_width_cm(&self) -> Option<f64>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<RawReading>>;
    async fn transform(&self, data: Vec<RawReading>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
