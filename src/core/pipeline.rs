pub use crate::app::pipelines::rp_pipeline::RpPipeline;
