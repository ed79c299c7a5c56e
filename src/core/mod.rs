pub mod advice;
pub mod aggregate;
pub mod etl;
pub mod extremum;
pub mod ingest;
pub mod pipeline;
pub mod reduction;
pub mod report;
pub mod rp;

pub use crate::domain::model::{RawReading, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
