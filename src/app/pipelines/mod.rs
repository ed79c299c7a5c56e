pub mod rp_pipeline;
