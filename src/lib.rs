pub mod analytics;
pub mod catalog;
pub mod enrichment;
pub mod error;
pub mod models;
pub mod parser;
pub mod reader;
pub mod report;
pub mod validator;
pub mod writer;
mod processor;

// Re-export the pipeline entry points for convenience
pub use processor::{run_pipeline, run_pipeline_with_options, PipelineOptions, PipelineSummary};
