pub mod align;
pub mod catalog;
pub mod classify;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod mapper;
pub mod pipeline;
pub mod report;
pub mod types;

pub use config::PipelineConfig;
pub use pipeline::LtrPipeline;
pub use types::{AnalysisResult, Classification, RegionMatch, Strand, StrandDecision};
