pub mod analyzer;
pub mod candidates;
pub mod confirm;
pub mod matcher;
pub mod strand;

use crate::align::LocalAligner;
use crate::catalog::{normalize, ReferenceCatalog};
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::mapper::{FastMapper, MinimizerMapper};
use crate::types::StrandDecision;

/// The assembled detection pipeline: catalog, coarse mapper, refined
/// aligner, and configuration, wired once and reused across records.
pub struct LtrPipeline {
    catalog: ReferenceCatalog,
    mapper: Box<dyn FastMapper>,
    aligner: LocalAligner,
    config: PipelineConfig,
}

impl LtrPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let mapper = Box::new(MinimizerMapper::new(config.mapper.clone()));
        Self::with_mapper(config, mapper)
    }

    /// Build the pipeline around a caller-supplied coarse mapper.
    pub fn with_mapper(config: PipelineConfig, mapper: Box<dyn FastMapper>) -> Self {
        Self {
            catalog: ReferenceCatalog::new(),
            aligner: LocalAligner::new(&config),
            mapper,
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ReferenceCatalog {
        &self.catalog
    }

    /// Analyze one raw record on both strands and pick the winner.
    pub fn check_record(&self, raw_sequence: &str) -> Result<StrandDecision, PipelineError> {
        let query = normalize(raw_sequence);
        strand::check_both_strands(
            self.mapper.as_ref(),
            &self.aligner,
            &self.catalog,
            &query,
            &self.config,
        )
    }
}
