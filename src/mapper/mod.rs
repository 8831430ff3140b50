mod minimizer;

pub use minimizer::MinimizerMapper;

use crate::error::PipelineError;

/// Highest mapping quality a mapper may report; normalized qualities are
/// `mapping_quality / MAX_MAPQ`.
pub const MAX_MAPQ: u8 = 60;

/// One raw hit from the coarse mapper, in 0-based query coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawHit {
    pub query_start: usize,
    pub query_end: usize,
    pub mapping_quality: u8,
}

/// Tuning knobs for the coarse mapper.
#[derive(Clone, Debug)]
pub struct MapperConfig {
    /// Minimizer k-mer size.
    pub kmer_size: usize,
    /// Minimizer window size; 1 keeps every k-mer.
    pub window_size: usize,
    /// Fraction of the most frequent reference minimizers to mask out.
    pub occurrence_frac: f64,
    /// Maximum query-position gap between chained anchors.
    pub max_chain_skip: usize,
    /// Minimum chain score (approximate matched bases) for a hit.
    pub min_chain_score: u32,
    /// Return at most this many best hits.
    pub max_hits: usize,
}

impl MapperConfig {
    /// High-sensitivity preset for short references against long, noisy
    /// (ONT-like) queries: small seeds, no minimizer subsampling, many hits.
    pub fn sensitive() -> Self {
        Self {
            kmer_size: 10,
            window_size: 1,
            occurrence_frac: 0.0002,
            max_chain_skip: 100,
            min_chain_score: 20,
            max_hits: 10,
        }
    }
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self::sensitive()
    }
}

/// Approximate sequence mapper: builds an index over `reference` and
/// reports candidate hit intervals on `query` with a mapping quality.
///
/// Implementations must fail with [`PipelineError::ToolInitialization`]
/// when no index can be built from the reference, and must not carry any
/// state across calls.
pub trait FastMapper {
    fn map(&self, reference: &[u8], query: &[u8]) -> Result<Vec<RawHit>, PipelineError>;
}
