//! Orientation selection: analyze both strands, keep the one with the
//! higher aggregate confidence.

use bio::alphabets::dna;
use tracing::debug;

use crate::align::LocalAligner;
use crate::catalog::ReferenceCatalog;
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::mapper::FastMapper;
use crate::pipeline::analyzer::analyze_sequence;
use crate::types::{Strand, StrandDecision};

/// Analyze the query and its reverse complement; the reverse orientation
/// wins only on strictly greater confidence, so ties keep the forward
/// result.
pub fn check_both_strands(
    mapper: &dyn FastMapper,
    aligner: &LocalAligner,
    catalog: &ReferenceCatalog,
    query: &[u8],
    config: &PipelineConfig,
) -> Result<StrandDecision, PipelineError> {
    let forward = analyze_sequence(mapper, aligner, catalog, query, config)?;
    let rev_comp = dna::revcomp(query);
    let reverse = analyze_sequence(mapper, aligner, catalog, &rev_comp, config)?;

    let forward_confidence = forward.confidence();
    let reverse_confidence = reverse.confidence();
    debug!(forward_confidence, reverse_confidence, "strand confidences");

    if reverse_confidence > forward_confidence {
        Ok(StrandDecision {
            strand: Strand::Reverse,
            overall_confidence: reverse_confidence,
            results: reverse,
            other_results: forward,
        })
    } else {
        Ok(StrandDecision {
            strand: Strand::Forward,
            overall_confidence: forward_confidence,
            results: forward,
            other_results: reverse,
        })
    }
}
