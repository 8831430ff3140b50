//! Per-region orchestration: coarse candidates, refined confirmation, and
//! ordering of the confirmed matches.

use tracing::debug;

use crate::align::LocalAligner;
use crate::catalog::{normalize_bytes, ReferenceCatalog};
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::mapper::FastMapper;
use crate::pipeline::candidates::find_candidates;
use crate::pipeline::confirm::confirm_candidate;
use crate::types::RegionMatch;

/// Find all confirmed matches of `reference` in `query`, sorted by
/// descending similarity. Ties keep candidate order, which is itself
/// start-ascending from deduplication.
///
/// The reference may be any catalog sequence; its region type is inferred
/// so the candidate filter policy does not need to be told which region it
/// is working on.
pub fn find_region_matches(
    mapper: &dyn FastMapper,
    aligner: &LocalAligner,
    reference: &[u8],
    query: &[u8],
    config: &PipelineConfig,
) -> Result<Vec<RegionMatch>, PipelineError> {
    let reference = normalize_bytes(reference);
    let query = normalize_bytes(query);

    let region = ReferenceCatalog::classify_reference(&reference);
    let candidates = find_candidates(mapper, region, &reference, &query, config)?;
    debug!(region = %region, n = candidates.len(), "checking candidates");

    let mut matches: Vec<RegionMatch> = candidates
        .iter()
        .filter_map(|candidate| confirm_candidate(aligner, &reference, &query, candidate, config))
        .collect();

    matches.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::{MapperConfig, MinimizerMapper};

    #[test]
    fn matches_come_back_sorted_by_similarity() {
        let catalog = ReferenceCatalog::new();
        let config = PipelineConfig::default();
        let mapper = MinimizerMapper::new(MapperConfig::sensitive());
        let aligner = LocalAligner::new(&config);
        let r = catalog.sequence(crate::types::Region::R);

        // Pristine copy at the start, a mutated (weaker) copy at the end.
        let mut weaker = r.to_vec();
        for pos in [10, 30, 50, 70] {
            weaker[pos] = match weaker[pos] {
                b'A' => b'C',
                _ => b'A',
            };
        }
        let mut query = r.to_vec();
        query.extend(vec![b'T'; 300]);
        query.extend_from_slice(&weaker);

        let matches =
            find_region_matches(&mapper, &aligner, r, &query, &config).unwrap();
        assert_eq!(matches.len(), 2);
        assert!(matches[0].similarity > matches[1].similarity);
        assert_eq!(matches[0].start, 0);
    }
}
