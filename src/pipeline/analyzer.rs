//! One-orientation analysis: all three catalog regions matched, assembled
//! into a region map, then classified.

use crate::align::LocalAligner;
use crate::catalog::ReferenceCatalog;
use crate::classify::{classify, RegionMap};
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::mapper::FastMapper;
use crate::pipeline::matcher::find_region_matches;
use crate::types::{AnalysisResult, Region, RegionResult};

pub fn analyze_sequence(
    mapper: &dyn FastMapper,
    aligner: &LocalAligner,
    catalog: &ReferenceCatalog,
    query: &[u8],
    config: &PipelineConfig,
) -> Result<AnalysisResult, PipelineError> {
    let mut regions = RegionMap::new();
    for region in Region::ALL {
        let reference = catalog.sequence(region);
        let matches = find_region_matches(mapper, aligner, reference, query, config)?;
        regions.insert(
            region,
            RegionResult::from_matches(matches, catalog.expected_length(region)),
        );
    }

    let (classification, details) = classify(&regions, config);
    Ok(AnalysisResult {
        regions,
        classification,
        details,
    })
}
