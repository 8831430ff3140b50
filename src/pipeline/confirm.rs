//! Refined confirmation of one coarse candidate via local alignment.

use tracing::debug;

use crate::align::LocalAligner;
use crate::config::PipelineConfig;
use crate::types::{Interval, RegionMatch};

/// Align the reference against a padded window around the candidate and
/// accept when the normalized similarity meets the final threshold.
///
/// The padding absorbs positional drift from the coarse mapper; the
/// confirmed match keeps the coarse start/end, which in practice bound the
/// region better than coordinates re-derived from the padded alignment.
pub fn confirm_candidate(
    aligner: &LocalAligner,
    reference: &[u8],
    query: &[u8],
    candidate: &Interval,
    config: &PipelineConfig,
) -> Option<RegionMatch> {
    let window_start = candidate.start.saturating_sub(config.window_padding);
    let window_end = (candidate.end + config.window_padding).min(query.len());
    if window_start >= window_end {
        return None;
    }
    let window = &query[window_start..window_end];

    let raw = aligner.align(reference, window);
    let similarity = aligner.normalized(raw, reference.len());

    if similarity >= config.final_threshold {
        debug!(
            start = candidate.start,
            end = candidate.end,
            similarity,
            "confirmed match"
        );
        Some(RegionMatch {
            similarity,
            start: candidate.start,
            end: candidate.end,
        })
    } else {
        None
    }
}
