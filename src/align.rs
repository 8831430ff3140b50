use bio::alignment::pairwise::{Aligner, MatchParams};

use crate::config::PipelineConfig;

/// Refined scorer: best local alignment between a reference region and a
/// candidate window, Smith-Waterman with affine gaps.
///
/// Scores are held in scaled integer form (see [`crate::config::SCORE_SCALE`]);
/// [`Self::normalized`] divides the scaling back out, so callers only ever
/// see similarities in [0, 1].
#[derive(Clone, Debug)]
pub struct LocalAligner {
    match_score: i32,
    mismatch_score: i32,
    gap_open: i32,
    gap_extend: i32,
}

impl LocalAligner {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            match_score: config.scaled_match(),
            mismatch_score: config.scaled_mismatch(),
            gap_open: config.scaled_gap_open(),
            gap_extend: config.scaled_gap_extend(),
        }
    }

    /// Raw (scaled) score of the best local alignment, 0 when the inputs
    /// share no positive-scoring region.
    pub fn align(&self, reference: &[u8], window: &[u8]) -> i32 {
        if reference.is_empty() || window.is_empty() {
            return 0;
        }
        let scoring = MatchParams::new(self.match_score, self.mismatch_score);
        let mut aligner = Aligner::with_capacity(
            reference.len(),
            window.len(),
            self.gap_open,
            self.gap_extend,
            scoring,
        );
        aligner.local(reference, window).score
    }

    /// Normalize a raw score against the theoretical maximum for a perfect
    /// full-length match of the reference.
    pub fn normalized(&self, raw_score: i32, reference_len: usize) -> f64 {
        if reference_len == 0 {
            return 0.0;
        }
        raw_score as f64 / (reference_len as f64 * self.match_score as f64)
    }
}
