use crate::mapper::MapperConfig;

/// All tunable constants of the detection pipeline, fixed at construction.
///
/// Scoring note: the refined aligner works in integer scores, so the
/// four alignment parameters are scaled by [`SCORE_SCALE`] before use.
/// Normalized similarities are unaffected by the scaling.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Screening threshold for normalized coarse mapping quality.
    pub coarse_threshold: f64,
    /// Acceptance threshold for normalized local-alignment similarity.
    pub final_threshold: f64,
    pub match_score: f32,
    pub mismatch_score: f32,
    pub gap_open: f32,
    pub gap_extend: f32,
    /// Bases added on each side of a candidate before refined alignment.
    pub window_padding: usize,
    /// Candidates whose starts are closer than this collapse to one.
    pub dedup_distance: usize,
    /// Distance from a sequence boundary within which R/U5 hits are kept
    /// regardless of mapping quality.
    pub terminal_margin: usize,
    /// A 5' R match must start before this position.
    pub five_prime_limit: usize,
    /// 3' R threshold when no U5 match anchors a dynamic one.
    pub three_prime_fallback: usize,
    /// Offset past the first U5 start for the dynamic 3' R threshold.
    pub u5_downstream_offset: usize,
    pub mapper: MapperConfig,
}

/// Integer scaling applied to alignment scores so the fractional gap-extend
/// penalty stays exact.
pub const SCORE_SCALE: f32 = 2.0;

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            coarse_threshold: 0.60,
            final_threshold: 0.70,
            match_score: 2.0,
            mismatch_score: -1.0,
            gap_open: -2.0,
            gap_extend: -0.5,
            window_padding: 30,
            dedup_distance: 50,
            terminal_margin: 1000,
            five_prime_limit: 200,
            three_prime_fallback: 5000,
            u5_downstream_offset: 1000,
            mapper: MapperConfig::sensitive(),
        }
    }
}

impl PipelineConfig {
    pub fn with_thresholds(mut self, coarse: f64, fin: f64) -> Self {
        self.coarse_threshold = coarse;
        self.final_threshold = fin;
        self
    }

    pub fn with_gap_penalties(mut self, gap_open: f32, gap_extend: f32) -> Self {
        self.gap_open = gap_open;
        self.gap_extend = gap_extend;
        self
    }

    pub(crate) fn scaled_match(&self) -> i32 {
        (self.match_score * SCORE_SCALE).round() as i32
    }

    pub(crate) fn scaled_mismatch(&self) -> i32 {
        (self.mismatch_score * SCORE_SCALE).round() as i32
    }

    pub(crate) fn scaled_gap_open(&self) -> i32 {
        (self.gap_open * SCORE_SCALE).round() as i32
    }

    pub(crate) fn scaled_gap_extend(&self) -> i32 {
        (self.gap_extend * SCORE_SCALE).round() as i32
    }
}
