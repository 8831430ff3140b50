use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// The three named LTR sub-regions. Ordering follows the canonical
/// 5'→3' layout of a proviral LTR (U3, then R, then U5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Region {
    U3,
    R,
    U5,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::U3, Region::R, Region::U5];

    pub fn name(&self) -> &'static str {
        match self {
            Region::U3 => "U3",
            Region::R => "R",
            Region::U5 => "U5",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A deduplicated candidate interval from the coarse mapper, in 0-based
/// query coordinates, with its normalized mapping quality.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub start: usize,
    pub end: usize,
    pub quality: f64,
}

/// A confirmed region detection. Coordinates are the coarse mapper's
/// original start/end, not the padded alignment window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegionMatch {
    pub similarity: f64,
    pub start: usize,
    pub end: usize,
}

/// Per-region outcome for one orientation of the query.
#[derive(Debug, Clone, Serialize)]
pub struct RegionResult {
    pub present: bool,
    /// Confirmed matches, sorted by descending similarity.
    pub matches: Vec<RegionMatch>,
    pub expected_length: usize,
}

impl RegionResult {
    pub fn absent(expected_length: usize) -> Self {
        Self {
            present: false,
            matches: Vec::new(),
            expected_length,
        }
    }

    pub fn from_matches(matches: Vec<RegionMatch>, expected_length: usize) -> Self {
        Self {
            present: !matches.is_empty(),
            matches,
            expected_length,
        }
    }

    /// Highest-similarity match, if any.
    pub fn best(&self) -> Option<&RegionMatch> {
        self.matches.first()
    }

    pub fn best_similarity(&self) -> f64 {
        self.best().map_or(0.0, |m| m.similarity)
    }
}

/// Classification labels emitted by the rule engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Classification {
    NonLtr,
    ViralRna,
    GenomicDna,
    Unclear,
}

impl Classification {
    pub fn label(&self) -> &'static str {
        match self {
            Classification::NonLtr => "Non-LTR sequence",
            Classification::ViralRna => "Likely viral RNA",
            Classification::GenomicDna => "Likely genomic DNA",
            Classification::Unclear => "Incomplete/Unclear",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Full analysis of one orientation of a query sequence.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub regions: BTreeMap<Region, RegionResult>,
    pub classification: Classification,
    pub details: Vec<String>,
}

impl AnalysisResult {
    /// Mean of per-region best similarities, 0.0 for absent regions.
    pub fn confidence(&self) -> f64 {
        let total: f64 = self
            .regions
            .values()
            .map(RegionResult::best_similarity)
            .sum();
        total / Region::ALL.len() as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Strand {
    Forward,
    Reverse,
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strand::Forward => f.write_str("forward"),
            Strand::Reverse => f.write_str("reverse"),
        }
    }
}

/// Terminal output of the pipeline: the winning orientation plus the
/// losing one for reference.
#[derive(Debug, Clone, Serialize)]
pub struct StrandDecision {
    pub strand: Strand,
    pub results: AnalysisResult,
    pub other_results: AnalysisResult,
    pub overall_confidence: f64,
}
