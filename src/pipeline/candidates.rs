//! Coarse candidate discovery: drive the mapper against one reference
//! region, apply the per-region filtering policy, and collapse
//! near-duplicate hits.

use tracing::debug;

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::mapper::{FastMapper, MAX_MAPQ};
use crate::types::{Interval, Region};

/// Find deduplicated candidate intervals for `reference` on `query`.
///
/// R and U5 are expected at the sequence termini, so their hits are kept
/// when they fall within the terminal margin of either boundary or carry a
/// quality above the screening threshold; U3 has no positional expectation
/// and is screened on quality alone.
pub fn find_candidates(
    mapper: &dyn FastMapper,
    region: Region,
    reference: &[u8],
    query: &[u8],
    config: &PipelineConfig,
) -> Result<Vec<Interval>, PipelineError> {
    let hits = mapper.map(reference, query).map_err(|e| match e {
        PipelineError::ToolInitialization { reason, .. } => PipelineError::ToolInitialization {
            region: region.to_string(),
            reason,
        },
        other => other,
    })?;

    let mut candidates: Vec<Interval> = Vec::new();
    for hit in hits {
        let quality = hit.mapping_quality as f64 / MAX_MAPQ as f64;
        let is_terminal = hit.query_start < config.terminal_margin
            || hit.query_end + config.terminal_margin > query.len();

        let accept = match region {
            Region::R | Region::U5 => is_terminal || quality > config.coarse_threshold,
            Region::U3 => quality > config.coarse_threshold,
        };
        if accept {
            candidates.push(Interval {
                start: hit.query_start,
                end: hit.query_end,
                quality,
            });
        }
    }

    let kept = dedup(candidates, config.dedup_distance);
    debug!(region = %region, candidates = kept.len(), "coarse candidates");
    Ok(kept)
}

/// Collapse candidates whose starts lie within `distance` of an already
/// kept candidate. Sorting by (start asc, quality desc) first means the
/// higher-quality member of a close pair is inspected, and kept, first.
fn dedup(mut candidates: Vec<Interval>, distance: usize) -> Vec<Interval> {
    candidates.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then(b.quality.total_cmp(&a.quality))
    });

    let mut kept: Vec<Interval> = Vec::new();
    for candidate in candidates {
        let near_duplicate = kept
            .iter()
            .any(|prev| candidate.start.abs_diff(prev.start) < distance);
        if !near_duplicate {
            kept.push(candidate);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::RawHit;

    /// Mapper stub returning a fixed hit list.
    struct FixedMapper(Vec<RawHit>);

    impl FastMapper for FixedMapper {
        fn map(&self, _reference: &[u8], _query: &[u8]) -> Result<Vec<RawHit>, PipelineError> {
            Ok(self.0.clone())
        }
    }

    fn config() -> PipelineConfig {
        PipelineConfig::default()
    }

    fn hit(start: usize, end: usize, mapq: u8) -> RawHit {
        RawHit {
            query_start: start,
            query_end: end,
            mapping_quality: mapq,
        }
    }

    #[test]
    fn close_starts_collapse_far_starts_survive() {
        let mapper = FixedMapper(vec![
            hit(100, 200, 60),
            hit(110, 210, 55),
            hit(200, 300, 60),
        ]);
        let query = vec![b'A'; 400];
        let kept =
            find_candidates(&mapper, Region::R, b"REFERENCE", &query, &config()).unwrap();
        // 100 and 110 are 10 apart and merge; 200 is 100 away and survives.
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].start, 100);
        assert_eq!(kept[1].start, 200);
    }

    #[test]
    fn dedup_prefers_higher_quality_of_a_close_pair() {
        let low_first = dedup(
            vec![
                Interval { start: 100, end: 200, quality: 0.5 },
                Interval { start: 100, end: 205, quality: 0.9 },
            ],
            50,
        );
        assert_eq!(low_first.len(), 1);
        assert_eq!(low_first[0].quality, 0.9);
    }

    #[test]
    fn u3_rejects_low_quality_terminal_hits() {
        // A low-quality hit near the start: kept for R/U5, dropped for U3.
        let mapper = || FixedMapper(vec![hit(10, 110, 20)]);
        let query = vec![b'A'; 5000];

        let r = find_candidates(&mapper(), Region::R, b"REF", &query, &config()).unwrap();
        assert_eq!(r.len(), 1);

        let u3 = find_candidates(&mapper(), Region::U3, b"REF", &query, &config()).unwrap();
        assert!(u3.is_empty());
    }

    #[test]
    fn internal_hits_need_quality_above_threshold() {
        let query = vec![b'A'; 5000];
        // Internal (beyond the 1000 margin on both sides), mapq 60 -> 1.0.
        let good = FixedMapper(vec![hit(2000, 2100, 60)]);
        assert_eq!(
            find_candidates(&good, Region::R, b"REF", &query, &config())
                .unwrap()
                .len(),
            1
        );
        // Internal, mapq 30 -> 0.5, below the 0.60 screen.
        let weak = FixedMapper(vec![hit(2000, 2100, 30)]);
        assert!(find_candidates(&weak, Region::U5, b"REF", &query, &config())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn mapper_failure_propagates() {
        struct FailingMapper;
        impl FastMapper for FailingMapper {
            fn map(&self, _r: &[u8], _q: &[u8]) -> Result<Vec<RawHit>, PipelineError> {
                Err(PipelineError::ToolInitialization {
                    region: "R".into(),
                    reason: "bad reference".into(),
                })
            }
        }
        let err = find_candidates(&FailingMapper, Region::R, b"", b"ACGT", &config()).unwrap_err();
        assert!(matches!(err, PipelineError::ToolInitialization { .. }));
    }
}
