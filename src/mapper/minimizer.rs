//! Default in-process coarse mapper.
//!
//! Seeds are minimizers of the reference; query minimizers hitting the index
//! become anchors, anchors are chained per diagonal band, and each surviving
//! chain is reported as a hit with a minimap2-style mapping quality. The
//! index is a local value of each `map` call, so nothing persists across
//! calls or leaks on failure.

use std::collections::HashMap;

use crate::error::PipelineError;
use crate::mapper::{FastMapper, MapperConfig, RawHit, MAX_MAPQ};

/// Anchors whose diagonals differ by no more than this chain together.
const DIAG_TOLERANCE: i64 = 50;

/// Fraction of a query span two chains must share to compete for mapq.
const OVERLAP_FRAC: f64 = 0.5;

#[derive(Debug, Clone, Copy)]
struct Anchor {
    qpos: usize,
    rpos: usize,
}

impl Anchor {
    fn diag(&self) -> i64 {
        self.qpos as i64 - self.rpos as i64
    }
}

#[derive(Debug)]
struct Chain {
    first: Anchor,
    last: Anchor,
    n_anchors: usize,
    score: u32,
    query_start: usize,
    query_end: usize,
}

pub struct MinimizerMapper {
    config: MapperConfig,
}

impl MinimizerMapper {
    pub fn new(config: MapperConfig) -> Self {
        Self { config }
    }

    fn index_reference(
        &self,
        reference: &[u8],
    ) -> Result<HashMap<u64, Vec<usize>>, PipelineError> {
        let k = self.config.kmer_size;
        if reference.len() < k {
            return Err(init_error(
                reference,
                format!(
                    "reference length {} is below the seed size {}",
                    reference.len(),
                    k
                ),
            ));
        }

        let mut index: HashMap<u64, Vec<usize>> = HashMap::new();
        for (value, pos) in minimizers(reference, k, self.config.window_size) {
            index.entry(value).or_default().push(pos);
        }
        if index.is_empty() {
            return Err(init_error(
                reference,
                "reference contains no indexable seeds".to_string(),
            ));
        }

        self.mask_frequent(&mut index);
        Ok(index)
    }

    /// Drop the most frequent fraction of distinct minimizer values, the
    /// usual repeat-masking step. A no-op for small references where the
    /// quantile rounds to zero values.
    fn mask_frequent(&self, index: &mut HashMap<u64, Vec<usize>>) {
        let frac = self.config.occurrence_frac;
        if frac <= 0.0 || index.is_empty() {
            return;
        }
        let n_masked = ((index.len() as f64 * frac) as usize).min(index.len());
        if n_masked == 0 {
            return;
        }
        let mut counts: Vec<usize> = index.values().map(Vec::len).collect();
        counts.sort_unstable_by(|a, b| b.cmp(a));
        let cutoff = counts[n_masked - 1];
        index.retain(|_, positions| positions.len() < cutoff);
    }

    /// Greedy chaining over anchors sorted by (diagonal, query position).
    /// A chain breaks when the diagonal drifts past the tolerance or the
    /// query gap exceeds the configured skip allowance.
    fn chain_anchors(&self, mut anchors: Vec<Anchor>) -> Vec<Chain> {
        anchors.sort_unstable_by_key(|a| (a.diag(), a.qpos));

        let mut chains: Vec<Chain> = Vec::new();
        let mut start = 0;
        for i in 1..=anchors.len() {
            let split = i == anchors.len() || {
                let prev = anchors[i - 1];
                let next = anchors[i];
                (next.diag() - prev.diag()).abs() > DIAG_TOLERANCE
                    || next.qpos < prev.qpos
                    || next.qpos - prev.qpos > self.config.max_chain_skip
            };
            if split {
                chains.push(self.build_chain(&anchors[start..i]));
                start = i;
            }
        }

        chains.retain(|c| c.score >= self.config.min_chain_score);
        chains
    }

    fn build_chain(&self, anchors: &[Anchor]) -> Chain {
        let first = anchors[0];
        let last = anchors[anchors.len() - 1];
        Chain {
            first,
            last,
            n_anchors: anchors.len(),
            score: (anchors.len() * self.config.kmer_size) as u32,
            query_start: 0,
            query_end: 0,
        }
    }
}

impl FastMapper for MinimizerMapper {
    fn map(&self, reference: &[u8], query: &[u8]) -> Result<Vec<RawHit>, PipelineError> {
        let index = self.index_reference(reference)?;

        let k = self.config.kmer_size;
        if query.len() < k {
            return Ok(Vec::new());
        }

        let mut anchors = Vec::new();
        for (value, qpos) in minimizers(query, k, self.config.window_size) {
            if let Some(positions) = index.get(&value) {
                for &rpos in positions {
                    anchors.push(Anchor { qpos, rpos });
                }
            }
        }
        if anchors.is_empty() {
            return Ok(Vec::new());
        }

        let mut chains = self.chain_anchors(anchors);

        // Project each chain's span out to cover the whole reference,
        // clamped to the query, so a hit approximates the full region
        // interval rather than just the seeded core.
        for chain in &mut chains {
            chain.query_start = chain.first.qpos.saturating_sub(chain.first.rpos);
            chain.query_end =
                (chain.last.qpos + (reference.len() - chain.last.rpos)).min(query.len());
        }

        chains.sort_unstable_by(|a, b| b.score.cmp(&a.score));
        chains.truncate(self.config.max_hits);

        let hits = chains
            .iter()
            .enumerate()
            .map(|(i, chain)| RawHit {
                query_start: chain.query_start,
                query_end: chain.query_end,
                mapping_quality: mapq(chain, &chains, i),
            })
            .collect();
        Ok(hits)
    }
}

fn init_error(reference: &[u8], reason: String) -> PipelineError {
    PipelineError::ToolInitialization {
        region: String::from_utf8_lossy(&reference[..reference.len().min(12)]).into_owned(),
        reason,
    }
}

/// Mapping quality in 0..=60, degraded when another chain covers a
/// comparable query span with a comparable score.
fn mapq(chain: &Chain, all: &[Chain], index: usize) -> u8 {
    let s1 = chain.score as f64;
    let mut s2 = 0.0f64;
    for (j, other) in all.iter().enumerate() {
        if j != index && overlap_fraction(chain, other) >= OVERLAP_FRAC {
            s2 = s2.max(other.score as f64);
        }
    }
    let anchor_weight = (chain.n_anchors as f64 / 10.0).min(1.0);
    let q = 40.0 * (1.0 - s2 / s1) * anchor_weight * s1.ln();
    q.clamp(0.0, MAX_MAPQ as f64) as u8
}

fn overlap_fraction(a: &Chain, b: &Chain) -> f64 {
    let start = a.query_start.max(b.query_start);
    let end = a.query_end.min(b.query_end);
    if end <= start {
        return 0.0;
    }
    let shorter = (a.query_end - a.query_start).min(b.query_end - b.query_start);
    if shorter == 0 {
        return 0.0;
    }
    (end - start) as f64 / shorter as f64
}

/// Minimizers of `seq`: the smallest hashed k-mer of each window of `w`
/// consecutive valid k-mers, deduplicated by position. K-mers containing
/// non-ACGT characters are skipped.
fn minimizers(seq: &[u8], k: usize, w: usize) -> Vec<(u64, usize)> {
    let kmers = encode_kmers(seq, k);
    if kmers.is_empty() {
        return Vec::new();
    }
    let w = w.max(1);

    let mut out: Vec<(u64, usize)> = Vec::new();
    let mut last_pos = usize::MAX;
    for window in kmers.windows(w.min(kmers.len())) {
        let &(hash, pos) = window
            .iter()
            .min_by_key(|(hash, _)| *hash)
            .expect("window is non-empty");
        if pos != last_pos {
            out.push((hash, pos));
            last_pos = pos;
        }
    }
    out
}

/// Hash every valid k-mer of `seq`, returning (hash, position) pairs.
fn encode_kmers(seq: &[u8], k: usize) -> Vec<(u64, usize)> {
    let mut out = Vec::new();
    if seq.len() < k || k == 0 {
        return out;
    }
    'outer: for pos in 0..=(seq.len() - k) {
        let mut code = 0u64;
        for &base in &seq[pos..pos + k] {
            let bits = match base {
                b'A' => 0u64,
                b'C' => 1,
                b'G' => 2,
                b'T' => 3,
                _ => continue 'outer,
            };
            code = (code << 2) | bits;
        }
        out.push((splitmix64(code), pos));
    }
    out
}

/// SplitMix64 finalizer; decorrelates minimizer choice from raw k-mer rank.
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> MinimizerMapper {
        MinimizerMapper::new(MapperConfig::sensitive())
    }

    #[test]
    fn exact_self_match_spans_full_reference() {
        let reference = b"GTCTCTCTGGTTAGACCAGATCTGAGCCTGGGAGCTCTCTGGCTAACTAGGGAACCCACT";
        let hits = mapper().map(reference, reference).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].query_start, 0);
        assert_eq!(hits[0].query_end, reference.len());
        assert!(hits[0].mapping_quality >= 50);
    }

    #[test]
    fn embedded_copy_is_located() {
        let region = b"GTCTCTCTGGTTAGACCAGATCTGAGCCTGGGAGCTCTCTGGCTAACTAGGGAACCCACT";
        let mut query = b"TTTTTTTTTTTTTTTTTTTTTTTTTTTTTTTTTTTTTTTT".to_vec();
        query.extend_from_slice(region);
        query.extend_from_slice(b"CCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCC");

        let hits = mapper().map(region, &query).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].query_start, 40);
        assert_eq!(hits[0].query_end, 40 + region.len());
    }

    #[test]
    fn short_reference_fails_initialization() {
        let err = mapper().map(b"ACGT", b"ACGTACGTACGTACGT").unwrap_err();
        assert!(matches!(
            err,
            PipelineError::ToolInitialization { .. }
        ));
    }

    #[test]
    fn unrelated_sequences_produce_no_hits() {
        let reference = b"GTCTCTCTGGTTAGACCAGATCTGAGCCTGGGAGCTCTCTGGCTAACTAGGGAACCCACT";
        let query = b"AAAAAAAAAACCCCCCCCCCAAAAAAAAAACCCCCCCCCCAAAAAAAAAACCCCCCCCCC";
        let hits = mapper().map(reference, query).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn ambiguous_bases_are_skipped_not_fatal() {
        let reference = b"GTCTCTCTGGTTAGACCAGATCTGAGCCTGGG";
        let mut query = reference.to_vec();
        query[5] = b'N';
        // Still maps off the seeds outside the masked k-mers.
        let hits = mapper().map(reference, &query).unwrap();
        assert_eq!(hits.len(), 1);
    }
}
