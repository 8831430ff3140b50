//! Deterministic classification of a per-region match map.
//!
//! The rules form an explicit ordered table; the first rule whose predicate
//! fires decides the call. Keeping the table flat keeps the priority
//! contract visible: the viral-RNA pattern outranks the genomic-DNA pattern
//! even when both would match.

use std::collections::BTreeMap;

use crate::config::PipelineConfig;
use crate::types::{Classification, Region, RegionMatch, RegionResult};

pub type RegionMap = BTreeMap<Region, RegionResult>;

type RuleFn = fn(&RegionMap, &PipelineConfig) -> Option<(Classification, Vec<String>)>;

pub struct ClassifierRule {
    pub name: &'static str,
    check: RuleFn,
}

const RULES: [ClassifierRule; 4] = [
    ClassifierRule {
        name: "no regions present",
        check: rule_no_regions,
    },
    ClassifierRule {
        name: "viral RNA pattern",
        check: rule_viral_rna,
    },
    ClassifierRule {
        name: "genomic DNA pattern",
        check: rule_genomic_dna,
    },
    ClassifierRule {
        name: "fallback",
        check: rule_fallback,
    },
];

/// Run the rule table top to bottom; the fallback rule always matches.
pub fn classify(regions: &RegionMap, config: &PipelineConfig) -> (Classification, Vec<String>) {
    RULES
        .iter()
        .find_map(|rule| (rule.check)(regions, config))
        .expect("fallback rule matches unconditionally")
}

fn matches_of(regions: &RegionMap, region: Region) -> &[RegionMatch] {
    regions
        .get(&region)
        .map_or(&[], |result| result.matches.as_slice())
}

fn rule_no_regions(
    regions: &RegionMap,
    _config: &PipelineConfig,
) -> Option<(Classification, Vec<String>)> {
    if regions.values().any(|r| r.present) {
        return None;
    }
    Some((
        Classification::NonLtr,
        vec!["No LTR regions detected with sufficient similarity".to_string()],
    ))
}

/// Two R copies, one near the 5' terminus and a distinct one past the 3'
/// threshold, mark the repeated-R layout of viral RNA.
fn rule_viral_rna(
    regions: &RegionMap,
    config: &PipelineConfig,
) -> Option<(Classification, Vec<String>)> {
    let r_matches = matches_of(regions, Region::R);
    if r_matches.len() < 2 {
        return None;
    }

    let (five_prime, three_prime) =
        find_terminal_r(r_matches, matches_of(regions, Region::U5), config);
    if five_prime.is_none() || three_prime.is_none() {
        return None;
    }

    let mut details = vec!["Multiple R regions detected (5' and 3' ends)".to_string()];
    if !matches_of(regions, Region::U5).is_empty() {
        details.push("U5 region present near 5' end".to_string());
    }
    if !matches_of(regions, Region::U3).is_empty() {
        details.push("U3 region present near 3' end".to_string());
    }
    details.extend(region_details(regions));
    Some((Classification::ViralRna, details))
}

/// All three regions present with best starts in canonical U3 < R < U5
/// order: the integrated-provirus (genomic DNA) layout.
fn rule_genomic_dna(
    regions: &RegionMap,
    _config: &PipelineConfig,
) -> Option<(Classification, Vec<String>)> {
    let u3 = regions.get(&Region::U3)?.best()?;
    let r = regions.get(&Region::R)?.best()?;
    let u5 = regions.get(&Region::U5)?.best()?;

    if u3.start < r.start && r.start < u5.start {
        let mut details = vec!["Complete U3-R-U5 regions found in correct order".to_string()];
        details.extend(region_details(regions));
        Some((Classification::GenomicDna, details))
    } else {
        None
    }
}

fn rule_fallback(
    regions: &RegionMap,
    _config: &PipelineConfig,
) -> Option<(Classification, Vec<String>)> {
    let mut details = vec!["Partial or unclear LTR pattern".to_string()];
    details.extend(region_details(regions));
    Some((Classification::Unclear, details))
}

/// Locate the 5' and 3' R matches.
///
/// The 5' match is the first in list order starting before the 5' limit.
/// The 3' threshold is dynamic when U5 anchors it (first U5 start plus the
/// configured offset), otherwise a fixed fallback. The two selections are
/// required to be disjoint matches: the 3' scan skips whichever match was
/// already chosen as 5'.
fn find_terminal_r<'a>(
    r_matches: &'a [RegionMatch],
    u5_matches: &[RegionMatch],
    config: &PipelineConfig,
) -> (Option<&'a RegionMatch>, Option<&'a RegionMatch>) {
    let five_prime_idx = r_matches
        .iter()
        .position(|m| m.start < config.five_prime_limit);

    let threshold = u5_matches
        .first()
        .map(|u5| u5.start + config.u5_downstream_offset)
        .unwrap_or(config.three_prime_fallback);

    let three_prime = r_matches
        .iter()
        .enumerate()
        .find(|(i, m)| Some(*i) != five_prime_idx && m.start > threshold)
        .map(|(_, m)| m);

    (five_prime_idx.map(|i| &r_matches[i]), three_prime)
}

/// Shared listing helper for rules 2-4: one header per present region, one
/// line per confirmed match with percent similarity and span.
fn region_details(regions: &RegionMap) -> Vec<String> {
    let mut details = Vec::new();
    for (region, result) in regions {
        if !result.present {
            continue;
        }
        details.push(format!("{} occurrences:", region));
        for (idx, m) in result.matches.iter().enumerate() {
            details.push(format!(
                "  {}. {:.2}% similarity at position {}-{}",
                idx + 1,
                m.similarity * 100.0,
                m.start,
                m.end
            ));
        }
    }
    details
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(similarity: f64, start: usize, end: usize) -> RegionMatch {
        RegionMatch { similarity, start, end }
    }

    fn map(u3: Vec<RegionMatch>, r: Vec<RegionMatch>, u5: Vec<RegionMatch>) -> RegionMap {
        let mut regions = RegionMap::new();
        regions.insert(Region::U3, RegionResult::from_matches(u3, 455));
        regions.insert(Region::R, RegionResult::from_matches(r, 96));
        regions.insert(Region::U5, RegionResult::from_matches(u5, 83));
        regions
    }

    fn config() -> PipelineConfig {
        PipelineConfig::default()
    }

    #[test]
    fn empty_map_is_non_ltr() {
        let (label, details) = classify(&map(vec![], vec![], vec![]), &config());
        assert_eq!(label, Classification::NonLtr);
        assert_eq!(
            details,
            vec!["No LTR regions detected with sufficient similarity".to_string()]
        );
    }

    #[test]
    fn dual_r_with_terminal_placement_is_viral_rna() {
        let regions = map(
            vec![],
            vec![m(0.95, 10, 106), m(0.92, 6200, 6296)],
            vec![m(0.90, 150, 233)],
        );
        let (label, details) = classify(&regions, &config());
        assert_eq!(label, Classification::ViralRna);
        assert!(details[0].contains("Multiple R regions"));
        assert!(details.iter().any(|d| d.contains("U5 region present")));
    }

    #[test]
    fn viral_rna_outranks_genomic_dna() {
        // All three regions in DNA order, but R repeated at both termini:
        // the RNA rule fires first.
        let regions = map(
            vec![m(0.9, 300, 755)],
            vec![m(0.95, 20, 116), m(0.94, 7000, 7096)],
            vec![m(0.9, 900, 983)],
        );
        let (label, _) = classify(&regions, &config());
        assert_eq!(label, Classification::ViralRna);
    }

    #[test]
    fn single_r_in_order_is_genomic_dna() {
        let regions = map(
            vec![m(0.9, 0, 455)],
            vec![m(0.95, 500, 596)],
            vec![m(0.9, 650, 733)],
        );
        let (label, details) = classify(&regions, &config());
        assert_eq!(label, Classification::GenomicDna);
        assert!(details[0].contains("correct order"));
        // Listing covers all three regions in U3, R, U5 order.
        assert!(details.iter().any(|d| d == "U3 occurrences:"));
        assert!(details.iter().any(|d| d == "R occurrences:"));
        assert!(details.iter().any(|d| d == "U5 occurrences:"));
    }

    #[test]
    fn misordered_regions_fall_through_to_unclear() {
        let regions = map(
            vec![m(0.9, 700, 1155)],
            vec![m(0.95, 500, 596)],
            vec![m(0.9, 0, 83)],
        );
        let (label, details) = classify(&regions, &config());
        assert_eq!(label, Classification::Unclear);
        assert_eq!(details[0], "Partial or unclear LTR pattern");
    }

    #[test]
    fn dual_r_without_three_prime_copy_is_not_rna() {
        // Both R copies near the 5' end; no match clears the 3' threshold.
        let regions = map(
            vec![],
            vec![m(0.95, 10, 106), m(0.92, 120, 216)],
            vec![],
        );
        let (label, _) = classify(&regions, &config());
        assert_eq!(label, Classification::Unclear);
    }

    #[test]
    fn five_and_three_prime_r_must_be_disjoint() {
        // A single match could satisfy both ends if the dynamic threshold
        // degenerated below the 5' limit; the second scan must skip the
        // match already chosen as 5'.
        let r = vec![m(0.95, 100, 196), m(0.9, 150, 246)];
        let config = PipelineConfig {
            three_prime_fallback: 50,
            ..PipelineConfig::default()
        };
        let (five, three) = find_terminal_r(&r, &[], &config);
        let five = five.unwrap();
        let three = three.unwrap();
        assert!(!std::ptr::eq(five, three));
        assert_eq!(five.start, 100);
        assert_eq!(three.start, 150);
    }

    #[test]
    fn dynamic_threshold_follows_first_u5_match() {
        // With U5 at 4500, the 3' threshold is 5500, past the fixed 5000.
        let r = vec![m(0.95, 10, 106), m(0.9, 5200, 5296)];
        let u5 = vec![m(0.9, 4500, 4583)];
        let (five, three) = find_terminal_r(&r, &u5, &config());
        assert!(five.is_some());
        assert!(three.is_none(), "5200 is below the dynamic threshold 5500");
    }

    #[test]
    fn match_listing_formats_percent_with_two_decimals() {
        let regions = map(vec![], vec![m(0.7031, 0, 96)], vec![]);
        let details = region_details(&regions);
        assert_eq!(details[0], "R occurrences:");
        assert_eq!(details[1], "  1. 70.31% similarity at position 0-96");
    }
}
