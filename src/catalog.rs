use crate::types::Region;

/// HIV-1 HXB2 LTR reference sub-sequences.
const U3_SEQUENCE: &[u8] = b"TGGAAGGGCTAATTCACTCCCAAAGAAGACAAGATATCCTTGATCTGTGGATCTACCACACACAAGGCTACTTCCCTGATTAGCAGAACTACACACCAGGGCCAGGGGTCAGATATCCACTGACCTTTGGATGGTGCTACAAGCTAGTACCAGTTGAGCCAGATAAGGTAGAAGAGGCCAATAAAGGAGAGAACACCAGCTTGTTACACCCTGTGAGCCTGCATGGGATGGATGACCCGGAGAGAGAAGTGTTAGAGTGGAGGTTTGACAGCCGCCTAGCATTTCATCACGTGGCCCGAGAGCTGCATCCGGAGTACTTCAAGAACTGCTGATATCGAGCTTGCTACAAGGGACTTTCCGCTGGGGACTTTCCAGGGAGGCGTGGCCTGGGCGGGACTGGGGAGTGGCGAGCCCTCAGATCCTGCATATAAGCAGCTGCTTTTTGCCTGTACTGG";
const R_SEQUENCE: &[u8] = b"GTCTCTCTGGTTAGACCAGATCTGAGCCTGGGAGCTCTCTGGCTAACTAGGGAACCCACTGCTTAAGCCTCAATAAAGCTTGCCTTGAGTGCTTCA";
const U5_SEQUENCE: &[u8] = b"AGTAGTGTGTGCCCGTCTGTTGTGTGACTCTGGTAACTAGAGATCCCTCAGACCCTTTTAGTCAGTGTGGAAAATCTCTAGCA";

/// The HindIII site present in R; used to tell R from U5 when classifying
/// an arbitrary reference sequence.
const R_MARKER: &[u8] = b"AAGCTT";

/// Length above which a reference is taken to be U3.
const U3_MIN_LENGTH: usize = 200;

/// Read-only table of the three reference regions, built once per process.
#[derive(Debug, Clone)]
pub struct ReferenceCatalog;

impl ReferenceCatalog {
    pub fn new() -> Self {
        ReferenceCatalog
    }

    pub fn sequence(&self, region: Region) -> &'static [u8] {
        match region {
            Region::U3 => U3_SEQUENCE,
            Region::R => R_SEQUENCE,
            Region::U5 => U5_SEQUENCE,
        }
    }

    pub fn expected_length(&self, region: Region) -> usize {
        self.sequence(region).len()
    }

    /// Classify an arbitrary reference sequence into a region type, so the
    /// matcher can be handed any catalog sequence without being told which
    /// one it is. Long references are U3; of the short ones, R carries the
    /// HindIII marker.
    pub fn classify_reference(reference: &[u8]) -> Region {
        if reference.len() > U3_MIN_LENGTH {
            Region::U3
        } else if reference
            .windows(R_MARKER.len())
            .any(|w| w == R_MARKER)
        {
            Region::R
        } else {
            Region::U5
        }
    }
}

impl Default for ReferenceCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip whitespace and uppercase a raw sequence. Non-nucleotide characters
/// pass through untouched; they simply never match downstream.
pub fn normalize(raw: &str) -> Vec<u8> {
    normalize_bytes(raw.as_bytes())
}

pub fn normalize_bytes(raw: &[u8]) -> Vec<u8> {
    raw.iter()
        .filter(|b| !b.is_ascii_whitespace())
        .map(|b| b.to_ascii_uppercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_whitespace_and_uppercases() {
        assert_eq!(normalize("ac gt\nAC\tGT \r"), b"ACGTACGT".to_vec());
        assert_eq!(normalize(""), Vec::<u8>::new());
    }

    #[test]
    fn catalog_sequences_classify_as_themselves() {
        let catalog = ReferenceCatalog::new();
        for region in Region::ALL {
            assert_eq!(
                ReferenceCatalog::classify_reference(catalog.sequence(region)),
                region
            );
        }
    }

    #[test]
    fn expected_lengths_match_references() {
        let catalog = ReferenceCatalog::new();
        assert_eq!(catalog.expected_length(Region::U3), 455);
        assert_eq!(catalog.expected_length(Region::R), 96);
        assert_eq!(catalog.expected_length(Region::U5), 83);
    }
}
