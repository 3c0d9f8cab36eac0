//! Per-read feature vectors.
//!
//! Features, in order:
//! 1. mapping quality
//! 2. base quality at the site (or the configured default)
//! 3. first-of-pair flag
//! 4. reverse-strand flag
//! 5. read position of the site, from the read start
//! 6. read length minus feature 5
//! 7. absolute fragment length
//! 8. site start minus fragment start
//! 9. fragment end minus site end
//!
//! The fragment starts at the smaller of the mate start and the read's
//! unclipped start, and spans the absolute fragment length.

use crate::reads::Evidence;
use crate::utils::Result;
use crate::variant::VariantSite;
use arrayvec::ArrayVec;

pub const FEATURES_PER_READ: usize = 9;

pub const DEFAULT_BASE_QUALITY: u8 = 25;

pub type FeatureVector = [i64; FEATURES_PER_READ];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadFeaturizer {
    pub default_base_quality: u8,
}

impl Default for ReadFeaturizer {
    fn default() -> Self {
        ReadFeaturizer {
            default_base_quality: DEFAULT_BASE_QUALITY,
        }
    }
}

impl ReadFeaturizer {
    pub fn new(default_base_quality: u8) -> Self {
        ReadFeaturizer {
            default_base_quality,
        }
    }

    pub fn featurize<E: Evidence>(&self, read: &E, site: &VariantSite) -> Result<FeatureVector> {
        let mut features = ArrayVec::<i64, FEATURES_PER_READ>::new();
        features.push(read.mapping_quality() as i64);
        features.push(
            read.base_quality_at(site)
                .unwrap_or(self.default_base_quality) as i64,
        );
        features.push(read.is_first_of_pair() as i64);
        features.push(read.is_reverse() as i64);

        let read_position = read.read_position_at(site).unwrap_or(0) as i64;
        features.push(read_position);
        features.push(read.len() as i64 - read_position);

        let fragment_len = read.fragment_length().abs();
        features.push(fragment_len);

        let fragment_start = read.mate_start().min(read.unclipped_start());
        let fragment_end = fragment_start + fragment_len;
        features.push(site.start - fragment_start);
        features.push(fragment_end - site.end);

        features.into_inner().map_err(|partial| {
            format!(
                "Read {} produced {} features, expected {}",
                read.name(),
                partial.len(),
                FEATURES_PER_READ
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reads::test_utils::{make_read, make_site};

    #[test]
    fn test_featurize_reference_scenario() {
        // read at 5..105, site at 15, mate at 5, fragment -150
        let read = make_read("r1", 5, "100M");
        let site = make_site(15, 15);
        let features = ReadFeaturizer::default().featurize(&read, &site).unwrap();
        assert_eq!(features, [60, 30, 1, 0, 10, 90, 150, 10, 140]);
    }

    #[test]
    fn test_featurize_reverse_second_of_pair() {
        let mut read = make_read("r2", 20, "3S50M");
        read.is_reverse = true;
        read.is_first_of_pair = false;
        read.mapq = 17;
        read.mate_start = 40;
        read.insert_size = 200;
        read.quals[8] = 12;
        let site = make_site(25, 27);

        let features = ReadFeaturizer::default().featurize(&read, &site).unwrap();
        // unclipped start 17 < mate 40, so the fragment is 17..217
        assert_eq!(features, [17, 12, 0, 1, 8, 45, 200, 8, 190]);
    }

    #[test]
    fn test_default_base_quality_when_uncovered() {
        let read = make_read("r1", 100, "50M");
        let site = make_site(10, 10);
        let features = ReadFeaturizer::new(7).featurize(&read, &site).unwrap();
        assert_eq!(features[1], 7);
        assert_eq!(features[4], 0);
        assert_eq!(features[5], 50);
    }

    #[test]
    fn test_position_features_sum_to_read_length() {
        let site = make_site(120, 120);
        for (start, cigar) in [(100, "30M"), (90, "5S40M"), (110, "10M2I20M"), (118, "2H12M")] {
            let read = make_read("r", start, cigar);
            let f = ReadFeaturizer::default().featurize(&read, &site).unwrap();
            assert_eq!(f[4] + f[5], read.quals.len() as i64);
        }
    }

    #[test]
    fn test_fragment_features_span_fragment() {
        let site = make_site(130, 132);
        for insert_size in [-300, -90, 0, 75, 410] {
            let mut read = make_read("r", 100, "50M");
            read.insert_size = insert_size;
            let f = ReadFeaturizer::default().featurize(&read, &site).unwrap();
            assert_eq!(f[6], insert_size.abs());
            assert_eq!(f[7] + f[8], f[6] - (site.end - site.start));
        }
    }

    #[test]
    fn test_featurize_is_idempotent() {
        let read = make_read("r1", 5, "100M");
        let site = make_site(15, 15);
        let featurizer = ReadFeaturizer::default();
        assert_eq!(
            featurizer.featurize(&read, &site),
            featurizer.featurize(&read, &site)
        );
    }
}
