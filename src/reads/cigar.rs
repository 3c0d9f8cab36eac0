use rust_htslib::bam::record::Cigar as CigarOp;

pub trait CigarOpExt {
    fn query_len(&self) -> u32;
    fn ref_len(&self) -> u32;
    fn is_clip(&self) -> bool;
}

impl CigarOpExt for CigarOp {
    #[inline]
    fn query_len(&self) -> u32 {
        match *self {
            CigarOp::Match(len)
            | CigarOp::Equal(len)
            | CigarOp::Diff(len)
            | CigarOp::Ins(len)
            | CigarOp::SoftClip(len) => len,
            CigarOp::Del(_) | CigarOp::RefSkip(_) | CigarOp::HardClip(_) | CigarOp::Pad(_) => 0,
        }
    }

    #[inline]
    fn ref_len(&self) -> u32 {
        match *self {
            CigarOp::Match(len)
            | CigarOp::Equal(len)
            | CigarOp::Diff(len)
            | CigarOp::Del(len)
            | CigarOp::RefSkip(len) => len,
            CigarOp::Ins(_) | CigarOp::SoftClip(_) | CigarOp::HardClip(_) | CigarOp::Pad(_) => 0,
        }
    }

    #[inline]
    fn is_clip(&self) -> bool {
        matches!(self, CigarOp::SoftClip(_) | CigarOp::HardClip(_))
    }
}

/// Alignment of a read: 0-based reference start plus CIGAR operations.
#[derive(Debug, PartialEq, Clone)]
pub struct Cigar {
    pub ref_pos: i64,
    pub ops: Vec<CigarOp>,
}

impl Cigar {
    /// Reference position the read would start at if leading clips were aligned.
    pub fn unclipped_start(&self) -> i64 {
        let clipped: i64 = self
            .ops
            .iter()
            .take_while(|op| op.is_clip())
            .map(|op| match *op {
                CigarOp::SoftClip(len) | CigarOp::HardClip(len) => len as i64,
                _ => 0,
            })
            .sum();
        self.ref_pos - clipped
    }

    /// Exclusive reference end of the aligned bases.
    pub fn ref_end(&self) -> i64 {
        self.ref_pos + self.ops.iter().map(|op| op.ref_len() as i64).sum::<i64>()
    }

    /// Offset into the read sequence (soft clips counted) of the base aligned to
    /// `ref_pos`. `None` if the position is outside the alignment or falls in a
    /// deletion or skipped region.
    pub fn query_offset(&self, ref_pos: i64) -> Option<usize> {
        if ref_pos < self.ref_pos {
            return None;
        }
        let mut ref_cursor = self.ref_pos;
        let mut query_cursor = 0_usize;
        for op in &self.ops {
            let ref_len = op.ref_len() as i64;
            if ref_len > 0 && ref_pos < ref_cursor + ref_len {
                return match op {
                    CigarOp::Match(_) | CigarOp::Equal(_) | CigarOp::Diff(_) => {
                        Some(query_cursor + (ref_pos - ref_cursor) as usize)
                    }
                    _ => None,
                };
            }
            ref_cursor += ref_len;
            query_cursor += op.query_len() as usize;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reads::test_utils::make_cigar;

    #[test]
    fn test_unclipped_start_subtracts_leading_clips() {
        assert_eq!(make_cigar(100, "5H10S20M").unclipped_start(), 85);
        assert_eq!(make_cigar(100, "20M10S").unclipped_start(), 100);
        assert_eq!(make_cigar(0, "3S10M").unclipped_start(), -3);
    }

    #[test]
    fn test_ref_end() {
        assert_eq!(make_cigar(10, "5S10M2D3M4I").ref_end(), 25);
    }

    #[test]
    fn test_query_offset_simple_match() {
        let cigar = make_cigar(5, "100M");
        assert_eq!(cigar.query_offset(15), Some(10));
        assert_eq!(cigar.query_offset(5), Some(0));
        assert_eq!(cigar.query_offset(104), Some(99));
        assert_eq!(cigar.query_offset(105), None);
        assert_eq!(cigar.query_offset(4), None);
    }

    #[test]
    fn test_query_offset_counts_soft_clips() {
        let cigar = make_cigar(100, "10S20M");
        assert_eq!(cigar.query_offset(100), Some(10));
        assert_eq!(cigar.query_offset(105), Some(15));
    }

    #[test]
    fn test_query_offset_hard_clips_not_counted() {
        let cigar = make_cigar(100, "10H20M");
        assert_eq!(cigar.query_offset(100), Some(0));
    }

    #[test]
    fn test_query_offset_across_indels() {
        // ref:   100..110 M, 110..112 D, 112..122 M
        // query: 0..10 M, 10..13 I, 13..23 M
        let cigar = make_cigar(100, "10M3I2D10M");
        assert_eq!(cigar.query_offset(109), Some(9));
        assert_eq!(cigar.query_offset(110), None);
        assert_eq!(cigar.query_offset(111), None);
        assert_eq!(cigar.query_offset(112), Some(13));
    }
}
