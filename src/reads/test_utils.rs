use super::{cigar::Cigar, AlignedRead, CigarOpExt};
use crate::variant::{Allele, VariantSite};
use rust_htslib::bam::{self, record::CigarString};
use std::path::{Path, PathBuf};

pub fn make_cigar(ref_pos: i64, encoding: &str) -> Cigar {
    let ops = CigarString::try_from(encoding).unwrap().to_vec();
    Cigar { ref_pos, ops }
}

/// Forward, first-of-pair read with MAPQ 60 and quality 30 at every base; the
/// mate starts where this read starts and the fragment is 150bp.
pub fn make_read(id: &str, ref_pos: i64, cigar: &str) -> AlignedRead {
    let cigar = make_cigar(ref_pos, cigar);
    let len: u32 = cigar.ops.iter().map(|op| op.query_len()).sum();
    AlignedRead {
        id: id.to_string(),
        is_reverse: false,
        is_first_of_pair: true,
        mapq: 60,
        quals: vec![30; len as usize],
        mate_start: cigar.unclipped_start(),
        insert_size: -150,
        cigar,
    }
}

/// Biallelic A>T site on chr1.
pub fn make_site(start: i64, end: i64) -> VariantSite {
    VariantSite::new(
        "chr1",
        start,
        end,
        vec![Allele::reference(b"A".to_vec()), Allele::alt(b"T".to_vec())],
    )
    .unwrap()
}

/// Writes `records` to `dir/reads.bam` with a single 1kb chr1 and builds its index.
pub fn write_indexed_bam(dir: &Path, records: &[bam::Record]) -> PathBuf {
    let path = dir.join("reads.bam");
    let mut header = bam::Header::new();
    let mut sq = bam::header::HeaderRecord::new(b"SQ");
    sq.push_tag(b"SN", "chr1");
    sq.push_tag(b"LN", 1000);
    header.push_record(&sq);
    {
        let mut writer = bam::Writer::from_path(&path, &header, bam::Format::Bam).unwrap();
        for rec in records {
            writer.write(rec).unwrap();
        }
    }
    bam::index::build(&path, None, bam::index::Type::Bai, 1).unwrap();
    path
}
