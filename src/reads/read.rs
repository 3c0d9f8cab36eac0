//! Owned alignment records carrying just what featurization needs.
//!

use super::{cigar::Cigar, Evidence};
use crate::utils::Result;
use crate::variant::VariantSite;
use rust_htslib::bam::{self, Read};
use std::str;

/// Placeholder htslib stores when a record has no base qualities.
pub const MISSING_QUALITY: u8 = 0xff;

/// A mapped read detached from its BAM record, so it can be moved across threads.
#[derive(Debug, PartialEq, Clone)]
pub struct AlignedRead {
    pub id: String,
    pub is_reverse: bool,
    pub is_first_of_pair: bool,
    pub mapq: u8,
    /// Base qualities over the full read sequence.
    pub quals: Vec<u8>,
    pub cigar: Cigar,
    /// 0-based mate start, -1 when the read has no mapped mate.
    pub mate_start: i64,
    pub insert_size: i64,
}

impl AlignedRead {
    /// Creates an `AlignedRead` from an HTSlib record.
    ///
    /// # Arguments
    /// * `rec` - A mapped BAM record.
    ///
    /// # Returns
    /// Returns an error if the record is unmapped or its name is not UTF-8.
    pub fn from_hts_rec(rec: &bam::Record) -> Result<AlignedRead> {
        if rec.is_unmapped() {
            return Err(format!(
                "Cannot featurize unmapped read {}",
                String::from_utf8_lossy(rec.qname())
            ));
        }
        let id = str::from_utf8(rec.qname())
            .map_err(|e| format!("Read name is not valid UTF-8: {}", e))?
            .to_string();

        Ok(AlignedRead {
            id,
            is_reverse: rec.is_reverse(),
            is_first_of_pair: rec.is_paired() && rec.is_first_in_template(),
            mapq: rec.mapq(),
            quals: rec.qual().to_vec(),
            cigar: Cigar {
                ref_pos: rec.pos(),
                ops: rec.cigar().take().to_vec(),
            },
            mate_start: if rec.is_paired() && !rec.is_mate_unmapped() {
                rec.mpos()
            } else {
                -1
            },
            insert_size: rec.insert_size(),
        })
    }
}

impl Evidence for AlignedRead {
    fn name(&self) -> &str {
        &self.id
    }

    fn mapping_quality(&self) -> u8 {
        self.mapq
    }

    fn base_quality_at(&self, site: &VariantSite) -> Option<u8> {
        let offset = self.cigar.query_offset(site.start)?;
        match self.quals.get(offset) {
            Some(&qual) if qual != MISSING_QUALITY => Some(qual),
            _ => None,
        }
    }

    fn is_first_of_pair(&self) -> bool {
        self.is_first_of_pair
    }

    fn is_reverse(&self) -> bool {
        self.is_reverse
    }

    fn len(&self) -> usize {
        self.quals.len()
    }

    fn unclipped_start(&self) -> i64 {
        self.cigar.unclipped_start()
    }

    fn mate_start(&self) -> i64 {
        self.mate_start
    }

    fn fragment_length(&self) -> i64 {
        self.insert_size
    }

    fn read_position_at(&self, site: &VariantSite) -> Option<usize> {
        self.cigar.query_offset(site.start)
    }
}

/// Collects primary, mapped, non-duplicate reads overlapping `site` whose names pass `keep`.
pub fn fetch_site_reads<F>(
    bam: &mut bam::IndexedReader,
    site: &VariantSite,
    keep: F,
) -> Result<Vec<AlignedRead>>
where
    F: Fn(&str) -> bool,
{
    if bam.header().tid(site.contig.as_bytes()).is_none() {
        log::debug!("Contig {} is not in the BAM header", site.contig);
        return Ok(Vec::new());
    }
    bam.fetch((site.contig.as_str(), site.start, site.end + 1))
        .map_err(|e| format!("BAM fetch error for site {}: {}", site, e))?;

    let mut reads = Vec::new();
    let mut record = bam::Record::new();
    while let Some(result) = bam.read(&mut record) {
        result.map_err(|e| format!("BAM read error at site {}: {}", site, e))?;
        if record.is_unmapped()
            || record.is_secondary()
            || record.is_supplementary()
            || record.is_duplicate()
            || record.is_quality_check_failed()
        {
            continue;
        }
        let Ok(name) = str::from_utf8(record.qname()) else {
            continue;
        };
        if !keep(name) {
            continue;
        }
        reads.push(AlignedRead::from_hts_rec(&record)?);
    }
    log::trace!("{}: fetched {} reads", site, reads.len());
    Ok(reads)
}
