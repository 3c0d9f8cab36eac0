use crate::utils::Result;
use itertools::Itertools;
use rust_htslib::bcf::{self, header::HeaderView};
use std::{collections::HashSet, fmt, str};

/// A candidate allele at a site. Two alleles are the same allele only if both
/// the bases and the reference flag agree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Allele {
    bases: Vec<u8>,
    is_reference: bool,
}

impl Allele {
    pub fn new(bases: impl Into<Vec<u8>>, is_reference: bool) -> Self {
        Allele {
            bases: bases.into(),
            is_reference,
        }
    }

    pub fn reference(bases: impl Into<Vec<u8>>) -> Self {
        Self::new(bases, true)
    }

    pub fn alt(bases: impl Into<Vec<u8>>) -> Self {
        Self::new(bases, false)
    }

    #[inline]
    pub fn bases(&self) -> &[u8] {
        &self.bases
    }

    #[inline]
    pub fn is_reference(&self) -> bool {
        self.is_reference
    }
}

impl fmt::Display for Allele {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.bases))?;
        if self.is_reference {
            write!(f, "*")?;
        }
        Ok(())
    }
}

/// A variant site: contig, inclusive 0-based start and end, and the declared
/// allele order that annotation output follows.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantSite {
    pub contig: String,
    pub start: i64,
    pub end: i64,
    alleles: Vec<Allele>,
}

impl VariantSite {
    pub fn new(contig: impl Into<String>, start: i64, end: i64, alleles: Vec<Allele>) -> Result<Self> {
        let contig = contig.into();
        if end < start {
            return Err(format!(
                "Invalid site {}:{}: end {} precedes start",
                contig, start, end
            ));
        }
        let mut seen = HashSet::with_capacity(alleles.len());
        for allele in &alleles {
            if !seen.insert(allele) {
                return Err(format!(
                    "Duplicate allele {} at site {}:{}",
                    allele, contig, start
                ));
            }
        }
        Ok(VariantSite {
            contig,
            start,
            end,
            alleles,
        })
    }

    /// Builds a site from a VCF record: the first allele is the reference, the
    /// end is the last reference base covered by the record.
    pub fn from_bcf_record(header: &HeaderView, record: &bcf::Record) -> Result<Self> {
        let rid = record
            .rid()
            .ok_or_else(|| format!("Record at position {} has no contig", record.pos()))?;
        let contig = header
            .rid2name(rid)
            .map_err(|e| format!("Unknown contig id {}: {}", rid, e))?;
        let contig = str::from_utf8(contig)
            .map_err(|e| format!("Contig name is not valid UTF-8: {}", e))?;

        let alleles = record
            .alleles()
            .into_iter()
            .enumerate()
            .map(|(idx, bases)| Allele::new(bases, idx == 0))
            .collect();

        let start = record.pos();
        let end = (record.end() - 1).max(start);
        Self::new(contig, start, end, alleles)
    }

    #[inline]
    pub fn alleles(&self) -> &[Allele] {
        &self.alleles
    }

    pub fn reference_allele(&self) -> Option<&Allele> {
        self.alleles.iter().find(|a| a.is_reference())
    }

    pub fn n_alleles(&self) -> usize {
        self.alleles.len()
    }
}

impl fmt::Display for VariantSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{} [{}]",
            self.contig,
            self.start,
            self.end,
            self.alleles.iter().join(",")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_util::{TestVcfBuilder, TestVcfRecord};
    use rust_htslib::bcf::Read;

    #[test]
    fn test_allele_identity_includes_reference_flag() {
        assert_eq!(Allele::reference(b"A".to_vec()), Allele::new(b"A".to_vec(), true));
        assert_ne!(Allele::reference(b"A".to_vec()), Allele::alt(b"A".to_vec()));
    }

    #[test]
    fn test_duplicate_alleles_rejected() {
        let res = VariantSite::new(
            "chr1",
            10,
            10,
            vec![Allele::reference(b"A".to_vec()), Allele::alt(b"C".to_vec()), Allele::alt(b"C".to_vec())],
        );
        assert_eq!(
            res,
            Err("Duplicate allele C at site chr1:10".to_string())
        );
    }

    #[test]
    fn test_end_before_start_rejected() {
        assert!(VariantSite::new("chr1", 10, 9, vec![]).is_err());
    }

    #[test]
    fn test_reference_allele_lookup() {
        let site = VariantSite::new(
            "chr1",
            10,
            10,
            vec![Allele::alt(b"C".to_vec()), Allele::reference(b"A".to_vec())],
        )
        .unwrap();
        assert_eq!(site.reference_allele(), Some(&Allele::reference(b"A".to_vec())));

        let no_ref = VariantSite::new("chr1", 10, 10, vec![Allele::alt(b"C".to_vec())]).unwrap();
        assert!(no_ref.reference_allele().is_none());
    }

    #[test]
    fn test_site_from_bcf_record() {
        let vcf = TestVcfBuilder::new()
            .contig("chr2", 1000)
            .sample("S1")
            .record(TestVcfRecord::new().pos(99).alleles(&["ACG", "A", "ACGCG"]))
            .build();

        let mut reader = rust_htslib::bcf::Reader::from_path(vcf.path()).unwrap();
        let header = reader.header().clone();
        let record = reader.records().next().unwrap().unwrap();
        let site = VariantSite::from_bcf_record(&header, &record).unwrap();

        assert_eq!(site.contig, "chr2");
        assert_eq!(site.start, 99);
        assert_eq!(site.end, 101);
        assert_eq!(site.n_alleles(), 3);
        assert!(site.alleles()[0].is_reference());
        assert_eq!(site.alleles()[2].bases(), b"ACGCG");
    }
}
