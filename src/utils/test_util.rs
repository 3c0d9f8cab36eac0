use rust_htslib::bcf::{header::Header, record::GenotypeAllele, Format, Writer};
use std::io::Write;
use tempfile::NamedTempFile;

/// Builds small on-disk VCFs for tests.
#[derive(Default)]
pub struct TestVcfBuilder {
    contigs: Vec<(String, u64)>,
    samples: Vec<String>,
    records: Vec<TestVcfRecord>,
}

#[derive(Default)]
pub struct TestVcfRecord {
    rid: u32,
    pos: i64,
    id: Option<Vec<u8>>,
    alleles: Vec<Vec<u8>>,
    genotypes: Vec<GenotypeAllele>,
}

impl TestVcfRecord {
    pub fn new() -> Self {
        Self {
            alleles: vec![b"A".to_vec()],
            ..Default::default()
        }
    }

    pub fn rid(mut self, rid: u32) -> Self {
        self.rid = rid;
        self
    }

    pub fn pos(mut self, pos: i64) -> Self {
        self.pos = pos;
        self
    }

    pub fn id<T: AsRef<[u8]>>(mut self, id: T) -> Self {
        self.id = Some(id.as_ref().to_vec());
        self
    }

    pub fn alleles<T: AsRef<[u8]>>(mut self, alleles: &[T]) -> Self {
        self.alleles = alleles.iter().map(|a| a.as_ref().to_vec()).collect();
        self
    }

    pub fn genotype(mut self, genotypes: &[GenotypeAllele]) -> Self {
        self.genotypes = genotypes.to_vec();
        self
    }
}

impl TestVcfBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contig<S: ToString>(mut self, name: S, length: u64) -> Self {
        self.contigs.push((name.to_string(), length));
        self
    }

    pub fn sample<S: ToString>(mut self, name: S) -> Self {
        self.samples.push(name.to_string());
        self
    }

    pub fn record(mut self, record: TestVcfRecord) -> Self {
        self.records.push(record);
        self
    }

    pub fn build_header(&self) -> Header {
        let mut header = Header::new();
        header.push_record(br#"##fileformat=VCFv4.3"#);
        for (name, length) in &self.contigs {
            header.push_record(format!("##contig=<ID={},length={}>", name, length).as_bytes());
        }
        header.push_record(br#"##FORMAT=<ID=GT,Number=1,Type=String,Description="Genotype">"#);
        for sample in &self.samples {
            header.push_sample(sample.as_bytes());
        }
        header
    }

    /// Writes an uncompressed VCF.
    pub fn build(self) -> NamedTempFile {
        let header = self.build_header();
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let mut writer = Writer::from_path(temp_file.path(), &header, true, Format::Vcf)
            .expect("Failed to create writer");

        for rec in &self.records {
            let mut record = writer.empty_record();
            record.set_rid(Some(rec.rid));
            record.set_pos(rec.pos);
            if let Some(ref id) = rec.id {
                record.set_id(id).unwrap();
            }
            let allele_refs: Vec<&[u8]> = rec.alleles.iter().map(|a| a.as_slice()).collect();
            record.set_alleles(&allele_refs).unwrap();
            if !rec.genotypes.is_empty() {
                record.push_genotypes(&rec.genotypes).unwrap();
            }
            writer.write(&record).unwrap();
        }
        temp_file
    }
}

/// Writes `lines` to a temporary text file, one per line.
pub fn write_text_file(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file.flush().unwrap();
    file
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_htslib::bcf::Read;

    #[test]
    fn test_vcf_builder_records() {
        let temp_vcf = TestVcfBuilder::new()
            .contig("chr1", 1000)
            .contig("chr2", 1000)
            .sample("S1")
            .record(
                TestVcfRecord::new()
                    .pos(100)
                    .id("rs1")
                    .alleles(&["A", "T"])
                    .genotype(&[GenotypeAllele::Unphased(0), GenotypeAllele::Unphased(1)]),
            )
            .record(TestVcfRecord::new().rid(1).pos(5).alleles(&["C", "G"]))
            .build();

        let mut reader = rust_htslib::bcf::Reader::from_path(temp_vcf.path()).unwrap();
        let records: Vec<_> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id(), b"rs1");
        assert_eq!(records[0].pos(), 100);
        assert_eq!(records[1].rid(), Some(1));
        assert_eq!(records[1].alleles(), vec![b"C" as &[u8], b"G"]);
    }

    #[test]
    fn test_write_text_file() {
        let file = write_text_file(&["a\tb", "c"]);
        let content = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(content, "a\tb\nc\n");
    }
}
