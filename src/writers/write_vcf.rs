//! Writes annotated VCF/BCF records.

use crate::annotation::FieldDescriptor;
use crate::utils::Result;
use crate::variant::GenotypeAttributes;
use rust_htslib::bcf::{self, header::HeaderView, Format};
use std::{
    env, fmt,
    path::{Path, PathBuf},
};

const MISSING_STRING: &[u8] = b".";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputType {
    Vcf { is_uncompressed: bool },
    Bcf { is_uncompressed: bool },
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (label, is_uncompressed) = match self {
            OutputType::Vcf { is_uncompressed } => ("VCF", is_uncompressed),
            OutputType::Bcf { is_uncompressed } => ("BCF", is_uncompressed),
        };
        if *is_uncompressed {
            write!(f, "uncompressed {}", label)
        } else {
            write!(f, "compressed {}", label)
        }
    }
}

impl OutputType {
    pub fn from_path(path: &Path) -> Self {
        let name = path.to_string_lossy().to_lowercase();
        match name.as_str() {
            s if s.ends_with(".bcf") || s.ends_with(".bcf.gz") => OutputType::Bcf {
                is_uncompressed: false,
            },
            s if s.ends_with(".vcf.gz") || s.ends_with(".vcf.bgz") => OutputType::Vcf {
                is_uncompressed: false,
            },
            _ => OutputType::Vcf {
                is_uncompressed: true,
            },
        }
    }

    fn parts(&self) -> (bool, Format) {
        match *self {
            OutputType::Vcf { is_uncompressed } => (is_uncompressed, Format::Vcf),
            OutputType::Bcf { is_uncompressed } => (is_uncompressed, Format::Bcf),
        }
    }
}

/// Copies input records to the output, adding per-sample annotation fields.
pub struct VcfWriter {
    writer: bcf::Writer,
    output_type: OutputType,
    output_path: PathBuf,
    n_samples: usize,
}

impl VcfWriter {
    /// Creates a writer whose header is the input header plus the declared
    /// annotation fields and provenance lines.
    ///
    /// # Arguments
    /// * `template` - Header of the input VCF.
    /// * `descriptors` - Fields the annotations may write.
    /// * `output_path` - Output file; the format follows its extension.
    pub fn new(
        template: &HeaderView,
        descriptors: &[FieldDescriptor],
        output_path: &Path,
    ) -> Result<VcfWriter> {
        let mut header = bcf::Header::from_template(template);
        for descriptor in descriptors {
            header.push_record(descriptor.header_line().as_bytes());
        }

        let line = format!(
            "##{}Version={}",
            env!("CARGO_PKG_NAME"),
            crate::cli::FULL_VERSION
        );
        header.push_record(line.as_bytes());

        let args: Vec<String> = env::args().collect();
        let line = format!("##{}Command={}", env!("CARGO_PKG_NAME"), args.join(" "));
        header.push_record(line.as_bytes());

        let output_type = OutputType::from_path(output_path);
        let (is_uncompressed, format) = output_type.parts();
        log::debug!("Creating {} writer", output_type);
        let writer = bcf::Writer::from_path(output_path, &header, is_uncompressed, format)
            .map_err(|e| format!("Invalid output path {}: {}", output_path.display(), e))?;

        Ok(VcfWriter {
            n_samples: writer.header().sample_count() as usize,
            writer,
            output_type,
            output_path: output_path.to_path_buf(),
        })
    }

    /// Writes `record` with the string fields of `genotype` set for the sample
    /// at `sample_idx`; other samples get the missing value, as does an empty
    /// value. An empty `genotype` leaves the record unchanged.
    pub fn write(
        &mut self,
        record: &mut bcf::Record,
        sample_idx: usize,
        genotype: &GenotypeAttributes,
    ) -> Result<()> {
        if sample_idx >= self.n_samples && !genotype.is_empty() {
            return Err(format!(
                "Sample index {} out of range for {} samples",
                sample_idx, self.n_samples
            ));
        }
        self.writer.translate(record);
        for (key, value) in genotype.iter() {
            // htslib drops a string field whose values are all empty
            let value = if value.is_empty() {
                MISSING_STRING
            } else {
                value.as_bytes()
            };
            let values: Vec<&[u8]> = (0..self.n_samples)
                .map(|i| if i == sample_idx { value } else { MISSING_STRING })
                .collect();
            record
                .push_format_string(key.as_bytes(), &values)
                .map_err(|e| format!("Failed to set {} at {}: {}", key, record.pos() + 1, e))?;
        }
        self.writer
            .write(record)
            .map_err(|e| format!("Failed to write record: {}", e))
    }

    /// Closes the output and indexes it when compressed.
    pub fn finish(self) -> Result<()> {
        let VcfWriter {
            writer,
            output_type,
            output_path,
            ..
        } = self;
        // BGZF footer must be flushed before indexing
        drop(writer);

        let index_type = match output_type {
            OutputType::Vcf {
                is_uncompressed: false,
            } => bcf::index::Type::Tbx,
            OutputType::Bcf {
                is_uncompressed: false,
            } => bcf::index::Type::Csi(14),
            _ => {
                log::debug!("Skipping index creation for {} output", output_type);
                return Ok(());
            }
        };
        log::debug!("Building index for {}", output_path.display());
        bcf::index::build(&output_path, None, 1, index_type)
            .map_err(|e| format!("Failed to build index for {}: {}", output_path.display(), e))
    }
}
