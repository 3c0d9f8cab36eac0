use crate::utils::{InputSource, Result};
use rust_htslib::bam::{self, Read};

/// Opens an indexed BAM/CRAM for region queries.
pub fn open_bam_reader(reads_src: &InputSource, threads: usize) -> Result<bam::IndexedReader> {
    let mut reader = match reads_src {
        InputSource::Local(p) => bam::IndexedReader::from_path(p),
        InputSource::Remote(u) => bam::IndexedReader::from_url(u),
    }
    .map_err(|e| reads_src.format_error("Failed to create BAM reader from", e))?;

    if threads > 1 {
        if let Err(e) = reader.set_threads(threads) {
            log::warn!("Failed to set decompression threads: {e}");
        }
    }
    Ok(reader)
}
