//! Precomputed per-read allele likelihoods.
//!
//! One row per (read, allele) pair, tab separated:
//! `chrom  pos  read_name  allele  log10_likelihood`
//! with `pos` the 1-based VCF position of the site. Lines starting with `#`
//! are ignored. The input may be plain text or bgzip/gzip compressed.

use crate::reads::Evidence;
use crate::utils::{InputSource, Result};
use crate::variant::{Allele, LikelihoodMatrix, VariantSite};
use rust_htslib::bgzf;
use std::collections::{hash_map::Entry, HashMap};
use std::io::{BufRead, BufReader};

const BUFFER_CAPACITY: usize = 128 * 1024;
const EXPECTED_FIELD_COUNT: usize = 5;

/// Contig and 0-based start of a site.
pub type SiteKey = (String, i64);

#[derive(Debug, Clone, PartialEq)]
pub struct LikelihoodRow {
    pub read_name: String,
    pub allele: Vec<u8>,
    pub log10_likelihood: f64,
}

#[derive(Debug, Default)]
pub struct LikelihoodTable {
    sites: HashMap<SiteKey, Vec<LikelihoodRow>>,
}

pub fn open_likelihood_table(src: &InputSource) -> Result<LikelihoodTable> {
    let inner = match src {
        InputSource::Local(p) => bgzf::Reader::from_path(p),
        InputSource::Remote(u) => bgzf::Reader::from_url(u),
    }
    .map_err(|e| src.format_error("Failed to open likelihoods from", e))?;
    let table = LikelihoodTable::from_reader(BufReader::with_capacity(BUFFER_CAPACITY, inner))
        .map_err(|e| format!("Error reading likelihoods from {}: {}", src, e))?;
    log::info!(
        "Loaded likelihoods for {} sites ({} rows)",
        table.n_sites(),
        table.n_rows()
    );
    Ok(table)
}

fn parse_line(line: &str) -> Result<(SiteKey, LikelihoodRow)> {
    let fields: Vec<&str> = line.split('\t').collect();
    let [chrom, pos, read_name, allele, value] = fields[..] else {
        return Err(format!(
            "Expected {} tab-separated fields (chrom pos read_name allele log10_likelihood), found {}",
            EXPECTED_FIELD_COUNT,
            fields.len()
        ));
    };

    let pos: i64 = pos
        .parse()
        .map_err(|e| format!("Invalid position '{}': {}", pos, e))?;
    if pos < 1 {
        return Err(format!("Position must be 1-based, got {}", pos));
    }
    let log10_likelihood: f64 = value
        .trim()
        .parse()
        .map_err(|e| format!("Invalid likelihood '{}': {}", value, e))?;
    if log10_likelihood.is_nan() {
        return Err("Likelihood is NaN".to_string());
    }
    if read_name.is_empty() || allele.is_empty() {
        return Err("Empty read name or allele".to_string());
    }

    Ok((
        (chrom.to_string(), pos - 1),
        LikelihoodRow {
            read_name: read_name.to_string(),
            allele: allele.as_bytes().to_vec(),
            log10_likelihood,
        },
    ))
}

impl LikelihoodTable {
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut sites: HashMap<SiteKey, Vec<LikelihoodRow>> = HashMap::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Line {}: {}", idx + 1, e))?;
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let (key, row) = parse_line(&line).map_err(|e| format!("Line {}: {}", idx + 1, e))?;
            sites.entry(key).or_default().push(row);
        }
        Ok(LikelihoodTable { sites })
    }

    pub fn rows(&self, contig: &str, start: i64) -> Option<&[LikelihoodRow]> {
        self.sites
            .get(&(contig.to_string(), start))
            .map(Vec::as_slice)
    }

    pub fn n_sites(&self) -> usize {
        self.sites.len()
    }

    pub fn n_rows(&self) -> usize {
        self.sites.values().map(Vec::len).sum()
    }

    /// Builds the likelihood matrix of a site from its rows, keeping only the
    /// given reads that have rows. Returns `None` when the table has nothing
    /// for the site.
    ///
    /// Matrix alleles follow their first appearance in the table. Allele
    /// strings matching a site allele take that allele's identity; others are
    /// alternate alleles unknown to the site. Pairs without a row score
    /// negative infinity. Mates sharing a name share a row.
    pub fn matrix_for<E: Evidence>(
        &self,
        site: &VariantSite,
        reads: Vec<E>,
    ) -> Result<Option<LikelihoodMatrix<E>>> {
        let Some(rows) = self.rows(&site.contig, site.start) else {
            return Ok(None);
        };

        let mut alleles: Vec<Allele> = Vec::new();
        let mut allele_index: HashMap<&[u8], usize> = HashMap::new();
        for row in rows {
            if let Entry::Vacant(e) = allele_index.entry(row.allele.as_slice()) {
                e.insert(alleles.len());
                let allele = site
                    .alleles()
                    .iter()
                    .find(|a| a.bases() == row.allele.as_slice())
                    .cloned()
                    .unwrap_or_else(|| Allele::alt(row.allele.clone()));
                alleles.push(allele);
            }
        }

        let mut scores: HashMap<&str, Vec<Option<f64>>> = HashMap::new();
        for row in rows {
            let read_scores = scores
                .entry(row.read_name.as_str())
                .or_insert_with(|| vec![None; alleles.len()]);
            let slot = &mut read_scores[allele_index[row.allele.as_slice()]];
            if slot.is_some() {
                return Err(format!(
                    "Duplicate likelihood for read {} and allele {} at {}:{}",
                    row.read_name,
                    String::from_utf8_lossy(&row.allele),
                    site.contig,
                    site.start + 1
                ));
            }
            *slot = Some(row.log10_likelihood);
        }

        let mut matrix = LikelihoodMatrix::new(alleles)?;
        let mut n_unscored = 0;
        for read in reads {
            let Some(read_scores) = scores.get(read.name()) else {
                n_unscored += 1;
                continue;
            };
            let values = read_scores
                .iter()
                .map(|v| v.unwrap_or(f64::NEG_INFINITY))
                .collect();
            matrix.add_evidence(read, values)?;
        }
        if n_unscored > 0 {
            log::debug!("{}: {} reads have no likelihoods", site, n_unscored);
        }
        Ok(Some(matrix))
    }
}
