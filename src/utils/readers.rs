mod bam;
mod likelihoods;
mod vcf;

pub use bam::open_bam_reader;
pub use likelihoods::{open_likelihood_table, LikelihoodRow, LikelihoodTable, SiteKey};
pub use vcf::open_vcf_reader;
