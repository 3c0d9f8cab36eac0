pub mod write_vcf;

pub use write_vcf::{OutputType, VcfWriter};
