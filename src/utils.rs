pub mod input_source;
pub mod readers;
#[cfg(test)]
pub mod test_util;

pub use input_source::InputSource;
pub use readers::{
    open_bam_reader, open_likelihood_table, open_vcf_reader, LikelihoodRow, LikelihoodTable,
};

pub type Result<T> = std::result::Result<T, String>;

pub fn handle_error_and_exit(err: String) -> ! {
    log::error!("{}", err);
    std::process::exit(1);
}
