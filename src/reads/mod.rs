mod cigar;
mod evidence;
mod read;
#[cfg(test)]
pub mod test_utils;

pub use cigar::{Cigar, CigarOpExt};
pub use evidence::Evidence;
pub use read::{fetch_site_reads, AlignedRead, MISSING_QUALITY};
