//! Read-only site model and the per-sample genotype targets annotations write into.

mod genotype;
mod likelihoods;
mod site;

pub use genotype::{GenotypeAttributes, GenotypeBuilder};
pub use likelihoods::{
    AlleleLikelihoods, BestAllele, LikelihoodMatrix, INFORMATIVE_THRESHOLD, TIE_TOLERANCE,
};
pub use site::{Allele, VariantSite};
