mod classify;
mod downsample;
mod encode;
mod featurize;
mod featurized_read_sets;
pub mod header;

pub use classify::{classify_reads, AlleleReadGroups};
pub use downsample::{downsample_reference, reservoir_sample};
pub use encode::{encode_read_groups, GROUP_DELIMITER, VALUE_DELIMITER};
pub use featurize::{FeatureVector, ReadFeaturizer, DEFAULT_BASE_QUALITY, FEATURES_PER_READ};
pub use featurized_read_sets::{
    FeaturizedReadSets, SeedPolicy, FEATURIZED_READ_SETS_KEY, FRS_FORMAT_FIELD,
};
pub use header::FieldDescriptor;

use crate::reads::Evidence;
use crate::utils::Result;
use crate::variant::{AlleleLikelihoods, GenotypeBuilder, VariantSite};
use std::collections::BTreeMap;

/// An annotation that writes fields into one sample's genotype.
pub trait GenotypeAnnotation {
    fn key_names(&self) -> Vec<&'static str>;

    /// Header declarations for every key this annotation may write.
    fn descriptors(&self) -> Vec<FieldDescriptor>;

    /// Annotates one sample at one site. Missing likelihoods leave the
    /// genotype untouched and are not an error.
    fn annotate_genotype<L, G>(
        &self,
        site: &VariantSite,
        genotype: &mut G,
        likelihoods: Option<&L>,
    ) -> Result<()>
    where
        L: AlleleLikelihoods,
        L::Evidence: Evidence,
        G: GenotypeBuilder;
}

/// An annotation that computes site-level (INFO) fields.
pub trait SiteAnnotation {
    fn annotate_site<L>(
        &self,
        site: &VariantSite,
        likelihoods: Option<&L>,
    ) -> Result<BTreeMap<String, String>>
    where
        L: AlleleLikelihoods,
        L::Evidence: Evidence;
}
