//! The `FRS` genotype annotation: per-allele sets of read feature vectors.

use super::{
    classify::classify_reads,
    downsample::downsample_reference,
    encode::encode_read_groups,
    featurize::ReadFeaturizer,
    header::{FieldDescriptor, FieldNumber, VcfType},
    GenotypeAnnotation, SiteAnnotation,
};
use crate::reads::Evidence;
use crate::utils::Result;
use crate::variant::{AlleleLikelihoods, GenotypeBuilder, VariantSite};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::BTreeMap;

pub const FEATURIZED_READ_SETS_KEY: &str = "FRS";

pub const FRS_FORMAT_FIELD: FieldDescriptor = FieldDescriptor::format(
    FEATURIZED_READ_SETS_KEY,
    VcfType::String,
    FieldNumber::GenotypeCount,
    "Featurized read sets for each allele: groups separated by '|' in allele order, \
     nine integers per read separated by ','",
);

/// Source of randomness for reference downsampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedPolicy {
    /// Reproducible: each site draws from the seed mixed with its position.
    Fixed(u64),
    #[default]
    Entropy,
}

impl SeedPolicy {
    /// Call-local generator for one site. With a fixed seed the stream depends
    /// only on the seed and the site, not on which thread runs the call.
    pub fn rng_for(&self, site: &VariantSite) -> StdRng {
        match self {
            SeedPolicy::Fixed(seed) => StdRng::seed_from_u64(site_seed(*seed, site)),
            SeedPolicy::Entropy => StdRng::from_os_rng(),
        }
    }
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
    x = (x ^ (x >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    x ^ (x >> 31)
}

fn site_seed(seed: u64, site: &VariantSite) -> u64 {
    let contig_hash = site
        .contig
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325_u64, |h, b| {
            (h ^ b as u64).wrapping_mul(0x0100_0000_01b3)
        });
    splitmix64(seed ^ splitmix64(contig_hash ^ splitmix64(site.start as u64)))
}

/// Per-sample annotation that groups reads by the allele they support, caps
/// the reference group, and encodes the nine features of every read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeaturizedReadSets {
    max_ref_count: Option<usize>,
    featurizer: ReadFeaturizer,
    seed: SeedPolicy,
}

impl Default for FeaturizedReadSets {
    fn default() -> Self {
        FeaturizedReadSets {
            max_ref_count: None,
            featurizer: ReadFeaturizer::default(),
            seed: SeedPolicy::default(),
        }
    }
}

impl FeaturizedReadSets {
    pub fn new(max_ref_count: Option<usize>) -> Self {
        FeaturizedReadSets {
            max_ref_count,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: SeedPolicy) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_default_base_quality(mut self, quality: u8) -> Self {
        self.featurizer = ReadFeaturizer::new(quality);
        self
    }

    pub fn max_ref_count(&self) -> Option<usize> {
        self.max_ref_count
    }

    pub fn default_base_quality(&self) -> u8 {
        self.featurizer.default_base_quality
    }

    pub fn seed(&self) -> SeedPolicy {
        self.seed
    }

    /// Runs the annotation with an explicit generator. The genotype is only
    /// written once the whole value has been encoded.
    pub fn annotate_with_rng<L, G, R>(
        &self,
        site: &VariantSite,
        genotype: &mut G,
        likelihoods: Option<&L>,
        rng: &mut R,
    ) -> Result<()>
    where
        L: AlleleLikelihoods,
        L::Evidence: Evidence,
        G: GenotypeBuilder,
        R: Rng + ?Sized,
    {
        self.annotate_with(site, genotype, likelihoods, || rng)
    }

    /// `make_rng` is only called when the reference group has a cap.
    fn annotate_with<L, G, R, F>(
        &self,
        site: &VariantSite,
        genotype: &mut G,
        likelihoods: Option<&L>,
        make_rng: F,
    ) -> Result<()>
    where
        L: AlleleLikelihoods,
        L::Evidence: Evidence,
        G: GenotypeBuilder,
        R: Rng,
        F: FnOnce() -> R,
    {
        let Some(likelihoods) = likelihoods else {
            return Ok(());
        };
        let reference = site
            .reference_allele()
            .ok_or_else(|| format!("Site {} has no reference allele", site))?;

        let mut groups = classify_reads(site, likelihoods);
        if let Some(max_ref_count) = self.max_ref_count {
            let mut rng = make_rng();
            downsample_reference(&mut groups, reference, max_ref_count, &mut rng);
        }
        let encoded = encode_read_groups(site, &groups, &self.featurizer)?;
        genotype.set_attribute(FEATURIZED_READ_SETS_KEY, encoded);
        Ok(())
    }
}

impl GenotypeAnnotation for FeaturizedReadSets {
    fn key_names(&self) -> Vec<&'static str> {
        vec![FEATURIZED_READ_SETS_KEY]
    }

    fn descriptors(&self) -> Vec<FieldDescriptor> {
        vec![FRS_FORMAT_FIELD]
    }

    fn annotate_genotype<L, G>(
        &self,
        site: &VariantSite,
        genotype: &mut G,
        likelihoods: Option<&L>,
    ) -> Result<()>
    where
        L: AlleleLikelihoods,
        L::Evidence: Evidence,
        G: GenotypeBuilder,
    {
        self.annotate_with(site, genotype, likelihoods, || self.seed.rng_for(site))
    }
}

impl SiteAnnotation for FeaturizedReadSets {
    /// Read sets are per sample; there is nothing to add at the site level.
    fn annotate_site<L>(
        &self,
        _site: &VariantSite,
        _likelihoods: Option<&L>,
    ) -> Result<BTreeMap<String, String>>
    where
        L: AlleleLikelihoods,
        L::Evidence: Evidence,
    {
        Ok(BTreeMap::new())
    }
}
