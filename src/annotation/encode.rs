use super::{classify::AlleleReadGroups, featurize::ReadFeaturizer};
use crate::reads::Evidence;
use crate::utils::Result;
use crate::variant::VariantSite;
use itertools::Itertools;

/// Separates per-allele groups.
pub const GROUP_DELIMITER: char = '|';
/// Separates integers within a group.
pub const VALUE_DELIMITER: char = ',';

/// Encodes read groups as `group_1|group_2|...`, one group per site allele in
/// the site's declared order. Each group is the comma-joined concatenation of
/// its reads' feature vectors, or empty when the allele has no reads.
pub fn encode_read_groups<E: Evidence>(
    site: &VariantSite,
    groups: &AlleleReadGroups<'_, E>,
    featurizer: &ReadFeaturizer,
) -> Result<String> {
    let mut encoded = String::new();
    for (idx, allele) in site.alleles().iter().enumerate() {
        if idx > 0 {
            encoded.push(GROUP_DELIMITER);
        }
        let features = groups
            .get(allele)
            .iter()
            .map(|read| featurizer.featurize(*read, site))
            .collect::<Result<Vec<_>>>()?;
        let group = features
            .iter()
            .flatten()
            .join(&VALUE_DELIMITER.to_string());
        encoded.push_str(&group);
    }
    Ok(encoded)
}
