use crate::variant::{Allele, AlleleLikelihoods, VariantSite};
use std::collections::HashMap;

/// Reads grouped by the allele they support best.
///
/// Every site allele and every likelihood allele has an entry, possibly empty.
#[derive(Debug)]
pub struct AlleleReadGroups<'a, E> {
    groups: HashMap<&'a Allele, Vec<&'a E>>,
}

impl<'a, E> AlleleReadGroups<'a, E> {
    fn with_alleles(alleles: impl IntoIterator<Item = &'a Allele>) -> Self {
        let groups = alleles.into_iter().map(|a| (a, Vec::new())).collect();
        AlleleReadGroups { groups }
    }

    /// Reads assigned to `allele`; empty for alleles without an entry.
    pub fn get(&self, allele: &Allele) -> &[&'a E] {
        self.groups.get(allele).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn get_mut(&mut self, allele: &Allele) -> Option<&mut Vec<&'a E>> {
        self.groups.get_mut(allele)
    }

    pub fn contains(&self, allele: &Allele) -> bool {
        self.groups.contains_key(allele)
    }

    pub fn n_alleles(&self) -> usize {
        self.groups.len()
    }

    pub fn total_reads(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

/// Assigns each informative read to the allele the likelihoods rank best,
/// keeping the likelihoods' tie-breaking as is. Uninformative reads are dropped.
pub fn classify_reads<'a, L>(
    site: &'a VariantSite,
    likelihoods: &'a L,
) -> AlleleReadGroups<'a, L::Evidence>
where
    L: AlleleLikelihoods,
{
    let mut groups =
        AlleleReadGroups::with_alleles(site.alleles().iter().chain(likelihoods.alleles()));

    let mut n_uninformative = 0;
    for best in likelihoods.best_alleles_breaking_ties() {
        if !best.is_informative() {
            n_uninformative += 1;
            continue;
        }
        groups
            .groups
            .entry(best.allele)
            .or_default()
            .push(best.evidence);
    }

    log::trace!(
        "{}: {} informative reads, {} uninformative",
        site,
        groups.total_reads(),
        n_uninformative
    );
    groups
}
