//! Per-read, per-allele support scores and the best-allele query the annotations consume.

use super::Allele;
use crate::utils::Result;
use std::collections::HashSet;

/// Minimum log10 gap between the best and second best allele for a read to count as informative.
pub const INFORMATIVE_THRESHOLD: f64 = 0.2;

/// Alleles whose scores are within this distance of the best are considered tied.
pub const TIE_TOLERANCE: f64 = 1e-9;

/// The allele a read supports best, as decided by a likelihood source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestAllele<'a, E> {
    pub evidence: &'a E,
    pub allele: &'a Allele,
    pub informative: bool,
}

impl<E> BestAllele<'_, E> {
    #[inline]
    pub fn is_informative(&self) -> bool {
        self.informative
    }
}

/// Query interface over a (read, allele) likelihood matrix.
///
/// Implementations own the tie-breaking rule; callers must not re-break ties.
pub trait AlleleLikelihoods {
    type Evidence;

    /// Alleles covered by the matrix, in the matrix's own order.
    fn alleles(&self) -> &[Allele];

    /// One entry per read, in read order.
    fn best_alleles_breaking_ties<'a>(
        &'a self,
    ) -> impl Iterator<Item = BestAllele<'a, Self::Evidence>> + 'a;
}

/// Dense in-memory matrix of log10 likelihoods, one row per read.
#[derive(Debug, Clone)]
pub struct LikelihoodMatrix<E> {
    alleles: Vec<Allele>,
    evidence: Vec<E>,
    values: Vec<Vec<f64>>,
}

impl<E> LikelihoodMatrix<E> {
    pub fn new(alleles: Vec<Allele>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(alleles.len());
        if let Some(dup) = alleles.iter().find(|a| !seen.insert(*a)) {
            return Err(format!("Duplicate allele {} in likelihood matrix", dup));
        }
        Ok(LikelihoodMatrix {
            alleles,
            evidence: Vec::new(),
            values: Vec::new(),
        })
    }

    /// Adds a read with one log10 likelihood per matrix allele.
    pub fn add_evidence(&mut self, evidence: E, log10_likelihoods: Vec<f64>) -> Result<()> {
        if log10_likelihoods.len() != self.alleles.len() {
            return Err(format!(
                "Expected {} likelihoods per read, got {}",
                self.alleles.len(),
                log10_likelihoods.len()
            ));
        }
        self.evidence.push(evidence);
        self.values.push(log10_likelihoods);
        Ok(())
    }

    pub fn evidence(&self) -> &[E] {
        &self.evidence
    }

    pub fn len(&self) -> usize {
        self.evidence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.evidence.is_empty()
    }

    pub fn value(&self, read_index: usize, allele_index: usize) -> f64 {
        self.values[read_index][allele_index]
    }

    /// Ties within `TIE_TOLERANCE` of the maximum go to the reference allele,
    /// then to the allele listed first in the matrix.
    fn best_allele(&self, read_index: usize) -> Option<BestAllele<'_, E>> {
        let row = &self.values[read_index];
        let best_value = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let best_index = (0..row.len())
            .filter(|&a| row[a] >= best_value - TIE_TOLERANCE)
            .min_by_key(|&a| (!self.alleles[a].is_reference(), a))?;

        let second_best = row
            .iter()
            .enumerate()
            .filter(|&(a, _)| a != best_index)
            .map(|(_, v)| *v)
            .fold(f64::NEG_INFINITY, f64::max);

        Some(BestAllele {
            evidence: &self.evidence[read_index],
            allele: &self.alleles[best_index],
            informative: row[best_index] - second_best > INFORMATIVE_THRESHOLD,
        })
    }
}

impl<E> AlleleLikelihoods for LikelihoodMatrix<E> {
    type Evidence = E;

    fn alleles(&self) -> &[Allele] {
        &self.alleles
    }

    fn best_alleles_breaking_ties<'a>(&'a self) -> impl Iterator<Item = BestAllele<'a, E>> + 'a {
        (0..self.evidence.len()).filter_map(move |r| self.best_allele(r))
    }
}
