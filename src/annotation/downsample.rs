use super::classify::AlleleReadGroups;
use crate::variant::Allele;
use rand::Rng;

/// Uniform random subset of `k` items, without replacement (reservoir sampling).
/// Inputs of at most `k` items are returned unchanged.
pub fn reservoir_sample<T, R: Rng + ?Sized>(items: Vec<T>, k: usize, rng: &mut R) -> Vec<T> {
    if items.len() <= k {
        return items;
    }
    let mut reservoir = Vec::with_capacity(k);
    for (seen, item) in items.into_iter().enumerate() {
        if seen < k {
            reservoir.push(item);
        } else {
            let j = rng.random_range(0..=seen);
            if j < k {
                reservoir[j] = item;
            }
        }
    }
    reservoir
}

/// Caps the reference group at `max_ref_count` reads; other groups are untouched.
/// Returns the number of reference reads dropped.
pub fn downsample_reference<E, R: Rng + ?Sized>(
    groups: &mut AlleleReadGroups<'_, E>,
    reference: &Allele,
    max_ref_count: usize,
    rng: &mut R,
) -> usize {
    let Some(ref_reads) = groups.get_mut(reference) else {
        return 0;
    };
    let total = ref_reads.len();
    if total <= max_ref_count {
        return 0;
    }
    let sampled = reservoir_sample(std::mem::take(ref_reads), max_ref_count, rng);
    *ref_reads = sampled;
    log::debug!(
        "Downsampled reference reads: kept {} out of {}",
        max_ref_count,
        total
    );
    total - max_ref_count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::classify::classify_reads;
    use crate::variant::{LikelihoodMatrix, VariantSite};
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashSet;

    #[test]
    fn test_reservoir_keeps_small_inputs() {
        let mut rng = StdRng::seed_from_u64(1);
        let items = vec![1, 2, 3];
        assert_eq!(reservoir_sample(items.clone(), 3, &mut rng), items);
        assert_eq!(reservoir_sample(items.clone(), 10, &mut rng), items);
    }

    #[test]
    fn test_reservoir_exact_size_no_duplicates() {
        let mut rng = StdRng::seed_from_u64(7);
        let sample = reservoir_sample((0..1000).collect(), 10, &mut rng);
        assert_eq!(sample.len(), 10);
        let unique: HashSet<_> = sample.iter().collect();
        assert_eq!(unique.len(), 10);
        assert!(sample.iter().all(|&x| x < 1000));
        assert_ne!(sample, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_reservoir_zero() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(reservoir_sample(vec![1, 2, 3], 0, &mut rng).is_empty());
    }

    #[test]
    fn test_reservoir_is_roughly_uniform() {
        // Each of 20 items should be picked about 5/20 of the time
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts = [0_usize; 20];
        let trials = 4000;
        for _ in 0..trials {
            for x in reservoir_sample((0..20).collect::<Vec<usize>>(), 5, &mut rng) {
                counts[x] += 1;
            }
        }
        let expected = trials * 5 / 20;
        for count in counts {
            assert!(count > expected * 8 / 10 && count < expected * 12 / 10);
        }
    }

    #[test]
    fn test_only_reference_group_downsampled() {
        let ref_allele = Allele::reference(b"A".to_vec());
        let alt_allele = Allele::alt(b"T".to_vec());
        let site = VariantSite::new("chr1", 5, 5, vec![ref_allele.clone(), alt_allele.clone()])
            .unwrap();
        let mut matrix = LikelihoodMatrix::new(site.alleles().to_vec()).unwrap();
        for i in 0..50 {
            matrix.add_evidence(i, vec![-1.0, -10.0]).unwrap();
        }
        for i in 50..80 {
            matrix.add_evidence(i, vec![-10.0, -1.0]).unwrap();
        }

        let mut groups = classify_reads(&site, &matrix);
        let mut rng = StdRng::seed_from_u64(3);
        let dropped = downsample_reference(&mut groups, &ref_allele, 10, &mut rng);

        assert_eq!(dropped, 40);
        assert_eq!(groups.get(&ref_allele).len(), 10);
        assert!(groups.get(&ref_allele).iter().all(|&&i| i < 50));
        assert_eq!(groups.get(&alt_allele).len(), 30);
    }

    #[test]
    fn test_reference_under_cap_untouched() {
        let ref_allele = Allele::reference(b"A".to_vec());
        let site = VariantSite::new("chr1", 5, 5, vec![ref_allele.clone()]).unwrap();
        let mut matrix = LikelihoodMatrix::new(site.alleles().to_vec()).unwrap();
        for i in 0..10 {
            matrix.add_evidence(i, vec![-1.0]).unwrap();
        }
        let mut groups = classify_reads(&site, &matrix);
        let before: Vec<i32> = groups.get(&ref_allele).iter().map(|&&i| i).collect();

        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(downsample_reference(&mut groups, &ref_allele, 10, &mut rng), 0);
        let after: Vec<i32> = groups.get(&ref_allele).iter().map(|&&i| i).collect();
        assert_eq!(before, after);
    }
}
