//! Random train/validation splitting
//!
//! Mirrors the usual `random_split(dataset, lengths)` contract: subsets are
//! disjoint, randomly assigned and together cover every index exactly once.

use super::dataset::PreferenceData;
use super::sample::PreferenceSample;
use crate::error::{Error, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;

/// Sizes of the training and validation subsets for `len` samples.
///
/// `train = floor(ratio * len)`, `val = len - train`. Ratios outside
/// `[0, 1]` (including NaN) are rejected.
pub fn split_sizes(len: usize, ratio: f64) -> Result<(usize, usize)> {
    if !(0.0..=1.0).contains(&ratio) {
        return Err(Error::InvalidSplitRatio { ratio });
    }
    let train = ((ratio * len as f64).floor() as usize).min(len);
    Ok((train, len - train))
}

/// A view on a dataset restricted to a list of indices.
pub struct Subset<D> {
    dataset: Arc<D>,
    indices: Vec<usize>,
}

impl<D> Clone for Subset<D> {
    fn clone(&self) -> Self {
        Self { dataset: Arc::clone(&self.dataset), indices: self.indices.clone() }
    }
}

impl<D: PreferenceData> Subset<D> {
    /// Create a subset from explicit indices.
    pub fn new(dataset: Arc<D>, indices: Vec<usize>) -> Self {
        Self { dataset, indices }
    }

    /// Subset covering the whole dataset in order.
    pub fn full(dataset: Arc<D>) -> Self {
        let indices = (0..dataset.len()).collect();
        Self { dataset, indices }
    }

    /// Indices into the underlying dataset.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// The underlying dataset.
    pub fn dataset(&self) -> &Arc<D> {
        &self.dataset
    }
}

impl<D: PreferenceData> PreferenceData for Subset<D> {
    fn len(&self) -> usize {
        self.indices.len()
    }

    fn get(&self, index: usize) -> Option<PreferenceSample> {
        self.indices.get(index).and_then(|&i| self.dataset.get(i))
    }
}

/// Randomly partition a dataset into non-overlapping subsets of the given lengths.
pub fn random_split<D, R>(dataset: Arc<D>, lengths: &[usize], rng: &mut R) -> Result<Vec<Subset<D>>>
where
    D: PreferenceData,
    R: Rng + ?Sized,
{
    let len = dataset.len();
    if lengths.iter().sum::<usize>() != len {
        return Err(Error::InvalidSplitLengths { lengths: lengths.to_vec(), len });
    }

    let mut permutation: Vec<usize> = (0..len).collect();
    permutation.shuffle(rng);

    let mut subsets = Vec::with_capacity(lengths.len());
    let mut offset = 0;
    for &n in lengths {
        subsets.push(Subset::new(Arc::clone(&dataset), permutation[offset..offset + n].to_vec()));
        offset += n;
    }
    Ok(subsets)
}

/// Split into `(train, validation)` with `train = floor(ratio * len)`.
pub fn train_val_split<D, R>(dataset: Arc<D>, ratio: f64, rng: &mut R) -> Result<(Subset<D>, Subset<D>)>
where
    D: PreferenceData,
    R: Rng + ?Sized,
{
    let (train_size, val_size) = split_sizes(dataset.len(), ratio)?;
    let mut parts = random_split(dataset, &[train_size, val_size], rng)?.into_iter();
    match (parts.next(), parts.next()) {
        (Some(train), Some(val)) => Ok((train, val)),
        _ => Err(Error::InvalidSplitLengths { lengths: vec![train_size, val_size], len: 0 }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PreferenceDataset;
    use crate::data::PreferenceRecord;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn dataset(n: usize) -> Arc<PreferenceDataset> {
        let records: Vec<_> = (0..n)
            .map(|i| PreferenceRecord {
                first: vec![vec![i as f32]],
                second: vec![vec![0.0]],
                preference: 1.0,
            })
            .collect();
        Arc::new(PreferenceDataset::from_records(&records).unwrap())
    }

    #[test]
    fn test_split_sizes_default_ratio() {
        assert_eq!(split_sizes(100, 0.8).unwrap(), (80, 20));
        assert_eq!(split_sizes(7, 0.8).unwrap(), (5, 2));
        assert_eq!(split_sizes(0, 0.8).unwrap(), (0, 0));
        assert_eq!(split_sizes(10, 1.0).unwrap(), (10, 0));
    }

    #[test]
    fn test_split_sizes_rejects_bad_ratio() {
        assert!(matches!(split_sizes(10, 1.5), Err(Error::InvalidSplitRatio { .. })));
        assert!(split_sizes(10, -0.1).is_err());
        assert!(split_sizes(10, f64::NAN).is_err());
    }

    #[test]
    fn test_random_split_lengths_must_sum() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = random_split(dataset(10), &[3, 3], &mut rng).err().unwrap();
        assert!(matches!(err, Error::InvalidSplitLengths { .. }));
    }

    #[test]
    fn test_subset_get_maps_indices() {
        let subset = Subset::new(dataset(5), vec![4, 1]);
        assert_eq!(subset.len(), 2);
        assert_eq!(subset.get(0).unwrap().first[[0, 0]], 4.0);
        assert_eq!(subset.get(1).unwrap().first[[0, 0]], 1.0);
        assert!(subset.get(2).is_none());
    }

    #[test]
    fn test_same_seed_same_split() {
        let data = dataset(50);
        let (a, _) = train_val_split(Arc::clone(&data), 0.8, &mut StdRng::seed_from_u64(7)).unwrap();
        let (b, _) = train_val_split(data, 0.8, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a.indices(), b.indices());
    }

    #[test]
    fn test_full_subset() {
        let subset = Subset::full(dataset(3));
        assert_eq!(subset.indices(), &[0, 1, 2]);
        let set: HashSet<_> = subset.indices().iter().collect();
        assert_eq!(set.len(), 3);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::data::{PreferenceDataset, PreferenceRecord};
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    proptest! {
        /// Sizes follow floor(r * N) and always add up to N
        #[test]
        fn split_sizes_cover_dataset(len in 0usize..10_000, ratio in 0.0f64..1.0) {
            let (train, val) = split_sizes(len, ratio).unwrap();
            prop_assert_eq!(train, (ratio * len as f64).floor() as usize);
            prop_assert_eq!(train + val, len);
        }

        /// Subsets are disjoint and their union is the full index range
        #[test]
        fn random_split_is_partition(len in 1usize..200, ratio in 0.0f64..1.0, seed in any::<u64>()) {
            let records: Vec<_> = (0..len)
                .map(|_| PreferenceRecord { first: vec![vec![0.0]], second: vec![vec![0.0]], preference: 0.5 })
                .collect();
            let data = Arc::new(PreferenceDataset::from_records(&records).unwrap());
            let mut rng = StdRng::seed_from_u64(seed);
            let (train, val) = train_val_split(data, ratio, &mut rng).unwrap();

            let train_set: HashSet<_> = train.indices().iter().copied().collect();
            let val_set: HashSet<_> = val.indices().iter().copied().collect();
            prop_assert_eq!(train_set.len(), train.len());
            prop_assert_eq!(val_set.len(), val.len());
            prop_assert!(train_set.is_disjoint(&val_set));
            let union: HashSet<_> = train_set.union(&val_set).copied().collect();
            prop_assert_eq!(union, (0..len).collect::<HashSet<_>>());
        }
    }
}
