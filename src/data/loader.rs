//! Batching data loader over a dataset subset

use super::dataset::PreferenceData;
use super::sample::{PreferenceBatch, PreferenceSample};
use super::split::Subset;
use crate::error::{Error, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;
use rayon::ThreadPool;

/// Produces collated batches from a [`Subset`], one pass per epoch.
///
/// With `shuffle` enabled the sample order is redrawn at the start of every
/// epoch. Sample fetching runs on a dedicated pool of `num_workers` threads;
/// with zero workers samples are fetched on the calling thread.
pub struct DataLoader<D> {
    subset: Subset<D>,
    batch_size: usize,
    shuffle: bool,
    rng: StdRng,
    pool: Option<ThreadPool>,
}

impl<D: PreferenceData> DataLoader<D> {
    /// Create a sequential loader with no worker threads.
    pub fn new(subset: Subset<D>, batch_size: usize) -> Self {
        Self {
            subset,
            batch_size: batch_size.max(1),
            shuffle: false,
            rng: StdRng::seed_from_u64(0),
            pool: None,
        }
    }

    /// Reshuffle the sample order every epoch using the given seed.
    pub fn with_shuffle(mut self, seed: u64) -> Self {
        self.shuffle = true;
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Fetch samples on a pool of `num_workers` threads.
    pub fn with_num_workers(mut self, num_workers: usize) -> Result<Self> {
        self.pool = if num_workers == 0 {
            None
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(num_workers)
                .thread_name(|i| format!("loader-worker-{i}"))
                .build()
                .map_err(|e| Error::io("starting data loader workers", std::io::Error::other(e)))?;
            Some(pool)
        };
        Ok(self)
    }

    /// Number of batches per epoch (the last one may be partial).
    pub fn len(&self) -> usize {
        self.subset.len().div_ceil(self.batch_size)
    }

    /// Whether an epoch yields no batches.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of samples per epoch.
    pub fn num_samples(&self) -> usize {
        self.subset.len()
    }

    /// Configured batch size.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Whether the order changes between epochs.
    pub fn shuffles(&self) -> bool {
        self.shuffle
    }

    /// Worker threads used for fetching.
    pub fn num_workers(&self) -> usize {
        self.pool.as_ref().map_or(0, ThreadPool::current_num_threads)
    }

    /// Sample order for the next epoch, as positions within the subset.
    fn epoch_order(&mut self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.subset.len()).collect();
        if self.shuffle {
            order.shuffle(&mut self.rng);
        }
        order
    }

    fn fetch(&self, positions: &[usize]) -> Result<Vec<PreferenceSample>> {
        let subset = &self.subset;
        let fetch_one = |&pos: &usize| {
            subset
                .get(pos)
                .ok_or(Error::IndexOutOfBounds { index: pos, len: subset.len() })
        };
        match &self.pool {
            Some(pool) => pool.install(|| positions.par_iter().map(fetch_one).collect()),
            None => positions.iter().map(fetch_one).collect(),
        }
    }

    /// All batches of one epoch.
    pub fn epoch_batches(&mut self) -> Result<Vec<PreferenceBatch>> {
        let order = self.epoch_order();
        order
            .chunks(self.batch_size)
            .map(|chunk| PreferenceBatch::collate(&self.fetch(chunk)?))
            .collect()
    }
}
