// gainmap-data/src/samplers/random_sampler.rs

use super::traits::Sampler;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// A sampler that randomly samples indices from a dataset.
///
/// Unseeded samplers draw from the thread-local generator. Seeded samplers
/// own a generator, so successive epochs differ but the whole sequence of
/// epochs is reproducible.
#[derive(Debug)]
pub struct RandomSampler {
    replacement: bool,
    num_samples: Option<usize>,
    rng: Option<Mutex<StdRng>>,
}

impl RandomSampler {
    /// Creates a new `RandomSampler`.
    ///
    /// # Arguments
    ///
    /// * `replacement`: If `true`, an index can be selected multiple times.
    /// * `num_samples`: The total number of samples to draw. If `None`, it defaults to the dataset size.
    pub fn new(replacement: bool, num_samples: Option<usize>) -> Self {
        RandomSampler {
            replacement,
            num_samples,
            rng: None,
        }
    }

    /// Same as [`RandomSampler::new`] but with a seeded generator.
    pub fn with_seed(replacement: bool, num_samples: Option<usize>, seed: u64) -> Self {
        RandomSampler {
            replacement,
            num_samples,
            rng: Some(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }

    fn draw<R: Rng>(&self, rng: &mut R, dataset_len: usize, count: usize) -> Vec<usize> {
        if self.replacement {
            (0..count).map(|_| rng.gen_range(0..dataset_len)).collect()
        } else {
            let mut indices: Vec<usize> = (0..dataset_len).collect();
            indices.shuffle(rng);
            indices.truncate(count);
            indices
        }
    }
}

impl Sampler for RandomSampler {
    fn iter(&self, dataset_len: usize) -> Box<dyn Iterator<Item = usize> + Send + Sync> {
        if dataset_len == 0 {
            return Box::new(std::iter::empty());
        }

        let count = self.num_samples.unwrap_or(dataset_len);
        if !self.replacement && count > dataset_len {
            log::warn!(
                "RandomSampler: num_samples ({}) > dataset_len ({}) without replacement. Returning empty iterator.",
                count,
                dataset_len
            );
            return Box::new(std::iter::empty());
        }

        let indices = match &self.rng {
            Some(shared) => {
                let mut rng = shared.lock().unwrap_or_else(|poisoned| {
                    log::warn!("RandomSampler generator lock was poisoned. Recovering.");
                    poisoned.into_inner()
                });
                self.draw(&mut *rng, dataset_len, count)
            }
            None => self.draw(&mut rand::thread_rng(), dataset_len, count),
        };
        Box::new(indices.into_iter())
    }

    fn len(&self, dataset_len: usize) -> usize {
        self.num_samples.unwrap_or(dataset_len)
    }
}

#[cfg(test)]
#[path = "random_sampler_test.rs"]
mod tests;
