// gainmap-data/src/samplers/sequential_sampler.rs

use super::traits::Sampler;

/// Walks the dataset front to back, every epoch in the same order.
///
/// With `num_samples` set, the walk stops after that many indices (or at the
/// end of the dataset, whichever comes first). Handy for running a short
/// prefix of a large image folder.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialSampler {
    num_samples: Option<usize>,
}

impl SequentialSampler {
    /// Covers the whole dataset.
    pub fn new() -> Self {
        SequentialSampler { num_samples: None }
    }

    /// Covers at most the first `num_samples` indices.
    pub fn with_num_samples(num_samples: usize) -> Self {
        SequentialSampler {
            num_samples: Some(num_samples),
        }
    }
}

impl Sampler for SequentialSampler {
    fn iter(&self, dataset_len: usize) -> Box<dyn Iterator<Item = usize> + Send + Sync> {
        Box::new(0..self.len(dataset_len))
    }

    fn len(&self, dataset_len: usize) -> usize {
        match self.num_samples {
            Some(n) => n.min(dataset_len),
            None => dataset_len,
        }
    }
}

#[cfg(test)]
#[path = "sequential_sampler_test.rs"]
mod tests;
