//! Estimators that retain the values they are fed

use crate::stats::{StatType, Statistic};
use crate::types::grow_capacity;

/// Default number of values a retaining estimator reserves up front
const DEFAULT_SAMPLE_SIZE: usize = 1000;

/// Append to a retained sample, growing by half again when full
fn push_sample(sample: &mut Vec<f64>, value: f64) {
    if sample.len() == sample.capacity() {
        let target = grow_capacity(sample.capacity(), sample.len() + 1);
        sample.reserve_exact(target - sample.len());
    }
    sample.push(value);
}

/// Mean absolute deviation around the mean
///
/// Keeps every value so the deviations can be taken from the final mean.
/// A single value has a deviation of zero.
///
/// # Example
/// ```
/// use framestore::stats::{MeanAbsDev, Statistic};
///
/// let mut mad = MeanAbsDev::new();
/// mad.add_all([1.0, 3.0, 5.0]);
/// assert!((mad.value() - 4.0 / 3.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct MeanAbsDev {
    m1: f64,
    sample: Vec<f64>,
}

impl MeanAbsDev {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_SAMPLE_SIZE)
    }

    /// Estimator reserving room for `size` values before it grows
    pub fn with_capacity(size: usize) -> Self {
        Self {
            m1: 0.0,
            sample: Vec::with_capacity(size),
        }
    }
}

impl Default for MeanAbsDev {
    fn default() -> Self {
        Self::new()
    }
}

impl Statistic for MeanAbsDev {
    fn add(&mut self, value: f64) -> u64 {
        if !value.is_nan() {
            push_sample(&mut self.sample, value);
            self.m1 += (value - self.m1) / self.sample.len() as f64;
        }
        self.count()
    }

    fn count(&self) -> u64 {
        self.sample.len() as u64
    }

    fn value(&self) -> f64 {
        match self.sample.len() {
            0 => f64::NAN,
            1 => 0.0,
            _ => {
                let mut result = 0.0;
                for (i, value) in self.sample.iter().enumerate() {
                    let dev = (value - self.m1).abs();
                    result += (dev - result) / (i + 1) as f64;
                }
                result
            }
        }
    }

    fn reset(&mut self) {
        self.m1 = 0.0;
        self.sample.clear();
    }

    fn stat_type(&self) -> StatType {
        StatType::Mad
    }
}

/// Median of the values counted
///
/// The middle value of an odd count, the average of the two middle values
/// of an even count.
#[derive(Debug, Clone)]
pub struct Median {
    sample: Vec<f64>,
}

impl Median {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_SAMPLE_SIZE)
    }

    pub fn with_capacity(size: usize) -> Self {
        Self {
            sample: Vec::with_capacity(size),
        }
    }
}

impl Default for Median {
    fn default() -> Self {
        Self::new()
    }
}

impl Statistic for Median {
    fn add(&mut self, value: f64) -> u64 {
        if !value.is_nan() {
            push_sample(&mut self.sample, value);
        }
        self.count()
    }

    fn count(&self) -> u64 {
        self.sample.len() as u64
    }

    fn value(&self) -> f64 {
        let n = self.sample.len();
        if n == 0 {
            return f64::NAN;
        }
        let mut sorted = self.sample.clone();
        sorted.sort_unstable_by(f64::total_cmp);
        if n % 2 == 1 {
            sorted[n / 2]
        } else {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        }
    }

    fn reset(&mut self) {
        self.sample.clear();
    }

    fn stat_type(&self) -> StatType {
        StatType::Median
    }
}
