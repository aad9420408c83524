//! Constant-memory estimators

use crate::stats::{StatType, Statistic};

/// Sum of values
#[derive(Debug, Clone, Default)]
pub struct Sum {
    n: u64,
    sum: f64,
}

impl Sum {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Statistic for Sum {
    fn add(&mut self, value: f64) -> u64 {
        if !value.is_nan() {
            self.n += 1;
            self.sum += value;
        }
        self.n
    }

    fn count(&self) -> u64 {
        self.n
    }

    fn value(&self) -> f64 {
        if self.n == 0 { f64::NAN } else { self.sum }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn stat_type(&self) -> StatType {
        StatType::Sum
    }
}

/// Arithmetic mean, updated incrementally
#[derive(Debug, Clone, Default)]
pub struct Mean {
    n: u64,
    m1: f64,
}

impl Mean {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Statistic for Mean {
    fn add(&mut self, value: f64) -> u64 {
        if !value.is_nan() {
            self.n += 1;
            self.m1 += (value - self.m1) / self.n as f64;
        }
        self.n
    }

    fn count(&self) -> u64 {
        self.n
    }

    fn value(&self) -> f64 {
        if self.n == 0 { f64::NAN } else { self.m1 }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn stat_type(&self) -> StatType {
        StatType::Mean
    }
}

/// Smallest value
#[derive(Debug, Clone)]
pub struct Min {
    n: u64,
    min: f64,
}

impl Min {
    pub fn new() -> Self {
        Self {
            n: 0,
            min: f64::INFINITY,
        }
    }
}

impl Default for Min {
    fn default() -> Self {
        Self::new()
    }
}

impl Statistic for Min {
    fn add(&mut self, value: f64) -> u64 {
        if !value.is_nan() {
            self.n += 1;
            self.min = self.min.min(value);
        }
        self.n
    }

    fn count(&self) -> u64 {
        self.n
    }

    fn value(&self) -> f64 {
        if self.n == 0 { f64::NAN } else { self.min }
    }

    fn reset(&mut self) {
        *self = Self::new();
    }

    fn stat_type(&self) -> StatType {
        StatType::Min
    }
}

/// Largest value
#[derive(Debug, Clone)]
pub struct Max {
    n: u64,
    max: f64,
}

impl Max {
    pub fn new() -> Self {
        Self {
            n: 0,
            max: f64::NEG_INFINITY,
        }
    }
}

impl Default for Max {
    fn default() -> Self {
        Self::new()
    }
}

impl Statistic for Max {
    fn add(&mut self, value: f64) -> u64 {
        if !value.is_nan() {
            self.n += 1;
            self.max = self.max.max(value);
        }
        self.n
    }

    fn count(&self) -> u64 {
        self.n
    }

    fn value(&self) -> f64 {
        if self.n == 0 { f64::NAN } else { self.max }
    }

    fn reset(&mut self) {
        *self = Self::new();
    }

    fn stat_type(&self) -> StatType {
        StatType::Max
    }
}

/// Sample variance using Welford's update
///
/// Undefined (NaN) until two values have been counted.
#[derive(Debug, Clone, Default)]
pub struct Variance {
    n: u64,
    m1: f64,
    m2: f64,
}

impl Variance {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Statistic for Variance {
    fn add(&mut self, value: f64) -> u64 {
        if !value.is_nan() {
            self.n += 1;
            let delta = value - self.m1;
            self.m1 += delta / self.n as f64;
            self.m2 += delta * (value - self.m1);
        }
        self.n
    }

    fn count(&self) -> u64 {
        self.n
    }

    fn value(&self) -> f64 {
        if self.n < 2 {
            f64::NAN
        } else {
            self.m2 / (self.n - 1) as f64
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn stat_type(&self) -> StatType {
        StatType::Variance
    }
}

/// Sample standard deviation
#[derive(Debug, Clone, Default)]
pub struct StdDev {
    variance: Variance,
}

impl StdDev {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Statistic for StdDev {
    fn add(&mut self, value: f64) -> u64 {
        self.variance.add(value)
    }

    fn count(&self) -> u64 {
        self.variance.count()
    }

    fn value(&self) -> f64 {
        self.variance.value().sqrt()
    }

    fn reset(&mut self) {
        self.variance.reset();
    }

    fn stat_type(&self) -> StatType {
        StatType::StdDev
    }
}
