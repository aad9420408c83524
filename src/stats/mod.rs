//! Stats module for incremental univariate statistics
//!
//! This module implements streaming estimators with the following features:
//! - A common [`Statistic`] trait fed one double at a time
//! - NaN inputs are ignored and never counted
//! - Estimators are plain values; `copy()` returns an independent instance
//!
//! Column views feed these estimators through
//! [`ColumnView::compute`](crate::table::ColumnView::compute).

pub mod moments;
pub mod sample;

pub use moments::{Max, Mean, Min, StdDev, Sum, Variance};
pub use sample::{MeanAbsDev, Median};

use std::fmt;

/// Kind of statistic an estimator computes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatType {
    Sum,
    Mean,
    Min,
    Max,
    Variance,
    StdDev,
    /// Mean absolute deviation
    Mad,
    Median,
}

impl fmt::Display for StatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatType::Sum => "SUM",
            StatType::Mean => "MEAN",
            StatType::Min => "MIN",
            StatType::Max => "MAX",
            StatType::Variance => "VARIANCE",
            StatType::StdDev => "STD_DEV",
            StatType::Mad => "MAD",
            StatType::Median => "MEDIAN",
        };
        write!(f, "{}", name)
    }
}

/// Incremental estimator over a stream of doubles
///
/// # Example
/// ```
/// use framestore::stats::{Mean, Statistic};
///
/// let mut mean = Mean::new();
/// mean.add_all([1.0, 2.0, f64::NAN, 6.0]);
/// assert_eq!(mean.count(), 3);
/// assert_eq!(mean.value(), 3.0);
/// ```
pub trait Statistic: Clone + fmt::Debug + Send {
    /// Add a value and return the number of values counted so far
    ///
    /// NaN is ignored.
    fn add(&mut self, value: f64) -> u64;

    /// Number of values counted
    fn count(&self) -> u64;

    /// Current estimate, NaN when nothing has been counted
    fn value(&self) -> f64;

    /// Forget every value added so far
    fn reset(&mut self);

    fn stat_type(&self) -> StatType;

    /// Add every value of a sequence and return the resulting count
    fn add_all<I: IntoIterator<Item = f64>>(&mut self, values: I) -> u64 {
        for value in values {
            self.add(value);
        }
        self.count()
    }

    /// Independent copy carrying the same state
    fn copy(&self) -> Self {
        self.clone()
    }
}
