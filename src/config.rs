//! Builder configuration
//!
//! A [`BuilderConfig`] carries the initial capacities and default fill percent
//! a [`TableBuilder`](crate::table::TableBuilder) starts with. It can be
//! constructed in code or loaded from a JSON document; missing fields fall
//! back to their defaults.

use crate::error::{FrameError, FrameResult};
use crate::types::{
    is_valid_fill_pct, DEFAULT_COL_CAPACITY, DEFAULT_ROW_CAPACITY, DENSE_FILL_PCT, MIN_CAPACITY,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Initial sizing and storage policy for a table builder
///
/// # Example
/// ```
/// use framestore::config::BuilderConfig;
///
/// let config = BuilderConfig::from_json_str(r#"{ "row_capacity": 50000 }"#).unwrap();
/// assert_eq!(config.row_capacity, 50000);
/// assert_eq!(config.col_capacity, 10);
/// assert_eq!(config.fill_pct, 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Rows to allocate before the first growth
    pub row_capacity: usize,
    /// Columns to allocate before the first growth
    pub col_capacity: usize,
    /// Fill percent for columns without their own setting
    pub fill_pct: f64,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            row_capacity: DEFAULT_ROW_CAPACITY,
            col_capacity: DEFAULT_COL_CAPACITY,
            fill_pct: DENSE_FILL_PCT,
        }
    }
}

impl BuilderConfig {
    /// Config with the given capacities and dense columns
    pub fn with_capacity(row_capacity: usize, col_capacity: usize) -> Self {
        Self {
            row_capacity,
            col_capacity,
            ..Self::default()
        }
    }

    /// Check the config and return a copy with capacities clamped to the minimum
    pub fn validate(&self) -> FrameResult<Self> {
        if !is_valid_fill_pct(self.fill_pct) {
            return Err(FrameError::InvalidConfig(format!(
                "default fill percent must be > 0 and <= 1, not {}",
                self.fill_pct
            )));
        }
        Ok(self.clamped())
    }

    pub(crate) fn clamped(&self) -> Self {
        Self {
            row_capacity: self.row_capacity.max(MIN_CAPACITY),
            col_capacity: self.col_capacity.max(MIN_CAPACITY),
            fill_pct: self.fill_pct,
        }
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> FrameResult<Self> {
        let config: BuilderConfig = serde_json::from_str(json)?;
        config.validate()
    }

    /// Read, parse and validate a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> FrameResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
