//! TableBuilder for incremental table construction
//!
//! Provides a builder for assembling a [`Table`] cell by cell with:
//! - Row keys registered on first use, columns created on first use
//! - Per-column fill percent selecting dense or sparse storage
//! - Typed puts and accumulators that never box primitives
//! - Non-destructive `build()` producing an independent snapshot
//!
//! A `TableBuilder` assumes a single writer and performs no locking.
//! Call [`TableBuilder::thread_safe`] to get a [`SyncTableBuilder`] that
//! serializes every operation behind one mutex.

use crate::array::array::ArrayData;
use crate::array::ArrayBuilder;
use crate::config::BuilderConfig;
use crate::error::{FrameError, FrameResult};
use crate::index::{Index, Key, Keys};
use crate::infrastructure::hash::{key_map, KeyHashBuilder, KeyMap};
use crate::table::{SyncTableBuilder, Table};
use crate::types::{is_valid_fill_pct, ArrayType, Value};
use linked_hash_map::LinkedHashMap;
use std::fmt;
use std::time::Instant;
use tracing::{debug, warn};

/// Builder for constructing [`Table`] instances
///
/// # Example
/// ```
/// use framestore::table::TableBuilder;
///
/// let mut builder = TableBuilder::new();
/// builder
///     .put_double("r1", "A", 1.0)
///     .put_double("r2", "A", 2.0)
///     .put_int("r1", "B", 7);
///
/// let table = builder.build();
/// assert_eq!(table.row_count(), 2);
/// assert_eq!(table.col_count(), 2);
/// assert_eq!(table.get_int(&"r2", &"B").unwrap(), 0);
/// ```
pub struct TableBuilder<R, C> {
    config: BuilderConfig,
    rows: Index<R>,
    /// Column builders in column order
    arrays: LinkedHashMap<C, ArrayBuilder, KeyHashBuilder>,
    /// Fill percents registered ahead of column creation
    fill_pcts: KeyMap<C, f64>,
}

impl<R: Key, C: Key> TableBuilder<R, C> {
    /// Create a builder with the default capacities and dense columns
    pub fn new() -> Self {
        Self::from_config(BuilderConfig::default())
    }

    /// Create a builder sized for the expected number of rows and columns
    pub fn with_capacity(rows: usize, cols: usize) -> Self {
        Self::from_config(BuilderConfig::with_capacity(rows, cols).clamped())
    }

    /// Create a builder from a config, rejecting an invalid default fill percent
    pub fn with_config(config: BuilderConfig) -> FrameResult<Self> {
        let config = config.validate()?;
        debug!(
            row_capacity = config.row_capacity,
            col_capacity = config.col_capacity,
            fill_pct = config.fill_pct,
            "creating table builder"
        );
        Ok(Self::from_config(config))
    }

    /// Create a builder already holding every cell of `table`
    pub fn from_table(table: &Table<R, C>) -> Self {
        let mut builder = Self::with_capacity(table.row_count(), table.col_count());
        builder.put_all(table);
        builder
    }

    fn from_config(config: BuilderConfig) -> Self {
        Self {
            config,
            rows: Index::with_capacity(config.row_capacity),
            arrays: LinkedHashMap::with_capacity_and_hasher(
                config.col_capacity,
                KeyHashBuilder::new(),
            ),
            fill_pcts: key_map(config.col_capacity),
        }
    }

    /// Resize the initial capacities
    ///
    /// Only applies while the builder is still empty; afterwards storage
    /// grows on demand and this call is ignored.
    pub fn capacity(&mut self, rows: usize, cols: usize) -> &mut Self {
        if self.rows.is_empty() && self.arrays.is_empty() {
            let config = BuilderConfig {
                row_capacity: rows,
                col_capacity: cols,
                fill_pct: self.config.fill_pct,
            };
            let fill_pcts = std::mem::take(&mut self.fill_pcts);
            *self = Self::from_config(config.clamped());
            self.fill_pcts = fill_pcts;
        }
        self
    }

    /// Set the fill percent for a column
    ///
    /// Must be called before the column is first written to take effect.
    pub fn fill_pct(&mut self, col: C, pct: f64) -> FrameResult<&mut Self> {
        if !is_valid_fill_pct(pct) {
            return Err(FrameError::InvalidConfig(format!(
                "fill percent for {:?} must be > 0 and <= 1, not {}",
                col, pct
            )));
        }
        if self.arrays.contains_key(&col) {
            warn!(column = ?col, fill_pct = pct, "fill percent set after column was created");
        }
        self.fill_pcts.insert(col, pct);
        Ok(self)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.arrays.len()
    }

    /// Row keys in ordinal order
    pub fn row_keys(&self) -> Keys<'_, R> {
        self.rows.keys()
    }

    /// Column keys in column order
    pub fn col_keys(&self) -> impl Iterator<Item = &C> {
        self.arrays.keys()
    }

    pub fn has_row(&self, row: &R) -> bool {
        self.rows.contains(row)
    }

    pub fn has_column(&self, col: &C) -> bool {
        self.arrays.contains_key(col)
    }

    /// Always false; see [`SyncTableBuilder`]
    pub fn is_thread_safe(&self) -> bool {
        false
    }

    /// Move this builder behind a mutex so it can be shared between threads
    pub fn thread_safe(self) -> SyncTableBuilder<R, C> {
        debug!(
            rows = self.row_count(),
            cols = self.col_count(),
            "table builder switched to thread safe mode"
        );
        SyncTableBuilder::from_builder(self)
    }

    /// Replace a row key, keeping its ordinal
    pub fn replace_row_key(&mut self, existing: &R, replacement: R) -> FrameResult<&mut Self> {
        self.rows.replace(existing, replacement)?;
        Ok(self)
    }

    /// Replace a column key, keeping the column at its position
    ///
    /// Fails without changing anything if `existing` is not a column or
    /// `replacement` already is one.
    pub fn replace_col_key(&mut self, existing: &C, replacement: C) -> FrameResult<&mut Self> {
        if !self.arrays.contains_key(existing) {
            return Err(FrameError::key_not_found(existing));
        }
        if self.arrays.contains_key(&replacement) {
            return Err(FrameError::duplicate_key(&replacement));
        }
        let trailing: Vec<C> = self
            .arrays
            .keys()
            .skip_while(|key| *key != existing)
            .skip(1)
            .cloned()
            .collect();
        if let Some(array) = self.arrays.remove(existing) {
            self.arrays.insert(replacement.clone(), array);
            for key in &trailing {
                self.arrays.get_refresh(key);
            }
        }
        if let Some(pct) = self.fill_pcts.remove(existing) {
            self.fill_pcts.insert(replacement, pct);
        }
        Ok(self)
    }

    /// Column builder for a key, created with its configured fill percent if absent
    fn array(&mut self, col: C, kind: Option<ArrayType>) -> &mut ArrayBuilder {
        let capacity = self.rows.capacity();
        let fill_pct = self
            .fill_pcts
            .get(&col)
            .copied()
            .unwrap_or(self.config.fill_pct);
        self.arrays
            .entry(col)
            .or_insert_with(|| ArrayBuilder::create(kind, capacity, fill_pct))
    }

    pub fn put_boolean(&mut self, row: R, col: C, value: bool) -> &mut Self {
        let ordinal = self.rows.add(row);
        self.array(col, None).set_boolean(ordinal, value);
        self
    }

    pub fn put_int(&mut self, row: R, col: C, value: i32) -> &mut Self {
        let ordinal = self.rows.add(row);
        self.array(col, None).set_int(ordinal, value);
        self
    }

    pub fn put_long(&mut self, row: R, col: C, value: i64) -> &mut Self {
        let ordinal = self.rows.add(row);
        self.array(col, None).set_long(ordinal, value);
        self
    }

    pub fn put_double(&mut self, row: R, col: C, value: f64) -> &mut Self {
        let ordinal = self.rows.add(row);
        self.array(col, None).set_double(ordinal, value);
        self
    }

    /// Put a boxed value; primitives are unboxed into typed columns
    pub fn put_value<V: Into<Value>>(&mut self, row: R, col: C, value: V) -> &mut Self {
        let ordinal = self.rows.add(row);
        self.array(col, None).set_value(ordinal, value.into());
        self
    }

    /// Reject an accumulator before the row or column is created
    fn check_plus(&self, row: &R, col: &C, kind: ArrayType) -> FrameResult<()> {
        match self.arrays.get(col) {
            Some(array) => {
                let ordinal = self.rows.get_coordinate(row).unwrap_or(self.rows.len());
                array.check_numeric(ordinal, kind)
            }
            None => Ok(()),
        }
    }

    /// Add to a cell, treating an unset cell as zero
    pub fn plus_int(&mut self, row: R, col: C, value: i32) -> FrameResult<&mut Self> {
        self.check_plus(&row, &col, ArrayType::Int)?;
        let ordinal = self.rows.add(row);
        self.array(col, None).plus_int(ordinal, value)?;
        Ok(self)
    }

    /// Add to a cell, treating an unset cell as zero
    pub fn plus_long(&mut self, row: R, col: C, value: i64) -> FrameResult<&mut Self> {
        self.check_plus(&row, &col, ArrayType::Long)?;
        let ordinal = self.rows.add(row);
        self.array(col, None).plus_long(ordinal, value)?;
        Ok(self)
    }

    /// Add to a cell, treating an unset or NaN cell as zero
    pub fn plus_double(&mut self, row: R, col: C, value: f64) -> FrameResult<&mut Self> {
        self.check_plus(&row, &col, ArrayType::Double)?;
        let ordinal = self.rows.add(row);
        self.array(col, None).plus_double(ordinal, value)?;
        Ok(self)
    }

    /// Copy every cell of `table` into this builder
    ///
    /// Every row of `table` is registered even if it holds no cells. Columns
    /// new to this builder take the kind and fill percent of the source column.
    pub fn put_all(&mut self, table: &Table<R, C>) -> &mut Self {
        let ordinals: Vec<usize> = table
            .rows()
            .keys()
            .map(|row| self.rows.add(row.clone()))
            .collect();
        for (col, source) in table.cols().keys().zip(table.arrays()) {
            if source.is_sparse() && !self.has_column(col) && !self.fill_pcts.contains_key(col) {
                self.fill_pcts.insert(col.clone(), source.fill_pct());
            }
            let target = self.array(col.clone(), Some(source.array_type()));
            match source.data() {
                ArrayData::Boolean(s) => {
                    for (i, &ordinal) in ordinals.iter().enumerate() {
                        target.set_boolean(ordinal, *s.get(i));
                    }
                }
                ArrayData::Int(s) => {
                    for (i, &ordinal) in ordinals.iter().enumerate() {
                        target.set_int(ordinal, *s.get(i));
                    }
                }
                ArrayData::Long(s) => {
                    for (i, &ordinal) in ordinals.iter().enumerate() {
                        target.set_long(ordinal, *s.get(i));
                    }
                }
                ArrayData::Double(s) => {
                    for (i, &ordinal) in ordinals.iter().enumerate() {
                        target.set_double(ordinal, *s.get(i));
                    }
                }
                ArrayData::Object(s) => {
                    for (i, &ordinal) in ordinals.iter().enumerate() {
                        target.set_value(ordinal, s.get(i).clone());
                    }
                }
            }
        }
        self
    }

    /// Snapshot the current contents into an independent table
    ///
    /// The builder stays usable; later puts do not affect tables already built.
    /// Every column is padded to the row count with its unset value.
    pub fn build(&self) -> Table<R, C> {
        let started = Instant::now();
        let row_count = self.rows.len();
        let mut cols = Index::with_capacity(self.arrays.len());
        let mut arrays = Vec::with_capacity(self.arrays.len());
        for (col, array) in self.arrays.iter() {
            cols.add(col.clone());
            arrays.push(array.finish(row_count));
        }
        let table = Table::from_parts(self.rows.clone(), cols, arrays);
        debug!(
            rows = row_count,
            cols = table.col_count(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "built table"
        );
        table
    }
}

// LinkedHashMap only clones and formats with hashable keys
impl<R: Key, C: Key> Clone for TableBuilder<R, C> {
    fn clone(&self) -> Self {
        Self {
            config: self.config,
            rows: self.rows.clone(),
            arrays: self.arrays.clone(),
            fill_pcts: self.fill_pcts.clone(),
        }
    }
}

impl<R: Key, C: Key> fmt::Debug for TableBuilder<R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableBuilder")
            .field("config", &self.config)
            .field("rows", &self.rows)
            .field("arrays", &self.arrays)
            .field("fill_pcts", &self.fill_pcts)
            .finish()
    }
}

impl<R: Key, C: Key> Default for TableBuilder<R, C> {
    fn default() -> Self {
        Self::new()
    }
}
