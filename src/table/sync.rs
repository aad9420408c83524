//! Thread safe table builder
//!
//! [`SyncTableBuilder`] wraps a [`TableBuilder`] in a `parking_lot::Mutex`.
//! Every operation takes the lock for its whole duration, so row creation,
//! column creation, growth and the write itself are one atomic step. The
//! guard is released on every exit path, including errors and panics.

use crate::error::FrameResult;
use crate::index::Key;
use crate::table::{Table, TableBuilder};
use crate::types::Value;
use parking_lot::Mutex;
use std::fmt;

/// Table builder that can be shared between threads
///
/// # Example
/// ```
/// use framestore::table::TableBuilder;
/// use std::sync::Arc;
/// use std::thread;
///
/// let builder = Arc::new(TableBuilder::new().thread_safe());
/// let handles: Vec<_> = (0..4)
///     .map(|t| {
///         let builder = Arc::clone(&builder);
///         thread::spawn(move || {
///             builder.put_long(t, "thread", t as i64);
///         })
///     })
///     .collect();
/// for handle in handles {
///     handle.join().unwrap();
/// }
/// assert_eq!(builder.build().row_count(), 4);
/// ```
pub struct SyncTableBuilder<R, C> {
    inner: Mutex<TableBuilder<R, C>>,
}

impl<R: Key, C: Key> SyncTableBuilder<R, C> {
    pub fn new() -> Self {
        TableBuilder::new().thread_safe()
    }

    pub(crate) fn from_builder(builder: TableBuilder<R, C>) -> Self {
        Self {
            inner: Mutex::new(builder),
        }
    }

    /// Already thread safe; returns self
    pub fn thread_safe(self) -> Self {
        self
    }

    pub fn is_thread_safe(&self) -> bool {
        true
    }

    /// Drop the lock and return the single-writer builder
    pub fn into_inner(self) -> TableBuilder<R, C> {
        self.inner.into_inner()
    }

    /// Run several operations under one acquisition of the lock
    pub fn with<T>(&self, f: impl FnOnce(&mut TableBuilder<R, C>) -> T) -> T {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }

    pub fn row_count(&self) -> usize {
        self.inner.lock().row_count()
    }

    pub fn col_count(&self) -> usize {
        self.inner.lock().col_count()
    }

    pub fn has_row(&self, row: &R) -> bool {
        self.inner.lock().has_row(row)
    }

    pub fn has_column(&self, col: &C) -> bool {
        self.inner.lock().has_column(col)
    }

    pub fn fill_pct(&self, col: C, pct: f64) -> FrameResult<&Self> {
        self.inner.lock().fill_pct(col, pct)?;
        Ok(self)
    }

    pub fn replace_row_key(&self, existing: &R, replacement: R) -> FrameResult<&Self> {
        self.inner.lock().replace_row_key(existing, replacement)?;
        Ok(self)
    }

    pub fn replace_col_key(&self, existing: &C, replacement: C) -> FrameResult<&Self> {
        self.inner.lock().replace_col_key(existing, replacement)?;
        Ok(self)
    }

    pub fn put_boolean(&self, row: R, col: C, value: bool) -> &Self {
        self.inner.lock().put_boolean(row, col, value);
        self
    }

    pub fn put_int(&self, row: R, col: C, value: i32) -> &Self {
        self.inner.lock().put_int(row, col, value);
        self
    }

    pub fn put_long(&self, row: R, col: C, value: i64) -> &Self {
        self.inner.lock().put_long(row, col, value);
        self
    }

    pub fn put_double(&self, row: R, col: C, value: f64) -> &Self {
        self.inner.lock().put_double(row, col, value);
        self
    }

    pub fn put_value<V: Into<Value>>(&self, row: R, col: C, value: V) -> &Self {
        self.inner.lock().put_value(row, col, value);
        self
    }

    pub fn plus_int(&self, row: R, col: C, value: i32) -> FrameResult<&Self> {
        self.inner.lock().plus_int(row, col, value)?;
        Ok(self)
    }

    pub fn plus_long(&self, row: R, col: C, value: i64) -> FrameResult<&Self> {
        self.inner.lock().plus_long(row, col, value)?;
        Ok(self)
    }

    pub fn plus_double(&self, row: R, col: C, value: f64) -> FrameResult<&Self> {
        self.inner.lock().plus_double(row, col, value)?;
        Ok(self)
    }

    pub fn put_all(&self, table: &Table<R, C>) -> &Self {
        self.inner.lock().put_all(table);
        self
    }

    /// Snapshot the current contents while holding the lock
    pub fn build(&self) -> Table<R, C> {
        self.inner.lock().build()
    }
}

impl<R: Key, C: Key> fmt::Debug for SyncTableBuilder<R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncTableBuilder")
            .field("inner", &self.inner)
            .finish()
    }
}

impl<R: Key, C: Key> Default for SyncTableBuilder<R, C> {
    fn default() -> Self {
        Self::new()
    }
}
