//! Column view over a table or a row subset of it

use crate::array::array::Positions;
use crate::array::{Array, Doubles, Values};
use crate::error::{FrameError, FrameResult};
use crate::index::Key;
use crate::stats::{Mean, Median, Statistic, Sum};
use crate::table::Table;
use crate::types::{ArrayType, Value};

/// Read-only view of one column
///
/// Borrows the table's array and, for views taken from a
/// [`TableView`](crate::table::TableView), the ordinals of the rows it
/// covers. Nothing is copied.
#[derive(Debug, Clone)]
pub struct ColumnView<'a, R, C> {
    table: &'a Table<R, C>,
    ordinal: usize,
    rows: Option<&'a [usize]>,
}

impl<'a, R: Key, C: Key> ColumnView<'a, R, C> {
    pub(crate) fn new(table: &'a Table<R, C>, ordinal: usize, rows: Option<&'a [usize]>) -> Self {
        Self {
            table,
            ordinal,
            rows,
        }
    }

    /// Column key
    pub fn key(&self) -> &'a C {
        &self.table.cols().as_slice()[self.ordinal]
    }

    /// Column ordinal in the owning table
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn array(&self) -> &'a Array {
        &self.table.arrays()[self.ordinal]
    }

    pub fn array_type(&self) -> ArrayType {
        self.array().array_type()
    }

    /// Number of rows covered by this view
    pub fn len(&self) -> usize {
        match self.rows {
            Some(rows) => rows.len(),
            None => self.table.row_count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Table ordinal of the `i`th row covered
    fn row_ordinal(&self, i: usize) -> FrameResult<usize> {
        match self.rows {
            Some(rows) => rows.get(i).copied().ok_or(FrameError::OutOfBounds {
                ordinal: i,
                len: rows.len(),
            }),
            None => Ok(i),
        }
    }

    fn positions(&self) -> Positions<'a> {
        match self.rows {
            Some(rows) => Positions::Subset(rows.iter()),
            None => Positions::All(0..self.table.row_count()),
        }
    }

    pub fn get_double(&self, i: usize) -> FrameResult<f64> {
        self.array().get_double(self.row_ordinal(i)?)
    }

    pub fn get_value(&self, i: usize) -> FrameResult<Value> {
        self.array().get_value(self.row_ordinal(i)?)
    }

    /// Lazy sequence of the covered values as doubles; fails for boolean columns
    pub fn doubles(&self) -> FrameResult<Doubles<'a>> {
        Doubles::new(self.array(), self.positions())
    }

    /// Lazy sequence of the covered values boxed
    pub fn values(&self) -> Values<'a> {
        Values::new(self.array(), self.positions())
    }

    /// Feed every covered value into `stat` and return its result
    ///
    /// # Example
    /// ```
    /// use framestore::stats::MeanAbsDev;
    /// use framestore::table::Table;
    ///
    /// let table = Table::of_doubles(0..3, ["v"], |row, _| *row as f64 * 2.0).unwrap();
    /// let mad = table.column(&"v").unwrap().compute(MeanAbsDev::new()).unwrap();
    /// assert!((mad - 4.0 / 3.0).abs() < 1e-12);
    /// ```
    pub fn compute<S: Statistic>(&self, mut stat: S) -> FrameResult<f64> {
        stat.add_all(self.doubles()?);
        Ok(stat.value())
    }

    pub fn sum(&self) -> FrameResult<f64> {
        self.compute(Sum::new())
    }

    pub fn mean(&self) -> FrameResult<f64> {
        self.compute(Mean::new())
    }

    pub fn median(&self) -> FrameResult<f64> {
        self.compute(Median::with_capacity(self.len()))
    }
}
