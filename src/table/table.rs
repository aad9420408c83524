//! Finalized table of typed columns addressed by row and column keys

use crate::array::{Array, ArrayBuilder};
use crate::error::{FrameError, FrameResult};
use crate::index::{Index, Key};
use crate::table::TableBuilder;
use crate::types::{ArrayType, Value};

/// Immutable-shape table of typed columns
///
/// A table combines a row [`Index`], a column [`Index`] and one [`Array`] per
/// column, each exactly `row_count()` long. Cells are addressed either by
/// keys or by ordinals. Cell values can be overwritten in place, but rows
/// and columns cannot be added; use [`Table::to_builder`] for that.
///
/// # Example
/// ```
/// use framestore::table::Table;
///
/// let table = Table::of_doubles(0..3, ["x", "y"], |row, col| {
///     if *col == "x" { *row as f64 } else { 10.0 }
/// })
/// .unwrap();
/// assert_eq!(table.get_double(&2, &"x").unwrap(), 2.0);
/// assert_eq!(table.column(&"y").unwrap().sum().unwrap(), 30.0);
/// ```
#[derive(Debug, Clone)]
pub struct Table<R, C> {
    rows: Index<R>,
    cols: Index<C>,
    /// One array per column, in column ordinal order
    arrays: Vec<Array>,
}

impl<R: Key, C: Key> Table<R, C> {
    pub(crate) fn from_parts(rows: Index<R>, cols: Index<C>, arrays: Vec<Array>) -> Self {
        debug_assert_eq!(cols.len(), arrays.len());
        debug_assert!(arrays.iter().all(|array| array.len() == rows.len()));
        Self { rows, cols, arrays }
    }

    /// Table with no rows and no columns
    pub fn empty() -> Self {
        Self::from_parts(Index::new(), Index::new(), Vec::new())
    }

    /// Create a table from row keys and a callback that adds the columns
    ///
    /// Repeated row keys are collapsed onto their first occurrence.
    ///
    /// # Example
    /// ```
    /// use framestore::table::Table;
    ///
    /// let table = Table::of(["a", "b"], |columns| {
    ///     columns.add_ints("count", |row| row.len() as i32)?;
    ///     columns.add_values("label", |row| row.to_uppercase().into())?;
    ///     Ok(())
    /// })
    /// .unwrap();
    /// assert_eq!(table.col_count(), 2);
    /// assert_eq!(table.get_int(&"b", &"count").unwrap(), 1);
    /// ```
    pub fn of<I, F>(row_keys: I, populate: F) -> FrameResult<Self>
    where
        I: IntoIterator<Item = R>,
        F: FnOnce(&mut Columns<'_, R, C>) -> FrameResult<()>,
    {
        let rows = Index::of(row_keys);
        let mut columns = Columns::new(&rows);
        populate(&mut columns)?;
        let Columns { keys, arrays, .. } = columns;
        Ok(Self::from_parts(rows, keys, arrays))
    }

    /// Create a table of double columns filled from `fill(row, col)`
    pub fn of_doubles<I, J, F>(row_keys: I, col_keys: J, mut fill: F) -> FrameResult<Self>
    where
        I: IntoIterator<Item = R>,
        J: IntoIterator<Item = C>,
        F: FnMut(&R, &C) -> f64,
    {
        Self::of(row_keys, |columns| {
            for col in col_keys {
                let values: Vec<f64> = columns.row_keys().map(|row| fill(row, &col)).collect();
                columns.add(col, Array::of_doubles(values))?;
            }
            Ok(())
        })
    }

    /// Empty builder for tables with these key types
    pub fn builder() -> TableBuilder<R, C> {
        TableBuilder::new()
    }

    /// Builder seeded with a copy of every cell in this table
    pub fn to_builder(&self) -> TableBuilder<R, C> {
        TableBuilder::from_table(self)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.cols.len()
    }

    /// Row key index
    pub fn rows(&self) -> &Index<R> {
        &self.rows
    }

    /// Column key index
    pub fn cols(&self) -> &Index<C> {
        &self.cols
    }

    pub(crate) fn arrays(&self) -> &[Array] {
        &self.arrays
    }

    pub fn contains_row(&self, row: &R) -> bool {
        self.rows.contains(row)
    }

    pub fn contains_col(&self, col: &C) -> bool {
        self.cols.contains(col)
    }

    /// Element kind of a column
    pub fn column_type(&self, col: &C) -> FrameResult<ArrayType> {
        Ok(self.column_array(col)?.array_type())
    }

    /// Backing array of a column
    pub fn column_array(&self, col: &C) -> FrameResult<&Array> {
        let j = self.cols.coordinate(col)?;
        Ok(&self.arrays[j])
    }

    pub(crate) fn array_at(&self, j: usize) -> FrameResult<&Array> {
        self.arrays.get(j).ok_or(FrameError::OutOfBounds {
            ordinal: j,
            len: self.arrays.len(),
        })
    }

    fn locate(&self, row: &R, col: &C) -> FrameResult<(usize, usize)> {
        Ok((self.rows.coordinate(row)?, self.cols.coordinate(col)?))
    }

    pub fn get_boolean(&self, row: &R, col: &C) -> FrameResult<bool> {
        let (i, j) = self.locate(row, col)?;
        self.arrays[j].get_boolean(i)
    }

    pub fn get_int(&self, row: &R, col: &C) -> FrameResult<i32> {
        let (i, j) = self.locate(row, col)?;
        self.arrays[j].get_int(i)
    }

    pub fn get_long(&self, row: &R, col: &C) -> FrameResult<i64> {
        let (i, j) = self.locate(row, col)?;
        self.arrays[j].get_long(i)
    }

    pub fn get_double(&self, row: &R, col: &C) -> FrameResult<f64> {
        let (i, j) = self.locate(row, col)?;
        self.arrays[j].get_double(i)
    }

    pub fn get_value(&self, row: &R, col: &C) -> FrameResult<Value> {
        let (i, j) = self.locate(row, col)?;
        self.arrays[j].get_value(i)
    }

    pub fn get_boolean_at(&self, i: usize, j: usize) -> FrameResult<bool> {
        self.array_at(j)?.get_boolean(i)
    }

    pub fn get_int_at(&self, i: usize, j: usize) -> FrameResult<i32> {
        self.array_at(j)?.get_int(i)
    }

    pub fn get_long_at(&self, i: usize, j: usize) -> FrameResult<i64> {
        self.array_at(j)?.get_long(i)
    }

    pub fn get_double_at(&self, i: usize, j: usize) -> FrameResult<f64> {
        self.array_at(j)?.get_double(i)
    }

    pub fn get_value_at(&self, i: usize, j: usize) -> FrameResult<Value> {
        self.array_at(j)?.get_value(i)
    }

    /// Overwrite a cell; the column kind must accept the value
    pub fn set_boolean(&mut self, row: &R, col: &C, value: bool) -> FrameResult<()> {
        let (i, j) = self.locate(row, col)?;
        self.arrays[j].set_boolean(i, value)
    }

    pub fn set_int(&mut self, row: &R, col: &C, value: i32) -> FrameResult<()> {
        let (i, j) = self.locate(row, col)?;
        self.arrays[j].set_int(i, value)
    }

    pub fn set_long(&mut self, row: &R, col: &C, value: i64) -> FrameResult<()> {
        let (i, j) = self.locate(row, col)?;
        self.arrays[j].set_long(i, value)
    }

    pub fn set_double(&mut self, row: &R, col: &C, value: f64) -> FrameResult<()> {
        let (i, j) = self.locate(row, col)?;
        self.arrays[j].set_double(i, value)
    }

    pub fn set_value<V: Into<Value>>(&mut self, row: &R, col: &C, value: V) -> FrameResult<()> {
        let (i, j) = self.locate(row, col)?;
        self.arrays[j].set_value(i, value.into())
    }

    /// Replace a row key, keeping its ordinal
    pub fn replace_row_key(&mut self, existing: &R, replacement: R) -> FrameResult<()> {
        self.rows.replace(existing, replacement)
    }

    /// Replace a column key, keeping its position
    pub fn replace_col_key(&mut self, existing: &C, replacement: C) -> FrameResult<()> {
        self.cols.replace(existing, replacement)
    }
}

impl<R: Key, C: Key> Default for Table<R, C> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Tables are equal when they hold the same keys in the same order and the
/// same cell values, regardless of dense or sparse storage.
impl<R: Key, C: Key> PartialEq for Table<R, C> {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows
            && self.cols == other.cols
            && self
                .arrays
                .iter()
                .zip(&other.arrays)
                .all(|(a, b)| a.values().eq(b.values()))
    }
}

/// Collects the columns of a table being created by [`Table::of`]
pub struct Columns<'a, R, C> {
    rows: &'a Index<R>,
    keys: Index<C>,
    arrays: Vec<Array>,
}

impl<'a, R: Key, C: Key> Columns<'a, R, C> {
    fn new(rows: &'a Index<R>) -> Self {
        Self {
            rows,
            keys: Index::new(),
            arrays: Vec::new(),
        }
    }

    /// Row keys of the table being created, in ordinal order
    pub fn row_keys(&self) -> crate::index::Keys<'a, R> {
        self.rows.keys()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Add a column from an array
    ///
    /// Shorter arrays are padded with unset values; longer ones are rejected.
    pub fn add(&mut self, key: C, array: Array) -> FrameResult<&mut Self> {
        if self.keys.contains(&key) {
            return Err(FrameError::duplicate_key(&key));
        }
        let row_count = self.rows.len();
        let array = match array.len() {
            len if len == row_count => array,
            len if len < row_count => array.resized(row_count),
            len => {
                return Err(FrameError::LengthMismatch {
                    expected: row_count,
                    actual: len,
                })
            }
        };
        self.keys.add(key);
        self.arrays.push(array);
        Ok(self)
    }

    pub fn add_booleans<F>(&mut self, key: C, fill: F) -> FrameResult<&mut Self>
    where
        F: FnMut(&R) -> bool,
    {
        let values = self.rows.keys().map(fill).collect();
        self.add(key, Array::of_booleans(values))
    }

    pub fn add_ints<F>(&mut self, key: C, fill: F) -> FrameResult<&mut Self>
    where
        F: FnMut(&R) -> i32,
    {
        let values = self.rows.keys().map(fill).collect();
        self.add(key, Array::of_ints(values))
    }

    pub fn add_longs<F>(&mut self, key: C, fill: F) -> FrameResult<&mut Self>
    where
        F: FnMut(&R) -> i64,
    {
        let values = self.rows.keys().map(fill).collect();
        self.add(key, Array::of_longs(values))
    }

    pub fn add_doubles<F>(&mut self, key: C, fill: F) -> FrameResult<&mut Self>
    where
        F: FnMut(&R) -> f64,
    {
        let values = self.rows.keys().map(fill).collect();
        self.add(key, Array::of_doubles(values))
    }

    /// Add a column of values resolved the way a builder resolves puts
    ///
    /// The column kind follows from the values: a single primitive kind is
    /// stored unboxed, numeric kinds widen, anything else is boxed.
    pub fn add_values<F>(&mut self, key: C, mut fill: F) -> FrameResult<&mut Self>
    where
        F: FnMut(&R) -> Value,
    {
        let row_count = self.rows.len();
        let mut builder = ArrayBuilder::dense(row_count);
        for (ordinal, row) in self.rows.keys().enumerate() {
            builder.set_value(ordinal, fill(row));
        }
        self.add(key, builder.finish(row_count))
    }
}
