//! Row, row-subset and grouping views over a table
//!
//! Views hold a reference to the owning [`Table`] plus row ordinals. They
//! never copy column storage; [`TableView::to_table`] is the explicit copy.

use crate::array::Array;
use crate::error::{FrameError, FrameResult};
use crate::index::{Index, Key};
use crate::infrastructure::hash::KeyHashBuilder;
use crate::stats::Statistic;
use crate::table::{ColumnView, Table};
use crate::types::Value;
use linked_hash_map::LinkedHashMap;
use tracing::debug;

/// Read-only view of one row
#[derive(Debug, Clone)]
pub struct RowView<'a, R, C> {
    table: &'a Table<R, C>,
    ordinal: usize,
}

impl<'a, R: Key, C: Key> RowView<'a, R, C> {
    /// Row key
    pub fn key(&self) -> &'a R {
        &self.table.rows().as_slice()[self.ordinal]
    }

    /// Row ordinal in the owning table
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    fn array(&self, col: &C) -> FrameResult<&'a Array> {
        self.table.column_array(col)
    }

    pub fn get_boolean(&self, col: &C) -> FrameResult<bool> {
        self.array(col)?.get_boolean(self.ordinal)
    }

    pub fn get_int(&self, col: &C) -> FrameResult<i32> {
        self.array(col)?.get_int(self.ordinal)
    }

    pub fn get_long(&self, col: &C) -> FrameResult<i64> {
        self.array(col)?.get_long(self.ordinal)
    }

    pub fn get_double(&self, col: &C) -> FrameResult<f64> {
        self.array(col)?.get_double(self.ordinal)
    }

    pub fn get_value(&self, col: &C) -> FrameResult<Value> {
        self.array(col)?.get_value(self.ordinal)
    }

    pub fn is_missing(&self, col: &C) -> FrameResult<bool> {
        self.array(col)?.is_missing(self.ordinal)
    }

    /// Every cell of the row boxed, in column order
    pub fn values(&self) -> impl Iterator<Item = Value> + 'a {
        let ordinal = self.ordinal;
        self.table
            .arrays()
            .iter()
            .map(move |array| array.data().value(ordinal))
    }
}

/// Subset of the rows of a table, in a chosen order
#[derive(Debug, Clone)]
pub struct TableView<'a, R, C> {
    table: &'a Table<R, C>,
    ordinals: Vec<usize>,
}

impl<'a, R: Key, C: Key> TableView<'a, R, C> {
    pub(crate) fn new(table: &'a Table<R, C>, ordinals: Vec<usize>) -> Self {
        Self { table, ordinals }
    }

    /// Table the view reads from
    pub fn table(&self) -> &'a Table<R, C> {
        self.table
    }

    pub fn row_count(&self) -> usize {
        self.ordinals.len()
    }

    pub fn col_count(&self) -> usize {
        self.table.col_count()
    }

    pub fn is_empty(&self) -> bool {
        self.ordinals.is_empty()
    }

    /// Table ordinals of the rows in this view
    pub fn ordinals(&self) -> &[usize] {
        &self.ordinals
    }

    pub fn row_keys(&self) -> impl Iterator<Item = &'a R> + '_ {
        let keys = self.table.rows().as_slice();
        self.ordinals.iter().map(move |&i| &keys[i])
    }

    /// The `i`th row of the view
    pub fn row(&self, i: usize) -> FrameResult<RowView<'a, R, C>> {
        let ordinal = self.ordinals.get(i).copied().ok_or(FrameError::OutOfBounds {
            ordinal: i,
            len: self.ordinals.len(),
        })?;
        Ok(RowView {
            table: self.table,
            ordinal,
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = RowView<'a, R, C>> + '_ {
        let table = self.table;
        self.ordinals
            .iter()
            .map(move |&ordinal| RowView { table, ordinal })
    }

    /// Column restricted to the rows of this view
    pub fn column(&self, col: &C) -> FrameResult<ColumnView<'_, R, C>> {
        let j = self.table.cols().coordinate(col)?;
        Ok(ColumnView::new(self.table, j, Some(&self.ordinals)))
    }

    pub fn get_double(&self, i: usize, col: &C) -> FrameResult<f64> {
        self.row(i)?.get_double(col)
    }

    pub fn get_value(&self, i: usize, col: &C) -> FrameResult<Value> {
        self.row(i)?.get_value(col)
    }

    /// Copy the rows of this view into a new table
    pub fn to_table(&self) -> Table<R, C> {
        let rows: Index<R> = self.row_keys().cloned().collect();
        let arrays = self
            .table
            .arrays()
            .iter()
            .map(|array| array.select(&self.ordinals))
            .collect();
        Table::from_parts(rows, self.table.cols().clone(), arrays)
    }
}

/// Rows of a table grouped by the distinct values of one column
///
/// Groups appear in the order their value was first seen.
#[derive(Debug, Clone)]
pub struct Grouping<'a, R, C> {
    table: &'a Table<R, C>,
    col: C,
    groups: LinkedHashMap<Value, TableView<'a, R, C>, KeyHashBuilder>,
}

impl<'a, R: Key, C: Key> Grouping<'a, R, C> {
    /// Column the rows were grouped by
    pub fn key(&self) -> &C {
        &self.col
    }

    pub fn table(&self) -> &'a Table<R, C> {
        self.table
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Group values in first-seen order
    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.groups.keys()
    }

    pub fn get(&self, value: &Value) -> Option<&TableView<'a, R, C>> {
        self.groups.get(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &TableView<'a, R, C>)> {
        self.groups.iter()
    }

    /// Apply `stat` to `col` within each group
    ///
    /// Returns a table with one row per group value and a single column `col`.
    pub fn compute<S: Statistic>(&self, col: &C, stat: S) -> FrameResult<Table<Value, C>> {
        let mut results = Vec::with_capacity(self.groups.len());
        for view in self.groups.values() {
            let mut group_stat = stat.copy();
            group_stat.reset();
            results.push(view.column(col)?.compute(group_stat)?);
        }
        Table::of(self.groups.keys().cloned(), |columns| {
            columns.add(col.clone(), Array::of_doubles(results))?;
            Ok(())
        })
    }
}

impl<R: Key, C: Key> Table<R, C> {
    /// View of a column by key
    pub fn column(&self, col: &C) -> FrameResult<ColumnView<'_, R, C>> {
        let j = self.cols().coordinate(col)?;
        Ok(ColumnView::new(self, j, None))
    }

    /// View of a column by ordinal
    pub fn column_at(&self, j: usize) -> FrameResult<ColumnView<'_, R, C>> {
        self.array_at(j)?;
        Ok(ColumnView::new(self, j, None))
    }

    /// Views of every column in column order
    pub fn columns(&self) -> impl Iterator<Item = ColumnView<'_, R, C>> {
        (0..self.col_count()).map(move |j| ColumnView::new(self, j, None))
    }

    /// View of a row by key
    pub fn row(&self, row: &R) -> FrameResult<RowView<'_, R, C>> {
        let ordinal = self.rows().coordinate(row)?;
        Ok(RowView {
            table: self,
            ordinal,
        })
    }

    /// View of a row by ordinal
    pub fn row_at(&self, i: usize) -> FrameResult<RowView<'_, R, C>> {
        self.rows().key_at(i)?;
        Ok(RowView {
            table: self,
            ordinal: i,
        })
    }

    /// Views of every row in ordinal order
    pub fn rows_iter(&self) -> impl Iterator<Item = RowView<'_, R, C>> {
        (0..self.row_count()).map(move |ordinal| RowView {
            table: self,
            ordinal,
        })
    }

    /// View of every row
    pub fn view(&self) -> TableView<'_, R, C> {
        TableView::new(self, (0..self.row_count()).collect())
    }

    /// View of the rows matching a predicate, in ordinal order
    pub fn select_rows<F>(&self, mut predicate: F) -> TableView<'_, R, C>
    where
        F: FnMut(&RowView<'_, R, C>) -> bool,
    {
        let ordinals = self
            .rows_iter()
            .filter(|row| predicate(row))
            .map(|row| row.ordinal)
            .collect();
        TableView::new(self, ordinals)
    }

    /// Group rows by the distinct values of a column
    ///
    /// # Example
    /// ```
    /// use framestore::table::TableBuilder;
    /// use framestore::types::Value;
    ///
    /// let mut builder = TableBuilder::new();
    /// builder
    ///     .put_value(1, "city", "Paris")
    ///     .put_value(2, "city", "Rome")
    ///     .put_value(3, "city", "Paris");
    /// let table = builder.build();
    ///
    /// let groups = table.group_by(&"city").unwrap();
    /// assert_eq!(groups.len(), 2);
    /// assert_eq!(groups.get(&Value::from("Paris")).unwrap().ordinals(), &[0, 2]);
    /// ```
    pub fn group_by(&self, col: &C) -> FrameResult<Grouping<'_, R, C>> {
        let array = self.column_array(col)?;
        let mut groups: LinkedHashMap<Value, TableView<'_, R, C>, KeyHashBuilder> =
            LinkedHashMap::with_hasher(KeyHashBuilder::new());
        for ordinal in 0..self.row_count() {
            groups
                .entry(array.data().value(ordinal))
                .or_insert_with(|| TableView::new(self, Vec::new()))
                .ordinals
                .push(ordinal);
        }
        debug!(column = ?col, rows = self.row_count(), groups = groups.len(), "grouped table");
        Ok(Grouping {
            table: self,
            col: col.clone(),
            groups,
        })
    }
}
