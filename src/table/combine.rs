//! Combining several tables into one, first non-missing value wins

use crate::array::array::ArrayData;
use crate::array::{Array, ArrayBuilder};
use crate::index::{Index, Key};
use crate::table::Table;
use crate::types::{ArrayType, DENSE_FILL_PCT};
use tracing::debug;

/// Input column that supplies cells to a combined column
struct Source<'a> {
    array: &'a Array,
    /// Input row ordinal for each combined row ordinal
    rows: &'a [Option<usize>],
}

/// Kind of the combined column: the shared kind, or object if inputs disagree
fn combined_kind(sources: &[Source<'_>]) -> ArrayType {
    let mut kinds = sources.iter().map(|source| source.array.array_type());
    match kinds.next() {
        Some(first) if kinds.all(|kind| kind == first) => first,
        _ => ArrayType::Object,
    }
}

fn copy_cell(target: &mut ArrayBuilder, at: usize, source: &Array, ordinal: usize) {
    match source.data() {
        ArrayData::Boolean(s) => target.set_boolean(at, *s.get(ordinal)),
        ArrayData::Int(s) => target.set_int(at, *s.get(ordinal)),
        ArrayData::Long(s) => target.set_long(at, *s.get(ordinal)),
        ArrayData::Double(s) => target.set_double(at, *s.get(ordinal)),
        ArrayData::Object(s) => target.set_value(at, s.get(ordinal).clone()),
    }
}

impl<R: Key, C: Key> Table<R, C> {
    /// Combine tables, taking each cell from the first table that has it
    ///
    /// The result holds the union of the row and column keys in order of
    /// first appearance. A cell comes from the first input that has both
    /// keys and a non-missing (non-null, non-NaN) value there. A column
    /// whose kind differs between inputs is combined as an object column.
    ///
    /// # Example
    /// ```
    /// use framestore::table::TableBuilder;
    ///
    /// let mut first = TableBuilder::new();
    /// first.put_double("r1", "A", 1.0).put_double("r2", "A", f64::NAN);
    /// let mut second = TableBuilder::new();
    /// second.put_double("r2", "A", 2.0).put_double("r3", "B", 3.0);
    ///
    /// let combined = framestore::table::Table::combine_first(&[&first.build(), &second.build()]);
    /// assert_eq!(combined.row_count(), 3);
    /// assert_eq!(combined.get_double(&"r1", &"A").unwrap(), 1.0);
    /// assert_eq!(combined.get_double(&"r2", &"A").unwrap(), 2.0);
    /// assert!(combined.get_double(&"r3", &"A").unwrap().is_nan());
    /// ```
    pub fn combine_first(tables: &[&Table<R, C>]) -> Table<R, C> {
        let rows: Index<R> = tables
            .iter()
            .flat_map(|table| table.rows().keys().cloned())
            .collect();
        let cols: Index<C> = tables
            .iter()
            .flat_map(|table| table.cols().keys().cloned())
            .collect();
        let row_maps: Vec<Vec<Option<usize>>> = tables
            .iter()
            .map(|table| {
                rows.keys()
                    .map(|row| table.rows().get_coordinate(row))
                    .collect()
            })
            .collect();

        let mut arrays = Vec::with_capacity(cols.len());
        for col in cols.keys() {
            let sources: Vec<Source<'_>> = tables
                .iter()
                .zip(&row_maps)
                .filter_map(|(table, row_map)| {
                    table.column_array(col).ok().map(|array| Source {
                        array,
                        rows: row_map,
                    })
                })
                .collect();
            let fill_pct = sources
                .first()
                .map(|source| source.array.fill_pct())
                .unwrap_or(DENSE_FILL_PCT);
            let mut builder =
                ArrayBuilder::create(Some(combined_kind(&sources)), rows.len(), fill_pct);
            for at in 0..rows.len() {
                let found = sources.iter().find_map(|source| {
                    source.rows[at]
                        .filter(|&ordinal| !source.array.data().is_missing(ordinal))
                        .map(|ordinal| (source.array, ordinal))
                });
                if let Some((array, ordinal)) = found {
                    copy_cell(&mut builder, at, array, ordinal);
                }
            }
            arrays.push(builder.finish(rows.len()));
        }

        debug!(
            inputs = tables.len(),
            rows = rows.len(),
            cols = cols.len(),
            "combined tables"
        );
        Table::from_parts(rows, cols, arrays)
    }
}
