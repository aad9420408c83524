//! IO module defining how tables are loaded and saved
//!
//! The engine does no parsing or formatting of its own. Readers and writers
//! for concrete formats implement [`TableSource`] and [`TableSink`], and
//! place fully typed values through a [`TableBuilder`](crate::table::TableBuilder).
//! Their failures surface as [`FrameError::SourceRead`](crate::error::FrameError::SourceRead)
//! and [`FrameError::SinkWrite`](crate::error::FrameError::SinkWrite).

pub mod options;

pub use options::{infer_value, ColumnNameMapping, ReadOptions, RowKeyParser, ValueParser, WriteOptions};

use crate::error::FrameResult;
use crate::index::Key;
use crate::table::Table;

/// A reader that produces a table from some external resource
pub trait TableSource<R: Key, C: Key> {
    /// Options this source is configured with
    type Options;

    fn read(&self, options: Self::Options) -> FrameResult<Table<R, C>>;

    /// Read with default options adjusted by `configure`
    fn read_with<F>(&self, configure: F) -> FrameResult<Table<R, C>>
    where
        Self::Options: Default,
        F: FnOnce(&mut Self::Options),
    {
        let mut options = Self::Options::default();
        configure(&mut options);
        self.read(options)
    }
}

/// A writer that stores a table to some external resource
pub trait TableSink<R: Key, C: Key> {
    type Options;

    fn write(&mut self, table: &Table<R, C>, options: Self::Options) -> FrameResult<()>;

    /// Write with default options adjusted by `configure`
    fn write_with<F>(&mut self, table: &Table<R, C>, configure: F) -> FrameResult<()>
    where
        Self::Options: Default,
        F: FnOnce(&mut Self::Options),
    {
        let mut options = Self::Options::default();
        configure(&mut options);
        self.write(table, options)
    }
}
