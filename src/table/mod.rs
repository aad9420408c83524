//! Table module for keyed, column-oriented tables
//!
//! This module implements tables with the following features:
//! - [`Table`]: typed columns addressed by arbitrary row and column keys
//! - [`TableBuilder`]: incremental single-writer construction
//! - [`SyncTableBuilder`]: the same builder serialized behind a mutex
//! - Column, row, subset and grouping views that never copy storage
//! - `combine_first` for merging tables by precedence

pub mod builder;
pub mod column;
pub mod combine;
pub mod sync;
pub mod table;
pub mod view;

pub use builder::TableBuilder;
pub use column::ColumnView;
pub use sync::SyncTableBuilder;
pub use table::{Columns, Table};
pub use view::{Grouping, RowView, TableView};
