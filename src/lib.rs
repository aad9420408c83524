//! Framestore: in-memory column-oriented tables keyed by rows and columns

// Global type definitions
pub mod types;

pub mod array;
pub mod config;
pub mod error;
pub mod index;
pub mod infrastructure;
pub mod io;
pub mod stats;
pub mod table;

// Re-export the main entry points for easier access
pub use array::{Array, ArrayBuilder};
pub use config::BuilderConfig;
pub use error::{FrameError, FrameResult};
pub use index::Index;
pub use table::{SyncTableBuilder, Table, TableBuilder};
pub use types::{ArrayType, Value};
