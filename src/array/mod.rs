//! Array module for typed column storage
//!
//! This module implements column storage with the following features:
//! - Unboxed storage per element kind (boolean, int, long, double) plus an object fallback
//! - Dense or sparse representation chosen by fill percent
//! - [`ArrayBuilder`] for growable construction, [`Array`] for the finalized column

pub mod array;
pub mod builder;
pub mod store;

pub use array::{Array, Doubles, Values};
pub use builder::ArrayBuilder;
pub use store::{Element, Store};

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
