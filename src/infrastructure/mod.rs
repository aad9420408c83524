//! Shared infrastructure
//!
//! Key hashing used by every index and map in the engine.

pub mod hash;

pub use hash::{KeyHashBuilder, KeyMap};
