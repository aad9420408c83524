//! Dense and sparse element storage
//!
//! A [`Store`] holds the elements of one column. Dense stores keep one slot
//! per ordinal. Sparse stores keep a default value plus an overlay of only
//! the ordinals whose value deviates from it.

use crate::infrastructure::hash::{key_map, KeyMap};
use crate::types::{ArrayType, Value, DENSE_FILL_PCT};

/// An element kind that can be stored unboxed in a column
pub trait Element: Clone + Send + Sync + 'static {
    /// Kind tag for columns of this element
    const TYPE: ArrayType;

    /// Value read back from an ordinal that was never set
    fn sentinel() -> Self;

    /// Identity comparison that treats NaN as equal to itself
    fn same(&self, other: &Self) -> bool;
}

impl Element for bool {
    const TYPE: ArrayType = ArrayType::Boolean;

    fn sentinel() -> Self {
        false
    }

    fn same(&self, other: &Self) -> bool {
        self == other
    }
}

impl Element for i32 {
    const TYPE: ArrayType = ArrayType::Int;

    fn sentinel() -> Self {
        0
    }

    fn same(&self, other: &Self) -> bool {
        self == other
    }
}

impl Element for i64 {
    const TYPE: ArrayType = ArrayType::Long;

    fn sentinel() -> Self {
        0
    }

    fn same(&self, other: &Self) -> bool {
        self == other
    }
}

impl Element for f64 {
    const TYPE: ArrayType = ArrayType::Double;

    fn sentinel() -> Self {
        f64::NAN
    }

    fn same(&self, other: &Self) -> bool {
        self.to_bits() == other.to_bits() || (self.is_nan() && other.is_nan())
    }
}

impl Element for Value {
    const TYPE: ArrayType = ArrayType::Object;

    fn sentinel() -> Self {
        Value::Null
    }

    fn same(&self, other: &Self) -> bool {
        self == other
    }
}

#[derive(Debug, Clone)]
enum Repr<T> {
    Dense(Vec<T>),
    Sparse(KeyMap<usize, T>),
}

/// Element storage for a single column
#[derive(Debug, Clone)]
pub struct Store<T> {
    default: T,
    repr: Repr<T>,
}

impl<T: Element> Store<T> {
    /// Create a store for `capacity` ordinals filled with the kind's sentinel
    pub fn new(capacity: usize, fill_pct: f64) -> Self {
        Self::with_default(capacity, fill_pct, T::sentinel())
    }

    /// Create a store whose unset ordinals read as `default`
    ///
    /// A fill percent of 1 selects dense storage; anything lower selects sparse.
    pub fn with_default(capacity: usize, fill_pct: f64, default: T) -> Self {
        let repr = if fill_pct >= DENSE_FILL_PCT {
            Repr::Dense(vec![default.clone(); capacity])
        } else {
            let expected = (capacity as f64 * fill_pct).ceil() as usize;
            Repr::Sparse(key_map(expected))
        };
        Self { default, repr }
    }

    /// Create a dense store holding exactly `values`
    pub fn from_vec(values: Vec<T>) -> Self {
        Self {
            default: T::sentinel(),
            repr: Repr::Dense(values),
        }
    }

    pub fn is_sparse(&self) -> bool {
        matches!(self.repr, Repr::Sparse(_))
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }

    /// Number of ordinals holding their own storage
    pub fn materialized(&self) -> usize {
        match &self.repr {
            Repr::Dense(values) => values.len(),
            Repr::Sparse(overlay) => overlay.len(),
        }
    }

    /// Value at an ordinal; unset ordinals read as the default
    pub fn get(&self, ordinal: usize) -> &T {
        match &self.repr {
            Repr::Dense(values) => values.get(ordinal).unwrap_or(&self.default),
            Repr::Sparse(overlay) => overlay.get(&ordinal).unwrap_or(&self.default),
        }
    }

    /// Write a value at an ordinal
    pub fn set(&mut self, ordinal: usize, value: T) {
        match &mut self.repr {
            Repr::Dense(values) => {
                if ordinal >= values.len() {
                    values.resize(ordinal + 1, self.default.clone());
                }
                values[ordinal] = value;
            }
            Repr::Sparse(overlay) => {
                if value.same(&self.default) {
                    overlay.remove(&ordinal);
                } else {
                    overlay.insert(ordinal, value);
                }
            }
        }
    }

    /// Make sure ordinals below `capacity` have storage
    ///
    /// Dense stores reallocate and fill the new slots with the default.
    /// Sparse stores need no preallocation.
    pub fn ensure_capacity(&mut self, capacity: usize) {
        if let Repr::Dense(values) = &mut self.repr {
            if values.len() < capacity {
                values.resize(capacity, self.default.clone());
            }
        }
    }

    /// Independent copy covering exactly the ordinals below `len`
    pub fn snapshot(&self, len: usize) -> Self {
        let repr = match &self.repr {
            Repr::Dense(values) => {
                let mut copy = Vec::with_capacity(len);
                copy.extend_from_slice(&values[..len.min(values.len())]);
                copy.resize(len, self.default.clone());
                Repr::Dense(copy)
            }
            Repr::Sparse(overlay) => {
                let mut copy = key_map(overlay.len());
                for (ordinal, value) in overlay.iter().filter(|(ordinal, _)| **ordinal < len) {
                    copy.insert(*ordinal, value.clone());
                }
                Repr::Sparse(copy)
            }
        };
        Self {
            default: self.default.clone(),
            repr,
        }
    }

    /// Independent copy holding the values at `ordinals`, in that order
    pub fn select(&self, ordinals: &[usize]) -> Self {
        let repr = match &self.repr {
            Repr::Dense(_) => Repr::Dense(ordinals.iter().map(|&i| self.get(i).clone()).collect()),
            Repr::Sparse(overlay) => {
                let mut copy = key_map(overlay.len().min(ordinals.len()));
                for (position, ordinal) in ordinals.iter().enumerate() {
                    if let Some(value) = overlay.get(ordinal) {
                        copy.insert(position, value.clone());
                    }
                }
                Repr::Sparse(copy)
            }
        };
        Self {
            default: self.default.clone(),
            repr,
        }
    }

    /// Convert into a store of another kind, keeping the representation
    ///
    /// Ordinals below `len` carry their current value over through `f`, unset
    /// ones included. Everything from `len` on reads as the new kind's sentinel.
    pub fn convert<U: Element>(&self, len: usize, f: impl Fn(&T) -> U) -> Store<U> {
        let default = U::sentinel();
        let repr = match &self.repr {
            Repr::Dense(values) => {
                let mut converted: Vec<U> = Vec::with_capacity(values.len().max(len));
                converted.extend((0..len).map(|ordinal| f(self.get(ordinal))));
                converted.resize(values.len().max(len), default.clone());
                Repr::Dense(converted)
            }
            Repr::Sparse(overlay) => {
                let mut converted = key_map(overlay.len());
                let carried_default = f(&self.default);
                if carried_default.same(&default) {
                    for (ordinal, value) in overlay.iter().filter(|(ordinal, _)| **ordinal < len) {
                        let value = f(value);
                        if !value.same(&default) {
                            converted.insert(*ordinal, value);
                        }
                    }
                } else {
                    for ordinal in 0..len {
                        let value = f(self.get(ordinal));
                        if !value.same(&default) {
                            converted.insert(ordinal, value);
                        }
                    }
                }
                Repr::Sparse(converted)
            }
        };
        Store { default, repr }
    }
}
